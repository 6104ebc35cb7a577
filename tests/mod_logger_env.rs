use crud_usage::config::AppConfig;
use crud_usage::logger::AUDIT_TARGET;
use std::fs;
use tempfile::tempdir;

#[test]
fn logging_falls_back_to_environment() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("env_logs");
    // single test in this binary
    unsafe {
        std::env::set_var("CRUD_USAGE_LOG_DIR", &base);
        std::env::set_var("CRUD_USAGE_LOG_LEVEL", "warn");
        std::env::set_var("CRUD_USAGE_LOG_RETENTION", "2");
    }

    crud_usage::init(&AppConfig::default()).unwrap();
    log::info!("below the env level");
    log::warn!("warned via env config");
    log::warn!(target: AUDIT_TARGET, "env audit line");

    let app = fs::read_to_string(base.join("app.log")).unwrap();
    assert!(app.contains("warned via env config"), "app.log: {app}");
    assert!(!app.contains("below the env level"));
    let audit = fs::read_to_string(base.join("audit.log")).unwrap();
    assert!(audit.contains("env audit line"));
}
