use crud_usage::logger::{AUDIT_TARGET, METRICS_TARGET, build_config, configure_logging};
use std::fs;
use tempfile::tempdir;

#[test]
fn configure_logging_writes_app_audit_metrics_in_dir() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("proc_logs");
    configure_logging(Some(&base), Some("debug"), Some(3)).unwrap();
    log::info!("hello app");
    log::info!(target: AUDIT_TARGET, "audit event");
    log::info!(target: METRICS_TARGET, "metric event");

    let app = fs::read_to_string(base.join("app.log")).unwrap();
    let audit = fs::read_to_string(base.join("audit.log")).unwrap();
    let metrics = fs::read_to_string(base.join("metrics.log")).unwrap();
    assert!(app.contains("hello app"), "app.log: {app}");
    assert!(audit.contains("audit event"), "audit.log: {audit}");
    assert!(metrics.contains("metric event"), "metrics.log: {metrics}");
    // the audit and metrics targets do not reach the root appender
    assert!(!app.contains("audit event"));
    assert!(!app.contains("metric event"));
    assert!(!audit.contains("hello app"));
}

#[test]
fn build_config_creates_missing_directory() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("nested").join("logs");
    let cfg = build_config(Some(&base), Some("trace"), None).unwrap();
    assert!(fs::metadata(&base).unwrap().is_dir());
    let names: Vec<&str> = cfg.appenders().iter().map(|a| a.name()).collect();
    assert!(names.contains(&"app"));
    assert!(names.contains(&"audit"));
    assert!(names.contains(&"metrics"));
    assert_eq!(cfg.root().level(), log::LevelFilter::Trace);
}
