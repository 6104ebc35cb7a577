use crate::config::AppConfig;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::{
    CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
};
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::{Path, PathBuf};

/// Target for one line per executed usage step.
pub const AUDIT_TARGET: &str = "crud_usage::audit";
/// Target for per-step timings.
pub const METRICS_TARGET: &str = "crud_usage::metrics";

const ENCODER_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";
const ROLL_SIZE: u64 = 10 * 1024 * 1024;

/// Initializes the logging system from a specific config file path.
pub fn init_path(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    log4rs::init_file(path, log4rs::config::Deserializers::default())?;
    Ok(())
}

/// Maps a textual level to a filter; anything unrecognised means `info`.
pub fn parse_level(level: Option<&str>) -> LevelFilter {
    match level.unwrap_or("info").to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn rolling(base: &Path, stem: &str, keep: u32) -> Result<RollingFileAppender, Box<dyn std::error::Error>> {
    let roller = FixedWindowRoller::builder()
        .build(&format!("{}", base.join(format!("{stem}.{{}}.log")).display()), keep)?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(ROLL_SIZE)), Box::new(roller));
    let appender = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(ENCODER_PATTERN)))
        .build(base.join(format!("{stem}.log")), Box::new(policy))?;
    Ok(appender)
}

/// Builds the process logging config without installing it.
///
/// Layout under `dir` (current directory when `None`):
/// - `app.log`: root logger, also mirrored to stderr
/// - `audit.log`: [`AUDIT_TARGET`] only
/// - `metrics.log`: [`METRICS_TARGET`] only
///
/// Files roll at 10 MiB and keep `retention` old files (default 7).
pub fn build_config(
    dir: Option<&Path>,
    level: Option<&str>,
    retention: Option<u32>,
) -> Result<Config, Box<dyn std::error::Error>> {
    let base = dir
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    std::fs::create_dir_all(&base)?;
    let keep = retention.unwrap_or(7);
    let lvl = parse_level(level);

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{l}] {m}{n}")))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .appender(Appender::builder().build("app", Box::new(rolling(&base, "app", keep)?)))
        .appender(Appender::builder().build("audit", Box::new(rolling(&base, "audit", keep)?)))
        .appender(Appender::builder().build("metrics", Box::new(rolling(&base, "metrics", keep)?)))
        .logger(Logger::builder().appender("audit").additive(false).build(AUDIT_TARGET, lvl))
        .logger(Logger::builder().appender("metrics").additive(false).build(METRICS_TARGET, lvl))
        .build(Root::builder().appender("app").appender("stderr").build(lvl))?;
    Ok(config)
}

/// Configure logging globally for the process.
/// - dir: base directory for logs; if None, current directory.
/// - level: off|error|warn|info|debug|trace
/// - retention: number of rolled files to keep (default 7)
///
/// A second call in the same process leaves the first logger in place.
pub fn configure_logging(
    dir: Option<&Path>,
    level: Option<&str>,
    retention: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(dir, level, retention)?;
    let _ = log4rs::init_config(config);
    Ok(())
}

/// Logging settings taken from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvLogSettings {
    pub dir: Option<PathBuf>,
    pub level: Option<String>,
    pub retention: Option<u32>,
}

/// Reads these variables through `lookup`:
/// - CRUD_USAGE_LOG_DIR
/// - CRUD_USAGE_LOG_LEVEL
/// - CRUD_USAGE_LOG_RETENTION
pub fn env_settings_with<F>(lookup: F) -> EnvLogSettings
where
    F: Fn(&str) -> Option<String>,
{
    EnvLogSettings {
        dir: lookup("CRUD_USAGE_LOG_DIR").map(PathBuf::from),
        level: lookup("CRUD_USAGE_LOG_LEVEL"),
        retention: lookup("CRUD_USAGE_LOG_RETENTION").and_then(|s| s.parse::<u32>().ok()),
    }
}

/// Installs the process logger for `cfg`.
///
/// `log_config` names a log4rs YAML file that replaces the built-in layout.
/// Otherwise `log_dir` and `log_level` win over the environment, which fills
/// whatever they leave unset.
pub fn init_from_config(cfg: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = &cfg.log_config {
        return init_path(path);
    }
    let env = env_settings_with(|k| std::env::var(k).ok());
    let dir = cfg.log_dir.clone().or(env.dir);
    let level = cfg.log_level.clone().or(env.level);
    configure_logging(dir.as_deref(), level.as_deref(), env.retention)
}
