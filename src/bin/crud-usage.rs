use clap::{Parser, Subcommand};
use crud_usage::cli::{self as prog_cli, Command, OutputMode};
use crud_usage::config::{self, AppConfig, LoadedConfig};
use crud_usage::explain::ExplainVerbosity;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "crud-usage", version, about = "Runs the collection CRUD usage example against MongoDB", long_about = None)]
struct Cli {
    #[arg(long, help = "Path to a config file (TOML). If omitted, discovered files and defaults are used.")]
    config: Option<PathBuf>,
    #[arg(long, help = "Connection string (e.g., mongodb://localhost:27017). Takes precedence over config/env.")]
    uri: Option<String>,
    #[arg(long, help = "Database name (default: test)")]
    database: Option<String>,
    #[arg(long, help = "Collection name (default: test)")]
    collection: Option<String>,
    #[arg(long, help = "log4rs YAML file; replaces the built-in logging setup")]
    log_config: Option<PathBuf>,
    #[arg(long, help = "Log level: off|error|warn|info|debug|trace")]
    log_level: Option<String>,
    #[arg(long, help = "Directory for app/audit/metrics logs")]
    log_dir: Option<PathBuf>,
    #[arg(long, short = 'o', help = "Output format: human|plain|json")]
    output: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "List every step of the usage example")]
    List,
    #[command(about = "Run the usage example (all steps, or a selection)")]
    Run {
        #[arg(long, value_delimiter = ',', help = "Comma-separated step or group names to run")]
        only: Vec<String>,
        #[arg(long, help = "Stop at the first failing step")]
        fail_fast: bool,
    },
    #[command(about = "Explain a count or find against the collection")]
    Explain {
        #[arg(help = "What to explain: count|find")]
        kind: String,
        #[arg(help = "Filter JSON (e.g., {\"x\": 1}); defaults to {}")]
        filter: Option<String>,
        #[arg(long, default_value = "queryPlanner", help = "queryPlanner|executionStats|allPlansExecution")]
        verbosity: String,
    },
    #[command(about = "Print version and compiled features")]
    Version,
}

fn init_logging(loaded: &LoadedConfig) {
    match crud_usage::init(&loaded.config) {
        Ok(()) => loaded.log_warnings(),
        Err(e) => {
            eprintln!("warning: logging not initialised: {e}");
            for w in &loaded.warnings {
                eprintln!("warning: {w}");
            }
        }
    }
}

async fn real_main(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let overrides = AppConfig {
        uri: cli.uri,
        database: cli.database,
        collection: cli.collection,
        log_config: cli.log_config,
        log_dir: cli.log_dir,
        log_level: cli.log_level,
        ..Default::default()
    };
    let loaded = config::load_config(cli.config.as_deref(), overrides)?;
    init_logging(&loaded);
    let cfg = loaded.config;
    let mode: OutputMode = prog_cli::parse_output_mode(&cli.output);

    let cmd = match cli.command {
        Commands::List => Command::List,
        Commands::Run { only, fail_fast } => Command::Run {
            only: prog_cli::split_names(&only),
            fail_fast: fail_fast || cfg.fail_fast.unwrap_or(false),
        },
        Commands::Explain { kind, filter, verbosity } => Command::Explain {
            kind,
            filter_json: filter,
            verbosity: verbosity.parse::<ExplainVerbosity>()?,
        },
        Commands::Version => Command::Version,
    };

    if !cmd.needs_collection() {
        return prog_cli::run_offline(cmd, mode);
    }
    let col = crud_usage::open(&cfg).await?;
    prog_cli::run_with_format(&col, cmd, mode).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match real_main(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
