use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use smooth_migrate::commands::{self, CorrectionTarget};
use smooth_migrate::config;
use smooth_migrate::constants::CONFIG_FILENAME;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long, default_value = CONFIG_FILENAME, global = true)]
    config_file: String,

    /// Enable verbose output (info level)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress all non-essential output (error level only)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Enable debug output (debug level)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
struct MakeArgs {
    /// Regenerate the last migration: `<table>[.offset]` or `all[.offset]`
    #[arg(long)]
    correct: Option<String>,

    /// Print the generated migrations without writing anything
    #[arg(long)]
    dry_run: bool,

    #[command(flatten)]
    directory_args: config::DirectoryArgs,

    #[command(flatten)]
    history_args: config::HistoryArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate migrations for changed schemas
    Make(MakeArgs),

    /// Create a schema definition for a table
    Create {
        /// Table name, prompted for when omitted
        table: Option<String>,

        #[command(flatten)]
        directory_args: config::DirectoryArgs,
    },

    /// Create the migration history repository
    Install {
        #[command(flatten)]
        history_args: config::HistoryArgs,
    },

    /// Show recorded migrations
    Status {
        /// Only show one schema, e.g. `posts` or `PostsSchema`
        schema: Option<String>,

        #[command(flatten)]
        history_args: config::HistoryArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    initialize_logging(&cli);
    tokio::select! {
        result = run_main(cli) => result,
        _ = wait_for_shutdown_signal() => {
            info!("Received shutdown signal, stopping");
            Ok(())
        }
    }
}

async fn wait_for_shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn initialize_logging(cli: &Cli) {
    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn" // default level
    };

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level)
    };

    fmt().with_env_filter(filter).with_target(false).init();
}

async fn run_main(cli: Cli) -> Result<()> {
    let (file_config, root_dir) = config::load_config(&cli.config_file)?;

    let cli_config = match &cli.command {
        Commands::Make(args) => config::ConfigInput {
            directories: Some(args.directory_args.clone().into()),
            history: Some(args.history_args.clone().into()),
            ..Default::default()
        },
        Commands::Create { directory_args, .. } => config::ConfigInput {
            directories: Some(directory_args.clone().into()),
            ..Default::default()
        },
        Commands::Install { history_args } | Commands::Status { history_args, .. } => {
            config::ConfigInput {
                history: Some(history_args.clone().into()),
                ..Default::default()
            }
        }
    };

    let config = config::ConfigBuilder::new()
        .with_file(file_config)
        .with_cli_args(cli_config)
        .resolve()?;

    match &cli.command {
        Commands::Make(args) => {
            let correct = args
                .correct
                .as_deref()
                .map(str::parse::<CorrectionTarget>)
                .transpose()?;
            info!("Generating migrations");
            commands::cmd_make(&config, &root_dir, correct.as_ref(), args.dry_run).await
        }
        Commands::Create { table, .. } => {
            commands::cmd_create(&config, &root_dir, table.as_deref()).await
        }
        Commands::Install { .. } => commands::cmd_install(&config, &root_dir).await,
        Commands::Status { schema, .. } => {
            commands::cmd_status(&config, &root_dir, schema.as_deref()).await
        }
    }
}
