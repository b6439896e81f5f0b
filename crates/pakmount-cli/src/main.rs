use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

use pakmount_cli::{OutputFormat, commands};

#[derive(Parser)]
#[command(
    name = "pakmount",
    about = "Inspect pak archive directories and the keys that unlock them",
    version,
    author
)]
struct Cli {
    /// Set the logging level
    #[arg(short, long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Output format
    #[arg(short = 'o', long, value_enum, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print archive keys
    Keys {
        /// Key service endpoint
        #[arg(long, env = "PAKMOUNT_KEYS_URL")]
        endpoint: Option<String>,
    },

    /// List the archives in a directory and the key each would use
    Scan {
        /// Directory holding the archives
        dir: PathBuf,

        /// Archive file extension
        #[arg(long, default_value = "pak")]
        extension: String,

        /// Key service endpoint
        #[arg(long, env = "PAKMOUNT_KEYS_URL")]
        endpoint: Option<String>,

        /// Do not fetch keys
        #[arg(long)]
        offline: bool,
    },

    /// Copy shared resources next to the working directory
    Provision {
        /// Directory holding the archives and shared resources
        dir: PathBuf,

        /// Working directory to provision into
        #[arg(short, long)]
        working_dir: PathBuf,

        /// Resource files to copy (defaults to global.utoc and global.ucas)
        #[arg(long = "file")]
        files: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Keys { endpoint } => commands::keys::handle(endpoint, cli.format).await?,
        Commands::Scan {
            dir,
            extension,
            endpoint,
            offline,
        } => commands::scan::handle(&dir, &extension, endpoint, offline, cli.format).await?,
        Commands::Provision {
            dir,
            working_dir,
            files,
        } => commands::provision::handle(&dir, working_dir, files)?,
    }

    Ok(())
}
