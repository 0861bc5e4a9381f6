use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "hubsync")]
#[command(about = "Check and download missing or corrupted files from Hugging Face Hub")]
#[command(version)]
struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, global = true, env = "HUBSYNC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download missing or corrupted files of a repository
    Sync {
        #[command(flatten)]
        selection: cli::SelectionArgs,
        /// Skip authentication check
        #[arg(long)]
        no_auth: bool,
        /// Number of files to download at once
        #[arg(short, long, default_value_t = 1)]
        jobs: usize,
        /// Only print the final summary
        #[arg(short, long)]
        quiet: bool,
    },
    /// Show which files would be downloaded, without downloading
    Plan {
        #[command(flatten)]
        selection: cli::SelectionArgs,
    },
    /// Print the SHA-256 of local files
    Hash {
        /// Files to hash
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show the account the access token belongs to
    Whoami {
        /// Hugging Face token to check
        #[arg(long)]
        token: Option<String>,
    },
    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Sync {
            selection,
            no_auth,
            jobs,
            quiet,
        } => {
            cli::sync::run(
                config_path,
                cli::sync::SyncArgs {
                    selection,
                    no_auth,
                    jobs,
                    quiet,
                },
            )
            .await
        }
        Commands::Plan { selection } => cli::plan::run(config_path, selection).await,
        Commands::Hash { files } => cli::hash::run(files),
        Commands::Whoami { token } => cli::whoami::run(config_path, token).await,
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => cli::config::show(config_path),
            ConfigCommands::Path => cli::config::path(config_path),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n{}", hubsync::core::format_error_with_help(&e));
            ExitCode::FAILURE
        }
    }
}
