//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands;
use autosign::output::OutputMode;

/// autosign - signed commits for unattended environments
#[derive(Parser, Debug)]
#[command(
    name = "autosign",
    version,
    about = "Create verifiable GPG-signed git commits without prompts",
    long_about = "Create verifiable GPG-signed git commits without prompts.\n\n\
                  The private key and its passphrase come from the environment\n\
                  (GPG_PRIVATE_KEY, PASSPHRASE); autosign imports the key,\n\
                  preseeds gpg-agent and signs the commit in one run."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Top-level subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a signed commit from staged changes
    Sign {
        /// Commit message
        #[arg(short, long)]
        message: String,

        /// Read the private key from a file instead of GPG_PRIVATE_KEY
        #[arg(long, value_name = "PATH")]
        key_file: Option<PathBuf>,

        /// Target repository directory (default: REPO_DIR or current dir)
        #[arg(long, value_name = "DIR")]
        repo: Option<PathBuf>,

        /// Use this GnuPG home directory (default: $GNUPGHOME)
        #[arg(long, value_name = "DIR")]
        gnupg_home: Option<PathBuf>,

        /// Stage these paths before committing (repeatable)
        #[arg(long = "stage", value_name = "PATH")]
        stage: Vec<String>,
    },

    /// Show version
    Version,
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match cli.command {
        Some(Command::Sign {
            message,
            key_file,
            repo,
            gnupg_home,
            stage,
        }) => commands::sign(&message, key_file, repo, gnupg_home, &stage, output_mode),
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION")
                    })
                );
            } else {
                println!("autosign v{}", env!("CARGO_PKG_VERSION"));
            }
            Ok(())
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("autosign v{}", env!("CARGO_PKG_VERSION"));
                println!("Use --help for usage");
            }
            Ok(())
        },
    }
}
