use clap::{Parser, Subcommand};
use notesync::commands::*;
use notesync::core::{error::Result, print_error, settings::ProviderKind};
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "notesync")]
#[command(about = "Synchronize note repositories across local, git and s3 backends")]
#[command(version = "0.1.0")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a repository profile
    Configure {
        /// Provider backend (local or git)
        #[arg(long, value_enum)]
        provider: CliProvider,
        /// Local working directory for the notes
        #[arg(long)]
        path: PathBuf,
        /// Remote URL (git profiles)
        #[arg(long)]
        remote: Option<String>,
        /// Branch to track (git profiles, defaults to main)
        #[arg(long)]
        branch: Option<String>,
    },
    /// Open the configured repository, creating or cloning it if needed
    Open,
    /// Show the repository status snapshot
    Status,
    /// Show per-file history, newest first
    History {
        /// File path relative to the repository root
        file: String,
    },
    /// Show a file's content at a revision
    Show {
        /// Revision hash
        hash: String,
        /// File path relative to the repository root
        file: String,
    },
    /// Show the diff between two revisions of a file
    Diff {
        /// Older revision hash
        hash_a: String,
        /// Newer revision hash
        hash_b: String,
        /// File path relative to the repository root
        file: String,
    },
    /// Fetch remote state without merging
    Fetch,
    /// Pull remote changes into the working directory
    Pull,
    /// Push local changes to the remote
    Push,
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum CliProvider {
    Local,
    Git,
}

impl From<CliProvider> for ProviderKind {
    fn from(provider: CliProvider) -> Self {
        match provider {
            CliProvider::Local => ProviderKind::Local,
            CliProvider::Git => ProviderKind::Git,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let result = match cli.command {
        Commands::Configure {
            provider,
            path,
            remote,
            branch,
        } => execute_configure(provider.into(), path, remote, branch),
        Commands::Open => execute_open(),
        Commands::Status => execute_status(),
        Commands::History { file } => execute_history(file),
        Commands::Show { hash, file } => execute_show(hash, file),
        Commands::Diff {
            hash_a,
            hash_b,
            file,
        } => execute_diff(hash_a, hash_b, file),
        Commands::Fetch => execute_fetch(),
        Commands::Pull => execute_pull(),
        Commands::Push => execute_push(),
    };

    if let Err(e) = result {
        print_error(&e.to_string());
        std::process::exit(1);
    }

    Ok(())
}
