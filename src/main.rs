// src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use uplift::commands::{UpdateRequest, cmd_update};

#[derive(Parser)]
#[command(name = "uplift")]
#[command(author, version, about = "Package update orchestrator with safe, reinstall, and pinned-version policies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Update packages across workspace projects
    Update {
        /// Package id to update (default: all installed packages)
        id: Option<String>,

        /// Exact version or one of: highest, highest-minor, highest-patch, lowest
        #[arg(short, long)]
        version: Option<String>,

        /// Only update the named project
        #[arg(short, long)]
        project: Option<String>,

        /// Restrict updates to patch-level changes
        #[arg(long)]
        safe: bool,

        /// Uninstall and reinstall instead of updating
        #[arg(long)]
        reinstall: bool,

        /// Allow prerelease versions
        #[arg(long)]
        prerelease: bool,

        /// Report planned actions without executing them
        #[arg(long)]
        dry_run: bool,

        /// Workspace manifest path
        #[arg(short, long, default_value = "uplift.toml")]
        workspace: String,

        /// Package index path
        #[arg(short, long, default_value = "index.toml")]
        index: String,
    },
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Update {
            id,
            version,
            project,
            safe,
            reinstall,
            prerelease,
            dry_run,
            workspace,
            index,
        }) => cmd_update(
            &workspace,
            &index,
            UpdateRequest {
                id,
                version,
                project,
                safe,
                reinstall,
                prerelease,
                dry_run,
            },
        ),
        None => {
            // No command provided, show help
            println!("Uplift v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'uplift --help' for usage information");
            Ok(())
        }
    }
}
