mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "worldclock",
    version,
    about = "Digital world clocks for your terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the clocks (default when no subcommand is given)
    Run(RunArgs),
    /// Create the default configuration file
    Init,
    /// Query a network time server once and print the clock offset
    Sync(SyncArgs),
    /// Check the configuration and environment
    Doctor,
    /// List timezone names, optionally filtered
    Zones {
        /// Case-insensitive substring to filter by (e.g. "america")
        filter: Option<String>,
    },
}

#[derive(Args, Default)]
pub struct RunArgs {
    /// Read configuration from this file instead of ~/.config/worldclock/config.toml
    #[arg(long)]
    config: Option<PathBuf>,
    /// Skip the startup network time sync
    #[arg(long)]
    no_sync: bool,
}

#[derive(Args)]
pub struct SyncArgs {
    /// Time server hostname (defaults to the configured server)
    #[arg(long)]
    server: Option<String>,
    /// Time server UDP port
    #[arg(long)]
    port: Option<u16>,
    /// Reply timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => commands::run::execute(&RunArgs::default()),
        Some(Commands::Run(args)) => commands::run::execute(&args),
        Some(Commands::Init) => commands::init::execute(),
        Some(Commands::Sync(args)) => commands::sync::execute(&args),
        Some(Commands::Doctor) => commands::doctor::execute(),
        Some(Commands::Zones { filter }) => commands::zones::execute(filter.as_deref()),
    }
}
