mod commands;
mod config;
mod output;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "querysync",
    version,
    about = "Keep dashboard filter state and URL query strings in step"
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = cli.config.as_deref();
    match cli.command {
        commands::Command::Encode(args) => commands::encode::run(args, config),
        commands::Command::Decode(args) => commands::decode::run(args, config),
        commands::Command::Replay(args) => commands::replay::run(args, config),
        commands::Command::Pages(args) => commands::pages::run(args, config),
    }
}
