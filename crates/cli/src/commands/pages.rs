use std::path::Path;

use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::config::AppConfig;

#[derive(Args)]
pub struct PagesArgs {
    /// Write the built-in pages to the config file if none exists
    #[arg(long)]
    init: bool,
}

pub fn run(args: PagesArgs, config_path: Option<&Path>) -> Result<()> {
    let config = if args.init {
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(AppConfig::config_path);
        if path.exists() {
            anyhow::bail!("config already exists at {}", path.display());
        }
        let config = AppConfig::default();
        config.save(&path)?;
        info!(path = %path.display(), "Config written");
        config
    } else {
        AppConfig::load(config_path)?
    };

    if config.pages.is_empty() {
        println!("No pages configured.");
        return Ok(());
    }

    println!("{:<16} {:<32} {:<8} KEYS", "NAME", "PATH", "MODE");
    println!("{}", "-".repeat(80));
    for page in &config.pages {
        println!(
            "{:<16} {:<32} {:<8} {}",
            page.name,
            page.path,
            page.mode().to_string(),
            page.keys.join(",")
        );
    }
    Ok(())
}
