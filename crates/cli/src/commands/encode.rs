use std::path::Path;

use anyhow::Result;
use clap::Args;

use querysync_core::TrackedState;
use querysync_core::sync::canonical_search;

use crate::config::AppConfig;

#[derive(Args)]
pub struct EncodeArgs {
    /// Tracked keys, comma separated, in URL order
    #[arg(long, value_delimiter = ',')]
    keys: Vec<String>,

    /// Take tracked keys from a configured page
    #[arg(long)]
    page: Option<String>,

    /// Filter values as key=value
    values: Vec<String>,
}

pub fn run(args: EncodeArgs, config_path: Option<&Path>) -> Result<()> {
    let config = AppConfig::load(config_path)?;
    let keys = config.resolve_keys(&args.keys, args.page.as_deref())?;
    let state = parse_assignments(&args.values)?;

    for (key, _) in state.iter().filter(|(k, _)| !keys.contains(k)) {
        tracing::debug!(key, "not tracked, left out of the query string");
    }

    println!("{}", canonical_search(&keys, &state));
    Ok(())
}

pub fn parse_assignments(values: &[String]) -> Result<TrackedState> {
    values
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .ok_or_else(|| anyhow::anyhow!("expected key=value, got: {pair}"))
        })
        .collect()
}
