use std::path::Path;

use anyhow::Result;
use clap::Args;

use querysync_core::query::QueryParams;

use crate::config::AppConfig;

#[derive(Args)]
pub struct DecodeArgs {
    /// Tracked keys, comma separated
    #[arg(long, value_delimiter = ',')]
    keys: Vec<String>,

    /// Take tracked keys from a configured page
    #[arg(long)]
    page: Option<String>,

    /// Print as a JSON object
    #[arg(long)]
    json: bool,

    /// Query string or full href
    search: String,
}

pub fn run(args: DecodeArgs, config_path: Option<&Path>) -> Result<()> {
    let config = AppConfig::load(config_path)?;
    let keys = config.resolve_keys(&args.keys, args.page.as_deref())?;
    let (_, search, _) = querysync_core::location::split_href(&args.search);
    // A bare query without `?` is not an href.
    let search = if args.search.contains('?') {
        search
    } else {
        args.search.as_str()
    };

    let params = QueryParams::parse(search);
    let tracked = keys.extract(&params);
    for (key, _) in params.iter().filter(|(k, _)| !keys.contains(k)) {
        tracing::debug!(key, "untracked parameter ignored");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tracked)?);
    } else {
        for (key, value) in tracked.iter() {
            println!("{key}={value}");
        }
    }
    Ok(())
}
