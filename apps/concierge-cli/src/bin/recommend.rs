use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use concierge_core::config::resolve_with_base;
use concierge_recommend::{Catalog, Recommender};

/// Rank the catalog against a free-text query and print JSON.
#[derive(Parser)]
#[command(name = "concierge-recommend")]
#[command(version)]
struct Args {
    /// What the user is looking for
    query: String,

    /// Number of results (defaults to recommender.top_k)
    #[arg(long)]
    k: Option<usize>,

    #[arg(long, env = "CONCIERGE_CONFIG_DIR", default_value = ".")]
    config_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (config, settings) = concierge_cli::bootstrap(&args.config_dir)?;
    let catalog = match &settings.recommender.catalog_path {
        Some(p) => Catalog::from_json_file(&resolve_with_base(config.base_dir(), p))?,
        None => Catalog::seeded(),
    };
    let recommender = Recommender::from_settings(&settings.recommender, catalog, None);
    let results = recommender.recommend(&args.query, args.k.unwrap_or(settings.recommender.top_k)).await;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
