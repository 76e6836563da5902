mod output;
mod pipeline;
mod sources;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::pipeline::RunOptions;

#[derive(Debug, Parser)]
#[command(name = "clinicmap")]
#[command(about = "Build the clinic-by-ZIP-code distance lookup from the Distance Matrix API")]
struct Cli {
    /// Skip this many in-state regions before processing (overrides CLINICMAP_REGION_OFFSET)
    #[arg(long)]
    offset: Option<usize>,

    /// Process at most this many regions (overrides CLINICMAP_REGION_LIMIT)
    #[arg(long)]
    limit: Option<usize>,

    /// Read the clinic list from a local JSON file instead of CLINICMAP_LOCATIONS_URL
    #[arg(long)]
    locations_path: Option<PathBuf>,

    /// Directory the lookup files are written to (overrides CLINICMAP_OUTPUT_DIR)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Load and validate inputs, log the planned requests, and exit without calling the API
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn into_options(self, config: &clinicmap_core::AppConfig) -> RunOptions {
        RunOptions {
            offset: self.offset.unwrap_or(config.region_offset),
            limit: self.limit.or(config.region_limit),
            locations_path: self.locations_path,
            output_dir: self.output_dir.unwrap_or_else(|| config.output_dir.clone()),
            dry_run: self.dry_run,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = clinicmap_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::debug!(?config, "loaded configuration");

    let options = cli.into_options(&config);
    pipeline::run(&config, &options).await
}
