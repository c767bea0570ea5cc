mod main_lib;

use coinfeed_core::{CoreConfig, MarketDataService, MarketDataServiceTrait};
use main_lib::{init_tracing, requested_assets};

/// Print a JSON market snapshot for the configured assets, or for the
/// comma separated list given as the first argument.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` may set RUST_LOG; config parsing logs its fallbacks.
    dotenvy::dotenv().ok();
    init_tracing();
    let config = CoreConfig::from_env()?;

    let assets = requested_assets(std::env::args().nth(1).as_deref(), &config)?;
    tracing::info!(
        "Fetching snapshot for {} assets at {}",
        assets.len(),
        config.indicator_interval
    );

    let service = MarketDataService::from_config(config);
    let snapshot = service.get_snapshot(&assets).await;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    for (key, status) in service.cache_status() {
        tracing::debug!("cache {} age={}s fresh={}", key, status.age_seconds, status.fresh);
    }
    Ok(())
}
