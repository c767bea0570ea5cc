use coinfeed_core::CoreConfig;
use coinfeed_market_data::Asset;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `COINFEED_LOG_FORMAT=json` switches to
/// structured output; `RUST_LOG` sets the filter.
pub fn init_tracing() {
    let log_format = std::env::var("COINFEED_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Assets named on the command line, else the configured list.
pub fn requested_assets(arg: Option<&str>, config: &CoreConfig) -> anyhow::Result<Vec<Asset>> {
    match arg {
        Some(list) if !list.trim().is_empty() => Ok(Asset::parse_list(list)?),
        _ => Ok(config.assets.clone()),
    }
}
