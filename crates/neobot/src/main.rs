use std::sync::Arc;

use neobot_core::{config::Config, ports::AstronomyApi};
use neobot_nasa::NasaClient;

#[tokio::main]
async fn main() -> Result<(), neobot_core::Error> {
    neobot_core::logging::init("neobot")?;

    let cfg = Arc::new(Config::load()?);
    tracing::debug!(?cfg, "config");

    let api: Arc<dyn AstronomyApi> = Arc::new(NasaClient::from_config(&cfg)?);

    neobot_telegram::router::run_polling(cfg, api)
        .await
        .map_err(|e| neobot_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
