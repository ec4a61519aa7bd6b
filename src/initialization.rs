use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::HTTP_TIMEOUT_SECS;
use crate::error_handling::InitializationError;

/// Initializes the global logger at the given level.
pub fn init_logger(level: log::LevelFilter) -> Result<(), InitializationError> {
    env_logger::Builder::new().filter_level(level).try_init()?;
    Ok(())
}

/// Builds the shared HTTP client used for remote lookups and archive downloads.
pub async fn init_client() -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()?;
    Ok(Arc::new(client))
}
