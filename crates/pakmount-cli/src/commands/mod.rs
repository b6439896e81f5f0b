//! Subcommand handlers

pub mod keys;
pub mod provision;
pub mod scan;

use pakmount_keys::{HttpKeyProvider, KeyProviderConfig, KeyStore};
use tracing::info;

/// Fetch keys from `endpoint`, or from the environment configuration
pub async fn fetch_key_store(endpoint: Option<String>) -> anyhow::Result<KeyStore> {
    let mut config = KeyProviderConfig::from_env();
    if let Some(endpoint) = endpoint {
        config.endpoint = endpoint;
    }
    info!("Using key endpoint {}", config.endpoint);

    let provider = HttpKeyProvider::new(config)?;
    let mut store = KeyStore::new();
    store.fetch_keys(&provider).await?;
    Ok(store)
}
