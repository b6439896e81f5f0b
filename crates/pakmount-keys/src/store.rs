//! Per-archive key storage with a fallback key

use std::collections::HashMap;
use tracing::info;

use crate::error::Result;
use crate::key::AesKey;
use crate::provider::{KeyBundle, KeyProvider};

/// Archive keys keyed by archive file name, plus one fallback key
#[derive(Debug, Clone, Default)]
pub struct KeyStore {
    /// Fallback for archives without an explicit entry
    main_key: Option<AesKey>,
    /// Archive file name (e.g. `pakchunk10-WindowsClient.pak`) to key
    archive_keys: HashMap<String, AesKey>,
}

impl KeyStore {
    /// Create an empty key store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from an already fetched bundle
    pub fn from_bundle(bundle: KeyBundle) -> Self {
        let mut store = Self::new();
        store.replace(bundle);
        store
    }

    /// Fetch keys from `provider`, replacing everything cached so far
    ///
    /// Provider failures are returned unchanged and leave the store as it was.
    /// Returns the number of keys held afterwards.
    pub async fn fetch_keys(&mut self, provider: &dyn KeyProvider) -> Result<usize> {
        info!("Fetching archive keys");
        let bundle = provider.fetch().await?;
        self.replace(bundle);
        info!("Fetched {} archive keys", self.len());
        Ok(self.len())
    }

    fn replace(&mut self, bundle: KeyBundle) {
        self.main_key = bundle.main_key;
        self.archive_keys = bundle.archive_keys.into_iter().collect();
    }

    /// Key for `archive_filename`, falling back to the main key
    pub fn lookup(&self, archive_filename: &str) -> Option<&AesKey> {
        self.archive_keys
            .get(archive_filename)
            .or(self.main_key.as_ref())
    }

    /// The fallback key, if one was fetched
    pub fn main_key(&self) -> Option<&AesKey> {
        self.main_key.as_ref()
    }

    /// Archive-specific keys
    pub fn archive_keys(&self) -> &HashMap<String, AesKey> {
        &self.archive_keys
    }

    /// Number of keys, counting the fallback key
    pub fn len(&self) -> usize {
        self.archive_keys.len() + usize::from(self.main_key.is_some())
    }

    /// Whether no keys are held
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::KeyError;
    use crate::provider::StaticKeyProvider;
    use async_trait::async_trait;
    use reqwest::StatusCode;

    fn key(byte: u8) -> AesKey {
        AesKey::new([byte; 32])
    }

    struct FailingProvider;

    #[async_trait]
    impl KeyProvider for FailingProvider {
        async fn fetch(&self) -> Result<KeyBundle> {
            Err(KeyError::HttpStatus(StatusCode::BAD_GATEWAY))
        }
    }

    #[test]
    fn test_lookup_prefers_archive_key() {
        let store = KeyStore::from_bundle(
            KeyBundle::with_main_key(key(1)).with_archive_key("special.pak", key(2)),
        );

        assert_eq!(store.lookup("special.pak"), Some(&key(2)));
        assert_eq!(store.lookup("other.pak"), Some(&key(1)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_lookup_without_fallback() {
        let store = KeyStore::from_bundle(KeyBundle::default().with_archive_key("a.pak", key(3)));
        assert_eq!(store.lookup("a.pak"), Some(&key(3)));
        assert_eq!(store.lookup("b.pak"), None);
    }

    #[tokio::test]
    async fn test_fetch_replaces_previous_keys() {
        let mut store = KeyStore::new();

        let first = StaticKeyProvider::new(
            KeyBundle::with_main_key(key(1)).with_archive_key("a.pak", key(2)),
        );
        assert_eq!(store.fetch_keys(&first).await.unwrap(), 2);

        let second = StaticKeyProvider::new(KeyBundle::default().with_archive_key("b.pak", key(3)));
        assert_eq!(store.fetch_keys(&second).await.unwrap(), 1);

        assert!(store.main_key().is_none());
        assert!(store.lookup("a.pak").is_none());
        assert_eq!(store.lookup("b.pak"), Some(&key(3)));
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let mut store = KeyStore::from_bundle(KeyBundle::with_main_key(key(9)));
        let err = store.fetch_keys(&FailingProvider).await.unwrap_err();

        assert!(matches!(err, KeyError::HttpStatus(StatusCode::BAD_GATEWAY)));
        assert_eq!(store.main_key(), Some(&key(9)));
    }
}
