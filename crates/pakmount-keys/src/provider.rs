//! Key provider abstraction and the HTTP implementation
//!
//! A provider performs a single fetch that yields one main key plus any
//! number of archive-specific keys. [`KeyStore`](crate::KeyStore) consumes
//! the resulting [`KeyBundle`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Once;
use tracing::{debug, warn};

use crate::config::KeyProviderConfig;
use crate::error::{KeyError, Result};
use crate::key::AesKey;

/// Keys returned by one provider fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyBundle {
    /// Game build the keys belong to, when the service reports it
    pub build: Option<String>,
    /// Fallback key for archives without a dedicated entry
    pub main_key: Option<AesKey>,
    /// `(archive file name, key)` pairs, in service order
    pub archive_keys: Vec<(String, AesKey)>,
}

impl KeyBundle {
    /// Create a bundle with only a main key
    pub fn with_main_key(main_key: AesKey) -> Self {
        Self {
            main_key: Some(main_key),
            ..Default::default()
        }
    }

    /// Add an archive-specific key
    #[must_use]
    pub fn with_archive_key(mut self, archive: impl Into<String>, key: AesKey) -> Self {
        self.archive_keys.push((archive.into(), key));
        self
    }

    /// Parse a key service response body
    ///
    /// Only a body that is not valid JSON of the expected shape is an error.
    /// Keys that do not parse are logged and left out, so archives they
    /// belonged to fall back to the main key.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let parsed: KeyResponse = serde_json::from_slice(body)?;
        Ok(parsed.data.into_bundle())
    }
}

/// Source of archive keys
#[async_trait]
pub trait KeyProvider: Send + Sync {
    /// Fetch the current key bundle
    async fn fetch(&self) -> Result<KeyBundle>;
}

/// Provider that always returns the same bundle
///
/// Useful for offline use when keys are already known.
#[derive(Debug, Clone, Default)]
pub struct StaticKeyProvider {
    bundle: KeyBundle,
}

impl StaticKeyProvider {
    /// Create a provider returning `bundle` on every fetch
    pub fn new(bundle: KeyBundle) -> Self {
        Self { bundle }
    }
}

#[async_trait]
impl KeyProvider for StaticKeyProvider {
    async fn fetch(&self) -> Result<KeyBundle> {
        Ok(self.bundle.clone())
    }
}

#[derive(Debug, Deserialize)]
struct KeyResponse {
    data: KeyResponseData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyResponseData {
    build: Option<String>,
    main_key: Option<String>,
    #[serde(default)]
    dynamic_keys: Vec<DynamicKeyEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DynamicKeyEntry {
    pak_filename: String,
    key: String,
}

fn parse_key(source: &str, hex: &str) -> Option<AesKey> {
    match AesKey::from_hex(hex) {
        Ok(key) => Some(key),
        Err(e) => {
            warn!("Ignoring invalid key for {}: {}", source, e);
            None
        }
    }
}

impl KeyResponseData {
    fn into_bundle(self) -> KeyBundle {
        let main_key = self
            .main_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .and_then(|k| parse_key("main key", k));

        let archive_keys = self
            .dynamic_keys
            .into_iter()
            .filter_map(|entry| {
                let key = parse_key(&entry.pak_filename, &entry.key)?;
                Some((entry.pak_filename, key))
            })
            .collect();

        KeyBundle {
            build: self.build,
            main_key,
            archive_keys,
        }
    }
}

static CRYPTO_PROVIDER: Once = Once::new();

/// Install the ring crypto provider for rustls exactly once
pub(crate) fn ensure_crypto_provider() {
    CRYPTO_PROVIDER.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Key provider backed by an HTTP JSON endpoint
pub struct HttpKeyProvider {
    client: Client,
    config: KeyProviderConfig,
}

impl HttpKeyProvider {
    /// Create a new HTTP key provider
    pub fn new(config: KeyProviderConfig) -> Result<Self> {
        ensure_crypto_provider();
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { client, config })
    }

    /// The endpoint this provider queries
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[async_trait]
impl KeyProvider for HttpKeyProvider {
    async fn fetch(&self) -> Result<KeyBundle> {
        debug!("Key request URL: {}", self.config.endpoint);

        let response = self.client.get(&self.config.endpoint).send().await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.bytes().await?;
                KeyBundle::from_json(&body)
            }
            status => Err(KeyError::HttpStatus(status)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MAIN: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";
    const DYN: &str = "2222222222222222222222222222222222222222222222222222222222222222";

    #[test]
    fn test_response_conversion() {
        let json = format!(
            r#"{{"status":200,"data":{{"build":"++Fortnite+Release-16.00","mainKey":"{MAIN}","dynamicKeys":[{{"pakFilename":"pakchunk1001-WindowsClient.pak","pakGuid":"ABC","key":"{DYN}"}}]}}}}"#
        );
        let parsed: KeyResponse = serde_json::from_str(&json).unwrap();
        let bundle = parsed.data.into_bundle();

        assert_eq!(bundle.build.as_deref(), Some("++Fortnite+Release-16.00"));
        assert_eq!(bundle.main_key, Some(AesKey::from_hex(MAIN).unwrap()));
        assert_eq!(
            bundle.archive_keys,
            vec![(
                "pakchunk1001-WindowsClient.pak".to_string(),
                AesKey::from_hex(DYN).unwrap()
            )]
        );
    }

    #[test]
    fn test_missing_dynamic_keys() {
        let json = format!(r#"{{"data":{{"mainKey":"{MAIN}"}}}}"#);
        let parsed: KeyResponse = serde_json::from_str(&json).unwrap();
        let bundle = parsed.data.into_bundle();
        assert!(bundle.archive_keys.is_empty());
        assert!(bundle.main_key.is_some());
    }

    #[test]
    fn test_bad_keys_are_skipped() {
        let json = format!(
            r#"{{"data":{{"mainKey":"{MAIN}","dynamicKeys":[{{"pakFilename":"odd.pak","key":""}},{{"pakFilename":"bad.pak","key":"nothex"}},{{"pakFilename":"good.pak","key":"{DYN}"}}]}}}}"#
        );
        let bundle = KeyBundle::from_json(json.as_bytes()).unwrap();

        assert_eq!(bundle.main_key, Some(AesKey::from_hex(MAIN).unwrap()));
        assert_eq!(
            bundle.archive_keys,
            vec![("good.pak".to_string(), AesKey::from_hex(DYN).unwrap())]
        );
    }

    #[test]
    fn test_bad_main_key_is_skipped() {
        let json = format!(
            r#"{{"data":{{"mainKey":"0x1234","dynamicKeys":[{{"pakFilename":"good.pak","key":"{DYN}"}}]}}}}"#
        );
        let bundle = KeyBundle::from_json(json.as_bytes()).unwrap();

        assert_eq!(bundle.main_key, None);
        assert_eq!(bundle.archive_keys.len(), 1);
    }

    #[test]
    fn test_from_json_rejects_wrong_shape() {
        assert!(matches!(
            KeyBundle::from_json(br#"{"status":200}"#),
            Err(KeyError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_static_provider() {
        let key = AesKey::from_hex(MAIN).unwrap();
        let provider = StaticKeyProvider::new(KeyBundle::with_main_key(key));
        let bundle = provider.fetch().await.unwrap();
        assert_eq!(bundle.main_key, Some(key));
    }
}
