//! Configuration for the HTTP key provider

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default key service endpoint (hex-formatted AES keys)
pub const DEFAULT_KEYS_URL: &str = "https://fortnite-api.com/v2/aes?keyFormat=hex";

/// Configuration for [`HttpKeyProvider`](crate::HttpKeyProvider)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyProviderConfig {
    /// URL returning the key bundle as JSON
    pub endpoint: String,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Request timeout
    pub request_timeout: Duration,
}

impl Default for KeyProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_KEYS_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl KeyProviderConfig {
    /// Create a configuration for the given endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Create configuration from environment variables
    ///
    /// Reads `PAKMOUNT_KEYS_URL`, `PAKMOUNT_CONNECT_TIMEOUT` and
    /// `PAKMOUNT_REQUEST_TIMEOUT` (seconds). Unset or unparsable values
    /// fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: std::env::var("PAKMOUNT_KEYS_URL").unwrap_or(defaults.endpoint),
            connect_timeout: env_secs("PAKMOUNT_CONNECT_TIMEOUT")
                .unwrap_or(defaults.connect_timeout),
            request_timeout: env_secs("PAKMOUNT_REQUEST_TIMEOUT")
                .unwrap_or(defaults.request_timeout),
        }
    }

    /// Set the request timeout
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the connection timeout
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

fn env_secs(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
