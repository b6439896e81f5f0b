//! Key acquisition for encrypted pak archives
//!
//! This crate provides:
//! - [`AesKey`], a parsed 256-bit archive key
//! - [`KeyStore`], keys by archive file name with a fallback main key
//! - [`KeyProvider`], the seam for fetching a [`KeyBundle`], with an HTTP
//!   implementation ([`HttpKeyProvider`]) and a fixed one
//!   ([`StaticKeyProvider`])
//!
//! # Example
//!
//! ```rust,no_run
//! use pakmount_keys::{HttpKeyProvider, KeyProviderConfig, KeyStore};
//!
//! # async fn example() -> Result<(), pakmount_keys::KeyError> {
//! let provider = HttpKeyProvider::new(KeyProviderConfig::from_env())?;
//! let mut store = KeyStore::new();
//! store.fetch_keys(&provider).await?;
//!
//! if let Some(key) = store.lookup("pakchunk0-WindowsClient.pak") {
//!     println!("{key}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod key;
pub mod provider;
pub mod store;

pub use config::KeyProviderConfig;
pub use error::{KeyError, Result};
pub use key::AesKey;
pub use provider::{HttpKeyProvider, KeyBundle, KeyProvider, StaticKeyProvider};
pub use store::KeyStore;
