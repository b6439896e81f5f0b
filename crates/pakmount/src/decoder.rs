//! Decoder collaborator interface
//!
//! Parsing of the archive container and of package contents is done by an
//! external decoding library. This module fixes the contract that library
//! has to fulfil:
//!
//! - [`Decoder::open`]: archive base path + key to an [`ArchiveReader`]
//! - [`ArchiveReader::list_files`] / [`ArchiveReader::read_file`]
//! - [`Decoder::parse_package`]: main bytes (+ optional bulk bytes) to a [`Package`]
//! - [`Package::decode_texture`]: pixel buffer for texture packages

use pakmount_keys::AesKey;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::path::Path;
use thiserror::Error;

/// Failure reported by the decoding library
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DecoderError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl DecoderError {
    /// Create an error from a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error
    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// One opened archive
pub trait ArchiveReader: Send + Sync {
    /// Every logical path stored in the archive, in archive order
    fn list_files(&self) -> Vec<String>;

    /// Raw bytes of the entry at `path`
    fn read_file(&self, path: &str) -> Result<Vec<u8>, DecoderError>;
}

/// A parsed package
pub trait Package {
    /// Structured form of the package
    fn data(&self) -> Result<PackageData, DecoderError>;

    /// Decode the package's texture into a pixel buffer
    fn decode_texture(&self) -> Result<Vec<u8>, DecoderError>;
}

/// Entry points of the decoding library
pub trait Decoder: Send + Sync {
    /// Archive handle type
    type Archive: ArchiveReader;
    /// Parsed package type
    type Package: Package;

    /// Open the archive at `base_path` (path without extension) with `key`
    fn open(&self, base_path: &Path, key: &AesKey) -> Result<Self::Archive, DecoderError>;

    /// Parse a package from its main descriptor and optional bulk data
    fn parse_package(
        &self,
        main: &[u8],
        bulk: Option<&[u8]>,
    ) -> Result<Self::Package, DecoderError>;
}

/// Structured package contents as exposed by the decoder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageData {
    /// Exported objects, in package order
    #[serde(default)]
    pub exports: Vec<PackageExport>,
}

impl PackageData {
    /// Export type of the first export
    pub fn export_type(&self) -> Option<&str> {
        self.exports.first().map(|e| e.export_type.as_str())
    }

    /// Parse decoder JSON output
    pub fn from_json(bytes: &[u8]) -> Result<Self, DecoderError> {
        serde_json::from_slice(bytes)
            .map_err(|e| DecoderError::with_source("invalid package data", e))
    }
}

/// A single export of a package
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageExport {
    /// Class of the export, e.g. `Texture2D`
    pub export_type: String,
    /// Remaining export fields, uninterpreted
    #[serde(flatten)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl PackageExport {
    /// Create an export with no properties
    pub fn new(export_type: impl Into<String>) -> Self {
        Self {
            export_type: export_type.into(),
            properties: serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_package_data_from_json() {
        let json =
            br#"{"exports":[{"export_type":"Texture2D","SRGB":true},{"export_type":"Other"}]}"#;
        let data = PackageData::from_json(json).unwrap();

        assert_eq!(data.exports.len(), 2);
        assert_eq!(data.export_type(), Some("Texture2D"));
        assert_eq!(
            data.exports[0].properties.get("SRGB"),
            Some(&serde_json::Value::Bool(true))
        );
    }

    #[test]
    fn test_package_data_invalid() {
        let err = PackageData::from_json(b"[1,2").unwrap_err();
        assert_eq!(err.message(), "invalid package data");
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn test_empty_exports() {
        let data = PackageData::from_json(b"{}").unwrap();
        assert_eq!(data.export_type(), None);
    }
}
