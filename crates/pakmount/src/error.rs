//! Error types for mounting and resolution

use pakmount_keys::KeyError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::decoder::DecoderError;

/// Errors returned by session operations
///
/// Precondition failures (`NotMounted`, `NoArchives`, `NoDecoders`,
/// `MissingArgument`, `AlreadyMounted`) always abort the call. Failures of a
/// single archive or a single decode are recovered internally and only show
/// up here when nothing else could be produced.
#[derive(Debug, Error)]
pub enum PakError {
    /// Configured directory or referenced path does not exist
    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),

    /// `mount` was called on an already mounted session
    #[error("Archives are already mounted")]
    AlreadyMounted,

    /// Resolution attempted before `mount`
    #[error("Archives are not mounted")]
    NotMounted,

    /// Mount found no archive files
    #[error("No archives were found in the mounted directory")]
    NoArchives,

    /// Mount could not open any archive
    #[error("No archive could be opened")]
    NoDecoders,

    /// No index entry matches the requested name
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// The decoded object is not of the texture export kind
    #[error("Asset is not a texture: {0}")]
    NotTextureable(String),

    /// The decoder failed on specific bytes
    #[error("Failed to decode {name}: {source}")]
    DecodeFailure {
        /// Asset or entry being decoded
        name: String,
        /// Decoder-reported cause
        #[source]
        source: DecoderError,
    },

    /// A required argument was empty
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    /// Key fetch failed
    #[error("Key error: {0}")]
    Keys(#[from] KeyError),

    /// Filesystem failure (directory listing, provisioning)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, PakError>;
