//! Mounting and asset resolution for collections of encrypted pak archives.
//!
//! A [`PakSession`] fetches archive keys, opens every archive in a
//! directory through a [`Decoder`] and merges their listings into one
//! [`FileIndex`]. Assets are then resolved by bare name: matching entries
//! are grouped by extension, bundled (main descriptor with optional bulk
//! data, or each variant on its own) and decoded.
//!
//! Parsing the archive container and package contents is left to the
//! decoding library behind the [`Decoder`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use pakmount::{PakSession, SessionConfig};
//! use pakmount_keys::{HttpKeyProvider, KeyProviderConfig};
//!
//! # async fn example(decoder: impl pakmount::Decoder) -> Result<(), Box<dyn std::error::Error>> {
//! let keys = HttpKeyProvider::new(KeyProviderConfig::from_env())?;
//! let mut session = PakSession::new(SessionConfig::default(), decoder, keys);
//!
//! let report = session.mount("/games/Content/Paks").await?;
//! println!("mounted {}, failed {}", report.mounted, report.failed);
//!
//! let pixels = session.extract_texture("T_Placeholder")?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod decoder;
pub mod error;
pub mod index;
pub mod mount;
pub mod provision;
pub mod resolve;
pub mod session;
pub mod texture;

pub use config::{ResourceConfig, SessionConfig};
pub use decoder::{ArchiveReader, Decoder, DecoderError, Package, PackageData, PackageExport};
pub use error::{PakError, Result};
pub use index::{ArchiveId, FileEntry, FileIndex};
pub use mount::{ArchiveHandle, ArchiveMounter, ArchiveSet, MountReport, MountState};
pub use provision::{GlobalResources, ResourceProvisioner};
pub use resolve::{AssetResolver, Bundle, ExtensionGroups, RawFile, ResolvedObject};
pub use session::PakSession;
pub use texture::TextureExtractor;
