//! Asset resolution
//!
//! Resolves a bare asset name to the archive entries that make up the asset
//! and decodes them. Matches are grouped by extension and bundled:
//!
//! 1. main descriptor without bulk data: decoded alone
//! 2. main descriptor with bulk data: decoded together as one object
//! 3. anything else: every extension group decoded on its own
//!
//! When several entries share an extension (the same asset in more than one
//! archive), the one indexed last is decoded.

use tracing::{debug, warn};

use crate::decoder::{ArchiveReader, Decoder, Package, PackageData};
use crate::error::{PakError, Result};
use crate::index::{FileIndex, logical_name};
use crate::mount::{ArchiveSet, MountState};

/// Bytes of one archive entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    /// Path inside the archive namespace
    pub path: String,
    /// Entry contents, unmodified
    pub data: Vec<u8>,
}

/// Raw files of one asset grouped by extension, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionGroups {
    groups: Vec<(String, Vec<RawFile>)>,
}

impl ExtensionGroups {
    /// Create an empty set of groups
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the group for `extension`
    pub fn insert(&mut self, extension: &str, file: RawFile) {
        if let Some((_, files)) = self.groups.iter_mut().find(|(ext, _)| ext == extension) {
            files.push(file);
        } else {
            self.groups.push((extension.to_string(), vec![file]));
        }
    }

    /// Files with `extension`, in indexing order
    pub fn get(&self, extension: &str) -> Option<&[RawFile]> {
        self.groups
            .iter()
            .find(|(ext, _)| ext == extension)
            .map(|(_, files)| files.as_slice())
    }

    /// Whether a group for `extension` exists
    pub fn contains(&self, extension: &str) -> bool {
        self.get(extension).is_some()
    }

    /// Group keys in first-seen order
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(ext, _)| ext.as_str())
    }

    /// Remove the group for `extension` and return the file that gets decoded
    fn take(&mut self, extension: &str) -> Option<RawFile> {
        let position = self.groups.iter().position(|(ext, _)| ext == extension)?;
        let (_, mut files) = self.groups.remove(position);
        files.pop()
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// How the raw files of a resolved object were combined
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bundle {
    /// Main descriptor decoded alone
    Main,
    /// Main descriptor decoded together with its bulk data
    MainWithBulk,
    /// One group of an ambiguous name, keyed by its extension
    Variant(String),
}

/// A decoded asset together with the bytes it was decoded from
#[derive(Debug)]
pub struct ResolvedObject<P> {
    /// Bundling branch that produced this object
    pub bundle: Bundle,
    /// Raw files by extension, in decode argument order
    pub files: Vec<(String, RawFile)>,
    /// Structured package contents
    pub data: PackageData,
    /// Decoder package state, needed for texture decoding
    pub package: P,
}

impl<P> ResolvedObject<P> {
    /// Raw file for `extension`
    pub fn file(&self, extension: &str) -> Option<&RawFile> {
        self.files
            .iter()
            .find(|(ext, _)| ext == extension)
            .map(|(_, file)| file)
    }
}

/// Read-only resolver over a mounted session
pub struct AssetResolver<'a, D: Decoder> {
    decoder: &'a D,
    state: MountState,
    archives: &'a ArchiveSet<D::Archive>,
    index: &'a FileIndex,
    main_extension: &'a str,
    bulk_extension: &'a str,
}

impl<'a, D: Decoder> AssetResolver<'a, D> {
    pub(crate) fn new(
        decoder: &'a D,
        state: MountState,
        archives: &'a ArchiveSet<D::Archive>,
        index: &'a FileIndex,
        main_extension: &'a str,
        bulk_extension: &'a str,
    ) -> Self {
        Self {
            decoder,
            state,
            archives,
            index,
            main_extension,
            bulk_extension,
        }
    }

    /// Fail unless the session is mounted with at least one opened archive
    pub fn ensure_ready(&self) -> Result<()> {
        if self.state != MountState::Mounted {
            return Err(PakError::NotMounted);
        }
        if self.archives.found().is_empty() {
            return Err(PakError::NoArchives);
        }
        if self.archives.handles().is_empty() {
            return Err(PakError::NoDecoders);
        }
        Ok(())
    }

    /// Read every entry matching `name`, grouped by extension
    ///
    /// Entries that cannot be read are logged and left out.
    pub fn groups(&self, name: &str) -> Result<ExtensionGroups> {
        self.ensure_ready()?;

        if logical_name(name).is_empty() {
            return Err(PakError::AssetNotFound(name.to_string()));
        }

        let entries = self.index.lookup(name);
        if entries.is_empty() {
            return Err(PakError::AssetNotFound(name.to_string()));
        }

        let mut groups = ExtensionGroups::new();
        for entry in entries {
            let Some(archive) = self.archives.get(entry.archive) else {
                warn!("Index entry {} refers to an unknown archive", entry.raw_path);
                continue;
            };
            match archive.reader.read_file(&entry.raw_path) {
                Ok(data) => groups.insert(
                    &entry.extension,
                    RawFile {
                        path: entry.raw_path.clone(),
                        data,
                    },
                ),
                Err(e) => warn!("Failed to read {}: {}", entry.raw_path, e),
            }
        }

        Ok(groups)
    }

    /// Resolve `name` to its decoded objects
    ///
    /// Decode failures are logged and dropped, so the result may be empty.
    pub fn resolve(&self, name: &str) -> Result<Vec<ResolvedObject<D::Package>>> {
        let mut groups = self.groups(name)?;
        let mut resolved = Vec::new();

        let has_main = groups.contains(self.main_extension);
        let has_bulk = groups.contains(self.bulk_extension);

        if has_main {
            let main = groups.take(self.main_extension);
            let bulk = if has_bulk {
                groups.take(self.bulk_extension)
            } else {
                None
            };

            if let Some(main) = main {
                let (bundle, files) = match bulk {
                    Some(bulk) => (
                        Bundle::MainWithBulk,
                        vec![
                            (self.main_extension.to_string(), main),
                            (self.bulk_extension.to_string(), bulk),
                        ],
                    ),
                    None => (
                        Bundle::Main,
                        vec![(self.main_extension.to_string(), main)],
                    ),
                };
                self.push_decoded(name, bundle, files, &mut resolved);
            }
        } else {
            let extensions: Vec<String> = groups.extensions().map(str::to_string).collect();
            for extension in extensions {
                if let Some(file) = groups.take(&extension) {
                    let bundle = Bundle::Variant(extension.clone());
                    self.push_decoded(name, bundle, vec![(extension, file)], &mut resolved);
                }
            }
        }

        debug!("Resolved {} to {} object(s)", name, resolved.len());
        Ok(resolved)
    }

    fn push_decoded(
        &self,
        name: &str,
        bundle: Bundle,
        files: Vec<(String, RawFile)>,
        resolved: &mut Vec<ResolvedObject<D::Package>>,
    ) {
        match self.decode(name, bundle, files) {
            Ok(object) => resolved.push(object),
            Err(e) => warn!("{}", e),
        }
    }

    fn decode(
        &self,
        name: &str,
        bundle: Bundle,
        files: Vec<(String, RawFile)>,
    ) -> Result<ResolvedObject<D::Package>> {
        let main = files.first().map_or(&[][..], |(_, f)| f.data.as_slice());
        let bulk = files.get(1).map(|(_, f)| f.data.as_slice());

        let decode_failure = |source| PakError::DecodeFailure {
            name: name.to_string(),
            source,
        };

        let package = self
            .decoder
            .parse_package(main, bulk)
            .map_err(decode_failure)?;
        let data = package.data().map_err(decode_failure)?;

        Ok(ResolvedObject {
            bundle,
            files,
            data,
            package,
        })
    }
}
