//! Mounting session owning keys, archives and the file index

use pakmount_keys::{KeyProvider, KeyStore};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::decoder::{Decoder, PackageExport};
use crate::error::{PakError, Result};
use crate::index::FileIndex;
use crate::mount::{ArchiveMounter, ArchiveSet, MountReport, MountState, find_archives};
use crate::provision::{GlobalResources, ResourceProvisioner};
use crate::resolve::{AssetResolver, ResolvedObject};
use crate::texture::TextureExtractor;

/// A set of mounted archives and everything needed to resolve assets from them
///
/// The session is mounted exactly once with [`mount`](Self::mount); all
/// resolution methods take `&self` and never modify the session.
pub struct PakSession<D: Decoder> {
    config: SessionConfig,
    decoder: D,
    key_provider: Box<dyn KeyProvider>,
    provisioner: Option<Box<dyn ResourceProvisioner>>,
    keys: KeyStore,
    archives: ArchiveSet<D::Archive>,
    index: FileIndex,
    state: MountState,
}

impl<D: Decoder> PakSession<D> {
    /// Create an unmounted session
    ///
    /// If `config.resources` is set, shared resources are provisioned with
    /// [`GlobalResources`] before mounting.
    pub fn new(
        config: SessionConfig,
        decoder: D,
        key_provider: impl KeyProvider + 'static,
    ) -> Self {
        let provisioner = config
            .resources
            .clone()
            .map(|r| Box::new(GlobalResources::new(r)) as Box<dyn ResourceProvisioner>);

        Self {
            config,
            decoder,
            key_provider: Box::new(key_provider),
            provisioner,
            keys: KeyStore::new(),
            archives: ArchiveSet::default(),
            index: FileIndex::new(),
            state: MountState::Unmounted,
        }
    }

    /// Replace the resource provisioner
    #[must_use]
    pub fn with_provisioner(mut self, provisioner: impl ResourceProvisioner + 'static) -> Self {
        self.provisioner = Some(Box::new(provisioner));
        self
    }

    /// Provision resources, fetch keys and mount every archive in `directory`
    ///
    /// Archives that fail to open are counted in the report and skipped.
    /// A second call fails with [`PakError::AlreadyMounted`] without doing
    /// any work.
    pub async fn mount(&mut self, directory: impl AsRef<Path>) -> Result<MountReport> {
        if self.state == MountState::Mounted {
            return Err(PakError::AlreadyMounted);
        }

        let directory = directory.as_ref();
        if !directory.is_dir() {
            return Err(PakError::InvalidPath(directory.to_path_buf()));
        }

        if let Some(provisioner) = &self.provisioner {
            provisioner.provision(directory)?;
        }

        self.keys.fetch_keys(self.key_provider.as_ref()).await?;

        let archives = find_archives(directory, &self.config.archive_extension)?;
        info!("Mounting {} archives from {:?}", archives.len(), directory);

        let mounter =
            ArchiveMounter::new(&self.decoder, &self.keys, &self.config.archive_extension);
        let report = mounter.mount_all(archives, &mut self.archives, &mut self.index);

        self.state = MountState::Mounted;
        Ok(report)
    }

    /// Resolver over this session
    pub fn resolver(&self) -> AssetResolver<'_, D> {
        AssetResolver::new(
            &self.decoder,
            self.state,
            &self.archives,
            &self.index,
            &self.config.main_extension,
            &self.config.bulk_extension,
        )
    }

    /// Texture extractor over this session
    pub fn texture_extractor(&self) -> TextureExtractor<'_, D> {
        TextureExtractor::new(self.resolver(), &self.config.texture_export_type)
    }

    /// Resolve an asset name to its decoded objects
    pub fn resolve(&self, name: &str) -> Result<Vec<ResolvedObject<D::Package>>> {
        self.resolver().resolve(name)
    }

    /// Decode the texture of an asset
    pub fn extract_texture(&self, name: &str) -> Result<Vec<u8>> {
        self.texture_extractor().extract_texture(name)
    }

    /// First export of every asset whose path contains `fragment`
    ///
    /// Each logical name is resolved once, in index order. Assets that fail
    /// to resolve or have no exports are skipped.
    pub fn collect_matching(&self, fragment: &str) -> Result<Vec<PackageExport>> {
        if fragment.is_empty() {
            return Err(PakError::MissingArgument("fragment"));
        }

        let resolver = self.resolver();
        resolver.ensure_ready()?;

        let matches = self.index.find_paths(fragment);
        info!("Found {} files matching {}", matches.len(), fragment);

        let mut seen = HashSet::new();
        let mut exports = Vec::new();
        for entry in matches {
            if !seen.insert(entry.logical_name.as_str()) {
                continue;
            }
            match resolver.resolve(&entry.raw_path) {
                Ok(objects) => {
                    if let Some(export) = objects
                        .into_iter()
                        .next()
                        .and_then(|o| o.data.exports.into_iter().next())
                    {
                        exports.push(export);
                    }
                }
                Err(e) => warn!("Skipping {}: {}", entry.raw_path, e),
            }
        }

        Ok(exports)
    }

    /// Current mount state
    pub fn state(&self) -> MountState {
        self.state
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Keys fetched by the last mount
    pub fn keys(&self) -> &KeyStore {
        &self.keys
    }

    /// Global file index
    pub fn index(&self) -> &FileIndex {
        &self.index
    }

    /// Discovered and opened archives
    pub fn archives(&self) -> &ArchiveSet<D::Archive> {
        &self.archives
    }

    /// Number of archive files found by the mount
    pub fn archive_count(&self) -> usize {
        self.archives.found().len()
    }

    /// Number of archives successfully opened
    pub fn decoder_count(&self) -> usize {
        self.archives.handles().len()
    }

    /// The decoder collaborator
    pub fn decoder(&self) -> &D {
        &self.decoder
    }
}
