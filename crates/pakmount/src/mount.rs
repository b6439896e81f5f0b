//! Opening archives and indexing their contents

use pakmount_keys::KeyStore;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::decoder::{ArchiveReader, Decoder};
use crate::error::Result;
use crate::index::{ArchiveId, FileIndex};

/// Lifecycle of a session. Never goes back to `Unmounted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MountState {
    /// `mount` has not completed yet
    #[default]
    Unmounted,
    /// `mount` has completed; further mounts are rejected
    Mounted,
}

/// Outcome of a mount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MountReport {
    /// Archives opened and indexed
    pub mounted: usize,
    /// Archives that could not be opened
    pub failed: usize,
}

/// An opened archive
#[derive(Debug)]
pub struct ArchiveHandle<A> {
    /// Archive path without its extension
    pub base_path: PathBuf,
    /// Decoder instance for the archive
    pub reader: A,
}

/// Archives discovered and opened during mounting
#[derive(Debug)]
pub struct ArchiveSet<A> {
    /// Every archive file found, opened or not
    found: Vec<PathBuf>,
    /// Successfully opened archives
    handles: Vec<ArchiveHandle<A>>,
    by_base_path: HashMap<PathBuf, ArchiveId>,
}

impl<A> Default for ArchiveSet<A> {
    fn default() -> Self {
        Self {
            found: Vec::new(),
            handles: Vec::new(),
            by_base_path: HashMap::new(),
        }
    }
}

impl<A> ArchiveSet<A> {
    /// Archive files found on disk
    pub fn found(&self) -> &[PathBuf] {
        &self.found
    }

    /// Opened archives
    pub fn handles(&self) -> &[ArchiveHandle<A>] {
        &self.handles
    }

    /// Opened archive by id
    pub fn get(&self, id: ArchiveId) -> Option<&ArchiveHandle<A>> {
        self.handles.get(id.0)
    }

    /// Whether an archive with this base path is already open
    pub fn contains(&self, base_path: &Path) -> bool {
        self.by_base_path.contains_key(base_path)
    }

    fn register(&mut self, base_path: PathBuf, reader: A) -> ArchiveId {
        let id = ArchiveId(self.handles.len());
        self.by_base_path.insert(base_path.clone(), id);
        self.handles.push(ArchiveHandle { base_path, reader });
        id
    }
}

/// List files in `dir` ending in `.{extension}`, sorted by file name
pub fn find_archives(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let suffix = format!(".{extension}");
    let mut archives = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(&suffix))
        {
            archives.push(path);
        }
    }

    archives.sort();
    Ok(archives)
}

/// Opens archives with their keys and feeds their listings into the index
pub struct ArchiveMounter<'a, D: Decoder> {
    decoder: &'a D,
    keys: &'a KeyStore,
    suffix: String,
}

impl<'a, D: Decoder> ArchiveMounter<'a, D> {
    /// Create a mounter for archives named `*.{extension}`
    pub fn new(decoder: &'a D, keys: &'a KeyStore, extension: &str) -> Self {
        Self {
            decoder,
            keys,
            suffix: format!(".{extension}"),
        }
    }

    /// Archive path with the archive extension removed
    fn base_path(&self, path: &Path, filename: &str) -> PathBuf {
        filename
            .strip_suffix(&self.suffix)
            .map_or_else(|| path.with_extension(""), |stem| path.with_file_name(stem))
    }

    /// Open each of `archives`, registering successes into `set` and `index`
    ///
    /// A failing archive is counted and skipped; it never stops the others.
    pub fn mount_all(
        &self,
        archives: Vec<PathBuf>,
        set: &mut ArchiveSet<D::Archive>,
        index: &mut FileIndex,
    ) -> MountReport {
        let mut report = MountReport::default();

        for path in archives {
            set.found.push(path.clone());

            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            let base_path = self.base_path(&path, filename);

            if set.contains(&base_path) {
                debug!("Archive {:?} already mounted, skipping", base_path);
                continue;
            }

            let Some(key) = self.keys.lookup(filename) else {
                warn!("No key available for archive {}", filename);
                report.failed += 1;
                continue;
            };

            match self.decoder.open(&base_path, key) {
                Ok(reader) => {
                    let files = reader.list_files();
                    let id = set.register(base_path, reader);
                    let added = index.extend_from_archive(id, files);
                    debug!("Mounted {}: {} files", filename, added);
                    report.mounted += 1;
                }
                Err(e) => {
                    warn!("Failed to mount archive {}: {}", filename, e);
                    report.failed += 1;
                }
            }
        }

        info!("Mounted {} archives, {} failed", report.mounted, report.failed);
        report
    }
}
