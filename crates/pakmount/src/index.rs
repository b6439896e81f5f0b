//! Global file index across all mounted archives

use std::collections::HashMap;

/// Position of an archive in the session's archive set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArchiveId(pub(crate) usize);

impl ArchiveId {
    /// Index into the mounted archive list
    pub const fn get(self) -> usize {
        self.0
    }
}

/// Base name of a path: everything after the last `/`
fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Logical name of a path or bare asset name
///
/// Lowercased base name cut at its first `.`, so `Game/Foo.uasset` and
/// `foo.ubulk` both map to `foo`.
pub fn logical_name(path: &str) -> String {
    let base = basename(path);
    base.split('.').next().unwrap_or(base).to_lowercase()
}

/// Extension of a path's base name (after the last `.`), case preserved
///
/// Names without a dot have an empty extension.
pub fn extension(path: &str) -> &str {
    let base = basename(path);
    base.rsplit_once('.').map_or("", |(_, ext)| ext)
}

/// One file of one mounted archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Full logical path inside the archive namespace
    pub raw_path: String,
    /// Archive the file was listed by
    pub archive: ArchiveId,
    /// Derived lookup key
    pub logical_name: String,
    /// Case-preserved extension
    pub extension: String,
}

impl FileEntry {
    /// Create an entry for `raw_path` owned by `archive`
    pub fn new(raw_path: impl Into<String>, archive: ArchiveId) -> Self {
        let raw_path = raw_path.into();
        let logical_name = logical_name(&raw_path);
        let extension = extension(&raw_path).to_string();
        Self {
            raw_path,
            archive,
            logical_name,
            extension,
        }
    }
}

/// Insertion-ordered index of every file in every mounted archive
#[derive(Debug, Default)]
pub struct FileIndex {
    entries: Vec<FileEntry>,
    by_name: HashMap<String, Vec<usize>>,
}

impl FileIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file; duplicates are kept as additional candidates
    pub fn insert(&mut self, entry: FileEntry) {
        let position = self.entries.len();
        self.by_name
            .entry(entry.logical_name.clone())
            .or_default()
            .push(position);
        self.entries.push(entry);
    }

    /// Append every path listed by `archive`, in listing order
    pub fn extend_from_archive<I>(&mut self, archive: ArchiveId, paths: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let before = self.entries.len();
        for path in paths {
            self.insert(FileEntry::new(path, archive));
        }
        self.entries.len() - before
    }

    /// Every entry whose logical name matches `name`, in indexing order
    ///
    /// `name` may be a full path or carry an extension; it is normalised the
    /// same way indexed paths are.
    pub fn lookup(&self, name: &str) -> Vec<&FileEntry> {
        self.by_name
            .get(&logical_name(name))
            .map(|positions| positions.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    /// Every entry whose raw path contains `fragment`, in indexing order
    pub fn find_paths(&self, fragment: &str) -> Vec<&FileEntry> {
        self.entries
            .iter()
            .filter(|e| e.raw_path.contains(fragment))
            .collect()
    }

    /// All entries in indexing order
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Number of indexed files
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no files
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
