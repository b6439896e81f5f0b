//! Session configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a [`PakSession`](crate::PakSession)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Extension (without dot) identifying archive files in the mount directory
    pub archive_extension: String,

    /// Extension of the main package descriptor
    pub main_extension: String,

    /// Extension of the companion bulk-data file
    pub bulk_extension: String,

    /// Export type required by texture extraction
    pub texture_export_type: String,

    /// Shared resources to provision before mounting, if any
    pub resources: Option<ResourceConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            archive_extension: "pak".to_string(),
            main_extension: "uasset".to_string(),
            bulk_extension: "ubulk".to_string(),
            texture_export_type: "Texture2D".to_string(),
            resources: None,
        }
    }
}

impl SessionConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the archive file extension
    #[must_use]
    pub fn with_archive_extension(mut self, extension: impl Into<String>) -> Self {
        self.archive_extension = extension.into();
        self
    }

    /// Set the main descriptor / bulk-data extension pair
    #[must_use]
    pub fn with_bundle_extensions(
        mut self,
        main: impl Into<String>,
        bulk: impl Into<String>,
    ) -> Self {
        self.main_extension = main.into();
        self.bulk_extension = bulk.into();
        self
    }

    /// Set the export type accepted by texture extraction
    #[must_use]
    pub fn with_texture_export_type(mut self, export_type: impl Into<String>) -> Self {
        self.texture_export_type = export_type.into();
        self
    }

    /// Provision shared resources into `working_dir` before mounting
    #[must_use]
    pub fn with_resources(mut self, resources: ResourceConfig) -> Self {
        self.resources = Some(resources);
        self
    }
}

/// Shared resource files copied out of the archive directory before mounting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Local working directory; files land in `<working_dir>/<subdir>`
    pub working_dir: PathBuf,

    /// Subdirectory of `working_dir` receiving the files
    pub subdir: String,

    /// File names to copy from the archive directory
    pub files: Vec<String>,
}

impl ResourceConfig {
    /// Global container files copied into `<working_dir>/paks`
    pub fn new<P: AsRef<Path>>(working_dir: P) -> Self {
        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
            subdir: "paks".to_string(),
            files: vec!["global.utoc".to_string(), "global.ucas".to_string()],
        }
    }

    /// Replace the list of files to copy
    #[must_use]
    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    /// Directory the files are copied into
    pub fn target_dir(&self) -> PathBuf {
        self.working_dir.join(&self.subdir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.archive_extension, "pak");
        assert_eq!(config.main_extension, "uasset");
        assert_eq!(config.bulk_extension, "ubulk");
        assert_eq!(config.texture_export_type, "Texture2D");
        assert!(config.resources.is_none());
    }

    #[test]
    fn test_resource_target_dir() {
        let resources = ResourceConfig::new("/tmp/work").with_files(["a.utoc"]);
        assert_eq!(resources.target_dir(), PathBuf::from("/tmp/work/paks"));
        assert_eq!(resources.files, vec!["a.utoc".to_string()]);
    }
}
