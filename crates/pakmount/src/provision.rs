//! Shared resource provisioning run before mounting

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info};

use crate::config::ResourceConfig;

/// Makes sure files the decoder expects locally exist before mounting
pub trait ResourceProvisioner: Send + Sync {
    /// Provision resources, reading from `archive_dir` when copies are needed
    fn provision(&self, archive_dir: &Path) -> io::Result<()>;
}

/// Copies the configured shared files from the archive directory into the
/// working directory, skipping files that are already present.
#[derive(Debug, Clone)]
pub struct GlobalResources {
    config: ResourceConfig,
}

impl GlobalResources {
    /// Create a provisioner for `config`
    pub fn new(config: ResourceConfig) -> Self {
        Self { config }
    }
}

impl ResourceProvisioner for GlobalResources {
    fn provision(&self, archive_dir: &Path) -> io::Result<()> {
        let target = self.config.target_dir();
        if !target.exists() {
            fs::create_dir_all(&target)?;
            info!("Created resource directory {:?}", target);
        }

        for name in &self.config.files {
            let dest = target.join(name);
            if dest.exists() {
                debug!("Resource {} already present", name);
                continue;
            }
            fs::copy(archive_dir.join(name), &dest)?;
            info!("Copied resource {} to {:?}", name, dest);
        }

        Ok(())
    }
}
