use pakmount::{GlobalResources, ResourceConfig, ResourceProvisioner};
use std::path::{Path, PathBuf};
use tracing::info;

/// Copy shared resources from `dir` into `working_dir`
pub fn handle(dir: &Path, working_dir: PathBuf, files: Vec<String>) -> anyhow::Result<()> {
    let mut config = ResourceConfig::new(working_dir);
    if !files.is_empty() {
        config = config.with_files(files);
    }
    let target = config.target_dir();

    GlobalResources::new(config).provision(dir)?;
    info!("Resources ready in {}", target.display());
    println!("{}", target.display());

    Ok(())
}
