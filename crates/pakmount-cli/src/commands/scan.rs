use crate::OutputFormat;
use pakmount::mount::find_archives;
use pakmount_keys::KeyStore;
use serde::Serialize;
use std::path::Path;

/// An archive found on disk and the key that would be used to open it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveRow {
    /// Archive file name
    pub archive: String,
    /// Hex key, if any key applies
    pub key: Option<String>,
    /// Whether the key is archive-specific rather than the main key
    pub dedicated: bool,
}

/// List archives in `dir` with the key each one would be mounted with
pub fn scan_archives(
    dir: &Path,
    extension: &str,
    keys: &KeyStore,
) -> pakmount::Result<Vec<ArchiveRow>> {
    let archives = find_archives(dir, extension)?;

    Ok(archives
        .iter()
        .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
        .map(|archive| {
            let key = keys.lookup(&archive).map(|k| k.to_hex());
            let dedicated = keys.archive_keys().contains_key(&archive);
            ArchiveRow {
                archive,
                key,
                dedicated,
            }
        })
        .collect())
}

/// Print the archives in `dir` and their keys
pub async fn handle(
    dir: &Path,
    extension: &str,
    endpoint: Option<String>,
    offline: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let keys = if offline {
        KeyStore::new()
    } else {
        super::fetch_key_store(endpoint).await?
    };

    let rows = scan_archives(dir, extension, &keys)?;

    if let Some(json) = format.render_json(&rows)? {
        println!("{json}");
        return Ok(());
    }

    println!("{} archives in {}", rows.len(), dir.display());
    for row in &rows {
        let key = match (&row.key, row.dedicated) {
            (Some(key), true) => key.clone(),
            (Some(_), false) => "main key".to_string(),
            (None, _) => "no key".to_string(),
        };
        println!("  {:<40} {}", row.archive, key);
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pakmount_keys::{AesKey, KeyBundle};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_reports_key_source() {
        let dir = TempDir::new().unwrap();
        for name in ["b.pak", "a.pak", "notes.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let special = AesKey::new([9; 32]);
        let keys = KeyStore::from_bundle(
            KeyBundle::with_main_key(AesKey::new([1; 32])).with_archive_key("b.pak", special),
        );

        let rows = scan_archives(dir.path(), "pak", &keys).unwrap();

        assert_eq!(
            rows,
            vec![
                ArchiveRow {
                    archive: "a.pak".to_string(),
                    key: Some(AesKey::new([1; 32]).to_hex()),
                    dedicated: false,
                },
                ArchiveRow {
                    archive: "b.pak".to_string(),
                    key: Some(special.to_hex()),
                    dedicated: true,
                },
            ]
        );
    }

    #[test]
    fn test_scan_without_keys() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.pak"), b"").unwrap();

        let rows = scan_archives(dir.path(), "pak", &KeyStore::new()).unwrap();
        assert_eq!(rows[0].key, None);
    }
}
