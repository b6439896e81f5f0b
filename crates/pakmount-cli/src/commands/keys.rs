use crate::OutputFormat;
use pakmount_keys::KeyStore;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct KeyListing {
    main_key: Option<String>,
    archive_keys: Vec<ArchiveKey>,
}

#[derive(Debug, Serialize)]
struct ArchiveKey {
    archive: String,
    key: String,
}

fn listing(store: &KeyStore) -> KeyListing {
    let mut archive_keys: Vec<ArchiveKey> = store
        .archive_keys()
        .iter()
        .map(|(archive, key)| ArchiveKey {
            archive: archive.clone(),
            key: key.to_hex(),
        })
        .collect();
    archive_keys.sort_by(|a, b| a.archive.cmp(&b.archive));

    KeyListing {
        main_key: store.main_key().map(|k| k.to_hex()),
        archive_keys,
    }
}

/// Fetch and print the current archive keys
pub async fn handle(endpoint: Option<String>, format: OutputFormat) -> anyhow::Result<()> {
    let store = super::fetch_key_store(endpoint).await?;
    let listing = listing(&store);

    if let Some(json) = format.render_json(&listing)? {
        println!("{json}");
        return Ok(());
    }

    match &listing.main_key {
        Some(key) => println!("Main key: {key}"),
        None => println!("Main key: (none)"),
    }
    println!("Archive keys: {}", listing.archive_keys.len());
    for entry in &listing.archive_keys {
        println!("  {:<40} {}", entry.archive, entry.key);
    }

    Ok(())
}
