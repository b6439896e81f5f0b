//! In-memory decoder used by the integration tests.
//!
//! Package bytes are UTF-8 text of the form `<ExportType>:<payload>`. A
//! package whose bytes start with `bad` fails to parse. The decoded texture
//! is the main bytes followed by the bulk bytes.

#![allow(dead_code)]

use pakmount::{ArchiveReader, Decoder, DecoderError, Package, PackageData, PackageExport};
use pakmount_keys::AesKey;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub fn key(byte: u8) -> AesKey {
    AesKey::new([byte; 32])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCall {
    pub main: Vec<u8>,
    pub bulk: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
struct ArchiveSpec {
    key: AesKey,
    files: Vec<(String, Vec<u8>)>,
}

#[derive(Debug, Default, Clone)]
pub struct MockDecoder {
    archives: HashMap<PathBuf, ArchiveSpec>,
    calls: Arc<Mutex<Vec<ParseCall>>>,
}

impl MockDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an archive at `base_path` that opens only with `key`
    pub fn with_archive(mut self, base_path: &Path, key: AesKey, files: &[(&str, &[u8])]) -> Self {
        let files = files
            .iter()
            .map(|(path, data)| ((*path).to_string(), data.to_vec()))
            .collect();
        self.archives
            .insert(base_path.to_path_buf(), ArchiveSpec { key, files });
        self
    }

    /// Handle on the recorded `parse_package` calls
    pub fn calls(&self) -> Arc<Mutex<Vec<ParseCall>>> {
        Arc::clone(&self.calls)
    }
}

#[derive(Debug)]
pub struct MockArchive {
    files: Vec<(String, Vec<u8>)>,
}

impl ArchiveReader for MockArchive {
    fn list_files(&self) -> Vec<String> {
        self.files.iter().map(|(path, _)| path.clone()).collect()
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>, DecoderError> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, data)| data.clone())
            .ok_or_else(|| DecoderError::new(format!("no such file: {path}")))
    }
}

#[derive(Debug)]
pub struct MockPackage {
    data: PackageData,
    texture: Vec<u8>,
}

impl Package for MockPackage {
    fn data(&self) -> Result<PackageData, DecoderError> {
        Ok(self.data.clone())
    }

    fn decode_texture(&self) -> Result<Vec<u8>, DecoderError> {
        Ok(self.texture.clone())
    }
}

impl Decoder for MockDecoder {
    type Archive = MockArchive;
    type Package = MockPackage;

    fn open(&self, base_path: &Path, key: &AesKey) -> Result<MockArchive, DecoderError> {
        let spec = self
            .archives
            .get(base_path)
            .ok_or_else(|| DecoderError::new("corrupt archive"))?;
        if &spec.key != key {
            return Err(DecoderError::new("invalid key"));
        }
        Ok(MockArchive {
            files: spec.files.clone(),
        })
    }

    fn parse_package(
        &self,
        main: &[u8],
        bulk: Option<&[u8]>,
    ) -> Result<MockPackage, DecoderError> {
        self.calls
            .lock()
            .map_err(|_| DecoderError::new("poisoned"))?
            .push(ParseCall {
                main: main.to_vec(),
                bulk: bulk.map(<[u8]>::to_vec),
            });

        if main.starts_with(b"bad") {
            return Err(DecoderError::new("unparsable package"));
        }

        let text = String::from_utf8_lossy(main);
        let export_type = text.split(':').next().unwrap_or_default().to_string();

        let mut texture = main.to_vec();
        if let Some(bulk) = bulk {
            texture.extend_from_slice(bulk);
        }

        Ok(MockPackage {
            data: PackageData {
                exports: vec![PackageExport::new(export_type)],
            },
            texture,
        })
    }
}
