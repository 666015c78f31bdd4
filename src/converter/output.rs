//! The generated Bedrock resource files.

use crate::error::{ConverterError, Result};
use indexmap::IndexMap;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// An ordered set of output files, keyed by pack-relative path.
#[derive(Debug, Clone, Default)]
pub struct OutputPack {
    files: IndexMap<String, Vec<u8>>,
}

impl OutputPack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize `value` as pretty JSON at `path`.
    pub fn insert_json<T: Serialize>(&mut self, path: impl Into<String>, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.files.insert(path.into(), bytes);
        Ok(())
    }

    pub fn insert_bytes(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Parse the JSON file at `path`.
    pub fn json(&self, path: &str) -> Option<serde_json::Value> {
        self.get(path).and_then(|bytes| serde_json::from_slice(bytes).ok())
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Write every file below `dir`, creating directories as needed.
    pub fn write_to_directory<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        for (path, bytes) in &self.files {
            let target = dir.join(path);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&target, bytes)?;
        }
        log::info!("Wrote {} files to {}", self.files.len(), dir.display());
        Ok(())
    }

    /// Pack every file into a deflate-compressed ZIP archive.
    pub fn to_zip_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        {
            let cursor = std::io::Cursor::new(&mut buf);
            let mut zip = zip::ZipWriter::new(cursor);
            let options = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated);

            for (path, bytes) in &self.files {
                zip.start_file(path.as_str(), options)
                    .map_err(|e| ConverterError::Export(format!("ZIP write error: {}", e)))?;
                zip.write_all(bytes)?;
            }

            zip.finish()
                .map_err(|e| ConverterError::Export(format!("ZIP finalize error: {}", e)))?;
        }
        Ok(buf)
    }

    /// Write the pack as a ZIP archive at `path`.
    pub fn write_zip<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_zip_bytes()?)?;
        log::info!("Wrote {} files to {}", self.files.len(), path.display());
        Ok(())
    }
}
