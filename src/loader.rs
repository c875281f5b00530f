//! @ai:module:intent Read analysis payloads from files and directories
//! @ai:module:layer infrastructure
//! @ai:module:public_api PayloadLoader, PayloadLoaderTrait, LoadedPayload
//! @ai:module:depends_on payload, error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::payload::AnalysisPayload;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const PAYLOAD_EXTENSIONS: [&str; 2] = ["json", "txt"];

/// @ai:intent A payload together with the file it came from
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPayload {
    pub path: PathBuf,
    pub payload: AnalysisPayload,
}

/// @ai:intent Trait for loading payload files
pub trait PayloadLoaderTrait: Send + Sync {
    /// @ai:intent Load one payload file
    fn load_file(&self, path: &Path) -> Result<AnalysisPayload>;

    /// @ai:intent Load every payload file below a directory
    fn load_dir(&self, dir: &Path) -> Vec<LoadedPayload>;
}

/// @ai:intent Loads `.json` response bodies and `.txt` analysis text
pub struct PayloadLoader;

impl PayloadLoader {
    /// @ai:intent Create a new payload loader
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Find all payload files in a directory, sorted by path
    /// @ai:effects fs:read
    pub fn find_payload_files(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| PAYLOAD_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        files
    }
}

impl Default for PayloadLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadLoaderTrait for PayloadLoader {
    /// @ai:intent Parse a file as a JSON body, or take `.txt` content as plain text
    /// @ai:effects fs:read
    fn load_file(&self, path: &Path) -> Result<AnalysisPayload> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let is_text = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("txt"))
            .unwrap_or(false);

        if is_text {
            Ok(AnalysisPayload::PlainText(content))
        } else {
            Ok(AnalysisPayload::parse(&content))
        }
    }

    /// @ai:intent Load all payloads, skipping unreadable files
    /// @ai:effects fs:read
    fn load_dir(&self, dir: &Path) -> Vec<LoadedPayload> {
        let files = Self::find_payload_files(dir);
        let mut payloads = Vec::with_capacity(files.len());

        for path in files {
            match self.load_file(&path) {
                Ok(payload) => payloads.push(LoadedPayload { path, payload }),
                Err(e) => {
                    tracing::warn!("Skipping unreadable payload {}: {}", path.display(), e);
                }
            }
        }

        payloads
    }
}
