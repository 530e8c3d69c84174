//! Level directory listing

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ResourceError;

/// A level file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelEntry {
    /// File name; also the statistics key
    pub id: String,
    pub path: PathBuf,
}

/// Level files in a directory, sorted by file name
#[derive(Debug, Clone, Default)]
pub struct LevelCatalog {
    entries: Vec<LevelEntry>,
}

impl LevelCatalog {
    /// List every regular `.txt` file in `dir`
    pub fn discover(dir: &Path) -> Result<Self, ResourceError> {
        let read = fs::read_dir(dir).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ResourceError::LevelNotFound {
                path: dir.to_path_buf(),
            },
            _ => ResourceError::Io {
                path: dir.to_path_buf(),
                source,
            },
        })?;

        let mut entries = Vec::new();
        for item in read {
            let item = item.map_err(|source| ResourceError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = item.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != "txt") {
                continue;
            }
            let id = item.file_name().to_string_lossy().into_owned();
            entries.push(LevelEntry { id, path });
        }
        entries.sort_by(|a, b| a.id.cmp(&b.id));

        log::info!("Found {} levels in {}", entries.len(), dir.display());
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[LevelEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look a level up by id
    pub fn get(&self, id: &str) -> Option<&LevelEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}
