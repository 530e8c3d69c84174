//! JSON save file backend
//!
//! The file holds a versioned envelope. Each mutation serializes the whole
//! save to `<path>.tmp` and renames it over `<path>`; the in-memory copy is
//! only updated once the rename succeeded.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ProgressBackend, SaveData, SetRow, StatisticsRow};
use crate::error::PersistenceError;

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    data: SaveData,
}

/// Save file on disk
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    data: SaveData,
}

impl JsonFileBackend {
    /// Open `path`, starting empty if it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let data = match fs::read(&path) {
            Ok(bytes) => {
                let envelope: Envelope =
                    serde_json::from_slice(&bytes).map_err(|source| PersistenceError::Corrupt {
                        path: path.clone(),
                        source,
                    })?;
                if envelope.version > SAVE_VERSION {
                    return Err(PersistenceError::UnsupportedVersion {
                        found: envelope.version,
                        expected: SAVE_VERSION,
                    });
                }
                log::info!("Loaded save from {}", path.display());
                envelope.data
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("No save at {}, starting fresh", path.display());
                SaveData::default()
            }
            Err(source) => return Err(PersistenceError::Io { path, source }),
        };
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy, write it out, then adopt it
    fn commit(&mut self, change: impl FnOnce(&mut SaveData)) -> Result<(), PersistenceError> {
        let mut next = self.data.clone();
        change(&mut next);
        write_atomic(&self.path, &next)?;
        self.data = next;
        Ok(())
    }
}

fn write_atomic(path: &Path, data: &SaveData) -> Result<(), PersistenceError> {
    let envelope = Envelope {
        version: SAVE_VERSION,
        data: data.clone(),
    };
    let bytes = serde_json::to_vec_pretty(&envelope).map_err(|source| PersistenceError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let io_err = |source: std::io::Error| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(&tmp, bytes).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

impl ProgressBackend for JsonFileBackend {
    fn balance(&self) -> Result<u64, PersistenceError> {
        Ok(self.data.coins)
    }

    fn set_balance(&mut self, coins: u64) -> Result<(), PersistenceError> {
        self.commit(|d| d.coins = coins)
    }

    fn set_rows(&self) -> Result<Vec<(String, SetRow)>, PersistenceError> {
        Ok(self.data.sets.iter().map(|(k, v)| (k.clone(), *v)).collect())
    }

    fn set_row(&self, name: &str) -> Result<Option<SetRow>, PersistenceError> {
        Ok(self.data.sets.get(name).copied())
    }

    fn put_set_row(&mut self, name: &str, row: SetRow) -> Result<(), PersistenceError> {
        self.commit(|d| {
            d.sets.insert(name.to_string(), row);
        })
    }

    fn statistics_rows(&self) -> Result<Vec<(String, StatisticsRow)>, PersistenceError> {
        Ok(self.data.statistics.iter().map(|(k, v)| (k.clone(), *v)).collect())
    }

    fn statistics_row(&self, level: &str) -> Result<Option<StatisticsRow>, PersistenceError> {
        Ok(self.data.statistics.get(level).copied())
    }

    fn put_statistics_row(&mut self, level: &str, row: StatisticsRow) -> Result<(), PersistenceError> {
        self.commit(|d| {
            d.statistics.insert(level.to_string(), row);
        })
    }
}
