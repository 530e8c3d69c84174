//! Progression persistence
//!
//! The store is a scalar `coins` balance plus two keyed tables:
//! - `Sets`: cosmetic set name -> {Is_buyed, Cost}
//! - `Statistics`: level id -> {Points, max_coins}
//!
//! Backends commit every write before returning. Nothing is buffered.

pub mod json_file;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;

pub use json_file::JsonFileBackend;

/// Row of the `Sets` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRow {
    #[serde(rename = "Is_buyed")]
    pub is_bought: bool,
    #[serde(rename = "Cost")]
    pub cost: u64,
}

/// Row of the `Statistics` table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsRow {
    #[serde(rename = "Points")]
    pub points: u64,
    pub max_coins: u32,
}

/// Everything a backend stores
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    pub coins: u64,
    #[serde(rename = "Sets", default)]
    pub sets: BTreeMap<String, SetRow>,
    #[serde(rename = "Statistics", default)]
    pub statistics: BTreeMap<String, StatisticsRow>,
}

/// Access contract for the progression store
pub trait ProgressBackend {
    fn balance(&self) -> Result<u64, PersistenceError>;
    fn set_balance(&mut self, coins: u64) -> Result<(), PersistenceError>;

    /// All `Sets` rows ordered by name
    fn set_rows(&self) -> Result<Vec<(String, SetRow)>, PersistenceError>;
    fn set_row(&self, name: &str) -> Result<Option<SetRow>, PersistenceError>;
    fn put_set_row(&mut self, name: &str, row: SetRow) -> Result<(), PersistenceError>;

    /// All `Statistics` rows ordered by level id
    fn statistics_rows(&self) -> Result<Vec<(String, StatisticsRow)>, PersistenceError>;
    fn statistics_row(&self, level: &str) -> Result<Option<StatisticsRow>, PersistenceError>;
    fn put_statistics_row(&mut self, level: &str, row: StatisticsRow) -> Result<(), PersistenceError>;

    /// Insert `row` unless `level` already has one; returns the stored row
    fn insert_statistics_if_absent(
        &mut self,
        level: &str,
        row: StatisticsRow,
    ) -> Result<StatisticsRow, PersistenceError> {
        if let Some(existing) = self.statistics_row(level)? {
            return Ok(existing);
        }
        self.put_statistics_row(level, row)?;
        Ok(row)
    }
}

/// In-process backend for tests and embedding.
///
/// Writes can be switched off to exercise failure reporting.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    data: SaveData,
    read_only: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: SaveData) -> Self {
        Self {
            data,
            read_only: false,
        }
    }

    /// Reject every write with `PersistenceError::Unavailable`
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn data(&self) -> &SaveData {
        &self.data
    }

    fn writable(&mut self) -> Result<&mut SaveData, PersistenceError> {
        if self.read_only {
            return Err(PersistenceError::Unavailable("memory backend is read-only".to_string()));
        }
        Ok(&mut self.data)
    }
}

impl ProgressBackend for MemoryBackend {
    fn balance(&self) -> Result<u64, PersistenceError> {
        Ok(self.data.coins)
    }

    fn set_balance(&mut self, coins: u64) -> Result<(), PersistenceError> {
        self.writable()?.coins = coins;
        Ok(())
    }

    fn set_rows(&self) -> Result<Vec<(String, SetRow)>, PersistenceError> {
        Ok(self.data.sets.iter().map(|(k, v)| (k.clone(), *v)).collect())
    }

    fn set_row(&self, name: &str) -> Result<Option<SetRow>, PersistenceError> {
        Ok(self.data.sets.get(name).copied())
    }

    fn put_set_row(&mut self, name: &str, row: SetRow) -> Result<(), PersistenceError> {
        self.writable()?.sets.insert(name.to_string(), row);
        Ok(())
    }

    fn statistics_rows(&self) -> Result<Vec<(String, StatisticsRow)>, PersistenceError> {
        Ok(self.data.statistics.iter().map(|(k, v)| (k.clone(), *v)).collect())
    }

    fn statistics_row(&self, level: &str) -> Result<Option<StatisticsRow>, PersistenceError> {
        Ok(self.data.statistics.get(level).copied())
    }

    fn put_statistics_row(&mut self, level: &str, row: StatisticsRow) -> Result<(), PersistenceError> {
        self.writable()?.statistics.insert(level.to_string(), row);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_if_absent_keeps_existing() {
        let mut backend = MemoryBackend::new();
        let first = StatisticsRow {
            points: 40,
            max_coins: 2,
        };
        assert_eq!(backend.insert_statistics_if_absent("lev_1.txt", first).unwrap(), first);
        let stored = backend
            .insert_statistics_if_absent("lev_1.txt", StatisticsRow::default())
            .unwrap();
        assert_eq!(stored, first);
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let mut backend = MemoryBackend::new();
        backend.set_read_only(true);
        assert!(matches!(backend.set_balance(5), Err(PersistenceError::Unavailable(_))));
        assert_eq!(backend.balance().unwrap(), 0);
    }

    #[test]
    fn test_rows_use_store_column_names() {
        let mut data = SaveData::default();
        data.sets.insert(
            "Mario".to_string(),
            SetRow {
                is_bought: true,
                cost: 100,
            },
        );
        data.statistics.insert(
            "lev_1.txt".to_string(),
            StatisticsRow {
                points: 7,
                max_coins: 1,
            },
        );
        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains("\"Is_buyed\":true"));
        assert!(json.contains("\"Cost\":100"));
        assert!(json.contains("\"Points\":7"));
        assert!(json.contains("\"max_coins\":1"));
    }
}
