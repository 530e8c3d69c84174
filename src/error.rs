//! Error types for level loading, layout building and progression storage.

use std::path::PathBuf;

use thiserror::Error;

/// A level file could not be turned into a grid.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The level file (or level directory) does not exist.
    #[error("Level not found: {}", path.display())]
    LevelNotFound { path: PathBuf },

    /// The file exists but its contents are not a usable grid.
    #[error("Malformed level '{level}': {reason}")]
    MalformedLevel { level: String, reason: String },

    /// Reading the file failed for a reason other than absence.
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A grid violates the spawn invariant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// No `@` cell in the grid.
    #[error("Level has no spawn cell")]
    NoSpawn,

    /// More than one `@` cell; all positions are reported as (column, row).
    #[error("Level has {} spawn cells: {positions:?}", positions.len())]
    MultipleSpawns { positions: Vec<(usize, usize)> },
}

/// Progression could not be read from or written to its store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem failure while reading or flushing.
    #[error("Save file I/O failed for '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored data could not be decoded or encoded.
    #[error("Save file '{}' is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The save envelope was written by a newer format.
    #[error("Unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// The backend refused the operation.
    #[error("Progress store unavailable: {0}")]
    Unavailable(String),
}

/// Any failure surfaced by the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
