//! Level text to typed cell grid

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ResourceError;

/// One grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// `.` or blank
    Empty,
    /// `#`
    Solid,
    /// `@`
    Spawn,
    /// `^`
    FloorSpike,
    /// `v`
    CeilingSpike,
    /// `0`
    Coin,
    /// `$`
    Portal,
}

impl Cell {
    /// Decode a cell symbol. Unknown symbols yield `None`.
    pub fn from_symbol(symbol: char) -> Option<Cell> {
        Some(match symbol {
            '.' | ' ' => Cell::Empty,
            '#' => Cell::Solid,
            '@' => Cell::Spawn,
            '^' => Cell::FloorSpike,
            'v' => Cell::CeilingSpike,
            '0' => Cell::Coin,
            '$' => Cell::Portal,
            _ => return None,
        })
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Solid => '#',
            Cell::Spawn => '@',
            Cell::FloorSpike => '^',
            Cell::CeilingSpike => 'v',
            Cell::Coin => '0',
            Cell::Portal => '$',
        }
    }
}

/// Rectangular grid of cells. Every row has the same width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelGrid {
    /// Level identifier (file name)
    pub name: String,
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl LevelGrid {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn get(&self, column: usize, row: usize) -> Option<Cell> {
        self.rows.get(row).and_then(|r| r.get(column)).copied()
    }

    /// Every cell with its (column, row) position, row-major
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(y, row)| row.iter().enumerate().map(move |(x, &cell)| (x, y, cell)))
    }

    /// Render back to level text (padded rows)
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.height() * (self.width + 1));
        for row in &self.rows {
            out.extend(row.iter().map(|c| c.symbol()));
            out.push('\n');
        }
        out
    }
}

/// Parse level text into a padded grid.
///
/// Trailing blank lines are ignored. A blank line before the last row, or a
/// file with no rows at all, is malformed. Short rows are padded with empty
/// cells up to the longest row.
pub fn parse_level(name: &str, text: &str) -> Result<LevelGrid, ResourceError> {
    let mut lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        return Err(ResourceError::MalformedLevel {
            level: name.to_string(),
            reason: "no rows".to_string(),
        });
    }

    let mut rows = Vec::with_capacity(lines.len());
    for (y, line) in lines.iter().enumerate() {
        if line.is_empty() {
            return Err(ResourceError::MalformedLevel {
                level: name.to_string(),
                reason: format!("row {} is empty", y + 1),
            });
        }
        let row: Vec<Cell> = line
            .chars()
            .enumerate()
            .map(|(x, symbol)| {
                Cell::from_symbol(symbol).unwrap_or_else(|| {
                    log::warn!("Level '{name}': unknown symbol {symbol:?} at ({x}, {y}), treating as empty");
                    Cell::Empty
                })
            })
            .collect();
        rows.push(row);
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, Cell::Empty);
    }

    Ok(LevelGrid {
        name: name.to_string(),
        rows,
        width,
    })
}

/// Read and parse a level file. The level identifier is the file name.
pub fn load_level(path: &Path) -> Result<LevelGrid, ResourceError> {
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ResourceError::LevelNotFound {
            path: path.to_path_buf(),
        },
        _ => ResourceError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let grid = parse_level(&name, &text)?;
    log::info!("Loaded level '{}' ({}x{})", grid.name, grid.width(), grid.height());
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_short_rows_are_padded() {
        let grid = parse_level("pad", "#\n.@.\n##").unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.get(1, 0), Some(Cell::Empty));
        assert_eq!(grid.get(1, 1), Some(Cell::Spawn));
        assert_eq!(grid.to_text(), "#..\n.@.\n##.\n");
    }

    #[test]
    fn test_blank_space_is_empty() {
        let grid = parse_level("blank", "  @\n###").unwrap();
        assert_eq!(grid.get(0, 0), Some(Cell::Empty));
        assert_eq!(grid.get(2, 0), Some(Cell::Spawn));
    }

    #[test]
    fn test_crlf_and_trailing_blank_lines() {
        let grid = parse_level("crlf", ".@\r\n##\r\n\r\n\n").unwrap();
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(1, 1), Some(Cell::Solid));
    }

    #[test]
    fn test_empty_file_is_malformed() {
        let err = parse_level("empty", "\n\n").unwrap_err();
        assert!(matches!(err, ResourceError::MalformedLevel { .. }));
    }

    #[test]
    fn test_interior_blank_row_is_malformed() {
        let err = parse_level("gap", ".@\n\n##").unwrap_err();
        match err {
            ResourceError::MalformedLevel { level, reason } => {
                assert_eq!(level, "gap");
                assert!(reason.contains("row 2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_symbol_reads_as_empty() {
        let grid = parse_level("odd", "@x\n##").unwrap();
        assert_eq!(grid.get(1, 0), Some(Cell::Empty));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_level(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, ResourceError::LevelNotFound { .. }));
    }

    #[test]
    fn test_load_uses_file_name_as_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lev_3.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, ".@..$").unwrap();
        writeln!(file, "#####").unwrap();
        drop(file);

        let grid = load_level(&path).unwrap();
        assert_eq!(grid.name, "lev_3.txt");
        assert_eq!(grid.get(4, 0), Some(Cell::Portal));
    }

    fn level_line() -> impl Strategy<Value = String> {
        proptest::collection::vec(prop::sample::select(vec!['.', ' ', '#', '@', '^', 'v', '0', '$']), 1..24)
            .prop_map(|cells| cells.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_rows_equal_width(lines in proptest::collection::vec(level_line(), 1..12)) {
            let text = lines.join("\n");
            let grid = parse_level("prop", &text).unwrap();
            let longest = lines.iter().map(|l| l.chars().count()).max().unwrap();
            prop_assert_eq!(grid.width(), longest);
            prop_assert!(grid.rows().iter().all(|r| r.len() == grid.width()));
        }

        #[test]
        fn prop_loading_twice_is_identical(lines in proptest::collection::vec(level_line(), 1..12)) {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("level.txt");
            std::fs::write(&path, lines.join("\n")).unwrap();
            let first = load_level(&path).unwrap();
            let second = load_level(&path).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
