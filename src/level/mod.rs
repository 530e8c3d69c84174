//! Level files: parsing, spatial layout and discovery

pub mod catalog;
pub mod grid;
pub mod layout;

pub use catalog::{LevelCatalog, LevelEntry};
pub use grid::{Cell, LevelGrid, load_level, parse_level};
pub use layout::{LayoutOptions, LevelLayout, build_layout};
