//! Cosmetic set catalog

use serde::Serialize;

/// A purchasable character skin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CosmeticSet {
    /// Key in the `Sets` table
    pub id: &'static str,
    /// Price in coins
    pub price: u64,
    /// Owned without a purchase
    pub owned_by_default: bool,
    /// Prefix for the set's character artwork
    pub asset_dir: &'static str,
    /// Tile image drawn for solid cells while this set is selected
    pub tile_image: &'static str,
}

/// Set every new save starts with
pub const DEFAULT_SET: &str = "Standard";

/// Every set, in shop order
pub static CATALOG: [CosmeticSet; 4] = [
    CosmeticSet {
        id: DEFAULT_SET,
        price: 0,
        owned_by_default: true,
        asset_dir: "",
        tile_image: "block.jpg",
    },
    CosmeticSet {
        id: "Farmer",
        price: 50,
        owned_by_default: false,
        asset_dir: "farm_goose/",
        tile_image: "block3.png",
    },
    CosmeticSet {
        id: "Mario",
        price: 100,
        owned_by_default: false,
        asset_dir: "mario_goose/",
        tile_image: "block2.png",
    },
    CosmeticSet {
        id: "Sherlock",
        price: 150,
        owned_by_default: false,
        asset_dir: "sherlock-goose/",
        tile_image: "block.jpg",
    },
];

/// Look a set up by id
pub fn find_set(id: &str) -> Option<&'static CosmeticSet> {
    CATALOG.iter().find(|s| s.id == id)
}

impl CosmeticSet {
    /// Asset path for a character frame, e.g. `mario_goose/pl_go_anim/goose_pl-2.png`
    pub fn asset_path(&self, file: &str) -> String {
        format!("{}{}", self.asset_dir, file)
    }
}
