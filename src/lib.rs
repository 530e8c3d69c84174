//! Goose Platformer - a side-scrolling tile platformer
//!
//! Core modules:
//! - `level`: Level files, grid parsing and spatial layout
//! - `sim`: Deterministic simulation (physics, collisions, animation, camera)
//! - `progression`: Currency, cosmetic sets and per-level records
//! - `persistence`: Storage backends for progression
//! - `session`: Per-tick orchestration and outcome handoff
//! - `settings`: User-facing configuration

pub mod error;
pub mod level;
pub mod persistence;
pub mod progression;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{Error, LayoutError, PersistenceError, ResourceError};
pub use progression::{ProgressionStore, PurchaseResult, SelectResult};
pub use session::{InputEvent, Session};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate. Physics is tuned per tick, not per second.
    pub const TICK_RATE_HZ: u32 = 50;

    /// Viewport dimensions
    pub const VIEWPORT_WIDTH: i32 = 800;
    pub const VIEWPORT_HEIGHT: i32 = 600;

    /// Edge length of one grid cell in world units
    pub const CELL_SIZE: i32 = 100;

    /// Downward acceleration added to vertical velocity every tick
    pub const GRAVITY: i32 = 2;
    /// Vertical velocity set by a jump (negative is up)
    pub const JUMP_IMPULSE: i32 = -29;
    /// Horizontal speed while airborne after a jump
    pub const JUMP_SPEED: i32 = 8;
    /// Horizontal speed after touching ground
    pub const RUN_SPEED: i32 = 7;
    /// Velocity of a freshly spawned character
    pub const SPAWN_VELOCITY: (i32, i32) = (5, 1);
    /// Horizontal inset of the character inside its spawn cell
    pub const SPAWN_INSET_X: i32 = 15;

    /// Tile borders sit this far inside the tile's vertical extent
    pub const BORDER_INSET: i32 = 5;
    /// Width of the left/right tile borders
    pub const BORDER_THICKNESS: i32 = 1;

    /// Ticks between run-cycle frames
    pub const RUN_FRAME_CADENCE: u64 = 10;
    /// Ticks between jump-cycle frames
    pub const JUMP_FRAME_CADENCE: u64 = 5;
    /// Ticks between coin spin frames
    pub const COIN_FRAME_CADENCE: u64 = 5;
    /// Frames in the coin spin sheet
    pub const COIN_FRAMES: usize = 8;

    /// Score: one point per this many ticks survived
    pub const TICKS_PER_POINT: u64 = 2;
    /// Score bonus per coin collected
    pub const POINTS_PER_COIN: u64 = 100;

    /// Number of level music tracks to pick from
    pub const LEVEL_MUSIC_TRACKS: u8 = 5;
}

/// Score for an attempt that lasted `elapsed_ticks` and collected `coins`
#[inline]
pub fn score_for(elapsed_ticks: u64, coins: u32) -> u64 {
    elapsed_ticks / consts::TICKS_PER_POINT + consts::POINTS_PER_COIN * u64::from(coins)
}
