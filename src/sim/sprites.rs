//! Sprite metrics and collision masks
//!
//! Image decoding belongs to the asset collaborator. The simulation only needs
//! each sprite's natural size and opacity mask, which the collaborator can
//! supply through [`Mask::from_alpha`]. [`SpriteCatalog::default`] synthesizes
//! masks shaped like the stock artwork so the core runs without any assets.

use std::sync::Arc;

use glam::IVec2;

use super::geometry::Mask;
use crate::consts::{BORDER_INSET, BORDER_THICKNESS, CELL_SIZE, COIN_FRAMES};

/// Natural size plus opacity mask for one sprite frame
#[derive(Debug, Clone)]
pub struct Sprite {
    pub size: IVec2,
    pub mask: Arc<Mask>,
}

impl Sprite {
    /// Sprite whose size is taken from its mask
    pub fn from_mask(mask: Mask) -> Self {
        Self {
            size: mask.size(),
            mask: Arc::new(mask),
        }
    }

    /// Fully opaque rectangle
    pub fn solid(width: u32, height: u32) -> Self {
        Self::from_mask(Mask::full(width, height))
    }
}

/// Every sprite shape the simulation collides with
#[derive(Debug, Clone)]
pub struct SpriteCatalog {
    /// Character frames played while running on the ground
    pub run_frames: Vec<Sprite>,
    /// Character frames played while airborne
    pub jump_frames: Vec<Sprite>,
    /// Spike resting on the floor of its cell (`^`)
    pub floor_spike: Sprite,
    /// Spike hanging from the ceiling of its cell (`v`)
    pub ceiling_spike: Sprite,
    /// Coin spin frames (collision uses the first)
    pub coin_frames: Vec<Sprite>,
    /// Exit portal (box collision only)
    pub portal: Sprite,
}

/// Character artwork size
pub const CHARACTER_SIZE: (u32, u32) = (70, 80);
/// Coin frame size
pub const COIN_SIZE: (u32, u32) = (60, 64);
/// Portal size
pub const PORTAL_SIZE: (u32, u32) = (80, 100);
/// Stock character cycles ship with this many frames each
pub const DEFAULT_CHARACTER_FRAMES: usize = 4;

/// Teeth per spike strip
const SPIKE_TEETH: u32 = 4;

impl Default for SpriteCatalog {
    fn default() -> Self {
        let body = Sprite::from_mask(Mask::ellipse(CHARACTER_SIZE.0, CHARACTER_SIZE.1));
        let coin = Sprite::from_mask(Mask::ellipse(COIN_SIZE.0, COIN_SIZE.1));
        let floor_spike = Sprite::from_mask(spike_strip(CELL_SIZE as u32, SPIKE_TEETH));
        let ceiling_spike = Sprite::from_mask(floor_spike.mask.flipped_vertically());

        Self {
            run_frames: vec![body.clone(); DEFAULT_CHARACTER_FRAMES],
            jump_frames: vec![body; DEFAULT_CHARACTER_FRAMES],
            floor_spike,
            ceiling_spike,
            coin_frames: vec![coin; COIN_FRAMES],
            portal: Sprite::solid(PORTAL_SIZE.0, PORTAL_SIZE.1),
        }
    }
}

impl SpriteCatalog {
    /// Character bounding size (taken from the first run frame)
    pub fn character_size(&self) -> IVec2 {
        self.run_frames
            .first()
            .map(|s| s.size)
            .unwrap_or(IVec2::new(CHARACTER_SIZE.0 as i32, CHARACTER_SIZE.1 as i32))
    }
}

/// Thin vertical border on the left or right edge of a tile
pub fn side_border() -> Sprite {
    Sprite::solid(BORDER_THICKNESS as u32, (CELL_SIZE - 2 * BORDER_INSET) as u32)
}

/// Strip along the bottom edge of a tile
pub fn bottom_border() -> Sprite {
    Sprite::solid(CELL_SIZE as u32, BORDER_INSET as u32)
}

/// Square strip of triangular teeth filling the bottom half, points up
fn spike_strip(side: u32, teeth: u32) -> Mask {
    let tooth_width = side / teeth;
    let tooth_height = side / 2;
    let half = tooth_width as f32 / 2.0;
    Mask::from_fn(side, side, |x, y| {
        if y < side - tooth_height {
            return false;
        }
        // Rows below the tip widen linearly to the full tooth at the base
        let depth = (y - (side - tooth_height) + 1) as f32 / tooth_height as f32;
        let local_x = (x % tooth_width) as f32 + 0.5;
        (local_x - half).abs() <= depth * half
    })
}
