//! Axis-aligned boxes and per-pixel opacity masks
//!
//! Everything here is integer pixel math. A box covers the half-open ranges
//! `[min.x, min.x + size.x)` and `[min.y, min.y + size.y)`, so boxes that only
//! share an edge do not overlap.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in world (or screen) space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: IVec2,
    /// Width and height
    pub size: IVec2,
}

impl Aabb {
    pub fn new(min: IVec2, size: IVec2) -> Self {
        Self { min, size }
    }

    pub fn from_xywh(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::new(IVec2::new(x, y), IVec2::new(w, h))
    }

    /// Exclusive bottom-right corner
    #[inline]
    pub fn max(&self) -> IVec2 {
        self.min + self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0 || self.size.y <= 0
    }

    /// Strict overlap test (touching edges do not count)
    pub fn intersects(&self, other: &Aabb) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }

    /// Overlapping region of two boxes, if any
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        if !self.intersects(other) {
            return None;
        }
        let min = self.min.max(other.min);
        let max = self.max().min(other.max());
        Some(Aabb::new(min, max - min))
    }

    /// Same box moved by `delta`
    #[inline]
    pub fn translated(&self, delta: IVec2) -> Aabb {
        Aabb::new(self.min + delta, self.size)
    }
}

/// Per-pixel opacity bitmap
///
/// Bits are packed row-major into 64-bit words; each row starts on a fresh
/// word so rows can be sliced independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl Mask {
    /// Fully transparent mask
    pub fn empty(width: u32, height: u32) -> Self {
        let words_per_row = (width as usize).div_ceil(64);
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height as usize],
        }
    }

    /// Fully opaque mask
    pub fn full(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    /// Build a mask by evaluating `opaque(x, y)` for every pixel
    pub fn from_fn(width: u32, height: u32, mut opaque: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::empty(width, height);
        for y in 0..height {
            for x in 0..width {
                if opaque(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Build a mask from an alpha channel (one byte per pixel, row-major).
    /// Pixels with alpha strictly above `threshold` are opaque.
    ///
    /// Returns `None` if `alpha` does not hold exactly `width * height` bytes.
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8], threshold: u8) -> Option<Self> {
        if alpha.len() != width as usize * height as usize {
            return None;
        }
        Some(Self::from_fn(width, height, |x, y| {
            alpha[y as usize * width as usize + x as usize] > threshold
        }))
    }

    /// Inscribed ellipse, a reasonable stand-in for rounded sprites
    pub fn ellipse(width: u32, height: u32) -> Self {
        let (a, b) = (width as f32 / 2.0, height as f32 / 2.0);
        Self::from_fn(width, height, |x, y| {
            let dx = (x as f32 + 0.5 - a) / a;
            let dy = (y as f32 + 0.5 - b) / b;
            dx * dx + dy * dy <= 1.0
        })
    }

    /// Same mask flipped top-to-bottom
    pub fn flipped_vertically(&self) -> Self {
        Self::from_fn(self.width, self.height, |x, y| self.get(x, self.height - 1 - y))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Mask dimensions as a vector
    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width as i32, self.height as i32)
    }

    /// Opacity at (x, y); out-of-range pixels are transparent
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let word = self.bits[y as usize * self.words_per_row + x as usize / 64];
        word & (1u64 << (x % 64)) != 0
    }

    pub fn set(&mut self, x: u32, y: u32, opaque: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y as usize * self.words_per_row + x as usize / 64;
        let bit = 1u64 << (x % 64);
        if opaque {
            self.bits[idx] |= bit;
        } else {
            self.bits[idx] &= !bit;
        }
    }

    /// True if any opaque pixel of `self` (placed at `offset_self`) coincides
    /// with an opaque pixel of `other` (placed at `offset_other`).
    pub fn overlaps(&self, offset_self: IVec2, other: &Mask, offset_other: IVec2) -> bool {
        let a = Aabb::new(offset_self, self.size());
        let b = Aabb::new(offset_other, other.size());
        let Some(region) = a.intersection(&b) else {
            return false;
        };
        let region_max = region.max();
        for y in region.min.y..region_max.y {
            let ay = (y - offset_self.y) as u32;
            let by = (y - offset_other.y) as u32;
            for x in region.min.x..region_max.x {
                if self.get((x - offset_self.x) as u32, ay) && other.get((x - offset_other.x) as u32, by) {
                    return true;
                }
            }
        }
        false
    }
}
