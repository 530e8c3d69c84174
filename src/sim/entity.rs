//! Placed level entities and the capability traits shared with the character

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::animation::FrameCycle;
use super::geometry::{Aabb, Mask};
use crate::consts::{COIN_FRAME_CADENCE, COIN_FRAMES};

/// Stable entity identifier (allocation order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Collision-group membership as a bit set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tags(u8);

impl Tags {
    /// Blocks movement; overlap grounds the character
    pub const SOLID: Tags = Tags(1 << 0);
    /// Mask contact ends the attempt
    pub const HAZARD: Tags = Tags(1 << 1);
    /// Mask contact consumes the entity
    pub const PICKUP: Tags = Tags(1 << 2);
    /// Box contact wins the level
    pub const EXIT: Tags = Tags(1 << 3);

    pub const fn union(self, other: Tags) -> Tags {
        Tags(self.0 | other.0)
    }

    pub const fn contains(self, other: Tags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Tags) -> bool {
        self.0 & other.0 != 0
    }
}

/// Which way a spike strip is mounted inside its cell
///
/// The level format's own description calls `^` downward-facing and `v`
/// upward-facing. Here `^` is a floor spike with teeth up and `v` hangs from
/// the ceiling, which is how the shipped levels place them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpikeMount {
    /// Resting on the cell floor, teeth up (`^`)
    Floor,
    /// Hanging from the cell ceiling, teeth down (`v`)
    Ceiling,
}

/// Entity variants produced by the layout builder
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    SolidTile,
    /// Thin hazard strip along a tile edge
    Border,
    Spike(SpikeMount),
    /// Animated pickup
    Coin(FrameCycle),
    Portal,
}

impl EntityKind {
    /// Default collision groups for this variant
    pub fn tags(&self) -> Tags {
        match self {
            EntityKind::SolidTile => Tags::SOLID,
            EntityKind::Border | EntityKind::Spike(_) => Tags::HAZARD,
            EntityKind::Coin(_) => Tags::PICKUP,
            EntityKind::Portal => Tags::EXIT,
        }
    }

    /// Key the render collaborator uses to pick artwork
    pub fn sprite_key(&self) -> SpriteKey {
        match self {
            EntityKind::SolidTile => SpriteKey::Tile,
            EntityKind::Border => SpriteKey::Border,
            EntityKind::Spike(SpikeMount::Floor) => SpriteKey::FloorSpike,
            EntityKind::Spike(SpikeMount::Ceiling) => SpriteKey::CeilingSpike,
            EntityKind::Coin(_) => SpriteKey::Coin,
            EntityKind::Portal => SpriteKey::Portal,
        }
    }
}

/// Artwork identifiers handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKey {
    Tile,
    Border,
    FloorSpike,
    CeilingSpike,
    Coin,
    Portal,
    CharacterRun,
    CharacterJump,
}

/// Anything with a world-space bounding box
pub trait Positioned {
    fn bounds(&self) -> Aabb;
}

/// Anything that takes part in collision tests.
///
/// `None` means the whole bounding box is opaque.
pub trait Collidable: Positioned {
    fn mask(&self) -> Option<&Mask>;
}

/// Anything the render collaborator draws
pub trait Drawable: Positioned {
    fn sprite_key(&self) -> SpriteKey;
    fn frame(&self) -> usize;
}

/// A placed level entity
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub tags: Tags,
    pub bounds: Aabb,
    pub mask: Option<Arc<Mask>>,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, bounds: Aabb, mask: Option<Arc<Mask>>) -> Self {
        let tags = kind.tags();
        Self {
            id,
            kind,
            tags,
            bounds,
            mask,
        }
    }

    /// Coin with a fresh spin cycle
    pub fn coin(id: EntityId, bounds: Aabb, mask: Arc<Mask>) -> Self {
        let cycle = FrameCycle::new(COIN_FRAMES, COIN_FRAME_CADENCE);
        Self::new(id, EntityKind::Coin(cycle), bounds, Some(mask))
    }

    /// Advance per-entity animation for the given game tick
    pub fn animate(&mut self, tick: u64) {
        if let EntityKind::Coin(cycle) = &mut self.kind {
            cycle.step(tick);
        }
    }
}

impl Positioned for Entity {
    fn bounds(&self) -> Aabb {
        self.bounds
    }
}

impl Collidable for Entity {
    fn mask(&self) -> Option<&Mask> {
        self.mask.as_deref()
    }
}

impl Drawable for Entity {
    fn sprite_key(&self) -> SpriteKey {
        self.kind.sprite_key()
    }

    fn frame(&self) -> usize {
        match &self.kind {
            EntityKind::Coin(cycle) => cycle.index(),
            _ => 0,
        }
    }
}
