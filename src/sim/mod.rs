//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, integer physics
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod animation;
pub mod camera;
pub mod character;
pub mod collision;
pub mod entity;
pub mod geometry;
pub mod sprites;
pub mod state;
pub mod tick;
pub mod view;

pub use animation::{CharacterAnimator, FrameCycle, Pose};
pub use camera::Camera;
pub use character::{Character, MotionState};
pub use collision::{GroundContact, any_box_overlap, any_mask_overlap, mask_hits, resolve_ground};
pub use entity::{Collidable, Drawable, Entity, EntityId, EntityKind, Positioned, SpikeMount, SpriteKey, Tags};
pub use geometry::{Aabb, Mask};
pub use sprites::{Sprite, SpriteCatalog};
pub use state::{GameEvent, GamePhase, GameState, LossCause};
pub use tick::{TickInput, tick};
pub use view::DrawCommand;
