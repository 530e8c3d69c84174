//! Collision tests between the character and placed entities
//!
//! Two predicates, both evaluated against one tagged entity group at a time:
//! - box overlap: strict bounding-box intersection (solid tiles, the exit)
//! - mask overlap: opaque pixels of both sprites coincide (hazards, pickups)
//!
//! Box overlap is a necessary condition for mask overlap, so it doubles as
//! the broad phase.

use glam::IVec2;

use super::character::Character;
use super::entity::{Collidable, Entity, EntityId, Tags};
use super::geometry::{Aabb, Mask};

/// Result of ground resolution for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundContact {
    /// Overlapped a solid; the vertical step was undone
    Landed,
    /// No solid overlap after moving
    Clear,
}

/// Strict bounding-box overlap
#[inline]
pub fn boxes_overlap(a: &impl Collidable, b: &impl Collidable) -> bool {
    a.bounds().intersects(&b.bounds())
}

/// Per-pixel overlap. A missing mask counts as a fully opaque box.
pub fn masks_overlap(a: &impl Collidable, b: &impl Collidable) -> bool {
    let (ab, bb) = (a.bounds(), b.bounds());
    if !ab.intersects(&bb) {
        return false;
    }
    match (a.mask(), b.mask()) {
        (Some(am), Some(bm)) => am.overlaps(ab.min, bm, bb.min),
        (Some(m), None) => mask_hits_box(m, ab.min, &bb),
        (None, Some(m)) => mask_hits_box(m, bb.min, &ab),
        (None, None) => true,
    }
}

fn mask_hits_box(mask: &Mask, offset: IVec2, other: &Aabb) -> bool {
    let own = Aabb::new(offset, mask.size());
    let Some(region) = own.intersection(other) else {
        return false;
    };
    let max = region.max();
    (region.min.y..max.y).any(|y| {
        (region.min.x..max.x).any(|x| mask.get((x - offset.x) as u32, (y - offset.y) as u32))
    })
}

/// True if the subject's box overlaps any entity carrying `tag`
pub fn any_box_overlap<'a>(
    subject: &impl Collidable,
    entities: impl IntoIterator<Item = &'a Entity>,
    tag: Tags,
) -> bool {
    entities
        .into_iter()
        .filter(|e| e.tags.contains(tag))
        .any(|e| boxes_overlap(subject, e))
}

/// True if the subject's mask overlaps any entity carrying `tag`
pub fn any_mask_overlap<'a>(
    subject: &impl Collidable,
    entities: impl IntoIterator<Item = &'a Entity>,
    tag: Tags,
) -> bool {
    entities
        .into_iter()
        .filter(|e| e.tags.contains(tag))
        .any(|e| masks_overlap(subject, e))
}

/// IDs of every entity carrying `tag` whose mask the subject overlaps
pub fn mask_hits<'a>(
    subject: &impl Collidable,
    entities: impl IntoIterator<Item = &'a Entity>,
    tag: Tags,
) -> Vec<EntityId> {
    entities
        .into_iter()
        .filter(|e| e.tags.contains(tag))
        .filter(|e| masks_overlap(subject, *e))
        .map(|e| e.id)
        .collect()
}

/// Resolve floor contact after the character has moved this tick.
///
/// Any solid overlap lands the character (vertical step undone, vertical
/// velocity zeroed, run speed restored); no overlap makes it airborne.
pub fn resolve_ground(character: &mut Character, entities: &[Entity]) -> GroundContact {
    if any_box_overlap(&*character, entities, Tags::SOLID) {
        character.land();
        GroundContact::Landed
    } else {
        character.leave_ground();
        GroundContact::Clear
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::UVec2;

    use super::*;
    use crate::consts::*;
    use crate::sim::character::MotionState;
    use crate::sim::entity::{EntityKind, SpikeMount};
    use crate::sim::sprites::SpriteCatalog;

    fn solid(id: u32, x: i32, y: i32, w: i32, h: i32) -> Entity {
        Entity::new(EntityId(id), EntityKind::SolidTile, Aabb::from_xywh(x, y, w, h), None)
    }

    #[test]
    fn test_mask_overlap_is_stricter_than_box() {
        let sprites = SpriteCatalog::default();
        let character = Character::spawn(UVec2::new(0, 0), &sprites);
        // Spike teeth occupy only the lower half of the spike's box
        let spike = Entity::new(
            EntityId(1),
            EntityKind::Spike(SpikeMount::Floor),
            Aabb::from_xywh(0, 60, 100, 100),
            Some(sprites.floor_spike.mask.clone()),
        );
        assert!(boxes_overlap(&character, &spike));
        assert!(!masks_overlap(&character, &spike));
    }

    #[test]
    fn test_unmasked_entity_uses_its_box() {
        let sprites = SpriteCatalog::default();
        let character = Character::spawn(UVec2::new(0, 0), &sprites);
        // Character box is (15, 0)..(85, 80); ellipse is transparent at the corner
        let corner = solid(1, 82, 76, 10, 10);
        assert!(boxes_overlap(&character, &corner));
        assert!(!masks_overlap(&character, &corner));
        let center = solid(2, 40, 30, 10, 10);
        assert!(masks_overlap(&character, &center));
    }

    #[test]
    fn test_mask_hits_filters_by_tag() {
        let border = Entity::new(
            EntityId(7),
            EntityKind::Border,
            Aabb::from_xywh(0, 0, 10, 10),
            Some(Arc::new(Mask::full(10, 10))),
        );
        let tile = solid(8, 0, 0, 10, 10);
        let subject = solid(9, 5, 5, 10, 10);
        let hits = mask_hits(&subject, [&border, &tile], Tags::HAZARD);
        assert_eq!(hits, vec![EntityId(7)]);
        assert!(any_mask_overlap(&subject, [&border, &tile], Tags::SOLID));
    }

    #[test]
    fn test_resolve_ground_lands_on_floor() {
        let mut character = Character::spawn(UVec2::new(0, 0), &SpriteCatalog::default());
        let floor = vec![solid(1, 0, 100, 1000, 100)];
        // Bottom edge at 80; a 25px step crosses into the floor
        character.vel = IVec2::new(5, 25);
        character.integrate();
        assert_eq!(resolve_ground(&mut character, &floor), GroundContact::Landed);
        assert_eq!(character.pos.y, 0);
        assert_eq!(character.vel, IVec2::new(RUN_SPEED, 0));
        assert_eq!(character.state, MotionState::Grounded);
    }

    #[test]
    fn test_resolve_ground_clears_when_no_overlap() {
        let mut character = Character::spawn(UVec2::new(0, 0), &SpriteCatalog::default());
        character.state = MotionState::Grounded;
        let floor = vec![solid(1, 0, 100, 1000, 100)];
        character.vel = IVec2::new(5, 20);
        character.integrate();
        // Bottom edge now exactly at the floor top: touching is not overlap
        assert_eq!(resolve_ground(&mut character, &floor), GroundContact::Clear);
        assert_eq!(character.state, MotionState::Airborne);
        assert_eq!(character.vel, IVec2::new(5, 20));
    }
}
