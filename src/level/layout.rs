//! Cell grid to placed world-space entities
//!
//! Every entity sits at its cell's top-left corner with its sprite's natural
//! size. A solid tile also gets three hazard borders: thin strips inside its
//! left and right edges and along its bottom. Standing on the tile top is
//! safe; running into its side or bumping its underside is not.

use std::sync::Arc;

use glam::{IVec2, UVec2};
use serde::{Deserialize, Serialize};

use super::grid::{Cell, LevelGrid};
use crate::consts::{BORDER_INSET, CELL_SIZE};
use crate::error::LayoutError;
use crate::sim::entity::{Entity, EntityId, EntityKind, SpikeMount};
use crate::sim::geometry::Aabb;
use crate::sim::sprites::{self, Sprite, SpriteCatalog};

/// Layout switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Cheat mode: every empty cell also holds a coin
    pub coin_rain: bool,
}

/// A level ready to simulate
#[derive(Debug, Clone)]
pub struct LevelLayout {
    pub level_id: String,
    /// Spawn cell (column, row)
    pub spawn: UVec2,
    /// Placed entities in allocation order (ascending id)
    pub entities: Vec<Entity>,
    /// Level size in cells (columns, rows)
    pub extent: UVec2,
}

impl LevelLayout {
    /// Level size in world units
    pub fn world_size(&self) -> IVec2 {
        self.extent.as_ivec2() * CELL_SIZE
    }

    pub fn count(&self, pred: impl Fn(&EntityKind) -> bool) -> usize {
        self.entities.iter().filter(|e| pred(&e.kind)).count()
    }
}

/// Find the single spawn cell
fn find_spawn(grid: &LevelGrid) -> Result<UVec2, LayoutError> {
    let positions: Vec<(usize, usize)> = grid
        .cells()
        .filter(|&(_, _, cell)| cell == Cell::Spawn)
        .map(|(x, y, _)| (x, y))
        .collect();

    match positions.as_slice() {
        [] => Err(LayoutError::NoSpawn),
        [(x, y)] => Ok(UVec2::new(*x as u32, *y as u32)),
        _ => Err(LayoutError::MultipleSpawns { positions }),
    }
}

struct Placer {
    entities: Vec<Entity>,
    next_id: u32,
}

impl Placer {
    fn place(&mut self, kind: EntityKind, origin: IVec2, sprite: &Sprite, masked: bool) {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        let bounds = Aabb::new(origin, sprite.size);
        let mask = masked.then(|| Arc::clone(&sprite.mask));
        self.entities.push(Entity::new(id, kind, bounds, mask));
    }

    fn place_coin(&mut self, origin: IVec2, sprite: &Sprite) {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        let bounds = Aabb::new(origin, sprite.size);
        self.entities.push(Entity::coin(id, bounds, Arc::clone(&sprite.mask)));
    }
}

/// Build the entity layout for a grid
pub fn build_layout(
    grid: &LevelGrid,
    sprites: &SpriteCatalog,
    options: LayoutOptions,
) -> Result<LevelLayout, LayoutError> {
    let spawn = find_spawn(grid)?;

    let tile = Sprite::solid(CELL_SIZE as u32, CELL_SIZE as u32);
    let side = sprites::side_border();
    let bottom = sprites::bottom_border();
    let coin = sprites.coin_frames.first().cloned().unwrap_or_else(|| {
        Sprite::solid(sprites::COIN_SIZE.0, sprites::COIN_SIZE.1)
    });

    let mut placer = Placer {
        entities: Vec::new(),
        next_id: 1,
    };

    for (x, y, cell) in grid.cells() {
        let origin = IVec2::new(x as i32, y as i32) * CELL_SIZE;
        match cell {
            Cell::Solid => {
                placer.place(EntityKind::Border, origin + IVec2::new(0, BORDER_INSET), &side, true);
                placer.place(
                    EntityKind::Border,
                    origin + IVec2::new(CELL_SIZE, BORDER_INSET),
                    &side,
                    true,
                );
                placer.place(
                    EntityKind::Border,
                    origin + IVec2::new(0, CELL_SIZE - BORDER_INSET),
                    &bottom,
                    true,
                );
                placer.place(EntityKind::SolidTile, origin, &tile, false);
            }
            Cell::FloorSpike => {
                placer.place(EntityKind::Spike(SpikeMount::Floor), origin, &sprites.floor_spike, true);
            }
            Cell::CeilingSpike => {
                placer.place(
                    EntityKind::Spike(SpikeMount::Ceiling),
                    origin,
                    &sprites.ceiling_spike,
                    true,
                );
            }
            Cell::Coin => placer.place_coin(origin, &coin),
            Cell::Portal => placer.place(EntityKind::Portal, origin, &sprites.portal, false),
            Cell::Empty if options.coin_rain => placer.place_coin(origin, &coin),
            Cell::Empty | Cell::Spawn => {}
        }
    }

    let layout = LevelLayout {
        level_id: grid.name.clone(),
        spawn,
        entities: placer.entities,
        extent: UVec2::new(grid.width() as u32, grid.height() as u32),
    };
    log::debug!(
        "Layout '{}': {} entities, spawn ({}, {}), {}x{} cells",
        layout.level_id,
        layout.entities.len(),
        spawn.x,
        spawn.y,
        layout.extent.x,
        layout.extent.y
    );
    Ok(layout)
}
