//! Render handoff: what to draw this tick and where on screen

use serde::Serialize;

use super::entity::{Drawable, EntityId, SpriteKey};
use super::geometry::Aabb;
use super::state::GameState;

/// One sprite for the render collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawCommand {
    /// `None` for the character
    pub entity: Option<EntityId>,
    pub sprite: SpriteKey,
    pub frame: usize,
    /// Screen-space rectangle (camera applied)
    pub screen: Aabb,
}

impl GameState {
    /// Draw list in painter's order: level entities, then the character.
    /// Entities scrolled fully off screen are skipped.
    pub fn draw_list(&self) -> Vec<DrawCommand> {
        let mut commands: Vec<DrawCommand> = self
            .entities
            .iter()
            .filter(|e| self.camera.is_visible(&e.bounds))
            .map(|e| DrawCommand {
                entity: Some(e.id),
                sprite: e.sprite_key(),
                frame: e.frame(),
                screen: self.camera.to_screen(&e.bounds),
            })
            .collect();

        let character = &self.character;
        commands.push(DrawCommand {
            entity: None,
            sprite: character.sprite_key(),
            frame: character.frame(),
            screen: self.camera.to_screen(&Aabb::new(character.pos, character.size)),
        });
        commands
    }
}
