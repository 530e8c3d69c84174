//! The player character: velocity integration, jump and ground state

use std::sync::Arc;

use glam::{IVec2, UVec2};
use serde::{Deserialize, Serialize};

use super::animation::{CharacterAnimator, Pose};
use super::entity::{Collidable, Drawable, Positioned, SpriteKey};
use super::geometry::{Aabb, Mask};
use super::sprites::SpriteCatalog;
use crate::consts::*;

/// Floor contact state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionState {
    Grounded,
    Airborne,
}

/// The controllable character for one level attempt
#[derive(Debug, Clone)]
pub struct Character {
    /// World-space top-left corner
    pub pos: IVec2,
    pub size: IVec2,
    /// Per-tick displacement (`s_x`, `s_y`)
    pub vel: IVec2,
    pub state: MotionState,
    /// Ticks processed this attempt; drives animation cadence and score
    pub elapsed_ticks: u64,
    /// Coins picked up this attempt
    pub coins: u32,
    animator: CharacterAnimator,
    run_masks: Vec<Arc<Mask>>,
    jump_masks: Vec<Arc<Mask>>,
}

impl Character {
    /// Spawn in grid cell `cell`, inset horizontally inside it
    pub fn spawn(cell: UVec2, sprites: &SpriteCatalog) -> Self {
        let pos = IVec2::new(
            cell.x as i32 * CELL_SIZE + SPAWN_INSET_X,
            cell.y as i32 * CELL_SIZE,
        );
        let run_masks: Vec<_> = sprites.run_frames.iter().map(|s| s.mask.clone()).collect();
        let jump_masks: Vec<_> = sprites.jump_frames.iter().map(|s| s.mask.clone()).collect();
        Self {
            pos,
            size: sprites.character_size(),
            vel: IVec2::new(SPAWN_VELOCITY.0, SPAWN_VELOCITY.1),
            state: MotionState::Airborne,
            elapsed_ticks: 0,
            coins: 0,
            animator: CharacterAnimator::new(run_masks.len(), jump_masks.len()),
            run_masks,
            jump_masks,
        }
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.state == MotionState::Grounded
    }

    pub fn pose(&self) -> Pose {
        self.animator.pose()
    }

    /// Start a jump. Ignored unless grounded; returns whether it fired.
    pub fn jump(&mut self) -> bool {
        if !self.is_grounded() {
            return false;
        }
        self.state = MotionState::Airborne;
        self.vel = IVec2::new(JUMP_SPEED, JUMP_IMPULSE);
        self.animator.restart_jump();
        true
    }

    /// Count one tick and advance the animation for the current state
    pub fn animate(&mut self) {
        self.elapsed_ticks += 1;
        self.animator.step(self.state, self.elapsed_ticks);
    }

    /// Apply this tick's displacement
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    /// Solid contact after moving: undo the vertical step and stand
    pub fn land(&mut self) {
        self.pos.y -= self.vel.y;
        self.vel.y = 0;
        self.vel.x = RUN_SPEED;
        self.state = MotionState::Grounded;
    }

    /// No solid contact after moving. Velocity is left to gravity.
    pub fn leave_ground(&mut self) {
        self.state = MotionState::Airborne;
    }

    /// Accumulate gravity for the next tick
    pub fn apply_gravity(&mut self) {
        self.vel.y += GRAVITY;
    }

    /// Score so far this attempt
    pub fn score(&self) -> u64 {
        crate::score_for(self.elapsed_ticks, self.coins)
    }

    fn current_mask(&self) -> Option<&Mask> {
        let (masks, index) = match self.pose() {
            Pose::Run(i) => (&self.run_masks, i),
            Pose::Jump(i) => (&self.jump_masks, i),
        };
        masks.get(index).map(|m| m.as_ref())
    }
}

impl Positioned for Character {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

impl Collidable for Character {
    fn mask(&self) -> Option<&Mask> {
        self.current_mask()
    }
}

impl Drawable for Character {
    fn sprite_key(&self) -> SpriteKey {
        self.pose().sprite_key()
    }

    fn frame(&self) -> usize {
        self.pose().frame()
    }
}
