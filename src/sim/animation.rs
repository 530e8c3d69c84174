//! Frame cycles driven by elapsed ticks
//!
//! The character owns two cycles and plays exactly one at a time: the run
//! cycle while grounded and the jump cycle while airborne. Whichever cycle is
//! not playing is held at its first frame, so re-entering a state always
//! starts that cycle from the beginning.

use serde::{Deserialize, Serialize};

use super::character::MotionState;
use super::entity::SpriteKey;
use crate::consts::{JUMP_FRAME_CADENCE, RUN_FRAME_CADENCE};

/// A looping frame index that advances every `cadence` ticks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameCycle {
    frame_count: usize,
    cadence: u64,
    index: usize,
}

impl FrameCycle {
    pub fn new(frame_count: usize, cadence: u64) -> Self {
        Self {
            frame_count: frame_count.max(1),
            cadence: cadence.max(1),
            index: 0,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Advance one frame if `tick` lands on the cadence. Returns true if the
    /// frame changed.
    pub fn step(&mut self, tick: u64) -> bool {
        if tick % self.cadence != 0 {
            return false;
        }
        self.index = (self.index + 1) % self.frame_count;
        true
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

/// Which artwork the character shows this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pose {
    Run(usize),
    Jump(usize),
}

impl Pose {
    pub fn sprite_key(self) -> SpriteKey {
        match self {
            Pose::Run(_) => SpriteKey::CharacterRun,
            Pose::Jump(_) => SpriteKey::CharacterJump,
        }
    }

    pub fn frame(self) -> usize {
        match self {
            Pose::Run(i) | Pose::Jump(i) => i,
        }
    }
}

/// Run/jump animation state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterAnimator {
    run: FrameCycle,
    jump: FrameCycle,
    pose: Pose,
}

impl CharacterAnimator {
    pub fn new(run_frames: usize, jump_frames: usize) -> Self {
        Self {
            run: FrameCycle::new(run_frames, RUN_FRAME_CADENCE),
            jump: FrameCycle::new(jump_frames, JUMP_FRAME_CADENCE),
            pose: Pose::Run(0),
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Advance the cycle for `state` at elapsed tick `tick`
    pub fn step(&mut self, state: MotionState, tick: u64) {
        self.pose = match state {
            MotionState::Grounded => {
                self.jump.reset();
                self.run.step(tick);
                Pose::Run(self.run.index())
            }
            MotionState::Airborne => {
                self.run.reset();
                self.jump.step(tick);
                Pose::Jump(self.jump.index())
            }
        };
    }

    /// A jump always starts from the first jump frame
    pub fn restart_jump(&mut self) {
        self.jump.reset();
        self.pose = Pose::Jump(0);
    }
}
