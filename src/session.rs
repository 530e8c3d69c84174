//! Session loop: input -> tick -> outcome handoff
//!
//! One session drives one level attempt. Platform input is queued between
//! ticks and folded into a single [`TickInput`] at the start of the next
//! tick. Terminal outcomes are fed to the progression store exactly once; a
//! failed save is logged and reported in the frame, never raised.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, PersistenceError};
use crate::level::{LevelLayout, build_layout, load_level};
use crate::persistence::{ProgressBackend, StatisticsRow};
use crate::progression::ProgressionStore;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, SpriteCatalog, TickInput, tick};

/// Platform input events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Jump,
    Pause,
    Quit,
}

/// Input folded from everything queued since the last tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainedInput {
    pub tick: TickInput,
    pub quit: bool,
}

/// Events queued by the platform layer between ticks
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Fold and clear the queue. Any jump counts once; pause presses toggle
    /// by parity.
    pub fn drain(&mut self) -> DrainedInput {
        let mut drained = DrainedInput::default();
        for event in self.events.drain(..) {
            match event {
                InputEvent::Jump => drained.tick.jump = true,
                InputEvent::Pause => drained.tick.pause = !drained.tick.pause,
                InputEvent::Quit => drained.quit = true,
            }
        }
        drained
    }
}

/// Where the session is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Running,
    /// A win or loss fired and was handed to the store
    Finished,
    /// Quit before an outcome
    Quit,
}

/// On-screen counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hud {
    pub coins: u32,
    pub score: u64,
    /// Best score on record when the attempt started
    pub best_score: u64,
}

/// Result of one session step
#[derive(Debug, Default)]
pub struct Frame {
    pub events: Vec<GameEvent>,
    /// Progress that failed to save this step
    pub save_error: Option<PersistenceError>,
}

/// One level attempt
#[derive(Debug)]
pub struct Session {
    state: GameState,
    inputs: InputQueue,
    status: SessionStatus,
    record_at_start: StatisticsRow,
    pending_error: Option<PersistenceError>,
}

impl Session {
    /// Start an attempt on an already built layout
    pub fn start<B: ProgressBackend>(
        layout: LevelLayout,
        sprites: &SpriteCatalog,
        seed: u64,
        store: &mut ProgressionStore<B>,
    ) -> Self {
        let level_id = layout.level_id.clone();
        let (record_at_start, pending_error) = match store.begin_level(&level_id) {
            Ok(record) => (record, None),
            Err(err) => {
                log::error!("Could not create record for '{level_id}': {err}");
                (StatisticsRow::default(), Some(err))
            }
        };
        log::info!(
            "Starting '{level_id}' (best {} points, {} coins)",
            record_at_start.points,
            record_at_start.max_coins
        );

        Self {
            state: GameState::new(layout, sprites, seed),
            inputs: InputQueue::default(),
            status: SessionStatus::Running,
            record_at_start,
            pending_error,
        }
    }

    /// Load a level file and start an attempt on it
    pub fn load<B: ProgressBackend>(
        path: &Path,
        settings: &Settings,
        sprites: &SpriteCatalog,
        seed: u64,
        store: &mut ProgressionStore<B>,
    ) -> Result<Self, Error> {
        let grid = load_level(path)?;
        let layout = build_layout(&grid, sprites, settings.layout_options())?;
        let mut session = Self::start(layout, sprites, seed, store);
        session.state = session.state.with_viewport_width(settings.viewport_width);
        Ok(session)
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.inputs.push(event);
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn hud(&self) -> Hud {
        Hud {
            coins: self.state.coins_collected(),
            score: self.state.score(),
            best_score: self.record_at_start.points,
        }
    }

    /// Run one tick with the queued input and hand any outcome to `store`
    pub fn advance<B: ProgressBackend>(&mut self, store: &mut ProgressionStore<B>) -> Frame {
        let mut frame = Frame {
            events: Vec::new(),
            save_error: self.pending_error.take(),
        };
        if !self.is_running() {
            return frame;
        }

        let input = self.inputs.drain();
        if input.quit {
            log::info!("Quit during '{}'", self.state.level_id);
            self.status = SessionStatus::Quit;
            return frame;
        }

        frame.events = tick(&mut self.state, &input.tick);
        for event in frame.events.iter().filter(|e| e.is_outcome()) {
            self.status = SessionStatus::Finished;
            if let Err(err) = store.apply_outcome(event) {
                log::error!("Progress for '{}' was not saved: {err}", self.state.level_id);
                frame.save_error = Some(err);
            }
        }
        frame
    }
}
