/// WordFall: the complete state of a running animation.
///
/// One value owns everything that changes: the word pool, the falling
/// list, the stacked store, the session timer, and the canvas geometry.
/// It is created at startup, mutated by `step()` once per frame and by
/// input events in between, and dropped at exit. Nothing is persisted.
///
/// ## Coordinates
///
/// World units, origin top-left, y grows downward. The floor is a
/// horizontal line `floor_offset` units above the canvas bottom.
/// Resizing moves the floor but does not reclamp existing words, so words
/// that were on screen may end up outside the new bounds.

use std::time::Duration;

use crate::config::{CollisionConfig, FallConfig, FloorMode, LookConfig, SpawnConfig};
use crate::domain::pool::WordPool;
use crate::domain::random::Uniform;
use crate::domain::word::{starts_with_letter, FallingWord, StackedStore};
use super::event::WordEvent;
use super::timer::{Scheduler, SessionTimer};

pub struct WordFall {
    pub pool: WordPool,
    pub falling: Vec<FallingWord>,
    pub stacked: StackedStore,
    pub timer: SessionTimer,

    pub width: f32,
    pub height: f32,
    pub floor_level: f32,

    /// Frames stepped so far. The first frame is 1.
    pub frame: u64,
    /// Time since startup, summed from frame deltas.
    pub uptime: Duration,

    pub spawn: SpawnConfig,
    pub look: LookConfig,
    pub collision: CollisionConfig,

    pub(crate) rng: Box<dyn Uniform>,
}

impl WordFall {
    pub fn new(
        width: f32,
        height: f32,
        config: &FallConfig,
        rng: Box<dyn Uniform>,
        scheduler: Box<dyn Scheduler>,
    ) -> Self {
        WordFall {
            pool: WordPool::new(),
            falling: Vec::new(),
            stacked: StackedStore::new(),
            timer: SessionTimer::new(scheduler, config.timing.timer_period),
            width,
            height,
            floor_level: height - config.look.floor_offset,
            frame: 0,
            uptime: Duration::ZERO,
            spawn: config.spawn.clone(),
            look: config.look.clone(),
            collision: config.collision.clone(),
            rng,
        }
    }

    /// Accept a text submission. Whitespace-only text is a silent no-op;
    /// anything else grows the pool and resets the session timer.
    pub fn submit(&mut self, text: &str) -> Vec<WordEvent> {
        let added = self.pool.submit(text);
        if added == 0 {
            return vec![];
        }
        self.timer.reset();
        vec![
            WordEvent::TimerReset,
            WordEvent::Submitted { added, pool: self.pool.len() },
        ]
    }

    /// Delete every falling and stacked word whose text starts with `key`,
    /// ignoring case. The two lists are filtered independently; survivors
    /// keep their order.
    pub fn remove_by_prefix(&mut self, key: char) -> WordEvent {
        let before = self.falling.len();
        self.falling.retain(|w| !starts_with_letter(&w.text, key));
        let falling = before - self.falling.len();
        let stacked = self.stacked.remove_by_prefix(key);
        WordEvent::Purged { key, falling, stacked }
    }

    /// New canvas size. Only the floor follows; words stay where they are.
    pub fn resize(&mut self, width: f32, height: f32) -> WordEvent {
        self.width = width;
        self.height = height;
        self.floor_level = height - self.look.floor_offset;
        WordEvent::Resized { width, height, floor_level: self.floor_level }
    }

    /// Forward a periodic tick to the session timer.
    pub fn on_timer_tick(&mut self, id: u64) -> bool {
        self.timer.on_tick(id)
    }

    /// Is the floor strip drawn this frame?
    pub fn floor_visible(&self) -> bool {
        match self.look.floor {
            FloorMode::Always => true,
            FloorMode::Intro => self.uptime < self.look.floor_intro,
        }
    }
}
