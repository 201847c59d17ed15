/// Events emitted by the animation state.
/// The host consumes these for logging; nothing in the sim reads them back.

use crate::domain::collision::Support;

#[derive(Clone, Debug, PartialEq)]
pub enum WordEvent {
    Submitted { added: usize, pool: usize },
    Spawned { text: String, x: f32 },
    /// The drawn word is wider than the canvas allows.
    SpawnSkipped { text: String, width: f32 },
    Landed { text: String, on: Support, y: f32 },
    Purged { key: char, falling: usize, stacked: usize },
    TimerStarted,
    TimerReset,
    Resized { width: f32, height: f32, floor_level: f32 },
}
