/// The step function: advances the animation by one frame.
///
/// Processing order:
///   1. Frame counter and uptime
///   2. Spawn (maybe one new falling word)
///   3. Session timer start (first frame with words falling while Idle)
///   4. Per falling word, newest first: advance, then landing check
///
/// Step 4 walks the falling list from the back so a word can be removed
/// the moment it lands without disturbing the ones still to visit. A word
/// that lands is appended to the stacked store right away, so words later
/// in the same walk can already land on it.

use std::time::Duration;

use crate::domain::collision::resolve_landing;
use crate::domain::word::{advance, StackedWord, TextMeasure};
use super::event::WordEvent;
use super::spawn::spawn;
use super::timer::TimerState;
use super::world::WordFall;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WordFall, measure: &dyn TextMeasure, dt: Duration) -> Vec<WordEvent> {
    let mut events: Vec<WordEvent> = Vec::new();
    world.frame += 1;
    world.uptime += dt;

    spawn(world, measure, &mut events);
    resolve_timer_start(world, &mut events);
    resolve_falling(world, &mut events);

    events
}

fn resolve_timer_start(world: &mut WordFall, events: &mut Vec<WordEvent>) {
    if !world.falling.is_empty() && world.timer.state() == TimerState::Idle && world.timer.start() {
        events.push(WordEvent::TimerStarted);
    }
}

fn resolve_falling(world: &mut WordFall, events: &mut Vec<WordEvent>) {
    let gap = world.collision.min_gap;
    let policy = world.collision.policy;

    let mut i = world.falling.len();
    while i > 0 {
        i -= 1;
        advance(&mut world.falling[i]);

        let landing = resolve_landing(
            &world.falling[i],
            world.stacked.as_slice(),
            world.floor_level,
            gap,
            policy,
        );
        if let Some(landing) = landing {
            let word = world.falling.remove(i);
            events.push(WordEvent::Landed {
                text: word.text.clone(),
                on: landing.on,
                y: landing.y,
            });
            world.stacked.push(StackedWord::land(word, landing.y));
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
