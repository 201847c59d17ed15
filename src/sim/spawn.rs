/// Spawner: promotes pool tokens into falling words.
///
/// On every `cadence_frames`-th frame, if the pool is non-empty, roll
/// once against `chance`. On success draw a token (with replacement),
/// size it, and drop it in at a random x that keeps `padding` clear of
/// both canvas edges. A word too wide for that range is skipped.
///
/// Random draws happen in a fixed order: roll, token, x, speed, gray,
/// rotation, spin. Nothing is drawn on frames that don't qualify.

use crate::domain::word::{FallingWord, TextMeasure};
use super::event::WordEvent;
use super::world::WordFall;

pub fn spawn(world: &mut WordFall, measure: &dyn TextMeasure, events: &mut Vec<WordEvent>) {
    let cfg = world.spawn.clone();
    if world.pool.is_empty() || world.frame % cfg.cadence_frames != 0 {
        return;
    }
    if world.rng.unit() >= cfg.chance {
        return;
    }

    let text = match world.pool.sample(world.rng.as_mut()) {
        Some(t) => t.to_owned(),
        None => return,
    };
    let width = measure.width(&text) + cfg.padding;

    let lo = cfg.padding;
    let hi = world.width - width - cfg.padding;
    if hi < lo {
        events.push(WordEvent::SpawnSkipped { text, width });
        return;
    }

    let rng = world.rng.as_mut();
    let x = rng.range(lo, hi);
    let speed = rng.range(cfg.speed_min, cfg.speed_max);
    let gray = pick_gray(rng.range(world.look.gray_min as f32, world.look.gray_max as f32 + 1.0),
                         world.look.gray_max);
    let rotation = rng.range(-cfg.tilt, cfg.tilt);
    let spin = rng.range(-cfg.spin, cfg.spin);

    events.push(WordEvent::Spawned { text: text.clone(), x });
    world.falling.push(FallingWord {
        text,
        x,
        y: cfg.start_y,
        width,
        height: world.look.word_height,
        speed,
        rotation,
        spin,
        gray,
    });
}

fn pick_gray(v: f32, max: u8) -> u8 {
    (v.floor().max(0.0) as u32).min(max as u32) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallConfig;
    use crate::sim::world::tests::world_with;

    struct Mono;

    impl TextMeasure for Mono {
        fn width(&self, text: &str) -> f32 {
            text.chars().count() as f32 * 10.0
        }
    }

    #[test]
    fn spawns_from_pool_with_configured_ranges() {
        // roll, token, x, speed, gray, rotation, spin
        let mut w = world_with(&[0.1, 0.5, 0.0, 0.5, 0.0, 0.5, 0.5], &FallConfig::default());
        w.submit("Hello World foo");
        w.frame = 10;

        let mut events = vec![];
        spawn(&mut w, &Mono, &mut events);

        assert_eq!(w.falling.len(), 1);
        let f = &w.falling[0];
        assert_eq!(f.text, "World");
        assert_eq!(f.y, -40.0);
        assert_eq!(f.width, 70.0);
        assert_eq!(f.height, 40.0);
        assert_eq!(f.x, 20.0);
        assert_eq!(f.speed, 2.0);
        assert_eq!(f.gray, 50);
        assert_eq!(f.rotation, 0.0);
        assert_eq!(f.spin, 0.0);
        assert_eq!(events, vec![WordEvent::Spawned { text: "World".into(), x: 20.0 }]);
    }

    #[test]
    fn x_stays_inside_padding() {
        let mut w = world_with(&[0.0, 0.0, 0.9999, 0.0, 0.9999, 0.0, 0.9999], &FallConfig::default());
        w.submit("Hello");
        w.frame = 20;
        spawn(&mut w, &Mono, &mut vec![]);
        let f = &w.falling[0];
        assert!(f.x >= 20.0);
        assert!(f.x <= 800.0 - f.width - 20.0);
        assert!(f.gray <= 200);
        assert!(f.spin <= 0.02);
    }

    #[test]
    fn off_cadence_frames_draw_nothing() {
        let mut w = world_with(&[0.0], &FallConfig::default());
        w.submit("a");
        for frame in 1..10 {
            w.frame = frame;
            spawn(&mut w, &Mono, &mut vec![]);
        }
        assert!(w.falling.is_empty());
    }

    #[test]
    fn failed_roll_spawns_nothing() {
        let mut w = world_with(&[0.3], &FallConfig::default());
        w.submit("a");
        w.frame = 10;
        spawn(&mut w, &Mono, &mut vec![]);
        assert!(w.falling.is_empty());
    }

    #[test]
    fn empty_pool_spawns_nothing() {
        let mut w = world_with(&[0.0], &FallConfig::default());
        w.frame = 10;
        spawn(&mut w, &Mono, &mut vec![]);
        assert!(w.falling.is_empty());
    }

    #[test]
    fn too_wide_word_is_skipped() {
        let mut w = world_with(&[0.0, 0.0], &FallConfig::default());
        w.resize(100.0, 600.0);
        w.submit("enormous");
        w.frame = 10;
        let mut events = vec![];
        spawn(&mut w, &Mono, &mut events);
        assert!(w.falling.is_empty());
        assert_eq!(
            events,
            vec![WordEvent::SpawnSkipped { text: "enormous".into(), width: 100.0 }]
        );
    }

    #[test]
    fn exact_fit_spawns_at_padding() {
        // 800 - 2*20 padding leaves 760 for the word: 74 chars * 10 + 20 = 760
        let mut w = world_with(&[0.0, 0.0, 0.7], &FallConfig::default());
        w.submit(&"m".repeat(74));
        w.frame = 10;
        spawn(&mut w, &Mono, &mut vec![]);
        assert_eq!(w.falling.len(), 1);
        assert_eq!(w.falling[0].x, 20.0);
    }

    #[test]
    fn gray_pick_clamps() {
        assert_eq!(pick_gray(50.0, 200), 50);
        assert_eq!(pick_gray(200.99, 200), 200);
        assert_eq!(pick_gray(201.0, 200), 200);
    }
}
