/// Entry point and frame loop.

mod config;
mod domain;
mod logging;
mod sim;
mod ui;

use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use config::FallConfig;
use domain::collision::Support;
use domain::random::RandSource;
use sim::event::WordEvent;
use sim::step::step;
use sim::timer::ThreadScheduler;
use sim::world::WordFall;
use ui::draw::compose;
use ui::input::{Action, InputState};
use ui::renderer::{canvas_size, CellMetrics, Renderer, Status};

fn main() {
    let config = FallConfig::load();

    if let Err(e) = logging::init(&config.log) {
        eprintln!("Warning: logging disabled: {e}");
    }
    log::info!(
        "startup: spawn every {} frames at {:.0}%, gray {}..{}, policy {:?}",
        config.spawn.cadence_frames,
        config.spawn.chance * 100.0,
        config.look.gray_min,
        config.look.gray_max,
        config.collision.policy,
    );

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let (scheduler, ticks) = ThreadScheduler::new();
    let (width, height) = renderer.canvas_size();
    let mut world = WordFall::new(
        width,
        height,
        &config,
        Box::new(RandSource::from_os_rng()),
        Box::new(scheduler),
    );
    let mut input = InputState::new();

    let result = frame_loop(&mut world, &mut input, &mut renderer, &ticks, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::warn!("frame loop failed: {e}");
        eprintln!("Error: {e}");
    }

    log::info!(
        "exit after {} frames: pool {}, stacked {}",
        world.frame,
        world.pool.len(),
        world.stacked.len(),
    );
    log::logger().flush();
}

fn frame_loop(
    world: &mut WordFall,
    input: &mut InputState,
    renderer: &mut Renderer,
    ticks: &Receiver<u64>,
    config: &FallConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let frame = config.timing.frame;
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();

        // ── Input ──
        for action in input.drain_events()? {
            match action {
                Action::Quit => return Ok(()),
                Action::Submit(text) => log_events(&world.submit(&text)),
                Action::Purge(key) => log_events(&[world.remove_by_prefix(key)]),
                Action::Resize(cols, rows) => {
                    let (w, h) = canvas_size(cols, rows);
                    log_events(&[world.resize(w, h)]);
                }
            }
        }

        // ── Timer ticks, serialized onto this thread ──
        while let Ok(id) = ticks.try_recv() {
            world.on_timer_tick(id);
        }

        // ── Step ──
        let dt = frame_start.duration_since(last_frame);
        last_frame = frame_start;
        log_events(&step(world, &CellMetrics, dt));

        // ── Draw ──
        let commands = compose(world);
        let status = Status {
            clock: world.timer.display(),
            pool: world.pool.len(),
            falling: world.falling.len(),
            stacked: world.stacked.len(),
            entry: input.entry(),
        };
        renderer.render(&commands, &status)?;

        let spent = frame_start.elapsed();
        if spent < frame {
            std::thread::sleep(frame - spent);
        }
    }
}

fn log_events(events: &[WordEvent]) {
    for event in events {
        match event {
            WordEvent::Submitted { added, pool } => {
                log::info!("submitted {added} tokens, pool now {pool}");
            }
            WordEvent::Spawned { text, x } => log::debug!("spawned {text:?} at x={x:.1}"),
            WordEvent::SpawnSkipped { text, width } => {
                log::debug!("skipped {text:?}: {width:.0} units wide");
            }
            WordEvent::Landed { text, on, y } => match on {
                Support::Floor => log::debug!("{text:?} landed on floor at y={y:.1}"),
                Support::Word(i) => log::debug!("{text:?} landed on stacked #{i} at y={y:.1}"),
            },
            WordEvent::Purged { key, falling, stacked } => {
                log::info!("purged '{key}': {falling} falling, {stacked} stacked");
            }
            WordEvent::TimerStarted => log::info!("timer started"),
            WordEvent::TimerReset => log::info!("timer reset"),
            WordEvent::Resized { width, height, floor_level } => {
                log::info!("resized to {width:.0}x{height:.0}, floor at {floor_level:.0}");
            }
        }
    }
}
