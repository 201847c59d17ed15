/// Session timer: wall-clock seconds since words started falling.
///
/// ## States
///
///   Idle ──start()──▶ Running ──reset()──▶ Idle
///
/// While Running, a periodic tick source delivers one tick per period
/// (1 s by default). Each tick bumps `elapsed` and republishes the
/// "MM:SS" display. `reset()` cancels the tick source, zeroes the count
/// and publishes "00:00".
///
/// ## Tick delivery
///
/// Ticks are scheduled independently of the frame clock. A `Scheduler`
/// hands out a `TickHandle` per run; each tick carries the id of the
/// handle that produced it. `on_tick` only accepts ticks whose id matches
/// the live handle, so a tick that was already queued when `reset()` ran
/// is dropped instead of counted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerState {
    Idle,
    Running,
}

/// Cancellable handle for one periodic tick source.
#[derive(Clone, Debug)]
pub struct TickHandle {
    id: u64,
    cancelled: Arc<AtomicBool>,
}

impl TickHandle {
    pub fn new(id: u64) -> Self {
        TickHandle { id, cancelled: Arc::new(AtomicBool::new(false)) }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Stop future ticks. Safe to call any number of times.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Something that can start a periodic tick source.
pub trait Scheduler {
    fn every(&mut self, period: Duration) -> TickHandle;
}

/// Runs each tick source on its own thread. Ticks arrive as handle ids on
/// the receiver returned by `new`; the frame loop drains it, which keeps
/// every state mutation on the frame thread.
pub struct ThreadScheduler {
    tx: Sender<u64>,
    next_id: u64,
}

impl ThreadScheduler {
    pub fn new() -> (Self, Receiver<u64>) {
        let (tx, rx) = mpsc::channel();
        (ThreadScheduler { tx, next_id: 1 }, rx)
    }
}

impl Scheduler for ThreadScheduler {
    fn every(&mut self, period: Duration) -> TickHandle {
        let handle = TickHandle::new(self.next_id);
        self.next_id += 1;

        let worker = handle.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            // Deadlines are measured from the start so sleeps don't drift.
            let start = Instant::now();
            let mut n: u32 = 1;
            loop {
                let deadline = start + period * n;
                let now = Instant::now();
                if deadline > now {
                    thread::sleep(deadline - now);
                }
                if worker.is_cancelled() || tx.send(worker.id()).is_err() {
                    break;
                }
                n = n.saturating_add(1);
            }
        });

        handle
    }
}

/// Scheduler that never fires on its own; tests deliver ticks by id.
#[cfg(test)]
pub struct ManualScheduler {
    next_id: u64,
}

#[cfg(test)]
impl ManualScheduler {
    pub fn new() -> Self {
        ManualScheduler { next_id: 1 }
    }
}

#[cfg(test)]
impl Scheduler for ManualScheduler {
    fn every(&mut self, _period: Duration) -> TickHandle {
        let handle = TickHandle::new(self.next_id);
        self.next_id += 1;
        handle
    }
}

/// Format whole seconds as zero-padded "MM:SS".
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub struct SessionTimer {
    scheduler: Box<dyn Scheduler>,
    period: Duration,
    handle: Option<TickHandle>,
    elapsed: u32,
    display: String,
}

impl SessionTimer {
    pub fn new(scheduler: Box<dyn Scheduler>, period: Duration) -> Self {
        SessionTimer {
            scheduler,
            period,
            handle: None,
            elapsed: 0,
            display: format_clock(0),
        }
    }

    pub fn state(&self) -> TimerState {
        if self.handle.is_some() { TimerState::Running } else { TimerState::Idle }
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Last published "MM:SS" string.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Id of the live tick source, if Running.
    pub fn running_id(&self) -> Option<u64> {
        self.handle.as_ref().map(TickHandle::id)
    }

    /// Idle → Running. Returns false (and does nothing) if already Running.
    pub fn start(&mut self) -> bool {
        if self.handle.is_some() {
            return false;
        }
        self.handle = Some(self.scheduler.every(self.period));
        true
    }

    /// Deliver one tick. Stale ids (from a cancelled run) are ignored.
    /// Returns true if the tick was counted.
    pub fn on_tick(&mut self, id: u64) -> bool {
        match &self.handle {
            Some(h) if h.id() == id && !h.is_cancelled() => {
                self.elapsed = self.elapsed.saturating_add(1);
                self.display = format_clock(self.elapsed);
                true
            }
            _ => false,
        }
    }

    /// Cancel any running tick source, zero the count, publish "00:00".
    pub fn reset(&mut self) {
        if let Some(h) = self.handle.take() {
            h.cancel();
        }
        self.elapsed = 0;
        self.display = format_clock(0);
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        if let Some(h) = &self.handle {
            h.cancel();
        }
    }
}
