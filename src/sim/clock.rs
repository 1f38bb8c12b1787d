/// Clock / scheduler: two fixed cadences on one logical clock.
///
/// The scheduler never reads the wall clock. The frame loop feeds it elapsed
/// time with `advance(dt)` and then pulls due ticks one at a time with
/// `next_tick()`, in chronological order across both cadences. Because ticks
/// are pulled, the consumer can `stop()` between two ticks of the same frame
/// and nothing further is delivered.
///
/// ## Handles and epochs
///
/// Each cadence is driven by at most one `TickHandle`. `start()` cancels any
/// existing handles before creating new ones, so a cadence can never be
/// double-driven. Every start/stop bumps the epoch; each `Tick` carries the
/// epoch it was issued under and `is_current()` rejects ticks from an older
/// one. A tick captured before a stop or restart is therefore inert.

use std::time::Duration;

use crate::config::TimingConfig;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cadence {
    /// Fast: motion, scroll, collision, score.
    Simulation,
    /// Slow: obstacle spawn.
    Spawn,
}

/// One due tick, stamped with the epoch that issued it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tick {
    pub cadence: Cadence,
    pub epoch: u64,
}

#[derive(Clone, Debug)]
struct TickHandle {
    interval: Duration,
    next_due: Duration,
}

impl TickHandle {
    fn new(interval: Duration, now: Duration) -> Self {
        TickHandle { interval, next_due: now + interval }
    }
}

#[derive(Clone, Debug)]
pub struct Scheduler {
    timing: TimingConfig,
    /// Logical time of the last delivered tick (or of the horizon once drained).
    now: Duration,
    /// How far `next_tick` may run ahead; moved by `advance`.
    horizon: Duration,
    epoch: u64,
    simulation: Option<TickHandle>,
    spawn: Option<TickHandle>,
}

impl Scheduler {
    /// A stopped scheduler. Call `start()` to begin ticking.
    pub fn new(timing: TimingConfig) -> Self {
        Scheduler {
            timing,
            now: Duration::ZERO,
            horizon: Duration::ZERO,
            epoch: 0,
            simulation: None,
            spawn: None,
        }
    }

    /// Cancel any running cadences, then start both afresh from `now`.
    /// The first simulation tick is one fast interval away, the first spawn
    /// one slow interval away.
    pub fn start(&mut self) {
        self.stop();
        self.epoch += 1;
        self.simulation = Some(TickHandle::new(self.timing.sim_interval(), self.now));
        self.spawn = Some(TickHandle::new(self.timing.spawn_interval(), self.now));
        log::trace!("scheduler started (epoch {})", self.epoch);
    }

    /// Cancel both cadences. Ticks already handed out become stale.
    pub fn stop(&mut self) {
        if self.simulation.take().is_some() | self.spawn.take().is_some() {
            self.epoch += 1;
            log::trace!("scheduler stopped (epoch {})", self.epoch);
        }
    }

    pub fn is_running(&self) -> bool {
        self.simulation.is_some() || self.spawn.is_some()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Was this tick issued by the currently running cadences?
    pub fn is_current(&self, tick: &Tick) -> bool {
        let live = match tick.cadence {
            Cadence::Simulation => self.simulation.is_some(),
            Cadence::Spawn => self.spawn.is_some(),
        };
        live && tick.epoch == self.epoch
    }

    /// Let `dt` of wall-clock time elapse, capped at `max_frame` so a stall
    /// cannot release an unbounded burst of ticks.
    pub fn advance(&mut self, dt: Duration) {
        let dt = dt.min(self.timing.max_frame());
        self.horizon = self.now.max(self.horizon) + dt;
    }

    /// Pull the earliest tick due at or before the horizon. Ties go to the
    /// simulation cadence.
    pub fn next_tick(&mut self) -> Option<Tick> {
        let horizon = self.horizon;
        let epoch = self.epoch;

        let sim_due = self.simulation.as_ref().map(|h| h.next_due).filter(|&t| t <= horizon);
        let spawn_due = self.spawn.as_ref().map(|h| h.next_due).filter(|&t| t <= horizon);

        let (cadence, handle) = match (sim_due, spawn_due) {
            (Some(a), Some(b)) if b < a => (Cadence::Spawn, self.spawn.as_mut()),
            (Some(_), _) => (Cadence::Simulation, self.simulation.as_mut()),
            (None, Some(_)) => (Cadence::Spawn, self.spawn.as_mut()),
            (None, None) => {
                self.now = horizon;
                return None;
            }
        };

        let handle = handle?;
        self.now = handle.next_due;
        handle.next_due += handle.interval;
        Some(Tick { cadence, epoch })
    }
}
