/// Session: the game state machine and the owner of the scheduler.
///
/// ```text
///   Running ──sim tick, no hit──▶ Running   (score += 1)
///   Running ──sim tick, hit─────▶ GameOver  (scheduler stopped)
///   GameOver ──reset()──────────▶ Running   (fresh world, scheduler restarted)
/// ```
///
/// Pause is an overlay on Running: both cadences are cancelled and jumps are
/// refused until resume, which starts new handles.
///
/// The presentation layer drives a session with `advance(dt)` once per frame
/// and the three commands (`request_jump`, `reset`, `toggle_pause`), and
/// reads it through `snapshot()`. Every call returns the events it caused.

use std::time::Duration;

use crate::config::GameConfig;
use crate::domain::physics;
use super::clock::{Cadence, Scheduler, Tick};
use super::event::GameEvent;
use super::step;
use super::world::{Phase, Snapshot, WorldState};

pub struct Session {
    world: WorldState,
    scheduler: Scheduler,
    paused: bool,
}

impl Session {
    /// A running session with both cadences started.
    pub fn new(config: &GameConfig) -> Self {
        let mut session = Session {
            world: WorldState::new(config.physics, config.playfield),
            scheduler: Scheduler::new(config.timing),
            paused: false,
        };
        session.scheduler.start();
        log::info!(
            "session started: jump {} ticks up, obstacle every {} ms",
            physics::ticks_to_apex(&config.physics),
            config.timing.spawn_tick_ms,
        );
        session
    }

    // ── Queries ──

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.world.snapshot(self.paused)
    }

    pub fn phase(&self) -> Phase {
        self.world.phase
    }

    pub fn score(&self) -> u32 {
        self.world.score
    }

    #[cfg(test)]
    pub(crate) fn world(&self) -> &WorldState {
        &self.world
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }

    #[cfg(test)]
    pub(crate) fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    // ── Clock ──

    /// Let `dt` of wall-clock time pass and run every tick that falls due.
    pub fn advance(&mut self, dt: Duration) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.scheduler.advance(dt);
        while let Some(tick) = self.scheduler.next_tick() {
            events.extend(self.on_tick(tick));
        }
        events
    }

    /// Handle one tick. Ticks from a cancelled epoch, or arriving while the
    /// run is over, are ignored.
    fn on_tick(&mut self, tick: Tick) -> Vec<GameEvent> {
        if !self.scheduler.is_current(&tick) || self.world.phase != Phase::Running {
            return vec![];
        }

        match tick.cadence {
            Cadence::Spawn => step::spawn_tick(&mut self.world),
            Cadence::Simulation => {
                let events = step::simulation_tick(&mut self.world);
                if self.world.phase == Phase::GameOver {
                    self.scheduler.stop();
                    log::info!(
                        "game over at tick {} with score {} ({} obstacles on screen)",
                        self.world.tick,
                        self.world.score,
                        self.world.field.len(),
                    );
                }
                events
            }
        }
    }

    // ── Commands ──

    pub fn request_jump(&mut self) -> Vec<GameEvent> {
        if self.paused || !step::request_jump(&mut self.world) {
            return vec![];
        }
        vec![GameEvent::Jumped]
    }

    /// Start a new run. Only meaningful after GameOver; ignored while Running.
    pub fn reset(&mut self) -> Vec<GameEvent> {
        if self.world.phase != Phase::GameOver {
            return vec![];
        }
        self.world = WorldState::new(self.world.physics, self.world.playfield);
        self.paused = false;
        self.scheduler.start();
        log::info!("reset (epoch {})", self.scheduler.epoch());
        vec![GameEvent::Reset]
    }

    /// Pause or resume a running game. Ignored after GameOver.
    pub fn toggle_pause(&mut self) -> Vec<GameEvent> {
        if self.world.phase != Phase::Running {
            return vec![];
        }
        self.paused = !self.paused;
        if self.paused {
            self.scheduler.stop();
            log::info!("paused at score {}", self.world.score);
            vec![GameEvent::Paused]
        } else {
            self.scheduler.start();
            log::info!("resumed");
            vec![GameEvent::Resumed]
        }
    }
}
