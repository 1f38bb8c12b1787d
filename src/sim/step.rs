/// Tick handlers: advance the world by one tick of either cadence.
///
/// Simulation tick processing order:
///   1. Player motion (jump / fall)
///   2. Obstacle scroll + cull
///   3. Collision check against every live obstacle
///   4. Score (only if no collision)
///
/// Spawn tick: append one obstacle at the right edge.
///
/// Both are deterministic over `WorldState` and ignore a world that is not
/// Running, so a late tick can never disturb a finished run.

use crate::domain::collision;
use crate::domain::entity::MotionState;
use crate::domain::physics;
use super::event::GameEvent;
use super::world::{Phase, WorldState};

// ══════════════════════════════════════════════════════════════
// Input
// ══════════════════════════════════════════════════════════════

/// Start a jump. No-op unless Running and grounded.
pub fn request_jump(world: &mut WorldState) -> bool {
    if world.phase != Phase::Running { return false; }
    let ground = world.playfield.ground_y();
    physics::request_jump(&mut world.player, ground)
}

// ══════════════════════════════════════════════════════════════
// Fast cadence
// ══════════════════════════════════════════════════════════════

pub fn simulation_tick(world: &mut WorldState) -> Vec<GameEvent> {
    if world.phase != Phase::Running { return vec![]; }

    let mut events = Vec::new();
    world.tick += 1;

    resolve_motion(world, &mut events);
    resolve_scroll(world, &mut events);
    if resolve_collision(world, &mut events) { return events; }
    world.score += 1;

    events
}

fn resolve_motion(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let before = world.player.motion;
    world.player = physics::tick(world.player, &world.physics, world.playfield.ground_y());
    match (before, world.player.motion) {
        (MotionState::Ascending, MotionState::Descending) => {
            events.push(GameEvent::Apex { y: world.player.y });
        }
        (MotionState::Descending, MotionState::Grounded) => events.push(GameEvent::Landed),
        _ => {}
    }
}

fn resolve_scroll(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let count = world.field.advance(world.physics.obstacle_speed);
    if count > 0 {
        events.push(GameEvent::ObstaclesCulled { count });
    }
}

/// Returns true if the run just ended.
fn resolve_collision(world: &mut WorldState, events: &mut Vec<GameEvent>) -> bool {
    if world.field.is_empty() { return false; }
    let bounds = world.player_bounds();
    let hit = match collision::first_hit(&bounds, world.field.as_slice()) {
        Some(o) => o.x,
        None => return false,
    };
    world.phase = Phase::GameOver;
    events.push(GameEvent::Collision { obstacle_x: hit, score: world.score });
    true
}

// ══════════════════════════════════════════════════════════════
// Slow cadence
// ══════════════════════════════════════════════════════════════

pub fn spawn_tick(world: &mut WorldState) -> Vec<GameEvent> {
    if world.phase != Phase::Running { return vec![]; }
    let playfield = world.playfield;
    let spawned = world.field.spawn(&playfield);
    vec![GameEvent::ObstacleSpawned { x: spawned.x }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PhysicsConfig, PlayfieldConfig};
    use crate::domain::entity::Obstacle;

    fn world() -> WorldState {
        WorldState::new(PhysicsConfig::default(), PlayfieldConfig::default())
    }

    #[test]
    fn score_counts_survived_ticks() {
        let mut w = world();
        for _ in 0..50 {
            assert!(simulation_tick(&mut w).is_empty());
        }
        assert_eq!(w.score, 50);
        assert_eq!(w.tick, 50);
    }

    #[test]
    fn overlapping_obstacle_ends_run_same_tick() {
        let mut w = world();
        let b = w.player_bounds();
        w.field.push(Obstacle::new(b.x, b.y, b.width, b.height));
        w.score = 3;

        let events = simulation_tick(&mut w);
        assert_eq!(w.phase, Phase::GameOver);
        assert_eq!(w.score, 3);
        assert!(matches!(events.last(), Some(GameEvent::Collision { score: 3, .. })));

        // Frozen afterwards.
        let frozen = w.clone();
        assert!(simulation_tick(&mut w).is_empty());
        assert!(spawn_tick(&mut w).is_empty());
        assert!(!request_jump(&mut w));
        assert_eq!(w, frozen);
    }

    #[test]
    fn obstacle_touching_player_edge_is_safe() {
        let mut w = world();
        let b = w.player_bounds();
        // After one scroll of 5 its right edge lands exactly on the player's left edge.
        w.field.push(Obstacle::new(b.x - 40 + 5, b.y, 40, 40));
        simulation_tick(&mut w);
        assert_eq!(w.field.as_slice()[0].bounds().right(), b.x);
        assert_eq!(w.phase, Phase::Running);
        assert_eq!(w.score, 1);
    }

    #[test]
    fn unjumped_obstacle_reaches_player() {
        let mut w = world();
        spawn_tick(&mut w);
        let mut ticks = 0;
        while w.phase == Phase::Running {
            simulation_tick(&mut w);
            ticks += 1;
            assert!(ticks < 1000);
        }
        // Spawned at 800, hits once x < 90: (800 - 90) / 5 + 1 ticks.
        assert_eq!(ticks, 143);
        assert_eq!(w.score, 142);
    }

    #[test]
    fn timed_jump_clears_obstacle() {
        let mut w = world();
        spawn_tick(&mut w);
        // Obstacle front reaches the player at tick 143; 40-tick jump
        // centered on the overlap window (ticks 143..=158).
        for _ in 0..130 {
            simulation_tick(&mut w);
        }
        assert!(request_jump(&mut w));
        for _ in 0..60 {
            simulation_tick(&mut w);
        }
        assert_eq!(w.phase, Phase::Running);
        assert_eq!(w.score, 190);
        assert!(w.player.is_grounded());
    }

    #[test]
    fn jump_emits_apex_then_landed() {
        let mut w = world();
        assert!(request_jump(&mut w));
        assert!(!request_jump(&mut w));
        let mut events = Vec::new();
        for _ in 0..40 {
            events.extend(simulation_tick(&mut w));
        }
        assert_eq!(events, vec![GameEvent::Apex { y: 130 }, GameEvent::Landed]);
    }

    #[test]
    fn spawn_tick_appends_at_right_edge() {
        let mut w = world();
        assert_eq!(spawn_tick(&mut w), vec![GameEvent::ObstacleSpawned { x: 800 }]);
        spawn_tick(&mut w);
        assert_eq!(w.field.len(), 2);
    }

    #[test]
    fn culled_obstacles_are_reported() {
        let mut w = world();
        w.field.push(Obstacle::new(-36, 0, 40, 40));
        let events = simulation_tick(&mut w);
        assert_eq!(events, vec![GameEvent::ObstaclesCulled { count: 1 }]);
        assert!(w.field.is_empty());
    }
}
