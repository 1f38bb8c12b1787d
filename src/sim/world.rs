/// WorldState: everything one run of the game owns.
///
/// Player, obstacle field, score and phase live together so that a reset is
/// a single assignment of a fresh value: no observer ever sees a half-reset
/// world. The world knows nothing about clocks; `sim::step` advances it one
/// tick at a time and `sim::session` decides when ticks happen.
///
/// ## Coordinates
///
/// Playfield units, origin at the top-left, y grows downward. The ground line
/// is `playfield.ground_y()`: a grounded player's top edge and every
/// obstacle's top edge sit there.

use crate::config::{PhysicsConfig, PlayfieldConfig};
use crate::domain::entity::{Obstacle, Player, Rect};
use crate::domain::field::ObstacleField;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Running,
    GameOver,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldState {
    // ── Entities ──
    pub player: Player,
    pub field: ObstacleField,

    // ── Tuning (fixed for the lifetime of the world) ──
    pub physics: PhysicsConfig,
    pub playfield: PlayfieldConfig,

    // ── Meta ──
    pub phase: Phase,
    pub score: u32,
    pub tick: u64,
}

impl WorldState {
    pub fn new(physics: PhysicsConfig, playfield: PlayfieldConfig) -> Self {
        WorldState {
            player: Player::grounded(playfield.ground_y()),
            field: ObstacleField::new(),
            physics,
            playfield,
            phase: Phase::Running,
            score: 0,
            tick: 0,
        }
    }

    /// Bounding box of the player at its current height.
    pub fn player_bounds(&self) -> Rect {
        Rect::new(
            self.playfield.player_x,
            self.player.y,
            self.playfield.player_size,
            self.playfield.player_size,
        )
    }

    /// Read-only view for the presentation layer.
    pub fn snapshot(&self, paused: bool) -> Snapshot<'_> {
        Snapshot {
            altitude: self.player.altitude(self.playfield.ground_y()),
            player: self.player_bounds(),
            obstacles: self.field.as_slice(),
            score: self.score,
            phase: self.phase,
            paused,
            playfield: &self.playfield,
        }
    }
}

/// What a renderer needs for one frame. Borrowed, so it cannot outlive or
/// mutate the world it was taken from.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    /// Height of the player above the ground line, in game units.
    pub altitude: i32,
    pub player: Rect,
    pub obstacles: &'a [Obstacle],
    pub score: u32,
    pub phase: Phase,
    pub paused: bool,
    pub playfield: &'a PlayfieldConfig,
}
