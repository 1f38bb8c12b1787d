/// Player motion model: discrete-step jump kinematics.
///
/// ## State machine
///
///   Grounded ──request_jump──▶ Ascending ──rise ≥ jump_height──▶ Descending
///       ▲                                                           │
///       └──────────────────── y ≥ ground (clamped) ◀────────────────┘
///
/// Both legs move exactly `gravity_step` units per tick, so a jump takes
/// `ceil(jump_height / gravity_step)` ticks up and the same number down
/// (the fall is clamped onto the ground line, never below it).
///
/// The apex test is "rise reached or passed `jump_height`". When
/// `jump_height` is not a multiple of `gravity_step` the peak overshoots by
/// less than one step. That tolerance is deliberate; the fall re-aligns to
/// the ground exactly.
///
/// All functions are pure over `Player` (a `Copy` value): same input, same
/// output, no clock involved.

use crate::config::PhysicsConfig;
use super::entity::{MotionState, Player};

/// Start a jump if standing on the ground. Returns false (and leaves the
/// player untouched) while already airborne, so repeated taps are harmless.
pub fn request_jump(player: &mut Player, ground_y: i32) -> bool {
    if !player.is_grounded() {
        return false;
    }
    player.motion = MotionState::Ascending;
    player.ascent_start = ground_y;
    true
}

/// Advance the player by one simulation tick.
pub fn tick(player: Player, physics: &PhysicsConfig, ground_y: i32) -> Player {
    let mut next = player;
    match player.motion {
        MotionState::Grounded => {}
        MotionState::Ascending => {
            next.y -= physics.gravity_step;
            if next.rise() >= physics.jump_height {
                next.motion = MotionState::Descending;
            }
        }
        MotionState::Descending => {
            next.y += physics.gravity_step;
            if next.y >= ground_y {
                next.y = ground_y;
                next.motion = MotionState::Grounded;
            }
        }
    }
    next
}

/// Ticks from take-off to apex for the given tuning.
pub fn ticks_to_apex(physics: &PhysicsConfig) -> i32 {
    (physics.jump_height + physics.gravity_step - 1) / physics.gravity_step
}
