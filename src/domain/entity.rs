/// Entities: Player, Obstacle, and the bounding box they share.
/// The player's state machine is three states; obstacles have none.

/// Axis-aligned bounding box in playfield units (y grows downward).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect { x, y, width, height }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// Vertical motion sub-state of the player.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MotionState {
    Grounded,
    Ascending,
    Descending,
}

/// The runner. Only the vertical axis moves; x and size come from the
/// playfield config.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Player {
    /// Distance of the player's top edge from the playfield's top edge.
    pub y: i32,
    pub motion: MotionState,
    /// Y the current ascent started from. Equals the ground line.
    pub ascent_start: i32,
}

impl Player {
    /// A player standing on the ground line.
    pub fn grounded(ground_y: i32) -> Self {
        Player {
            y: ground_y,
            motion: MotionState::Grounded,
            ascent_start: ground_y,
        }
    }

    /// Height above the given ground line. Never negative.
    pub fn altitude(&self, ground_y: i32) -> i32 {
        ground_y - self.y
    }

    /// Cumulative rise of the current (or last) ascent.
    pub fn rise(&self) -> i32 {
        self.ascent_start - self.y
    }

    pub fn is_grounded(&self) -> bool {
        self.motion == MotionState::Grounded
    }
}

/// A block scrolling toward the player. Only `x` changes after spawn.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Obstacle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Obstacle {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Obstacle { x, y, width, height }
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Fully past the left edge of the playfield.
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.x + self.width <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grounded_player_has_zero_altitude() {
        let p = Player::grounded(250);
        assert_eq!(p.altitude(250), 0);
        assert_eq!(p.rise(), 0);
        assert!(p.is_grounded());
    }

    #[test]
    fn obstacle_offscreen_boundary() {
        // Right edge exactly at 0 counts as gone.
        assert!(Obstacle::new(-40, 0, 40, 40).is_offscreen());
        assert!(!Obstacle::new(-39, 0, 40, 40).is_offscreen());
    }

    #[test]
    fn rect_edges() {
        let r = Rect::new(50, 250, 40, 40);
        assert_eq!(r.right(), 90);
        assert_eq!(r.bottom(), 290);
    }
}
