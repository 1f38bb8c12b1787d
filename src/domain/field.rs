/// Obstacle field: the ordered set of obstacles currently in flight.
///
/// Obstacles are appended at the tail on spawn, so the sequence stays in
/// spawn order (left-to-right on screen). Culling is a stable filter.
/// Overlap between obstacles is not prevented.

use crate::config::PlayfieldConfig;
use super::entity::Obstacle;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new() -> Self {
        ObstacleField { obstacles: Vec::new() }
    }

    /// Append one obstacle at the right edge, sitting on the ground line.
    pub fn spawn(&mut self, playfield: &PlayfieldConfig) -> Obstacle {
        let obstacle = Obstacle::new(
            playfield.width,
            playfield.ground_y(),
            playfield.obstacle_width,
            playfield.obstacle_height,
        );
        self.obstacles.push(obstacle);
        obstacle
    }

    /// Scroll every obstacle left by `speed`, then drop the ones that left
    /// the playfield. Returns how many were dropped.
    pub fn advance(&mut self, speed: i32) -> usize {
        for o in &mut self.obstacles {
            o.x -= speed;
        }
        let before = self.obstacles.len();
        self.obstacles.retain(|o| !o.is_offscreen());
        before - self.obstacles.len()
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    #[cfg(test)]
    pub fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playfield(width: i32) -> PlayfieldConfig {
        PlayfieldConfig { width, ..PlayfieldConfig::default() }
    }

    #[test]
    fn spawn_at_right_edge_on_ground() {
        let pf = playfield(800);
        let mut field = ObstacleField::new();
        let o = field.spawn(&pf);
        assert_eq!(o, Obstacle::new(800, pf.ground_y(), 40, 40));
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn culled_after_crossing_left_edge() {
        for width in [800, 801, 37, 1] {
            let pf = playfield(width);
            let mut field = ObstacleField::new();
            field.spawn(&pf);
            // ceil((width + 40) / 5)
            let ticks = (width + 40 + 4) / 5;
            for _ in 0..ticks - 1 {
                assert_eq!(field.advance(5), 0);
            }
            assert_eq!(field.len(), 1, "width {width}: still visible one tick early");
            assert_eq!(field.advance(5), 1);
            assert!(field.is_empty());
        }
    }

    #[test]
    fn cull_is_stable() {
        let pf = playfield(800);
        let mut field = ObstacleField::new();
        field.push(Obstacle::new(-30, 0, 40, 40)); // gone after one tick
        field.push(Obstacle::new(100, 0, 40, 40));
        field.push(Obstacle::new(-36, 0, 40, 40)); // gone after one tick
        field.push(Obstacle::new(300, 0, 40, 40));
        field.spawn(&pf);

        assert_eq!(field.advance(10), 2);
        let xs: Vec<i32> = field.as_slice().iter().map(|o| o.x).collect();
        assert_eq!(xs, vec![90, 290, 790]);
    }

    #[test]
    fn size_and_height_never_change() {
        let pf = playfield(200);
        let mut field = ObstacleField::new();
        field.spawn(&pf);
        for _ in 0..10 {
            field.advance(5);
        }
        let o = field.as_slice()[0];
        assert_eq!((o.y, o.width, o.height), (pf.ground_y(), 40, 40));
        assert_eq!(o.x, 150);
    }
}
