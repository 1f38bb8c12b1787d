/// Collision detection: axis-aligned bounding-box overlap.
///
/// All four edge tests are strict, so boxes that merely touch along an edge
/// do not collide.

use super::entity::{Obstacle, Rect};

#[inline]
pub fn collides(player: &Rect, obstacle: &Rect) -> bool {
    obstacle.x < player.right()
        && obstacle.right() > player.x
        && obstacle.y < player.bottom()
        && obstacle.bottom() > player.y
}

/// First obstacle overlapping the player, if any.
pub fn first_hit<'a>(player: &Rect, obstacles: &'a [Obstacle]) -> Option<&'a Obstacle> {
    obstacles.iter().find(|o| collides(player, &o.bounds()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Rect {
        Rect::new(50, 250, 40, 40)
    }

    #[test]
    fn identical_boxes_collide() {
        assert!(collides(&player(), &player()));
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let p = player();
        // left, right, top, bottom
        assert!(!collides(&p, &Rect::new(10, 250, 40, 40)));
        assert!(!collides(&p, &Rect::new(90, 250, 40, 40)));
        assert!(!collides(&p, &Rect::new(50, 210, 40, 40)));
        assert!(!collides(&p, &Rect::new(50, 290, 40, 40)));
    }

    #[test]
    fn one_unit_overlap_collides() {
        let p = player();
        assert!(collides(&p, &Rect::new(11, 250, 40, 40)));
        assert!(collides(&p, &Rect::new(89, 250, 40, 40)));
        assert!(collides(&p, &Rect::new(50, 211, 40, 40)));
        assert!(collides(&p, &Rect::new(50, 289, 40, 40)));
    }

    #[test]
    fn overlap_on_one_axis_only_is_a_miss() {
        let p = player();
        // Horizontally overlapping but well above (player mid-jump case).
        assert!(!collides(&p, &Rect::new(60, 100, 40, 40)));
        // Vertically overlapping but far to the right.
        assert!(!collides(&p, &Rect::new(400, 250, 40, 40)));
    }

    #[test]
    fn containment_collides_both_ways() {
        let big = Rect::new(0, 0, 200, 400);
        assert!(collides(&player(), &big));
        assert!(collides(&big, &player()));
    }

    #[test]
    fn first_hit_scans_all() {
        let obstacles = [
            Obstacle::new(500, 250, 40, 40),
            Obstacle::new(70, 250, 40, 40),
            Obstacle::new(60, 250, 40, 40),
        ];
        assert_eq!(first_hit(&player(), &obstacles).map(|o| o.x), Some(70));
        assert!(first_hit(&player(), &obstacles[..1]).is_none());
        assert!(first_hit(&player(), &[]).is_none());
    }
}
