/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and logging.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    Apex { y: i32 },
    Landed,
    ObstacleSpawned { x: i32 },
    ObstaclesCulled { count: usize },
    Collision { obstacle_x: i32, score: u32 },
    Paused,
    Resumed,
    Reset,
}
