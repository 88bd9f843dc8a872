#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the micromouse simulator.
//!
//! The world owns the immutable [`Maze`] and the robot's ground-truth pose.
//! Pose changes happen exclusively through [`apply`], which enforces wall
//! collisions independently of whatever the robot believes about itself.

mod error;
pub mod loader;
mod maze;

use micromouse_core::{Command, Event, IllegalAction, Pose, Turn};

pub use error::{MalformedInput, MazeError};
pub use maze::{EdgeOrientation, EdgeViolation, Maze};

/// Represents the authoritative simulation world.
#[derive(Clone, Debug)]
pub struct World {
    maze: Maze,
    pose: Pose,
}

impl World {
    /// Creates a world with the robot standing at [`Pose::START`].
    #[must_use]
    pub fn new(maze: Maze) -> Self {
        Self {
            maze,
            pose: Pose::START,
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ResetPose => {
            let from = world.pose;
            world.pose = Pose::START;
            out_events.push(Event::PoseReset { from });
        }
        Command::Rotate { degrees } => {
            let Some(turn) = Turn::from_degrees(degrees) else {
                out_events.push(Event::ActionRejected {
                    reason: IllegalAction::InvalidRotation { degrees },
                });
                return;
            };

            let from = world.pose.heading;
            let to = from.turned(turn);
            if from != to {
                world.pose.heading = to;
                out_events.push(Event::HeadingChanged { from, to });
            }
        }
        Command::Advance { cells } => {
            let direction = if cells < 0 {
                world.pose.heading.opposite()
            } else {
                world.pose.heading
            };
            let requested = cells.unsigned_abs();

            for travelled in 0..requested {
                let from = world.pose.cell;
                let Some(to) = world.maze.passable_neighbor(from, direction) else {
                    out_events.push(Event::MovementBlocked {
                        at: from,
                        direction,
                        requested,
                        travelled,
                    });
                    return;
                };
                world.pose.cell = to;
                out_events.push(Event::RobotAdvanced { from, to });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use micromouse_core::{Pose, SensorReadings, WELCOME_BANNER};

    use super::{Maze, World};

    /// Retrieves the welcome banner that adapters may display.
    #[must_use]
    pub fn welcome_banner(_world: &World) -> &'static str {
        WELCOME_BANNER
    }

    /// Provides read-only access to the maze.
    #[must_use]
    pub fn maze(world: &World) -> &Maze {
        &world.maze
    }

    /// Ground-truth pose of the robot.
    #[must_use]
    pub fn pose(world: &World) -> Pose {
        world.pose
    }

    /// Reports whether the robot currently stands in the goal region.
    #[must_use]
    pub fn in_goal(world: &World) -> bool {
        world.maze.is_goal(world.pose.cell)
    }

    /// Distances sensed to the left, front and right of the robot.
    #[must_use]
    pub fn sensor_readings(world: &World) -> SensorReadings {
        let cell = world.pose.cell;
        let [left, front, right] = world
            .pose
            .heading
            .sensor_directions()
            .map(|direction| world.maze.distance_to_wall(cell, direction));
        SensorReadings::new(left, front, right)
    }
}
