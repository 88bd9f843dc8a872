use std::collections::BTreeSet;

use micromouse_core::{Action, Direction, GoalRegion, Robot, SensorReadings};

/// Reference wall-following policy.
///
/// The robot prefers going straight, then left, then right, and turns
/// clockwise in place at a dead end. It never turns 180 degrees in a single
/// step. Once its belief says it stands in the goal during exploration it
/// requests a reset and starts the timed run from the origin.
#[derive(Clone, Debug)]
pub struct ReactiveRobot {
    goal: GoalRegion,
    heading: Direction,
    location: (i32, i32),
    visited: BTreeSet<(i32, i32)>,
    phase: Phase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Exploring,
    Timed,
}

impl ReactiveRobot {
    /// Creates a robot for a maze of the given dimension, at the origin
    /// facing up.
    #[must_use]
    pub fn new(maze_dimension: u32) -> Self {
        Self {
            goal: GoalRegion::for_dimension(maze_dimension),
            heading: Direction::Up,
            location: (0, 0),
            visited: BTreeSet::from([(0, 0)]),
            phase: Phase::Exploring,
        }
    }

    /// Chooses an action from the sensor readings alone.
    #[must_use]
    pub const fn decide(sensors: SensorReadings) -> Action {
        if sensors.front > 0 {
            Action::steer(0, 1)
        } else if sensors.left > 0 {
            Action::steer(-90, 1)
        } else if sensors.right > 0 {
            Action::steer(90, 1)
        } else {
            Action::steer(90, 0)
        }
    }

    /// Updates the believed heading and location after an action.
    ///
    /// The rotation is applied in whole quarter turns rounded toward negative
    /// infinity. Positive movement advances the belief by a single cell.
    pub fn apply(&mut self, rotation: i32, movement: i32) {
        self.heading = self.heading.rotated(rotation.div_euclid(90));

        if movement > 0 {
            let (dx, dy) = self.heading.offset();
            self.location = (self.location.0 + dx, self.location.1 + dy);
        }

        let _ = self.visited.insert(self.location);
    }

    /// Reports whether the believed location lies in the goal region.
    #[must_use]
    pub const fn at_goal(&self) -> bool {
        self.goal.contains_signed(self.location.0, self.location.1)
    }

    /// Believed heading.
    #[must_use]
    pub const fn heading(&self) -> Direction {
        self.heading
    }

    /// Believed location as signed `(x, y)`.
    #[must_use]
    pub const fn location(&self) -> (i32, i32) {
        self.location
    }

    /// Every location the robot believes it has occupied.
    #[must_use]
    pub fn visited(&self) -> &BTreeSet<(i32, i32)> {
        &self.visited
    }

    fn restart(&mut self) {
        self.heading = Direction::Up;
        self.location = (0, 0);
        self.phase = Phase::Timed;
    }
}

impl Robot for ReactiveRobot {
    fn next_move(&mut self, sensors: SensorReadings) -> Action {
        if self.phase == Phase::Exploring && self.at_goal() {
            self.restart();
            return Action::Reset;
        }

        let action = Self::decide(sensors);
        if let Action::Steer { rotation, movement } = action {
            self.apply(rotation, movement);
        }
        action
    }
}
