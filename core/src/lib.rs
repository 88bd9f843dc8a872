#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the micromouse simulator.
//!
//! This crate defines the message surface that connects the maze world, the
//! robot policies and the simulation harness. Robots receive
//! [`SensorReadings`] and answer with an [`Action`]. The harness translates
//! actions into [`Command`] values, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that the harness
//! and adapters consume deterministically.

use std::{error::Error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when a simulation session boots.
pub const WELCOME_BANNER: &str = "Welcome to the micromouse simulator.";

/// Cardinal directions in which the robot can face and travel.
///
/// `Up` increases `y`, `Right` increases `x`, `Down` decreases `y` and
/// `Left` decreases `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Movement toward increasing `y`.
    Up,
    /// Movement toward increasing `x`.
    Right,
    /// Movement toward decreasing `y`.
    Down,
    /// Movement toward decreasing `x`.
    Left,
}

impl Direction {
    /// All directions in clockwise order starting from [`Direction::Up`].
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        self.rotated(2)
    }

    /// Direction obtained after applying a single quarter turn.
    #[must_use]
    pub const fn turned(self, turn: Turn) -> Self {
        match turn {
            Turn::Left => self.rotated(-1),
            Turn::Straight => self,
            Turn::Right => self.rotated(1),
        }
    }

    /// Direction obtained after rotating by the provided number of quarter
    /// turns. Positive values rotate clockwise, negative values
    /// counter-clockwise.
    #[must_use]
    pub const fn rotated(self, quarter_turns: i32) -> Self {
        let index = (self.index() + quarter_turns.rem_euclid(4)) % 4;
        Self::ALL[index as usize]
    }

    /// Unit displacement `(dx, dy)` travelled by one step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Right => (1, 0),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
        }
    }

    /// Absolute directions sensed as `[left, front, right]` while facing `self`.
    #[must_use]
    pub const fn sensor_directions(self) -> [Direction; 3] {
        [self.turned(Turn::Left), self, self.turned(Turn::Right)]
    }

    /// Lower-case name of the direction.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Right => "right",
            Self::Down => "down",
            Self::Left => "left",
        }
    }

    const fn index(self) -> i32 {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    /// Accepts single-letter (`u`, `r`, `d`, `l`) and full-word aliases.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "u" | "up" => Ok(Self::Up),
            "r" | "right" => Ok(Self::Right),
            "d" | "down" => Ok(Self::Down),
            "l" | "left" => Ok(Self::Left),
            _ => Err(ParseDirectionError(value.to_owned())),
        }
    }
}

/// Error returned when a direction alias is not recognised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseDirectionError(String);

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid direction", self.0)
    }
}

impl Error for ParseDirectionError {}

/// Quarter turn accepted by the harness as a rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Turn {
    /// Rotate 90 degrees counter-clockwise.
    Left,
    /// Keep the current heading.
    Straight,
    /// Rotate 90 degrees clockwise.
    Right,
}

impl Turn {
    /// Interprets a rotation expressed in degrees.
    ///
    /// Only `-90`, `0` and `90` are legal; every other value yields `None`.
    #[must_use]
    pub const fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees {
            -90 => Some(Self::Left),
            0 => Some(Self::Straight),
            90 => Some(Self::Right),
            _ => None,
        }
    }
}

/// Location of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: u32,
    y: u32,
}

impl CellCoord {
    /// Bottom-left cell where every run starts.
    pub const ORIGIN: CellCoord = CellCoord::new(0, 0);

    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based horizontal index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based vertical index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Neighbouring cell one step away in `direction`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Upper bounds are the maze's responsibility.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (dx, dy) = direction.offset();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(CellCoord::new(x, y))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Position and heading of the robot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pose {
    /// Cell currently occupied.
    pub cell: CellCoord,
    /// Direction currently faced.
    pub heading: Direction,
}

impl Pose {
    /// Pose at the start of every run: the origin cell facing up.
    pub const START: Pose = Pose {
        cell: CellCoord::ORIGIN,
        heading: Direction::Up,
    };
}

/// Permeability of the four sides of a single cell packed into four bits.
///
/// A set bit means the side is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WallCode(u8);

impl WallCode {
    /// Upward side open.
    pub const UP: WallCode = WallCode(0b0001);
    /// Right side open.
    pub const RIGHT: WallCode = WallCode(0b0010);
    /// Downward side open.
    pub const DOWN: WallCode = WallCode(0b0100);
    /// Left side open.
    pub const LEFT: WallCode = WallCode(0b1000);
    /// Every side closed.
    pub const CLOSED: WallCode = WallCode(0);
    /// Every side open.
    pub const OPEN: WallCode = WallCode(0b1111);

    /// Wraps the provided bits, rejecting values wider than four bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits > Self::OPEN.0 {
            None
        } else {
            Some(Self(bits))
        }
    }

    /// Raw four-bit representation.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Flag corresponding to the side facing `direction`.
    #[must_use]
    pub const fn flag(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::UP,
            Direction::Right => Self::RIGHT,
            Direction::Down => Self::DOWN,
            Direction::Left => Self::LEFT,
        }
    }

    /// Reports whether the side facing `direction` is open.
    #[must_use]
    pub const fn is_open(self, direction: Direction) -> bool {
        self.0 & Self::flag(direction).0 != 0
    }

    /// Copy of the code with the side facing `direction` opened.
    #[must_use]
    pub const fn with_open(self, direction: Direction) -> Self {
        Self(self.0 | Self::flag(direction).0)
    }
}

/// Centre cells the robot must reach.
///
/// For a maze of dimension `d` the region spans `{d/2 - 1, d/2}` on both axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GoalRegion {
    low: u32,
}

impl GoalRegion {
    /// Goal region for a square maze of the provided dimension.
    #[must_use]
    pub const fn for_dimension(dimension: u32) -> Self {
        Self {
            low: (dimension / 2).saturating_sub(1),
        }
    }

    /// Reports whether the cell lies inside the region.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        self.covers(cell.x() as i64) && self.covers(cell.y() as i64)
    }

    /// Reports whether signed coordinates lie inside the region.
    ///
    /// Robots track their believed location with signed coordinates because
    /// their belief is not bounded by the physical grid.
    #[must_use]
    pub const fn contains_signed(&self, x: i32, y: i32) -> bool {
        self.covers(x as i64) && self.covers(y as i64)
    }

    /// The four goal cells.
    #[must_use]
    pub const fn cells(&self) -> [CellCoord; 4] {
        let low = self.low;
        let high = low + 1;
        [
            CellCoord::new(low, low),
            CellCoord::new(low, high),
            CellCoord::new(high, low),
            CellCoord::new(high, high),
        ]
    }

    const fn covers(&self, value: i64) -> bool {
        value == self.low as i64 || value == self.low as i64 + 1
    }
}

/// Distances reported by the three range sensors, in open cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SensorReadings {
    /// Distance to the nearest wall on the robot's left.
    pub left: u32,
    /// Distance to the nearest wall ahead of the robot.
    pub front: u32,
    /// Distance to the nearest wall on the robot's right.
    pub right: u32,
}

impl SensorReadings {
    /// Creates a new sensor reading triple.
    #[must_use]
    pub const fn new(left: u32, front: u32, right: u32) -> Self {
        Self { left, front, right }
    }
}

impl fmt::Display for SensorReadings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.left, self.front, self.right)
    }
}

/// Action returned by a robot after reading its sensors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Rotate by `rotation` degrees, then travel `movement` cells.
    ///
    /// Negative movement travels backwards without changing the heading.
    Steer {
        /// Requested rotation in degrees, clockwise positive.
        rotation: i32,
        /// Requested number of cells to travel.
        movement: i32,
    },
    /// Ends the exploration run and returns the robot to the start.
    Reset,
}

impl Action {
    /// Convenience constructor for [`Action::Steer`].
    #[must_use]
    pub const fn steer(rotation: i32, movement: i32) -> Self {
        Self::Steer { rotation, movement }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Steer { rotation, movement } => {
                write!(f, "rotation {rotation}, movement {movement}")
            }
            Self::Reset => f.write_str("reset"),
        }
    }
}

/// Decision policy driven by the harness.
pub trait Robot {
    /// Chooses the next action from the latest sensor readings.
    fn next_move(&mut self, sensors: SensorReadings) -> Action;
}

impl<R: Robot + ?Sized> Robot for Box<R> {
    fn next_move(&mut self, sensors: SensorReadings) -> Action {
        (**self).next_move(sensors)
    }
}

/// Identifies one of the two scored runs of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Run {
    /// First run, spent mapping the maze.
    Exploration,
    /// Second run, timed at full weight.
    Timed,
}

impl Run {
    /// One-based run number.
    #[must_use]
    pub const fn number(self) -> u32 {
        match self {
            Self::Exploration => 1,
            Self::Timed => 2,
        }
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run {}", self.number())
    }
}

/// Reasons an action is rejected without ending the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IllegalAction {
    /// The rotation was not one of `-90`, `0` or `90` degrees.
    InvalidRotation {
        /// Rotation requested by the robot.
        degrees: i32,
    },
    /// A reset was requested before the goal was reached in the first run.
    PrematureReset,
}

impl fmt::Display for IllegalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRotation { degrees } => {
                write!(f, "invalid rotation of {degrees} degrees, no rotation performed")
            }
            Self::PrematureReset => f.write_str("cannot reset before reaching the goal"),
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Returns the robot to [`Pose::START`].
    ResetPose,
    /// Rotates the robot in place.
    Rotate {
        /// Requested rotation in degrees, clockwise positive.
        degrees: i32,
    },
    /// Moves the robot one cell at a time, stopping at the first wall.
    Advance {
        /// Signed number of cells; negative values travel backwards.
        cells: i32,
    },
}

/// Events broadcast by the world and the harness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// A run began with the robot at [`Pose::START`].
    RunStarted {
        /// Run that started.
        run: Run,
    },
    /// The robot read its sensors and chose an action.
    ActionChosen {
        /// Run in progress.
        run: Run,
        /// One-based step counter within the run.
        step: u32,
        /// Ground-truth pose at the time of sensing.
        pose: Pose,
        /// Readings handed to the robot.
        sensors: SensorReadings,
        /// Action the robot returned.
        action: Action,
    },
    /// An action was rejected; the step still counts.
    ActionRejected {
        /// Why the action was rejected.
        reason: IllegalAction,
    },
    /// The robot returned to the start pose.
    PoseReset {
        /// Pose held before the reset.
        from: Pose,
    },
    /// The robot's heading changed.
    HeadingChanged {
        /// Heading before rotating.
        from: Direction,
        /// Heading after rotating.
        to: Direction,
    },
    /// The robot moved between two adjacent cells.
    RobotAdvanced {
        /// Cell occupied before the step.
        from: CellCoord,
        /// Cell occupied after the step.
        to: CellCoord,
    },
    /// A wall stopped the movement before all requested cells were travelled.
    MovementBlocked {
        /// Cell where the robot stopped.
        at: CellCoord,
        /// Direction of travel that was blocked.
        direction: Direction,
        /// Number of cells requested after clamping.
        requested: u32,
        /// Number of cells actually travelled.
        travelled: u32,
    },
    /// The robot entered the goal region for the first time in a run.
    GoalReached {
        /// Run in progress.
        run: Run,
        /// Step at which the goal was entered.
        step: u32,
        /// Goal cell entered.
        cell: CellCoord,
    },
    /// A run finished and its runtime was recorded.
    RunCompleted {
        /// Run that finished.
        run: Run,
        /// Steps recorded for the run.
        steps: u32,
    },
    /// A run exhausted its step budget without recording a runtime.
    RunTimedOut {
        /// Run that timed out.
        run: Run,
        /// Whether the goal had been reached before the budget ran out.
        goal_reached: bool,
    },
}
