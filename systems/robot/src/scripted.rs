use std::collections::VecDeque;

use micromouse_core::{Action, Robot, SensorReadings};

/// Replays a fixed sequence of actions regardless of sensor input.
///
/// Once the script is exhausted the robot idles with `(0, 0)` steers.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRobot {
    actions: VecDeque<Action>,
    observed: Vec<SensorReadings>,
}

impl ScriptedRobot {
    /// Creates a robot that replays `actions` in order.
    #[must_use]
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            observed: Vec::new(),
        }
    }

    /// Number of scripted actions not yet issued.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.actions.len()
    }

    /// Sensor readings received so far, in order.
    #[must_use]
    pub fn observed(&self) -> &[SensorReadings] {
        &self.observed
    }
}

impl Robot for ScriptedRobot {
    fn next_move(&mut self, sensors: SensorReadings) -> Action {
        self.observed.push(sensors);
        self.actions.pop_front().unwrap_or(Action::steer(0, 0))
    }
}
