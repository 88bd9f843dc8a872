#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Two-run simulation harness that scores a robot against a maze.
//!
//! The harness senses on behalf of the robot, forwards its decisions to the
//! world as commands and keeps the run bookkeeping: step counts, the goal
//! flag, recorded runtimes and the final score. Illegal actions and blocked
//! movement never end a run; only the per-run step cap does.

mod config;

use std::fmt;

use micromouse_core::{Action, Command, Event, IllegalAction, Pose, Robot, Run};
use micromouse_world::{self as world, query, World};
use tracing::{debug, info, warn};

pub use config::{
    HarnessConfig, DEFAULT_EXPLORATION_WEIGHT, DEFAULT_MAX_MOVEMENT, DEFAULT_MAX_TIME,
};

/// Lifecycle of a simulation session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// First run in progress, goal not reached yet.
    Exploring,
    /// First run in progress, goal reached, waiting for the robot to reset.
    AwaitingReset,
    /// Second run in progress.
    Timed,
    /// Both runs recorded a runtime.
    Done,
    /// A run exhausted its step budget without reaching the goal.
    TimedOut {
        /// Run that ran out of steps.
        run: Run,
    },
    /// The first run reached the goal but ran out of steps before resetting.
    Failed,
}

impl SessionState {
    /// Run currently in progress, if any.
    #[must_use]
    pub const fn run(self) -> Option<Run> {
        match self {
            Self::Exploring | Self::AwaitingReset => Some(Run::Exploration),
            Self::Timed => Some(Run::Timed),
            Self::Done | Self::TimedOut { .. } | Self::Failed => None,
        }
    }

    /// Reports whether the session has finished.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.run().is_none()
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exploring => f.write_str("exploring"),
            Self::AwaitingReset => f.write_str("awaiting reset"),
            Self::Timed => f.write_str("timed run"),
            Self::Done => f.write_str("done"),
            Self::TimedOut { run } => write!(f, "{run} timed out"),
            Self::Failed => f.write_str("goal reached but the robot never reset"),
        }
    }
}

/// Summary of a session once it reaches a terminal state.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionReport {
    /// Final session state.
    pub outcome: SessionState,
    /// Steps recorded per completed run, in run order.
    pub runtimes: Vec<u32>,
    /// Combined score when both runs completed; lower is better.
    pub score: Option<f64>,
}

/// Combines the two runtimes into a score.
///
/// Returns `None` unless exactly two runtimes were recorded. The timed run
/// counts in full and the exploration run is discounted by
/// `exploration_weight`.
#[must_use]
pub fn score(runtimes: &[u32], exploration_weight: f64) -> Option<f64> {
    match runtimes {
        [exploration, timed] => {
            Some(f64::from(*timed) + exploration_weight * f64::from(*exploration))
        }
        _ => None,
    }
}

/// Drives a robot through the exploration and timed runs.
#[derive(Clone, Debug)]
pub struct Harness {
    config: HarnessConfig,
    state: SessionState,
    started: bool,
    elapsed: u32,
    goal_reached: bool,
    runtimes: Vec<u32>,
}

impl Harness {
    /// Creates a harness that has not started its first run yet.
    #[must_use]
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            state: SessionState::Exploring,
            started: false,
            elapsed: 0,
            goal_reached: false,
            runtimes: Vec::new(),
        }
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Current session state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Steps taken in the current run.
    #[must_use]
    pub const fn elapsed_steps(&self) -> u32 {
        self.elapsed
    }

    /// Whether the goal has been entered during the current run.
    #[must_use]
    pub const fn goal_reached(&self) -> bool {
        self.goal_reached
    }

    /// Runtimes recorded so far.
    #[must_use]
    pub fn runtimes(&self) -> &[u32] {
        &self.runtimes
    }

    /// Snapshot of the session outcome and score.
    #[must_use]
    pub fn report(&self) -> SessionReport {
        SessionReport {
            outcome: self.state,
            runtimes: self.runtimes.clone(),
            score: score(&self.runtimes, self.config.exploration_weight),
        }
    }

    /// Executes a single sensing/decision/actuation cycle.
    ///
    /// Returns the state after the step. Calling `step` on a finished session
    /// does nothing.
    pub fn step<R>(
        &mut self,
        world: &mut World,
        robot: &mut R,
        out_events: &mut Vec<Event>,
    ) -> SessionState
    where
        R: Robot + ?Sized,
    {
        let Some(run) = self.state.run() else {
            return self.state;
        };

        if !self.started {
            self.started = true;
            self.begin_run(world, run, out_events);
        }

        self.elapsed += 1;
        if self.elapsed > self.config.max_time {
            self.time_out(run, out_events);
            return self.state;
        }

        let step = self.elapsed;
        let pose = query::pose(world);
        let sensors = query::sensor_readings(world);
        let action = robot.next_move(sensors);
        debug!(
            run = run.number(),
            step,
            cell = %pose.cell,
            heading = %pose.heading,
            %sensors,
            %action,
            "robot chose action"
        );
        out_events.push(Event::ActionChosen {
            run,
            step,
            pose,
            sensors,
            action,
        });

        let first_world_event = out_events.len();
        match action {
            Action::Reset => {
                self.reset(world, out_events);
                return self.state;
            }
            Action::Steer { rotation, movement } => {
                world::apply(world, Command::Rotate { degrees: rotation }, out_events);
                let cells = self.config.clamp_movement(movement);
                world::apply(world, Command::Advance { cells }, out_events);
            }
        }
        log_world_events(&out_events[first_world_event..]);

        self.check_goal(world, run, out_events);
        self.state
    }

    /// Steps until the session finishes, handing each step's events to
    /// `on_events`.
    pub fn run_session<R, F>(
        &mut self,
        world: &mut World,
        robot: &mut R,
        mut on_events: F,
    ) -> SessionReport
    where
        R: Robot + ?Sized,
        F: FnMut(&[Event]),
    {
        let mut events = Vec::new();
        loop {
            events.clear();
            let state = self.step(world, robot, &mut events);
            on_events(&events);
            if state.is_terminal() {
                break;
            }
        }

        let report = self.report();
        match report.score {
            Some(score) => info!(score, runtimes = ?report.runtimes, "session complete"),
            None => info!(outcome = %report.outcome, "session incomplete"),
        }
        report
    }

    fn begin_run(&mut self, world: &mut World, run: Run, out_events: &mut Vec<Event>) {
        self.elapsed = 0;
        self.goal_reached = false;
        if query::pose(world) != Pose::START {
            world::apply(world, Command::ResetPose, out_events);
        }
        debug!(run = run.number(), "run started");
        out_events.push(Event::RunStarted { run });
    }

    fn reset(&mut self, world: &mut World, out_events: &mut Vec<Event>) {
        if self.state != SessionState::AwaitingReset {
            warn!(
                step = self.elapsed,
                state = %self.state,
                "rejected reset before reaching the goal"
            );
            out_events.push(Event::ActionRejected {
                reason: IllegalAction::PrematureReset,
            });
            return;
        }

        let steps = self.elapsed;
        self.runtimes.push(steps);
        info!(steps, "exploration run complete");
        out_events.push(Event::RunCompleted {
            run: Run::Exploration,
            steps,
        });

        self.state = SessionState::Timed;
        self.begin_run(world, Run::Timed, out_events);
    }

    fn check_goal(&mut self, world: &World, run: Run, out_events: &mut Vec<Event>) {
        if self.goal_reached || !query::in_goal(world) {
            return;
        }

        self.goal_reached = true;
        let step = self.elapsed;
        let cell = query::pose(world).cell;
        info!(run = run.number(), step, %cell, "goal reached");
        out_events.push(Event::GoalReached { run, step, cell });

        match run {
            Run::Exploration => self.state = SessionState::AwaitingReset,
            Run::Timed => {
                self.runtimes.push(step);
                out_events.push(Event::RunCompleted { run, steps: step });
                self.state = SessionState::Done;
            }
        }
    }

    fn time_out(&mut self, run: Run, out_events: &mut Vec<Event>) {
        self.elapsed = self.config.max_time;
        warn!(
            run = run.number(),
            max_time = self.config.max_time,
            goal_reached = self.goal_reached,
            "time limit exceeded"
        );
        out_events.push(Event::RunTimedOut {
            run,
            goal_reached: self.goal_reached,
        });
        self.state = if run == Run::Exploration && self.goal_reached {
            SessionState::Failed
        } else {
            SessionState::TimedOut { run }
        };
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new(HarnessConfig::default())
    }
}

fn log_world_events(events: &[Event]) {
    for event in events {
        match event {
            Event::ActionRejected { reason } => warn!(%reason, "action rejected"),
            Event::MovementBlocked {
                at,
                direction,
                requested,
                travelled,
            } => debug!(
                %at,
                %direction,
                requested,
                travelled,
                "movement blocked by a wall"
            ),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_requires_both_runtimes() {
        assert_eq!(score(&[], DEFAULT_EXPLORATION_WEIGHT), None);
        assert_eq!(score(&[30], DEFAULT_EXPLORATION_WEIGHT), None);
        let combined = score(&[60, 12], DEFAULT_EXPLORATION_WEIGHT).expect("two runtimes");
        assert!((combined - 14.0).abs() < 1e-9);
    }

    #[test]
    fn terminal_states_have_no_run() {
        assert_eq!(SessionState::Exploring.run(), Some(Run::Exploration));
        assert_eq!(SessionState::AwaitingReset.run(), Some(Run::Exploration));
        assert_eq!(SessionState::Timed.run(), Some(Run::Timed));
        assert!(SessionState::Done.is_terminal());
        assert!(SessionState::Failed.is_terminal());
        assert!(SessionState::TimedOut { run: Run::Timed }.is_terminal());
    }
}
