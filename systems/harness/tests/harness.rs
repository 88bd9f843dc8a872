use micromouse_core::{Action, CellCoord, Direction, Event, IllegalAction, Pose, Run};
use micromouse_system_harness::{Harness, HarnessConfig, SessionState};
use micromouse_system_robot::{ReactiveRobot, ScriptedRobot};
use micromouse_world::{loader, query, Maze, World};

const CORRIDOR: &str = "4\n1,5,5,6\n0,0,1,12\n0,0,0,0\n0,0,0,0\n";

fn open_world() -> World {
    World::new(Maze::new(4, vec![vec![15; 4]; 4]).expect("open maze"))
}

fn corridor_world() -> World {
    World::new(loader::parse_maze(CORRIDOR).expect("corridor maze"))
}

fn to_goal_and_back() -> Vec<Action> {
    vec![
        Action::steer(0, 1),
        Action::steer(90, 1),
        Action::Reset,
        Action::steer(0, 1),
        Action::steer(90, 1),
    ]
}

fn step(harness: &mut Harness, world: &mut World, robot: &mut ScriptedRobot) -> Vec<Event> {
    let mut events = Vec::new();
    let _ = harness.step(world, robot, &mut events);
    events
}

#[test]
fn reactive_robot_completes_corridor() {
    let mut world = corridor_world();
    let mut robot = ReactiveRobot::new(4);
    let mut harness = Harness::default();
    let mut goal_steps = Vec::new();

    let report = harness.run_session(&mut world, &mut robot, |events| {
        goal_steps.extend(events.iter().filter_map(|event| match event {
            Event::GoalReached { run, step, cell } => Some((*run, *step, *cell)),
            _ => None,
        }));
    });

    assert_eq!(report.outcome, SessionState::Done);
    assert_eq!(report.runtimes, vec![6, 5]);
    let score = report.score.expect("both runs completed");
    assert!((score - (5.0 + 6.0 / 30.0)).abs() < 1e-9);
    assert!(report.runtimes[1] <= report.runtimes[0]);
    assert_eq!(
        goal_steps,
        vec![
            (Run::Exploration, 5, CellCoord::new(1, 2)),
            (Run::Timed, 5, CellCoord::new(1, 2)),
        ]
    );
}

#[test]
fn scripted_robot_scores_open_maze() {
    let mut world = open_world();
    let mut robot = ScriptedRobot::new(to_goal_and_back());
    let mut harness = Harness::default();

    let report = harness.run_session(&mut world, &mut robot, |_| {});

    assert_eq!(report.outcome, SessionState::Done);
    assert_eq!(report.runtimes, vec![3, 2]);
    let score = report.score.expect("both runs completed");
    assert!((score - 2.1).abs() < 1e-9);
    assert_eq!(robot.remaining(), 0);
}

#[test]
fn reset_restarts_from_origin() {
    let mut world = open_world();
    let mut robot = ScriptedRobot::new(to_goal_and_back());
    let mut harness = Harness::default();

    let _ = step(&mut harness, &mut world, &mut robot);
    let _ = step(&mut harness, &mut world, &mut robot);
    assert_eq!(harness.state(), SessionState::AwaitingReset);
    assert!(harness.goal_reached());

    let events = step(&mut harness, &mut world, &mut robot);
    assert!(events.contains(&Event::RunCompleted {
        run: Run::Exploration,
        steps: 3,
    }));
    assert!(events.contains(&Event::PoseReset {
        from: Pose {
            cell: CellCoord::new(1, 1),
            heading: Direction::Right,
        },
    }));
    assert_eq!(events.last(), Some(&Event::RunStarted { run: Run::Timed }));
    assert_eq!(harness.state(), SessionState::Timed);
    assert_eq!(harness.elapsed_steps(), 0);
    assert!(!harness.goal_reached());
    assert_eq!(query::pose(&world), Pose::START);
}

#[test]
fn premature_reset_is_ignored() {
    let mut world = open_world();
    let mut robot = ScriptedRobot::new([Action::steer(0, 1), Action::Reset]);
    let mut harness = Harness::default();

    let _ = step(&mut harness, &mut world, &mut robot);
    let events = step(&mut harness, &mut world, &mut robot);

    assert!(events.contains(&Event::ActionRejected {
        reason: IllegalAction::PrematureReset,
    }));
    assert_eq!(query::pose(&world).cell, CellCoord::new(0, 1));
    assert_eq!(harness.state(), SessionState::Exploring);
    assert_eq!(harness.elapsed_steps(), 2);
    assert!(harness.runtimes().is_empty());
}

#[test]
fn reset_during_timed_run_is_rejected() {
    let mut world = open_world();
    let mut robot = ScriptedRobot::new([
        Action::steer(0, 1),
        Action::steer(90, 1),
        Action::Reset,
        Action::steer(0, 1),
        Action::Reset,
    ]);
    let mut harness = Harness::default();

    for _ in 0..4 {
        let _ = step(&mut harness, &mut world, &mut robot);
    }
    assert_eq!(harness.state(), SessionState::Timed);
    let events = step(&mut harness, &mut world, &mut robot);

    assert!(events.contains(&Event::ActionRejected {
        reason: IllegalAction::PrematureReset,
    }));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::RunCompleted { .. } | Event::PoseReset { .. })));
    assert_eq!(harness.state(), SessionState::Timed);
    assert_eq!(harness.runtimes().to_vec(), vec![3]);
    assert_eq!(harness.elapsed_steps(), 2);
    assert_eq!(
        query::pose(&world),
        Pose {
            cell: CellCoord::new(0, 1),
            heading: Direction::Up,
        }
    );
    assert_eq!(harness.config().max_time, HarnessConfig::default().max_time);
}

#[test]
fn oversized_movement_is_clamped() {
    let mut world = open_world();
    let mut robot = ScriptedRobot::new([Action::steer(0, 5)]);
    let mut harness = Harness::default();

    let events = step(&mut harness, &mut world, &mut robot);

    let advanced = events
        .iter()
        .filter(|event| matches!(event, Event::RobotAdvanced { .. }))
        .count();
    assert_eq!(advanced, 3);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::MovementBlocked { .. })));
    assert_eq!(query::pose(&world).cell, CellCoord::new(0, 3));
}

#[test]
fn invalid_rotation_still_moves() {
    let mut world = open_world();
    let mut robot = ScriptedRobot::new([Action::steer(45, 1)]);
    let mut harness = Harness::default();

    let events = step(&mut harness, &mut world, &mut robot);

    assert!(events.contains(&Event::ActionRejected {
        reason: IllegalAction::InvalidRotation { degrees: 45 },
    }));
    assert_eq!(
        query::pose(&world),
        Pose {
            cell: CellCoord::new(0, 1),
            heading: Direction::Up,
        }
    );
}

#[test]
fn blocked_movement_keeps_partial_progress() {
    let mut world = corridor_world();
    let mut robot = ScriptedRobot::new([Action::steer(0, 3), Action::steer(90, 3)]);
    let mut harness = Harness::default();

    let _ = step(&mut harness, &mut world, &mut robot);
    let events = step(&mut harness, &mut world, &mut robot);

    assert!(events.contains(&Event::MovementBlocked {
        at: CellCoord::new(1, 3),
        direction: Direction::Right,
        requested: 3,
        travelled: 1,
    }));
    assert_eq!(query::pose(&world).cell, CellCoord::new(1, 3));
    assert_eq!(harness.state(), SessionState::Exploring);
}

#[test]
fn idle_robot_times_out_during_exploration() {
    let mut world = open_world();
    let mut robot = ScriptedRobot::default();
    let mut harness = Harness::new(HarnessConfig::default().with_max_time(5));
    let mut timeouts = Vec::new();

    let report = harness.run_session(&mut world, &mut robot, |events| {
        timeouts.extend(
            events
                .iter()
                .filter(|event| matches!(event, Event::RunTimedOut { .. }))
                .copied(),
        );
    });

    assert_eq!(
        report.outcome,
        SessionState::TimedOut {
            run: Run::Exploration
        }
    );
    assert!(report.runtimes.is_empty());
    assert_eq!(report.score, None);
    assert_eq!(robot.observed().len(), 5);
    assert_eq!(
        timeouts,
        vec![Event::RunTimedOut {
            run: Run::Exploration,
            goal_reached: false,
        }]
    );
}

#[test]
fn reactive_robot_circles_open_maze_until_timeout() {
    let mut world = open_world();
    let mut robot = ReactiveRobot::new(4);
    let mut harness = Harness::new(HarnessConfig::default().with_max_time(40));

    let report = harness.run_session(&mut world, &mut robot, |_| {});

    assert_eq!(
        report.outcome,
        SessionState::TimedOut {
            run: Run::Exploration
        }
    );
    assert_eq!(report.score, None);
}

#[test]
fn missing_reset_fails_the_session() {
    let mut world = open_world();
    let mut robot = ScriptedRobot::new([Action::steer(0, 1), Action::steer(90, 1)]);
    let mut harness = Harness::new(HarnessConfig::default().with_max_time(5));

    let report = harness.run_session(&mut world, &mut robot, |_| {});

    assert_eq!(report.outcome, SessionState::Failed);
    assert!(report.runtimes.is_empty());
    assert_eq!(report.score, None);
}

#[test]
fn timed_run_timeout_keeps_exploration_runtime() {
    let mut world = open_world();
    let mut robot = ScriptedRobot::new([
        Action::steer(0, 1),
        Action::steer(90, 1),
        Action::Reset,
    ]);
    let mut harness = Harness::new(HarnessConfig::default().with_max_time(5));

    let report = harness.run_session(&mut world, &mut robot, |_| {});

    assert_eq!(report.outcome, SessionState::TimedOut { run: Run::Timed });
    assert_eq!(report.runtimes, vec![3]);
    assert_eq!(report.score, None);
}

#[test]
fn finished_session_ignores_further_steps() {
    let mut world = open_world();
    let mut robot = ScriptedRobot::new(to_goal_and_back());
    let mut harness = Harness::default();
    let _ = harness.run_session(&mut world, &mut robot, |_| {});

    let mut events = Vec::new();
    let state = harness.step(&mut world, &mut robot, &mut events);

    assert_eq!(state, SessionState::Done);
    assert!(events.is_empty());
    assert_eq!(harness.runtimes(), &[3, 2]);
}
