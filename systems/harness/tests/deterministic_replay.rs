use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use micromouse_core::{CellCoord, Direction, Event, Pose};
use micromouse_system_harness::{Harness, SessionState};
use micromouse_system_robot::ReactiveRobot;
use micromouse_world::{loader, query, World};

const MAZE: &str = "\
6
2,3,4,3,5,6
10,9,7,13,4,10
9,6,8,3,6,10
3,12,3,12,9,14
10,3,12,2,3,12
9,12,1,13,13,4
";

#[test]
fn deterministic_replay_produces_expected_snapshot() {
    let first = replay();
    let second = replay();

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.events.len(), 70);

    let fingerprint = first.fingerprint();
    let expected = 0xf10f_503c_ddbd_2556;
    assert_eq!(
        fingerprint, expected,
        "fingerprint mismatch: {fingerprint:#x}"
    );
}

#[test]
fn replay_completes_both_runs() {
    let outcome = replay();
    assert_eq!(outcome.outcome, SessionState::Done);
    assert_eq!(outcome.runtimes, vec![12, 11]);
    assert_eq!(
        outcome.final_pose,
        Pose {
            cell: CellCoord::new(3, 2),
            heading: Direction::Left,
        }
    );
    assert!(matches!(
        outcome.events.first(),
        Some(Event::RunStarted { .. })
    ));
}

fn replay() -> ReplayOutcome {
    let maze = loader::parse_maze(MAZE).expect("replay maze is consistent");
    let mut world = World::new(maze);
    let mut robot = ReactiveRobot::new(6);
    let mut harness = Harness::default();
    let mut events = Vec::new();

    let report = harness.run_session(&mut world, &mut robot, |step_events| {
        events.extend_from_slice(step_events);
    });

    ReplayOutcome {
        outcome: report.outcome,
        runtimes: report.runtimes,
        final_pose: query::pose(&world),
        events,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    outcome: SessionState,
    runtimes: Vec<u32>,
    final_pose: Pose,
    events: Vec<Event>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
