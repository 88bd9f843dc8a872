#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Robot decision policies driven by the simulation harness.
//!
//! Every policy implements [`micromouse_core::Robot`]. The harness remains
//! the sole arbiter of physical legality, so a policy's belief about its own
//! location may drift from the ground truth without affecting the rules.

mod reactive;
mod scripted;

pub use reactive::ReactiveRobot;
pub use scripted::ScriptedRobot;
