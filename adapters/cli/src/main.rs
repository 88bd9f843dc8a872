#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that scores micromouse robots and draws mazes.

mod inputs;

use std::{
    io,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use micromouse_core::{CellCoord, Event, Robot};
use micromouse_rendering::{RenderingBackend, Scene, TextBackend};
use micromouse_system_harness::{Harness, HarnessConfig, SessionReport};
use micromouse_system_robot::{ReactiveRobot, ScriptedRobot};
use micromouse_world::{loader, query, Maze, World};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Exit status reported when a session ends without a score.
const INCOMPLETE_EXIT_CODE: u8 = 2;

/// Micromouse maze simulator.
#[derive(Debug, Parser)]
#[command(name = "micromouse", version)]
struct Cli {
    /// Log every harness decision at debug level.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Runs the exploration and timed runs, then prints the score.
    Run {
        /// Maze description file.
        maze: PathBuf,
        /// TOML file overriding the harness limits.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Step budget per run; takes precedence over the config file.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        max_time: Option<u32>,
        /// TOML action script replayed instead of the reference robot.
        #[arg(long)]
        script: Option<PathBuf>,
        /// Only print the final result.
        #[arg(long)]
        quiet: bool,
    },
    /// Draws a maze as ASCII art.
    Show {
        /// Maze description file.
        maze: PathBuf,
        /// Mark the cells visited by the reference robot.
        #[arg(long)]
        trail: bool,
    },
}

/// Entry point for the micromouse command-line interface.
fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            maze,
            config,
            max_time,
            script,
            quiet,
        } => run(
            &maze,
            config.as_deref(),
            max_time,
            script.as_deref(),
            quiet,
        ),
        Commands::Show { maze, trail } => {
            show(&maze, trail)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn load_maze(path: &Path) -> Result<Maze> {
    loader::load_maze(path).with_context(|| format!("failed to load maze {}", path.display()))
}

fn run(
    maze_path: &Path,
    config_path: Option<&Path>,
    max_time: Option<u32>,
    script_path: Option<&Path>,
    quiet: bool,
) -> Result<ExitCode> {
    let maze = load_maze(maze_path)?;
    let mut config = match config_path {
        Some(path) => inputs::load_config(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(max_time) = max_time {
        config = config.with_max_time(max_time);
    }

    let mut world = World::new(maze);
    let dimension = query::maze(&world).dimension();
    let mut robot: Box<dyn Robot> = match script_path {
        Some(path) => Box::new(ScriptedRobot::new(inputs::load_script(path)?)),
        None => Box::new(ReactiveRobot::new(dimension)),
    };
    let mut harness = Harness::new(config);
    info!(
        maze = %maze_path.display(),
        dimension,
        max_time = harness.config().max_time,
        scripted = script_path.is_some(),
        "starting session"
    );

    if !quiet {
        println!("{}", query::welcome_banner(&world));
    }

    let report = harness.run_session(&mut world, robot.as_mut(), |events| {
        if quiet {
            return;
        }
        for line in events.iter().filter_map(describe) {
            println!("{line}");
        }
    });

    Ok(print_report(&report))
}

fn describe(event: &Event) -> Option<String> {
    let line = match event {
        Event::RunStarted { run } => format!("== {run} =="),
        Event::ActionChosen {
            run,
            step,
            pose,
            sensors,
            action,
        } => format!(
            "{run} step {step}: at {} facing {}, sensors {sensors}, {action}",
            pose.cell, pose.heading
        ),
        Event::ActionRejected { reason } => format!("  rejected: {reason}"),
        Event::MovementBlocked {
            at,
            direction,
            requested,
            travelled,
        } => format!("  blocked moving {direction} at {at} after {travelled} of {requested} cells"),
        Event::GoalReached { step, cell, .. } => format!("  goal reached at {cell} on step {step}"),
        Event::RunCompleted { run, steps } => format!("{run} completed in {steps} steps"),
        Event::RunTimedOut { run, goal_reached } => {
            if *goal_reached {
                format!("{run} ran out of time after reaching the goal")
            } else {
                format!("{run} ran out of time")
            }
        }
        Event::PoseReset { .. } | Event::HeadingChanged { .. } | Event::RobotAdvanced { .. } => {
            return None
        }
    };
    Some(line)
}

fn print_report(report: &SessionReport) -> ExitCode {
    match report.score {
        Some(score) => {
            for (run, steps) in report.runtimes.iter().enumerate() {
                println!("Run {} runtime: {steps} steps", run + 1);
            }
            println!("Score: {score:.3}");
            ExitCode::SUCCESS
        }
        None => {
            println!("Session incomplete: {}", report.outcome);
            ExitCode::from(INCOMPLETE_EXIT_CODE)
        }
    }
}

fn show(maze_path: &Path, with_trail: bool) -> Result<()> {
    let maze = load_maze(maze_path)?;
    let trail = if with_trail {
        reference_trail(&maze)
    } else {
        Vec::new()
    };

    let scene = Scene::new(&maze, trail);
    let mut backend = TextBackend::new(io::stdout().lock());
    backend.render(&scene).context("failed to draw maze")
}

fn reference_trail(maze: &Maze) -> Vec<CellCoord> {
    let mut world = World::new(maze.clone());
    let mut robot = ReactiveRobot::new(maze.dimension());
    let mut harness = Harness::default();
    let mut trail = vec![CellCoord::ORIGIN];

    let report = harness.run_session(&mut world, &mut robot, |events| {
        trail.extend(events.iter().filter_map(|event| match event {
            Event::RobotAdvanced { to, .. } => Some(*to),
            _ => None,
        }));
    });
    debug!(outcome = %report.outcome, cells = trail.len(), "collected reference trail");
    trail
}
