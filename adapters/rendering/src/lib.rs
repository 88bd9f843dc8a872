#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for micromouse adapters.
//!
//! Mazes are presented as thin wall rectangles in maze units, with the origin
//! in the lower-left corner and `y` growing upwards.

use std::{collections::HashSet, io::Write};

use anyhow::Result as AnyResult;
use glam::Vec2;
use micromouse_core::{CellCoord, Direction};
use micromouse_world::Maze;

/// Thickness of a rendered wall in maze units.
pub const WALL_THICKNESS: f32 = 0.1;

/// Axis-aligned rectangle covering one closed cell side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSegment {
    /// Lower-left corner of the rectangle.
    pub origin: Vec2,
    /// Width and height of the rectangle.
    pub size: Vec2,
}

impl WallSegment {
    /// Wall lying along the horizontal grid line `y`, spanning column `x`.
    #[must_use]
    pub fn horizontal(x: u32, y: u32) -> Self {
        Self {
            origin: Vec2::new(x as f32, y as f32),
            size: Vec2::new(1.0, WALL_THICKNESS),
        }
    }

    /// Wall lying along the vertical grid line `x`, spanning row `y`.
    #[must_use]
    pub fn vertical(x: u32, y: u32) -> Self {
        Self {
            origin: Vec2::new(x as f32, y as f32),
            size: Vec2::new(WALL_THICKNESS, 1.0),
        }
    }

}

/// Grid line section between two lattice points, keyed by its lower-left end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Edge {
    Horizontal(u32, u32),
    Vertical(u32, u32),
}

impl Edge {
    fn bounding(cell: CellCoord, side: Direction) -> Self {
        let (x, y) = (cell.x(), cell.y());
        match side {
            Direction::Up => Self::Horizontal(x, y + 1),
            Direction::Right => Self::Vertical(x + 1, y),
            Direction::Down => Self::Horizontal(x, y),
            Direction::Left => Self::Vertical(x, y),
        }
    }

    fn segment(self) -> WallSegment {
        match self {
            Self::Horizontal(x, y) => WallSegment::horizontal(x, y),
            Self::Vertical(x, y) => WallSegment::vertical(x, y),
        }
    }
}

fn closed_edges(maze: &Maze) -> impl Iterator<Item = Edge> + '_ {
    maze.cells().flat_map(move |cell| {
        Direction::ALL
            .into_iter()
            .filter(move |side| !maze.is_open(cell, *side))
            .map(move |side| Edge::bounding(cell, side))
    })
}

/// Collects one rectangle per closed side of every cell.
///
/// A wall shared by two cells is reported once from each side, so interior
/// walls appear twice.
#[must_use]
pub fn wall_segments(maze: &Maze) -> Vec<WallSegment> {
    closed_edges(maze).map(Edge::segment).collect()
}

/// Everything a backend needs to draw a maze and the path taken through it.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of cells along each side.
    pub dimension: u32,
    /// Closed cell sides.
    pub walls: Vec<WallSegment>,
    /// Cells of the goal region.
    pub goal: Vec<CellCoord>,
    /// Cells visited by the robot, in visiting order.
    pub trail: Vec<CellCoord>,
    closed: HashSet<Edge>,
    visited: HashSet<CellCoord>,
}

impl Scene {
    /// Builds a scene for `maze` with an optional robot trail.
    #[must_use]
    pub fn new(maze: &Maze, trail: Vec<CellCoord>) -> Self {
        let closed: HashSet<Edge> = closed_edges(maze).collect();
        Self {
            dimension: maze.dimension(),
            walls: wall_segments(maze),
            goal: maze.goal_region().cells().to_vec(),
            visited: trail.iter().copied().collect(),
            trail,
            closed,
        }
    }

    fn closes(&self, edge: Edge) -> bool {
        self.closed.contains(&edge)
    }

    fn marker(&self, cell: CellCoord) -> char {
        if self.goal.contains(&cell) {
            'G'
        } else if self.visited.contains(&cell) {
            '*'
        } else {
            ' '
        }
    }
}

/// Rendering backend capable of presenting micromouse scenes.
pub trait RenderingBackend {
    /// Presents a single scene.
    fn render(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Draws scenes as ASCII art with the highest row on top.
#[derive(Debug)]
pub struct TextBackend<W> {
    out: W,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn horizontal_line(&mut self, scene: &Scene, y: u32) -> AnyResult<()> {
        let mut line = String::new();
        for x in 0..scene.dimension {
            line.push('+');
            line.push_str(if scene.closes(Edge::Horizontal(x, y)) {
                "---"
            } else {
                "   "
            });
        }
        line.push('+');
        writeln!(self.out, "{line}")?;
        Ok(())
    }

    fn cell_line(&mut self, scene: &Scene, y: u32) -> AnyResult<()> {
        let mut line = String::new();
        for x in 0..=scene.dimension {
            line.push(if scene.closes(Edge::Vertical(x, y)) {
                '|'
            } else {
                ' '
            });
            if x < scene.dimension {
                line.push(' ');
                line.push(scene.marker(CellCoord::new(x, y)));
                line.push(' ');
            }
        }
        writeln!(self.out, "{}", line.trim_end())?;
        Ok(())
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn render(&mut self, scene: &Scene) -> AnyResult<()> {
        for y in (0..scene.dimension).rev() {
            self.horizontal_line(scene, y + 1)?;
            self.cell_line(scene, y)?;
        }
        self.horizontal_line(scene, 0)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use micromouse_world::loader;

    fn render(scene: &Scene) -> String {
        let mut backend = TextBackend::new(Vec::new());
        backend.render(scene).expect("rendering into memory");
        String::from_utf8(backend.into_inner()).expect("ascii output")
    }

    #[test]
    fn closed_cell_has_four_walls() {
        let maze = loader::parse_maze("2\n2,0\n8,0").expect("valid maze");
        let walls = wall_segments(&maze);

        let bottom_right_opening = WallSegment::vertical(1, 0);
        assert!(!walls.contains(&bottom_right_opening));
        assert!(walls.contains(&WallSegment::horizontal(0, 1)));
        assert!(walls.contains(&WallSegment::vertical(0, 0)));
        assert!(walls.iter().all(|wall| {
            (wall.size == Vec2::new(1.0, WALL_THICKNESS))
                || (wall.size == Vec2::new(WALL_THICKNESS, 1.0))
        }));
        assert_eq!(walls.len(), 14);
    }

    #[test]
    fn corridor_renders_top_row_first() {
        let maze = loader::parse_maze("2\n3,4\n8,0").expect("valid maze");
        let scene = Scene::new(&maze, vec![CellCoord::new(0, 0)]);

        assert_eq!(
            render(&scene),
            "+---+---+\n| G | G |\n+   +---+\n| G   G |\n+---+---+\n"
        );
    }

    #[test]
    fn trail_marks_non_goal_cells() {
        let maze = loader::parse_maze("4\n1,5,5,6\n0,0,1,12\n0,0,0,0\n0,0,0,0")
            .expect("valid maze");
        let scene = Scene::new(
            &maze,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(0, 1),
                CellCoord::new(0, 2),
                CellCoord::new(0, 3),
            ],
        );
        let output = render(&scene);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 9);
        assert_eq!(lines[1], "| *     |   |   |");
        assert_eq!(lines[7], "| * |   |   |   |");
        assert!(lines[5].contains('G'));
    }

    #[test]
    fn open_maze_with_full_trail_marks_every_cell() {
        let dimension = 32;
        let maze = Maze::new(dimension, vec![vec![15; dimension as usize]; dimension as usize])
            .expect("valid maze");
        let trail: Vec<CellCoord> = maze.cells().chain(maze.cells()).collect();
        let scene = Scene::new(&maze, trail);
        let output = render(&scene);

        assert_eq!(output.lines().count(), 2 * dimension as usize + 1);
        assert_eq!(output.matches('G').count(), 4);
        assert_eq!(output.matches('*').count(), 32 * 32 - 4);
        assert!(!output.contains('|'));
        assert!(!output.contains('-'));
    }
}
