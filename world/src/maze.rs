//! Immutable wall grid describing the maze.

use std::fmt;

use micromouse_core::{CellCoord, Direction, GoalRegion, WallCode};

use crate::error::{MalformedInput, MazeError};

/// Square maze with per-cell wall permeability.
///
/// Cells are addressed by `(x, y)` with `(0, 0)` in the bottom-left corner.
/// The grid is validated once at construction: the dimension must be even,
/// the wall matrix must be square, and every shared edge must agree from
/// both sides. It never changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    dimension: u32,
    walls: Vec<WallCode>,
}

impl Maze {
    /// Builds a maze from column-major wall codes.
    ///
    /// `columns[x][y]` holds the four-bit code of cell `(x, y)`.
    pub fn new(dimension: u32, columns: Vec<Vec<u8>>) -> Result<Self, MazeError> {
        if dimension == 0 {
            return Err(MalformedInput::ZeroDimension.into());
        }
        if dimension % 2 != 0 {
            return Err(MalformedInput::OddDimension { dimension }.into());
        }

        let side = usize::try_from(dimension)
            .map_err(|_| MalformedInput::OversizedDimension { dimension })?;
        if columns.len() != side {
            return Err(MalformedInput::ColumnCount {
                expected: dimension,
                found: columns.len(),
            }
            .into());
        }

        if let Some((column, found)) = columns
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != side)
        {
            return Err(MalformedInput::ColumnLength {
                column,
                expected: dimension,
                found,
            }
            .into());
        }

        let cells = side
            .checked_mul(side)
            .ok_or(MalformedInput::OversizedDimension { dimension })?;
        let mut walls = Vec::with_capacity(cells);
        for (x, column) in (0..dimension).zip(columns) {
            for (y, bits) in (0..dimension).zip(column) {
                let code = WallCode::from_bits(bits).ok_or(MalformedInput::CodeOutOfRange {
                    cell: CellCoord::new(x, y),
                    value: i64::from(bits),
                })?;
                walls.push(code);
            }
        }

        let maze = Self { dimension, walls };
        let violations = maze.inconsistent_edges();
        if !violations.is_empty() {
            return Err(MazeError::Inconsistent { violations });
        }

        Ok(maze)
    }

    /// Number of cells along each side.
    #[must_use]
    pub const fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.x() < self.dimension && cell.y() < self.dimension
    }

    /// Wall code stored for the cell, if it lies inside the grid.
    #[must_use]
    pub fn wall_code(&self, cell: CellCoord) -> Option<WallCode> {
        self.index(cell)
            .and_then(|index| self.walls.get(index).copied())
    }

    /// Reports whether the side of `cell` facing `direction` is open.
    ///
    /// Cells outside the grid are treated as solid and always answer `false`.
    #[must_use]
    pub fn is_open(&self, cell: CellCoord, direction: Direction) -> bool {
        self.wall_code(cell)
            .map_or(false, |code| code.is_open(direction))
    }

    /// Cell reached by leaving `cell` through `direction`, if the side is open
    /// and the neighbour lies inside the grid.
    ///
    /// The grid boundary acts as a wall even when an edge cell's bit is set.
    #[must_use]
    pub fn passable_neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        if !self.is_open(cell, direction) {
            return None;
        }
        cell.step(direction).filter(|next| self.contains(*next))
    }

    /// Reports whether a robot standing in `cell` can move one cell toward
    /// `direction`.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord, direction: Direction) -> bool {
        self.passable_neighbor(cell, direction).is_some()
    }

    /// Number of cells that can be traversed from `cell` toward `direction`
    /// before hitting a wall or the grid boundary.
    #[must_use]
    pub fn distance_to_wall(&self, cell: CellCoord, direction: Direction) -> u32 {
        let mut distance = 0;
        let mut current = cell;
        while let Some(next) = self.passable_neighbor(current, direction) {
            distance += 1;
            current = next;
        }
        distance
    }

    /// Centre cells that end a run.
    #[must_use]
    pub const fn goal_region(&self) -> GoalRegion {
        GoalRegion::for_dimension(self.dimension)
    }

    /// Reports whether the cell lies in the goal region.
    #[must_use]
    pub const fn is_goal(&self, cell: CellCoord) -> bool {
        self.goal_region().contains(cell)
    }

    /// Iterates over every cell, column by column.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (0..self.dimension)
            .flat_map(move |x| (0..self.dimension).map(move |y| CellCoord::new(x, y)))
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let x = usize::try_from(cell.x()).ok()?;
        let y = usize::try_from(cell.y()).ok()?;
        let side = usize::try_from(self.dimension).ok()?;
        x.checked_mul(side)?.checked_add(y)
    }

    fn inconsistent_edges(&self) -> Vec<EdgeViolation> {
        let mut violations = Vec::new();
        let last = self.dimension - 1;

        for x in 0..last {
            for y in 0..self.dimension {
                let cell = CellCoord::new(x, y);
                let neighbor = CellCoord::new(x + 1, y);
                if self.is_open(cell, Direction::Right) != self.is_open(neighbor, Direction::Left)
                {
                    violations.push(EdgeViolation::new(cell, EdgeOrientation::Vertical));
                }
            }
        }

        for y in 0..last {
            for x in 0..self.dimension {
                let cell = CellCoord::new(x, y);
                let neighbor = CellCoord::new(x, y + 1);
                if self.is_open(cell, Direction::Up) != self.is_open(neighbor, Direction::Down) {
                    violations.push(EdgeViolation::new(cell, EdgeOrientation::Horizontal));
                }
            }
        }

        violations
    }
}

/// Orientation of the wall separating two adjacent cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeOrientation {
    /// Wall between `(x, y)` and `(x + 1, y)`.
    Vertical,
    /// Wall between `(x, y)` and `(x, y + 1)`.
    Horizontal,
}

/// Shared edge whose two sides disagree about being open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeViolation {
    cell: CellCoord,
    orientation: EdgeOrientation,
}

impl EdgeViolation {
    /// Describes the edge anchored at `cell` with the given orientation.
    #[must_use]
    pub const fn new(cell: CellCoord, orientation: EdgeOrientation) -> Self {
        Self { cell, orientation }
    }

    /// Lower-left cell of the pair.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Cell on the other side of the edge.
    #[must_use]
    pub const fn neighbor(&self) -> CellCoord {
        match self.orientation {
            EdgeOrientation::Vertical => CellCoord::new(self.cell.x() + 1, self.cell.y()),
            EdgeOrientation::Horizontal => CellCoord::new(self.cell.x(), self.cell.y() + 1),
        }
    }

    /// Orientation of the offending wall.
    #[must_use]
    pub const fn orientation(&self) -> EdgeOrientation {
        self.orientation
    }
}

impl fmt::Display for EdgeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.orientation {
            EdgeOrientation::Vertical => "vertical",
            EdgeOrientation::Horizontal => "horizontal",
        };
        write!(
            f,
            "inconsistent {kind} wall between {} and {}",
            self.cell,
            self.neighbor()
        )
    }
}
