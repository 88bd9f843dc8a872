//! Errors raised while loading or constructing a maze.

use std::{io, path::PathBuf};

use micromouse_core::CellCoord;
use thiserror::Error;

use crate::maze::EdgeViolation;

/// Fatal errors that prevent a maze from being built.
#[derive(Debug, Error)]
pub enum MazeError {
    /// The maze description has the wrong shape or contains invalid tokens.
    #[error(transparent)]
    Malformed(#[from] MalformedInput),
    /// One or more shared edges disagree between neighbouring cells.
    #[error(
        "consistency errors found in wall codes: {}",
        describe_violations(.violations)
    )]
    Inconsistent {
        /// Every offending edge, vertical walls first.
        violations: Vec<EdgeViolation>,
    },
    /// The maze file could not be read.
    #[error("failed to read maze file {}", .path.display())]
    Io {
        /// Path of the file that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

impl MazeError {
    /// Offending edges when the error reports inconsistencies, otherwise empty.
    #[must_use]
    pub fn violations(&self) -> &[EdgeViolation] {
        match self {
            Self::Inconsistent { violations } => violations,
            _ => &[],
        }
    }
}

/// Shape and token problems in a maze description.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedInput {
    /// The description contained no lines.
    #[error("maze description is empty")]
    Empty,
    /// The dimension was zero.
    #[error("maze dimension must be positive")]
    ZeroDimension,
    /// The dimension was odd.
    #[error("maze dimensions must be even in length, found {dimension}")]
    OddDimension {
        /// Dimension read from the description.
        dimension: u32,
    },
    /// The dimension does not fit the platform's address space.
    #[error("maze dimension {dimension} is too large")]
    OversizedDimension {
        /// Dimension read from the description.
        dimension: u32,
    },
    /// The number of columns does not match the dimension.
    #[error("maze shape does not match dimension: expected {expected} columns, found {found}")]
    ColumnCount {
        /// Dimension declared by the description.
        expected: u32,
        /// Number of columns supplied.
        found: usize,
    },
    /// A column holds the wrong number of cells.
    #[error("column {column} holds {found} cells but the maze dimension is {expected}")]
    ColumnLength {
        /// Zero-based column index (`x`).
        column: usize,
        /// Dimension declared by the description.
        expected: u32,
        /// Number of cells supplied.
        found: usize,
    },
    /// A token could not be parsed as an integer.
    #[error("line {line}: `{token}` is not an integer")]
    InvalidToken {
        /// One-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },
    /// A wall code lies outside the four-bit range.
    #[error("wall code {value} at {cell} is outside 0..=15")]
    CodeOutOfRange {
        /// Cell whose code is invalid.
        cell: CellCoord,
        /// Value supplied for the cell.
        value: i64,
    },
}

fn describe_violations(violations: &[EdgeViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
