//! Text loader for maze description files.
//!
//! The first line holds the dimension. Each following line lists the wall
//! codes of one column (`x`), ordered by increasing `y` and separated by
//! commas. Blank lines are ignored.

use std::{fs, path::Path};

use micromouse_core::CellCoord;

use crate::{
    error::{MalformedInput, MazeError},
    maze::Maze,
};

/// Reads and validates the maze stored at `path`.
pub fn load_maze(path: impl AsRef<Path>) -> Result<Maze, MazeError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| MazeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_maze(&contents)
}

/// Parses and validates a maze description.
pub fn parse_maze(source: &str) -> Result<Maze, MazeError> {
    let mut lines = source
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (line, header) = lines.next().ok_or(MalformedInput::Empty)?;
    let dimension = header
        .parse::<u32>()
        .map_err(|_| MalformedInput::InvalidToken {
            line,
            token: header.to_owned(),
        })?;

    let mut columns = Vec::new();
    for (line, text) in lines {
        let oversized = || MalformedInput::OversizedDimension { dimension };
        let x = u32::try_from(columns.len()).map_err(|_| oversized())?;
        let column = text
            .split(',')
            .map(str::trim)
            .enumerate()
            .map(|(y, token)| {
                let y = u32::try_from(y).map_err(|_| oversized())?;
                parse_code(line, CellCoord::new(x, y), token)
            })
            .collect::<Result<Vec<_>, _>>()?;
        columns.push(column);
    }

    Maze::new(dimension, columns)
}

fn parse_code(line: usize, cell: CellCoord, token: &str) -> Result<u8, MalformedInput> {
    let value = token
        .parse::<i64>()
        .map_err(|_| MalformedInput::InvalidToken {
            line,
            token: token.to_owned(),
        })?;
    u8::try_from(value)
        .ok()
        .filter(|bits| *bits <= 15)
        .ok_or(MalformedInput::CodeOutOfRange { cell, value })
}
