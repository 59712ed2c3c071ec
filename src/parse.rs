//! Board file parsing.
//!
//! A board file is a `<rows>x<cols>` header followed by `rows * cols` card
//! tokens, one per line, row-major, with a required trailing newline.
//! Tokens are opaque: two cells match when their tokens are equal.

use std::path::Path;

use thiserror::Error;

use crate::core::Board;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseBoardError {
    #[error("malformed board: missing trailing newline")]
    MissingNewline,

    /// The first line is not `<rows>x<cols>` with both dimensions positive.
    #[error("malformed board header: {0:?}")]
    Header(String),

    /// A card token is blank or contains whitespace. `line` is 1-based.
    #[error("malformed board: bad card token on line {line}")]
    Card { line: usize },

    #[error("malformed board: expected {expected} cards, found {found}")]
    CardCount { expected: usize, found: usize },
}

/// Parse a board description into a fresh [`Board`]: all cells face-down,
/// uncontrolled, nobody registered.
pub fn parse_board(text: &str) -> Result<Board, ParseBoardError> {
    let body = text
        .strip_suffix('\n')
        .ok_or(ParseBoardError::MissingNewline)?;
    let mut lines = body.split('\n');

    let header = lines.next().unwrap_or_default();
    let (rows, cols) = parse_header(header)?;

    let mut pictures = Vec::with_capacity(rows * cols);
    for (i, token) in lines.enumerate() {
        if token.is_empty() || token.chars().any(char::is_whitespace) {
            // Header is line 1, first token line 2.
            return Err(ParseBoardError::Card { line: i + 2 });
        }
        pictures.push(token.to_string());
    }
    if pictures.len() != rows * cols {
        return Err(ParseBoardError::CardCount {
            expected: rows * cols,
            found: pictures.len(),
        });
    }

    Ok(Board::with_pictures(rows, cols, pictures))
}

fn parse_header(header: &str) -> Result<(usize, usize), ParseBoardError> {
    let bad = || ParseBoardError::Header(header.to_string());
    let (rows, cols) = header.split_once('x').ok_or_else(bad)?;
    let rows: usize = rows.parse().map_err(|_| bad())?;
    let cols: usize = cols.parse().map_err(|_| bad())?;
    if rows == 0 || cols == 0 {
        return Err(bad());
    }
    Ok((rows, cols))
}

/// Read and parse a board file from disk.
pub fn load_board(path: impl AsRef<Path>) -> anyhow::Result<Board> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read board file {}: {}", path.display(), e))?;
    Ok(parse_board(&text)?)
}
