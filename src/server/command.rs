//! Request parsing for the line protocol.
//!
//! One request per line, whitespace-separated:
//! `look <player>` | `flip <player> <row> <col>` | `quit`.
//! Coordinates parse as signed integers so that out-of-range values reach
//! the board and come back as its out-of-bounds error instead of dying in
//! the parser.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Look { player: String },
    Flip { player: String, row: i32, col: i32 },
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid coordinate: {0:?}")]
    BadCoordinate(String),
}

pub fn parse_request(line: &str) -> Result<Request, RequestError> {
    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default();
    match command {
        "look" => {
            let player = words.next().ok_or(RequestError::Usage("look <player>"))?;
            if words.next().is_some() {
                return Err(RequestError::Usage("look <player>"));
            }
            Ok(Request::Look {
                player: player.to_string(),
            })
        }
        "flip" => {
            const USAGE: &str = "flip <player> <row> <col>";
            let player = words.next().ok_or(RequestError::Usage(USAGE))?;
            let row = words.next().ok_or(RequestError::Usage(USAGE))?;
            let col = words.next().ok_or(RequestError::Usage(USAGE))?;
            if words.next().is_some() {
                return Err(RequestError::Usage(USAGE));
            }
            Ok(Request::Flip {
                player: player.to_string(),
                row: parse_coordinate(row)?,
                col: parse_coordinate(col)?,
            })
        }
        "quit" => {
            if words.next().is_some() {
                return Err(RequestError::Usage("quit"));
            }
            Ok(Request::Quit)
        }
        other => Err(RequestError::UnknownCommand(other.to_string())),
    }
}

fn parse_coordinate(word: &str) -> Result<i32, RequestError> {
    word.parse()
        .map_err(|_| RequestError::BadCoordinate(word.to_string()))
}
