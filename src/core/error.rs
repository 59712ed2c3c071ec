//! Board operation errors.
//!
//! Every error carries enough context to render a human-readable message;
//! the server forwards these messages verbatim to clients.

use thiserror::Error;

/// Failure of a board query or flip operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Coordinates outside the grid. Never mutates state.
    #[error("out of bounds: ({row},{col}) is not on this {rows}x{cols} board")]
    OutOfBounds {
        row: i32,
        col: i32,
        rows: usize,
        cols: usize,
    },

    /// The target cell's card has been removed. As a FIRST this leaves the
    /// caller idle; as a SECOND the FIRST card is relinquished.
    #[error("empty space at ({row},{col})")]
    EmptySpace { row: usize, col: usize },

    /// SECOND-card target is held by another player. The FIRST card is
    /// relinquished; there is no waiting on a contended SECOND.
    #[error("card at ({row},{col}) is controlled by another player")]
    Controlled { row: usize, col: usize },

    /// SECOND-card target equals the FIRST card.
    #[error("cannot choose same card at ({row},{col}) twice")]
    SameCard { row: usize, col: usize },

    #[error("unknown player: {0}")]
    UnknownPlayer(String),

    /// Player ids must be non-empty and whitespace-free.
    #[error("invalid player id: {0:?}")]
    InvalidPlayerId(String),
}
