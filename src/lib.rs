//! Memory Scramble - a concurrent multiplayer matching game.
//!
//! A grid of face-down picture cards is flipped by several players at once,
//! each hunting for matching pairs. The shared [`core::Board`] serializes
//! contested cells by blocking the latecomer instead of rejecting them; the
//! [`server`] module exposes the board over a line-based TCP protocol and
//! [`parse`] loads boards from their text format.

pub mod core;
pub mod parse;
pub mod server;
pub mod types;

pub use crate::core::{Board, BoardError, BoardSnapshot, CellView};
pub use crate::parse::{load_board, parse_board, ParseBoardError};
