//! Core module - the board, its cells, and the flip protocol
//!
//! This module contains all the game rules and shared-state management.
//! It has no dependencies on networking or I/O; the only async surface is
//! the suspension of a contended flip.

pub mod board;
pub mod cell;
pub mod error;
pub mod registry;
pub mod snapshot;

// Re-export commonly used types
pub use board::Board;
pub use error::BoardError;
pub use registry::PlayerRegistry;
pub use snapshot::{BoardSnapshot, CellView};
