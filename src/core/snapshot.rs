//! Player-specific board snapshots and their textual rendering.
//!
//! A snapshot is captured in one critical section so every cell comes from
//! the same instant; rendering happens outside the lock.

use std::fmt;

/// How one cell appears to a particular viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellView {
    /// Card removed after a match.
    Empty,
    /// Face-down card.
    Down,
    /// Face-up card controlled by the viewer.
    Mine(String),
    /// Face-up card, uncontrolled or controlled by another player.
    Up(String),
}

/// A consistent, viewer-specific copy of the whole grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub rows: usize,
    pub cols: usize,
    /// Row-major, `rows * cols` entries.
    pub cells: Vec<CellView>,
}

impl fmt::Display for BoardSnapshot {
    /// The `look`/`flip` wire format: a `<rows>x<cols>` header, then one
    /// line per cell (`none`, `down`, `my <picture>`, `up <picture>`),
    /// trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}x{}", self.rows, self.cols)?;
        for cell in &self.cells {
            match cell {
                CellView::Empty => writeln!(f, "none")?,
                CellView::Down => writeln!(f, "down")?,
                CellView::Mine(picture) => writeln!(f, "my {}", picture)?,
                CellView::Up(picture) => writeln!(f, "up {}", picture)?,
            }
        }
        Ok(())
    }
}
