//! Board module - the concurrent flip protocol
//!
//! The board owns a rows x cols grid of cells, the player registry, and the
//! per-player turn phases, all behind a single mutex. Flipping is the only
//! operation that can suspend: a player asking for a first card that another
//! player currently holds parks on that cell's waiter queue and retries when
//! the holder lets go. Critical sections never span an await; the wake
//! signal is received after the lock is dropped.
//!
//! Cleanup of a finished pair is deferred to the same player's next first
//! flip, so matched and mismatched cards stay visible to everyone until that
//! player moves again.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::oneshot;

use crate::core::cell::{Cell, Waiter};
use crate::core::error::BoardError;
use crate::core::registry::PlayerRegistry;
use crate::core::snapshot::BoardSnapshot;
use crate::types::{Coord, PlayerId};

/// Where a player stands in the two-card turn cycle. Absent from the turn
/// map means `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    /// Holding a first card, waiting to pick a second.
    Holding(Coord),
    /// A completed pair (or an abandoned first card) awaiting cleanup on
    /// this player's next first flip.
    Pending(Pending),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    /// Both cards matched and are still held; they are removed at cleanup.
    Matched(Coord, Coord),
    /// Both cards were released face-up; each flips back down at cleanup
    /// unless someone else has claimed it meanwhile.
    Mismatched(Coord, Coord),
    /// A first card released because the second pick failed; flips back
    /// down at cleanup under the same condition.
    Linger(Coord),
}

/// Outcome of one attempt to take a first card.
enum FirstAttempt {
    Taken,
    Empty,
    /// Another player holds the cell; the receiver fires when it is let go.
    Contended(oneshot::Receiver<()>),
}

/// The shared Memory Scramble board.
///
/// All state lives behind one mutex: the second-card step reads two cells
/// and the caller's phase together, so finer-grained locking would have to
/// reassemble exactly this critical section.
#[derive(Debug)]
pub struct Board {
    rows: usize,
    cols: usize,
    state: Mutex<BoardState>,
}

#[derive(Debug)]
struct BoardState {
    cols: usize,
    /// Row-major flat grid.
    grid: Vec<Cell>,
    players: PlayerRegistry,
    turns: HashMap<PlayerId, Phase>,
}

impl Board {
    /// Build a board from row-major picture tokens. Callers (the parser)
    /// have already validated dimensions and token shape.
    pub(crate) fn with_pictures(rows: usize, cols: usize, pictures: Vec<String>) -> Self {
        debug_assert!(rows > 0 && cols > 0);
        debug_assert_eq!(pictures.len(), rows * cols);
        Self {
            rows,
            cols,
            state: Mutex::new(BoardState {
                cols,
                grid: pictures.into_iter().map(Cell::new).collect(),
                players: PlayerRegistry::new(),
                turns: HashMap::new(),
            }),
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_cols(&self) -> usize {
        self.cols
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().expect("board mutex poisoned")
    }

    /// Validate raw coordinates against the grid.
    fn coord(&self, row: i32, col: i32) -> Result<Coord, BoardError> {
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.cols {
            return Err(BoardError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(Coord::new(row as usize, col as usize))
    }

    /// Picture token at the cell, or `None` once the card has been removed.
    pub fn picture_at(&self, row: i32, col: i32) -> Result<Option<String>, BoardError> {
        let at = self.coord(row, col)?;
        let state = self.lock();
        Ok(state.cell(at).picture.clone())
    }

    pub fn is_face_up(&self, row: i32, col: i32) -> Result<bool, BoardError> {
        let at = self.coord(row, col)?;
        let state = self.lock();
        Ok(state.cell(at).face_up)
    }

    pub fn controller_at(&self, row: i32, col: i32) -> Result<Option<String>, BoardError> {
        let at = self.coord(row, col)?;
        let state = self.lock();
        Ok(state.cell(at).controller.clone())
    }

    /// Add a player to the registry; a no-op for known players.
    pub fn register_player(
        &self,
        id: &str,
        display_name: Option<&str>,
    ) -> Result<(), BoardError> {
        self.lock().players.register(id, display_name)
    }

    /// Flip a card for `player`.
    ///
    /// The first card of a pair is taken if the cell is face-down or face-up
    /// but unheld; if another player holds it, this call suspends until the
    /// cell is let go and then retries against whatever state it finds. The
    /// second card never waits: a held, empty, or identical target fails the
    /// whole attempt and abandons the first card face-up for others.
    ///
    /// Before anything else, a previously finished pair is settled: a match
    /// removes both cards, a mismatch (or abandoned single) flips each card
    /// back down unless someone else claimed it in the meantime.
    pub async fn flip_up(&self, player: &str, row: i32, col: i32) -> Result<(), BoardError> {
        loop {
            let wake = {
                let mut state = self.lock();
                if !state.players.contains(player) {
                    return Err(BoardError::UnknownPlayer(player.to_string()));
                }
                let target = self.coord(row, col)?;
                match state.settle_pending(player) {
                    Phase::Holding(first) => return state.flip_second(player, first, target),
                    _ => match state.try_take_first(player, target) {
                        FirstAttempt::Taken => return Ok(()),
                        FirstAttempt::Empty => {
                            return Err(BoardError::EmptySpace {
                                row: target.row,
                                col: target.col,
                            })
                        }
                        FirstAttempt::Contended(rx) => rx,
                    },
                }
            };
            // Suspended on the cell's waiter queue. A send error only means
            // the waking side was dropped; re-evaluate either way.
            let _ = wake.await;
        }
    }

    /// Deterministic serialization of the picture grid; removed cards
    /// render as empty lines. On a freshly parsed board this reproduces the
    /// parser input exactly.
    pub fn dump_pictures(&self) -> String {
        let state = self.lock();
        let mut out = format!("{}x{}\n", self.rows, self.cols);
        for cell in &state.grid {
            out.push_str(cell.picture.as_deref().unwrap_or(""));
            out.push('\n');
        }
        out
    }

    /// Capture a consistent, viewer-specific copy of the grid.
    pub fn snapshot(&self, viewer: &str) -> BoardSnapshot {
        let state = self.lock();
        BoardSnapshot {
            rows: self.rows,
            cols: self.cols,
            cells: state.grid.iter().map(|cell| cell.view_for(viewer)).collect(),
        }
    }

    /// Server entry point: register `player` if new and render the board
    /// from their point of view.
    pub fn look(&self, player: &str) -> Result<String, BoardError> {
        self.register_player(player, None)?;
        Ok(self.snapshot(player).to_string())
    }

    /// Server entry point: register `player` if new, flip, and render the
    /// post-flip board. May suspend like [`Board::flip_up`].
    pub async fn flip(&self, player: &str, row: i32, col: i32) -> Result<String, BoardError> {
        self.register_player(player, None)?;
        self.flip_up(player, row, col).await?;
        Ok(self.snapshot(player).to_string())
    }
}

impl BoardState {
    fn idx(&self, at: Coord) -> usize {
        at.row * self.cols + at.col
    }

    fn cell(&self, at: Coord) -> &Cell {
        &self.grid[self.idx(at)]
    }

    /// Settle a finished pair before the player's next first flip, then
    /// report the (possibly reset) phase.
    fn settle_pending(&mut self, player: &str) -> Phase {
        let phase = self.turns.get(player).copied().unwrap_or(Phase::Idle);
        let Phase::Pending(outcome) = phase else {
            return phase;
        };
        match outcome {
            Pending::Matched(a, b) => {
                self.remove_card(a);
                self.remove_card(b);
            }
            Pending::Mismatched(a, b) => {
                self.turn_down_if_loose(a);
                self.turn_down_if_loose(b);
            }
            Pending::Linger(a) => self.turn_down_if_loose(a),
        }
        self.turns.remove(player);
        Phase::Idle
    }

    /// Try to take `target` as the player's first card.
    fn try_take_first(&mut self, player: &str, target: Coord) -> FirstAttempt {
        let idx = self.idx(target);
        let cell = &mut self.grid[idx];
        if cell.is_empty() {
            return FirstAttempt::Empty;
        }
        match cell.controller {
            None => {
                cell.face_up = true;
                cell.controller = Some(player.to_string());
                self.turns
                    .insert(player.to_string(), Phase::Holding(target));
                FirstAttempt::Taken
            }
            Some(_) => {
                let (tx, rx) = oneshot::channel();
                cell.waiters.push_back(Waiter {
                    player: player.to_string(),
                    wake: tx,
                });
                FirstAttempt::Contended(rx)
            }
        }
    }

    /// Resolve the player's second card against their held first card.
    fn flip_second(
        &mut self,
        player: &str,
        first: Coord,
        target: Coord,
    ) -> Result<(), BoardError> {
        if target == first {
            self.abandon_first(player, first);
            return Err(BoardError::SameCard {
                row: target.row,
                col: target.col,
            });
        }

        let idx = self.idx(target);
        if self.grid[idx].is_empty() {
            self.abandon_first(player, first);
            return Err(BoardError::EmptySpace {
                row: target.row,
                col: target.col,
            });
        }
        if self.grid[idx].controller.is_some() {
            // A held second card fails outright; only first cards wait.
            self.abandon_first(player, first);
            return Err(BoardError::Controlled {
                row: target.row,
                col: target.col,
            });
        }

        // Claim the second card, whether face-down or left face-up by a
        // previous pair.
        let cell = &mut self.grid[idx];
        cell.face_up = true;
        cell.controller = Some(player.to_string());

        if self.cell(first).picture == self.cell(target).picture {
            // Keep holding both; they are removed at this player's next
            // first flip.
            self.turns.insert(
                player.to_string(),
                Phase::Pending(Pending::Matched(first, target)),
            );
        } else {
            // Let both go face-up so other players can claim them.
            self.release_control(first);
            self.release_control(target);
            self.turns.insert(
                player.to_string(),
                Phase::Pending(Pending::Mismatched(first, target)),
            );
        }
        Ok(())
    }

    /// Give up a held first card after a failed second pick: control is
    /// released (waiters wake) but the card stays face-up until cleanup.
    fn abandon_first(&mut self, player: &str, first: Coord) {
        self.release_control(first);
        self.turns
            .insert(player.to_string(), Phase::Pending(Pending::Linger(first)));
    }

    fn release_control(&mut self, at: Coord) {
        let idx = self.idx(at);
        let cell = &mut self.grid[idx];
        cell.controller = None;
        cell.wake_all();
    }

    fn remove_card(&mut self, at: Coord) {
        let idx = self.idx(at);
        let cell = &mut self.grid[idx];
        cell.picture = None;
        cell.face_up = false;
        cell.controller = None;
        cell.wake_all();
    }

    /// Flip a card back down, but only if it is still face-up and nobody
    /// has claimed it since it was let go.
    fn turn_down_if_loose(&mut self, at: Coord) {
        let idx = self.idx(at);
        let cell = &mut self.grid[idx];
        if !cell.is_empty() && cell.face_up && cell.controller.is_none() {
            cell.face_up = false;
        }
    }
}
