//! Cell module - state of one grid square
//!
//! A cell is pure data plus its waiter queue. It is only ever mutated while
//! the board mutex is held; waking waiters is the board's job and happens on
//! exactly two transitions: controller release and card removal.

use std::collections::VecDeque;

use tokio::sync::oneshot;

use crate::core::snapshot::CellView;
use crate::types::PlayerId;

/// A flip request suspended on this cell until its holder lets go.
#[derive(Debug)]
pub(crate) struct Waiter {
    /// Recorded for queue inspection; the wake itself is player-agnostic.
    #[allow(dead_code)]
    pub player: PlayerId,
    pub wake: oneshot::Sender<()>,
}

/// One grid square holding at most one card.
#[derive(Debug)]
pub struct Cell {
    /// `None` once the card has been removed after a match.
    pub(crate) picture: Option<String>,
    /// Meaningless (and kept false) when the cell is empty.
    pub(crate) face_up: bool,
    pub(crate) controller: Option<PlayerId>,
    pub(crate) waiters: VecDeque<Waiter>,
}

impl Cell {
    /// Create a face-down, uncontrolled cell with the given picture.
    pub(crate) fn new(picture: String) -> Self {
        Self {
            picture: Some(picture),
            face_up: false,
            controller: None,
            waiters: VecDeque::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.picture.is_none()
    }

    pub(crate) fn is_controlled_by(&self, player: &str) -> bool {
        self.controller.as_deref() == Some(player)
    }

    /// Drain the waiter queue, signalling every suspended request.
    /// A dropped receiver (abandoned caller) makes the send a no-op.
    pub(crate) fn wake_all(&mut self) {
        for waiter in self.waiters.drain(..) {
            let _ = waiter.wake.send(());
        }
    }

    /// How this cell appears to `viewer` in a rendered snapshot.
    pub(crate) fn view_for(&self, viewer: &str) -> CellView {
        match &self.picture {
            None => CellView::Empty,
            Some(_) if !self.face_up => CellView::Down,
            Some(picture) if self.is_controlled_by(viewer) => {
                CellView::Mine(picture.clone())
            }
            Some(picture) => CellView::Up(picture.clone()),
        }
    }
}
