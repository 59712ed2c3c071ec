//! Player registry - maps player ids to display names
//!
//! Flips carry only an id, so the registry is the one place that knows who
//! is playing. Registration is idempotent: re-registering keeps the name
//! chosen first.

use std::collections::HashMap;

use crate::core::error::BoardError;
use crate::types::{valid_player_id, PlayerId};

#[derive(Debug, Default)]
pub struct PlayerRegistry {
    names: HashMap<PlayerId, String>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player. The id must be non-empty with no whitespace; the
    /// display name defaults to the id. A no-op for known players.
    pub fn register(&mut self, id: &str, display_name: Option<&str>) -> Result<(), BoardError> {
        if !valid_player_id(id) {
            return Err(BoardError::InvalidPlayerId(id.to_string()));
        }
        self.names
            .entry(id.to_string())
            .or_insert_with(|| display_name.unwrap_or(id).to_string());
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.names.contains_key(id)
    }

    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
