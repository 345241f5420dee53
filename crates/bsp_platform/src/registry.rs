//! The board registry.

use std::collections::BTreeMap;

use crate::boards;
use crate::descriptor::PlatformDescriptor;
use crate::error::PlatformError;

/// Named, validated board descriptors.
///
/// The registry is an ordinary value: build it once at startup and pass it
/// to whatever needs to select a board.
#[derive(Debug, Clone, Default)]
pub struct BoardRegistry {
    boards: BTreeMap<String, PlatformDescriptor>,
}

impl BoardRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every shipped board.
    pub fn builtin() -> Result<Self, PlatformError> {
        let mut registry = Self::new();
        for board in boards::builtin()? {
            registry.register(board)?;
        }
        log::debug!("registered {} board(s)", registry.boards.len());
        Ok(registry)
    }

    /// Adds a board. Names must be unique.
    pub fn register(&mut self, board: PlatformDescriptor) -> Result<(), PlatformError> {
        if self.boards.contains_key(board.name()) {
            return Err(PlatformError::DuplicateBoard(board.name().to_string()));
        }
        self.boards.insert(board.name().to_string(), board);
        Ok(())
    }

    /// Looks up a board by name.
    pub fn get(&self, name: &str) -> Result<&PlatformDescriptor, PlatformError> {
        self.boards
            .get(name)
            .ok_or_else(|| PlatformError::UnknownBoard(name.to_string()))
    }

    /// Returns the board names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.boards.keys().map(String::as_str).collect()
    }

    /// Iterates over boards in name order.
    pub fn iter(&self) -> impl Iterator<Item = &PlatformDescriptor> {
        self.boards.values()
    }

    /// Returns the number of boards.
    pub fn len(&self) -> usize {
        self.boards.len()
    }

    /// Returns true if no board is registered.
    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}
