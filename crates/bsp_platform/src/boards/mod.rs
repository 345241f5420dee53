//! Board definitions compiled into the registry.

pub mod nitefury;
pub mod picoevb;

use crate::descriptor::PlatformDescriptor;
use crate::error::PlatformError;

/// Builds every shipped board, in registry order.
pub fn builtin() -> Result<Vec<PlatformDescriptor>, PlatformError> {
    let mut boards = nitefury::family()?.into_members();
    boards.push(picoevb::board()?);
    Ok(boards)
}
