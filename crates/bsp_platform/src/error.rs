//! Error types for platform construction and board lookup.

use bsp_common::Direction;
use bsp_resource::ResourceError;
use std::fmt;

/// Which default signal a descriptor refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultRole {
    /// The default clock.
    Clock,
    /// The default reset.
    Reset,
}

impl fmt::Display for DefaultRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultRole::Clock => write!(f, "clock"),
            DefaultRole::Reset => write!(f, "reset"),
        }
    }
}

/// Errors that can occur when building a platform descriptor or looking one
/// up in the registry.
///
/// All variants except [`PlatformError::UnknownBoard`] mean the board
/// definition itself is invalid; they are raised at startup, before any
/// build is attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// A resource or connector table rejected an entry.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// The default clock or reset names a resource that does not exist.
    #[error("board '{board}': default {role} '{name}' does not name a resource")]
    DefaultNotFound {
        /// The board being built.
        board: String,
        /// Clock or reset.
        role: DefaultRole,
        /// The dangling resource name.
        name: String,
    },

    /// The default clock or reset is not an input.
    #[error("board '{board}': default {role} '{name}' must be an input, found {direction}")]
    DefaultNotInput {
        /// The board being built.
        board: String,
        /// Clock or reset.
        role: DefaultRole,
        /// The resource name.
        name: String,
        /// The offending direction.
        direction: Direction,
    },

    /// The default clock has no nominal frequency.
    #[error("board '{board}': default clock '{name}' has no frequency")]
    ClockWithoutFrequency {
        /// The board being built.
        board: String,
        /// The resource name.
        name: String,
    },

    /// A connector pad is also claimed by a resource without declaring the
    /// sharing.
    #[error(
        "board '{board}': pad {pad} of connector '{connector}' is claimed by '{resource}' without being declared shared"
    )]
    ConnectorAlias {
        /// The board being built.
        board: String,
        /// The aliased pad.
        pad: String,
        /// The connector, as `name#index`.
        connector: String,
        /// The resource, as `name#index`.
        resource: String,
    },

    /// A silicon identity field is empty.
    #[error("board '{board}': {field} must not be empty")]
    MissingSilicon {
        /// The board being built.
        board: String,
        /// The missing field.
        field: &'static str,
    },

    /// Variants built from one base disagree, or repeat a name.
    #[error("variant '{variant}' is inconsistent with its family: {reason}")]
    InconsistentVariant {
        /// The offending variant.
        variant: String,
        /// What differs.
        reason: String,
    },

    /// Two boards were registered under one name.
    #[error("board '{0}' is already registered")]
    DuplicateBoard(String),

    /// No board with this name is registered.
    #[error("unknown board '{0}'")]
    UnknownBoard(String),
}

impl PlatformError {
    /// Returns true if this error means the board definition is invalid,
    /// as opposed to a failed lookup.
    pub fn is_invalid_platform(&self) -> bool {
        !matches!(self, PlatformError::UnknownBoard(_))
    }
}
