//! Error types for artifact rendering.

/// Errors that can occur while rendering build artifacts.
///
/// A render error aborts only the request that caused it. The platform
/// descriptor is never affected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// An override key, template, or value could not be used.
    #[error("invalid override '{key}': {reason}")]
    InvalidOverride {
        /// The key as written by the caller.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A requested resource does not exist on the board.
    #[error("board '{board}' has no resource '{name}#{index}'")]
    UnknownResource {
        /// The board being rendered.
        board: String,
        /// Resource name.
        name: String,
        /// Resource index.
        index: u32,
    },

    /// The same resource was requested twice.
    #[error("resource '{name}#{index}' requested more than once")]
    DuplicateRequest {
        /// Resource name.
        name: String,
        /// Resource index.
        index: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_override() {
        let err = RenderError::InvalidOverride {
            key: "script_after_lunch".to_string(),
            reason: "unknown key".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "invalid override 'script_after_lunch': unknown key"
        );
    }

    #[test]
    fn display_unknown_resource() {
        let err = RenderError::UnknownResource {
            board: "picoevb".to_string(),
            name: "ddr3".to_string(),
            index: 0,
        };
        assert_eq!(format!("{err}"), "board 'picoevb' has no resource 'ddr3#0'");
    }
}
