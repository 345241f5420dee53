//! Error types for resource and connector table construction.

/// Errors raised while building resource and connector tables.
///
/// Every variant is detected eagerly, when a table entry is constructed or
/// inserted, so an invalid board never reaches the renderer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    /// A resource with the same `(name, index)` already exists in the table.
    #[error("resource '{name}#{index}' is already defined")]
    DuplicateResource {
        /// The resource name.
        name: String,
        /// The resource index.
        index: u32,
    },

    /// A pad is already owned by another resource that does not share it.
    #[error("pad {pad} requested by '{claimant}' is already claimed by '{owner}'")]
    PadConflict {
        /// The physical pad identifier.
        pad: String,
        /// The resource that already owns the pad.
        owner: String,
        /// The resource that tried to claim it.
        claimant: String,
    },

    /// A connector's pad list is inconsistent with the board format.
    #[error("connector '{name}#{index}' is malformed: {reason}")]
    MalformedConnector {
        /// The connector name.
        name: String,
        /// The connector index.
        index: u32,
        /// What is wrong with it.
        reason: String,
    },

    /// A connector with the same `(name, index)` already exists.
    #[error("connector '{name}#{index}' is already defined")]
    DuplicateConnector {
        /// The connector name.
        name: String,
        /// The connector index.
        index: u32,
    },

    /// A pin group refers to a connector that does not exist.
    #[error("unknown connector '{name}#{index}'")]
    UnknownConnector {
        /// The connector name.
        name: String,
        /// The connector index.
        index: u32,
    },

    /// A connector position is not a number, out of range, or unconnected.
    #[error("connector '{name}#{index}' has no usable pad at position '{position}'")]
    ConnectorPosition {
        /// The connector name.
        name: String,
        /// The connector index.
        index: u32,
        /// The position as written in the pin list.
        position: String,
    },

    /// Two subsignals of one composite share a name.
    #[error("subsignal '{subsignal}' appears twice in '{parent}'")]
    DuplicateSubsignal {
        /// The composite holding the duplicate.
        parent: String,
        /// The repeated subsignal name.
        subsignal: String,
    },

    /// An attribute key was given twice.
    #[error("attribute '{0}' is given more than once")]
    DuplicateAttribute(String),

    /// A pin group is structurally invalid.
    #[error("invalid pins: {0}")]
    InvalidPins(String),
}

impl ResourceError {
    /// Returns true for the two ways a resource can collide with an existing
    /// one: a repeated `(name, index)` key or an already-claimed pad.
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            ResourceError::DuplicateResource { .. } | ResourceError::PadConflict { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_duplicate_resource() {
        let err = ResourceError::DuplicateResource {
            name: "clk100".to_string(),
            index: 0,
        };
        assert_eq!(format!("{err}"), "resource 'clk100#0' is already defined");
        assert!(err.is_duplicate());
    }

    #[test]
    fn display_pad_conflict() {
        let err = ResourceError::PadConflict {
            pad: "G3".to_string(),
            owner: "led#0".to_string(),
            claimant: "button#0".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "pad G3 requested by 'button#0' is already claimed by 'led#0'"
        );
        assert!(err.is_duplicate());
    }

    #[test]
    fn display_malformed_connector() {
        let err = ResourceError::MalformedConnector {
            name: "gpio".to_string(),
            index: 0,
            reason: "expected 4 pads, found 3".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "connector 'gpio#0' is malformed: expected 4 pads, found 3"
        );
        assert!(!err.is_duplicate());
    }
}
