//! Connectors: raw pad lists exposed for header and expansion wiring.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::ResourceError;
use crate::pins::NOT_CONNECTED;

/// A named group of raw pads addressed by 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connector {
    name: String,
    index: u32,
    pads: Vec<String>,
    shared: BTreeSet<String>,
}

impl Connector {
    /// Creates a connector from a whitespace-separated pad list. Position 1 is
    /// the first pad. `-` marks an unconnected position.
    pub fn new(name: impl Into<String>, index: u32, pads: &str) -> Self {
        Self {
            name: name.into(),
            index,
            pads: pads.split_whitespace().map(str::to_string).collect(),
            shared: BTreeSet::new(),
        }
    }

    /// Declares pads this connector deliberately shares with board
    /// resources (multiplexed pins).
    pub fn with_shared_pads(mut self, pads: &str) -> Self {
        self.shared
            .extend(pads.split_whitespace().map(str::to_string));
        self
    }

    /// Returns the connector name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the connector index.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns the pads in position order.
    pub fn pads(&self) -> &[String] {
        &self.pads
    }

    /// Returns the number of positions.
    pub fn width(&self) -> usize {
        self.pads.len()
    }

    /// Returns the pad at a 1-based position.
    pub fn pad(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|i| self.pads.get(i))
            .map(String::as_str)
    }

    /// Returns true if `pad` is declared as shared with resources.
    pub fn shares(&self, pad: &str) -> bool {
        self.shared.contains(pad)
    }

    fn malformed(&self, reason: String) -> ResourceError {
        ResourceError::MalformedConnector {
            name: self.name.clone(),
            index: self.index,
            reason,
        }
    }
}

/// The ordered set of connectors on a board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectorTable {
    connectors: Vec<Connector>,
    #[serde(skip)]
    by_key: BTreeMap<(String, u32), usize>,
    fixed_width: Option<usize>,
}

impl ConnectorTable {
    /// Creates an empty table that accepts connectors of any width.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table whose connectors must all have `width` pads.
    pub fn with_fixed_width(width: usize) -> Self {
        Self {
            fixed_width: Some(width),
            ..Self::default()
        }
    }

    /// Returns the mandated connector width, if any.
    pub fn fixed_width(&self) -> Option<usize> {
        self.fixed_width
    }

    /// Registers a connector.
    ///
    /// Fails with [`ResourceError::MalformedConnector`] on a width mismatch or
    /// a repeated pad, and [`ResourceError::DuplicateConnector`] on a repeated
    /// `(name, index)`.
    pub fn add(&mut self, connector: Connector) -> Result<(), ResourceError> {
        let key = (connector.name.clone(), connector.index);
        if self.by_key.contains_key(&key) {
            return Err(ResourceError::DuplicateConnector {
                name: connector.name,
                index: connector.index,
            });
        }
        if connector.pads.is_empty() {
            return Err(connector.malformed("no pads".to_string()));
        }
        if let Some(expected) = self.fixed_width {
            if connector.width() != expected {
                return Err(connector.malformed(format!(
                    "expected {expected} pads, found {}",
                    connector.width()
                )));
            }
        }
        let mut seen = BTreeSet::new();
        for pad in connector.pads.iter().filter(|p| *p != NOT_CONNECTED) {
            if !seen.insert(pad.as_str()) {
                return Err(connector.malformed(format!("pad {pad} listed twice")));
            }
        }
        log::debug!(
            "connector {}#{}: {}",
            connector.name,
            connector.index,
            connector.pads.join(" ")
        );
        self.by_key.insert(key, self.connectors.len());
        self.connectors.push(connector);
        Ok(())
    }

    /// Returns the connector with the given name and index.
    pub fn lookup(&self, name: &str, index: u32) -> Option<&Connector> {
        self.by_key
            .get(&(name.to_string(), index))
            .map(|&i| &self.connectors[i])
    }

    /// Returns the ordered pad list of a connector.
    pub fn expand(&self, name: &str, index: u32) -> Option<&[String]> {
        self.lookup(name, index).map(Connector::pads)
    }

    /// Maps a 1-based position (as written in a pin list) to its pad.
    pub fn resolve(&self, name: &str, index: u32, position: &str) -> Result<String, ResourceError> {
        let connector = self
            .lookup(name, index)
            .ok_or_else(|| ResourceError::UnknownConnector {
                name: name.to_string(),
                index,
            })?;
        position
            .parse::<usize>()
            .ok()
            .and_then(|pos| connector.pad(pos))
            .filter(|pad| *pad != NOT_CONNECTED)
            .map(str::to_string)
            .ok_or_else(|| ResourceError::ConnectorPosition {
                name: name.to_string(),
                index,
                position: position.to_string(),
            })
    }

    /// Iterates over connectors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Connector> {
        self.connectors.iter()
    }

    /// Returns the number of connectors.
    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    /// Returns true if the table has no connectors.
    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }
}
