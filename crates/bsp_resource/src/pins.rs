//! Physical pin groups: single-ended, active-low, and differential pads.

use bsp_common::Direction;
use serde::Serialize;

use crate::connector::ConnectorTable;
use crate::error::ResourceError;

/// Placeholder pad meaning "this bit is not connected to anything".
///
/// It occupies a bit position in a pin group but is never claimed, never
/// conflicts, and never receives a location constraint.
pub const NOT_CONNECTED: &str = "-";

/// The electrical flavour of a pin group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PinKind {
    /// Ordinary single-ended pins.
    Single,
    /// True/complement pad pairs.
    DifferentialPair,
    /// Single-ended pins whose logical value is inverted (active-low).
    Negative,
}

/// A reference to a connector by `(name, index)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ConnectorRef {
    /// The connector name, e.g. `gpio`.
    pub name: String,
    /// The connector index.
    pub index: u32,
}

/// An ordered group of pads carrying one logical signal of `width` bits.
///
/// Pads are written as a whitespace-separated list, e.g. `"G3 H3 G4 H4"`.
/// When the group is declared relative to a connector, the entries are
/// 1-based connector positions until [`Pins::resolve`] maps them to pads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pins {
    kind: PinKind,
    direction: Direction,
    pads: Vec<String>,
    complements: Vec<String>,
    connector: Option<ConnectorRef>,
    resolved: bool,
}

impl Pins {
    /// Creates a single-ended pin group.
    pub fn new(pads: &str, direction: Direction) -> Result<Self, ResourceError> {
        Self::build(PinKind::Single, pads, "", direction)
    }

    /// Creates an active-low pin group.
    pub fn inverted(pads: &str, direction: Direction) -> Result<Self, ResourceError> {
        Self::build(PinKind::Negative, pads, "", direction)
    }

    /// Creates a differential pin group from true (`p`) and complement (`n`)
    /// pad lists of equal length.
    pub fn diff_pairs(p: &str, n: &str, direction: Direction) -> Result<Self, ResourceError> {
        Self::build(PinKind::DifferentialPair, p, n, direction)
    }

    fn build(
        kind: PinKind,
        pads: &str,
        complements: &str,
        direction: Direction,
    ) -> Result<Self, ResourceError> {
        let pads = split_pads(pads);
        let complements = split_pads(complements);
        if pads.is_empty() {
            return Err(ResourceError::InvalidPins("empty pin list".to_string()));
        }
        if kind == PinKind::DifferentialPair && pads.len() != complements.len() {
            return Err(ResourceError::InvalidPins(format!(
                "differential pair has {} true pads but {} complement pads",
                pads.len(),
                complements.len()
            )));
        }
        Ok(Self {
            kind,
            direction,
            pads,
            complements,
            connector: None,
            resolved: true,
        })
    }

    /// Marks the pad list as 1-based positions on a connector.
    pub fn on_connector(mut self, name: impl Into<String>, index: u32) -> Self {
        self.connector = Some(ConnectorRef {
            name: name.into(),
            index,
        });
        self.resolved = false;
        self
    }

    /// Fails unless the group is exactly `width` bits wide.
    pub fn assert_width(self, width: usize) -> Result<Self, ResourceError> {
        if self.width() != width {
            return Err(ResourceError::InvalidPins(format!(
                "expected width {width}, found {} in '{}'",
                self.width(),
                self.pads.join(" ")
            )));
        }
        Ok(self)
    }

    /// Returns the electrical flavour.
    pub fn kind(&self) -> PinKind {
        self.kind
    }

    /// Returns the direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the true-side pads (or connector positions if unresolved).
    pub fn pads(&self) -> &[String] {
        &self.pads
    }

    /// Returns the complement pads; empty unless differential.
    pub fn complements(&self) -> &[String] {
        &self.complements
    }

    /// Returns the number of logical bits.
    pub fn width(&self) -> usize {
        self.pads.len()
    }

    /// Returns true for active-low groups.
    pub fn is_inverted(&self) -> bool {
        self.kind == PinKind::Negative
    }

    /// Returns the connector this group was declared against, if any.
    pub fn connector(&self) -> Option<&ConnectorRef> {
        self.connector.as_ref()
    }

    /// Returns false while connector positions still need mapping to pads.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Iterates over every physical pad, true and complement sides, skipping
    /// unconnected placeholders. Yields nothing for unresolved groups.
    pub fn physical_pads(&self) -> impl Iterator<Item = &str> {
        let pads: &[String] = if self.resolved { &self.pads } else { &[] };
        let complements: &[String] = if self.resolved { &self.complements } else { &[] };
        pads.iter()
            .chain(complements.iter())
            .map(String::as_str)
            .filter(|p| *p != NOT_CONNECTED)
    }

    /// Maps connector positions to physical pads.
    ///
    /// Groups not declared against a connector are returned unchanged. The
    /// connector reference is kept so later checks know the pads were reached
    /// through it.
    pub fn resolve(&self, connectors: &ConnectorTable) -> Result<Pins, ResourceError> {
        let conn = match (&self.connector, self.resolved) {
            (Some(conn), false) => conn,
            _ => return Ok(self.clone()),
        };
        let map = |positions: &[String]| -> Result<Vec<String>, ResourceError> {
            positions
                .iter()
                .map(|pos| {
                    if pos == NOT_CONNECTED {
                        Ok(pos.clone())
                    } else {
                        connectors.resolve(&conn.name, conn.index, pos)
                    }
                })
                .collect()
        };
        Ok(Pins {
            kind: self.kind,
            direction: self.direction,
            pads: map(&self.pads)?,
            complements: map(&self.complements)?,
            connector: self.connector.clone(),
            resolved: true,
        })
    }
}

fn split_pads(list: &str) -> Vec<String> {
    list.split_whitespace().map(str::to_string).collect()
}
