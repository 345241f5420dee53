//! Typed catalogs of the physical pins and connectors on a board.
//!
//! A board is described by a [`ResourceTable`] of named, indexed resources
//! (single pins, differential pairs, active-low pins, and composites built
//! from subsignals) plus a [`ConnectorTable`] of raw pad lists exposed for
//! external wiring. Both tables validate on insertion: duplicate
//! `(name, index)` keys, pads claimed twice, and connectors of the wrong
//! width are rejected before anything else sees them.

#![warn(missing_docs)]

pub mod attrs;
pub mod connector;
pub mod error;
pub mod pins;
pub mod resource;
pub mod table;

pub use attrs::Attrs;
pub use connector::{Connector, ConnectorTable};
pub use error::ResourceError;
pub use pins::{ConnectorRef, PinKind, Pins, NOT_CONNECTED};
pub use resource::{Leaf, Resource, SignalBody, Subsignal};
pub use table::ResourceTable;
