//! Shared foundational types used across the board-support workspace.
//!
//! This crate provides the small value types every other crate speaks:
//! clock frequencies, signal directions, and content hashes used for build
//! fingerprints.

#![warn(missing_docs)]

pub mod direction;
pub mod frequency;
pub mod hash;

pub use direction::{Direction, ParseDirectionError};
pub use frequency::{Frequency, ParseFrequencyError};
pub use hash::ContentHash;
