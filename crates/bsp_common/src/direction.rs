//! Signal directions as seen from the FPGA fabric.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The direction of a pin group relative to the FPGA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Driven from outside, sampled by the FPGA.
    In,
    /// Driven by the FPGA.
    Out,
    /// Bidirectional.
    InOut,
}

impl Direction {
    /// Returns the short form used in board tables (`i`, `o`, `io`).
    pub fn short(self) -> &'static str {
        match self {
            Direction::In => "i",
            Direction::Out => "o",
            Direction::InOut => "io",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
            Direction::InOut => write!(f, "inout"),
        }
    }
}

/// Error type for parsing direction strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError {
    /// The input string that failed to parse.
    pub input: String,
}

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid direction: '{}' (expected i, o or io)",
            self.input
        )
    }
}

impl std::error::Error for ParseDirectionError {}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "i" | "in" => Ok(Direction::In),
            "o" | "out" => Ok(Direction::Out),
            "io" | "inout" => Ok(Direction::InOut),
            _ => Err(ParseDirectionError {
                input: s.to_string(),
            }),
        }
    }
}
