//! Clock frequencies with unit parsing and display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A nominal clock frequency stored in Hertz.
///
/// Board clock inputs are declared with one of these (e.g. `100MHz` for an
/// oscillator). Parses strings like "100MHz", "90mhz", "200000KHz", "1GHz",
/// "48000Hz", and bare numeric values (interpreted as Hz). Displays using the
/// most appropriate unit.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frequency(f64);

impl Frequency {
    /// Creates a new frequency from a value in Hertz.
    pub fn new(hz: f64) -> Self {
        Self(hz)
    }

    /// Creates a new frequency from a value in megahertz.
    pub fn from_mhz(mhz: f64) -> Self {
        Self(mhz * 1_000_000.0)
    }

    /// Returns the frequency in Hertz.
    pub fn hz(&self) -> f64 {
        self.0
    }

    /// Returns the frequency in megahertz.
    pub fn mhz(&self) -> f64 {
        self.0 / 1_000_000.0
    }

    /// Returns the clock period in nanoseconds, or `None` for a non-positive
    /// frequency.
    pub fn period_ns(&self) -> Option<f64> {
        if self.0 > 0.0 {
            Some(1_000_000_000.0 / self.0)
        } else {
            None
        }
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({self})")
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0;
        if hz >= 1_000_000_000.0 {
            write!(f, "{}GHz", hz / 1_000_000_000.0)
        } else if hz >= 1_000_000.0 {
            write!(f, "{}MHz", hz / 1_000_000.0)
        } else if hz >= 1_000.0 {
            write!(f, "{}KHz", hz / 1_000.0)
        } else {
            write!(f, "{hz}Hz")
        }
    }
}

/// Error type for parsing frequency strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFrequencyError {
    /// The input string that failed to parse.
    pub input: String,
}

impl fmt::Display for ParseFrequencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid frequency: '{}'", self.input)
    }
}

impl std::error::Error for ParseFrequencyError {}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseFrequencyError {
            input: s.to_string(),
        };

        let lower = s.to_ascii_lowercase();
        for (suffix, scale) in [
            ("ghz", 1_000_000_000.0),
            ("mhz", 1_000_000.0),
            ("khz", 1_000.0),
            ("hz", 1.0),
        ] {
            if let Some(num) = lower.strip_suffix(suffix) {
                let val: f64 = num.trim().parse().map_err(|_| err())?;
                return Ok(Frequency(val * scale));
            }
        }

        // Bare number, interpreted as Hz
        let val: f64 = s.parse().map_err(|_| err())?;
        Ok(Frequency(val))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mhz() {
        let f: Frequency = "100MHz".parse().unwrap();
        assert_eq!(f.hz(), 100_000_000.0);
    }

    #[test]
    fn parse_khz() {
        let f: Frequency = "200000KHz".parse().unwrap();
        assert_eq!(f.mhz(), 200.0);
    }

    #[test]
    fn parse_bare_number() {
        let f: Frequency = "90000000".parse().unwrap();
        assert_eq!(f.mhz(), 90.0);
    }

    #[test]
    fn parse_case_insensitive() {
        let f: Frequency = "90mhz".parse().unwrap();
        assert_eq!(f, Frequency::from_mhz(90.0));
    }

    #[test]
    fn parse_invalid() {
        assert!("fast".parse::<Frequency>().is_err());
        assert!("MHz".parse::<Frequency>().is_err());
    }

    #[test]
    fn period_of_board_clocks() {
        assert_eq!(Frequency::from_mhz(100.0).period_ns(), Some(10.0));
        assert_eq!(Frequency::from_mhz(200.0).period_ns(), Some(5.0));
        assert_eq!(Frequency::new(0.0).period_ns(), None);
    }

    #[test]
    fn display_selects_best_unit() {
        assert_eq!(format!("{}", Frequency::from_mhz(100.0)), "100MHz");
        assert_eq!(format!("{}", Frequency::new(1_000_000_000.0)), "1GHz");
        assert_eq!(format!("{}", Frequency::new(32_768.0)), "32.768KHz");
        assert_eq!(format!("{}", Frequency::new(500.0)), "500Hz");
    }
}
