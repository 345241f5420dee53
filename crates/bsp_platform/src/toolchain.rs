//! Board-level settings for the vendor configuration flow.
//!
//! These are plain data. The renderer turns them into constraint and
//! packaging text, so two boards with equal settings render identical
//! default constraints.

use serde::Serialize;
use std::fmt;

/// How the configuration clock is sourced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigClock {
    /// The external master clock, undivided.
    ExternalMasterDiv1,
    /// The internal oscillator at the given nominal rate in MHz.
    ConfigRate(u32),
}

/// Output format of the flash image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashFormat {
    /// Intel MCS hex.
    Mcs,
    /// Raw binary.
    Bin,
}

impl fmt::Display for FlashFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashFormat::Mcs => write!(f, "mcs"),
            FlashFormat::Bin => write!(f, "bin"),
        }
    }
}

/// Whether the bitstream is loaded upward or downward from the offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadDirection {
    /// Ascending addresses.
    Up,
    /// Descending addresses.
    Down,
}

impl fmt::Display for LoadDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadDirection::Up => write!(f, "up"),
            LoadDirection::Down => write!(f, "down"),
        }
    }
}

/// The configuration flash the bitstream is packaged for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlashImage {
    /// Image format.
    pub format: FlashFormat,
    /// Flash capacity in megabytes.
    pub size_mb: u32,
    /// Load direction.
    pub load_direction: LoadDirection,
    /// Start address of the bitstream.
    pub offset: u32,
}

impl FlashImage {
    /// A 16 MB MCS image loaded upward from address zero.
    pub fn mcs_16mb() -> Self {
        Self {
            format: FlashFormat::Mcs,
            size_mb: 16,
            load_direction: LoadDirection::Up,
            offset: 0,
        }
    }
}

/// Configuration settings a board contributes to every build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainSettings {
    /// Exclude the default reset input from timing analysis.
    pub reset_false_path: bool,
    /// Power down when the die overheats.
    pub overtemp_power_down: bool,
    /// Configuration clock source.
    pub config_clock: ConfigClock,
    /// Width of the SPI configuration bus (1, 2 or 4).
    pub spi_bus_width: u8,
    /// Sample SPI data on the falling edge.
    pub spi_fall_edge: bool,
    /// Compress the bitstream.
    pub compress: bool,
    /// Bank 0 configuration voltage, e.g. `3.3`.
    pub config_voltage: String,
    /// Configuration bank voltage select, e.g. `VCCO`.
    pub cfgbvs: String,
    /// Flash image packaging.
    pub flash: FlashImage,
}

impl ToolchainSettings {
    /// The configuration mode and flash interface name, e.g. `SPIx4`.
    pub fn config_mode(&self) -> String {
        format!("SPIx{}", self.spi_bus_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(width: u8) -> ToolchainSettings {
        ToolchainSettings {
            reset_false_path: false,
            overtemp_power_down: true,
            config_clock: ConfigClock::ConfigRate(55),
            spi_bus_width: width,
            spi_fall_edge: true,
            compress: true,
            config_voltage: "3.3".to_string(),
            cfgbvs: "VCCO".to_string(),
            flash: FlashImage::mcs_16mb(),
        }
    }

    #[test]
    fn config_mode_follows_bus_width() {
        assert_eq!(settings(4).config_mode(), "SPIx4");
        assert_eq!(settings(1).config_mode(), "SPIx1");
    }

    #[test]
    fn flash_defaults() {
        let flash = FlashImage::mcs_16mb();
        assert_eq!(flash.format.to_string(), "mcs");
        assert_eq!(flash.load_direction.to_string(), "up");
        assert_eq!(flash.size_mb, 16);
        assert_eq!(flash.offset, 0);
    }

    #[test]
    fn serializes_config_clock() {
        let json = serde_json::to_string(&ConfigClock::ConfigRate(55)).unwrap();
        assert_eq!(json, r#"{"config_rate":55}"#);
        let json = serde_json::to_string(&ConfigClock::ExternalMasterDiv1).unwrap();
        assert_eq!(json, r#""external_master_div1""#);
    }
}
