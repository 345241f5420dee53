//! PicoEVB: an M.2 Artix-7 evaluation board.

use bsp_common::{Direction, Frequency};
use bsp_resource::{Attrs, Connector, Pins, Resource, ResourceError};

use crate::descriptor::PlatformDescriptor;
use crate::error::PlatformError;
use crate::families::{led_resources, spi_flash_resources, SpiFlashPads};
use crate::silicon::VariantOverride;
use crate::toolchain::{ConfigClock, FlashImage, ToolchainSettings};
use crate::variant::BaseDescriptor;

/// The board layout.
pub fn base() -> Result<BaseDescriptor, ResourceError> {
    let lvcmos33 = Attrs::from_pairs([("IOSTANDARD", "LVCMOS33")])?;
    let toolchain = ToolchainSettings {
        reset_false_path: false,
        overtemp_power_down: true,
        config_clock: ConfigClock::ConfigRate(55),
        spi_bus_width: 4,
        spi_fall_edge: true,
        compress: true,
        config_voltage: "3.3".to_string(),
        cfgbvs: "VCCO".to_string(),
        flash: FlashImage::mcs_16mb(),
    };
    let flash = SpiFlashPads {
        cs_n: "L15",
        clk: "-",
        copi: "K16",
        cipo: "L17",
        wp_n: "J15",
        hold_n: "J16",
    };

    Ok(BaseDescriptor::new(toolchain)
        .default_clock("clk100")
        .default_reset("rst")
        .connector_width(4)
        .resource(
            Resource::new("clk100", 0, Pins::new("B6", Direction::In)?)
                .with_clock(Frequency::from_mhz(100.0)),
        )
        .resource(
            Resource::new("rst", 0, Pins::inverted("A10", Direction::In)?).with_attrs(
                Attrs::from_pairs([("IOSTANDARD", "LVCMOS33"), ("PULLDOWN", "true")])?,
            ),
        )
        .resources(led_resources(
            "V12 V13 V14",
            &Attrs::from_pairs([("IOSTANDARD", "LVCMOS33"), ("PULLUP", "true"), ("DRIVE", "8")])?,
        )?)
        .resources(spi_flash_resources(0, &flash, &lvcmos33)?)
        .connector(Connector::new("gpio", 0, "A12 B12 A13 A14")))
}

/// Builds the board.
pub fn board() -> Result<PlatformDescriptor, PlatformError> {
    base()?.instantiate(&VariantOverride::new("picoevb", "xc7a50t", "csg325", "2"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_builds() {
        let board = board().unwrap();
        assert_eq!(board.name(), "picoevb");
        assert_eq!(board.part(), "xc7a50tcsg325-2");
        assert_eq!(board.default_clock().unwrap().expanded_pads(), vec!["B6"]);
        assert_eq!(
            board.default_reset().unwrap().attrs().get("PULLDOWN"),
            Some("true")
        );
        assert!(!board.toolchain().reset_false_path);
        assert_eq!(board.toolchain().config_clock, ConfigClock::ConfigRate(55));
    }

    #[test]
    fn three_leds() {
        let board = board().unwrap();
        assert!(board.resource("led", 2).is_some());
        assert!(board.resource("led", 3).is_none());
    }

    #[test]
    fn missing_default_clock_is_invalid() {
        let base = base().unwrap().default_clock("clk200");
        let err = base
            .instantiate(&VariantOverride::new("picoevb", "xc7a50t", "csg325", "2"))
            .unwrap_err();
        assert!(matches!(err, PlatformError::DefaultNotFound { .. }));
    }
}
