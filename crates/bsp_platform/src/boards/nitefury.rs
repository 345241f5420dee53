//! NiteFury and LiteFury: M.2 Artix-7 accelerators with DDR3.
//!
//! Both boards share one layout and differ only in the FPGA fitted.

use bsp_common::{Direction, Frequency};
use bsp_resource::{Attrs, Connector, Pins, Resource, ResourceError, Subsignal};

use crate::error::PlatformError;
use crate::families::{led_resources, spi_flash_resources, SpiFlashPads};
use crate::silicon::VariantOverride;
use crate::toolchain::{ConfigClock, FlashImage, ToolchainSettings};
use crate::variant::{BaseDescriptor, VariantFamily};

fn attrs<const N: usize>(pairs: [(&str, &str); N]) -> Result<Attrs, ResourceError> {
    Attrs::from_pairs(pairs)
}

fn ddr3() -> Result<Resource, ResourceError> {
    let out = Direction::Out;
    let io = Direction::InOut;
    let subsignals = vec![
        Subsignal::new("rst", Pins::inverted("K16", out)?)
            .with_attrs(attrs([("IOSTANDARD", "LVCMOS15")])?),
        Subsignal::new("clk", Pins::diff_pairs("K17", "J17", out)?)
            .with_attrs(attrs([("IOSTANDARD", "DIFF_SSTL15")])?),
        Subsignal::new("clk_en", Pins::new("H22", out)?),
        Subsignal::new("we", Pins::inverted("L16", out)?),
        Subsignal::new("ras", Pins::inverted("H20", out)?),
        Subsignal::new("cas", Pins::inverted("K18", out)?),
        Subsignal::new(
            "a",
            Pins::new(
                "M15 L21 M16 L18 K21 M18 M21 N20 M20 N19 J21 M22 K22 N18 N22 J22",
                out,
            )?
            .assert_width(16)?,
        ),
        Subsignal::new("ba", Pins::new("L19 J20 L20", out)?.assert_width(3)?),
        Subsignal::new("dqs", Pins::diff_pairs("F18 B21", "E18 A21", io)?)
            .with_attrs(attrs([("IOSTANDARD", "DIFF_SSTL15")])?),
        Subsignal::new(
            "dq",
            Pins::new(
                "D19 B20 E19 A20 F19 C19 F20 C18 E22 G21 D20 E21 C22 D21 B22 D22",
                io,
            )?
            .assert_width(16)?,
        ),
        Subsignal::new("dm", Pins::new("A19 G22", out)?),
        Subsignal::new("odt", Pins::new("K19", out)?),
    ];
    Ok(Resource::composite("ddr3", 0, subsignals)?.with_attrs(attrs([("IOSTANDARD", "SSTL15")])?))
}

/// The layout shared by every board of the family.
pub fn base() -> Result<BaseDescriptor, ResourceError> {
    let lvcmos33 = attrs([("IOSTANDARD", "LVCMOS33")])?;
    let toolchain = ToolchainSettings {
        reset_false_path: true,
        overtemp_power_down: true,
        config_clock: ConfigClock::ExternalMasterDiv1,
        spi_bus_width: 4,
        spi_fall_edge: true,
        compress: true,
        config_voltage: "3.3".to_string(),
        cfgbvs: "VCCO".to_string(),
        flash: FlashImage::mcs_16mb(),
    };
    let flash = SpiFlashPads {
        cs_n: "T19",
        clk: "-",
        copi: "P22",
        cipo: "R22",
        wp_n: "P21",
        hold_n: "R21",
    };

    Ok(BaseDescriptor::new(toolchain)
        .default_clock("clk100")
        .default_reset("rst")
        .connector_width(4)
        .resource(
            Resource::new("clk100", 0, Pins::diff_pairs("F6", "E6", Direction::In)?)
                .with_clock(Frequency::from_mhz(100.0))
                .with_attrs(attrs([("IOSTANDARD", "LVDS")])?),
        )
        .resource(
            Resource::new("clk90", 1, Pins::new("V22", Direction::In)?)
                .with_clock(Frequency::from_mhz(90.0))
                .with_attrs(lvcmos33.clone()),
        )
        .resource(
            Resource::new("clk200", 2, Pins::diff_pairs("J19", "H19", Direction::In)?)
                .with_clock(Frequency::from_mhz(200.0))
                .with_attrs(attrs([("IOSTANDARD", "LVDS_25")])?),
        )
        .resource(
            Resource::new("rst", 0, Pins::inverted("J1", Direction::In)?)
                .with_attrs(lvcmos33.clone()),
        )
        .resources(led_resources(
            "G3 H3 G4 H4",
            &attrs([("IOSTANDARD", "LVCMOS33"), ("PULLUP", "true"), ("DRIVE", "8")])?,
        )?)
        .resources(spi_flash_resources(0, &flash, &lvcmos33)?)
        .resource(ddr3()?)
        .connector(Connector::new("gpio", 0, "J5 H5 K2 J2")))
}

/// The boards built from [`base`].
pub fn variants() -> Vec<VariantOverride> {
    vec![
        VariantOverride::new("litefury", "xc7a100t", "fgg484", "2L"),
        VariantOverride::new("nitefury", "xc7a200t", "fbg484", "3"),
    ]
}

/// Instantiates the whole family.
pub fn family() -> Result<VariantFamily, PlatformError> {
    VariantFamily::new(&base()?, &variants())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsp_resource::SignalBody;

    #[test]
    fn family_builds() {
        let family = family().unwrap();
        let names: Vec<_> = family.members().iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["litefury", "nitefury"]);
        let nitefury = &family.members()[1];
        assert_eq!(nitefury.device_triplet(), ("xc7a200t", "fbg484", "3"));
        assert_eq!(nitefury.part(), "xc7a200tfbg484-3");
    }

    #[test]
    fn defaults_resolve() {
        let family = family().unwrap();
        let board = &family.members()[0];
        let clk = board.default_clock().unwrap();
        assert_eq!(clk.clock(), Some(Frequency::from_mhz(100.0)));
        assert_eq!(clk.expanded_pads(), vec!["F6", "E6"]);
        assert_eq!(board.default_reset().unwrap().expanded_pads(), vec!["J1"]);
    }

    #[test]
    fn secondary_clocks_keep_their_index() {
        let family = family().unwrap();
        let board = &family.members()[0];
        assert!(board.resource("clk90", 1).is_some());
        assert!(board.resource("clk90", 0).is_none());
        assert_eq!(
            board.resource("clk200", 2).unwrap().attrs().get("IOSTANDARD"),
            Some("LVDS_25")
        );
    }

    #[test]
    fn ddr3_layout() {
        let family = family().unwrap();
        let ddr = family.members()[0].resource("ddr3", 0).unwrap();
        let SignalBody::Subsignals(subs) = ddr.body() else {
            panic!("ddr3 is composite");
        };
        assert_eq!(subs.len(), 12);
        assert_eq!(ddr.attrs().get("IOSTANDARD"), Some("SSTL15"));
        let pads = ddr.expanded_pads();
        assert_eq!(pads.len(), 1 + 2 + 1 + 3 + 16 + 3 + 4 + 16 + 2 + 1);
        assert!(pads.contains(&"A21"));
    }

    #[test]
    fn leds_and_gpio() {
        let family = family().unwrap();
        let board = &family.members()[0];
        let led = board.resource("led", 3).unwrap();
        assert_eq!(led.expanded_pads(), vec!["H4"]);
        assert_eq!(led.attrs().get("DRIVE"), Some("8"));
        assert_eq!(
            board.connectors().expand("gpio", 0).unwrap(),
            &["J5", "H5", "K2", "J2"].map(String::from)
        );
    }
}
