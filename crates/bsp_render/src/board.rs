//! Default override layers: vendor defaults and per-board defaults.

use bsp_platform::{ConfigClock, FlashImage, PlatformDescriptor};

use crate::overrides::{OverrideKey, Overrides};
use crate::ports::primary_ports;
use crate::template::TemplateParams;

/// The lowest layer: every key bound to empty text.
pub fn vendor_defaults() -> Overrides {
    let mut overrides = Overrides::new();
    for key in OverrideKey::ALL {
        overrides.set_text(key, "");
    }
    overrides
}

/// The board layer: configuration constraints and flash packaging derived
/// from the descriptor's settings.
pub fn board_overrides(platform: &PlatformDescriptor) -> Overrides {
    let mut overrides = Overrides::new();
    overrides.set_text(OverrideKey::AddConstraints, default_constraints(platform));
    let flash = platform.toolchain().flash.clone();
    let interface = platform.toolchain().config_mode();
    overrides.set_generator(OverrideKey::ScriptAfterBitstream, move |params| {
        packaging_command(&flash, &interface, params)
    });
    overrides
}

/// The flash packaging command for one design.
pub fn packaging_command(
    flash: &FlashImage,
    interface: &str,
    params: &TemplateParams<'_>,
) -> String {
    let name = params.design_name;
    format!(
        "write_cfgmem -format {format} -size {size} -interface {interface} -force -loadbit \"{dir} 0x{offset:08x} {name}.bit\" -file {name}.{format}",
        format = flash.format,
        size = flash.size_mb,
        dir = flash.load_direction,
        offset = flash.offset,
    )
}

/// The board's configuration constraints, one directive per line.
pub fn default_constraints(platform: &PlatformDescriptor) -> String {
    let settings = platform.toolchain();
    let mut lines: Vec<String> = Vec::new();

    let reset_port = platform
        .default_reset()
        .and_then(|rst| primary_ports(rst).into_iter().next())
        .map(|(port, _)| port);
    if let (true, Some(port)) = (settings.reset_false_path, reset_port) {
        lines.push("# Input reset is resynchronized within FPGA design as necessary.".to_string());
        lines.push(format!("set_false_path -from [get_ports {port}]"));
        lines.push(String::new());
    }

    if settings.overtemp_power_down {
        lines.push("# Power down when the temperature is too high.".to_string());
        lines.push("set_property BITSTREAM.CONFIG.OVERTEMPPOWERDOWN ENABLE [current_design]".to_string());
        lines.push(String::new());
    }

    lines.push(
        "# High-speed configuration so FPGA is up in time to negotiate with PCIe root complex"
            .to_string(),
    );
    lines.push(match settings.config_clock {
        ConfigClock::ExternalMasterDiv1 => {
            "set_property BITSTREAM.CONFIG_EXTMASTERCCLK_EN Div-1 [current_design]".to_string()
        }
        ConfigClock::ConfigRate(rate) => {
            format!("set_property BITSTREAM.CONFIG.CONFIGRATE {rate} [current_design]")
        }
    });
    lines.push(format!(
        "set_property BITSTREAM.CONFIG_SPI_BUSWIDTH {} [current_design]",
        settings.spi_bus_width
    ));
    lines.push(format!(
        "set_property CONFIG_MODE {} [current_design]",
        settings.config_mode()
    ));
    if settings.spi_fall_edge {
        lines.push("set_property BITSTREAM.CONFIG.SPI_FALL_EDGE YES [current_design]".to_string());
    }
    if settings.compress {
        lines.push("set_property BITSTREAM.GENERAL.COMPRESS TRUE [current_design]".to_string());
    }
    lines.push(String::new());
    lines.push(format!(
        "set_property CONFIG_VOLTAGE {} [current_design]",
        settings.config_voltage
    ));
    lines.push(format!("set_property CFGBVS {} [current_design]", settings.cfgbvs));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsp_platform::BoardRegistry;

    const NITEFURY: &str = "\
# Input reset is resynchronized within FPGA design as necessary.
set_false_path -from [get_ports rst_0__io]

# Power down when the temperature is too high.
set_property BITSTREAM.CONFIG.OVERTEMPPOWERDOWN ENABLE [current_design]

# High-speed configuration so FPGA is up in time to negotiate with PCIe root complex
set_property BITSTREAM.CONFIG_EXTMASTERCCLK_EN Div-1 [current_design]
set_property BITSTREAM.CONFIG_SPI_BUSWIDTH 4 [current_design]
set_property CONFIG_MODE SPIx4 [current_design]
set_property BITSTREAM.CONFIG.SPI_FALL_EDGE YES [current_design]
set_property BITSTREAM.GENERAL.COMPRESS TRUE [current_design]

set_property CONFIG_VOLTAGE 3.3 [current_design]
set_property CFGBVS VCCO [current_design]
";

    const PICOEVB: &str = "\
# Power down when the temperature is too high.
set_property BITSTREAM.CONFIG.OVERTEMPPOWERDOWN ENABLE [current_design]

# High-speed configuration so FPGA is up in time to negotiate with PCIe root complex
set_property BITSTREAM.CONFIG.CONFIGRATE 55 [current_design]
set_property BITSTREAM.CONFIG_SPI_BUSWIDTH 4 [current_design]
set_property CONFIG_MODE SPIx4 [current_design]
set_property BITSTREAM.CONFIG.SPI_FALL_EDGE YES [current_design]
set_property BITSTREAM.GENERAL.COMPRESS TRUE [current_design]

set_property CONFIG_VOLTAGE 3.3 [current_design]
set_property CFGBVS VCCO [current_design]
";

    #[test]
    fn nitefury_constraints() {
        let registry = BoardRegistry::builtin().unwrap();
        assert_eq!(default_constraints(registry.get("nitefury").unwrap()), NITEFURY);
        assert_eq!(default_constraints(registry.get("litefury").unwrap()), NITEFURY);
    }

    #[test]
    fn picoevb_constraints() {
        let registry = BoardRegistry::builtin().unwrap();
        assert_eq!(default_constraints(registry.get("picoevb").unwrap()), PICOEVB);
    }

    #[test]
    fn packaging() {
        let registry = BoardRegistry::builtin().unwrap();
        let board = registry.get("picoevb").unwrap();
        let text = packaging_command(
            &board.toolchain().flash,
            &board.toolchain().config_mode(),
            &TemplateParams::new("top", board),
        );
        assert_eq!(
            text,
            "write_cfgmem -format mcs -size 16 -interface SPIx4 -force -loadbit \"up 0x00000000 top.bit\" -file top.mcs"
        );
    }

    #[test]
    fn vendor_layer_binds_every_key() {
        let defaults = vendor_defaults();
        assert_eq!(defaults.len(), OverrideKey::ALL.len());
    }

    #[test]
    fn board_layer_keys() {
        let registry = BoardRegistry::builtin().unwrap();
        let layer = board_overrides(registry.get("nitefury").unwrap());
        let keys: Vec<_> = layer.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![OverrideKey::ScriptAfterBitstream, OverrideKey::AddConstraints]
        );
    }
}
