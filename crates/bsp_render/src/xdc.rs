//! Pin constraint (XDC) emission.

use bsp_platform::PlatformDescriptor;
use bsp_resource::Resource;

use crate::ports::{port_bits, primary_ports};

/// Quotes a Tcl word with braces, escaping braces and backslashes inside.
pub fn tcl_quote(word: &str) -> String {
    let mut out = String::with_capacity(word.len() + 2);
    out.push('{');
    for c in word.chars() {
        if matches!(c, '{' | '}' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('}');
    out
}

/// Emits the pin constraint file for the requested resources.
///
/// Locations and attributes come first, in request order, then one clock
/// per clocked pin group, then `constraints_text` unchanged.
pub fn pin_constraints(
    platform: &PlatformDescriptor,
    requested: &[&Resource],
    constraints_text: &str,
) -> String {
    let mut lines = vec![format!(
        "# Pin constraints for {} ({})",
        platform.name(),
        platform.part()
    )];

    for resource in requested {
        for bit in port_bits(resource) {
            let port = tcl_quote(&bit.port);
            lines.push(format!("set_property LOC {} [get_ports {port}]", bit.pad));
            for (name, value) in bit.attrs.iter() {
                lines.push(format!(
                    "set_property {name} {} [get_ports {port}]",
                    tcl_quote(value)
                ));
            }
        }
    }

    for resource in requested {
        for (port, clock) in primary_ports(resource) {
            let Some(period) = clock.and_then(|f| f.period_ns()) else {
                continue;
            };
            let port = tcl_quote(&port);
            lines.push(format!(
                "create_clock -name {port} -period {period:.3} [get_ports {port}]"
            ));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    if !constraints_text.is_empty() {
        out.push('\n');
        out.push_str(constraints_text);
        if !constraints_text.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsp_common::{Direction, Frequency};
    use bsp_platform::BoardRegistry;
    use bsp_resource::Pins;

    #[test]
    fn quoting() {
        assert_eq!(tcl_quote("led_0__io"), "{led_0__io}");
        assert_eq!(tcl_quote("a[0]"), "{a[0]}");
        assert_eq!(tcl_quote("x{y}\\"), "{x\\{y\\}\\\\}");
    }

    #[test]
    fn led_and_clock() {
        let registry = BoardRegistry::builtin().unwrap();
        let board = registry.get("picoevb").unwrap();
        let requested = [
            board.resource("clk100", 0).unwrap(),
            board.resource("led", 0).unwrap(),
        ];
        let xdc = pin_constraints(board, &requested, "");
        assert_eq!(
            xdc,
            "# Pin constraints for picoevb (xc7a50tcsg325-2)\n\
             set_property LOC B6 [get_ports {clk100_0__io}]\n\
             set_property LOC V12 [get_ports {led_0__io}]\n\
             set_property DRIVE {8} [get_ports {led_0__io}]\n\
             set_property IOSTANDARD {LVCMOS33} [get_ports {led_0__io}]\n\
             set_property PULLUP {true} [get_ports {led_0__io}]\n\
             create_clock -name {clk100_0__io} -period 10.000 [get_ports {clk100_0__io}]\n"
        );
    }

    #[test]
    fn constraints_text_appended() {
        let registry = BoardRegistry::builtin().unwrap();
        let board = registry.get("nitefury").unwrap();
        let requested = [board.resource("clk200", 2).unwrap()];
        let xdc = pin_constraints(board, &requested, "set_property CFGBVS VCCO [current_design]");
        assert!(xdc.contains("set_property LOC H19 [get_ports {clk200_2__n}]\n"));
        assert!(xdc.contains("create_clock -name {clk200_2__p} -period 5.000 [get_ports {clk200_2__p}]\n"));
        assert!(xdc.ends_with("\n\nset_property CFGBVS VCCO [current_design]\n"));
    }

    #[test]
    fn multi_bit_clock_name_is_quoted() {
        let registry = BoardRegistry::builtin().unwrap();
        let board = registry.get("picoevb").unwrap();
        let clocks = Resource::new("clkin", 0, Pins::new("A1 A2", Direction::In).unwrap())
            .with_clock(Frequency::from_mhz(50.0));
        let xdc = pin_constraints(board, &[&clocks], "");
        assert!(xdc.contains(
            "create_clock -name {clkin_0__io[0]} -period 20.000 [get_ports {clkin_0__io[0]}]\n"
        ));
    }
}
