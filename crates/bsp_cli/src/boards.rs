//! `bsp boards` and `bsp show`.

use std::fmt::Write;

use bsp_platform::{BoardRegistry, PlatformDescriptor};
use bsp_render::ports::port_bits;

use crate::{ReportFormat, ShowArgs};

/// Runs `bsp boards`: one line per board with its part.
pub fn list() -> Result<i32, Box<dyn std::error::Error>> {
    let registry = BoardRegistry::builtin()?;
    for board in registry.iter() {
        println!("{:<12} {}", board.name(), board.part());
    }
    Ok(0)
}

/// Runs `bsp show`.
pub fn show(args: &ShowArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let registry = BoardRegistry::builtin()?;
    let board = registry.get(&args.board)?;
    match args.format {
        ReportFormat::Text => print!("{}", describe(board)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(board)?),
    }
    Ok(0)
}

/// Human-readable board summary: identity, defaults, resources with their
/// top-level ports, connectors.
pub fn describe(board: &PlatformDescriptor) -> String {
    let mut out = String::new();
    let (device, package, speed) = board.device_triplet();
    let _ = writeln!(out, "board:   {}", board.name());
    let _ = writeln!(out, "part:    {} ({device}, {package}, speed {speed})", board.part());
    let _ = writeln!(out, "clock:   {}", board.default_clock_name().unwrap_or("-"));
    let _ = writeln!(out, "reset:   {}", board.default_reset_name().unwrap_or("-"));
    let _ = writeln!(out, "config:  {}", board.toolchain().config_mode());

    let _ = writeln!(out, "\nresources:");
    for resource in board.resources().iter() {
        match resource.clock() {
            Some(clock) => {
                let _ = writeln!(out, "  {} ({clock})", resource.key());
            }
            None => {
                let _ = writeln!(out, "  {}", resource.key());
            }
        }
        for bit in port_bits(resource) {
            let _ = writeln!(out, "    {:<24} {}", bit.port, bit.pad);
        }
    }

    if !board.connectors().is_empty() {
        let _ = writeln!(out, "\nconnectors:");
        for connector in board.connectors().iter() {
            let _ = writeln!(
                out,
                "  {}#{}: {}",
                connector.name(),
                connector.index(),
                connector.pads().join(" ")
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_picoevb() {
        let registry = BoardRegistry::builtin().unwrap();
        let text = describe(registry.get("picoevb").unwrap());
        assert!(text.starts_with("board:   picoevb\npart:    xc7a50tcsg325-2 (xc7a50t, csg325, speed 2)\n"));
        assert!(text.contains("clock:   clk100\n"));
        assert!(text.contains("    led_0__io                V12\n"));
        assert!(text.contains("  gpio#0: A12 B12 A13 A14\n"));
    }

    #[test]
    fn describe_lists_differential_sides() {
        let registry = BoardRegistry::builtin().unwrap();
        let text = describe(registry.get("nitefury").unwrap());
        assert!(text.contains("    clk100_0__p              F6\n"));
        assert!(text.contains("    clk100_0__n              E6\n"));
    }

    #[test]
    fn json_is_valid() {
        let registry = BoardRegistry::builtin().unwrap();
        let json = serde_json::to_value(registry.get("litefury").unwrap()).unwrap();
        assert_eq!(json["name"], "litefury");
    }
}
