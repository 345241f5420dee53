//! Vivado batch script emission.

use std::collections::BTreeMap;

use crate::overrides::OverrideKey;
use crate::template::TemplateParams;
use crate::xdc::tcl_quote;

/// The inputs of the batch script that are not override text.
#[derive(Debug, Clone, Copy)]
pub struct ScriptInputs<'a> {
    /// Render parameters.
    pub params: TemplateParams<'a>,
    /// Top-level module name.
    pub top: &'a str,
    /// HDL source paths, added in order.
    pub sources: &'a [String],
}

fn hook(lines: &mut Vec<String>, hooks: &BTreeMap<OverrideKey, String>, key: OverrideKey) {
    if let Some(text) = hooks.get(&key).map(|t| t.trim_end()) {
        if !text.is_empty() {
            lines.push(text.to_string());
        }
    }
}

/// Emits the full batch script: project setup, synthesis, implementation,
/// reports, and bitstream, with each hook inserted at its point.
pub fn build_script(inputs: &ScriptInputs<'_>, hooks: &BTreeMap<OverrideKey, String>) -> String {
    let name = inputs.params.design_name;
    let mut lines = vec![
        format!(
            "# Vivado batch script for {} on {}",
            name,
            inputs.params.platform.name()
        ),
        format!(
            "create_project -force -name {name} -part {}",
            inputs.params.platform.part()
        ),
    ];
    for source in inputs.sources {
        lines.push(format!("add_files {}", tcl_quote(source)));
    }
    lines.push(format!("read_xdc {name}.xdc"));
    hook(&mut lines, hooks, OverrideKey::ScriptAfterRead);

    let opts = hooks
        .get(&OverrideKey::SynthDesignOpts)
        .map(|s| s.trim())
        .unwrap_or("");
    if opts.is_empty() {
        lines.push(format!("synth_design -top {}", inputs.top));
    } else {
        lines.push(format!("synth_design -top {} {opts}", inputs.top));
    }
    hook(&mut lines, hooks, OverrideKey::ScriptAfterSynth);
    lines.extend([
        format!("report_timing_summary -file {name}_timing_synth.rpt"),
        format!("report_utilization -hierarchical -file {name}_utilization_hierarchical_synth.rpt"),
        format!("report_utilization -file {name}_utilization_synth.rpt"),
        "opt_design".to_string(),
        "place_design".to_string(),
    ]);
    hook(&mut lines, hooks, OverrideKey::ScriptAfterPlace);
    lines.extend([
        format!("report_utilization -hierarchical -file {name}_utilization_hierarchical_place.rpt"),
        format!("report_utilization -file {name}_utilization_place.rpt"),
        format!("report_io -file {name}_io.rpt"),
        format!("report_control_sets -verbose -file {name}_control_sets.rpt"),
        format!("report_clock_utilization -file {name}_clock_utilization.rpt"),
        "route_design".to_string(),
    ]);
    hook(&mut lines, hooks, OverrideKey::ScriptAfterRoute);
    lines.extend([
        "phys_opt_design".to_string(),
        "report_timing_summary -no_header -no_detailed_paths".to_string(),
        format!("write_checkpoint -force {name}_route.dcp"),
        format!("report_route_status -file {name}_route_status.rpt"),
        format!("report_drc -file {name}_drc.rpt"),
        format!("report_methodology -file {name}_methodology.rpt"),
        format!("report_timing_summary -datasheet -max_paths 10 -file {name}_timing.rpt"),
        format!("report_power -file {name}_power.rpt"),
    ]);
    hook(&mut lines, hooks, OverrideKey::ScriptBeforeBitstream);
    lines.push(format!("write_bitstream -force -bin_file {name}.bit"));
    hook(&mut lines, hooks, OverrideKey::ScriptAfterBitstream);
    lines.push("quit".to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Emits a script that loads `<design_name>.bit` into the first device on
/// the JTAG chain.
pub fn program_script(design_name: &str) -> String {
    [
        "open_hw_manager".to_string(),
        "connect_hw_server".to_string(),
        "open_hw_target".to_string(),
        "set device [lindex [get_hw_devices] 0]".to_string(),
        "current_hw_device $device".to_string(),
        format!(
            "set_property PROGRAM.FILE {} $device",
            tcl_quote(&format!("{design_name}.bit"))
        ),
        "program_hw_devices $device".to_string(),
        "close_hw_manager".to_string(),
        "quit".to_string(),
    ]
    .join("\n")
        + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsp_platform::BoardRegistry;

    fn script(hooks: &BTreeMap<OverrideKey, String>) -> String {
        let registry = BoardRegistry::builtin().unwrap();
        let board = registry.get("litefury").unwrap();
        let sources = vec!["rtl/top.v".to_string(), "rtl/uart.sv".to_string()];
        let inputs = ScriptInputs {
            params: TemplateParams::new("blink", board),
            top: "top",
            sources: &sources,
        };
        build_script(&inputs, hooks)
    }

    #[test]
    fn project_header_and_sources() {
        let text = script(&BTreeMap::new());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[1], "create_project -force -name blink -part xc7a100tfgg484-2L");
        assert_eq!(lines[2], "add_files {rtl/top.v}");
        assert_eq!(lines[3], "add_files {rtl/uart.sv}");
        assert_eq!(lines[4], "read_xdc blink.xdc");
        assert_eq!(lines[5], "synth_design -top top");
        assert!(text.ends_with("write_bitstream -force -bin_file blink.bit\nquit\n"));
    }

    #[test]
    fn hooks_inserted_in_place() {
        let mut hooks = BTreeMap::new();
        hooks.insert(OverrideKey::SynthDesignOpts, "-flatten_hierarchy none".to_string());
        hooks.insert(OverrideKey::ScriptAfterBitstream, "write_cfgmem x\n".to_string());
        hooks.insert(OverrideKey::ScriptBeforeBitstream, "report_power".to_string());
        let text = script(&hooks);
        assert!(text.contains("synth_design -top top -flatten_hierarchy none\n"));
        assert!(text.contains(
            "report_power\nwrite_bitstream -force -bin_file blink.bit\nwrite_cfgmem x\nquit\n"
        ));
    }

    #[test]
    fn program_script_names_bitstream() {
        let text = program_script("blink");
        assert!(text.contains("set_property PROGRAM.FILE {blink.bit} $device\n"));
        assert!(text.ends_with("quit\n"));
    }
}
