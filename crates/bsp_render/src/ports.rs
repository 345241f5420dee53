//! Top-level port naming.
//!
//! Every requested pin group becomes one or more ports of the top-level
//! design. A port is named after its resource, index, and subsignal path,
//! then the pad side: `led_0__io`, `ddr3_0__a__io[3]`, `clk100_0__p`.

use bsp_resource::{Attrs, Leaf, PinKind, Resource, NOT_CONNECTED};

/// One bit of one top-level port, bound to a physical pad.
#[derive(Debug, Clone, PartialEq)]
pub struct PortBit {
    /// Port name, including the bit suffix for multi-bit groups.
    pub port: String,
    /// The pad it is placed on.
    pub pad: String,
    /// Attributes inherited down the resource tree.
    pub attrs: Attrs,
}

/// Returns `name_index` followed by `__sub` for every subsignal level.
pub fn leaf_base(resource: &Resource, leaf: &Leaf<'_>) -> String {
    let mut base = format!("{}_{}", resource.name(), resource.index());
    for segment in &leaf.path {
        base.push_str("__");
        base.push_str(segment);
    }
    base
}

fn sides<'a>(leaf: &'a Leaf<'_>) -> Vec<(&'static str, &'a [String])> {
    match leaf.pins.kind() {
        PinKind::DifferentialPair => vec![
            ("p", leaf.pins.pads()),
            ("n", leaf.pins.complements()),
        ],
        PinKind::Single | PinKind::Negative => vec![("io", leaf.pins.pads())],
    }
}

fn port_name(base: &str, side: &str, bit: usize, width: usize) -> String {
    if width > 1 {
        format!("{base}__{side}[{bit}]")
    } else {
        format!("{base}__{side}")
    }
}

/// Lists every placed port bit of a resource, in declaration order.
///
/// Unconnected `-` bits keep their position in the numbering but produce no
/// entry.
pub fn port_bits(resource: &Resource) -> Vec<PortBit> {
    let mut out = Vec::new();
    for leaf in resource.leaves() {
        let base = leaf_base(resource, &leaf);
        let width = leaf.pins.width();
        for (side, pads) in sides(&leaf) {
            for (bit, pad) in pads.iter().enumerate() {
                if pad == NOT_CONNECTED {
                    continue;
                }
                out.push(PortBit {
                    port: port_name(&base, side, bit, width),
                    pad: pad.clone(),
                    attrs: leaf.attrs.clone(),
                });
            }
        }
    }
    out
}

/// Returns the port a clock constraint or false path attaches to for each
/// pin group: the first bit of the true side.
pub fn primary_ports(resource: &Resource) -> Vec<(String, Option<bsp_common::Frequency>)> {
    resource
        .leaves()
        .iter()
        .map(|leaf| {
            let base = leaf_base(resource, leaf);
            let side = sides(leaf)[0].0;
            (port_name(&base, side, 0, leaf.pins.width()), leaf.clock)
        })
        .collect()
}
