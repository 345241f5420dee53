//! Named board resources: single pin groups and composites of subsignals.

use bsp_common::{Direction, Frequency};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::attrs::Attrs;
use crate::connector::ConnectorTable;
use crate::error::ResourceError;
use crate::pins::Pins;

/// The payload of a resource or subsignal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalBody {
    /// A single pin group.
    Pins(Pins),
    /// Named subsignals, each with its own body.
    Subsignals(Vec<Subsignal>),
}

impl SignalBody {
    fn resolve(&self, connectors: &ConnectorTable) -> Result<SignalBody, ResourceError> {
        Ok(match self {
            SignalBody::Pins(pins) => SignalBody::Pins(pins.resolve(connectors)?),
            SignalBody::Subsignals(subs) => SignalBody::Subsignals(
                subs.iter()
                    .map(|s| s.resolve(connectors))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

/// One named field of a composite resource, e.g. `a` or `dq` of a memory bus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subsignal {
    name: String,
    body: SignalBody,
    attrs: Attrs,
    clock: Option<Frequency>,
}

impl Subsignal {
    /// Creates a subsignal backed by a pin group.
    pub fn new(name: impl Into<String>, pins: Pins) -> Self {
        Self {
            name: name.into(),
            body: SignalBody::Pins(pins),
            attrs: Attrs::new(),
            clock: None,
        }
    }

    /// Creates a subsignal made of nested subsignals.
    pub fn composite(
        name: impl Into<String>,
        subsignals: Vec<Subsignal>,
    ) -> Result<Self, ResourceError> {
        let name = name.into();
        check_unique_names(&name, &subsignals)?;
        Ok(Self {
            name,
            body: SignalBody::Subsignals(subsignals),
            attrs: Attrs::new(),
            clock: None,
        })
    }

    /// Attaches electrical attributes.
    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// Marks the subsignal as a clock of the given nominal frequency.
    pub fn with_clock(mut self, frequency: Frequency) -> Self {
        self.clock = Some(frequency);
        self
    }

    /// Returns the subsignal name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the body.
    pub fn body(&self) -> &SignalBody {
        &self.body
    }

    /// Returns the attributes declared on this subsignal.
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    fn resolve(&self, connectors: &ConnectorTable) -> Result<Subsignal, ResourceError> {
        Ok(Subsignal {
            body: self.body.resolve(connectors)?,
            ..self.clone()
        })
    }
}

/// A named, indexed entry of a board's resource table.
///
/// A resource is either a plain pin group (`clk100`, `led`) or a composite of
/// subsignals (`ddr3`, `spi_flash_4x`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    name: String,
    index: u32,
    body: SignalBody,
    attrs: Attrs,
    clock: Option<Frequency>,
    share_group: Option<String>,
}

/// A pin group reached by walking a resource, with everything inherited on
/// the way down.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf<'a> {
    /// Subsignal names from the resource down to this group; empty for a
    /// plain resource.
    pub path: Vec<&'a str>,
    /// The pin group.
    pub pins: &'a Pins,
    /// Attributes merged from the resource down, innermost wins.
    pub attrs: Attrs,
    /// The innermost declared clock frequency, if any.
    pub clock: Option<Frequency>,
}

impl Resource {
    /// Creates a resource backed by a single pin group.
    pub fn new(name: impl Into<String>, index: u32, pins: Pins) -> Self {
        Self {
            name: name.into(),
            index,
            body: SignalBody::Pins(pins),
            attrs: Attrs::new(),
            clock: None,
            share_group: None,
        }
    }

    /// Creates a composite resource. Subsignal names must be unique.
    pub fn composite(
        name: impl Into<String>,
        index: u32,
        subsignals: Vec<Subsignal>,
    ) -> Result<Self, ResourceError> {
        let name = name.into();
        check_unique_names(&format!("{name}#{index}"), &subsignals)?;
        Ok(Self {
            name,
            index,
            body: SignalBody::Subsignals(subsignals),
            attrs: Attrs::new(),
            clock: None,
            share_group: None,
        })
    }

    /// Attaches electrical attributes applying to every contained pin.
    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// Marks the resource as a clock of the given nominal frequency.
    pub fn with_clock(mut self, frequency: Frequency) -> Self {
        self.clock = Some(frequency);
        self
    }

    /// Declares that this resource may claim the same pads as other
    /// resources in `group` (alternative views of one bus).
    pub fn shared_as(mut self, group: impl Into<String>) -> Self {
        self.share_group = Some(group.into());
        self
    }

    /// Returns the resource name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the resource index.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns `name#index`, the form used in messages.
    pub fn key(&self) -> String {
        format!("{}#{}", self.name, self.index)
    }

    /// Returns the body.
    pub fn body(&self) -> &SignalBody {
        &self.body
    }

    /// Returns the resource-level attributes.
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// Returns the resource-level clock frequency.
    pub fn clock(&self) -> Option<Frequency> {
        self.clock
    }

    /// Returns the share group, if declared.
    pub fn share_group(&self) -> Option<&str> {
        self.share_group.as_deref()
    }

    /// Returns true if this is a plain pin group rather than a composite.
    pub fn is_simple(&self) -> bool {
        matches!(self.body, SignalBody::Pins(_))
    }

    /// Walks the resource depth-first and returns every pin group in
    /// declaration order.
    pub fn leaves(&self) -> Vec<Leaf<'_>> {
        let mut out = Vec::new();
        collect_leaves(&self.body, Vec::new(), &self.attrs, self.clock, &mut out);
        out
    }

    /// Returns every physical pad, fully expanded through differential pairs
    /// and subsignals.
    pub fn expanded_pads(&self) -> Vec<&str> {
        let mut pads = Vec::new();
        collect_pads(&self.body, &mut pads);
        pads
    }

    /// Returns true if every pin group in the resource is an input.
    pub fn is_input(&self) -> bool {
        self.leaves()
            .iter()
            .all(|leaf| leaf.pins.direction() == Direction::In)
    }

    /// Returns true if any pin group still refers to unresolved connector
    /// positions.
    pub fn has_unresolved_pins(&self) -> bool {
        self.leaves().iter().any(|leaf| !leaf.pins.is_resolved())
    }

    /// Returns a copy with every connector-relative pin group mapped to
    /// physical pads.
    pub fn resolve(&self, connectors: &ConnectorTable) -> Result<Resource, ResourceError> {
        Ok(Resource {
            body: self.body.resolve(connectors)?,
            ..self.clone()
        })
    }
}

fn check_unique_names(parent: &str, subsignals: &[Subsignal]) -> Result<(), ResourceError> {
    let mut seen = BTreeSet::new();
    for sub in subsignals {
        if !seen.insert(sub.name.as_str()) {
            return Err(ResourceError::DuplicateSubsignal {
                parent: parent.to_string(),
                subsignal: sub.name.clone(),
            });
        }
    }
    Ok(())
}

fn collect_leaves<'a>(
    body: &'a SignalBody,
    path: Vec<&'a str>,
    attrs: &Attrs,
    clock: Option<Frequency>,
    out: &mut Vec<Leaf<'a>>,
) {
    match body {
        SignalBody::Pins(pins) => out.push(Leaf {
            path,
            pins,
            attrs: attrs.clone(),
            clock,
        }),
        SignalBody::Subsignals(subs) => {
            for sub in subs {
                let mut sub_path = path.clone();
                sub_path.push(&sub.name);
                collect_leaves(
                    &sub.body,
                    sub_path,
                    &attrs.overlay(&sub.attrs),
                    sub.clock.or(clock),
                    out,
                );
            }
        }
    }
}

fn collect_pads<'a>(body: &'a SignalBody, out: &mut Vec<&'a str>) {
    match body {
        SignalBody::Pins(pins) => out.extend(pins.physical_pads()),
        SignalBody::Subsignals(subs) => {
            for sub in subs {
                collect_pads(&sub.body, out);
            }
        }
    }
}
