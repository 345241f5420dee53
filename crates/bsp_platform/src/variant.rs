//! Board families: one shared base, several silicon variants.

use bsp_resource::{Connector, Resource};
use std::collections::BTreeSet;

use crate::descriptor::PlatformDescriptor;
use crate::error::PlatformError;
use crate::silicon::VariantOverride;
use crate::toolchain::ToolchainSettings;

/// Everything a board definition declares except the silicon it carries.
///
/// Entries are collected unchecked; [`BaseDescriptor::instantiate`] builds
/// and validates the tables for one variant.
#[derive(Debug, Clone)]
pub struct BaseDescriptor {
    pub(crate) default_clock: Option<String>,
    pub(crate) default_reset: Option<String>,
    pub(crate) resources: Vec<Resource>,
    pub(crate) connectors: Vec<Connector>,
    pub(crate) connector_width: Option<usize>,
    pub(crate) toolchain: ToolchainSettings,
}

impl BaseDescriptor {
    /// Starts an empty base with the given configuration settings.
    pub fn new(toolchain: ToolchainSettings) -> Self {
        Self {
            default_clock: None,
            default_reset: None,
            resources: Vec::new(),
            connectors: Vec::new(),
            connector_width: None,
            toolchain,
        }
    }

    /// Names the default clock resource (index 0).
    pub fn default_clock(mut self, name: impl Into<String>) -> Self {
        self.default_clock = Some(name.into());
        self
    }

    /// Names the default reset resource (index 0).
    pub fn default_reset(mut self, name: impl Into<String>) -> Self {
        self.default_reset = Some(name.into());
        self
    }

    /// Appends a resource.
    pub fn resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    /// Appends several resources in order.
    pub fn resources(mut self, resources: impl IntoIterator<Item = Resource>) -> Self {
        self.resources.extend(resources);
        self
    }

    /// Appends a connector.
    pub fn connector(mut self, connector: Connector) -> Self {
        self.connectors.push(connector);
        self
    }

    /// Requires every connector to have exactly `width` pads.
    pub fn connector_width(mut self, width: usize) -> Self {
        self.connector_width = Some(width);
        self
    }

    /// Builds and validates the descriptor for one variant.
    pub fn instantiate(
        &self,
        variant: &VariantOverride,
    ) -> Result<PlatformDescriptor, PlatformError> {
        PlatformDescriptor::build(self, variant)
    }
}

/// A set of boards instantiated from one base.
#[derive(Debug, Clone)]
pub struct VariantFamily {
    members: Vec<PlatformDescriptor>,
}

impl VariantFamily {
    /// Instantiates every variant from a copy of `base`.
    ///
    /// Fails if a variant is invalid, if two variants share a name, or if
    /// the instantiated boards disagree on anything but their silicon.
    pub fn new(base: &BaseDescriptor, variants: &[VariantOverride]) -> Result<Self, PlatformError> {
        let mut names = BTreeSet::new();
        let mut members: Vec<PlatformDescriptor> = Vec::with_capacity(variants.len());
        for variant in variants {
            if !names.insert(variant.name.as_str()) {
                return Err(PlatformError::InconsistentVariant {
                    variant: variant.name.clone(),
                    reason: "name used by another variant".to_string(),
                });
            }
            let board = base.instantiate(variant)?;
            if let Some(first) = members.first() {
                if let Some(field) = disagreement(first, &board) {
                    return Err(PlatformError::InconsistentVariant {
                        variant: variant.name.clone(),
                        reason: format!("{field} differs from '{}'", first.name()),
                    });
                }
            }
            members.push(board);
        }
        Ok(Self { members })
    }

    /// Returns the instantiated boards in declaration order.
    pub fn members(&self) -> &[PlatformDescriptor] {
        &self.members
    }

    /// Consumes the family and returns its boards.
    pub fn into_members(self) -> Vec<PlatformDescriptor> {
        self.members
    }
}

fn disagreement(a: &PlatformDescriptor, b: &PlatformDescriptor) -> Option<&'static str> {
    if a.resources() != b.resources() {
        Some("resource table")
    } else if a.connectors() != b.connectors() {
        Some("connector table")
    } else if a.default_clock_name() != b.default_clock_name() {
        Some("default clock")
    } else if a.default_reset_name() != b.default_reset_name() {
        Some("default reset")
    } else if a.toolchain() != b.toolchain() {
        Some("toolchain settings")
    } else {
        None
    }
}
