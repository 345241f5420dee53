//! The immutable per-board descriptor and its construction-time checks.

use bsp_common::Direction;
use bsp_resource::{Connector, ConnectorTable, Resource, ResourceTable, NOT_CONNECTED};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{DefaultRole, PlatformError};
use crate::silicon::{SiliconIdentity, VariantOverride};
use crate::toolchain::ToolchainSettings;
use crate::variant::BaseDescriptor;

/// Everything known about one board: silicon, pins, connectors, defaults,
/// and configuration settings.
///
/// Descriptors are only produced by [`BaseDescriptor::instantiate`], which
/// validates them completely, and are never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformDescriptor {
    name: String,
    silicon: SiliconIdentity,
    default_clock: Option<String>,
    default_reset: Option<String>,
    resources: ResourceTable,
    connectors: ConnectorTable,
    toolchain: ToolchainSettings,
}

impl PlatformDescriptor {
    pub(crate) fn build(
        base: &BaseDescriptor,
        variant: &VariantOverride,
    ) -> Result<Self, PlatformError> {
        let board = variant.name.as_str();
        check_silicon(board, &variant.silicon)?;

        let mut connectors = match base.connector_width {
            Some(width) => ConnectorTable::with_fixed_width(width),
            None => ConnectorTable::new(),
        };
        for connector in &base.connectors {
            connectors.add(connector.clone())?;
        }

        let mut resources = ResourceTable::new();
        for resource in &base.resources {
            resources.add(resource.resolve(&connectors)?)?;
        }
        check_connector_aliasing(board, &resources, &connectors)?;

        if let Some(name) = &base.default_clock {
            let clock = default_input(board, &resources, DefaultRole::Clock, name)?;
            if !clock.leaves().iter().all(|leaf| leaf.clock.is_some()) {
                return Err(PlatformError::ClockWithoutFrequency {
                    board: board.to_string(),
                    name: name.clone(),
                });
            }
        }
        if let Some(name) = &base.default_reset {
            default_input(board, &resources, DefaultRole::Reset, name)?;
        }

        log::debug!(
            "board {board}: {} resource(s), {} connector(s), part {}",
            resources.len(),
            connectors.len(),
            variant.silicon.part()
        );
        Ok(Self {
            name: variant.name.clone(),
            silicon: variant.silicon.clone(),
            default_clock: base.default_clock.clone(),
            default_reset: base.default_reset.clone(),
            resources,
            connectors,
            toolchain: base.toolchain.clone(),
        })
    }

    /// Returns the board name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the silicon identity.
    pub fn silicon(&self) -> &SiliconIdentity {
        &self.silicon
    }

    /// Returns `(device, package, speed)`.
    pub fn device_triplet(&self) -> (&str, &str, &str) {
        (
            &self.silicon.device,
            &self.silicon.package,
            &self.silicon.speed,
        )
    }

    /// Returns the vendor part string.
    pub fn part(&self) -> String {
        self.silicon.part()
    }

    /// Looks up a resource.
    pub fn resource(&self, name: &str, index: u32) -> Option<&Resource> {
        self.resources.lookup(name, index)
    }

    /// Returns the resource table.
    pub fn resources(&self) -> &ResourceTable {
        &self.resources
    }

    /// Looks up a connector.
    pub fn connector(&self, name: &str, index: u32) -> Option<&Connector> {
        self.connectors.lookup(name, index)
    }

    /// Returns the connector table.
    pub fn connectors(&self) -> &ConnectorTable {
        &self.connectors
    }

    /// Returns the name of the default clock resource.
    pub fn default_clock_name(&self) -> Option<&str> {
        self.default_clock.as_deref()
    }

    /// Returns the name of the default reset resource.
    pub fn default_reset_name(&self) -> Option<&str> {
        self.default_reset.as_deref()
    }

    /// Returns the default clock resource (index 0).
    pub fn default_clock(&self) -> Option<&Resource> {
        self.default_clock
            .as_deref()
            .and_then(|name| self.resources.lookup(name, 0))
    }

    /// Returns the default reset resource (index 0).
    pub fn default_reset(&self) -> Option<&Resource> {
        self.default_reset
            .as_deref()
            .and_then(|name| self.resources.lookup(name, 0))
    }

    /// Returns the configuration settings.
    pub fn toolchain(&self) -> &ToolchainSettings {
        &self.toolchain
    }
}

fn check_silicon(board: &str, silicon: &SiliconIdentity) -> Result<(), PlatformError> {
    let fields = [
        ("device", &silicon.device),
        ("package", &silicon.package),
        ("speed grade", &silicon.speed),
    ];
    for (field, value) in fields {
        if value.trim().is_empty() {
            return Err(PlatformError::MissingSilicon {
                board: board.to_string(),
                field,
            });
        }
    }
    Ok(())
}

fn default_input<'a>(
    board: &str,
    resources: &'a ResourceTable,
    role: DefaultRole,
    name: &str,
) -> Result<&'a Resource, PlatformError> {
    let resource = resources
        .lookup(name, 0)
        .ok_or_else(|| PlatformError::DefaultNotFound {
            board: board.to_string(),
            role,
            name: name.to_string(),
        })?;
    let wrong = resource
        .leaves()
        .iter()
        .map(|leaf| leaf.pins.direction())
        .find(|dir| *dir != Direction::In);
    if let Some(direction) = wrong {
        return Err(PlatformError::DefaultNotInput {
            board: board.to_string(),
            role,
            name: name.to_string(),
            direction,
        });
    }
    Ok(resource)
}

/// A resource may land on a connector pad only if it reached the pad through
/// that connector or the connector lists the pad as shared.
fn check_connector_aliasing(
    board: &str,
    resources: &ResourceTable,
    connectors: &ConnectorTable,
) -> Result<(), PlatformError> {
    let mut pad_connector: BTreeMap<&str, &Connector> = BTreeMap::new();
    for connector in connectors.iter() {
        for pad in connector.pads().iter().filter(|p| *p != NOT_CONNECTED) {
            pad_connector.entry(pad.as_str()).or_insert(connector);
        }
    }

    for resource in resources.iter() {
        for leaf in resource.leaves() {
            let via = leaf.pins.connector();
            for pad in leaf.pins.physical_pads() {
                let Some(connector) = pad_connector.get(pad) else {
                    continue;
                };
                let through = via.is_some_and(|r| {
                    r.name == connector.name() && r.index == connector.index()
                });
                if !through && !connector.shares(pad) {
                    return Err(PlatformError::ConnectorAlias {
                        board: board.to_string(),
                        pad: pad.to_string(),
                        connector: format!("{}#{}", connector.name(), connector.index()),
                        resource: resource.key(),
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::{ConfigClock, FlashImage};
    use bsp_common::Frequency;
    use bsp_resource::{Pins, ResourceError};

    fn settings() -> ToolchainSettings {
        ToolchainSettings {
            reset_false_path: true,
            overtemp_power_down: true,
            config_clock: ConfigClock::ExternalMasterDiv1,
            spi_bus_width: 4,
            spi_fall_edge: true,
            compress: true,
            config_voltage: "3.3".to_string(),
            cfgbvs: "VCCO".to_string(),
            flash: FlashImage::mcs_16mb(),
        }
    }

    fn variant() -> VariantOverride {
        VariantOverride::new("test", "xc7a35t", "csg324", "1")
    }

    fn clk100() -> Resource {
        Resource::new("clk100", 0, Pins::new("E3", Direction::In).unwrap())
            .with_clock(Frequency::from_mhz(100.0))
    }

    fn rst() -> Resource {
        Resource::new("rst", 0, Pins::inverted("C2", Direction::In).unwrap())
    }

    fn base() -> BaseDescriptor {
        BaseDescriptor::new(settings())
            .default_clock("clk100")
            .default_reset("rst")
            .resource(clk100())
            .resource(rst())
    }

    #[test]
    fn builds_and_looks_up() {
        let board = base().instantiate(&variant()).unwrap();
        assert_eq!(board.name(), "test");
        assert_eq!(board.part(), "xc7a35tcsg324-1");
        assert_eq!(board.default_clock().unwrap().name(), "clk100");
        assert_eq!(board.default_reset().unwrap().name(), "rst");
        assert!(board.resource("led", 0).is_none());
    }

    #[test]
    fn missing_default_clock() {
        let base = BaseDescriptor::new(settings())
            .default_clock("clk100")
            .resource(rst());
        let err = base.instantiate(&variant()).unwrap_err();
        assert!(err.is_invalid_platform());
        assert_eq!(
            err,
            PlatformError::DefaultNotFound {
                board: "test".to_string(),
                role: DefaultRole::Clock,
                name: "clk100".to_string(),
            }
        );
    }

    #[test]
    fn default_reset_must_be_input() {
        let base = BaseDescriptor::new(settings())
            .default_reset("rst")
            .resource(Resource::new("rst", 0, Pins::new("C2", Direction::Out).unwrap()));
        let err = base.instantiate(&variant()).unwrap_err();
        assert!(matches!(
            err,
            PlatformError::DefaultNotInput {
                direction: Direction::Out,
                ..
            }
        ));
    }

    #[test]
    fn default_clock_needs_frequency() {
        let base = BaseDescriptor::new(settings())
            .default_clock("clk")
            .resource(Resource::new("clk", 0, Pins::new("E3", Direction::In).unwrap()));
        let err = base.instantiate(&variant()).unwrap_err();
        assert!(matches!(err, PlatformError::ClockWithoutFrequency { .. }));
    }

    #[test]
    fn empty_silicon_field_rejected() {
        let err = base()
            .instantiate(&VariantOverride::new("test", "xc7a35t", "", "1"))
            .unwrap_err();
        assert_eq!(
            err,
            PlatformError::MissingSilicon {
                board: "test".to_string(),
                field: "package",
            }
        );
    }

    #[test]
    fn pad_conflict_surfaces_as_resource_error() {
        let base = base().resource(Resource::new("led", 0, Pins::new("E3", Direction::Out).unwrap()));
        let err = base.instantiate(&variant()).unwrap_err();
        assert!(matches!(
            err,
            PlatformError::Resource(ResourceError::PadConflict { .. })
        ));
    }

    #[test]
    fn connector_pins_resolve() {
        let base = base()
            .connector(Connector::new("gpio", 0, "J5 H5 K2 J2"))
            .resource(Resource::new(
                "pmod_led",
                0,
                Pins::new("1 3", Direction::Out).unwrap().on_connector("gpio", 0),
            ));
        let board = base.instantiate(&variant()).unwrap();
        assert_eq!(
            board.resource("pmod_led", 0).unwrap().expanded_pads(),
            vec!["J5", "K2"]
        );
    }

    #[test]
    fn undeclared_connector_alias_rejected() {
        let base = base()
            .connector(Connector::new("gpio", 0, "J5 H5 K2 J2"))
            .resource(Resource::new("led", 0, Pins::new("K2", Direction::Out).unwrap()));
        let err = base.instantiate(&variant()).unwrap_err();
        assert_eq!(
            err,
            PlatformError::ConnectorAlias {
                board: "test".to_string(),
                pad: "K2".to_string(),
                connector: "gpio#0".to_string(),
                resource: "led#0".to_string(),
            }
        );
    }

    #[test]
    fn declared_connector_sharing_accepted() {
        let base = base()
            .connector(Connector::new("gpio", 0, "J5 H5 K2 J2").with_shared_pads("K2"))
            .resource(Resource::new("led", 0, Pins::new("K2", Direction::Out).unwrap()));
        assert!(base.instantiate(&variant()).is_ok());
    }

    #[test]
    fn fixed_width_connector_mismatch() {
        let base = base()
            .connector_width(4)
            .connector(Connector::new("gpio", 0, "J5 H5 K2"));
        let err = base.instantiate(&variant()).unwrap_err();
        assert!(matches!(
            err,
            PlatformError::Resource(ResourceError::MalformedConnector { .. })
        ));
    }

    #[test]
    fn unknown_connector_position() {
        let base = base()
            .connector(Connector::new("gpio", 0, "J5 H5 K2 J2"))
            .resource(Resource::new(
                "pmod_led",
                0,
                Pins::new("5", Direction::Out).unwrap().on_connector("gpio", 0),
            ));
        let err = base.instantiate(&variant()).unwrap_err();
        assert!(matches!(
            err,
            PlatformError::Resource(ResourceError::ConnectorPosition { .. })
        ));
    }

    #[test]
    fn descriptor_serializes() {
        let board = base().instantiate(&variant()).unwrap();
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json["name"], "test");
        assert_eq!(json["silicon"]["device"], "xc7a35t");
        assert_eq!(json["default_clock"], "clk100");
        assert_eq!(json["resources"][0]["name"], "clk100");
    }
}
