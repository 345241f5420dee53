//! The resource table: a conflict-checked catalog of board resources.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::ResourceError;
use crate::resource::Resource;

/// An ordered catalog of resources keyed by `(name, index)`.
///
/// Insertion validates both keys and pads: no two resources share a key,
/// and no pad is owned by two resources unless both declare the same share
/// group. A rejected insertion leaves the table untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResourceTable {
    resources: Vec<Resource>,
    #[serde(skip)]
    by_key: BTreeMap<(String, u32), usize>,
    #[serde(skip)]
    pad_owners: BTreeMap<String, usize>,
}

impl ResourceTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a resource.
    ///
    /// Fails with [`ResourceError::DuplicateResource`] if `(name, index)` is
    /// taken and [`ResourceError::PadConflict`] if any expanded pad is already
    /// owned by a resource outside this one's share group.
    pub fn add(&mut self, resource: Resource) -> Result<(), ResourceError> {
        let key = (resource.name().to_string(), resource.index());
        if self.by_key.contains_key(&key) {
            return Err(ResourceError::DuplicateResource {
                name: key.0,
                index: key.1,
            });
        }
        if resource.has_unresolved_pins() {
            return Err(ResourceError::InvalidPins(format!(
                "'{}' refers to connector positions that were not resolved",
                resource.key()
            )));
        }

        let mut own = BTreeSet::new();
        for pad in resource.expanded_pads() {
            if !own.insert(pad) {
                return Err(ResourceError::InvalidPins(format!(
                    "pad {pad} appears twice in '{}'",
                    resource.key()
                )));
            }
            if let Some(&owner) = self.pad_owners.get(pad) {
                let owner = &self.resources[owner];
                let shared = matches!(
                    (owner.share_group(), resource.share_group()),
                    (Some(a), Some(b)) if a == b
                );
                if !shared {
                    return Err(ResourceError::PadConflict {
                        pad: pad.to_string(),
                        owner: owner.key(),
                        claimant: resource.key(),
                    });
                }
            }
        }

        let slot = self.resources.len();
        for pad in own {
            self.pad_owners.entry(pad.to_string()).or_insert(slot);
        }
        log::debug!(
            "resource {}: {} pad(s)",
            resource.key(),
            resource.expanded_pads().len()
        );
        self.by_key.insert(key, slot);
        self.resources.push(resource);
        Ok(())
    }

    /// Returns the resource with the given name and index.
    pub fn lookup(&self, name: &str, index: u32) -> Option<&Resource> {
        self.by_key
            .get(&(name.to_string(), index))
            .map(|&i| &self.resources[i])
    }

    /// Returns the first resource that claimed `pad`.
    pub fn owner_of(&self, pad: &str) -> Option<&Resource> {
        self.pad_owners.get(pad).map(|&i| &self.resources[i])
    }

    /// Iterates over every claimed pad and its first owner, in pad order.
    pub fn pads(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.pad_owners
            .iter()
            .map(|(pad, &i)| (pad.as_str(), &self.resources[i]))
    }

    /// Iterates over resources in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// Returns the number of resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins::Pins;
    use crate::resource::Subsignal;
    use bsp_common::Direction;

    fn led(index: u32, pad: &str) -> Resource {
        Resource::new("led", index, Pins::new(pad, Direction::Out).unwrap())
    }

    #[test]
    fn add_and_lookup() {
        let mut table = ResourceTable::new();
        table.add(led(0, "G3")).unwrap();
        table.add(led(1, "H3")).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("led", 1).unwrap().expanded_pads(), vec!["H3"]);
        assert!(table.lookup("led", 2).is_none());
        assert_eq!(table.owner_of("G3").unwrap().index(), 0);
    }

    #[test]
    fn duplicate_key_rejected() {
        let mut table = ResourceTable::new();
        table.add(led(0, "G3")).unwrap();
        let err = table.add(led(0, "H3")).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(
            err,
            ResourceError::DuplicateResource {
                name: "led".to_string(),
                index: 0,
            }
        );
        assert_eq!(table.len(), 1);
        assert!(table.owner_of("H3").is_none());
    }

    #[test]
    fn pad_conflict_rejected() {
        let mut table = ResourceTable::new();
        table.add(led(0, "G3")).unwrap();
        let err = table
            .add(Resource::new("button", 0, Pins::new("G3", Direction::In).unwrap()))
            .unwrap_err();
        assert!(err.is_duplicate());
        assert!(matches!(err, ResourceError::PadConflict { ref pad, .. } if pad == "G3"));
    }

    #[test]
    fn conflict_through_differential_complement() {
        let mut table = ResourceTable::new();
        table
            .add(Resource::new(
                "clk100",
                0,
                Pins::diff_pairs("F6", "E6", Direction::In).unwrap(),
            ))
            .unwrap();
        let err = table
            .add(Resource::new("user", 0, Pins::new("E6", Direction::In).unwrap()))
            .unwrap_err();
        assert!(matches!(err, ResourceError::PadConflict { .. }));
    }

    #[test]
    fn conflict_through_subsignal() {
        let mut table = ResourceTable::new();
        table.add(led(0, "K19")).unwrap();
        let ddr = Resource::composite(
            "ddr3",
            0,
            vec![Subsignal::new("odt", Pins::new("K19", Direction::Out).unwrap())],
        )
        .unwrap();
        let err = table.add(ddr).unwrap_err();
        assert_eq!(
            err,
            ResourceError::PadConflict {
                pad: "K19".to_string(),
                owner: "led#0".to_string(),
                claimant: "ddr3#0".to_string(),
            }
        );
    }

    #[test]
    fn share_group_allows_overlap() {
        let mut table = ResourceTable::new();
        table
            .add(
                Resource::new("flash_1x", 0, Pins::new("P22", Direction::Out).unwrap())
                    .shared_as("flash"),
            )
            .unwrap();
        table
            .add(
                Resource::new("flash_2x", 0, Pins::new("P22 R22", Direction::InOut).unwrap())
                    .shared_as("flash"),
            )
            .unwrap();
        assert_eq!(table.owner_of("P22").unwrap().name(), "flash_1x");
        assert_eq!(table.owner_of("R22").unwrap().name(), "flash_2x");
    }

    #[test]
    fn different_share_groups_conflict() {
        let mut table = ResourceTable::new();
        table
            .add(Resource::new("a", 0, Pins::new("P22", Direction::Out).unwrap()).shared_as("x"))
            .unwrap();
        let err = table
            .add(Resource::new("b", 0, Pins::new("P22", Direction::Out).unwrap()).shared_as("y"))
            .unwrap_err();
        assert!(err.is_duplicate());
    }

    #[test]
    fn placeholder_pads_never_conflict() {
        let mut table = ResourceTable::new();
        table
            .add(Resource::new("a", 0, Pins::new("-", Direction::Out).unwrap()))
            .unwrap();
        table
            .add(Resource::new("b", 0, Pins::new("-", Direction::Out).unwrap()))
            .unwrap();
        assert_eq!(table.pads().count(), 0);
    }

    #[test]
    fn unresolved_connector_pins_rejected() {
        let mut table = ResourceTable::new();
        let pins = Pins::new("1", Direction::Out).unwrap().on_connector("gpio", 0);
        let err = table.add(Resource::new("pmod_led", 0, pins)).unwrap_err();
        assert!(matches!(err, ResourceError::InvalidPins(_)));
    }

    #[test]
    fn repeated_pad_in_one_resource_rejected() {
        let mut table = ResourceTable::new();
        let err = table
            .add(Resource::new("bus", 0, Pins::new("A1 A1", Direction::Out).unwrap()))
            .unwrap_err();
        assert!(matches!(err, ResourceError::InvalidPins(_)));
    }
}
