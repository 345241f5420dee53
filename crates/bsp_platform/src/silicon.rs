//! Silicon identity: which FPGA part a board carries.

use serde::Serialize;

/// The device, package, and speed grade of the FPGA on a board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SiliconIdentity {
    /// Device name, e.g. `xc7a100t`.
    pub device: String,
    /// Package, e.g. `fgg484`.
    pub package: String,
    /// Speed grade, e.g. `2L`.
    pub speed: String,
}

impl SiliconIdentity {
    /// Creates a silicon identity.
    pub fn new(
        device: impl Into<String>,
        package: impl Into<String>,
        speed: impl Into<String>,
    ) -> Self {
        Self {
            device: device.into(),
            package: package.into(),
            speed: speed.into(),
        }
    }

    /// Returns the vendor part string, e.g. `xc7a100tfgg484-2L`.
    pub fn part(&self) -> String {
        format!("{}{}-{}", self.device, self.package, self.speed)
    }
}

/// The per-board record applied to a [`BaseDescriptor`](crate::BaseDescriptor):
/// a board name plus the silicon it carries. Nothing else may differ between
/// variants of one family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantOverride {
    /// The board name, e.g. `litefury`.
    pub name: String,
    /// The FPGA fitted to this variant.
    pub silicon: SiliconIdentity,
}

impl VariantOverride {
    /// Creates a variant override.
    pub fn new(
        name: impl Into<String>,
        device: impl Into<String>,
        package: impl Into<String>,
        speed: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            silicon: SiliconIdentity::new(device, package, speed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_string() {
        assert_eq!(
            SiliconIdentity::new("xc7a200t", "fbg484", "3").part(),
            "xc7a200tfbg484-3"
        );
        assert_eq!(
            SiliconIdentity::new("xc7a50t", "csg325", "2").part(),
            "xc7a50tcsg325-2"
        );
    }

    #[test]
    fn override_carries_silicon() {
        let v = VariantOverride::new("litefury", "xc7a100t", "fgg484", "2L");
        assert_eq!(v.name, "litefury");
        assert_eq!(v.silicon.part(), "xc7a100tfgg484-2L");
    }
}
