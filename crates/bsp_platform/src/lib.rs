//! Immutable board descriptors and the registry of supported boards.
//!
//! A [`PlatformDescriptor`] aggregates a board's resource and connector
//! tables, its default clock and reset, the silicon it carries, and the
//! configuration settings the toolchain needs. Descriptors are built once,
//! validated eagerly, and never mutated afterwards.
//!
//! Boards that differ only in the FPGA fitted are modelled as one
//! [`BaseDescriptor`] plus a [`VariantOverride`] per board, instantiated
//! through [`VariantFamily`].
//!
//! ```
//! use bsp_platform::BoardRegistry;
//!
//! let registry = BoardRegistry::builtin().unwrap();
//! let board = registry.get("litefury").unwrap();
//! assert_eq!(board.device_triplet(), ("xc7a100t", "fgg484", "2L"));
//! ```

#![warn(missing_docs)]

pub mod boards;
pub mod descriptor;
pub mod error;
pub mod families;
pub mod registry;
pub mod silicon;
pub mod toolchain;
pub mod variant;

pub use descriptor::PlatformDescriptor;
pub use error::{DefaultRole, PlatformError};
pub use families::{led_resources, spi_flash_resources, SpiFlashPads};
pub use registry::BoardRegistry;
pub use silicon::{SiliconIdentity, VariantOverride};
pub use toolchain::{ConfigClock, FlashFormat, FlashImage, LoadDirection, ToolchainSettings};
pub use variant::{BaseDescriptor, VariantFamily};
