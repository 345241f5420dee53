//! Helpers that expand common peripherals into resource lists.

use bsp_common::Direction;
use bsp_resource::{Attrs, Pins, Resource, ResourceError, Subsignal};

/// One `led` resource per pad, indexed in pad order, all with `attrs`.
pub fn led_resources(pads: &str, attrs: &Attrs) -> Result<Vec<Resource>, ResourceError> {
    pads.split_whitespace()
        .enumerate()
        .map(|(index, pad)| -> Result<Resource, ResourceError> {
            let index = u32::try_from(index)
                .map_err(|_| ResourceError::InvalidPins("too many LEDs".to_string()))?;
            let pins = Pins::new(pad, Direction::Out)?;
            Ok(Resource::new("led", index, pins).with_attrs(attrs.clone()))
        })
        .collect()
}

/// Pads of a quad-capable SPI configuration flash.
///
/// `clk` may be `-` when the clock is driven through a dedicated
/// configuration pin rather than user I/O.
#[derive(Debug, Clone, Copy)]
pub struct SpiFlashPads<'a> {
    /// Active-low chip select.
    pub cs_n: &'a str,
    /// Serial clock.
    pub clk: &'a str,
    /// Controller out, peripheral in (DQ0).
    pub copi: &'a str,
    /// Controller in, peripheral out (DQ1).
    pub cipo: &'a str,
    /// Active-low write protect (DQ2).
    pub wp_n: &'a str,
    /// Active-low hold (DQ3).
    pub hold_n: &'a str,
}

/// Share group used by every view of one flash.
pub fn spi_flash_share_group(index: u32) -> String {
    format!("spi_flash#{index}")
}

/// The `spi_flash_1x`, `spi_flash_2x` and `spi_flash_4x` views of one flash.
///
/// All three claim the same pads and declare a common share group so the
/// resource table accepts the overlap. A design requests exactly one.
pub fn spi_flash_resources(
    index: u32,
    pads: &SpiFlashPads<'_>,
    attrs: &Attrs,
) -> Result<Vec<Resource>, ResourceError> {
    let common = || -> Result<Vec<Subsignal>, ResourceError> {
        Ok(vec![
            Subsignal::new("cs", Pins::inverted(pads.cs_n, Direction::Out)?),
            Subsignal::new("clk", Pins::new(pads.clk, Direction::Out)?.assert_width(1)?),
        ])
    };

    let mut x1 = common()?;
    x1.extend([
        Subsignal::new("copi", Pins::new(pads.copi, Direction::Out)?.assert_width(1)?),
        Subsignal::new("cipo", Pins::new(pads.cipo, Direction::In)?.assert_width(1)?),
        Subsignal::new("wp", Pins::inverted(pads.wp_n, Direction::Out)?.assert_width(1)?),
        Subsignal::new("hold", Pins::inverted(pads.hold_n, Direction::Out)?.assert_width(1)?),
    ]);

    let mut x2 = common()?;
    x2.push(Subsignal::new(
        "dq",
        Pins::new(&format!("{} {}", pads.copi, pads.cipo), Direction::InOut)?,
    ));

    let mut x4 = common()?;
    x4.push(Subsignal::new(
        "dq",
        Pins::new(
            &format!("{} {} {} {}", pads.copi, pads.cipo, pads.wp_n, pads.hold_n),
            Direction::InOut,
        )?,
    ));

    [("spi_flash_1x", x1), ("spi_flash_2x", x2), ("spi_flash_4x", x4)]
        .into_iter()
        .map(|(name, subs)| -> Result<Resource, ResourceError> {
            Ok(Resource::composite(name, index, subs)?
                .with_attrs(attrs.clone())
                .shared_as(spi_flash_share_group(index)))
        })
        .collect()
}
