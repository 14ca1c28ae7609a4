//! A simple Driver for the Waveshare 2.13" (128x250) E-Ink Display via SPI
//!
//! This driver was built using [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/1.0
//!
//! # Requirements
//!
//! ### SPI
//!
//! - MISO is not connected/available
//! - SPI_MODE_0 is used (CPHL = 0, CPOL = 0)
//! - 8 bits per word, MSB first
//! - The reference code runs the bus at 2Mhz
//!
//! ### Other....
//!
//! - Buffersize: a packed frame always has the size `ceil(width / 8) * height`,
//!   see [`buffer_len`]
//! - x coordinates of windows are byte aligned, the low 3 bits are ignored by the controller
//!
//! # Examples
//!
//! ```ignore
//! use epd2in13::prelude::*;
//!
//! let interface = DisplayInterface::new(spi, busy, dc, rst, delay);
//! let mut epd = Epd2in13::new(interface, Config::default());
//!
//! epd.initialize(UpdateMode::Full)?;
//!
//! let mut image = PortraitImage::default();
//! // draw something into the image
//!
//! epd.display(&image)?;
//!
//! // switch to the partial waveform for quick redraws
//! epd.initialize(UpdateMode::Partial)?;
//! epd.display_partial(&image)?;
//!
//! epd.sleep()?;
//! ```
//!
#![no_std]

#[cfg(feature = "graphics")]
pub mod graphics;

mod traits;

pub mod color;
pub mod error;

/// Interface for the physical connection between display and the controlling device
pub mod interface;

pub mod packer;
pub mod window;

pub mod epd2in13;

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::epd2in13::{Config, DriverState, Epd2in13, UpdateMode};
    pub use crate::error::Error;
    pub use crate::interface::DisplayInterface;
    pub use crate::packer::{PackedFrame, PanelGeometry};
    pub use crate::traits::{MonoBitmap, Transport};
    pub use crate::SPI_MODE;

    #[cfg(feature = "graphics")]
    pub use crate::graphics::{LandscapeImage, PortraitImage};
}

pub use crate::traits::{MonoBitmap, Transport};

use embedded_hal::spi::{Mode, Phase, Polarity};

/// SPI mode -
/// For more infos see [Requirements: SPI](index.html#spi)
pub const SPI_MODE: Mode = Mode {
    phase: Phase::CaptureOnFirstTransition,
    polarity: Polarity::IdleLow,
};

/// Computes the needed buffer length. Takes care of rounding up in case width
/// is not divisible by 8.
///
///  unused
///  bits        width
/// <----><------------------------>
/// \[XXXXX210\]\[76543210\]...\[76543210\] ^
/// \[XXXXX210\]\[76543210\]...\[76543210\] | height
/// \[XXXXX210\]\[76543210\]...\[76543210\] v
pub const fn buffer_len(width: usize, height: usize) -> usize {
    (width + 7) / 8 * height
}

#[cfg(test)]
mod tests {
    use super::buffer_len;

    #[test]
    fn buffer_len_rounds_up() {
        assert_eq!(buffer_len(128, 250), 4000);
        assert_eq!(buffer_len(122, 250), 4000);
        assert_eq!(buffer_len(8, 1), 1);
        assert_eq!(buffer_len(9, 2), 4);
    }
}
