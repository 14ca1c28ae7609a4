//! Graphics Support for EPDs

use crate::buffer_len;
use crate::color::Color;
use crate::epd2in13::{HEIGHT as PANEL_HEIGHT, WIDTH as PANEL_WIDTH};
use crate::traits::MonoBitmap;
use embedded_graphics_core::pixelcolor::BinaryColor;
use embedded_graphics_core::prelude::*;

/// In-memory 1 bit per pixel image used for drawing with embedded graphics
///
/// It is handed to the driver as a [`MonoBitmap`], the driver packs it for the
/// panel depending on its orientation.
///
/// - WIDTH: width in pixel
/// - HEIGHT: height in pixel
/// - BYTECOUNT: This is redundant with prvious data and should be removed when const generic
///              expressions are stabilized
pub struct ImageBuffer<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> {
    buffer: [u8; BYTECOUNT],
}

/// Image with the same size as the panel
pub type PortraitImage = ImageBuffer<
    PANEL_WIDTH,
    PANEL_HEIGHT,
    { buffer_len(PANEL_WIDTH as usize, PANEL_HEIGHT as usize) },
>;

/// Image rotated by 90° against the panel
pub type LandscapeImage = ImageBuffer<
    PANEL_HEIGHT,
    PANEL_WIDTH,
    { buffer_len(PANEL_HEIGHT as usize, PANEL_WIDTH as usize) },
>;

impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> Default
    for ImageBuffer<WIDTH, HEIGHT, BYTECOUNT>
{
    /// Initialize the image all white
    // inline is necessary here to allow heap allocation via Box on stack limited programs
    #[inline(always)]
    fn default() -> Self {
        assert_eq!(BYTECOUNT, buffer_len(WIDTH as usize, HEIGHT as usize));
        Self {
            buffer: [Color::White.get_byte_value(); BYTECOUNT],
        }
    }
}

impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize>
    ImageBuffer<WIDTH, HEIGHT, BYTECOUNT>
{
    /// get internal buffer
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Sets every pixel to `color`
    pub fn fill(&mut self, color: Color) {
        self.buffer.fill(color.get_byte_value());
    }

    /// Set a specific pixel color on this image, out of range pixels are dropped
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        let (index, bit) = Self::position(x, y);
        match color {
            Color::White => self.buffer[index] |= bit,
            Color::Black => self.buffer[index] &= !bit,
        }
    }

    fn position(x: u32, y: u32) -> (usize, u8) {
        let line_bytes = (WIDTH as usize + 7) / 8;
        (
            x as usize / 8 + y as usize * line_bytes,
            0x80 >> (x % 8),
        )
    }
}

impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> MonoBitmap
    for ImageBuffer<WIDTH, HEIGHT, BYTECOUNT>
{
    fn width(&self) -> u32 {
        WIDTH
    }

    fn height(&self) -> u32 {
        HEIGHT
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        let (index, bit) = Self::position(x, y);
        if self.buffer[index] & bit != 0 {
            Color::White
        } else {
            Color::Black
        }
    }
}

/// For use with embedded_grahics
impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> DrawTarget
    for ImageBuffer<WIDTH, HEIGHT, BYTECOUNT>
{
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            self.set_pixel(point.x as u32, point.y as u32, color.into());
        }
        Ok(())
    }
}

/// For use with embedded_grahics
impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> OriginDimensions
    for ImageBuffer<WIDTH, HEIGHT, BYTECOUNT>
{
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packer::{pack, FRAME_LEN, LINE_WIDTH};
    use embedded_graphics::{
        prelude::*,
        primitives::{Line, PrimitiveStyle, Rectangle},
    };

    // test buffer length
    #[test]
    fn graphics_size() {
        assert_eq!(PortraitImage::default().buffer().len(), 4000);
        assert_eq!(LandscapeImage::default().buffer().len(), 4096);
    }

    // test default background color on all bytes
    #[test]
    fn graphics_default() {
        let image = PortraitImage::default();
        for &byte in image.buffer() {
            assert_eq!(byte, Color::White.get_byte_value());
        }
    }

    #[test]
    fn line_draws_black_pixels() {
        let mut image = PortraitImage::default();

        let _ = Line::new(Point::new(0, 0), Point::new(7, 0))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut image);

        assert_eq!(image.buffer()[0], Color::Black.get_byte_value());
        for &byte in image.buffer().iter().skip(1) {
            assert_eq!(byte, Color::White.get_byte_value());
        }
        assert_eq!(image.pixel(3, 0), Color::Black);
        assert_eq!(image.pixel(8, 0), Color::White);
    }

    #[test]
    fn out_of_range_pixels_are_dropped() {
        let mut image = PortraitImage::default();
        let _ = Line::new(Point::new(-5, -5), Point::new(-1, -1))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut image);
        image.set_pixel(PANEL_WIDTH, 0, Color::Black);
        assert!(image.buffer().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn landscape_image_packs_rotated() {
        let mut image = LandscapeImage::default();
        let _ = Rectangle::new(Point::new(0, 0), Size::new(1, 8))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut image);

        // first source column lands in the first device row
        let frame = pack(&image).unwrap();
        assert_eq!(frame.buffer()[0], 0x00);
        assert!(frame.buffer()[1..].iter().all(|&b| b == 0xFF));
        assert_eq!(frame.buffer().len(), FRAME_LEN);
        assert_eq!(frame.buffer()[LINE_WIDTH], 0xFF);
    }

    #[test]
    fn fill_and_redraw() {
        let mut image = PortraitImage::default();
        image.fill(Color::Black);
        assert!(image.buffer().iter().all(|&b| b == 0x00));
        image.clear(BinaryColor::Off).unwrap();
        assert!(image.buffer().iter().all(|&b| b == 0xFF));
    }
}
