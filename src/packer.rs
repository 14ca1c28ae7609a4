//! Conversion of monochrome bitmaps into the controller's RAM layout
//!
//! A packed frame holds 8 horizontally adjacent pixels per byte, bit 7 being
//! the leftmost one. A set bit is white, a cleared bit is black.

use crate::buffer_len;
use crate::epd2in13::{HEIGHT, WIDTH};
use crate::traits::MonoBitmap;
use crate::window::WindowRect;

/// Size of a panel in pixels
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PanelGeometry {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl PanelGeometry {
    /// Construct a new geometry
    pub const fn new(width: u32, height: u32) -> PanelGeometry {
        PanelGeometry { width, height }
    }

    /// Bytes per row, rounded up to whole bytes
    pub const fn line_width(&self) -> usize {
        (self.width as usize + 7) / 8
    }

    /// Length of a packed frame for this geometry
    pub const fn buffer_len(&self) -> usize {
        buffer_len(self.width as usize, self.height as usize)
    }

    /// Window covering the whole panel, a zero sized geometry gives a
    /// single pixel window at the origin
    pub const fn full_window(&self) -> WindowRect {
        WindowRect::full(self.width, self.height)
    }
}

/// The geometry of the 2.13" panel this crate drives
pub const PANEL: PanelGeometry = PanelGeometry::new(WIDTH, HEIGHT);

/// Bytes in a packed full panel frame
pub const FRAME_LEN: usize = PANEL.buffer_len();

/// Bytes in one packed panel row
pub const LINE_WIDTH: usize = PANEL.line_width();

/// Errors of the packing functions
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PackError {
    /// Bitmap size fits neither orientation, or has no usable area
    InvalidGeometry {
        /// Width of the rejected bitmap
        width: u32,
        /// Height of the rejected bitmap
        height: u32,
    },
    /// Window origin outside of the panel
    OutOfBounds {
        /// Requested x origin
        x: u32,
        /// Requested y origin
        y: u32,
    },
}

/// How a bitmap maps onto the panel
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Orientation {
    /// Same size as the panel, mirrored horizontally
    Direct,
    /// Width and height swapped, rotated by 90°
    Rotated,
}

impl Orientation {
    /// Picks the orientation by comparing the bitmap size with the panel
    pub fn detect<B: MonoBitmap + ?Sized>(bitmap: &B, geometry: PanelGeometry) -> Option<Self> {
        let (width, height) = (bitmap.width(), bitmap.height());
        if width == geometry.width && height == geometry.height {
            Some(Orientation::Direct)
        } else if width == geometry.height && height == geometry.width {
            Some(Orientation::Rotated)
        } else {
            None
        }
    }
}

/// A packed full panel frame, ready for `WriteRam`
#[derive(Clone, PartialEq, Eq)]
pub struct PackedFrame {
    buffer: [u8; FRAME_LEN],
}

impl Default for PackedFrame {
    /// An all white frame
    fn default() -> Self {
        PackedFrame {
            buffer: [0xFF; FRAME_LEN],
        }
    }
}

impl core::fmt::Debug for PackedFrame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PackedFrame")
            .field("len", &self.buffer.len())
            .finish()
    }
}

impl PackedFrame {
    /// get internal buffer to use it (to draw in epd)
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }
}

/// Packs a bitmap for the 2.13" panel
pub fn pack<B: MonoBitmap + ?Sized>(bitmap: &B) -> Result<PackedFrame, PackError> {
    let mut frame = PackedFrame::default();
    pack_into(bitmap, PANEL, &mut frame.buffer)?;
    Ok(frame)
}

/// Packs a bitmap for any panel geometry into `buffer`
///
/// The buffer is reset to all white first. Its length has to be
/// `geometry.buffer_len()`, anything else is a programming error.
pub fn pack_into<B: MonoBitmap + ?Sized>(
    bitmap: &B,
    geometry: PanelGeometry,
    buffer: &mut [u8],
) -> Result<(), PackError> {
    assert_eq!(buffer.len(), geometry.buffer_len());

    let orientation = Orientation::detect(bitmap, geometry).ok_or(PackError::InvalidGeometry {
        width: bitmap.width(),
        height: bitmap.height(),
    })?;

    buffer.fill(0xFF);
    let line_width = geometry.line_width();
    let (width, height) = (bitmap.width(), bitmap.height());

    for y in 0..height {
        for x in 0..width {
            if !bitmap.pixel(x, y).is_black() {
                continue;
            }
            let (index, mask) = match orientation {
                Orientation::Direct => {
                    let new_x = width - x;
                    (
                        new_x as usize / 8 + y as usize * line_width,
                        0x80 >> (new_x % 8),
                    )
                }
                Orientation::Rotated => {
                    let new_x = y;
                    let new_y = geometry.height - x - 1;
                    let new_y = width - new_y - 1;
                    (
                        new_x as usize / 8 + new_y as usize * line_width,
                        0x80 >> (y % 8),
                    )
                }
            };
            // mirroring maps column 0 one past the row end, clip what falls off the buffer
            if let Some(byte) = buffer.get_mut(index) {
                *byte &= !mask;
            }
        }
    }
    Ok(())
}

/// A bitmap placed at a window of the panel, streamed row by row
///
/// Created by [`pack_windowed`]. Each row is written after setting the RAM
/// cursor to its start.
pub struct WindowedFrame<'a, B: ?Sized> {
    bitmap: &'a B,
    rect: WindowRect,
}

impl<'a, B: MonoBitmap + ?Sized> WindowedFrame<'a, B> {
    /// The clipped window on the panel
    pub fn rect(&self) -> WindowRect {
        self.rect
    }

    /// Total number of data bytes over all rows
    pub fn len(&self) -> usize {
        self.rect.bytes_per_row() * self.rect.rows() as usize
    }

    /// `true` if the window holds no bytes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows in streaming order, top to bottom
    pub fn rows(&self) -> WindowRows<'a, B> {
        WindowRows {
            bitmap: self.bitmap,
            rect: self.rect,
            next_y: self.rect.y_start,
        }
    }
}

/// Iterator over the rows of a [`WindowedFrame`]
pub struct WindowRows<'a, B: ?Sized> {
    bitmap: &'a B,
    rect: WindowRect,
    next_y: u32,
}

/// One packed row of a window
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct WindowRow {
    x: u32,
    y: u32,
    bytes: [u8; LINE_WIDTH],
    len: usize,
}

impl WindowRow {
    /// Panel column of the first pixel
    pub fn x(&self) -> u32 {
        self.x
    }

    /// Panel row
    pub fn y(&self) -> u32 {
        self.y
    }

    /// Packed data of this row
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl<'a, B: MonoBitmap + ?Sized> Iterator for WindowRows<'a, B> {
    type Item = WindowRow;

    fn next(&mut self) -> Option<WindowRow> {
        if self.next_y > self.rect.y_end {
            return None;
        }
        let y = self.next_y;
        self.next_y += 1;

        let mut row = WindowRow {
            x: self.rect.x_start,
            y,
            bytes: [0u8; LINE_WIDTH],
            len: 0,
        };
        let mut byte_to_send = 0x00u8;
        // 1 byte = 8 pixels, the window is byte aligned on both ends
        for i in self.rect.x_start..=self.rect.x_end {
            let color = self
                .bitmap
                .pixel(i - self.rect.x_start, y - self.rect.y_start);
            if !color.is_black() {
                byte_to_send |= 0x80 >> (i % 8);
            }
            if i % 8 == 7 {
                row.bytes[row.len] = byte_to_send;
                row.len += 1;
                byte_to_send = 0x00;
            }
        }
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.rect.y_end + 1).saturating_sub(self.next_y) as usize;
        (remaining, Some(remaining))
    }
}

impl<'a, B: MonoBitmap + ?Sized> ExactSizeIterator for WindowRows<'a, B> {}

/// Places a bitmap with its top left corner at (x, y)
///
/// `x` and the bitmap width are rounded down to multiples of 8, the window is
/// clipped at the panel edges.
pub fn pack_windowed<B: MonoBitmap + ?Sized>(
    bitmap: &B,
    x: u32,
    y: u32,
) -> Result<WindowedFrame<'_, B>, PackError> {
    if x >= WIDTH || y >= HEIGHT {
        return Err(PackError::OutOfBounds { x, y });
    }

    // x point must be the multiple of 8 or the last 3 bits will be ignored
    let x = x & !7;
    let image_width = bitmap.width() & !7;
    let image_height = bitmap.height();
    if image_width == 0 || image_height == 0 {
        return Err(PackError::InvalidGeometry {
            width: bitmap.width(),
            height: image_height,
        });
    }

    let x_end = if x.saturating_add(image_width) >= WIDTH {
        WIDTH - 1
    } else {
        x + image_width - 1
    };
    let y_end = if y.saturating_add(image_height) >= HEIGHT {
        HEIGHT - 1
    } else {
        y + image_height - 1
    };

    Ok(WindowedFrame {
        bitmap,
        rect: WindowRect::new(x, y, x_end, y_end),
    })
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::color::Color;
    use std::vec;
    use std::vec::Vec;

    /// Solid bitmap with an optional list of differently colored pixels
    struct TestBitmap {
        width: u32,
        height: u32,
        fill: Color,
        marks: Vec<(u32, u32)>,
    }

    impl TestBitmap {
        fn solid(width: u32, height: u32, fill: Color) -> Self {
            TestBitmap {
                width,
                height,
                fill,
                marks: Vec::new(),
            }
        }

        fn with_black(width: u32, height: u32, marks: Vec<(u32, u32)>) -> Self {
            TestBitmap {
                width,
                height,
                fill: Color::White,
                marks,
            }
        }
    }

    impl MonoBitmap for TestBitmap {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn pixel(&self, x: u32, y: u32) -> Color {
            assert!(x < self.width && y < self.height);
            if self.marks.contains(&(x, y)) {
                self.fill.inverse()
            } else {
                self.fill
            }
        }
    }

    #[test]
    fn panel_constants() {
        assert_eq!(FRAME_LEN, 4000);
        assert_eq!(LINE_WIDTH, 16);
        assert_eq!(PANEL.full_window(), WindowRect::new(0, 0, 127, 249));
    }

    #[test]
    fn white_bitmap_packs_to_all_ff_for_any_geometry() {
        for &(w, h) in &[(8, 1), (16, 16), (128, 250), (200, 200), (64, 3)] {
            let geometry = PanelGeometry::new(w, h);
            let mut buffer = vec![0u8; geometry.buffer_len()];
            pack_into(&TestBitmap::solid(w, h, Color::White), geometry, &mut buffer).unwrap();
            assert_eq!(buffer.len(), (w / 8 * h) as usize);
            assert!(buffer.iter().all(|&b| b == 0xFF));
        }
    }

    #[test]
    fn black_direct_bitmap_packs_to_all_zero() {
        let frame = pack(&TestBitmap::solid(WIDTH, HEIGHT, Color::Black)).unwrap();
        assert_eq!(frame.buffer().len(), FRAME_LEN);
        assert!(frame.buffer().iter().all(|&b| b == 0x00));
    }

    #[test]
    fn black_rotated_bitmap_packs_to_all_zero() {
        let frame = pack(&TestBitmap::solid(HEIGHT, WIDTH, Color::Black)).unwrap();
        assert!(frame.buffer().iter().all(|&b| b == 0x00));
    }

    #[test]
    fn single_pixel_direct_orientation() {
        for &(x, y) in &[(1, 0), (5, 7), (64, 100), (127, 249), (100, 3)] {
            let frame = pack(&TestBitmap::with_black(WIDTH, HEIGHT, vec![(x, y)])).unwrap();
            let device_x = WIDTH - x;
            let index = (device_x / 8) as usize + y as usize * LINE_WIDTH;
            let mask = 0x80u8 >> (device_x % 8);
            for (i, &byte) in frame.buffer().iter().enumerate() {
                if i == index {
                    assert_eq!(byte, !mask, "pixel ({}, {})", x, y);
                } else {
                    assert_eq!(byte, 0xFF, "pixel ({}, {}) touched byte {}", x, y, i);
                }
            }
        }
    }

    #[test]
    fn column_zero_wraps_to_next_row_and_clips_at_the_end() {
        let frame = pack(&TestBitmap::with_black(WIDTH, HEIGHT, vec![(0, 0)])).unwrap();
        assert_eq!(frame.buffer()[LINE_WIDTH], 0x7F);

        let frame = pack(&TestBitmap::with_black(WIDTH, HEIGHT, vec![(0, HEIGHT - 1)])).unwrap();
        assert!(frame.buffer().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn single_pixel_rotated_orientation() {
        // source x becomes the device row, source y the device column
        let frame = pack(&TestBitmap::with_black(HEIGHT, WIDTH, vec![(10, 3)])).unwrap();
        let index = 10 * LINE_WIDTH;
        assert_eq!(frame.buffer()[index], !(0x80 >> 3));
        assert_eq!(
            frame.buffer().iter().filter(|&&b| b != 0xFF).count(),
            1
        );

        let frame = pack(&TestBitmap::with_black(HEIGHT, WIDTH, vec![(249, 127)])).unwrap();
        assert_eq!(frame.buffer()[FRAME_LEN - 1], !0x01);
    }

    #[test]
    fn mismatched_bitmap_is_rejected() {
        let err = pack(&TestBitmap::solid(100, 100, Color::Black)).unwrap_err();
        assert_eq!(
            err,
            PackError::InvalidGeometry {
                width: 100,
                height: 100
            }
        );
    }

    #[test]
    fn windowed_full_panel() {
        let bitmap = TestBitmap::solid(WIDTH, HEIGHT, Color::Black);
        let frame = pack_windowed(&bitmap, 0, 0).unwrap();
        assert_eq!(frame.rect(), WindowRect::new(0, 0, 127, 249));
        assert_eq!(frame.len(), FRAME_LEN);

        let rows: Vec<WindowRow> = frame.rows().collect();
        assert_eq!(rows.len(), 250);
        for (j, row) in rows.iter().enumerate() {
            assert_eq!(row.y(), j as u32);
            assert_eq!(row.x(), 0);
            assert_eq!(row.bytes(), &[0u8; 16][..]);
        }
    }

    #[test]
    fn windowed_is_not_mirrored() {
        let bitmap = TestBitmap::with_black(16, 2, vec![(0, 0), (9, 1)]);
        let frame = pack_windowed(&bitmap, 8, 4).unwrap();
        assert_eq!(frame.rect(), WindowRect::new(8, 4, 23, 5));

        let rows: Vec<WindowRow> = frame.rows().collect();
        assert_eq!(rows[0].bytes(), &[0x7F, 0xFF]);
        assert_eq!(rows[1].bytes(), &[0xFF, 0xBF]);
    }

    #[test]
    fn windowed_aligns_and_clips() {
        // x 13 -> 8, width 21 -> 16
        let bitmap = TestBitmap::solid(21, 5, Color::White);
        let frame = pack_windowed(&bitmap, 13, 0).unwrap();
        assert_eq!(frame.rect(), WindowRect::new(8, 0, 23, 4));

        // clipped at the right and the bottom edge
        let bitmap = TestBitmap::solid(64, 64, Color::White);
        let frame = pack_windowed(&bitmap, 96, 240).unwrap();
        assert_eq!(frame.rect(), WindowRect::new(96, 240, 127, 249));
        assert_eq!(frame.rows().len(), 10);
        assert!(frame.rows().all(|row| row.bytes() == [0xFF; 4]));
    }

    #[test]
    fn windowed_clips_oversized_bitmaps() {
        let wide = TestBitmap::solid(u32::MAX, 4, Color::White);
        let frame = pack_windowed(&wide, 8, 0).unwrap();
        assert_eq!(frame.rect(), WindowRect::new(8, 0, 127, 3));
        assert_eq!(frame.rows().len(), 4);

        let tall = TestBitmap::solid(8, u32::MAX, Color::Black);
        let frame = pack_windowed(&tall, 0, 1).unwrap();
        assert_eq!(frame.rect(), WindowRect::new(0, 1, 7, 249));
        assert_eq!(frame.rows().len(), 249);
        assert!(frame.rows().all(|row| row.bytes() == [0x00]));
    }

    #[test]
    fn zero_sized_geometry_has_origin_window() {
        assert_eq!(
            PanelGeometry::new(0, 0).full_window(),
            WindowRect::new(0, 0, 0, 0)
        );
        assert_eq!(PanelGeometry::new(0, 0).buffer_len(), 0);
    }

    #[test]
    fn windowed_rejects_degenerate_input() {
        let narrow = TestBitmap::solid(7, 10, Color::White);
        assert_eq!(
            pack_windowed(&narrow, 0, 0).err(),
            Some(PackError::InvalidGeometry {
                width: 7,
                height: 10
            })
        );

        let bitmap = TestBitmap::solid(8, 8, Color::White);
        assert_eq!(
            pack_windowed(&bitmap, 128, 0).err(),
            Some(PackError::OutOfBounds { x: 128, y: 0 })
        );
        assert_eq!(
            pack_windowed(&bitmap, 0, 250).err(),
            Some(PackError::OutOfBounds { x: 0, y: 250 })
        );
    }
}
