//! RAM window and cursor addressing
//!
//! The controller addresses x in bytes (8 pixels) and y in gate lines split
//! into a low and a high byte. These helpers only translate pixel coordinates,
//! clamping to the panel is done by the caller.

/// A rectangle in panel pixel coordinates, both ends inclusive
///
/// The low 3 bits of `x_start` and `x_end` are ignored by the hardware, the
/// effective x granularity is 8 pixels.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct WindowRect {
    /// First column
    pub x_start: u32,
    /// First row
    pub y_start: u32,
    /// Last column
    pub x_end: u32,
    /// Last row
    pub y_end: u32,
}

impl WindowRect {
    /// Construct a new window
    pub const fn new(x_start: u32, y_start: u32, x_end: u32, y_end: u32) -> WindowRect {
        WindowRect {
            x_start,
            y_start,
            x_end,
            y_end,
        }
    }

    /// Window covering a whole panel of the given size
    ///
    /// An empty panel gives the single pixel window at the origin.
    pub const fn full(width: u32, height: u32) -> WindowRect {
        WindowRect::new(0, 0, width.saturating_sub(1), height.saturating_sub(1))
    }

    /// Number of RAM bytes per row inside the window
    pub const fn bytes_per_row(&self) -> usize {
        ((self.x_end >> 3) - (self.x_start >> 3) + 1) as usize
    }

    /// Number of rows inside the window
    pub const fn rows(&self) -> u32 {
        self.y_end - self.y_start + 1
    }

    /// Same window snapped to whole bytes on the x axis
    pub const fn byte_aligned(&self) -> WindowRect {
        WindowRect::new(self.x_start & !7, self.y_start, self.x_end | 7, self.y_end)
    }
}

/// Payloads of `SetRamXAddressStartEndPosition` and `SetRamYAddressStartEndPosition`
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct WindowRegisters {
    /// First column, in bytes
    pub x_start: u8,
    /// Last column, in bytes
    pub x_end: u8,
    /// First row, bits 7:0
    pub y_start_lo: u8,
    /// First row, bit 8
    pub y_start_hi: u8,
    /// Last row, bits 7:0
    pub y_end_lo: u8,
    /// Last row, bit 8
    pub y_end_hi: u8,
}

impl WindowRegisters {
    /// Data bytes of the x window command
    pub fn x_bytes(&self) -> [u8; 2] {
        [self.x_start, self.x_end]
    }

    /// Data bytes of the y window command
    pub fn y_bytes(&self) -> [u8; 4] {
        [self.y_start_lo, self.y_start_hi, self.y_end_lo, self.y_end_hi]
    }

    /// Rebuilds the byte aligned pixel window these registers select
    pub fn to_rect(&self) -> WindowRect {
        WindowRect::new(
            u32::from(self.x_start) << 3,
            u32::from(self.y_start_lo) | u32::from(self.y_start_hi) << 8,
            u32::from(self.x_end) << 3 | 7,
            u32::from(self.y_end_lo) | u32::from(self.y_end_hi) << 8,
        )
    }
}

/// Payloads of `SetRamXAddressCounter` and `SetRamYAddressCounter`
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct CursorRegisters {
    /// Column, in bytes
    pub x: u8,
    /// Row, bits 7:0
    pub y_lo: u8,
    /// Row, bit 8
    pub y_hi: u8,
}

impl CursorRegisters {
    /// Data bytes of the x counter command
    pub fn x_bytes(&self) -> [u8; 1] {
        [self.x]
    }

    /// Data bytes of the y counter command
    pub fn y_bytes(&self) -> [u8; 2] {
        [self.y_lo, self.y_hi]
    }
}

/// Translates a pixel window into register values
pub fn compute_window_registers(rect: &WindowRect) -> WindowRegisters {
    // x is positioned in bytes, so the last 3 bits which show the position inside a byte in the ram
    // aren't relevant
    WindowRegisters {
        x_start: (rect.x_start >> 3) as u8,
        x_end: (rect.x_end >> 3) as u8,
        // 2 Databytes: A[7:0] & 0..A[8] for each - start and end
        y_start_lo: rect.y_start as u8,
        y_start_hi: (rect.y_start >> 8) as u8,
        y_end_lo: rect.y_end as u8,
        y_end_hi: (rect.y_end >> 8) as u8,
    }
}

/// Translates a single pixel position into RAM cursor register values
pub fn compute_cursor_registers(x: u32, y: u32) -> CursorRegisters {
    CursorRegisters {
        x: (x >> 3) as u8,
        y_lo: y as u8,
        y_hi: (y >> 8) as u8,
    }
}
