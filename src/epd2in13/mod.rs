//! A Driver for the Waveshare 2.13" E-Ink Display (128x250, V1) via SPI
//!
//! # References
//!
//! - [Waveshare product page](https://www.waveshare.com/wiki/2.13inch_e-Paper_HAT)
//! - [Waveshare Python driver](https://github.com/waveshare/e-Paper/blob/master/RaspberryPi%26JetsonNano/python/lib/waveshare_epd/epd2in13.py)
//!
//! # Example
//!
//!```rust, ignore
//!use epd2in13::prelude::*;
//!
//!let interface = DisplayInterface::new(spi, busy, dc, rst, delay);
//!let mut epd = Epd2in13::new(interface, Config::default());
//!
//!epd.initialize(UpdateMode::Full)?;
//!epd.clear(Color::White)?;
//!
//!let mut image = PortraitImage::default();
//!// draw with embedded-graphics here
//!epd.display(&image)?;
//!
//!epd.sleep()?;
//!```

use crate::color::Color;
use crate::error::Error;
use crate::packer::{self, PackError, PackedFrame, FRAME_LEN};
use crate::traits::{Command as _, MonoBitmap, Transport};
use crate::window::{compute_cursor_registers, compute_window_registers, WindowRect};

pub(crate) mod command;
use self::command::{
    BorderWaveForm, BorderWaveFormFixLevel, BorderWaveFormGs, BorderWaveFormVbd, Command,
    DataEntryModeDir, DataEntryModeIncr, DeepSleepMode, DisplayUpdateControl2, DriverOutput, Vcom,
};

pub(crate) mod constants;
use self::constants::{LUT_FULL_UPDATE, LUT_PARTIAL_UPDATE};

mod config;
pub use self::config::Config;

pub use crate::traits::UpdateMode;

/// Width of the display.
pub const WIDTH: u32 = 128;

/// Height of the display
pub const HEIGHT: u32 = 250;

/// Default Background Color
pub const DEFAULT_BACKGROUND_COLOR: Color = Color::White;

/// Booster soft start phases A, B and C
const BOOSTER_SOFT_START: [u8; 3] = [0xD7, 0xD6, 0x9D];
/// 4 dummy lines per gate
const DUMMY_LINE_PERIOD: u8 = 0x1A;
/// 2us per line
const GATE_LINE_WIDTH: u8 = 0x08;

const VCOM_FULL: Vcom = Vcom(0x55);
const VCOM_PARTIAL: Vcom = Vcom(0x26);

const BORDER_FULL: BorderWaveForm = BorderWaveForm {
    vbd: BorderWaveFormVbd::Gs,
    fix_level: BorderWaveFormFixLevel::Vss,
    gs_trans: BorderWaveFormGs::Lut3,
};
// partial refreshes keep the border from flickering
const BORDER_PARTIAL: BorderWaveForm = BorderWaveForm {
    vbd: BorderWaveFormVbd::Gs,
    fix_level: BorderWaveFormFixLevel::Vss,
    gs_trans: BorderWaveFormGs::Lut1,
};

/// Where the driver is in the device lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Nothing was sent yet
    Uninitialized,
    /// Hardware reset done, waiting for configuration
    Resetting,
    /// Ready for RAM writes and refreshes with the given waveform
    Configured(UpdateMode),
    /// Deep sleep, only `reset` and `initialize` are accepted
    Sleeping,
}

/// Epd2in13 driver
///
/// Owns the [`Transport`] and sequences every register write.
pub struct Epd2in13<T> {
    /// Connection Interface
    interface: T,
    config: Config,
    state: DriverState,
}

impl<T: Transport> Epd2in13<T> {
    /// Creates a new driver, nothing is sent until [`initialize`](Self::initialize)
    pub fn new(interface: T, config: Config) -> Self {
        Epd2in13 {
            interface,
            config,
            state: DriverState::Uninitialized,
        }
    }

    /// Gives back the transport
    pub fn release(self) -> T {
        self.interface
    }

    /// Current lifecycle state
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Active waveform, if configured
    pub fn mode(&self) -> Option<UpdateMode> {
        match self.state {
            DriverState::Configured(mode) => Some(mode),
            _ => None,
        }
    }

    /// Settings in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the width of the display
    pub fn width(&self) -> u32 {
        WIDTH
    }

    /// Get the height of the display
    pub fn height(&self) -> u32 {
        HEIGHT
    }

    /// Resets the device.
    ///
    /// Pulses the reset line high, low, high and waits until the controller
    /// is idle. Also used to wake the module from deep sleep.
    pub fn reset(&mut self) -> Result<(), Error<T::Error>> {
        log::debug!("epd2in13: hardware reset");
        self.state = DriverState::Resetting;

        let settle = self.config.reset_delay_ms;
        self.set_reset(true)?;
        self.interface.delay_ms(settle);
        self.set_reset(false)?;
        self.interface.delay_ms(settle);
        self.set_reset(true)?;
        self.interface.delay_ms(settle);

        self.wait_until_idle()
    }

    /// Resets the controller and loads the electrical profile of `mode`
    ///
    /// Can be called again at any time to switch between full and partial
    /// refreshes. If this fails the controller is in an unknown configuration,
    /// run it again from scratch.
    pub fn initialize(&mut self, mode: UpdateMode) -> Result<(), Error<T::Error>> {
        self.reset()?;
        log::debug!("epd2in13: initialize {:?}", mode);

        match mode {
            UpdateMode::Full => {
                self.command(Command::SwReset)?;
                self.wait_until_idle()?;

                self.cmd_with_data(
                    Command::DriverOutputControl,
                    &DriverOutput {
                        scan_is_linear: true,
                        scan_g0_is_first: true,
                        scan_dir_incr: true,
                        width: (HEIGHT - 1) as u16,
                    }
                    .to_bytes(),
                )?;
                self.cmd_with_data(Command::BoosterSoftStartControl, &BOOSTER_SOFT_START)?;
                self.cmd_with_data(Command::SetDummyLinePeriod, &[DUMMY_LINE_PERIOD])?;
                self.cmd_with_data(Command::SetGateLineWidth, &[GATE_LINE_WIDTH])?;
                // address: x increment, y increment, address counter is updated in x direction
                self.cmd_with_data(
                    Command::DataEntryModeSetting,
                    &[DataEntryModeIncr::XIncrYIncr as u8 | DataEntryModeDir::XDir as u8],
                )?;

                self.set_ram_area(&WindowRect::full(WIDTH, HEIGHT))?;

                self.cmd_with_data(Command::BorderWaveformControl, &[BORDER_FULL.to_u8()])?;
                self.cmd_with_data(Command::WriteVcomRegister, &[VCOM_FULL.0])?;
                self.set_lut(mode)?;

                // waits for the controller as well
                self.set_ram_counter(0, 0)?;
            }
            UpdateMode::Partial => {
                self.cmd_with_data(Command::WriteVcomRegister, &[VCOM_PARTIAL.0])?;
                self.wait_until_idle()?;

                // the LUT has to be in place before the update control consumes it
                self.set_lut(mode)?;

                // During partial update, clock/analog are not disabled between 2
                // updates.
                self.cmd_with_data(
                    Command::DisplayUpdateControl2,
                    &[DisplayUpdateControl2::partial_latch().0],
                )?;
                self.command(Command::MasterActivation)?;
                self.wait_until_idle()?;

                self.cmd_with_data(Command::BorderWaveformControl, &[BORDER_PARTIAL.to_u8()])?;
            }
        }

        self.state = DriverState::Configured(mode);
        Ok(())
    }

    /// Wait until the display has stopped processing data
    ///
    /// Polls the busy line every `busy_poll_interval_ms` and gives up with
    /// [`Error::ControllerTimeout`] after `busy_timeout_ms`.
    pub fn wait_until_idle(&mut self) -> Result<(), Error<T::Error>> {
        let interval = self.config.busy_poll_interval_ms.max(1);
        let mut waited = 0u32;
        while self.interface.is_busy().map_err(Error::Transport)? {
            if waited >= self.config.busy_timeout_ms {
                log::warn!("epd2in13: controller still busy after {}ms", waited);
                return Err(Error::ControllerTimeout);
            }
            log::trace!("epd2in13: busy, waited {}ms", waited);
            self.interface.delay_ms(interval);
            waited = waited.saturating_add(interval);
        }
        Ok(())
    }

    /// Puts a bitmap into the frame memory with its top left corner at (x, y)
    ///
    /// x is rounded down to a multiple of 8, as is the bitmap width, and the
    /// window is clipped at the panel edges. This won't update the display.
    pub fn set_frame_memory<B: MonoBitmap + ?Sized>(
        &mut self,
        bitmap: &B,
        x: i32,
        y: i32,
    ) -> Result<(), Error<T::Error>> {
        self.require_configured("set_frame_memory")?;
        if x < 0 || y < 0 {
            log::warn!("epd2in13: rejected window origin ({}, {})", x, y);
            return Err(Error::OutOfBounds { x, y });
        }

        let frame = packer::pack_windowed(bitmap, x as u32, y as u32).map_err(pack_error)?;
        let rect = frame.rect();
        log::trace!("epd2in13: write window {:?}", rect);

        self.set_ram_area(&rect)?;
        for row in frame.rows() {
            self.set_ram_counter(row.x(), row.y())?;
            self.command(Command::WriteRam)?;
            self.data(row.bytes())?;
        }
        Ok(())
    }

    /// Clears the frame memory with the specified color.
    ///
    /// This won't update the display.
    pub fn clear_frame_memory(&mut self, color: Color) -> Result<(), Error<T::Error>> {
        self.require_configured("clear_frame_memory")?;

        self.use_full_frame()?;
        self.command(Command::WriteRam)?;
        self.data_x_times(color.get_byte_value(), FRAME_LEN as u32)
    }

    /// Transmit a full packed frame to the RAM of the EPD
    ///
    /// BUFFER needs to be of size: WIDTH / 8 * HEIGHT !
    pub fn update_frame(&mut self, buffer: &[u8]) -> Result<(), Error<T::Error>> {
        self.require_configured("update_frame")?;
        assert!(buffer.len() == FRAME_LEN);

        self.use_full_frame()?;
        self.command(Command::WriteRam)?;
        self.data(buffer)
    }

    /// Displays the frame data from RAM
    ///
    /// This is the only call that refreshes the panel. It waits until the
    /// device isn't busy anymore.
    pub fn display_frame(&mut self) -> Result<(), Error<T::Error>> {
        self.require_configured("display_frame")?;

        self.cmd_with_data(
            Command::DisplayUpdateControl2,
            &[DisplayUpdateControl2::refresh().0],
        )?;
        self.command(Command::MasterActivation)?;
        self.wait_until_idle()
    }

    /// Clears the RAM, writes the bitmap at the origin and refreshes
    pub fn display<B: MonoBitmap + ?Sized>(&mut self, bitmap: &B) -> Result<(), Error<T::Error>> {
        self.clear_frame_memory(DEFAULT_BACKGROUND_COLOR)?;
        self.set_frame_memory(bitmap, 0, 0)?;
        self.display_frame()
    }

    /// Same sequence as [`display`](Self::display)
    ///
    /// The partial look comes from initializing with [`UpdateMode::Partial`].
    pub fn display_partial<B: MonoBitmap + ?Sized>(
        &mut self,
        bitmap: &B,
    ) -> Result<(), Error<T::Error>> {
        if self.mode() == Some(UpdateMode::Full) {
            log::debug!("epd2in13: display_partial with the full waveform loaded");
        }
        self.display(bitmap)
    }

    /// Packs a bitmap of either orientation, transfers and shows it
    ///
    /// Unlike [`display`](Self::display) this accepts bitmaps rotated by 90°,
    /// any other size fails with [`Error::InvalidGeometry`].
    pub fn display_bitmap<B: MonoBitmap + ?Sized>(
        &mut self,
        bitmap: &B,
    ) -> Result<(), Error<T::Error>> {
        self.require_configured("display_bitmap")?;
        let frame = packer::pack(bitmap).map_err(pack_error)?;
        self.display_packed(&frame)
    }

    /// Transfers an already packed frame and shows it
    pub fn display_packed(&mut self, frame: &PackedFrame) -> Result<(), Error<T::Error>> {
        self.update_frame(frame.buffer())?;
        self.display_frame()
    }

    /// Fills the whole panel with `color` and refreshes
    pub fn clear(&mut self, color: Color) -> Result<(), Error<T::Error>> {
        self.clear_frame_memory(color)?;
        self.display_frame()
    }

    /// Sweeps a band in `color` over an inverse background from left to right
    ///
    /// Every band position is drawn and refreshed `wipe_draws_per_step`
    /// times, the sweep stops once the band would start past the panel.
    pub fn wipe(&mut self, color: Color) -> Result<(), Error<T::Error>> {
        self.require_configured("wipe")?;

        let step = self.config.wipe_step.max(1);
        let draws = self.config.wipe_draws_per_step.max(1);
        let mut x = 0;
        while x < WIDTH {
            let band = Band {
                start: x,
                width: step,
                color,
            };
            log::trace!("epd2in13: wipe band at {}", x);
            for _ in 0..draws {
                self.clear_frame_memory(DEFAULT_BACKGROUND_COLOR)?;
                self.set_frame_memory(&band, 0, 0)?;
                self.display_frame()?;
            }
            x += step;
        }
        Ok(())
    }

    /// Let the device enter deep-sleep mode to save power.
    ///
    /// The deep sleep mode returns to standby with a hardware reset, use
    /// [`initialize`](Self::initialize) to wake it up.
    pub fn sleep(&mut self) -> Result<(), Error<T::Error>> {
        self.require_configured("sleep")?;
        log::debug!("epd2in13: deep sleep");

        // All sample code enables and disables analog/clocks...
        self.cmd_with_data(
            Command::DisplayUpdateControl2,
            &[DisplayUpdateControl2::power_off().0],
        )?;
        self.command(Command::MasterActivation)?;

        self.cmd_with_data(Command::DeepSleepMode, &[DeepSleepMode::Mode1 as u8])?;
        self.interface.delay_ms(self.config.sleep_settle_ms);

        self.state = DriverState::Sleeping;
        Ok(())
    }

    fn require_configured(&self, operation: &'static str) -> Result<UpdateMode, Error<T::Error>> {
        match self.state {
            DriverState::Configured(mode) => Ok(mode),
            state => {
                log::warn!("epd2in13: `{}` rejected while {:?}", operation, state);
                Err(Error::InvalidState { operation, state })
            }
        }
    }

    fn set_lut(&mut self, mode: UpdateMode) -> Result<(), Error<T::Error>> {
        let buffer = match mode {
            UpdateMode::Full => &LUT_FULL_UPDATE,
            UpdateMode::Partial => &LUT_PARTIAL_UPDATE,
        };
        self.cmd_with_data(Command::WriteLutRegister, buffer)
    }

    fn use_full_frame(&mut self) -> Result<(), Error<T::Error>> {
        // choose full frame/ram
        self.set_ram_area(&WindowRect::full(WIDTH, HEIGHT))?;

        // start from the beginning
        self.set_ram_counter(0, 0)
    }

    /// Sets both X and Y pixels ranges
    fn set_ram_area(&mut self, rect: &WindowRect) -> Result<(), Error<T::Error>> {
        let registers = compute_window_registers(rect);
        self.cmd_with_data(Command::SetRamXAddressStartEndPosition, &registers.x_bytes())?;
        self.cmd_with_data(Command::SetRamYAddressStartEndPosition, &registers.y_bytes())
    }

    /// Sets both X and Y pixels counters when writing data to RAM
    fn set_ram_counter(&mut self, x: u32, y: u32) -> Result<(), Error<T::Error>> {
        let registers = compute_cursor_registers(x, y);
        self.cmd_with_data(Command::SetRamXAddressCounter, &registers.x_bytes())?;
        self.cmd_with_data(Command::SetRamYAddressCounter, &registers.y_bytes())?;
        self.wait_until_idle()
    }

    fn set_reset(&mut self, high: bool) -> Result<(), Error<T::Error>> {
        self.interface.set_reset(high).map_err(Error::Transport)
    }

    fn command(&mut self, command: Command) -> Result<(), Error<T::Error>> {
        self.interface
            .send_command(command.address())
            .map_err(Error::Transport)
    }

    fn data(&mut self, data: &[u8]) -> Result<(), Error<T::Error>> {
        self.interface.send_data(data).map_err(Error::Transport)
    }

    fn cmd_with_data(&mut self, command: Command, data: &[u8]) -> Result<(), Error<T::Error>> {
        self.command(command)?;
        self.data(data)
    }

    /// Sends the same byte of data `repetitions` times, one panel line per transfer
    fn data_x_times(&mut self, val: u8, repetitions: u32) -> Result<(), Error<T::Error>> {
        let chunk = [val; packer::LINE_WIDTH];
        let mut remaining = repetitions as usize;
        while remaining > 0 {
            let len = remaining.min(chunk.len());
            self.data(&chunk[..len])?;
            remaining -= len;
        }
        Ok(())
    }
}

fn pack_error<E>(err: PackError) -> Error<E> {
    match err {
        PackError::InvalidGeometry { width, height } => Error::InvalidGeometry { width, height },
        PackError::OutOfBounds { x, y } => Error::OutOfBounds {
            x: x as i32,
            y: y as i32,
        },
    }
}

/// Full panel bitmap with a vertical band, used by `wipe`
struct Band {
    start: u32,
    width: u32,
    color: Color,
}

impl MonoBitmap for Band {
    fn width(&self) -> u32 {
        WIDTH
    }

    fn height(&self) -> u32 {
        HEIGHT
    }

    fn pixel(&self, x: u32, _y: u32) -> Color {
        if x >= self.start && x - self.start < self.width {
            self.color
        } else {
            self.color.inverse()
        }
    }
}
