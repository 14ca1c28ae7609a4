//! SPI Commands for the Waveshare 2.13" (128x250) E-Ink Display

use crate::traits;

use bit_field::BitField;

/// Epd2in13 commands
///
/// Should rarely (never?) be needed directly.
///
/// For more infos about the addresses and what they are doing look into the pdfs
#[allow(dead_code)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// Driver Output control
    ///     3 Databytes:
    ///     A[7:0]
    ///     0.. A[8]
    ///     0.. B[2:0]
    ///     Default: Set A[8:0] = height - 1 and B[2:0] = 0x0
    DriverOutputControl = 0x01,
    /// Booster Soft start control
    ///     3 Databytes:
    ///     1.. A[6:0]
    ///     1.. B[6:0]
    ///     1.. C[6:0]
    BoosterSoftStartControl = 0x0C,
    GateScanStartPosition = 0x0F,
    /// Deep Sleep Mode Control
    ///     1 Databyte:
    ///     0.. A[0]
    ///     Values:
    ///         A[0] = 0: Normal Mode (POR)
    ///         A[0] = 1: Enter Deep Sleep Mode
    DeepSleepMode = 0x10,
    /// Data Entry mode setting
    DataEntryModeSetting = 0x11,

    SwReset = 0x12,

    TemperatureSensorControl = 0x1A,

    MasterActivation = 0x20,

    DisplayUpdateControl1 = 0x21,

    DisplayUpdateControl2 = 0x22,

    WriteRam = 0x24,

    WriteVcomRegister = 0x2C,

    /// 30 Databytes of waveform
    WriteLutRegister = 0x32,

    SetDummyLinePeriod = 0x3A,

    SetGateLineWidth = 0x3B,

    BorderWaveformControl = 0x3C,

    SetRamXAddressStartEndPosition = 0x44,

    SetRamYAddressStartEndPosition = 0x45,

    SetRamXAddressCounter = 0x4E,

    SetRamYAddressCounter = 0x4F,

    /// Terminates a RAM read/write sequence
    TerminateFrameReadWrite = 0xFF,
}

impl traits::Command for Command {
    /// Returns the address of the command
    fn address(self) -> u8 {
        self as u8
    }
}

pub(crate) struct DriverOutput {
    pub scan_is_linear: bool,
    pub scan_g0_is_first: bool,
    pub scan_dir_incr: bool,

    pub width: u16,
}

impl DriverOutput {
    pub fn to_bytes(&self) -> [u8; 3] {
        [
            self.width as u8,
            (self.width >> 8) as u8,
            *0u8.set_bit(0, !self.scan_dir_incr)
                .set_bit(1, !self.scan_g0_is_first)
                .set_bit(2, !self.scan_is_linear),
        ]
    }
}

/// These are not directly documented, but the bitfield is easily reversed from
/// documentation and sample code
/// [7|6|5|4|3|2|1|0]
///  | | | | | | | `--- disable clock
///  | | | | | | `----- disable analog
///  | | | | | `------- display
///  | | | | `--------- undocumented and unknown use,
///  | | | |            but used in waveshare reference code
///  | | | `----------- load LUT
///  | | `------------- load temp
///  | `--------------- enable clock
///  `----------------- enable analog
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct DisplayUpdateControl2(pub u8);

impl DisplayUpdateControl2 {
    pub fn new() -> DisplayUpdateControl2 {
        DisplayUpdateControl2(0x00)
    }

    pub fn disable_clock(mut self) -> Self {
        self.0.set_bit(0, true);
        self
    }

    pub fn disable_analog(mut self) -> Self {
        self.0.set_bit(1, true);
        self
    }

    pub fn display(mut self) -> Self {
        self.0.set_bit(2, true);
        self
    }

    pub fn enable_clock(mut self) -> Self {
        self.0.set_bit(6, true);
        self
    }

    pub fn enable_analog(mut self) -> Self {
        self.0.set_bit(7, true);
        self
    }

    /// Full refresh: power up, display, power down (0xC7)
    pub fn refresh() -> Self {
        Self::new()
            .enable_analog()
            .enable_clock()
            .display()
            .disable_analog()
            .disable_clock()
    }

    /// Latches the partial waveform, clock/analog stay on between updates (0xC0)
    pub fn partial_latch() -> Self {
        Self::new().enable_analog().enable_clock()
    }

    /// Power off sequence used before deep sleep (0xC3)
    pub fn power_off() -> Self {
        Self::new()
            .enable_analog()
            .enable_clock()
            .disable_analog()
            .disable_clock()
    }
}

#[allow(dead_code, clippy::enum_variant_names)]
#[derive(Copy, Clone)]
pub(crate) enum DataEntryModeIncr {
    XDecrYDecr = 0x0,
    XIncrYDecr = 0x1,
    XDecrYIncr = 0x2,
    XIncrYIncr = 0x3,
}

#[allow(dead_code)]
#[derive(Copy, Clone)]
pub(crate) enum DataEntryModeDir {
    XDir = 0x0,
    YDir = 0x4,
}

#[allow(dead_code)]
#[derive(Copy, Clone)]
pub(crate) enum BorderWaveFormVbd {
    Gs = 0x0,
    FixLevel = 0x1,
    Vcom = 0x2,
}

#[allow(dead_code)]
#[derive(Copy, Clone)]
pub(crate) enum BorderWaveFormFixLevel {
    Vss = 0x0,
    Vsh1 = 0x1,
    Vsl = 0x2,
    Vsh2 = 0x3,
}

#[allow(dead_code)]
#[derive(Copy, Clone)]
pub(crate) enum BorderWaveFormGs {
    Lut0 = 0x0,
    Lut1 = 0x1,
    Lut2 = 0x2,
    Lut3 = 0x3,
}

pub(crate) struct BorderWaveForm {
    pub vbd: BorderWaveFormVbd,
    pub fix_level: BorderWaveFormFixLevel,
    pub gs_trans: BorderWaveFormGs,
}

impl BorderWaveForm {
    pub fn to_u8(&self) -> u8 {
        *0u8.set_bits(6..8, self.vbd as u8)
            .set_bits(4..6, self.fix_level as u8)
            .set_bits(0..2, self.gs_trans as u8)
    }
}

#[allow(dead_code)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum DeepSleepMode {
    /// Sleeps and keeps access to RAM and controller
    Normal = 0x00,

    /// Sleeps without access to RAM/controller but keeps RAM content
    Mode1 = 0x01,
}

/// Raw VCOM register value
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Vcom(pub u8);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Command as CommandTrait;

    #[test]
    fn command_addr() {
        assert_eq!(Command::DriverOutputControl.address(), 0x01);

        assert_eq!(Command::SetRamXAddressCounter.address(), 0x4E);

        assert_eq!(Command::TerminateFrameReadWrite.address(), 0xFF);
    }

    #[test]
    fn display_update_control_2_values() {
        assert_eq!(DisplayUpdateControl2::refresh().0, 0xC7);
        assert_eq!(DisplayUpdateControl2::partial_latch().0, 0xC0);
        assert_eq!(DisplayUpdateControl2::power_off().0, 0xC3);
    }

    #[test]
    fn border_waveform_values() {
        let full = BorderWaveForm {
            vbd: BorderWaveFormVbd::Gs,
            fix_level: BorderWaveFormFixLevel::Vss,
            gs_trans: BorderWaveFormGs::Lut3,
        };
        let partial = BorderWaveForm {
            vbd: BorderWaveFormVbd::Gs,
            fix_level: BorderWaveFormFixLevel::Vss,
            gs_trans: BorderWaveFormGs::Lut1,
        };
        assert_eq!(full.to_u8(), 0x03);
        assert_eq!(partial.to_u8(), 0x01);
    }

    #[test]
    fn driver_output_bytes() {
        let output = DriverOutput {
            scan_is_linear: true,
            scan_g0_is_first: true,
            scan_dir_incr: true,
            width: 249,
        };
        assert_eq!(output.to_bytes(), [0xF9, 0x00, 0x00]);
    }

    #[test]
    fn data_entry_mode() {
        assert_eq!(
            DataEntryModeIncr::XIncrYIncr as u8 | DataEntryModeDir::XDir as u8,
            0x03
        );
    }
}
