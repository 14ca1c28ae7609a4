use crate::error::InterfaceError;
use crate::traits::Transport;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

/// The Connection Interface of the EPD
///
/// Owns the SPI device and the three control lines plus a delay source and
/// implements [`Transport`] on top of them.
pub struct DisplayInterface<SPI, BUSY, DC, RST, DELAY> {
    /// SPI
    spi: SPI,
    /// High for busy, Wait until display is ready!
    busy: BUSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Resetting
    rst: RST,
    /// Used for the reset pulse and the busy poll interval
    delay: DELAY,
}

/// Error type of a [`DisplayInterface`] over the given peripherals
pub type DisplayInterfaceError<SPI, BUSY, DC, RST> = InterfaceError<
    <SPI as embedded_hal::spi::ErrorType>::Error,
    <BUSY as embedded_hal::digital::ErrorType>::Error,
    <DC as embedded_hal::digital::ErrorType>::Error,
    <RST as embedded_hal::digital::ErrorType>::Error,
>;

impl<SPI, BUSY, DC, RST, DELAY> DisplayInterface<SPI, BUSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Creates a new `DisplayInterface` struct
    ///
    /// The SPI device has to be configured with [`SPI_MODE`](crate::SPI_MODE) already.
    pub fn new(spi: SPI, busy: BUSY, dc: DC, rst: RST, delay: DELAY) -> Self {
        DisplayInterface {
            spi,
            busy,
            dc,
            rst,
            delay,
        }
    }

    /// Gives back the owned peripherals
    pub fn release(self) -> (SPI, BUSY, DC, RST, DELAY) {
        (self.spi, self.busy, self.dc, self.rst, self.delay)
    }

    // spi write helper/abstraction function
    fn write(&mut self, data: &[u8]) -> Result<(), DisplayInterfaceError<SPI, BUSY, DC, RST>> {
        // transfer spi data
        // Be careful!! Linux has a default limit of 4096 bytes per spi transfer
        // see https://raspberrypi.stackexchange.com/questions/65595/spi-transfer-fails-with-buffer-size-greater-than-4096
        if cfg!(target_os = "linux") {
            for data_chunk in data.chunks(4096) {
                self.spi.write(data_chunk).map_err(InterfaceError::Spi)?;
            }
            Ok(())
        } else {
            self.spi.write(data).map_err(InterfaceError::Spi)
        }
    }
}

impl<SPI, BUSY, DC, RST, DELAY> Transport for DisplayInterface<SPI, BUSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    type Error = DisplayInterfaceError<SPI, BUSY, DC, RST>;

    fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
        // low for commands
        self.dc.set_low().map_err(InterfaceError::Dc)?;

        // Transfer the command over spi
        self.write(&[command])
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        // high for data
        self.dc.set_high().map_err(InterfaceError::Dc)?;

        self.write(data)
    }

    fn is_busy(&mut self) -> Result<bool, Self::Error> {
        self.busy.is_high().map_err(InterfaceError::Busy)
    }

    fn set_reset(&mut self, high: bool) -> Result<(), Self::Error> {
        if high {
            self.rst.set_high().map_err(InterfaceError::Rst)
        } else {
            self.rst.set_low().map_err(InterfaceError::Rst)
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
