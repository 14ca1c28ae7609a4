/// Timing and behaviour settings of the driver
///
/// The defaults reproduce the timings of the Waveshare reference code.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Pause between two reads of the busy line
    pub busy_poll_interval_ms: u32,
    /// Upper bound for a single busy wait before
    /// [`ControllerTimeout`](crate::error::Error::ControllerTimeout) is returned
    pub busy_timeout_ms: u32,
    /// Settle time after each edge of the reset pulse
    pub reset_delay_ms: u32,
    /// Time given to the controller after the deep sleep command
    pub sleep_settle_ms: u32,
    /// Width of the band moved over the panel by `wipe`
    pub wipe_step: u32,
    /// How often every band position is drawn and refreshed.
    /// The reference code draws each band twice.
    pub wipe_draws_per_step: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            busy_poll_interval_ms: 100,
            busy_timeout_ms: 10_000,
            reset_delay_ms: 200,
            sleep_settle_ms: 100,
            wipe_step: 16,
            wipe_draws_per_step: 2,
        }
    }
}

impl Config {
    /// Sets the busy wait timeout
    pub fn with_busy_timeout_ms(mut self, timeout: u32) -> Self {
        self.busy_timeout_ms = timeout;
        self
    }

    /// Sets the busy poll interval, 0 is treated as 1ms
    pub fn with_busy_poll_interval_ms(mut self, interval: u32) -> Self {
        self.busy_poll_interval_ms = interval;
        self
    }

    /// Draw every wipe band once instead of twice
    pub fn with_single_wipe_draw(mut self) -> Self {
        self.wipe_draws_per_step = 1;
        self
    }
}
