//! Link configuration types and builder

pub use crate::error::BuilderError;

// The crate receives an already-open port; these describe how the caller
// must open it.

/// Baud rate to open the serial port at
pub const SERIAL_BAUD_RATE: u32 = 115_200;

/// Data bits per character the port must use (no parity)
pub const SERIAL_DATA_BITS: u8 = 8;

/// Stop bits per character the port must use
pub const SERIAL_STOP_BITS: u8 = 1;

/// Read timeout to open the serial port with, in milliseconds
///
/// Separate from [`Config::response_timeout_ms`], which bounds the wait
/// for a reply to start arriving.
pub const SERIAL_READ_TIMEOUT_MS: u32 = 1_000;

/// Default interval between "is a reply waiting?" polls
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 100;

/// Default time the reset line is held low
pub const DEFAULT_RESET_LOW_MS: u32 = 20;

/// Default time the controller needs after reset before it accepts frames
pub const DEFAULT_RESET_SETTLE_MS: u32 = 500;

/// Link configuration
///
/// Use [`Builder`] to create a Config.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Interval between reply polls, in milliseconds
    pub poll_interval_ms: u32,
    /// Give up waiting for a reply after this many milliseconds (0 = wait forever)
    pub response_timeout_ms: u32,
    /// Size of every controller reply in bytes
    pub response_len: usize,
    /// Time the reset line is held low, in milliseconds
    pub reset_low_ms: u32,
    /// Time to wait after releasing reset, in milliseconds
    pub reset_settle_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            response_timeout_ms: 0,
            response_len: crate::command::RESPONSE_LEN,
            reset_low_ms: DEFAULT_RESET_LOW_MS,
            reset_settle_ms: DEFAULT_RESET_SETTLE_MS,
        }
    }
}

/// Builder for constructing link configuration
///
/// # Example
///
/// ```
/// use mui_panel::Builder;
///
/// let config = match Builder::new().response_timeout_ms(5_000).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.poll_interval_ms, 100);
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reply poll interval
    pub fn poll_interval_ms(mut self, value: u32) -> Self {
        self.config.poll_interval_ms = value;
        self
    }

    /// Set the reply timeout (0 disables it)
    ///
    /// The controller protocol has no timeout of its own; without one a
    /// silent panel blocks the caller forever.
    pub fn response_timeout_ms(mut self, value: u32) -> Self {
        self.config.response_timeout_ms = value;
        self
    }

    /// Set the expected reply size
    pub fn response_len(mut self, value: usize) -> Self {
        self.config.response_len = value;
        self
    }

    /// Set how long the reset line is held low
    pub fn reset_low_ms(mut self, value: u32) -> Self {
        self.config.reset_low_ms = value;
        self
    }

    /// Set how long to wait after reset
    pub fn reset_settle_ms(mut self, value: u32) -> Self {
        self.config.reset_settle_ms = value;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidPollInterval` for a zero poll interval and
    /// `BuilderError::InvalidResponseLength` for a zero reply size.
    pub fn build(self) -> Result<Config, BuilderError> {
        if self.config.poll_interval_ms == 0 {
            return Err(BuilderError::InvalidPollInterval);
        }
        if self.config.response_len == 0 {
            return Err(BuilderError::InvalidResponseLength);
        }
        Ok(self.config)
    }
}
