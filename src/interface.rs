//! Serial link abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for talking to the panel controller over a UART.
//!
//! ## Hardware Requirements
//!
//! The panel requires:
//! - A UART opened at 115200 baud, 8N1 (see [`crate::config`] for the constants)
//! - 1 GPIO pin:
//!   - **RST**: Reset (output, active low)
//!
//! The port is any [`embedded_io`] implementor that can also report whether
//! input is waiting ([`ReadReady`]). Opening and configuring the OS device is
//! left to the caller.
//!
//! ## Locking
//!
//! The port sits behind a mutex. [`DisplayInterface::exchange`] holds it for
//! the whole write-then-read, so two threads sharing one `Interface` (for
//! example through an `Arc`) can never pair a request with someone else's
//! reply. The separate [`write_frame`](DisplayInterface::write_frame) and
//! [`read_response`](DisplayInterface::read_response) calls each lock on
//! their own.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use mui_panel::{DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::OutputPin;
//! # struct MockPort;
//! # impl embedded_io::ErrorType for MockPort { type Error = Infallible; }
//! # impl embedded_io::Read for MockPort {
//! #     fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> { buf.fill(0x06); Ok(buf.len()) }
//! # }
//! # impl embedded_io::ReadReady for MockPort {
//! #     fn read_ready(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! # }
//! # impl embedded_io::Write for MockPort {
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! let interface = Interface::new(MockPort, MockPin);
//!
//! // Pull the controller out of reset
//! let _ = interface.reset(&mut delay);
//!
//! // Send a frame and wait for the 6-byte reply
//! let mut reply = [0u8; 6];
//! let _ = interface.exchange(&[0x00, 0x06, 0x00, 0x03, 0, 100, 0, 0x67], &mut reply, &mut delay);
//! ```

use core::fmt::Debug;
use std::sync::{Arc, Mutex};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_io::{Read, ReadExactError, ReadReady, Write};

use crate::config::{Config, DEFAULT_POLL_INTERVAL_MS, DEFAULT_RESET_LOW_MS, DEFAULT_RESET_SETTLE_MS};

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Trait for the link to the panel controller
///
/// This trait abstracts over different transport implementations,
/// allowing the [`Display`](crate::display::Display) to work with any
/// serial port and reset line, or with a test double.
///
/// All methods take `&self`: implementations provide their own mutual
/// exclusion because reads and writes share one physical port.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Write a complete frame and flush it
    ///
    /// # Errors
    ///
    /// Returns an error if the write or flush fails. A frame whose write
    /// failed must be treated as not sent.
    fn write_frame(&self, frame: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Wait for a reply and read exactly `response.len()` bytes of it
    ///
    /// # Errors
    ///
    /// Returns an error if polling or reading the port fails, or if the
    /// implementation's reply timeout elapses.
    fn read_response<D: DelayNs>(
        &self,
        response: &mut [u8],
        delay: &mut D,
    ) -> InterfaceResult<(), Self::Error>;

    /// Write a frame and read its reply without letting other callers in between
    ///
    /// # Errors
    ///
    /// See [`write_frame`](Self::write_frame) and [`read_response`](Self::read_response).
    fn exchange<D: DelayNs>(
        &self,
        frame: &[u8],
        response: &mut [u8],
        delay: &mut D,
    ) -> InterfaceResult<(), Self::Error>;

    /// Perform the hardware reset sequence
    ///
    /// The implementation must:
    /// 1. Set RST pin low
    /// 2. Wait (20ms by default)
    /// 3. Set RST pin high
    /// 4. Wait for the controller to boot (500ms by default)
    fn reset<D: DelayNs>(&self, delay: &mut D) -> InterfaceResult<(), Self::Error>;

    /// Discard pending input and flush pending output
    fn clear_input(&self) -> InterfaceResult<(), Self::Error>;
}

impl<T: DisplayInterface> DisplayInterface for Arc<T> {
    type Error = T::Error;

    fn write_frame(&self, frame: &[u8]) -> InterfaceResult<(), Self::Error> {
        (**self).write_frame(frame)
    }

    fn read_response<D: DelayNs>(
        &self,
        response: &mut [u8],
        delay: &mut D,
    ) -> InterfaceResult<(), Self::Error> {
        (**self).read_response(response, delay)
    }

    fn exchange<D: DelayNs>(
        &self,
        frame: &[u8],
        response: &mut [u8],
        delay: &mut D,
    ) -> InterfaceResult<(), Self::Error> {
        (**self).exchange(frame, response, delay)
    }

    fn reset<D: DelayNs>(&self, delay: &mut D) -> InterfaceResult<(), Self::Error> {
        (**self).reset(delay)
    }

    fn clear_input(&self) -> InterfaceResult<(), Self::Error> {
        (**self).clear_input()
    }
}

/// Errors that can occur at the interface level
///
/// Generic over serial port and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SerialErr, PinErr> {
    /// Serial port error
    Serial(SerialErr),
    /// GPIO pin error
    Pin(PinErr),
    /// Port reported end of input before the full reply arrived
    UnexpectedEof,
    /// No reply within the configured timeout
    Timeout,
    /// Another thread panicked while holding the port
    Poisoned,
}

impl<SerialErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SerialErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Serial(e) => write!(f, "Serial error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
            Self::UnexpectedEof => write!(f, "Serial port closed mid-reply"),
            Self::Timeout => write!(f, "Timeout waiting for display reply"),
            Self::Poisoned => write!(f, "Serial port lock poisoned"),
        }
    }
}

impl<SerialErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SerialErr, PinErr> {}

/// Serial interface implementation for the panel controller
///
/// Implements [`DisplayInterface`] for an [`embedded_io`] port and an
/// embedded-hal reset pin.
///
/// ## Type Parameters
///
/// * `PORT` - Serial port implementing [`Read`], [`Write`] and [`ReadReady`]
/// * `RST` - Reset pin implementing [`OutputPin`]
pub struct Interface<PORT, RST> {
    /// Serial port, shared between writers and readers
    port: Mutex<PORT>,
    /// Reset pin (active low)
    rst: Mutex<RST>,
    /// Interval between reply polls in milliseconds
    poll_interval_ms: u32,
    /// Reply timeout in milliseconds (0 = wait forever)
    response_timeout_ms: u32,
    /// Reset low time in milliseconds
    reset_low_ms: u32,
    /// Post-reset settle time in milliseconds
    reset_settle_ms: u32,
}

impl<PORT, RST> core::fmt::Debug for Interface<PORT, RST> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Interface")
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("response_timeout_ms", &self.response_timeout_ms)
            .field("reset_low_ms", &self.reset_low_ms)
            .field("reset_settle_ms", &self.reset_settle_ms)
            .finish_non_exhaustive()
    }
}

impl<PORT, RST> Interface<PORT, RST>
where
    PORT: Read + Write + ReadReady,
    RST: OutputPin,
{
    /// Create a new Interface with default timings
    ///
    /// # Arguments
    ///
    /// * `port` - Serial port, already opened at 115200 8N1
    /// * `rst` - Reset pin (output, active low)
    pub fn new(port: PORT, rst: RST) -> Self {
        Self {
            port: Mutex::new(port),
            rst: Mutex::new(rst),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            response_timeout_ms: 0,
            reset_low_ms: DEFAULT_RESET_LOW_MS,
            reset_settle_ms: DEFAULT_RESET_SETTLE_MS,
        }
    }

    /// Create a new Interface with timings taken from `config`
    pub fn with_config(port: PORT, rst: RST, config: &Config) -> Self {
        let mut interface = Self::new(port, rst);
        interface.poll_interval_ms = config.poll_interval_ms;
        interface.response_timeout_ms = config.response_timeout_ms;
        interface.reset_low_ms = config.reset_low_ms;
        interface.reset_settle_ms = config.reset_settle_ms;
        interface
    }

    /// Set the reply timeout in milliseconds
    ///
    /// Default is 0, which waits for a reply forever.
    pub fn set_response_timeout(&mut self, timeout_ms: u32) -> &mut Self {
        self.response_timeout_ms = timeout_ms;
        self
    }

    /// Get the current reply timeout in milliseconds
    pub fn response_timeout(&self) -> u32 {
        self.response_timeout_ms
    }

    /// Set the reply poll interval in milliseconds
    pub fn set_poll_interval(&mut self, interval_ms: u32) -> &mut Self {
        self.poll_interval_ms = interval_ms.max(1);
        self
    }

    /// Get the reply poll interval in milliseconds
    pub fn poll_interval(&self) -> u32 {
        self.poll_interval_ms
    }

    /// Consume the interface and return the port and reset pin
    pub fn release(self) -> InterfaceResult<(PORT, RST), InterfaceError<PORT::Error, RST::Error>> {
        let port = self
            .port
            .into_inner()
            .map_err(|_| InterfaceError::Poisoned)?;
        let rst = self.rst.into_inner().map_err(|_| InterfaceError::Poisoned)?;
        Ok((port, rst))
    }

    fn write_locked(
        port: &mut PORT,
        frame: &[u8],
    ) -> InterfaceResult<(), InterfaceError<PORT::Error, RST::Error>> {
        port.write_all(frame).map_err(InterfaceError::Serial)?;
        port.flush().map_err(InterfaceError::Serial)?;
        log::trace!("> {} bytes {:02X?}", frame.len(), frame);
        Ok(())
    }

    fn read_locked<D: DelayNs>(
        &self,
        port: &mut PORT,
        response: &mut [u8],
        delay: &mut D,
    ) -> InterfaceResult<(), InterfaceError<PORT::Error, RST::Error>> {
        let mut waited_ms = 0u32;
        while !port.read_ready().map_err(InterfaceError::Serial)? {
            if self.response_timeout_ms > 0 && waited_ms >= self.response_timeout_ms {
                return Err(InterfaceError::Timeout);
            }
            delay.delay_ms(self.poll_interval_ms);
            waited_ms = waited_ms.saturating_add(self.poll_interval_ms);
        }

        port.read_exact(response).map_err(|e| match e {
            ReadExactError::UnexpectedEof => InterfaceError::UnexpectedEof,
            ReadExactError::Other(e) => InterfaceError::Serial(e),
        })?;
        log::trace!("< {} bytes {:02X?}", response.len(), response);
        Ok(())
    }
}

impl<PORT, RST> DisplayInterface for Interface<PORT, RST>
where
    PORT: Read + Write + ReadReady,
    RST: OutputPin,
{
    type Error = InterfaceError<PORT::Error, RST::Error>;

    fn write_frame(&self, frame: &[u8]) -> InterfaceResult<(), Self::Error> {
        let mut port = self.port.lock().map_err(|_| InterfaceError::Poisoned)?;
        Self::write_locked(&mut port, frame)
    }

    fn read_response<D: DelayNs>(
        &self,
        response: &mut [u8],
        delay: &mut D,
    ) -> InterfaceResult<(), Self::Error> {
        let mut port = self.port.lock().map_err(|_| InterfaceError::Poisoned)?;
        self.read_locked(&mut port, response, delay)
    }

    fn exchange<D: DelayNs>(
        &self,
        frame: &[u8],
        response: &mut [u8],
        delay: &mut D,
    ) -> InterfaceResult<(), Self::Error> {
        let mut port = self.port.lock().map_err(|_| InterfaceError::Poisoned)?;
        Self::write_locked(&mut port, frame)?;
        self.read_locked(&mut port, response, delay)
    }

    fn reset<D: DelayNs>(&self, delay: &mut D) -> InterfaceResult<(), Self::Error> {
        let mut rst = self.rst.lock().map_err(|_| InterfaceError::Poisoned)?;
        // Reset sequence: LOW -> wait -> HIGH -> wait for boot
        rst.set_low().map_err(InterfaceError::Pin)?;
        delay.delay_ms(self.reset_low_ms);
        rst.set_high().map_err(InterfaceError::Pin)?;
        delay.delay_ms(self.reset_settle_ms);
        Ok(())
    }

    fn clear_input(&self) -> InterfaceResult<(), Self::Error> {
        let mut port = self.port.lock().map_err(|_| InterfaceError::Poisoned)?;
        let mut scratch = [0u8; 64];
        let mut dropped = 0usize;
        while port.read_ready().map_err(InterfaceError::Serial)? {
            let n = port.read(&mut scratch).map_err(InterfaceError::Serial)?;
            if n == 0 {
                break;
            }
            dropped += n;
        }
        port.flush().map_err(InterfaceError::Serial)?;
        if dropped > 0 {
            log::debug!("discarded {} stale input bytes", dropped);
        }
        Ok(())
    }
}
