//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors during display operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Serial link and GPIO failures
//!
//! Reaching a state with nothing to do (no changed pixels, no text) is not an
//! error: those operations return `Ok(false)` or `None`.
//!
//! ## Example
//!
//! ```
//! use mui_panel::{Builder, BuilderError};
//!
//! let result = Builder::new().poll_interval_ms(0).build();
//! assert!(matches!(result, Err(BuilderError::InvalidPollInterval)));
//! ```

use crate::interface::DisplayInterface;

/// Errors that can occur when driving the display
///
/// Generic over the interface type to preserve the specific error type.
/// This allows error handling code to match on the underlying link error.
pub enum Error<I: DisplayInterface> {
    /// Interface error (serial link or reset GPIO)
    ///
    /// Wraps the underlying error from the [`DisplayInterface`] implementation.
    /// A frame whose write failed is never considered sent.
    Interface(I::Error),
    /// A buffer does not match the size it is being copied into
    DimensionMismatch {
        /// Required (width, height)
        expected: (u16, u16),
        /// Provided (width, height)
        provided: (u16, u16),
    },
}

impl<I: DisplayInterface> core::fmt::Debug for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => f.debug_tuple("Interface").field(e).finish(),
            Self::DimensionMismatch { expected, provided } => f
                .debug_struct("DimensionMismatch")
                .field("expected", expected)
                .field("provided", provided)
                .finish(),
        }
    }
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::DimensionMismatch { expected, provided } => write!(
                f,
                "Buffer size mismatch: expected {}x{}, provided {}x{}",
                expected.0, expected.1, provided.0, provided.1
            ),
        }
    }
}

impl<I: DisplayInterface> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
#[derive(Debug)]
pub enum BuilderError {
    /// Poll interval of zero would spin on the port
    InvalidPollInterval,
    /// Reply size of zero would never consume the controller's reply
    InvalidResponseLength,
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidPollInterval => write!(f, "Poll interval must be at least 1ms"),
            Self::InvalidResponseLength => write!(f, "Response length must be at least 1 byte"),
        }
    }
}

impl core::error::Error for BuilderError {}
