//! Serial Dot-Matrix Panel Driver
//!
//! A driver and widget layer for 200x32 monochrome dot-matrix panels driven
//! over a UART link.
//!
//! ## Features
//!
//! - `embedded-hal` v1.0 reset pin and delays, `embedded-io` serial port
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Partial updates: only the byte-aligned box of changed pixels is sent
//! - Text widget with wrapping, alignment, borders and append fast path
//! - Touch dispatch to weakly held listeners
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::OutputPin;
//! use mui_panel::{Builder, Display, Interface, Layout, PixelBuffer, Widget};
//! use mui_panel::text::{GlyphSource, Text};
//!
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
//! # struct Font;
//! # impl GlyphSource for Font {
//! #     fn glyph(&self, _c: char) -> PixelBuffer { PixelBuffer::new(6, 8) }
//! # }
//! # let port = MockPort;
//! # let rst = MockPin;
//! # let mut delay = MockDelay;
//! let config = match Builder::new().response_timeout_ms(2_000).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let interface = Interface::with_config(port, rst, &config);
//! let mut display = Display::new(interface, config);
//! let _ = display.init(&mut delay);
//!
//! let mut greeting = Text::new(Font).with_text("hello");
//! greeting.set_bounds(0, 0, 100, 8);
//!
//! let mut screen = Layout::full_screen();
//! screen.add_child(Box::new(greeting));
//!
//! if let Some(pixels) = screen.matrix() {
//!     let _ = display.set_layout(pixels);
//! }
//! let _ = display.update_layout(&mut delay);
//! let _ = display.turn_on(0, &mut delay);
//! ```

/// Panel wire-protocol constants
pub mod command;
/// Link configuration types and builder
pub mod config;
/// Changed-region detection
pub mod diff;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Frame encoding
pub mod frame;
/// Serial link abstraction
pub mod interface;
/// Screen container
pub mod layout;
/// Binary pixel buffers
pub mod matrix;
/// Text widget
pub mod text;
/// Widget base and touch dispatch
pub mod widget;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use command::{DisplayMode, PANEL_HEIGHT, PANEL_WIDTH};
pub use config::{Builder, Config};
pub use diff::{DiffRegion, Region, diff_region};
pub use display::Display;
pub use error::{BuilderError, Error};
pub use interface::{DisplayInterface, Interface, InterfaceError};
pub use layout::Layout;
pub use matrix::PixelBuffer;
pub use text::{Border, GlyphSource, Text, TextAlignment};
pub use widget::{MotionAction, MotionEvent, TouchListener, Widget, WidgetBase};
