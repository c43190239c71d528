//! Panel wire-protocol constants
//!
//! Every request sent to the panel controller is a length-prefixed frame:
//!
//! 1. 2-byte big-endian length (bytes that follow the length, checksum included)
//! 2. 2-byte opcode
//! 3. Opcode-specific data
//! 4. 1-byte checksum: low byte of the sum of everything after the length field
//!
//! The controller answers every request with a fixed 6-byte response that
//! contains [`ACK`] or [`NACK`].
//!
//! ## Example
//!
//! ```
//! use mui_panel::{command, frame};
//!
//! let packet = frame::display_request(command::DisplayMode::On, 0, 100);
//! assert_eq!(&packet[..4], &command::DISPLAY_REQUEST_HEADER);
//! ```

/// Panel width in pixels
pub const PANEL_WIDTH: u16 = 200;

/// Panel height in pixels
pub const PANEL_HEIGHT: u16 = 32;

/// Packed bytes per panel row (8 pixels per byte)
pub const ROW_BYTES: usize = PANEL_WIDTH as usize / 8;

// Opcodes

/// Display power/refresh request opcode (0x0003)
pub const OP_DISPLAY_REQUEST: [u8; 2] = [0x00, 0x03];

/// Layout (pixel data) write opcode (0x0002)
///
/// Used by both full and partial layout frames; the geometry fields select
/// the target rectangle.
pub const OP_LAYOUT: [u8; 2] = [0x00, 0x02];

// Fixed headers

/// Header of the display power/refresh request
///
/// Length 6 (opcode + fade + duty + mode + checksum) followed by [`OP_DISPLAY_REQUEST`].
pub const DISPLAY_REQUEST_HEADER: [u8; 4] =
    [0x00, 0x06, OP_DISPLAY_REQUEST[0], OP_DISPLAY_REQUEST[1]];

/// Total size of a display power/refresh request
pub const DISPLAY_REQUEST_LEN: usize = 8;

/// Header of the full-panel layout frame
///
/// Length 0x032B = 811 (opcode + geometry + 800 data bytes + checksum) followed
/// by [`OP_LAYOUT`].
pub const FULL_LAYOUT_HEADER: [u8; 4] = [0x03, 0x2B, OP_LAYOUT[0], OP_LAYOUT[1]];

/// Size of the geometry block (x, y, width, height as big-endian u16)
pub const GEOMETRY_LEN: usize = 8;

/// Packed pixel bytes of a full-panel frame (32 rows x 25 bytes)
pub const FULL_LAYOUT_PAYLOAD_LEN: usize = ROW_BYTES * PANEL_HEIGHT as usize;

/// Total size of a full-panel layout frame
pub const FULL_LAYOUT_LEN: usize = 4 + GEOMETRY_LEN + FULL_LAYOUT_PAYLOAD_LEN + 1;

/// Offset of the first byte covered by the checksum
///
/// The length field is excluded, the opcode and everything after it is summed.
pub const CHECKSUM_START: usize = 2;

// Responses

/// Positive acknowledgement byte
pub const ACK: u8 = 0x06;

/// Negative acknowledgement byte
pub const NACK: u8 = 0x15;

/// Size of every controller response
pub const RESPONSE_LEN: usize = 6;

/// Mode byte of the display power/refresh request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum DisplayMode {
    /// Light the panel
    On = 0,
    /// Re-latch the panel from its layout memory with a new fade/duty
    Refresh = 1,
    /// Blank the panel
    Off = 2,
}
