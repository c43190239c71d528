//! Frame encoding for the panel wire protocol
//!
//! All builders are stateless: they take pixels and geometry and return the
//! exact bytes to put on the wire. See [`crate::command`] for the frame layout.
//!
//! Pixels are packed 8 per byte, most significant bit first: bit 7 carries the
//! leftmost pixel of each 8-pixel group.
//!
//! ## Example
//!
//! ```
//! use mui_panel::{frame, PixelBuffer};
//!
//! let previous = PixelBuffer::new(200, 32);
//! let mut current = previous.clone();
//! current.set(5, 5, true);
//!
//! let packet = frame::layout_for_diff(&previous, &current).unwrap_or_default();
//! // length, opcode, geometry (x=0, y=5, w=8, h=1), one data byte, checksum
//! assert_eq!(packet.len(), 14);
//! assert_eq!(packet[12], 0x04);
//! ```

use crate::command::{
    ACK, CHECKSUM_START, DISPLAY_REQUEST_HEADER, DISPLAY_REQUEST_LEN, DisplayMode,
    FULL_LAYOUT_HEADER, FULL_LAYOUT_LEN, GEOMETRY_LEN, NACK, OP_LAYOUT, PANEL_HEIGHT, PANEL_WIDTH,
};
use crate::diff::{Region, diff_region};
use crate::matrix::PixelBuffer;

/// Low byte of the unsigned sum of `bytes`
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Pack 8 pixels into one byte, first pixel in bit 7
pub fn pack_pixels(pixels: [bool; 8]) -> u8 {
    pixels
        .iter()
        .enumerate()
        .fold(0u8, |byte, (i, &on)| if on { byte | (0x80 >> i) } else { byte })
}

/// Inverse of [`pack_pixels`]
pub fn unpack_pixels(byte: u8) -> [bool; 8] {
    let mut pixels = [false; 8];
    for (i, pixel) in pixels.iter_mut().enumerate() {
        *pixel = byte & (0x80 >> i) != 0;
    }
    pixels
}

/// Build a display power/refresh request
///
/// `fade` and `duty` are passed through to the controller unchanged.
pub fn display_request(mode: DisplayMode, fade: u8, duty: u8) -> [u8; DISPLAY_REQUEST_LEN] {
    let mut buf = [0u8; DISPLAY_REQUEST_LEN];
    buf[..4].copy_from_slice(&DISPLAY_REQUEST_HEADER);
    buf[4] = fade;
    buf[5] = duty;
    buf[6] = mode as u8;
    buf[7] = checksum(&buf[CHECKSUM_START..7]);
    buf
}

/// Append the packed pixels of `region` to `out`, row by row
fn push_packed(out: &mut Vec<u8>, pixels: &PixelBuffer, region: Region) {
    let (x0, y0) = (region.x as i32, region.y as i32);
    for y in y0..y0 + region.h as i32 {
        for group in (x0..x0 + region.w as i32).step_by(8) {
            let mut bits = [false; 8];
            for (i, bit) in bits.iter_mut().enumerate() {
                *bit = pixels.get(group + i as i32, y);
            }
            out.push(pack_pixels(bits));
        }
    }
}

fn push_geometry(out: &mut Vec<u8>, region: Region) {
    for value in [region.x, region.y, region.w, region.h] {
        out.extend_from_slice(&value.to_be_bytes());
    }
}

/// Build the full-panel layout frame (813 bytes)
///
/// `pixels` is read in local coordinates; anything beyond 200x32 is ignored
/// and missing pixels are sent as off.
pub fn full_layout(pixels: &PixelBuffer) -> Vec<u8> {
    let mut buf = Vec::with_capacity(FULL_LAYOUT_LEN);
    buf.extend_from_slice(&FULL_LAYOUT_HEADER);
    let region = Region::new(0, 0, PANEL_WIDTH, PANEL_HEIGHT);
    push_geometry(&mut buf, region);
    push_packed(&mut buf, pixels, region);
    buf.push(checksum(&buf[CHECKSUM_START..]));
    buf
}

/// Build a partial layout frame covering `region`
///
/// `region` must be byte-aligned horizontally (see
/// [`DiffRegion::aligned`](crate::diff::DiffRegion::aligned)).
pub fn partial_layout(pixels: &PixelBuffer, region: Region) -> Vec<u8> {
    let data_len = GEOMETRY_LEN + region.payload_len();
    // opcode + data + checksum
    let length = (data_len + 3) as u16;

    let mut buf = Vec::with_capacity(data_len + 5);
    buf.extend_from_slice(&length.to_be_bytes());
    buf.extend_from_slice(&OP_LAYOUT);
    push_geometry(&mut buf, region);
    push_packed(&mut buf, pixels, region);
    buf.push(checksum(&buf[CHECKSUM_START..]));
    buf
}

/// Build the partial layout frame that turns `previous` into `current`
///
/// Returns `None` when nothing changed.
///
/// # Panics
///
/// Panics if the buffers differ in size.
pub fn layout_for_diff(previous: &PixelBuffer, current: &PixelBuffer) -> Option<Vec<u8>> {
    let diff = diff_region(previous, current)?;
    let region = diff.aligned(PANEL_WIDTH, PANEL_HEIGHT);
    Some(partial_layout(current, region))
}

/// Classified controller response
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    /// Request accepted
    Ack,
    /// Request rejected
    Nack,
    /// Neither ACK nor NACK found in the reply
    Unknown,
}

impl Response {
    /// Classify a raw reply by looking for an ACK or NACK byte
    pub fn parse(reply: &[u8]) -> Self {
        if reply.contains(&NACK) {
            Self::Nack
        } else if reply.contains(&ACK) {
            Self::Ack
        } else {
            Self::Unknown
        }
    }
}
