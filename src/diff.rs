//! Changed-region detection between two frames
//!
//! The serial link is slow, so only the bounding box of pixels that differ
//! from what the panel already shows is retransmitted. [`diff_region`] finds
//! that box and [`DiffRegion::aligned`] widens it to the byte-aligned
//! [`Region`] the partial-layout command can address.

use crate::matrix::PixelBuffer;

/// Bounding box of changed pixels, all bounds inclusive
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiffRegion {
    /// Leftmost changed column
    pub min_x: u16,
    /// Rightmost changed column
    pub max_x: u16,
    /// Topmost changed row
    pub min_y: u16,
    /// Bottommost changed row
    pub max_y: u16,
}

/// Byte-aligned rectangle addressed by a partial-layout frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    /// X coordinate in pixels (multiple of 8)
    pub x: u16,
    /// Y coordinate in pixels
    pub y: u16,
    /// Width in pixels (multiple of 8)
    pub w: u16,
    /// Height in pixels
    pub h: u16,
}

impl Region {
    /// Create a new region
    #[allow(clippy::many_single_char_names)]
    pub fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// Number of packed pixel bytes covering this region
    pub fn payload_len(&self) -> usize {
        (self.w as usize / 8) * self.h as usize
    }
}

impl DiffRegion {
    /// Widen to the region a partial-layout frame can carry
    ///
    /// `min_x` rounds down to a multiple of 8, `max_x` rounds up past the next
    /// multiple of 8 (clamped to `panel_width`), and `max_y` becomes exclusive
    /// (clamped to `panel_height`).
    pub fn aligned(&self, panel_width: u16, panel_height: u16) -> Region {
        let min_x = (self.min_x / 8) * 8;
        let max_x = ((self.max_x / 8) * 8 + 8).min(panel_width);
        let max_y = (self.max_y + 1).min(panel_height);

        Region::new(min_x, self.min_y, max_x - min_x, max_y - self.min_y)
    }
}

/// Compute the bounding box of every pixel that differs between two buffers
///
/// Returns `None` when the buffers are identical, which callers treat as
/// "nothing to send".
///
/// # Panics
///
/// Panics if the buffers differ in size. Both sides of a diff are always
/// panel-sized, so a mismatch is a caller bug rather than a runtime condition.
pub fn diff_region(previous: &PixelBuffer, current: &PixelBuffer) -> Option<DiffRegion> {
    assert!(
        previous.same_size(current),
        "cannot diff {}x{} against {}x{}",
        previous.width(),
        previous.height(),
        current.width(),
        current.height()
    );

    let mut region: Option<DiffRegion> = None;

    for (y, (old_row, new_row)) in previous.rows().zip(current.rows()).enumerate() {
        for (x, (old, new)) in old_row.iter().zip(new_row).enumerate() {
            if old == new {
                continue;
            }
            let (x, y) = (x as u16, y as u16);
            region = Some(match region {
                None => DiffRegion {
                    min_x: x,
                    max_x: x,
                    min_y: y,
                    max_y: y,
                },
                Some(r) => DiffRegion {
                    min_x: r.min_x.min(x),
                    max_x: r.max_x.max(x),
                    min_y: r.min_y.min(y),
                    max_y: r.max_y.max(y),
                },
            });
        }
    }

    region
}
