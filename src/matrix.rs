//! Binary pixel buffers
//!
//! A [`PixelBuffer`] is a rectangular 1-bit bitmap with an anchor position in
//! a larger coordinate space (usually the panel). Widgets render into their own
//! buffers anchored at the widget position, and buffers are composed by
//! [`merge`](PixelBuffer::merge)ing them into a larger one.
//!
//! ## Example
//!
//! ```
//! use mui_panel::PixelBuffer;
//!
//! let mut panel = PixelBuffer::new(200, 32);
//!
//! let mut glyph = PixelBuffer::new(8, 8);
//! glyph.set(0, 0, true);
//! glyph.set_anchor(10, 4);
//!
//! panel.merge(&glyph);
//! assert!(panel.get(10, 4));
//! ```

use core::fmt;

/// Rectangular binary bitmap anchored at `(anchor_x, anchor_y)`
///
/// The pixel grid is stored row-major and its dimensions never change after
/// construction; only pixel values and the anchor are mutable.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u16,
    height: u16,
    anchor_x: i32,
    anchor_y: i32,
    pixels: Vec<bool>,
}

impl PixelBuffer {
    /// Create an all-off buffer anchored at the origin
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            anchor_x: 0,
            anchor_y: 0,
            pixels: vec![false; width as usize * height as usize],
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Horizontal anchor in the parent coordinate space
    pub fn anchor_x(&self) -> i32 {
        self.anchor_x
    }

    /// Vertical anchor in the parent coordinate space
    pub fn anchor_y(&self) -> i32 {
        self.anchor_y
    }

    /// Move the buffer to a new anchor position
    pub fn set_anchor(&mut self, x: i32, y: i32) {
        self.anchor_x = x;
        self.anchor_y = y;
    }

    /// Whether `other` has the same width and height
    pub fn same_size(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Read the pixel at local coordinates
    ///
    /// Coordinates outside the buffer read as off.
    pub fn get(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.pixels[i])
    }

    /// Write the pixel at local coordinates
    ///
    /// Writes outside the buffer are ignored.
    pub fn set(&mut self, x: i32, y: i32, on: bool) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = on;
        }
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.pixels.fill(false);
    }

    /// Iterate over the rows of the buffer, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        // chunks_exact(0) panics, and a zero-width buffer has no rows anyway
        let width = (self.width as usize).max(1);
        self.pixels.chunks_exact(width)
    }

    /// Copy `other` into this buffer where their absolute rectangles overlap
    ///
    /// Both buffers are positioned by their anchors. Pixels of `self` outside
    /// the overlap are left untouched; pixels inside it take `other`'s value,
    /// including off pixels.
    pub fn merge(&mut self, other: &Self) {
        let left = self.anchor_x.max(other.anchor_x);
        let top = self.anchor_y.max(other.anchor_y);
        let right = (self.anchor_x + self.width as i32).min(other.anchor_x + other.width as i32);
        let bottom =
            (self.anchor_y + self.height as i32).min(other.anchor_y + other.height as i32);

        for abs_y in top..bottom {
            for abs_x in left..right {
                let value = other.get(abs_x - other.anchor_x, abs_y - other.anchor_y);
                self.set(abs_x - self.anchor_x, abs_y - self.anchor_y, value);
            }
        }
    }

    /// Replace every pixel with the corresponding pixel of `other`
    ///
    /// The anchor of `self` is kept.
    ///
    /// # Panics
    ///
    /// Panics if the buffers differ in size.
    pub fn copy_from(&mut self, other: &Self) {
        assert!(
            self.same_size(other),
            "buffer size mismatch: {}x{} vs {}x{}",
            self.width,
            self.height,
            other.width,
            other.height
        );
        self.pixels.copy_from_slice(&other.pixels);
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "PixelBuffer {}x{} @ ({}, {})",
            self.width, self.height, self.anchor_x, self.anchor_y
        )?;
        for row in self.rows() {
            for &on in row {
                f.write_str(if on { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
