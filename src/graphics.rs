//! Graphics support for pixel buffers
//!
//! With the `graphics` feature, [`PixelBuffer`] implements the
//! [`DrawTarget`] trait from the embedded-graphics ecosystem, so lines,
//! shapes and bitmap fonts can be drawn straight into a widget's buffer or
//! into the panel layout. Drawing uses local coordinates; the anchor is
//! ignored. `BinaryColor::On` lights a dot.
//!
//! ## Example
//!
//! ```rust
//! use embedded_graphics::{
//!     pixelcolor::BinaryColor,
//!     prelude::*,
//!     primitives::{Line, PrimitiveStyle},
//! };
//! use mui_panel::PixelBuffer;
//!
//! let mut layout = PixelBuffer::new(200, 32);
//! let _ = Line::new(Point::new(0, 31), Point::new(199, 31))
//!     .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
//!     .draw(&mut layout);
//!
//! assert!(layout.get(100, 31));
//! ```

use core::convert::Infallible;

use embedded_graphics_core::{
    Pixel,
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::BinaryColor,
};

use crate::matrix::PixelBuffer;

impl DrawTarget for PixelBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        // out-of-range writes are dropped by `set`
        for Pixel(Point { x, y }, color) in pixels {
            self.set(x, y, color.is_on());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        if color.is_on() {
            for y in 0..self.height() as i32 {
                for x in 0..self.width() as i32 {
                    self.set(x, y, true);
                }
            }
        } else {
            PixelBuffer::clear(self);
        }
        Ok(())
    }
}

impl OriginDimensions for PixelBuffer {
    fn size(&self) -> Size {
        Size::new(self.width() as u32, self.height() as u32)
    }
}
