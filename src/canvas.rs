//! 256 x 48 monochrome drawing surface.
//!
//! Pixels are packed vertically (8 rows per byte, LSB on top) in row-group
//! major order, the layout [`gram::transform`](crate::gram::transform) reads.
//! Lines, shapes and text come from `embedded-graphics` through the
//! [`DrawTarget`] implementation.

use core::convert::Infallible;

use embedded_graphics_core::pixelcolor::BinaryColor;
use embedded_graphics_core::prelude::{DrawTarget, OriginDimensions, Pixel, Size};

use crate::gram::{FramebufferSource, HEIGHT, ROW_GROUPS, WIDTH};

/// Canvas size in bytes.
pub const CANVAS_SIZE: usize = WIDTH * ROW_GROUPS;

#[derive(Clone)]
pub struct Canvas {
    buffer: [u8; CANVAS_SIZE],
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// A blank canvas (all pixels off).
    pub const fn new() -> Self {
        Self {
            buffer: [0; CANVAS_SIZE],
        }
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: BinaryColor) {
        let value = if color.is_on() { 0xFF } else { 0x00 };
        self.buffer.fill(value);
    }

    /// Invert all pixels.
    pub fn invert(&mut self) {
        for byte in self.buffer.iter_mut() {
            *byte ^= 0xFF;
        }
    }

    /// Set one pixel. Coordinates outside the panel are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: BinaryColor) {
        let Some(index) = Self::index(x, y) else {
            return;
        };
        let mask = 1u8 << (y % 8);
        if color.is_on() {
            self.buffer[index] |= mask;
        } else {
            self.buffer[index] &= !mask;
        }
    }

    /// Pixel state, `None` outside the panel.
    pub fn pixel(&self, x: usize, y: usize) -> Option<BinaryColor> {
        let index = Self::index(x, y)?;
        Some(BinaryColor::from(self.buffer[index] & (1 << (y % 8)) != 0))
    }

    /// Draw a 1bpp bitmap with MSB-first rows padded to whole bytes.
    ///
    /// The bitmap is opaque: set bits are drawn in `color`, clear bits in the
    /// inverse color.
    pub fn draw_bitmap(
        &mut self,
        x: i32,
        y: i32,
        bitmap: &[u8],
        width: usize,
        height: usize,
        color: BinaryColor,
    ) {
        let bytes_per_row = width.div_ceil(8);
        for row in 0..height {
            for col in 0..width {
                let Some(&byte) = bitmap.get(row * bytes_per_row + col / 8) else {
                    return;
                };
                let pixel_color = if byte & (0x80 >> (col % 8)) != 0 {
                    color
                } else {
                    color.invert()
                };
                let (px, py) = (x + col as i32, y + row as i32);
                if px >= 0 && py >= 0 {
                    self.set_pixel(px as usize, py as usize, pixel_color);
                }
            }
        }
    }

    pub fn as_bytes(&self) -> &[u8; CANVAS_SIZE] {
        &self.buffer
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8; CANVAS_SIZE] {
        &mut self.buffer
    }

    fn index(x: usize, y: usize) -> Option<usize> {
        if x >= WIDTH || y >= HEIGHT {
            return None;
        }
        Some((y / 8) * WIDTH + x)
    }
}

impl FramebufferSource for Canvas {
    fn byte_at(&self, row_group: usize, column: usize) -> u8 {
        self.buffer[..].byte_at(row_group, column)
    }
}

impl DrawTarget for Canvas {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as usize, point.y as usize, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}
