//! Canvas to GRAM conversion.
//!
//! The visible panel is 256 x 48 pixels, but the controller addresses a
//! 512-column GRAM where each column holds 8 bytes (64 rows, of which bytes
//! 0-5 are visible). Every physical column is written to two adjacent GRAM
//! columns.
//!
//! ```text
//! canvas (row-group major)            GRAM (column major)
//! g=0: [x0][x1][x2]...[x255]          col 0: [g0 g1 g2 g3 g4 g5 0 0]  <- x0
//! g=1: [x0][x1][x2]...[x255]          col 1: [g0 g1 g2 g3 g4 g5 0 0]  <- x0
//! ...                                 col 2: [g0 g1 g2 g3 g4 g5 0 0]  <- x1
//! g=5: [x0][x1][x2]...[x255]          ...
//! ```

/// Visible width in pixels.
pub const WIDTH: usize = 256;
/// Visible height in pixels.
pub const HEIGHT: usize = 48;
/// Rows of 8 vertically packed pixels.
pub const ROW_GROUPS: usize = HEIGHT / 8;

/// Number of addressable GRAM columns.
pub const GRAM_COLUMNS: usize = 512;
/// Bytes per GRAM column.
pub const GRAM_STRIDE: usize = 8;
/// Size of a full GRAM image.
pub const GRAM_SIZE: usize = GRAM_COLUMNS * GRAM_STRIDE;
/// GRAM columns per physical pixel column.
pub const COLUMNS_PER_PIXEL: usize = GRAM_COLUMNS / WIDTH;

/// Byte forced on in every visible frame: column 0, byte 0.
pub const TRIGGER_INDEX: usize = 0;
pub const TRIGGER_VALUE: u8 = 0xFF;

/// A monochrome 256 x 48 pixel source.
///
/// `byte_at(g, x)` returns the 8 pixels of column `x` in rows `8g..8g+8`,
/// least significant bit topmost.
pub trait FramebufferSource {
    fn byte_at(&self, row_group: usize, column: usize) -> u8;
}

impl<T: FramebufferSource + ?Sized> FramebufferSource for &T {
    fn byte_at(&self, row_group: usize, column: usize) -> u8 {
        (**self).byte_at(row_group, column)
    }
}

/// Raw row-group-major bytes (`index = row_group * WIDTH + column`). Missing bytes read as 0.
impl FramebufferSource for [u8] {
    fn byte_at(&self, row_group: usize, column: usize) -> u8 {
        self.get(row_group * WIDTH + column).copied().unwrap_or(0)
    }
}

/// Convert `source` into a complete GRAM image, trigger byte included.
///
/// The whole of `gram` is overwritten, so a buffer can be reused across frames.
pub fn transform<S: FramebufferSource + ?Sized>(source: &S, gram: &mut [u8; GRAM_SIZE]) {
    gram.fill(0);

    for (x, pair) in gram
        .chunks_exact_mut(GRAM_STRIDE * COLUMNS_PER_PIXEL)
        .enumerate()
    {
        let (left, right) = pair.split_at_mut(GRAM_STRIDE);
        for g in 0..ROW_GROUPS {
            let value = source.byte_at(g, x);
            left[g] = value;
            right[g] = value;
        }
    }

    apply_trigger(gram);
}

/// Force the trigger byte. Without it the controller accepts the write but does not redraw.
pub fn apply_trigger(gram: &mut [u8; GRAM_SIZE]) {
    gram[TRIGGER_INDEX] = TRIGGER_VALUE;
}
