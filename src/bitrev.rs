//! Bit order conversion for the LSB-first wire protocol.
//!
//! The GP1294AI samples every byte least-significant bit first, while most
//! SPI peripherals (and the `embedded-hal` traits) only shift MSB first. All
//! other modules work in natural bit order; the protocol layer calls into this
//! module exactly once per transmission.

/// Builds the 256-entry reversal table at compile time.
const fn build_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut b = i as u8;
        b = (b & 0xF0) >> 4 | (b & 0x0F) << 4;
        b = (b & 0xCC) >> 2 | (b & 0x33) << 2;
        b = (b & 0xAA) >> 1 | (b & 0x55) << 1;
        table[i] = b;
        i += 1;
    }
    table
}

/// `REVERSE_BITS[b]` is `b` with bit 0 swapped with bit 7, bit 1 with bit 6, and so on.
pub static REVERSE_BITS: [u8; 256] = build_table();

/// Reverse the bit order of a single byte.
#[inline]
pub fn reverse(byte: u8) -> u8 {
    REVERSE_BITS[byte as usize]
}

/// Reverse the bit order of every byte in place. Length and byte order are unchanged.
pub fn reverse_all(bytes: &mut [u8]) {
    for byte in bytes.iter_mut() {
        *byte = reverse(*byte);
    }
}

/// Write the bit-reversed copy of `src` into `dst` and return the written part.
///
/// Returns `None`, leaving `dst` untouched, when `dst` is shorter than `src`.
pub fn reverse_into<'a>(src: &[u8], dst: &'a mut [u8]) -> Option<&'a [u8]> {
    let dst = dst.get_mut(..src.len())?;
    for (out, byte) in dst.iter_mut().zip(src) {
        *out = reverse(*byte);
    }
    Some(dst)
}
