//! Hex character conversion.
//!
//! Every number on the wire is lowercase hex. Decoding is lenient: both
//! cases are accepted and any other character counts as zero.

/// Character for the low nibble of `n`. Values above 15 map to `'0'`.
#[inline]
pub const fn hex_digit(n: u8) -> u8 {
    match n {
        0..=9 => b'0' + n,
        10..=15 => b'a' + n - 10,
        _ => b'0',
    }
}

/// Value of a hex character; anything that is not one decodes to 0.
#[inline]
pub const fn hex_value(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}

/// Two characters for `byte`, high nibble first.
#[inline]
pub const fn encode_byte(byte: u8) -> [u8; 2] {
    [hex_digit(byte >> 4), hex_digit(byte & 0x0f)]
}

/// Byte from a high and a low hex character.
#[inline]
pub const fn decode_byte(high: u8, low: u8) -> u8 {
    (hex_value(high) << 4) | hex_value(low)
}

/// Reverse the byte order of a word.
///
/// Register values arrive as big-endian text but are stored in the
/// target's little-endian layout.
#[inline]
pub const fn swap_endian(value: u32) -> u32 {
    value.swap_bytes()
}

/// Running sum of transmitted characters, modulo 256.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Checksum(u8);

impl Checksum {
    pub const fn new() -> Self {
        Self(0)
    }

    pub fn add(&mut self, c: u8) {
        self.0 = self.0.wrapping_add(c);
    }

    pub fn add_all(&mut self, chars: &[u8]) {
        for &c in chars {
            self.add(c);
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}
