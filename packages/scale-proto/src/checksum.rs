//! XOR block check used by scale frames.
//!
//! The checksum covers every byte between the start marker and the checksum
//! itself, and is sent as two printable characters, high nibble first.

/// Accumulates `data` with bitwise XOR, starting from zero.
///
/// An empty slice yields `0`.
pub fn xor_checksum(data: &[u8]) -> u8 {
    data.iter().fold(0, |acc, byte| acc ^ byte)
}

/// Maps a nibble (`0..=15`) to its wire character.
///
/// Nibbles above 9 are offset from `'0'` by an extra 7, which is how the
/// scale firmware computes them.
const fn nibble_char(nibble: u8) -> u8 {
    if nibble <= 9 {
        nibble + b'0'
    } else {
        nibble + b'0' + 7
    }
}

const fn char_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        // b'0' + 7 + 10 ..= b'0' + 7 + 15
        b'A'..=b'F' => Some(c - b'0' - 7),
        _ => None,
    }
}

/// Renders a checksum as two wire characters, high nibble first.
pub const fn checksum_chars(value: u8) -> [u8; 2] {
    [nibble_char(value >> 4), nibble_char(value & 0x0F)]
}

/// Inverse of [`checksum_chars`].
///
/// Returns `None` if either character could not have been produced by it.
pub const fn checksum_from_chars(chars: [u8; 2]) -> Option<u8> {
    match (char_nibble(chars[0]), char_nibble(chars[1])) {
        (Some(high), Some(low)) => Some(high << 4 | low),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn empty_is_zero() {
        assert_eq!(xor_checksum(&[]), 0);
    }

    #[test]
    fn order_does_not_matter() {
        let data = b"1D+0070152";
        let reversed: Vec<u8> = data.iter().rev().copied().collect();

        assert_eq!(xor_checksum(data), xor_checksum(&reversed));
        assert_eq!(xor_checksum(data), 0x6F);
    }

    #[test]
    fn low_nibbles_are_digits() {
        for n in 0..=9u8 {
            assert_eq!(checksum_chars(n), [b'0', b'0' + n]);
            assert_eq!(checksum_chars(n << 4), [b'0' + n, b'0']);
        }
    }

    #[test]
    fn high_nibbles_use_offset() {
        for n in 10..=15u8 {
            assert_eq!(checksum_chars(n), [b'0', b'0' + 7 + n]);
            assert_eq!(checksum_chars(n << 4), [b'0' + 7 + n, b'0']);
        }
        assert_eq!(&checksum_chars(0x6F), b"6F");
        assert_eq!(&checksum_chars(0xA0), b"A0");
    }

    #[test]
    fn chars_invert() {
        for value in 0..=u8::MAX {
            assert_eq!(checksum_from_chars(checksum_chars(value)), Some(value));
        }
    }

    #[test]
    fn rejects_foreign_chars() {
        assert_eq!(checksum_from_chars(*b"6f"), None);
        assert_eq!(checksum_from_chars(*b":0"), None);
        assert_eq!(checksum_from_chars(*b"0G"), None);
    }
}
