//! The special-escape encoder for Paradox text engines.
//!
//! The games read localisation as Windows-1252. Characters outside that code page
//! are smuggled through as three 8-bit values, `[marker, low, high]`, which a
//! patched engine decodes back into one code point. The marker records whether
//! `low` or `high` had to be shifted away from a byte the engine treats specially.

use std::collections::HashMap;

use encoding_rs::WINDOWS_1252;
use lazy_static::lazy_static;

use crate::{error::Error, traits::Encoder};

const ESCAPE_MARKER: u32 = 0x10;
const LOW_SHIFT: u8 = 0x0E;
const HIGH_SHIFT: u8 = 0x09;

/// Bytes with a meaning of their own in game scripts and localisation.
const RESERVED_BYTES: [u8; 23] = [
    0xA4, 0xA3, 0xA7, 0x24, 0x5B, 0x00, 0x5C, 0x20, 0x0D, 0x0A, 0x22, 0x7B, 0x7D, 0x40, 0x80,
    0x7E, 0x2F, 0xBD, 0x3B, 0x5D, 0x5F, 0x3D, 0x23,
];

lazy_static! {
    // Every byte decodes to exactly one character under the WHATWG mapping.
    static ref CP1252_BYTES: HashMap<u32, u8> = (0u8..=0xFF)
        .filter_map(|byte| {
            let bytes = [byte];
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(&bytes);
            text.chars().next().map(|c| (u32::from(c), byte))
        })
        .collect();
}

/// Encoder that passes Windows-1252 characters through as their byte value and
/// escapes everything else in the basic multilingual plane.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecialEscapeEncoder;

impl SpecialEscapeEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encodes one code point, appending the result to `out`.
    ///
    /// Only code points from U+0100 to U+FFFF are escaped. Below U+0100 a
    /// character either has a Windows-1252 byte or cannot be encoded at all.
    fn encode_one(code_point: u32, position: usize, out: &mut Vec<u32>) -> Result<(), Error> {
        if let Some(byte) = CP1252_BYTES.get(&code_point) {
            out.push(u32::from(*byte));
            return Ok(());
        }
        if code_point < 0x100 {
            return Err(Error::encoding_error(
                code_point,
                position,
                "control character without a Windows-1252 byte",
            ));
        }
        if code_point > 0xFFFF {
            return Err(Error::encoding_error(
                code_point,
                position,
                "outside the basic multilingual plane",
            ));
        }

        let mut high = (code_point >> 8) as u8;
        let mut low = (code_point & 0xFF) as u8;
        let mut marker = ESCAPE_MARKER;
        if RESERVED_BYTES.contains(&high) {
            marker += 2;
        }
        if RESERVED_BYTES.contains(&low) {
            marker += 1;
        }
        match marker {
            0x11 => low = low.wrapping_add(LOW_SHIFT),
            0x12 => high = high.wrapping_sub(HIGH_SHIFT),
            0x13 => {
                low = low.wrapping_add(LOW_SHIFT);
                high = high.wrapping_sub(HIGH_SHIFT);
            }
            _ => {}
        }

        out.extend([marker, u32::from(low), u32::from(high)]);
        Ok(())
    }
}

impl Encoder for SpecialEscapeEncoder {
    fn encode(&self, src: &[u32]) -> Result<Vec<u32>, Error> {
        let mut out = Vec::with_capacity(src.len());
        for (position, &code_point) in src.iter().enumerate() {
            Self::encode_one(code_point, position, &mut out)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(text: &str) -> Result<Vec<u32>, Error> {
        let src: Vec<u32> = text.chars().map(u32::from).collect();
        SpecialEscapeEncoder::new().encode(&src)
    }

    #[test]
    fn test_ascii_passes_through() {
        assert_eq!(
            encode("A;b\r\n").unwrap(),
            vec![0x41, 0x3B, 0x62, 0x0D, 0x0A]
        );
    }

    #[test]
    fn test_cp1252_characters_map_to_their_byte() {
        assert_eq!(encode("é€Œ").unwrap(), vec![0xE9, 0x80, 0x8C]);
    }

    #[test]
    fn test_plain_escape() {
        // U+3042: neither byte is reserved.
        assert_eq!(encode("あ").unwrap(), vec![0x10, 0x42, 0x30]);
    }

    #[test]
    fn test_reserved_low_byte_is_shifted() {
        // U+3024: low byte is `$`.
        assert_eq!(encode("\u{3024}").unwrap(), vec![0x11, 0x32, 0x30]);
    }

    #[test]
    fn test_reserved_high_byte_is_shifted() {
        // U+5B57: high byte is `[`.
        assert_eq!(encode("字").unwrap(), vec![0x12, 0x57, 0x52]);
    }

    #[test]
    fn test_both_bytes_reserved() {
        assert_eq!(encode("\u{5B5B}").unwrap(), vec![0x13, 0x69, 0x52]);
    }

    #[test]
    fn test_one_value_per_character_or_three_when_escaped() {
        let encoded = encode("Paris パリ").unwrap();
        assert_eq!(encoded.len(), 6 + 2 * 3);
    }

    #[test]
    fn test_astral_plane_is_rejected() {
        let err = encode("ok 😀").unwrap_err();
        match err {
            Error::Encoding {
                code_point,
                position,
                ..
            } => {
                assert_eq!(code_point, 0x1F600);
                assert_eq!(position, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_low_control_characters_pass_through() {
        assert_eq!(encode("a\u{11}b").unwrap(), vec![0x61, 0x11, 0x62]);
    }

    #[test]
    fn test_c1_control_without_byte_is_rejected() {
        // U+0080 has no byte: 0x80 is the euro sign.
        let err = encode("x\u{80}").unwrap_err();
        assert!(matches!(
            err,
            Error::Encoding {
                code_point: 0x80,
                position: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_lowest_escaped_code_point() {
        // U+0100: high byte 0x01 and low byte 0x00, which is reserved.
        assert_eq!(encode("\u{100}").unwrap(), vec![0x11, 0x0E, 0x01]);
    }
}
