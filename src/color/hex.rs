//! `#rgb` / `#rrggbb` / `#rrggbbaa` hex color syntax.

use super::{round_u8, ColorIR};
use crate::error::ColorConversionError;

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn pair(hi: u8, lo: u8) -> Option<u8> {
    Some(hex_digit(hi)? * 16 + hex_digit(lo)?)
}

pub fn parse(input: &str) -> Result<ColorIR, ColorConversionError> {
    let digits = input.strip_prefix('#').unwrap_or(input);
    let bytes = digits.as_bytes();
    let malformed = || ColorConversionError::Malformed { format: "hex".to_string(), reason: format!("expected 3, 6, or 8 hex digits, got {:?}", digits) };

    match bytes.len() {
        3 => {
            let r = hex_digit(bytes[0]).ok_or_else(malformed)?;
            let g = hex_digit(bytes[1]).ok_or_else(malformed)?;
            let b = hex_digit(bytes[2]).ok_or_else(malformed)?;
            Ok(ColorIR::opaque(r * 17, g * 17, b * 17))
        }
        6 => {
            let r = pair(bytes[0], bytes[1]).ok_or_else(malformed)?;
            let g = pair(bytes[2], bytes[3]).ok_or_else(malformed)?;
            let b = pair(bytes[4], bytes[5]).ok_or_else(malformed)?;
            Ok(ColorIR::opaque(r, g, b))
        }
        8 => {
            let r = pair(bytes[0], bytes[1]).ok_or_else(malformed)?;
            let g = pair(bytes[2], bytes[3]).ok_or_else(malformed)?;
            let b = pair(bytes[4], bytes[5]).ok_or_else(malformed)?;
            let a = pair(bytes[6], bytes[7]).ok_or_else(malformed)?;
            Ok(ColorIR::with_alpha(r, g, b, a as f64 / 255.0))
        }
        _ => Err(malformed()),
    }
}

pub fn format(color: &ColorIR) -> String {
    if color.has_alpha() {
        let a = round_u8(color.alpha * 255.0);
        format!("#{:02x}{:02x}{:02x}{:02x}", color.red, color.green, color.blue, a)
    } else {
        format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_digit() {
        let c = parse("#f00").unwrap();
        assert_eq!((c.red, c.green, c.blue), (255, 0, 0));
        assert!(!c.has_alpha());
    }

    #[test]
    fn parses_six_digit() {
        let c = parse("#336699").unwrap();
        assert_eq!((c.red, c.green, c.blue), (0x33, 0x66, 0x99));
    }

    #[test]
    fn parses_eight_digit_with_alpha() {
        let c = parse("#ff000080").unwrap();
        assert_eq!(c.red, 255);
        assert!((c.alpha - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_bad_length() {
        assert!(parse("#ff00").is_err());
    }

    #[test]
    fn formats_without_alpha() {
        assert_eq!(format(&ColorIR::opaque(255, 0, 0)), "#ff0000");
    }

    #[test]
    fn formats_with_alpha() {
        assert_eq!(format(&ColorIR::with_alpha(255, 0, 0, 0.5)), "#ff000080");
    }
}
