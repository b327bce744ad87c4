//! `rgb()` / `rgba()`, both legacy comma syntax and modern space/slash syntax.

use super::{round_u8, ColorIR, Variant};
use crate::error::ColorConversionError;

fn malformed(reason: impl Into<String>) -> ColorConversionError {
    ColorConversionError::Malformed { format: "rgb".to_string(), reason: reason.into() }
}

fn parse_component(token: &str) -> Result<u8, ColorConversionError> {
    let token = token.trim();
    if let Some(pct) = token.strip_suffix('%') {
        let v: f64 = pct.trim().parse().map_err(|_| malformed(format!("bad percentage {token:?}")))?;
        if !(0.0..=100.0).contains(&v) {
            return Err(ColorConversionError::OutOfRange { component: "rgb".to_string(), value: v, expected: "0%..=100%".to_string() });
        }
        Ok(round_u8(v / 100.0 * 255.0))
    } else {
        let v: f64 = token.parse().map_err(|_| malformed(format!("bad number {token:?}")))?;
        if !(0.0..=255.0).contains(&v) {
            return Err(ColorConversionError::OutOfRange { component: "rgb".to_string(), value: v, expected: "0..=255".to_string() });
        }
        Ok(round_u8(v))
    }
}

fn parse_alpha(token: &str) -> Result<f64, ColorConversionError> {
    let token = token.trim();
    let v: f64 = if let Some(pct) = token.strip_suffix('%') {
        pct.trim().parse::<f64>().map_err(|_| malformed(format!("bad alpha {token:?}")))? / 100.0
    } else {
        token.parse().map_err(|_| malformed(format!("bad alpha {token:?}")))?
    };
    if !(0.0..=1.0).contains(&v) {
        return Err(ColorConversionError::OutOfRange { component: "alpha".to_string(), value: v, expected: "0..=1".to_string() });
    }
    Ok(v)
}

pub fn parse(input: &str) -> Result<ColorIR, ColorConversionError> {
    let lower = input.trim().to_ascii_lowercase();
    let inner = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| malformed("missing rgb()/rgba( ) wrapper"))?;

    if inner.contains(',') {
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(malformed("expected 3 or 4 comma-separated components"));
        }
        let r = parse_component(parts[0])?;
        let g = parse_component(parts[1])?;
        let b = parse_component(parts[2])?;
        if parts.len() == 4 {
            Ok(ColorIR::with_alpha(r, g, b, parse_alpha(parts[3])?))
        } else {
            Ok(ColorIR::opaque(r, g, b))
        }
    } else {
        let (channels, alpha) = match inner.split_once('/') {
            Some((c, a)) => (c.trim(), Some(a.trim())),
            None => (inner, None),
        };
        let parts: Vec<&str> = channels.split_whitespace().collect();
        if parts.len() != 3 {
            return Err(malformed("expected 3 space-separated components"));
        }
        let r = parse_component(parts[0])?;
        let g = parse_component(parts[1])?;
        let b = parse_component(parts[2])?;
        match alpha {
            Some(a) => Ok(ColorIR::with_alpha(r, g, b, parse_alpha(a)?)),
            None => Ok(ColorIR::opaque(r, g, b)),
        }
    }
}

/// `force_alpha` makes the function name `rgba` and always includes an alpha
/// component (defaulting to 1 if the IR has none) — used for the explicit
/// `rgba` target format.
pub fn format(color: &ColorIR, variant: Variant, force_alpha: bool) -> String {
    let (r, g, b) = (color.red, color.green, color.blue);
    if force_alpha {
        let a = color.alpha_or(1.0);
        return format!("rgba({r}, {g}, {b}, {})", format_alpha(a));
    }
    match (variant, color.has_alpha()) {
        (Variant::Modern, false) => format!("rgb({r} {g} {b})"),
        (Variant::Modern, true) => format!("rgb({r} {g} {b} / {})", format_alpha(color.alpha)),
        (Variant::Legacy, false) => format!("rgb({r}, {g}, {b})"),
        (Variant::Legacy, true) => format!("rgba({r}, {g}, {b}, {})", format_alpha(color.alpha)),
    }
}

fn format_alpha(a: f64) -> String {
    let rounded = (a * 1000.0).round() / 1000.0;
    format!("{rounded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_legacy_comma_syntax() {
        let c = parse("rgb(255, 0, 0)").unwrap();
        assert_eq!((c.red, c.green, c.blue), (255, 0, 0));
        assert!(!c.has_alpha());
    }

    #[test]
    fn parses_legacy_with_alpha() {
        let c = parse("rgba(255, 0, 0, 0.5)").unwrap();
        assert!((c.alpha - 0.5).abs() < 1e-9);
    }

    #[test]
    fn parses_modern_space_syntax() {
        let c = parse("rgb(255 0 0)").unwrap();
        assert_eq!((c.red, c.green, c.blue), (255, 0, 0));
    }

    #[test]
    fn parses_modern_slash_alpha() {
        let c = parse("rgb(255 0 0 / 50%)").unwrap();
        assert!((c.alpha - 0.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_out_of_range_component() {
        assert!(parse("rgb(300, 0, 0)").is_err());
    }

    #[test]
    fn formats_modern_no_alpha() {
        assert_eq!(format(&ColorIR::opaque(255, 0, 0), Variant::Modern, false), "rgb(255 0 0)");
    }

    #[test]
    fn formats_legacy_no_alpha() {
        assert_eq!(format(&ColorIR::opaque(255, 0, 0), Variant::Legacy, false), "rgb(255, 0, 0)");
    }
}
