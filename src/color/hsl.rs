//! `hsl()` / `hsla()`, legacy comma and modern space/slash syntax.

use super::{round_u8, ColorIR, Variant};
use crate::error::ColorConversionError;

fn malformed(reason: impl Into<String>) -> ColorConversionError {
    ColorConversionError::Malformed { format: "hsl".to_string(), reason: reason.into() }
}

fn parse_hue(token: &str) -> Result<f64, ColorConversionError> {
    let token = token.trim();
    let (num, _unit) = token
        .strip_suffix("deg")
        .map(|n| (n, "deg"))
        .or_else(|| token.strip_suffix("grad").map(|n| (n, "grad")))
        .or_else(|| token.strip_suffix("rad").map(|n| (n, "rad")))
        .or_else(|| token.strip_suffix("turn").map(|n| (n, "turn")))
        .unwrap_or((token, "deg"));
    let v: f64 = num.trim().parse().map_err(|_| malformed(format!("bad hue {token:?}")))?;
    let degrees = match _unit {
        "grad" => v * 0.9,
        "rad" => v.to_degrees(),
        "turn" => v * 360.0,
        _ => v,
    };
    Ok(degrees.rem_euclid(360.0))
}

fn parse_percent(token: &str, component: &str) -> Result<f64, ColorConversionError> {
    let token = token.trim();
    let pct = token.strip_suffix('%').ok_or_else(|| malformed(format!("{component} must be a percentage, got {token:?}")))?;
    let v: f64 = pct.parse().map_err(|_| malformed(format!("bad {component} {token:?}")))?;
    if !(0.0..=100.0).contains(&v) {
        return Err(ColorConversionError::OutOfRange { component: component.to_string(), value: v, expected: "0%..=100%".to_string() });
    }
    Ok(v / 100.0)
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

/// HSL to sRGB, components in `0.0..=1.0` (h already normalized to degrees).
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    if s == 0.0 {
        let v = round_u8(l * 255.0);
        return (v, v, v);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let hk = h / 360.0;
    let channel = |t: f64| -> f64 {
        let mut t = t;
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 1.0 / 2.0 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    (
        round_u8(channel(hk + 1.0 / 3.0) * 255.0),
        round_u8(channel(hk) * 255.0),
        round_u8(channel(hk - 1.0 / 3.0) * 255.0),
    )
}

fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let (r, g, b) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if (max - min).abs() < 1e-12 {
        return (0.0, 0.0, l);
    }
    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h * 60.0, s, l)
}

pub fn parse(input: &str) -> Result<ColorIR, ColorConversionError> {
    let lower = input.trim().to_ascii_lowercase();
    let inner = lower
        .strip_prefix("hsla(")
        .or_else(|| lower.strip_prefix("hsl("))
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| malformed("missing hsl()/hsla( ) wrapper"))?;

    let (channels, alpha) = if inner.contains(',') {
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(malformed("expected 3 or 4 comma-separated components"));
        }
        (parts[..3].to_vec(), parts.get(3).copied())
    } else {
        let (c, a) = match inner.split_once('/') {
            Some((c, a)) => (c.trim(), Some(a.trim())),
            None => (inner, None),
        };
        let parts: Vec<&str> = c.split_whitespace().collect();
        if parts.len() != 3 {
            return Err(malformed("expected 3 space-separated components"));
        }
        (parts, a)
    };

    let h = parse_hue(channels[0])?;
    let s = parse_percent(channels[1], "saturation")?;
    let l = parse_percent(channels[2], "lightness")?;
    let (r, g, b) = hsl_to_rgb(h, s, l);
    match alpha {
        Some(a) => Ok(ColorIR::with_alpha(r, g, b, parse_alpha(a)?)),
        None => Ok(ColorIR::opaque(r, g, b)),
    }
}

pub fn format(color: &ColorIR, variant: Variant, force_alpha: bool) -> String {
    let (h, s, l) = rgb_to_hsl(color.red, color.green, color.blue);
    let h = (h * 10.0).round() / 10.0;
    let s_pct = format!("{:.1}%", s * 100.0);
    let l_pct = format!("{:.1}%", l * 100.0);
    if force_alpha {
        let a = color.alpha_or(1.0);
        return format!("hsla({h}, {s_pct}, {l_pct}, {})", format_alpha(a));
    }
    match (variant, color.has_alpha()) {
        (Variant::Modern, false) => format!("hsl({h} {s_pct} {l_pct})"),
        (Variant::Modern, true) => format!("hsl({h} {s_pct} {l_pct} / {})", format_alpha(color.alpha)),
        (Variant::Legacy, false) => format!("hsl({h}, {s_pct}, {l_pct})"),
        (Variant::Legacy, true) => format!("hsla({h}, {s_pct}, {l_pct}, {})", format_alpha(color.alpha)),
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
    fn parses_pure_red() {
        let c = parse("hsl(0, 100%, 50%)").unwrap();
        assert_eq!((c.red, c.green, c.blue), (255, 0, 0));
    }

    #[test]
    fn parses_modern_with_alpha() {
        let c = parse("hsl(0 100% 50% / 0.5)").unwrap();
        assert!((c.alpha - 0.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_percent_saturation() {
        assert!(parse("hsl(0, 100, 50%)").is_err());
    }

    #[test]
    fn roundtrips_through_rgb() {
        let c = parse("hsl(210, 50%, 40%)").unwrap();
        let (h, s, l) = rgb_to_hsl(c.red, c.green, c.blue);
        assert!((h - 210.0).abs() < 1.0);
        assert!((s - 0.5).abs() < 0.02);
        assert!((l - 0.4).abs() < 0.02);
    }

    #[test]
    fn formats_modern() {
        let s = format(&ColorIR::opaque(255, 0, 0), Variant::Modern, false);
        assert!(s.starts_with("hsl(0"));
    }
}
