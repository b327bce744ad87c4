//! `hwb()` / `hwba()` — hue, whiteness, blackness.

use super::{round_u8, ColorIR, Variant};
use crate::error::ColorConversionError;

fn malformed(reason: impl Into<String>) -> ColorConversionError {
    ColorConversionError::Malformed { format: "hwb".to_string(), reason: reason.into() }
}

fn parse_hue(token: &str) -> Result<f64, ColorConversionError> {
    let token = token.trim();
    let (num, unit) = token
        .strip_suffix("deg")
        .map(|n| (n, "deg"))
        .or_else(|| token.strip_suffix("grad").map(|n| (n, "grad")))
        .or_else(|| token.strip_suffix("rad").map(|n| (n, "rad")))
        .or_else(|| token.strip_suffix("turn").map(|n| (n, "turn")))
        .unwrap_or((token, "deg"));
    let v: f64 = num.trim().parse().map_err(|_| malformed(format!("bad hue {token:?}")))?;
    let degrees = match unit {
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

fn hue_to_rgb(h: f64) -> (f64, f64, f64) {
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
            6.0 * t
        } else if t < 1.0 / 2.0 {
            1.0
        } else if t < 2.0 / 3.0 {
            (2.0 / 3.0 - t) * 6.0
        } else {
            0.0
        }
    };
    (channel(hk + 1.0 / 3.0), channel(hk), channel(hk - 1.0 / 3.0))
}

fn hwb_to_rgb(h: f64, w: f64, b: f64) -> (u8, u8, u8) {
    if w + b >= 1.0 {
        let gray = round_u8(w / (w + b) * 255.0);
        return (gray, gray, gray);
    }
    let (r, g, bl) = hue_to_rgb(h);
    let apply = |c: f64| round_u8((c * (1.0 - w - b) + w) * 255.0);
    (apply(r), apply(g), apply(bl))
}

fn rgb_to_hwb(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let (rf, gf, bf) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let white = min;
    let black = 1.0 - max;
    if (max - min).abs() < 1e-12 {
        return (0.0, white, black);
    }
    let d = max - min;
    let h = if max == rf {
        (gf - bf) / d + if gf < bf { 6.0 } else { 0.0 }
    } else if max == gf {
        (bf - rf) / d + 2.0
    } else {
        (rf - gf) / d + 4.0
    };
    (h * 60.0, white, black)
}

pub fn parse(input: &str) -> Result<ColorIR, ColorConversionError> {
    let lower = input.trim().to_ascii_lowercase();
    let inner = lower
        .strip_prefix("hwba(")
        .or_else(|| lower.strip_prefix("hwb("))
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| malformed("missing hwb()/hwba( ) wrapper"))?;

    let (channels, alpha) = match inner.split_once('/') {
        Some((c, a)) => (c.trim(), Some(a.trim())),
        None => (inner, None),
    };
    let parts: Vec<&str> = channels.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(malformed("expected 3 space-separated components"));
    }
    let h = parse_hue(parts[0])?;
    let w = parse_percent(parts[1], "whiteness")?;
    let b = parse_percent(parts[2], "blackness")?;
    let (r, g, bl) = hwb_to_rgb(h, w, b);
    match alpha {
        Some(a) => Ok(ColorIR::with_alpha(r, g, bl, parse_alpha(a)?)),
        None => Ok(ColorIR::opaque(r, g, bl)),
    }
}

pub fn format(color: &ColorIR, variant: Variant, force_alpha: bool) -> String {
    let (h, w, b) = rgb_to_hwb(color.red, color.green, color.blue);
    let h = (h * 10.0).round() / 10.0;
    let w_pct = format!("{:.1}%", w * 100.0);
    let b_pct = format!("{:.1}%", b * 100.0);
    if force_alpha {
        let a = color.alpha_or(1.0);
        return format!("hwba({h}, {w_pct}, {b_pct}, {})", format_alpha(a));
    }
    match (variant, color.has_alpha()) {
        (Variant::Modern, false) => format!("hwb({h} {w_pct} {b_pct})"),
        (Variant::Modern, true) => format!("hwb({h} {w_pct} {b_pct} / {})", format_alpha(color.alpha)),
        (Variant::Legacy, false) => format!("hwb({h}, {w_pct}, {b_pct})"),
        (Variant::Legacy, true) => format!("hwba({h}, {w_pct}, {b_pct}, {})", format_alpha(color.alpha)),
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
        let c = parse("hwb(0 0% 0%)").unwrap();
        assert_eq!((c.red, c.green, c.blue), (255, 0, 0));
    }

    #[test]
    fn whiteness_plus_blackness_over_one_is_gray() {
        let c = parse("hwb(0 60% 60%)").unwrap();
        assert_eq!(c.red, c.green);
        assert_eq!(c.green, c.blue);
    }

    #[test]
    fn roundtrips_through_rgb() {
        let c = parse("hwb(210 20% 30%)").unwrap();
        let (h, w, b) = rgb_to_hwb(c.red, c.green, c.blue);
        assert!((h - 210.0).abs() < 1.0);
        assert!((w - 0.2).abs() < 0.02);
        assert!((b - 0.3).abs() < 0.02);
    }

    #[test]
    fn parses_with_alpha() {
        let c = parse("hwb(210 20% 30% / 50%)").unwrap();
        assert!((c.alpha - 0.5).abs() < 1e-9);
    }
}
