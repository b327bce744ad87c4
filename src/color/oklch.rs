//! `oklch()` — Oklab expressed in cylindrical (lightness, chroma, hue) form.

use super::oklab::{linear_srgb_to_oklab, oklab_to_linear_srgb};
use super::{linear_to_srgb, round_u8, ColorIR};
use crate::error::ColorConversionError;

const POWERLESS_HUE_THRESHOLD: f64 = 4e-6;

fn malformed(reason: impl Into<String>) -> ColorConversionError {
    ColorConversionError::Malformed { format: "oklch".to_string(), reason: reason.into() }
}

fn parse_l(token: &str) -> Result<f64, ColorConversionError> {
    let token = token.trim();
    if let Some(pct) = token.strip_suffix('%') {
        let v: f64 = pct.parse().map_err(|_| malformed(format!("bad L {token:?}")))?;
        Ok(v / 100.0)
    } else {
        token.parse().map_err(|_| malformed(format!("bad L {token:?}")))
    }
}

fn parse_chroma(token: &str) -> Result<f64, ColorConversionError> {
    let token = token.trim();
    let v: f64 = if let Some(pct) = token.strip_suffix('%') {
        pct.parse::<f64>().map_err(|_| malformed(format!("bad chroma {token:?}")))? / 100.0 * 0.4
    } else {
        token.parse().map_err(|_| malformed(format!("bad chroma {token:?}")))?
    };
    if v < 0.0 {
        return Err(ColorConversionError::OutOfRange { component: "chroma".to_string(), value: v, expected: ">= 0".to_string() });
    }
    Ok(v)
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

fn parse_alpha(token: &str) -> Result<f64, ColorConversionError> {
    let token = token.trim();
    let v: f64 = if let Some(pct) = token.strip_suffix('%') {
        pct.parse::<f64>().map_err(|_| malformed(format!("bad alpha {token:?}")))? / 100.0
    } else {
        token.parse().map_err(|_| malformed(format!("bad alpha {token:?}")))?
    };
    Ok(v.clamp(0.0, 1.0))
}

pub fn parse(input: &str) -> Result<ColorIR, ColorConversionError> {
    let lower = input.trim().to_ascii_lowercase();
    let inner = lower.strip_prefix("oklch(").and_then(|s| s.strip_suffix(')')).ok_or_else(|| malformed("missing oklch( ) wrapper"))?;
    let (channels, alpha) = match inner.split_once('/') {
        Some((c, a)) => (c.trim(), Some(a.trim())),
        None => (inner, None),
    };
    let parts: Vec<&str> = channels.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(malformed("expected L C H"));
    }
    let l = parse_l(parts[0])?;
    let c = parse_chroma(parts[1])?;
    let h = parse_hue(parts[2])?;

    let a = c * h.to_radians().cos();
    let b = c * h.to_radians().sin();
    let (lr, lg, lb) = oklab_to_linear_srgb(l, a, b);
    let (r, g, bl) = (linear_to_srgb(lr), linear_to_srgb(lg), linear_to_srgb(lb));

    let mut color = match alpha {
        Some(a) => ColorIR::with_alpha(round_u8(r * 255.0), round_u8(g * 255.0), round_u8(bl * 255.0), parse_alpha(a)?),
        None => ColorIR::opaque(round_u8(r * 255.0), round_u8(g * 255.0), round_u8(bl * 255.0)),
    };
    color.linear = Some((lr, lg, lb));
    Ok(color)
}

fn linear_of(color: &ColorIR) -> (f64, f64, f64) {
    color.linear.unwrap_or_else(|| {
        (
            super::srgb_to_linear(color.red as f64 / 255.0),
            super::srgb_to_linear(color.green as f64 / 255.0),
            super::srgb_to_linear(color.blue as f64 / 255.0),
        )
    })
}

pub fn to_lch(color: &ColorIR) -> (f64, f64, f64) {
    let (r, g, b) = linear_of(color);
    let (l, a, bb) = linear_srgb_to_oklab(r, g, b);
    let chroma = (a * a + bb * bb).sqrt();
    let hue = if chroma <= POWERLESS_HUE_THRESHOLD { 0.0 } else { bb.atan2(a).to_degrees().rem_euclid(360.0) };
    (l, chroma, hue)
}

pub fn format(color: &ColorIR) -> String {
    let (l, c, h) = to_lch(color);
    let round3 = |v: f64| (v * 1000.0).round() / 1000.0;
    let l_pct = format!("{}%", round3(l * 100.0));
    let c = round3(c);
    let h = round3(h);
    if color.has_alpha() {
        format!("oklch({l_pct} {c} {h} / {})", round3(color.alpha))
    } else {
        format!("oklch({l_pct} {c} {h})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gray_has_zero_chroma_and_hue() {
        let c = parse("oklch(50% 0 180)").unwrap();
        assert_eq!(c.red, c.green);
        assert_eq!(c.green, c.blue);
    }

    #[test]
    fn roundtrips_l_c_h() {
        let c = parse("oklch(62.8% 0.258 29.23)").unwrap();
        let (l, chroma, hue) = to_lch(&c);
        assert!((l - 0.628).abs() < 0.01);
        assert!((chroma - 0.258).abs() < 0.02);
        assert!((hue - 29.23).abs() < 2.0);
    }

    #[test]
    fn powerless_hue_normalizes_to_zero() {
        let gray = ColorIR::opaque(128, 128, 128);
        let (_, chroma, hue) = to_lch(&gray);
        assert!(chroma < POWERLESS_HUE_THRESHOLD * 10.0);
        assert_eq!(hue, 0.0);
    }

    #[test]
    fn parses_with_alpha() {
        let c = parse("oklch(50% 0.1 180 / 0.5)").unwrap();
        assert!((c.alpha - 0.5).abs() < 1e-9);
    }
}
