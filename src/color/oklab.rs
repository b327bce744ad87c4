//! `oklab()` — the Ottosson Oklab perceptual color space. Populates the
//! `ColorIR` linear-RGB sidecar so a subsequent oklab/oklch re-format
//! doesn't lose precision to the 8-bit sRGB round-trip.

use super::{linear_to_srgb, round_u8, srgb_to_linear, ColorIR};
use crate::error::ColorConversionError;

fn malformed(reason: impl Into<String>) -> ColorConversionError {
    ColorConversionError::Malformed { format: "oklab".to_string(), reason: reason.into() }
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

fn parse_ab(token: &str) -> Result<f64, ColorConversionError> {
    let token = token.trim();
    if let Some(pct) = token.strip_suffix('%') {
        let v: f64 = pct.parse().map_err(|_| malformed(format!("bad a/b {token:?}")))?;
        Ok(v / 100.0 * 0.4)
    } else {
        token.parse().map_err(|_| malformed(format!("bad a/b {token:?}")))
    }
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

pub fn oklab_to_linear_srgb(l: f64, a: f64, b: f64) -> (f64, f64, f64) {
    let l_ = l + 0.3963377774 * a + 0.2158037573 * b;
    let m_ = l - 0.1055613458 * a - 0.0638541728 * b;
    let s_ = l - 0.0894841775 * a - 1.2914855480 * b;

    let l3 = l_ * l_ * l_;
    let m3 = m_ * m_ * m_;
    let s3 = s_ * s_ * s_;

    (
        4.0767416621 * l3 - 3.3077115913 * m3 + 0.2309699292 * s3,
        -1.2684380046 * l3 + 2.6097574011 * m3 - 0.3413193965 * s3,
        -0.0041960863 * l3 - 0.7034186147 * m3 + 1.7076147010 * s3,
    )
}

pub fn linear_srgb_to_oklab(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let l = 0.4122214708 * r + 0.5363325363 * g + 0.0514459929 * b;
    let m = 0.2119034982 * r + 0.6806995451 * g + 0.1073969566 * b;
    let s = 0.0883024619 * r + 0.2817188376 * g + 0.6299787005 * b;

    let l_ = l.cbrt();
    let m_ = m.cbrt();
    let s_ = s.cbrt();

    (
        0.2104542553 * l_ + 0.7936177850 * m_ - 0.0040720468 * s_,
        1.9779984951 * l_ - 2.4285922050 * m_ + 0.4505937099 * s_,
        0.0259040371 * l_ + 0.7827717662 * m_ - 0.8086757660 * s_,
    )
}

pub fn parse(input: &str) -> Result<ColorIR, ColorConversionError> {
    let lower = input.trim().to_ascii_lowercase();
    let inner = lower.strip_prefix("oklab(").and_then(|s| s.strip_suffix(')')).ok_or_else(|| malformed("missing oklab( ) wrapper"))?;
    let (channels, alpha) = match inner.split_once('/') {
        Some((c, a)) => (c.trim(), Some(a.trim())),
        None => (inner, None),
    };
    let parts: Vec<&str> = channels.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(malformed("expected L a b"));
    }
    let l = parse_l(parts[0])?;
    let a = parse_ab(parts[1])?;
    let b = parse_ab(parts[2])?;
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
            srgb_to_linear(color.red as f64 / 255.0),
            srgb_to_linear(color.green as f64 / 255.0),
            srgb_to_linear(color.blue as f64 / 255.0),
        )
    })
}

pub fn to_lab(color: &ColorIR) -> (f64, f64, f64) {
    let (r, g, b) = linear_of(color);
    linear_srgb_to_oklab(r, g, b)
}

pub fn format(color: &ColorIR) -> String {
    let (l, a, b) = to_lab(color);
    let round3 = |v: f64| (v * 1000.0).round() / 1000.0;
    let l_pct = format!("{}%", round3(l * 100.0));
    let a = round3(a);
    let b = round3(b);
    if color.has_alpha() {
        format!("oklab({l_pct} {a} {b} / {})", round3(color.alpha))
    } else {
        format!("oklab({l_pct} {a} {b})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_white() {
        let c = parse("oklab(100% 0 0)").unwrap();
        assert_eq!((c.red, c.green, c.blue), (255, 255, 255));
    }

    #[test]
    fn parses_black() {
        let c = parse("oklab(0% 0 0)").unwrap();
        assert_eq!((c.red, c.green, c.blue), (0, 0, 0));
    }

    #[test]
    fn roundtrips_l_a_b() {
        let c = parse("oklab(62.8% 0.225 0.126)").unwrap();
        let (l, a, b) = to_lab(&c);
        assert!((l - 0.628).abs() < 0.01);
        assert!((a - 0.225).abs() < 0.02);
        assert!((b - 0.126).abs() < 0.02);
    }

    #[test]
    fn parses_with_alpha() {
        let c = parse("oklab(50% 0 0 / 0.5)").unwrap();
        assert!((c.alpha - 0.5).abs() < 1e-9);
    }
}
