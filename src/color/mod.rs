//! The color intermediate representation (§4.6): 8-bit sRGB plus an optional
//! high-precision linear-RGB sidecar for lossless oklab/oklch round-trips,
//! and the parsers/formatters that convert between it and every supported
//! CSS color syntax.

mod convert;
mod hex;
mod hsl;
mod hwb;
mod oklab;
mod oklch;
mod rgb;

pub use convert::{convert_stylesheet, rewrite_value};

use crate::error::ColorConversionError;

/// sRGB color plus an optional alpha channel and linear-RGB sidecar.
///
/// `alpha < 0.0` is the sentinel for "no alpha channel present" — such a
/// color must format without an alpha component. The linear sidecar is
/// populated only by parsers whose source space retains precision beyond
/// 8-bit sRGB (oklab, oklch); formatters for those target spaces prefer it
/// when present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorIR {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f64,
    pub linear: Option<(f64, f64, f64)>,
}

const NO_ALPHA: f64 = -1.0;

impl ColorIR {
    pub fn opaque(red: u8, green: u8, blue: u8) -> Self {
        ColorIR { red, green, blue, alpha: NO_ALPHA, linear: None }
    }

    pub fn with_alpha(red: u8, green: u8, blue: u8, alpha: f64) -> Self {
        ColorIR { red, green, blue, alpha, linear: None }
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha >= 0.0
    }

    pub fn alpha_or(&self, default: f64) -> f64 {
        if self.has_alpha() {
            self.alpha
        } else {
            default
        }
    }
}

/// Source format for [`convert_stylesheet`] / parsing dispatch. `Any` means
/// "recognize whatever color syntax is present" rather than requiring a
/// specific one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Hex,
    Rgb,
    Hsl,
    Hwb,
    Oklab,
    Oklch,
    Any,
}

/// Target format for formatting / conversion. `Rgba`/`Hsla`/`Hwba` are the
/// legacy alpha-suffixed names; `Rgb`/`Hsl`/`Hwb` pick modern or legacy
/// syntax per [`Variant`], including alpha only when the color IR carries
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Hex,
    Rgb,
    Rgba,
    Hsl,
    Hsla,
    Hwb,
    Hwba,
    Oklab,
    Oklch,
}

/// Legacy (`fn(a, b, c)`) vs modern (`fn(a b c)`) function syntax for
/// rgb/hsl/hwb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Modern,
    Legacy,
}

impl TargetFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "hex" => TargetFormat::Hex,
            "rgb" => TargetFormat::Rgb,
            "rgba" => TargetFormat::Rgba,
            "hsl" => TargetFormat::Hsl,
            "hsla" => TargetFormat::Hsla,
            "hwb" => TargetFormat::Hwb,
            "hwba" => TargetFormat::Hwba,
            "oklab" => TargetFormat::Oklab,
            "oklch" => TargetFormat::Oklch,
            _ => return None,
        })
    }

    /// The variant implied by this target when the caller doesn't specify
    /// one: legacy for the alpha-suffixed names, modern otherwise.
    pub fn default_variant(self) -> Variant {
        match self {
            TargetFormat::Rgba | TargetFormat::Hsla | TargetFormat::Hwba => Variant::Legacy,
            _ => Variant::Modern,
        }
    }
}

impl SourceFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "hex" => SourceFormat::Hex,
            "rgb" => SourceFormat::Rgb,
            "hsl" => SourceFormat::Hsl,
            "hwb" => SourceFormat::Hwb,
            "oklab" => SourceFormat::Oklab,
            "oklch" => SourceFormat::Oklch,
            "any" => SourceFormat::Any,
            _ => return None,
        })
    }
}

/// Try to parse `input` as a color in any recognized syntax, returning the
/// IR and which syntax matched.
pub fn parse_any(input: &str) -> Result<(ColorIR, SourceFormat), ColorConversionError> {
    let trimmed = input.trim();
    let lower = trimmed.to_ascii_lowercase();
    if trimmed.starts_with('#') {
        return Ok((hex::parse(trimmed)?, SourceFormat::Hex));
    }
    if lower.starts_with("rgb(") || lower.starts_with("rgba(") {
        return Ok((rgb::parse(trimmed)?, SourceFormat::Rgb));
    }
    if lower.starts_with("hsl(") || lower.starts_with("hsla(") {
        return Ok((hsl::parse(trimmed)?, SourceFormat::Hsl));
    }
    if lower.starts_with("hwb(") || lower.starts_with("hwba(") {
        return Ok((hwb::parse(trimmed)?, SourceFormat::Hwb));
    }
    if lower.starts_with("oklab(") {
        return Ok((oklab::parse(trimmed)?, SourceFormat::Oklab));
    }
    if lower.starts_with("oklch(") {
        return Ok((oklch::parse(trimmed)?, SourceFormat::Oklch));
    }
    Err(ColorConversionError::UnrecognizedSyntax(input.to_string()))
}

/// Parse `input`, requiring it to match `expected` (unless `expected` is
/// [`SourceFormat::Any`]).
pub fn parse_as(input: &str, expected: SourceFormat) -> Result<ColorIR, ColorConversionError> {
    let (ir, actual) = parse_any(input)?;
    if expected != SourceFormat::Any && expected != actual {
        return Err(ColorConversionError::UnrecognizedSyntax(input.to_string()));
    }
    Ok(ir)
}

/// Format `color` in `target`'s syntax using `variant` for the formats where
/// that distinction applies (hex/oklab/oklch have a single canonical form).
pub fn format(color: &ColorIR, target: TargetFormat, variant: Variant) -> String {
    match target {
        TargetFormat::Hex => hex::format(color),
        TargetFormat::Rgb => rgb::format(color, variant, false),
        TargetFormat::Rgba => rgb::format(color, Variant::Legacy, true),
        TargetFormat::Hsl => hsl::format(color, variant, false),
        TargetFormat::Hsla => hsl::format(color, Variant::Legacy, true),
        TargetFormat::Hwb => hwb::format(color, variant, false),
        TargetFormat::Hwba => hwb::format(color, Variant::Legacy, true),
        TargetFormat::Oklab => oklab::format(color),
        TargetFormat::Oklch => oklch::format(color),
    }
}

pub(crate) fn round_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

pub(crate) fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub(crate) fn linear_to_srgb(c: f64) -> f64 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_any_dispatches_by_prefix() {
        let (ir, fmt) = parse_any("#ff0000").unwrap();
        assert_eq!(fmt, SourceFormat::Hex);
        assert_eq!((ir.red, ir.green, ir.blue), (255, 0, 0));
    }

    #[test]
    fn unrecognized_syntax_is_an_error() {
        assert!(parse_any("not-a-color").is_err());
    }
}
