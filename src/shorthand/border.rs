//! `border`, `border-{top,right,bottom,left}`, and the composite
//! width/style/color classification they share.

use super::box_sides::{expand_sides, split_top_level_whitespace, SIDES};

const STYLE_KEYWORDS: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset", "inherit",
];
const WIDTH_KEYWORDS: &[&str] = &["thin", "medium", "thick", "inherit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Width,
    Style,
    Color,
}

fn classify(token: &str) -> TokenKind {
    let lower = token.to_ascii_lowercase();
    if STYLE_KEYWORDS.contains(&lower.as_str()) {
        TokenKind::Style
    } else if WIDTH_KEYWORDS.contains(&lower.as_str()) || is_length(&lower) {
        TokenKind::Width
    } else {
        TokenKind::Color
    }
}

fn is_length(token: &str) -> bool {
    let trimmed = token.trim_start_matches(['+', '-']);
    let digits_end = trimmed.find(|c: char| !c.is_ascii_digit() && c != '.').unwrap_or(trimmed.len());
    if digits_end == 0 {
        return false;
    }
    let unit = &trimmed[digits_end..];
    unit.is_empty() || matches!(unit, "px" | "em" | "rem" | "pt" | "pc" | "in" | "cm" | "mm" | "ex" | "ch" | "vw" | "vh" | "vmin" | "vmax" | "%")
}

/// Classify `border`'s space-separated sub-tokens into (at most one each of)
/// width/style/color, then apply the result to all four sides.
pub fn expand_border(value: &str) -> Vec<(String, String)> {
    let (width, style, color) = classify_tokens(value);
    let mut out = Vec::new();
    if let Some(w) = width {
        for (side, v) in expand_sides(&w) {
            out.push((format!("border-{side}-width"), v));
        }
    }
    if let Some(s) = style {
        for (side, v) in expand_sides(&s) {
            out.push((format!("border-{side}-style"), v));
        }
    }
    if let Some(c) = color {
        for (side, v) in expand_sides(&c) {
            out.push((format!("border-{side}-color"), v));
        }
    }
    out
}

/// Classify `border-{side}`'s sub-tokens and apply to a single side.
pub fn expand_border_side(side: &str, value: &str) -> Vec<(String, String)> {
    let (width, style, color) = classify_tokens(value);
    let mut out = Vec::new();
    if let Some(w) = width {
        out.push((format!("border-{side}-width"), w));
    }
    if let Some(s) = style {
        out.push((format!("border-{side}-style"), s));
    }
    if let Some(c) = color {
        out.push((format!("border-{side}-color"), c));
    }
    out
}

fn classify_tokens(value: &str) -> (Option<String>, Option<String>, Option<String>) {
    let mut width = None;
    let mut style = None;
    let mut color = None;
    for token in split_top_level_whitespace(value) {
        match classify(token) {
            TokenKind::Width if width.is_none() => width = Some(token.to_string()),
            TokenKind::Style if style.is_none() => style = Some(token.to_string()),
            TokenKind::Color if color.is_none() => color = Some(token.to_string()),
            _ => {}
        }
    }
    (width, style, color)
}

/// Attempt to recompose `border` from `border-width`/`border-style`/
/// `border-color`. Requires at least `border-style`; declines if any
/// component is itself a 4-value form (embedding that in the composite isn't
/// legal CSS).
pub fn contract_border(width: Option<&str>, style: Option<&str>, color: Option<&str>) -> Option<String> {
    style?;
    let mut parts = Vec::new();
    for part in [width, style, color].into_iter().flatten() {
        if part.split_whitespace().count() > 1 {
            return None;
        }
        parts.push(part.to_string());
    }
    Some(parts.join(" "))
}

pub const BORDER_SIDE_NAMES: [&str; 4] = SIDES;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_border_all_components() {
        let decls = expand_border("1px solid red");
        assert_eq!(decls.len(), 12);
        assert!(decls.contains(&("border-top-width".to_string(), "1px".to_string())));
        assert!(decls.contains(&("border-left-color".to_string(), "red".to_string())));
    }

    #[test]
    fn expands_border_missing_components() {
        let decls = expand_border("solid");
        assert_eq!(decls.len(), 4);
        assert!(decls.iter().all(|(p, _)| p.ends_with("-style")));
    }

    #[test]
    fn expands_single_side() {
        let decls = expand_border_side("top", "2px dashed blue");
        assert_eq!(
            decls,
            vec![
                ("border-top-width".to_string(), "2px".to_string()),
                ("border-top-style".to_string(), "dashed".to_string()),
                ("border-top-color".to_string(), "blue".to_string()),
            ]
        );
    }

    #[test]
    fn contracts_requires_style() {
        assert_eq!(contract_border(Some("1px"), None, Some("red")), None);
        assert_eq!(
            contract_border(Some("1px"), Some("solid"), Some("red")),
            Some("1px solid red".to_string())
        );
    }

    #[test]
    fn contracts_declines_embedded_four_value_form() {
        assert_eq!(contract_border(Some("1px 2px 3px 4px"), Some("solid"), None), None);
    }
}
