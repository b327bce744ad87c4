//! `font` shorthand expansion and contraction.

use super::box_sides::split_top_level_whitespace;

const STYLE_KEYWORDS: &[&str] = &["italic", "oblique"];
const VARIANT_KEYWORDS: &[&str] = &["small-caps"];
const WEIGHT_KEYWORDS: &[&str] = &["bold", "bolder", "lighter", "normal"];
const SIZE_KEYWORDS: &[&str] = &[
    "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "smaller", "larger",
];
const LENGTH_UNITS: &[&str] = &["px", "em", "rem", "pt", "pc", "in", "cm", "mm", "ex", "ch", "vw", "vh", "vmin", "vmax", "%"];

fn is_size_token(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    if SIZE_KEYWORDS.contains(&lower.as_str()) {
        return true;
    }
    let trimmed = lower.trim_start_matches(['+', '-']);
    let digits_end = trimmed.find(|c: char| !c.is_ascii_digit() && c != '.').unwrap_or(trimmed.len());
    if digits_end == 0 {
        return false;
    }
    LENGTH_UNITS.contains(&&trimmed[digits_end..])
}

fn is_weight_token(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    WEIGHT_KEYWORDS.contains(&lower.as_str()) || (lower.len() == 3 && lower.chars().all(|c| c.is_ascii_digit()))
}

/// Expand `font` into its six longhands, defaulting unspecified optional
/// parts (`font-style`, `font-variant`, `font-weight`, `line-height`) to
/// `normal`. Returns an empty vec if no size token can be classified.
pub fn expand_font(value: &str) -> Vec<(String, String)> {
    let (head, tail) = split_at_first_top_level_slash(value);

    let head_tokens = split_top_level_whitespace(head);
    let Some(size_idx) = head_tokens.iter().position(|t| is_size_token(t)) else {
        return Vec::new();
    };

    let mut style = None;
    let mut variant = None;
    let mut weight = None;
    for token in &head_tokens[..size_idx] {
        let lower = token.to_ascii_lowercase();
        if STYLE_KEYWORDS.contains(&lower.as_str()) && style.is_none() {
            style = Some(lower);
        } else if VARIANT_KEYWORDS.contains(&lower.as_str()) && variant.is_none() {
            variant = Some(lower);
        } else if is_weight_token(token) && weight.is_none() {
            weight = Some(token.to_string());
        }
    }

    let size = head_tokens[size_idx].to_string();

    let (line_height, family) = if let Some(tail) = tail {
        let tail = tail.trim();
        match tail.split_once(char::is_whitespace) {
            Some((lh, fam)) => (lh.trim().to_string(), fam.trim().to_string()),
            None => (tail.to_string(), String::new()),
        }
    } else {
        ("normal".to_string(), head_tokens[size_idx + 1..].join(" "))
    };

    if family.is_empty() {
        return Vec::new();
    }

    vec![
        ("font-style".to_string(), style.unwrap_or_else(|| "normal".to_string())),
        ("font-variant".to_string(), variant.unwrap_or_else(|| "normal".to_string())),
        ("font-weight".to_string(), weight.unwrap_or_else(|| "normal".to_string())),
        ("font-size".to_string(), size),
        ("line-height".to_string(), line_height),
        ("font-family".to_string(), family),
    ]
}

fn split_at_first_top_level_slash(value: &str) -> (&str, Option<&str>) {
    let bytes = value.as_bytes();
    let mut depth = 0i32;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth -= 1,
            b'/' if depth == 0 => return (&value[..i], Some(&value[i + 1..])),
            _ => {}
        }
    }
    (value, None)
}

/// Attempt to recompose `font` from its longhands. Requires `font-size` and
/// `font-family`; omits optional parts equal to `normal`, and only includes
/// `line-height` (as `size/line-height`) when it's non-default.
pub fn contract_font(
    style: Option<&str>,
    variant: Option<&str>,
    weight: Option<&str>,
    size: Option<&str>,
    line_height: Option<&str>,
    family: Option<&str>,
) -> Option<String> {
    let size = size?;
    let family = family?;

    let mut parts = Vec::new();
    if let Some(s) = style {
        if s != "normal" {
            parts.push(s.to_string());
        }
    }
    if let Some(v) = variant {
        if v != "normal" {
            parts.push(v.to_string());
        }
    }
    if let Some(w) = weight {
        if w != "normal" {
            parts.push(w.to_string());
        }
    }

    let size_part = match line_height {
        Some(lh) if lh != "normal" => format!("{size}/{lh}"),
        _ => size.to_string(),
    };
    parts.push(size_part);
    parts.push(family.to_string());

    Some(parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_full_font() {
        let decls = expand_font("italic bold 12px/1.5 Arial, sans-serif");
        let map: std::collections::HashMap<_, _> = decls.into_iter().collect();
        assert_eq!(map["font-style"], "italic");
        assert_eq!(map["font-weight"], "bold");
        assert_eq!(map["font-size"], "12px");
        assert_eq!(map["line-height"], "1.5");
        assert_eq!(map["font-family"], "Arial, sans-serif");
        assert_eq!(map["font-variant"], "normal");
    }

    #[test]
    fn expands_minimal_font() {
        let decls = expand_font("12px Arial");
        let map: std::collections::HashMap<_, _> = decls.into_iter().collect();
        assert_eq!(map["font-size"], "12px");
        assert_eq!(map["font-family"], "Arial");
        assert_eq!(map["line-height"], "normal");
        assert_eq!(map["font-style"], "normal");
    }

    #[test]
    fn no_size_token_returns_empty() {
        assert!(expand_font("bold Arial").is_empty());
    }

    #[test]
    fn contracts_minimal() {
        let v = contract_font(None, None, None, Some("12px"), None, Some("Arial"));
        assert_eq!(v, Some("12px Arial".to_string()));
    }

    #[test]
    fn contracts_with_line_height_and_style() {
        let v = contract_font(Some("italic"), None, None, Some("12px"), Some("1.5"), Some("Arial"));
        assert_eq!(v, Some("italic 12px/1.5 Arial".to_string()));
    }

    #[test]
    fn contracts_requires_size_and_family() {
        assert_eq!(contract_font(None, None, None, None, None, Some("Arial")), None);
    }
}
