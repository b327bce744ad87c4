//! `background` shorthand expansion and contraction. Supports layered
//! (comma-separated) backgrounds by joining each component's tokens across
//! layers with spaces, matching how `background-image` etc. accept
//! comma-separated lists of per-layer values.

use super::box_sides::{split_layers, split_top_level_whitespace};

const REPEAT_KEYWORDS: &[&str] = &["repeat", "repeat-x", "repeat-y", "no-repeat", "space", "round"];
const ATTACHMENT_KEYWORDS: &[&str] = &["scroll", "fixed", "local"];
const POSITION_KEYWORDS: &[&str] = &["top", "bottom", "left", "right", "center"];

pub const DEFAULT_COLOR: &str = "transparent";
pub const DEFAULT_IMAGE: &str = "none";
pub const DEFAULT_REPEAT: &str = "repeat";
pub const DEFAULT_ATTACHMENT: &str = "scroll";
pub const DEFAULT_POSITION: &str = "0% 0%";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Image,
    Repeat,
    Attachment,
    Position,
    Color,
}

fn classify(token: &str) -> TokenKind {
    let lower = token.to_ascii_lowercase();
    if lower == "none" || lower.starts_with("url(") || lower.contains("gradient(") {
        TokenKind::Image
    } else if REPEAT_KEYWORDS.contains(&lower.as_str()) {
        TokenKind::Repeat
    } else if ATTACHMENT_KEYWORDS.contains(&lower.as_str()) {
        TokenKind::Attachment
    } else if POSITION_KEYWORDS.contains(&lower.as_str()) || is_position_value(&lower) {
        TokenKind::Position
    } else {
        TokenKind::Color
    }
}

fn is_position_value(token: &str) -> bool {
    let trimmed = token.trim_start_matches(['+', '-']);
    let digits_end = trimmed.find(|c: char| !c.is_ascii_digit() && c != '.').unwrap_or(trimmed.len());
    digits_end > 0 && (trimmed[digits_end..].is_empty() || trimmed.ends_with('%') || trimmed[digits_end..].chars().all(|c| c.is_ascii_alphabetic()))
}

struct Layer {
    image: Option<String>,
    repeat: Option<String>,
    attachment: Option<String>,
    position: Vec<String>,
    color: Option<String>,
    size: Option<String>,
}

fn parse_layer(layer: &str) -> Layer {
    let (head, size) = match split_at_first_top_level_slash(layer) {
        (h, Some(t)) => (h, Some(t.trim().to_string())),
        (h, None) => (h, None),
    };

    let mut image = None;
    let mut repeat = None;
    let mut attachment = None;
    let mut position = Vec::new();
    let mut color = None;

    for token in split_top_level_whitespace(head) {
        match classify(token) {
            TokenKind::Image => image = Some(match image {
                Some(existing) => format!("{existing} {token}"),
                None => token.to_string(),
            }),
            TokenKind::Repeat if repeat.is_none() => repeat = Some(token.to_string()),
            TokenKind::Attachment if attachment.is_none() => attachment = Some(token.to_string()),
            TokenKind::Position => position.push(token.to_string()),
            TokenKind::Color if color.is_none() => color = Some(token.to_string()),
            _ => {}
        }
    }

    Layer { image, repeat, attachment, position, color, size }
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

/// Expand `background` into its five base longhands (always emitted, using
/// the property's defaults for anything unspecified) plus
/// `background-size` (emitted only if a layer supplied one).
pub fn expand_background(value: &str) -> Vec<(String, String)> {
    let layers: Vec<Layer> = split_layers(value).into_iter().map(parse_layer).collect();
    if layers.is_empty() {
        return Vec::new();
    }

    let join = |f: fn(&Layer) -> Option<String>, default: &str| -> String {
        let parts: Vec<String> = layers.iter().map(|l| f(l).unwrap_or_else(|| default.to_string())).collect();
        parts.join(", ")
    };

    let mut out = vec![
        ("background-color".to_string(), layers.last().and_then(|l| l.color.clone()).unwrap_or_else(|| DEFAULT_COLOR.to_string())),
        ("background-image".to_string(), join(|l| l.image.clone(), DEFAULT_IMAGE)),
        ("background-repeat".to_string(), join(|l| l.repeat.clone(), DEFAULT_REPEAT)),
        ("background-attachment".to_string(), join(|l| l.attachment.clone(), DEFAULT_ATTACHMENT)),
        (
            "background-position".to_string(),
            join(|l| if l.position.is_empty() { None } else { Some(l.position.join(" ")) }, DEFAULT_POSITION),
        ),
    ];

    if layers.iter().any(|l| l.size.is_some()) {
        let sizes = join(|l| l.size.clone(), "auto");
        out.push(("background-size".to_string(), sizes));
    }

    out
}

/// Recompose `background` from its longhands. If every component equals its
/// default, emits `none`; otherwise omits defaulted components and prepends
/// size to position as `position / size`.
pub fn contract_background(
    color: Option<&str>,
    image: Option<&str>,
    repeat: Option<&str>,
    attachment: Option<&str>,
    position: Option<&str>,
    size: Option<&str>,
) -> Option<String> {
    let (color, image, repeat, attachment, position) = (color?, image?, repeat?, attachment?, position?);

    let all_default = color == DEFAULT_COLOR
        && image == DEFAULT_IMAGE
        && repeat == DEFAULT_REPEAT
        && attachment == DEFAULT_ATTACHMENT
        && position == DEFAULT_POSITION
        && size.is_none();
    if all_default {
        return Some("none".to_string());
    }

    let mut parts = Vec::new();
    if image != DEFAULT_IMAGE {
        parts.push(image.to_string());
    }
    if repeat != DEFAULT_REPEAT {
        parts.push(repeat.to_string());
    }
    if attachment != DEFAULT_ATTACHMENT {
        parts.push(attachment.to_string());
    }
    match size {
        Some(size) => parts.push(format!("{position} / {size}")),
        None if position != DEFAULT_POSITION => parts.push(position.to_string()),
        None => {}
    }
    if color != DEFAULT_COLOR {
        parts.push(color.to_string());
    }

    if parts.is_empty() {
        Some("none".to_string())
    } else {
        Some(parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_with_defaults() {
        let decls = expand_background("red");
        let map: std::collections::HashMap<_, _> = decls.into_iter().collect();
        assert_eq!(map["background-color"], "red");
        assert_eq!(map["background-image"], "none");
        assert_eq!(map["background-repeat"], "repeat");
        assert_eq!(map["background-attachment"], "scroll");
        assert_eq!(map["background-position"], "0% 0%");
        assert!(!map.contains_key("background-size"));
    }

    #[test]
    fn expands_full_single_layer() {
        let decls = expand_background("url(a.png) no-repeat center / cover red");
        let map: std::collections::HashMap<_, _> = decls.into_iter().collect();
        assert_eq!(map["background-image"], "url(a.png)");
        assert_eq!(map["background-repeat"], "no-repeat");
        assert_eq!(map["background-position"], "center");
        assert_eq!(map["background-size"], "cover");
        assert_eq!(map["background-color"], "red");
    }

    #[test]
    fn expands_layered_backgrounds() {
        let decls = expand_background("url(a.png) no-repeat, url(b.png) repeat-x red");
        let map: std::collections::HashMap<_, _> = decls.into_iter().collect();
        assert_eq!(map["background-image"], "url(a.png), url(b.png)");
        assert_eq!(map["background-repeat"], "no-repeat, repeat-x");
        assert_eq!(map["background-color"], "red");
    }

    #[test]
    fn contracts_all_default_to_none() {
        let v = contract_background(Some("transparent"), Some("none"), Some("repeat"), Some("scroll"), Some("0% 0%"), None);
        assert_eq!(v, Some("none".to_string()));
    }

    #[test]
    fn contracts_with_size_after_position() {
        let v = contract_background(Some("red"), Some("url(a.png)"), Some("repeat"), Some("scroll"), Some("center"), Some("cover"));
        assert_eq!(v, Some("url(a.png) center / cover red".to_string()));
    }
}
