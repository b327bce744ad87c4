//! `list-style` shorthand expansion and contraction.

use super::box_sides::split_top_level_whitespace;

const POSITION_KEYWORDS: &[&str] = &["inside", "outside"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Position,
    Image,
    Type,
}

fn classify(token: &str) -> TokenKind {
    let lower = token.to_ascii_lowercase();
    if POSITION_KEYWORDS.contains(&lower.as_str()) {
        TokenKind::Position
    } else if lower.starts_with("url(") {
        TokenKind::Image
    } else {
        TokenKind::Type
    }
}

/// Expand `list-style` into `list-style-type`, `list-style-position`, and
/// `list-style-image`, only for the components actually present.
pub fn expand_list_style(value: &str) -> Vec<(String, String)> {
    let mut position = None;
    let mut image = None;
    let mut kind = None;
    for token in split_top_level_whitespace(value) {
        match classify(token) {
            TokenKind::Position if position.is_none() => position = Some(token.to_string()),
            TokenKind::Image if image.is_none() => image = Some(token.to_string()),
            TokenKind::Type if kind.is_none() => kind = Some(token.to_string()),
            _ => {}
        }
    }
    let mut out = Vec::new();
    if let Some(k) = kind {
        out.push(("list-style-type".to_string(), k));
    }
    if let Some(p) = position {
        out.push(("list-style-position".to_string(), p));
    }
    if let Some(i) = image {
        out.push(("list-style-image".to_string(), i));
    }
    out
}

/// Recompose `list-style` from its three longhands, in type/position/image
/// order, emitting only the components present.
pub fn contract_list_style(kind: Option<&str>, position: Option<&str>, image: Option<&str>) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(k) = kind {
        parts.push(k.to_string());
    }
    if let Some(p) = position {
        parts.push(p.to_string());
    }
    if let Some(i) = image {
        parts.push(i.to_string());
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_all_components() {
        let decls = expand_list_style("square inside url(bullet.png)");
        let map: std::collections::HashMap<_, _> = decls.into_iter().collect();
        assert_eq!(map["list-style-type"], "square");
        assert_eq!(map["list-style-position"], "inside");
        assert_eq!(map["list-style-image"], "url(bullet.png)");
    }

    #[test]
    fn expands_partial() {
        let decls = expand_list_style("disc");
        assert_eq!(decls, vec![("list-style-type".to_string(), "disc".to_string())]);
    }

    #[test]
    fn contracts_in_type_position_image_order() {
        let v = contract_list_style(Some("disc"), Some("inside"), None);
        assert_eq!(v, Some("disc inside".to_string()));
    }
}
