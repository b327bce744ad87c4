//! Bidirectional shorthand expansion and contraction (§4.4): margin,
//! padding, border (+ per-side + width/style/color), font, list-style,
//! background.

mod background;
mod border;
mod box_sides;
mod font;
mod list_style;

use std::collections::BTreeMap;

/// Expand a single shorthand declaration into its longhand `(property,
/// value)` pairs. Returns an empty vec both for non-shorthand properties and
/// for shorthand values that can't be classified — this is not an error
/// (§7): the caller (the cascade engine) just has nothing to recurse over.
pub fn expand(property: &str, value: &str) -> Vec<(String, String)> {
    match property {
        "margin" => prefixed_sides(box_sides::expand_sides(value), "margin"),
        "padding" => prefixed_sides(box_sides::expand_sides(value), "padding"),
        "border-width" => prefixed_border_component(box_sides::expand_sides(value), "width"),
        "border-style" => prefixed_border_component(box_sides::expand_sides(value), "style"),
        "border-color" => prefixed_border_component(box_sides::expand_sides(value), "color"),
        "border" => border::expand_border(value),
        "border-top" => border::expand_border_side("top", value),
        "border-right" => border::expand_border_side("right", value),
        "border-bottom" => border::expand_border_side("bottom", value),
        "border-left" => border::expand_border_side("left", value),
        "font" => font::expand_font(value),
        "list-style" => list_style::expand_list_style(value),
        "background" => background::expand_background(value),
        _ => Vec::new(),
    }
}

/// True if `property` is one this module knows how to expand.
pub fn is_shorthand(property: &str) -> bool {
    matches!(
        property,
        "margin"
            | "padding"
            | "border-width"
            | "border-style"
            | "border-color"
            | "border"
            | "border-top"
            | "border-right"
            | "border-bottom"
            | "border-left"
            | "font"
            | "list-style"
            | "background"
    )
}

fn prefixed_sides(sides: Vec<(&'static str, String)>, prefix: &str) -> Vec<(String, String)> {
    sides.into_iter().map(|(side, v)| (format!("{prefix}-{side}"), v)).collect()
}

fn prefixed_border_component(sides: Vec<(&'static str, String)>, component: &str) -> Vec<(String, String)> {
    sides.into_iter().map(|(side, v)| (format!("border-{side}-{component}"), v)).collect()
}

/// A resolved property's value and importance, as tracked during cascade
/// flattening — the map [`contract_all`] operates on.
pub type ValueMap = BTreeMap<String, (String, bool)>;

/// Attempt shorthand reconstruction for every family (margin, padding,
/// border widths/styles/colors, then the `border` composite, then font,
/// list-style, background), removing the longhands that contributed to a
/// successful contraction. Declines (leaves longhands untouched) wherever a
/// family's preconditions aren't met or its components disagree on
/// `!important`.
pub fn contract_all(map: &mut ValueMap) {
    contract_sides_family(map, "margin", &["margin-top", "margin-right", "margin-bottom", "margin-left"]);
    contract_sides_family(map, "padding", &["padding-top", "padding-right", "padding-bottom", "padding-left"]);
    contract_sides_family(map, "border-width", &["border-top-width", "border-right-width", "border-bottom-width", "border-left-width"]);
    contract_sides_family(map, "border-style", &["border-top-style", "border-right-style", "border-bottom-style", "border-left-style"]);
    contract_sides_family(map, "border-color", &["border-top-color", "border-right-color", "border-bottom-color", "border-left-color"]);
    contract_border_composite(map);
    contract_font_family(map);
    contract_list_style_family(map);
    contract_background_family(map);
}

fn same_importance<'a>(map: &'a ValueMap, keys: &[&str]) -> Option<(Vec<&'a str>, bool)> {
    let mut values = Vec::with_capacity(keys.len());
    let mut important = None;
    for key in keys {
        let (value, imp) = map.get(*key)?;
        match important {
            None => important = Some(*imp),
            Some(existing) if existing != *imp => return None,
            _ => {}
        }
        values.push(value.as_str());
    }
    Some((values, important.unwrap_or(false)))
}

fn contract_sides_family(map: &mut ValueMap, shorthand: &str, longhands: &[&str; 4]) {
    let Some((values, important)) = same_importance(map, longhands) else { return };
    let value = box_sides::contract_sides(values[0], values[1], values[2], values[3]);
    for key in longhands {
        map.remove(*key);
    }
    map.insert(shorthand.to_string(), (value, important));
}

fn contract_border_composite(map: &mut ValueMap) {
    let keys = ["border-width", "border-style", "border-color"];
    let Some((values, important)) = same_importance(map, &keys) else { return };
    if let Some(value) = border::contract_border(Some(values[0]), Some(values[1]), Some(values[2])) {
        for key in keys {
            map.remove(key);
        }
        map.insert("border".to_string(), (value, important));
    }
}

fn contract_font_family(map: &mut ValueMap) {
    let keys = ["font-style", "font-variant", "font-weight", "font-size", "line-height", "font-family"];
    let Some((values, important)) = same_importance(map, &keys) else { return };
    if let Some(value) = font::contract_font(Some(values[0]), Some(values[1]), Some(values[2]), Some(values[3]), Some(values[4]), Some(values[5])) {
        for key in keys {
            map.remove(key);
        }
        map.insert("font".to_string(), (value, important));
    }
}

fn contract_list_style_family(map: &mut ValueMap) {
    let keys = ["list-style-type", "list-style-position", "list-style-image"];
    let present: Vec<&str> = keys.iter().copied().filter(|k| map.contains_key(*k)).collect();
    if present.is_empty() {
        return;
    }
    let Some((values, important)) = same_importance(map, &present) else { return };
    let mut by_key: BTreeMap<&str, &str> = present.iter().copied().zip(values).collect();
    let value = list_style::contract_list_style(
        by_key.remove("list-style-type"),
        by_key.remove("list-style-position"),
        by_key.remove("list-style-image"),
    );
    if let Some(value) = value {
        for key in &present {
            map.remove(*key);
        }
        map.insert("list-style".to_string(), (value, important));
    }
}

fn contract_background_family(map: &mut ValueMap) {
    let keys = [
        "background-color",
        "background-image",
        "background-repeat",
        "background-attachment",
        "background-position",
    ];
    let Some((values, important)) = same_importance(map, &keys) else { return };
    let size = map.get("background-size").map(|(v, _)| v.as_str());
    if let Some(size_important) = map.get("background-size").map(|(_, i)| *i) {
        if size_important != important {
            return;
        }
    }
    if let Some(value) = background::contract_background(Some(values[0]), Some(values[1]), Some(values[2]), Some(values[3]), Some(values[4]), size) {
        for key in keys {
            map.remove(key);
        }
        map.remove("background-size");
        map.insert("background".to_string(), (value, important));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_margin_three_values() {
        let decls = expand("margin", "10px 20px 30px");
        assert_eq!(
            decls,
            vec![
                ("margin-top".to_string(), "10px".to_string()),
                ("margin-right".to_string(), "20px".to_string()),
                ("margin-bottom".to_string(), "30px".to_string()),
                ("margin-left".to_string(), "20px".to_string()),
            ]
        );
    }

    #[test]
    fn expand_unknown_property_is_empty() {
        assert!(expand("color", "red").is_empty());
    }

    #[test]
    fn contract_margin_roundtrip() {
        let mut map = ValueMap::new();
        map.insert("margin-top".to_string(), ("10px".to_string(), false));
        map.insert("margin-right".to_string(), ("10px".to_string(), false));
        map.insert("margin-bottom".to_string(), ("10px".to_string(), false));
        map.insert("margin-left".to_string(), ("10px".to_string(), false));
        contract_all(&mut map);
        assert_eq!(map.get("margin"), Some(&("10px".to_string(), false)));
        assert!(!map.contains_key("margin-top"));
    }

    #[test]
    fn contract_declines_on_mixed_importance() {
        let mut map = ValueMap::new();
        map.insert("margin-top".to_string(), ("10px".to_string(), true));
        map.insert("margin-right".to_string(), ("10px".to_string(), false));
        map.insert("margin-bottom".to_string(), ("10px".to_string(), false));
        map.insert("margin-left".to_string(), ("10px".to_string(), false));
        contract_all(&mut map);
        assert!(!map.contains_key("margin"));
        assert!(map.contains_key("margin-top"));
    }

    #[test]
    fn contract_border_composite_after_sides() {
        let mut map = ValueMap::new();
        for side in ["top", "right", "bottom", "left"] {
            map.insert(format!("border-{side}-width"), ("1px".to_string(), false));
            map.insert(format!("border-{side}-style"), ("solid".to_string(), false));
            map.insert(format!("border-{side}-color"), ("red".to_string(), false));
        }
        contract_all(&mut map);
        assert_eq!(map.get("border"), Some(&("1px solid red".to_string(), false)));
    }
}
