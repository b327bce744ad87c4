//! Value-level and stylesheet-level color conversion: walks a declaration
//! value (or every declaration in a stylesheet) rewriting any recognized
//! color token from one syntax to another, leaving everything else —
//! including `url(...)` contents — untouched.

use super::{format, parse_as, SourceFormat, TargetFormat, Variant};
use crate::{AtRule, Declaration, Rule, Stylesheet, StylesheetItem};

const COLOR_FUNCTIONS: &[&str] = &["rgb", "rgba", "hsl", "hsla", "hwb", "hwba", "oklab", "oklch"];

/// Rewrite every recognized color token in `value` from `from` to `to`.
/// Tokens that fail to parse as `from` (e.g. a keyword like `red`, or a
/// function call with the wrong source syntax) are copied through verbatim.
pub fn rewrite_value(value: &str, from: SourceFormat, to: TargetFormat, variant: Variant) -> String {
    let bytes = value.as_bytes();
    let mut out = String::with_capacity(value.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'#' {
            let start = i;
            let mut j = i + 1;
            while j < bytes.len() && bytes[j].is_ascii_hexdigit() {
                j += 1;
            }
            let digit_len = j - start - 1;
            if matches!(digit_len, 3 | 6 | 8) && !ident_continues(bytes, j) {
                let token = &value[start..j];
                if let Ok(ir) = parse_as(token, from) {
                    out.push_str(&format(&ir, to, variant));
                    i = j;
                    continue;
                }
            }
            out.push('#');
            i += 1;
            continue;
        }

        if bytes[i].is_ascii_alphabetic() {
            let start = i;
            let mut j = i;
            while j < bytes.len() && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'-') {
                j += 1;
            }
            let word = &value[start..j];

            if j < bytes.len() && bytes[j] == b'(' {
                if let Some(close) = find_matching_paren(bytes, j) {
                    let lower = word.to_ascii_lowercase();
                    if lower == "url" {
                        out.push_str(&value[start..=close]);
                        i = close + 1;
                        continue;
                    }
                    if COLOR_FUNCTIONS.contains(&lower.as_str()) {
                        let token = &value[start..=close];
                        if let Ok(ir) = parse_as(token, from) {
                            out.push_str(&format(&ir, to, variant));
                        } else {
                            out.push_str(token);
                        }
                        i = close + 1;
                        continue;
                    }
                }
            }

            out.push_str(word);
            i = j;
            continue;
        }

        let len = utf8_len(bytes[i]);
        out.push_str(&value[i..i + len]);
        i += len;
    }

    out
}

fn ident_continues(bytes: &[u8], pos: usize) -> bool {
    pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'-' || bytes[pos] == b'_')
}

fn find_matching_paren(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (offset, &b) in bytes[open..].iter().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

fn utf8_len(b: u8) -> usize {
    if b & 0x80 == 0 {
        1
    } else if b & 0xE0 == 0xC0 {
        2
    } else if b & 0xF0 == 0xE0 {
        3
    } else {
        4
    }
}

/// Rewrite every declaration's value across the whole stylesheet, including
/// at-rule contents (`@keyframes` nested rules, `@font-face` declarations).
pub fn convert_stylesheet(stylesheet: &mut Stylesheet, from: SourceFormat, to: TargetFormat, variant: Variant) {
    for item in stylesheet.items.iter_mut() {
        match item {
            StylesheetItem::Rule(rule) => rewrite_rule(rule, from, to, variant),
            StylesheetItem::AtRule(AtRule::WithRules { content, .. }) => {
                for rule in content.iter_mut() {
                    rewrite_rule(rule, from, to, variant);
                }
            }
            StylesheetItem::AtRule(AtRule::WithDeclarations { content, .. }) => {
                rewrite_declarations(content, from, to, variant);
            }
        }
    }
}

fn rewrite_rule(rule: &mut Rule, from: SourceFormat, to: TargetFormat, variant: Variant) {
    rewrite_declarations(&mut rule.declarations, from, to, variant);
}

fn rewrite_declarations(decls: &mut [Declaration], from: SourceFormat, to: TargetFormat, variant: Variant) {
    for decl in decls.iter_mut() {
        decl.value = rewrite_value(&decl.value, from, to, variant);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_hex_to_modern_rgb() {
        let out = rewrite_value("#ff0000", SourceFormat::Hex, TargetFormat::Rgb, Variant::Modern);
        assert_eq!(out, "rgb(255 0 0)");
    }

    #[test]
    fn leaves_url_untouched() {
        let out = rewrite_value("url(#fragment) #ff0000", SourceFormat::Any, TargetFormat::Rgb, Variant::Modern);
        assert_eq!(out, "url(#fragment) rgb(255 0 0)");
    }

    #[test]
    fn rewrites_within_shorthand_value() {
        let out = rewrite_value("1px solid #ff0000", SourceFormat::Hex, TargetFormat::Hsl, Variant::Modern);
        assert!(out.starts_with("1px solid hsl("));
    }

    #[test]
    fn non_matching_source_format_is_left_alone() {
        let out = rewrite_value("rgb(255, 0, 0)", SourceFormat::Hex, TargetFormat::Hsl, Variant::Modern);
        assert_eq!(out, "rgb(255, 0, 0)");
    }

    #[test]
    fn keyword_colors_are_not_recognized_or_mangled() {
        let out = rewrite_value("red", SourceFormat::Any, TargetFormat::Rgb, Variant::Modern);
        assert_eq!(out, "red");
    }
}
