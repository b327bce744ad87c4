//! Reconstructs canonical CSS text from a [`Stylesheet`] (§4.7): compact
//! (one rule per line) or formatted (declaration per line, two-space
//! indent), grouping contiguous same-media rules into `@media` blocks and
//! unresolving nested rules back to `&`-relative or implicit-descendant
//! form.

use std::collections::HashMap;

use crate::{media, AtRule, Declaration, NestingStyle, Rule, RuleId, Stylesheet, StylesheetItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Compact,
    Formatted,
}

pub fn serialize(stylesheet: &Stylesheet, mode: Mode) -> String {
    let mut out = String::new();

    if let Some(charset) = &stylesheet.charset {
        out.push_str(&format!("@charset \"{charset}\";"));
        out.push(if mode == Mode::Formatted { '\n' } else { ' ' });
    }

    let rule_media = build_rule_media_map(stylesheet);
    let children = if stylesheet.has_nesting() { build_children_map(stylesheet) } else { HashMap::new() };
    let rules_by_id: HashMap<RuleId, &Rule> = stylesheet.rules().map(|r| (r.id, r)).collect();

    enum Entry<'a> {
        TopRule(&'a Rule),
        At(&'a AtRule),
    }

    let sequence: Vec<Entry> = stylesheet
        .items
        .iter()
        .filter_map(|item| match item {
            StylesheetItem::Rule(r) if r.parent_rule_id.is_none() => Some(Entry::TopRule(r)),
            StylesheetItem::Rule(_) => None,
            StylesheetItem::AtRule(a) => Some(Entry::At(a)),
        })
        .collect();

    let mut pieces: Vec<String> = Vec::new();
    let mut i = 0;
    while i < sequence.len() {
        match &sequence[i] {
            Entry::At(at_rule) => {
                pieces.push(serialize_at_rule(at_rule, mode));
                i += 1;
            }
            Entry::TopRule(first) => {
                let media = rule_media.get(&first.id).cloned();
                let mut run = vec![*first];
                i += 1;
                while let Some(Entry::TopRule(r)) = sequence.get(i) {
                    if rule_media.get(&r.id).cloned() == media {
                        run.push(*r);
                        i += 1;
                    } else {
                        break;
                    }
                }
                pieces.push(serialize_run(&run, media.as_deref(), &children, &rules_by_id, mode));
            }
        }
    }

    out.push_str(&pieces.join(if mode == Mode::Formatted { "\n" } else { " " }));
    out
}

/// Reverse map from the media-index: rule id -> its media symbol. On
/// collision (a rule id reachable under more than one media type), the
/// longer/more specific symbol wins.
fn build_rule_media_map(stylesheet: &Stylesheet) -> HashMap<RuleId, String> {
    let mut map: HashMap<RuleId, String> = HashMap::new();
    for (media_id, rule_ids) in &stylesheet.media_index {
        let symbol = media::resolve_media_type(*media_id);
        for rule_id in rule_ids {
            match map.get(rule_id) {
                Some(existing) if existing.len() >= symbol.len() => {}
                _ => {
                    map.insert(*rule_id, symbol.clone());
                }
            }
        }
    }
    map
}

fn build_children_map(stylesheet: &Stylesheet) -> HashMap<RuleId, Vec<RuleId>> {
    let mut map: HashMap<RuleId, Vec<RuleId>> = HashMap::new();
    for rule in stylesheet.rules() {
        if let Some(parent) = rule.parent_rule_id {
            map.entry(parent).or_default().push(rule.id);
        }
    }
    map
}

fn serialize_run(
    run: &[&Rule],
    media: Option<&str>,
    children: &HashMap<RuleId, Vec<RuleId>>,
    rules_by_id: &HashMap<RuleId, &Rule>,
    mode: Mode,
) -> String {
    let depth = if media.is_some() { 1 } else { 0 };
    let bodies: Vec<String> = run.iter().map(|r| serialize_rule(r, None, children, rules_by_id, mode, depth)).collect();
    let joined = join_blocks(&bodies, mode, 0);

    match media {
        Some(symbol) => wrap_block(&format!("@media {symbol}"), &joined, mode, 0),
        None => joined,
    }
}

fn serialize_at_rule(at_rule: &AtRule, mode: Mode) -> String {
    match at_rule {
        AtRule::WithRules { selector, content, .. } => {
            let bodies: Vec<String> = content.iter().map(|r| serialize_rule(r, None, &HashMap::new(), &HashMap::new(), mode, 1)).collect();
            let joined = join_blocks(&bodies, mode, 0);
            wrap_block(selector, &joined, mode, 0)
        }
        AtRule::WithDeclarations { selector, content, .. } => {
            let decls = serialize_declarations(content, mode, 1);
            wrap_block(selector, &decls, mode, 0)
        }
    }
}

fn serialize_rule(
    rule: &Rule,
    parent: Option<&Rule>,
    children: &HashMap<RuleId, Vec<RuleId>>,
    rules_by_id: &HashMap<RuleId, &Rule>,
    mode: Mode,
    depth: usize,
) -> String {
    let selector = match parent {
        Some(parent) => unresolve_selector(rule, parent),
        None => rule.selector.clone(),
    };

    let mut body = serialize_declarations(&rule.declarations, mode, depth + 1);

    if let Some(child_ids) = children.get(&rule.id) {
        let nested: Vec<String> = child_ids
            .iter()
            .filter_map(|id| rules_by_id.get(id))
            .map(|child| serialize_rule(child, Some(rule), children, rules_by_id, mode, depth + 1))
            .collect();
        if !nested.is_empty() {
            let nested_joined = join_blocks(&nested, mode, depth + 1);
            if !body.is_empty() {
                body.push_str(if mode == Mode::Formatted { "\n" } else { " " });
            }
            body.push_str(&indent(mode, depth + 1));
            body.push_str(&nested_joined);
        }
    }

    wrap_block(&selector, &body, mode, depth)
}

/// Reverse `parse.rs`'s nested-selector resolution: explicit nesting
/// replaces the parent's selector prefix with `&`; implicit nesting strips
/// the `"<parent> "` descendant prefix.
fn unresolve_selector(child: &Rule, parent: &Rule) -> String {
    match child.nesting_style {
        Some(NestingStyle::Explicit) => {
            if let Some(rest) = child.selector.strip_prefix(&parent.selector) {
                format!("&{rest}")
            } else {
                child.selector.clone()
            }
        }
        Some(NestingStyle::Implicit) => {
            let prefix = format!("{} ", parent.selector);
            child.selector.strip_prefix(&prefix).map(str::to_string).unwrap_or_else(|| child.selector.clone())
        }
        None => child.selector.clone(),
    }
}

fn serialize_declarations(decls: &[Declaration], mode: Mode, depth: usize) -> String {
    let parts: Vec<String> = decls
        .iter()
        .map(|d| {
            let important = if d.important { " !important" } else { "" };
            format!("{}: {}{};", d.property, d.value, important)
        })
        .collect();

    match mode {
        Mode::Compact => parts.join(" "),
        Mode::Formatted => {
            let pad = indent(mode, depth);
            parts.iter().map(|p| format!("{pad}{p}")).collect::<Vec<_>>().join("\n")
        }
    }
}

fn wrap_block(header: &str, body: &str, mode: Mode, depth: usize) -> String {
    let pad = indent(mode, depth);
    match mode {
        Mode::Compact => {
            if body.is_empty() {
                format!("{header} {{ }}")
            } else {
                format!("{header} {{ {body} }}")
            }
        }
        Mode::Formatted => {
            if body.is_empty() {
                format!("{pad}{header} {{\n{pad}}}")
            } else {
                format!("{pad}{header} {{\n{body}\n{pad}}}")
            }
        }
    }
}

fn join_blocks(blocks: &[String], mode: Mode, _depth: usize) -> String {
    match mode {
        Mode::Compact => blocks.join(" "),
        Mode::Formatted => blocks.join("\n"),
    }
}

fn indent(mode: Mode, depth: usize) -> String {
    match mode {
        Mode::Compact => String::new(),
        Mode::Formatted => "  ".repeat(depth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn compact_single_rule() {
        let sheet = parse("p { color: red; }").unwrap();
        let out = serialize(&sheet, Mode::Compact);
        assert_eq!(out, "p { color: red; }");
    }

    #[test]
    fn important_is_emitted() {
        let sheet = parse("p { color: red !important; }").unwrap();
        let out = serialize(&sheet, Mode::Compact);
        assert_eq!(out, "p { color: red !important; }");
    }

    #[test]
    fn charset_emitted_first() {
        let sheet = parse("@charset \"UTF-8\"; p { color: red; }").unwrap();
        let out = serialize(&sheet, Mode::Compact);
        assert!(out.starts_with("@charset \"UTF-8\"; "));
    }

    #[test]
    fn groups_contiguous_same_media_rules() {
        let sheet = parse("@media screen { p { color: red; } div { color: blue; } }").unwrap();
        let out = serialize(&sheet, Mode::Compact);
        assert_eq!(out, "@media screen { p { color: red; } div { color: blue; } }");
    }

    #[test]
    fn unresolves_explicit_nesting() {
        let sheet = parse(".btn { color: red; &:hover { color: blue; } }").unwrap();
        let out = serialize(&sheet, Mode::Compact);
        assert_eq!(out, ".btn { color: red; &:hover { color: blue; } }");
    }

    #[test]
    fn unresolves_implicit_nesting() {
        let sheet = parse(".parent { color: red; .child { color: blue; } }").unwrap();
        let out = serialize(&sheet, Mode::Compact);
        assert_eq!(out, ".parent { color: red; .child { color: blue; } }");
    }

    #[test]
    fn formatted_mode_indents_declarations() {
        let sheet = parse("p { color: red; }").unwrap();
        let out = serialize(&sheet, Mode::Formatted);
        assert_eq!(out, "p {\n  color: red;\n}");
    }
}
