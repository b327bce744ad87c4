//! The lexical scanner / parser state machine (§4.1): a byte-oriented DFA
//! that emits rules (selector list + declaration block), at-rules (name +
//! prelude + optional block), and comments, recursing only by explicit
//! re-invocation on extracted block contents.

use std::collections::BTreeSet;

use crate::declaration::{parse_declarations, Declaration};
use crate::error::{CssError, DepthError, ErrorContext, ParseError, SizeError, SizeLimitKind};
use crate::limits::{MAX_AT_RULE_BLOCK_LENGTH, MAX_PARSE_DEPTH};
use crate::media::{self, MediaTypeId};
use crate::scan::{split_top_level_commas, Scanner};
use crate::{AtRule, NestingStyle, Rule, RuleId, Stylesheet, StylesheetItem};

/// Parse a full stylesheet from CSS source text.
pub fn parse(css: &str) -> Result<Stylesheet, CssError> {
    tracing::debug!(len = css.len(), "parsing stylesheet");
    let mut sheet = Stylesheet::new();
    let items = parse_block(css, 0, &mut sheet)?;
    sheet.items = items;
    Ok(sheet)
}

/// Parse a sequence of `at-rule | rule | comment | whitespace` statements.
/// Shared by the top-level stylesheet grammar and by at-rules whose content
/// is "just more rules" (`@supports`, `@layer`, `@container`, `@scope`,
/// `@media`, `@keyframes`).
fn parse_block(src: &str, depth: usize, sheet: &mut Stylesheet) -> Result<Vec<StylesheetItem>, CssError> {
    if depth > MAX_PARSE_DEPTH {
        return Err(DepthError { depth, limit: MAX_PARSE_DEPTH }.into());
    }

    let mut s = Scanner::new(src);
    let mut items = Vec::new();

    loop {
        s.skip_trivia();
        if s.at_end() {
            break;
        }
        if s.peek() == Some(b'@') {
            items.extend(parse_at_rule(&mut s, depth, sheet)?);
        } else {
            let rules = parse_rule(&mut s, depth, sheet)?;
            items.extend(rules.into_iter().map(StylesheetItem::Rule));
        }
    }

    Ok(items)
}

/// Parse one `selector_list '{' declaration_block_text '}'` rule, including
/// any rules nested inside its body. Returns the rule followed by its nested
/// descendants in pre-order, so that every `parent_rule_id` points at a
/// strictly lower index once the caller appends them in this order.
fn parse_rule(s: &mut Scanner<'_>, depth: usize, sheet: &mut Stylesheet) -> Result<Vec<Rule>, CssError> {
    let selector_start = s.mark();
    s.skip_while_respecting_strings(|b| b != b'{');
    if s.at_end() {
        return Err(ParseError(ErrorContext::capture(s.src(), s.pos(), "selector")).into());
    }
    let selector = s.slice(selector_start, s.pos()).trim().to_string();
    s.advance(1); // '{'

    let body = capture_balanced_block(s)?;
    if body.len() > MAX_AT_RULE_BLOCK_LENGTH {
        return Err(SizeError {
            kind: SizeLimitKind::AtRuleBlock,
            actual: body.len(),
            limit: MAX_AT_RULE_BLOCK_LENGTH,
        }
        .into());
    }

    let rule_id = sheet.next_rule_id();
    let (declarations, nested) = parse_rule_interior(body, depth + 1, sheet, &selector, rule_id, None)?;

    let rule = Rule::new(rule_id, selector, declarations);
    let mut out = Vec::with_capacity(1 + nested.len());
    out.push(rule);
    out.extend(nested);
    Ok(out)
}

/// Capture the substring between the `{` just consumed and its matching `}`,
/// advancing the cursor past the closing brace. Respects string literals and
/// nested braces/parens.
fn capture_balanced_block<'a>(s: &mut Scanner<'a>) -> Result<&'a str, CssError> {
    let start = s.mark();
    let mut depth = 1i32;
    loop {
        match s.peek() {
            None => {
                return Err(ParseError(ErrorContext::capture(s.src(), s.pos(), "block")).into());
            }
            Some(b'\'') | Some(b'"') => s.consume_string(),
            Some(b'{') => {
                depth += 1;
                s.advance(1);
            }
            Some(b'}') => {
                depth -= 1;
                s.advance(1);
                if depth == 0 {
                    let end = s.pos() - 1;
                    return Ok(s.slice(start, end));
                }
            }
            Some(_) => s.advance(1),
        }
    }
}

enum Stmt<'a> {
    Decl(&'a str),
    Nested { selector: &'a str, block: &'a str },
}

/// Split a rule body into declaration statements and nested-rule statements,
/// one at a time, so the two can be told apart without re-scanning.
fn next_statement<'a>(s: &mut Scanner<'a>) -> Option<Stmt<'a>> {
    s.skip_trivia();
    if s.at_end() {
        return None;
    }
    let start = s.mark();
    let mut depth = 0i32;
    loop {
        match s.peek() {
            None => return Some(Stmt::Decl(s.slice(start, s.pos()))),
            Some(b'\'') | Some(b'"') => s.consume_string(),
            Some(b'(') => {
                depth += 1;
                s.advance(1);
            }
            Some(b')') => {
                depth -= 1;
                s.advance(1);
            }
            Some(b';') if depth <= 0 => {
                let text = s.slice(start, s.pos());
                s.advance(1);
                return Some(Stmt::Decl(text));
            }
            Some(b'{') if depth <= 0 => {
                let selector = s.slice(start, s.pos()).trim();
                s.advance(1);
                let block = match capture_balanced_block(s) {
                    Ok(b) => b,
                    Err(_) => return None,
                };
                return Some(Stmt::Nested { selector, block });
            }
            Some(b'}') if depth <= 0 => {
                return Some(Stmt::Decl(s.slice(start, s.pos())));
            }
            Some(_) => s.advance(1),
        }
    }
}

/// Parse a rule body, separating plain declarations from nested rule blocks
/// (CSS Nesting's `&`-relative and implicit-descendant forms).
fn parse_rule_interior(
    body: &str,
    depth: usize,
    sheet: &mut Stylesheet,
    parent_selector: &str,
    parent_id: RuleId,
    inherited_media: Option<BTreeSet<MediaTypeId>>,
) -> Result<(Vec<Declaration>, Vec<Rule>), CssError> {
    if depth > MAX_PARSE_DEPTH {
        return Err(DepthError { depth, limit: MAX_PARSE_DEPTH }.into());
    }

    let mut s = Scanner::new(body);
    let mut declarations = Vec::new();
    let mut nested_rules = Vec::new();

    while let Some(stmt) = next_statement(&mut s) {
        match stmt {
            Stmt::Decl(text) => declarations.extend(parse_declarations(text)),
            Stmt::Nested { selector, block } => {
                if block.len() > MAX_AT_RULE_BLOCK_LENGTH {
                    return Err(SizeError {
                        kind: SizeLimitKind::AtRuleBlock,
                        actual: block.len(),
                        limit: MAX_AT_RULE_BLOCK_LENGTH,
                    }
                    .into());
                }
                for (resolved, style) in resolve_nested_selectors(selector, parent_selector) {
                    let child_id = sheet.next_rule_id();
                    let (child_decls, child_nested) = parse_rule_interior(
                        block,
                        depth + 1,
                        sheet,
                        &resolved,
                        child_id,
                        inherited_media.clone(),
                    )?;
                    let mut child = Rule::new(child_id, resolved, child_decls);
                    child.parent_rule_id = Some(parent_id);
                    child.nesting_style = Some(style);
                    child.media_types = inherited_media.clone();
                    nested_rules.push(child);
                    nested_rules.extend(child_nested);
                }
            }
        }
    }

    Ok((declarations, nested_rules))
}

/// Resolve a (possibly comma-separated) nested selector list against its
/// parent, producing the fully-qualified selector each branch designates and
/// whether it was written `&`-relative or as an implicit descendant.
fn resolve_nested_selectors(raw: &str, parent_selector: &str) -> Vec<(String, NestingStyle)> {
    split_top_level_commas(raw)
        .into_iter()
        .map(|branch| {
            let branch = branch.trim();
            if let Some(rest) = branch.strip_prefix('&') {
                (format!("{parent_selector}{rest}"), NestingStyle::Explicit)
            } else {
                (format!("{parent_selector} {branch}"), NestingStyle::Implicit)
            }
        })
        .collect()
}

const KEYFRAMES_SUFFIX: &str = "keyframes";
const DECL_ONLY_AT_RULES: &[&str] = &["font-face", "property", "page", "counter-style"];

/// Parse one at-rule: `'@' name prelude ( ';' | '{' block '}' )`.
fn parse_at_rule(s: &mut Scanner<'_>, depth: usize, sheet: &mut Stylesheet) -> Result<Vec<StylesheetItem>, CssError> {
    s.advance(1); // '@'
    let name_start = s.mark();
    s.consume_ident();
    let name = s.slice(name_start, s.pos()).to_ascii_lowercase();

    let prelude_start = s.mark();
    s.skip_while_respecting_strings(|b| b != b';' && b != b'{');
    let prelude = s.slice(prelude_start, s.pos()).trim().to_string();

    match s.peek() {
        None => Err(ParseError(ErrorContext::capture(s.src(), s.pos(), "at-rule")).into()),
        Some(b';') => {
            s.advance(1);
            if name == "charset" {
                sheet.charset = Some(unquote(&prelude));
            }
            Ok(Vec::new())
        }
        Some(b'{') => {
            s.advance(1);
            let body = capture_balanced_block(s)?;
            if body.len() > MAX_AT_RULE_BLOCK_LENGTH {
                return Err(SizeError {
                    kind: SizeLimitKind::AtRuleBlock,
                    actual: body.len(),
                    limit: MAX_AT_RULE_BLOCK_LENGTH,
                }
                .into());
            }
            dispatch_at_rule_block(&name, &prelude, body, depth, sheet)
        }
        Some(_) => unreachable!(),
    }
}

fn dispatch_at_rule_block(
    name: &str,
    prelude: &str,
    body: &str,
    depth: usize,
    sheet: &mut Stylesheet,
) -> Result<Vec<StylesheetItem>, CssError> {
    if name == "media" {
        let media_types = media::parse_media_types(prelude);
        let inner = parse_block(body, depth + 1, sheet)?;
        let mut out = Vec::with_capacity(inner.len());
        for mut item in inner {
            if let StylesheetItem::Rule(rule) = &mut item {
                let set: BTreeSet<MediaTypeId> = media_types.iter().copied().collect();
                for &m in &media_types {
                    sheet.index_media(m, rule.id);
                }
                rule.media_types = Some(set);
            }
            out.push(item);
        }
        return Ok(out);
    }

    if name.ends_with(KEYFRAMES_SUFFIX) {
        let inner = parse_block(body, depth + 1, sheet)?;
        let content: Vec<Rule> = inner
            .into_iter()
            .filter_map(|item| match item {
                StylesheetItem::Rule(r) => Some(r),
                StylesheetItem::AtRule(_) => None,
            })
            .collect();
        let id = sheet.next_rule_id();
        let selector = format!("@{name} {prelude}");
        return Ok(vec![StylesheetItem::AtRule(AtRule::WithRules { id, selector, content })]);
    }

    if DECL_ONLY_AT_RULES.contains(&name) {
        let declarations = parse_declarations(body);
        let id = sheet.next_rule_id();
        let selector = format!("@{name} {prelude}").trim_end().to_string();
        return Ok(vec![StylesheetItem::AtRule(AtRule::WithDeclarations { id, selector, content: declarations })]);
    }

    // @supports, @layer, @container, @scope, and anything unrecognized:
    // recurse and splice the produced rules into the surrounding output
    // without wrapping.
    parse_block(body, depth + 1, sheet)
}

fn unquote(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2 {
        let bytes = s.as_bytes();
        if (bytes[0] == b'"' && bytes[s.len() - 1] == b'"') || (bytes[0] == b'\'' && bytes[s.len() - 1] == b'\'') {
            return s[1..s.len() - 1].to_string();
        }
    }
    s.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_rule() {
        let sheet = parse("p { color: red; font-size: 12px }").unwrap();
        let rules: Vec<_> = sheet.rules().collect();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].selector, "p");
        assert_eq!(rules[0].declarations.len(), 2);
        assert_eq!(rules[0].declarations[0].property, "color");
        assert_eq!(rules[0].declarations[0].value, "red");
        assert_eq!(rules[0].declarations[1].property, "font-size");
    }

    #[test]
    fn assigns_monotonic_ids() {
        let sheet = parse(".a { color: red } .b { color: blue }").unwrap();
        let rules: Vec<_> = sheet.rules().collect();
        assert!(rules[1].id > rules[0].id);
    }

    #[test]
    fn media_query_tags_rules() {
        let sheet = parse("@media screen { .a { margin: 10px 20px } }").unwrap();
        let rules: Vec<_> = sheet.rules().collect();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].selector, ".a");
        let media_ids: Vec<_> = rules[0].media_types.as_ref().unwrap().iter().copied().collect();
        assert_eq!(media_ids.len(), 1);
        assert_eq!(media::resolve_media_type(media_ids[0]), "screen");
        assert!(sheet.media_index.contains_key(&media_ids[0]));
    }

    #[test]
    fn keyframes_wraps_inner_rules() {
        let sheet = parse("@keyframes spin { 0% { opacity: 0 } 100% { opacity: 1 } }").unwrap();
        assert_eq!(sheet.items.len(), 1);
        match &sheet.items[0] {
            StylesheetItem::AtRule(AtRule::WithRules { selector, content, .. }) => {
                assert_eq!(selector, "@keyframes spin");
                assert_eq!(content.len(), 2);
                assert_eq!(content[0].selector, "0%");
            }
            _ => panic!("expected AtRule::WithRules"),
        }
    }

    #[test]
    fn vendor_prefixed_keyframes() {
        let sheet = parse("@-webkit-keyframes spin { 0% { opacity: 0 } }").unwrap();
        match &sheet.items[0] {
            StylesheetItem::AtRule(AtRule::WithRules { content, .. }) => assert_eq!(content.len(), 1),
            _ => panic!("expected AtRule::WithRules"),
        }
    }

    #[test]
    fn font_face_wraps_declarations() {
        let sheet = parse("@font-face { font-family: 'Foo'; src: url(foo.woff) }").unwrap();
        match &sheet.items[0] {
            StylesheetItem::AtRule(AtRule::WithDeclarations { content, .. }) => {
                assert_eq!(content.len(), 2);
            }
            _ => panic!("expected AtRule::WithDeclarations"),
        }
    }

    #[test]
    fn supports_flattens_without_wrapping() {
        let sheet = parse("@supports (display: flex) { .a { color: red } }").unwrap();
        let rules: Vec<_> = sheet.rules().collect();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].selector, ".a");
    }

    #[test]
    fn charset_is_captured() {
        let sheet = parse("@charset \"UTF-8\"; .a { color: red }").unwrap();
        assert_eq!(sheet.charset.as_deref(), Some("UTF-8"));
    }

    #[test]
    fn explicit_nesting_with_ampersand() {
        let sheet = parse(".btn { color: red; &:hover { color: blue; } }").unwrap();
        let rules: Vec<_> = sheet.rules().collect();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].selector, ".btn");
        assert_eq!(rules[1].selector, ".btn:hover");
        assert_eq!(rules[1].nesting_style, Some(NestingStyle::Explicit));
        assert_eq!(rules[1].parent_rule_id, Some(rules[0].id));
    }

    #[test]
    fn implicit_nesting_as_descendant() {
        let sheet = parse(".parent { .child { color: red; } }").unwrap();
        let rules: Vec<_> = sheet.rules().collect();
        assert_eq!(rules[1].selector, ".parent .child");
        assert_eq!(rules[1].nesting_style, Some(NestingStyle::Implicit));
    }

    #[test]
    fn unterminated_rule_is_parse_error() {
        let err = parse(".a { color: red");
        assert!(matches!(err, Err(CssError::Parse(_))));
    }

    #[test]
    fn depth_error_on_excessive_nesting() {
        let mut css = String::new();
        for i in 0..(MAX_PARSE_DEPTH + 5) {
            css.push_str(&format!(".l{i} {{ "));
        }
        css.push_str("color: red;");
        for _ in 0..(MAX_PARSE_DEPTH + 5) {
            css.push('}');
        }
        let err = parse(&css);
        assert!(matches!(err, Err(CssError::Depth(_))));
    }

    #[test]
    fn oversized_block_is_size_error() {
        let huge = "a".repeat(MAX_AT_RULE_BLOCK_LENGTH + 1);
        let css = format!(".a {{ color: red; /* {huge} */ }}");
        let err = parse(&css);
        assert!(matches!(err, Err(CssError::Size(_))));
    }
}
