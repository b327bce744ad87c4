//! Media-query prelude parsing, interned media-type tokens, and `@import`
//! extraction.
//!
//! Media-type symbols (`screen`, `print`, or a compound string like
//! `screen and (min-width: 0)`) are represented as interned handles so that
//! `media_index` equality checks are cheap; the original text is kept around
//! for serialization.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// A handle to an interned media-type token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaTypeId(u32);

struct MediaInterner {
    strings: Vec<Box<str>>,
    index: HashMap<Box<str>, u32>,
}

impl MediaInterner {
    fn new() -> Self {
        MediaInterner {
            strings: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn intern(&mut self, s: &str) -> MediaTypeId {
        if let Some(&id) = self.index.get(s) {
            return MediaTypeId(id);
        }
        let id = self.strings.len() as u32;
        self.strings.push(s.into());
        self.index.insert(s.into(), id);
        MediaTypeId(id)
    }

    fn resolve(&self, id: MediaTypeId) -> &str {
        &self.strings[id.0 as usize]
    }
}

fn interner() -> &'static Mutex<MediaInterner> {
    static INTERNER: OnceLock<Mutex<MediaInterner>> = OnceLock::new();
    INTERNER.get_or_init(|| Mutex::new(MediaInterner::new()))
}

/// Intern a media-type token, returning a cheap-to-compare handle.
pub fn intern_media_type(s: &str) -> MediaTypeId {
    interner().lock().unwrap().intern(s)
}

/// Resolve an interned handle back to its original text.
pub fn resolve_media_type(id: MediaTypeId) -> String {
    interner().lock().unwrap().resolve(id).to_string()
}

const RESERVED_WORDS: &[&str] = &["and", "or", "not", "only"];

/// Parse a media-query prelude (the text between `@media` and `{`) into the
/// set of media-type tokens it names.
///
/// Identifiers are extracted; `and`/`or`/`not`/`only` are discarded.
/// Parenthesized feature expressions (`(min-width: 0)`) are ignored — only
/// identifiers outside parens matter for type classification.
pub fn parse_media_types(prelude: &str) -> Vec<MediaTypeId> {
    let mut result = Vec::new();
    let mut depth = 0i32;
    let bytes = prelude.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'(' => {
                depth += 1;
                i += 1;
            }
            b')' => {
                depth -= 1;
                i += 1;
            }
            _ if depth == 0 && (b.is_ascii_alphabetic() || b == b'-') => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
                    i += 1;
                }
                let word = &prelude[start..i];
                let lower = word.to_ascii_lowercase();
                if !RESERVED_WORDS.contains(&lower.as_str()) {
                    result.push(intern_media_type(&lower));
                }
            }
            _ => i += 1,
        }
    }
    result
}

/// A single `@import` directive extracted from the top of a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDirective {
    pub url: String,
    pub media_query: Option<String>,
    /// Byte offsets `[start, end)` of the full `@import ...;` statement.
    pub span: (usize, usize),
}

/// Scan the leading run of a stylesheet for `@import` directives.
///
/// Stops at the first non-whitespace content that isn't `@charset` or
/// `@import`, per CSS's requirement that imports precede all other rules.
pub fn extract_imports(css: &str) -> Vec<ImportDirective> {
    use crate::scan::Scanner;

    let mut s = Scanner::new(css);
    let mut imports = Vec::new();

    loop {
        s.skip_trivia();
        if s.at_end() || s.peek() != Some(b'@') {
            break;
        }
        let stmt_start = s.pos();
        s.advance(1);
        let name = s.consume_ident().to_ascii_lowercase();
        if name == "charset" {
            // skip to ';'
            s.skip_while_respecting_strings(|b| b != b';');
            if s.peek() == Some(b';') {
                s.advance(1);
            }
            continue;
        }
        if name != "import" {
            break;
        }
        s.skip_trivia();
        let url = parse_import_url(&mut s);
        s.skip_trivia();
        let query_start = s.pos();
        s.skip_while_respecting_strings(|b| b != b';');
        let media_query = {
            let raw = s.slice(query_start, s.pos()).trim();
            if raw.is_empty() {
                None
            } else {
                Some(raw.to_string())
            }
        };
        if s.peek() == Some(b';') {
            s.advance(1);
        }
        if let Some(url) = url {
            imports.push(ImportDirective {
                url,
                media_query,
                span: (stmt_start, s.pos()),
            });
        }
    }

    imports
}

fn parse_import_url(s: &mut crate::scan::Scanner<'_>) -> Option<String> {
    if s.peek() == Some(b'\'') || s.peek() == Some(b'"') {
        let start = s.pos();
        s.consume_string();
        let raw = s.span_from(start);
        return Some(raw[1..raw.len().saturating_sub(1)].to_string());
    }
    let ident = s.consume_ident();
    if ident != "url" || s.peek() != Some(b'(') {
        return None;
    }
    s.advance(1);
    s.skip_whitespace_only();
    let content = if s.peek() == Some(b'\'') || s.peek() == Some(b'"') {
        let start = s.pos();
        s.consume_string();
        let raw = s.span_from(start);
        raw[1..raw.len().saturating_sub(1)].to_string()
    } else {
        let start = s.pos();
        s.skip_while_respecting_strings(|b| b != b')');
        s.slice(start, s.pos()).trim().to_string()
    };
    s.skip_whitespace_only();
    if s.peek() == Some(b')') {
        s.advance(1);
    }
    Some(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_media_types() {
        let ids = parse_media_types("screen and (min-width: 0)");
        assert_eq!(ids.len(), 1);
        assert_eq!(resolve_media_type(ids[0]), "screen");
    }

    #[test]
    fn discards_reserved_words() {
        let ids = parse_media_types("screen, print and (orientation: landscape)");
        let names: Vec<_> = ids.into_iter().map(resolve_media_type).collect();
        assert_eq!(names, vec!["screen", "print"]);
    }

    #[test]
    fn extracts_import_with_media() {
        let css = r#"@import url("foo.css") screen, print; .a { color: red }"#;
        let imports = extract_imports(css);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].url, "foo.css");
        assert_eq!(imports[0].media_query.as_deref(), Some("screen, print"));
    }

    #[test]
    fn extracts_bare_string_import() {
        let css = r#"@import 'foo.css';"#;
        let imports = extract_imports(css);
        assert_eq!(imports[0].url, "foo.css");
        assert!(imports[0].media_query.is_none());
    }

    #[test]
    fn stops_at_first_non_import_content() {
        let css = r#"@import url(a.css); .a { color: red } @import url(b.css);"#;
        let imports = extract_imports(css);
        assert_eq!(imports.len(), 1);
    }
}
