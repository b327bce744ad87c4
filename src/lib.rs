//! A CSS stylesheet processing core: parser, cascade-aware merger,
//! color-space converter, and serializer.
//!
//! Ingests CSS 1/2/3 source text into a structured [`Stylesheet`] that can be
//! mutated, merged according to the CSS cascade ([`cascade`]), normalized
//! across color formats and shorthand/longhand forms ([`color`],
//! [`shorthand`]), and re-serialized ([`serializer`]).

pub mod cascade;
pub mod color;
pub mod declaration;
pub mod error;
pub mod limits;
pub mod media;
mod parser;
mod scan;
pub mod serializer;
pub mod shorthand;
pub mod specificity;

pub use declaration::Declaration;
pub use error::{ArgumentError, ColorConversionError, CssError, DepthError, ParseError, SizeError};
pub use media::MediaTypeId;
pub use parser::parse;
pub use specificity::Specificity;

use std::collections::{BTreeSet, HashMap};

/// Monotonically assigned, never-reused identifier for a [`Rule`].
pub type RuleId = u64;

/// Whether a nested selector was written as `&`-relative or as an implicit
/// descendant of its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestingStyle {
    Implicit,
    Explicit,
}

/// A single selector-list + declaration-block rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub id: RuleId,
    pub selector: String,
    pub declarations: Vec<Declaration>,
    specificity: Option<u32>,
    pub parent_rule_id: Option<RuleId>,
    pub nesting_style: Option<NestingStyle>,
    pub media_types: Option<BTreeSet<MediaTypeId>>,
}

impl Rule {
    pub fn new(id: RuleId, selector: impl Into<String>, declarations: Vec<Declaration>) -> Self {
        Rule {
            id,
            selector: selector.into(),
            declarations,
            specificity: None,
            parent_rule_id: None,
            nesting_style: None,
            media_types: None,
        }
    }

    /// Compute (and cache) this rule's specificity.
    pub fn specificity(&mut self) -> u32 {
        if let Some(v) = self.specificity {
            return v;
        }
        let v = specificity::compute_specificity(&self.selector).value();
        self.specificity = Some(v);
        v
    }

    /// Peek at a previously computed specificity without forcing computation.
    pub fn cached_specificity(&self) -> Option<u32> {
        self.specificity
    }
}

/// An at-rule: `@<name> <prelude>` plus either nested rules (`@keyframes`) or
/// a flat declaration block (`@font-face`, `@property`, `@page`,
/// `@counter-style`). Distinguishable from [`Rule`] by this tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtRule {
    WithRules {
        id: RuleId,
        selector: String,
        content: Vec<Rule>,
    },
    WithDeclarations {
        id: RuleId,
        selector: String,
        content: Vec<Declaration>,
    },
}

impl AtRule {
    pub fn id(&self) -> RuleId {
        match self {
            AtRule::WithRules { id, .. } => *id,
            AtRule::WithDeclarations { id, .. } => *id,
        }
    }

    pub fn selector(&self) -> &str {
        match self {
            AtRule::WithRules { selector, .. } => selector,
            AtRule::WithDeclarations { selector, .. } => selector,
        }
    }
}

/// A top-level stylesheet item: a plain rule or an at-rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylesheetItem {
    Rule(Rule),
    AtRule(AtRule),
}

impl StylesheetItem {
    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            StylesheetItem::Rule(r) => Some(r),
            StylesheetItem::AtRule(_) => None,
        }
    }

    pub fn as_rule_mut(&mut self) -> Option<&mut Rule> {
        match self {
            StylesheetItem::Rule(r) => Some(r),
            StylesheetItem::AtRule(_) => None,
        }
    }
}

/// The persisted state of a parsed stylesheet.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    pub items: Vec<StylesheetItem>,
    pub media_index: HashMap<MediaTypeId, Vec<RuleId>>,
    pub charset: Option<String>,
    last_rule_id: RuleId,
}

impl Stylesheet {
    pub fn new() -> Self {
        Stylesheet::default()
    }

    pub fn next_rule_id(&mut self) -> RuleId {
        self.last_rule_id += 1;
        self.last_rule_id
    }

    pub fn last_rule_id(&self) -> RuleId {
        self.last_rule_id
    }

    /// True if any rule carries a `parent_rule_id`, i.e. the stylesheet
    /// contains CSS nesting. Derived on demand rather than tracked as a flag,
    /// since the source data is cheap to scan and this avoids an
    /// easy-to-forget invariant to keep in sync on every insert.
    pub fn has_nesting(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, StylesheetItem::Rule(r) if r.parent_rule_id.is_some()))
    }

    /// All plain rules, in source order (at-rule contents excluded).
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.items.iter().filter_map(StylesheetItem::as_rule)
    }

    pub fn rules_mut(&mut self) -> impl Iterator<Item = &mut Rule> {
        self.items.iter_mut().filter_map(StylesheetItem::as_rule_mut)
    }

    /// Record that `rule_id` applies under media symbol `media`.
    pub fn index_media(&mut self, media: MediaTypeId, rule_id: RuleId) {
        self.media_index.entry(media).or_default().push(rule_id);
    }
}
