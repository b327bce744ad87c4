//! Error taxonomy for parsing, color conversion, and argument validation.

use std::fmt;

/// Byte-offset context captured at the point a parse failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Byte offset into the source where the DFA gave up.
    pub position: usize,
    /// Total length of the source buffer.
    pub length: usize,
    /// Name of the DFA state the scanner was in.
    pub state: &'static str,
    /// Up to 20 bytes preceding `position`, for human-readable diagnostics.
    pub context: String,
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "at byte {} of {} (state: {}, context: {:?})",
            self.position, self.length, self.state, self.context
        )
    }
}

impl ErrorContext {
    /// Build a context snippet by looking back at most 20 bytes from `position`.
    pub fn capture(src: &str, position: usize, state: &'static str) -> Self {
        let start = position.saturating_sub(20).min(src.len());
        let end = position.min(src.len());
        let context = String::from_utf8_lossy(&src.as_bytes()[start..end]).into_owned();
        ErrorContext {
            position,
            length: src.len(),
            state,
            context,
        }
    }
}

/// Top-level error type returned at the parsing boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CssError {
    /// The scanner ended in a non-final DFA state.
    #[error("parse error {0}")]
    Parse(#[from] ParseError),

    /// Nested block recursion exceeded `MAX_PARSE_DEPTH`.
    #[error("depth error {0}")]
    Depth(#[from] DepthError),

    /// A block or declaration exceeded a declared size bound.
    #[error("size error {0}")]
    Size(#[from] SizeError),
}

/// The DFA ended at end-of-input in a non-final state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unexpected end of input {0}")]
pub struct ParseError(pub ErrorContext);

/// A nested block (`@media`, rule-in-rule, `@supports`, …) recursed past the cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("nesting depth {depth} exceeds limit {limit}")]
pub struct DepthError {
    pub depth: usize,
    pub limit: usize,
}

/// A block or declaration exceeded a declared bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("size {actual} exceeds limit {limit} ({kind})")]
pub struct SizeError {
    pub kind: SizeLimitKind,
    pub actual: usize,
    pub limit: usize,
}

/// Which bound was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeLimitKind {
    PropertyName,
    PropertyValue,
    AtRuleBlock,
}

impl fmt::Display for SizeLimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SizeLimitKind::PropertyName => "property name",
            SizeLimitKind::PropertyValue => "property value",
            SizeLimitKind::AtRuleBlock => "at-rule block",
        };
        f.write_str(s)
    }
}

/// Malformed color syntax, or a component outside its valid range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorConversionError {
    #[error("unrecognized color syntax: {0:?}")]
    UnrecognizedSyntax(String),

    #[error("malformed {format} value: {reason}")]
    Malformed {
        format: String,
        reason: String,
    },

    #[error("component {component} out of range: {value} (expected {expected})")]
    OutOfRange {
        component: String,
        value: f64,
        expected: String,
    },
}

/// An invalid format name, side name, or keyword argument passed to the API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("unknown color format: {0:?}")]
    UnknownFormat(String),

    #[error("unknown side: {0:?}")]
    UnknownSide(String),

    #[error("invalid argument for {keyword}: {reason}")]
    InvalidKeyword { keyword: &'static str, reason: String },
}
