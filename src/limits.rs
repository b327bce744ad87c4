//! Compile-time overridable bounds that make adversarial input safe.
//!
//! These are not style guidance. Crossing one is a hard [`crate::error::SizeError`]
//! or [`crate::error::DepthError`], never a warning.

/// Maximum bytes in a declaration property name.
pub const MAX_PROPERTY_NAME_LENGTH: usize = 256;

/// Maximum bytes in a declaration value.
pub const MAX_PROPERTY_VALUE_LENGTH: usize = 32 * 1024;

/// Maximum bytes in a single at-rule block body.
pub const MAX_AT_RULE_BLOCK_LENGTH: usize = 1024 * 1024;

/// Maximum nested-block recursion depth (`@media` inside `@supports`, etc).
pub const MAX_PARSE_DEPTH: usize = 10;
