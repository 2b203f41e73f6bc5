//! Error types for the `pixoo-life` crate.

/// Errors raised when constructing genome rule sets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenomeError {
    /// A rule value outside `1..=8` was supplied.
    #[error("rule value {0} is outside 1..=8")]
    InvalidRuleValue(u8),

    /// A rule set must contain at least one neighbor count.
    #[error("rule set must not be empty")]
    EmptyRuleSet,
}
