use thiserror::Error;

/// Canonical bagql error taxonomy used across crates.
///
/// Classification guidance:
/// - [`BagqlError::Planning`]: query shape/name/type issues discovered during
///   planning passes
/// - [`BagqlError::Unsupported`]: syntactically valid construct with no
///   lowering/planning rule in the current version
/// - [`BagqlError::Contract`]: an upstream-normalization guarantee turned out
///   to be false (internal-consistency failure, not a user input error)
#[derive(Debug, Error)]
pub enum BagqlError {
    /// Query planning failures.
    ///
    /// Examples:
    /// - unknown global binding during resolution
    /// - invalid LIMIT/OFFSET values surfaced by later passes
    #[error("planning error: {0}")]
    Planning(String),

    /// Valid construct for which no rule exists in the current version.
    ///
    /// Examples:
    /// - non-query statements handed to the lowering entry point
    /// - GROUP BY (reserved, unimplemented extension point)
    #[error("unsupported construct: {0}")]
    Unsupported(String),

    /// A normalized-AST contract was violated.
    ///
    /// Examples:
    /// - FROM source or projection item missing its mandatory alias
    /// - `SELECT *` reaching lowering without star-expansion
    #[error("contract violation: {0}")]
    Contract(String),
}

/// Standard bagql result alias.
pub type Result<T> = std::result::Result<T, BagqlError>;
