//! Literal value model shared by AST literals and plan `Lit` nodes.

use serde::{Deserialize, Serialize};

/// A literal value as written in query text.
///
/// Lowering carries literals verbatim; it never folds, coerces, or inspects
/// them. `Missing` is distinct from `Null` per the language's bag semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Missing,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// String literal helper.
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }
}
