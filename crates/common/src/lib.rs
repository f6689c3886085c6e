//! Shared error contracts and the literal value model for bagql crates.
//!
//! Architecture role:
//! - provides the common [`BagqlError`] / [`Result`] contracts used by the
//!   AST and planner crates
//! - hosts the literal [`Value`] model shared by AST literals and plan `Lit`
//!   nodes
//!
//! Key modules:
//! - [`error`]
//! - [`value`]

pub mod error;
pub mod value;

pub use error::{BagqlError, Result};
pub use value::Value;
