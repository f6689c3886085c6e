//! Lowering from the normalized bagql AST to the relational/scalar plan IR.
//!
//! Architecture role:
//! - defines the plan IR: tabular operators ([`Rel`]) and scalar operators
//!   ([`Rex`])
//! - translates a normalized `SELECT`-`FROM`-`WHERE` AST into a `Rel`
//!   pipeline wrapped in a root `Rex` (the [`lower`] entry point)
//! - leaves variable/function references and result types unresolved; a later
//!   resolution pass rewrites them
//!
//! Key modules:
//! - [`ir`] - plan node definitions
//! - [`lower`] - statement entry point and the Rel/Rex builders
//! - [`bridge`] - AST identifier/type conversion
//! - [`env`] - planner environment collaborator
//! - [`explain`] - textual plan rendering

pub mod bridge;
pub mod env;
pub mod explain;
pub mod ir;
pub mod lower;

pub use bridge::*;
pub use env::*;
pub use explain::*;
pub use ir::*;
pub use lower::lower;
