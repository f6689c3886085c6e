//! Statement entry point and the per-statement lowering context.
//!
//! Lowering is a single top-down recursive traversal of the normalized AST.
//! Every produced node immediately becomes a child of its parent; nothing is
//! revisited or mutated afterwards. The first construct without a lowering
//! rule aborts the whole statement; no partial plan is ever returned.

mod rel;
mod rex;

use bagql_ast as ast;
use bagql_common::{BagqlError, Result};
use tracing::debug;

use crate::env::PlannerEnv;
use crate::ir::{self, Case, Symbol, TypeAtom, TypeRef};

/// Lower a top-level statement into a plan statement.
///
/// `Statement::Query` bodies dispatch to relational lowering when they are an
/// SFW, otherwise to scalar lowering. Any other statement kind is fatal.
///
/// A fresh lowering context is created per call, so lowering the same AST
/// twice yields structurally identical plans and independent statements may
/// be lowered concurrently.
pub fn lower(statement: &ast::Statement, env: &dyn PlannerEnv) -> Result<ir::Statement> {
    match statement {
        ast::Statement::Query(expr) => {
            debug!("lowering query statement");
            let mut lowering = Lowering::new(env);
            let root = match expr {
                ast::Expr::Sfw(sfw) => lowering.lower_sfw(sfw)?,
                scalar => lowering.lower_rex(scalar)?,
            };
            Ok(ir::Statement::Query { root })
        }
        ast::Statement::Ddl(_) => Err(BagqlError::Unsupported(
            "DDL statements cannot be lowered to a query plan".to_string(),
        )),
        ast::Statement::Exec { name, .. } => Err(BagqlError::Unsupported(format!(
            "EXEC {} cannot be lowered to a query plan",
            name.text
        ))),
    }
}

/// Frequently used type tags, resolved once per statement.
pub(crate) struct CommonTypes {
    pub(crate) any: TypeRef,
    pub(crate) bag: TypeRef,
    pub(crate) list: TypeRef,
    pub(crate) sexp: TypeRef,
    pub(crate) strct: TypeRef,
}

/// Per-statement lowering state.
///
/// Owns the synthetic-binding counter. One instance per statement, never
/// shared across statements or threads.
pub(crate) struct Lowering {
    pub(crate) types: CommonTypes,
    next_synthetic: u32,
}

impl Lowering {
    fn new(env: &dyn PlannerEnv) -> Self {
        let types = CommonTypes {
            any: env.resolve_type(TypeAtom::Any),
            bag: env.resolve_type(TypeAtom::Bag),
            list: env.resolve_type(TypeAtom::List),
            sexp: env.resolve_type(TypeAtom::Sexp),
            strct: env.resolve_type(TypeAtom::Struct),
        };
        Lowering {
            types,
            next_synthetic: 0,
        }
    }

    /// Next synthetic positional binding name: `$__v0`, `$__v1`, …
    pub(crate) fn fresh_binding_name(&mut self) -> Symbol {
        let n = self.next_synthetic;
        self.next_synthetic += 1;
        Symbol::new(format!("$__v{n}"), Case::Sensitive)
    }
}
