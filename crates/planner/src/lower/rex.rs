//! Scalar lowering: AST expressions to [`Rex`] trees.
//!
//! Every output carries the "any" placeholder tag except container
//! constructors, whose tag reflects the source collection kind; a later pass
//! assigns precise types. No constant folding and no type checking happen
//! here.

use bagql_ast as ast;
use bagql_common::{BagqlError, Result, Value};

use crate::bridge::convert_identifier;
use crate::ir::{Case, FnRef, Identifier, PathStep, Rex, RexOp, StructField, Symbol, VarScope};

use super::Lowering;

impl Lowering {
    pub(crate) fn lower_rex(&mut self, expr: &ast::Expr) -> Result<Rex> {
        match expr {
            ast::Expr::Lit(v) => Ok(Rex {
                ty: self.types.any,
                op: RexOp::Lit(v.clone()),
            }),

            ast::Expr::Var { id, scope } => Ok(Rex {
                ty: self.types.any,
                op: RexOp::VarUnresolved {
                    id: convert_identifier(id),
                    scope: match scope {
                        ast::Scope::Default => VarScope::Default,
                        ast::Scope::Local => VarScope::Local,
                    },
                },
            }),

            ast::Expr::Unary { op, expr } => {
                let arg = self.lower_rex(expr)?;
                Ok(self.op_call(unary_op_name(*op), vec![arg]))
            }

            ast::Expr::Binary { op, lhs, rhs } => {
                let lhs = self.lower_rex(lhs)?;
                let rhs = self.lower_rex(rhs)?;
                Ok(self.op_call(binary_op_name(*op), vec![lhs, rhs]))
            }

            ast::Expr::Path { root, steps } => {
                let root = self.lower_rex(root)?;
                let steps = steps
                    .iter()
                    .map(|s| self.lower_path_step(s))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Rex {
                    ty: self.types.any,
                    op: RexOp::Path {
                        root: Box::new(root),
                        steps,
                    },
                })
            }

            ast::Expr::Call { func, args } => {
                let args = args
                    .iter()
                    .map(|a| self.lower_rex(a))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Rex {
                    ty: self.types.any,
                    op: RexOp::Call {
                        func: FnRef::Unresolved(convert_identifier(func)),
                        args,
                    },
                })
            }

            ast::Expr::Collection { kind, values } => {
                let values = values
                    .iter()
                    .map(|v| self.lower_rex(v))
                    .collect::<Result<Vec<_>>>()?;
                let ty = match kind {
                    ast::CollectionKind::Bag => self.types.bag,
                    ast::CollectionKind::List => self.types.list,
                    ast::CollectionKind::Sexp => self.types.sexp,
                };
                Ok(Rex {
                    ty,
                    op: RexOp::Collection(values),
                })
            }

            ast::Expr::Struct(fields) => {
                let fields = fields
                    .iter()
                    .map(|f| {
                        Ok(StructField {
                            name: self.lower_rex(&f.name)?,
                            value: self.lower_rex(&f.value)?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Rex {
                    ty: self.types.strct,
                    op: RexOp::Struct(fields),
                })
            }

            // A subquery in scalar position collapses to its single element.
            // Coercion is applied uniformly here; the contexts that suppress
            // it (array comparison operands, FROM sources, IN right-hand
            // sides) are owned by a later pass.
            ast::Expr::Sfw(sfw) => {
                let subquery = self.lower_sfw(sfw)?;
                Ok(Rex {
                    ty: self.types.any,
                    op: RexOp::CollToScalar(Box::new(subquery)),
                })
            }

            ast::Expr::Parameter(_) => Err(BagqlError::Unsupported(
                "dynamic statement parameters cannot be lowered".to_string(),
            )),
        }
    }

    fn lower_path_step(&mut self, step: &ast::PathStep) -> Result<PathStep> {
        match step {
            // A symbol step becomes an index by string key, never a schema
            // lookup; a later pass may reclassify leading steps as direct
            // bindings.
            ast::PathStep::Symbol(sym) => Ok(PathStep::Index(Rex {
                ty: self.types.any,
                op: RexOp::Lit(Value::string(sym.text.clone())),
            })),
            ast::PathStep::Index(expr) => Ok(PathStep::Index(self.lower_rex(expr)?)),
            ast::PathStep::Wildcard => Ok(PathStep::Wildcard),
            ast::PathStep::Unpivot => Ok(PathStep::Unpivot),
        }
    }

    /// Build the `Call` form of a unary/binary operator.
    fn op_call(&self, name: &'static str, args: Vec<Rex>) -> Rex {
        Rex {
            ty: self.types.any,
            op: RexOp::Call {
                func: FnRef::Unresolved(Identifier::Symbol(Symbol::new(name, Case::Insensitive))),
                args,
            },
        }
    }
}

fn unary_op_name(op: ast::UnaryOp) -> &'static str {
    match op {
        ast::UnaryOp::Pos => "pos",
        ast::UnaryOp::Neg => "neg",
        ast::UnaryOp::Not => "not",
    }
}

fn binary_op_name(op: ast::BinaryOp) -> &'static str {
    match op {
        ast::BinaryOp::Plus => "plus",
        ast::BinaryOp::Minus => "minus",
        ast::BinaryOp::Times => "times",
        ast::BinaryOp::Divide => "divide",
        ast::BinaryOp::Modulo => "modulo",
        ast::BinaryOp::Concat => "concat",
        ast::BinaryOp::And => "and",
        ast::BinaryOp::Or => "or",
        ast::BinaryOp::Eq => "eq",
        ast::BinaryOp::Ne => "neq",
        ast::BinaryOp::Gt => "gt",
        ast::BinaryOp::Gte => "gte",
        ast::BinaryOp::Lt => "lt",
        ast::BinaryOp::Lte => "lte",
    }
}
