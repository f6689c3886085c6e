//! Relational lowering: SFW AST bodies to [`Rel`] pipelines.
//!
//! The pipeline is assembled in a fixed order: FROM, WHERE, (aggregation,
//! reserved), set operation, ORDER BY, LIMIT, OFFSET, and the final
//! SELECT/PIVOT/VALUE projection always last. Each clause wraps the pipeline
//! built so far; nothing is mutated in place.

use std::collections::BTreeSet;

use bagql_ast as ast;
use bagql_common::{BagqlError, Result, Value};

use crate::bridge::convert_symbol;
use crate::ir::{
    Binding, JoinKind, NullOrder, Rel, RelOp, RelProp, Rex, RexOp, SortDir, SortSpec, StructField,
};

use super::Lowering;

impl Lowering {
    /// Lower an SFW body into the `Rex` representing the query's value.
    pub(crate) fn lower_sfw(&mut self, sfw: &ast::Sfw) -> Result<Rex> {
        let pipeline = self.lower_pipeline(sfw)?;
        match &sfw.select {
            ast::Select::Pivot { key, value } => {
                let key = self.lower_rex(key)?;
                let value = self.lower_rex(value)?;
                Ok(Rex {
                    ty: self.types.strct,
                    op: RexOp::Pivot {
                        key: Box::new(key),
                        value: Box::new(value),
                        rel: Box::new(pipeline),
                    },
                })
            }
            ast::Select::Value(constructor) => {
                let constructor = self.lower_rex(constructor)?;
                Ok(self.wrap_select(constructor, pipeline))
            }
            // Plain SELECT is SELECT VALUE of a synthesized struct: one field
            // per projected binding, valued by a resolved positional ref.
            ast::Select::Project(items) => {
                let projected = self.project(pipeline, items)?;
                let constructor = self.default_constructor(&projected.schema);
                Ok(self.wrap_select(constructor, projected))
            }
            ast::Select::Star => Err(BagqlError::Contract(
                "SELECT * must be star-expanded before lowering".to_string(),
            )),
        }
    }

    /// FROM through OFFSET; the final projection is applied by the caller.
    fn lower_pipeline(&mut self, sfw: &ast::Sfw) -> Result<Rel> {
        let mut rel = self.lower_from(&sfw.from)?;

        if let Some(pred) = &sfw.where_clause {
            let predicate = Box::new(self.lower_rex(pred)?);
            let (schema, props) = (rel.schema.clone(), rel.props.clone());
            rel = Rel {
                schema,
                props,
                op: RelOp::Filter {
                    input: Box::new(rel),
                    predicate,
                },
            };
        }

        if sfw.group_by.is_some() {
            return Err(BagqlError::Unsupported(
                "GROUP BY is not lowered yet".to_string(),
            ));
        }

        if let Some(set_op) = &sfw.set_op {
            let rhs = Box::new(self.lower_set_operand(&set_op.operand)?);
            let schema = rel.schema.clone();
            let lhs = Box::new(rel);
            let op = match set_op.kind {
                ast::SetOpKind::Union => RelOp::Union { lhs, rhs },
                ast::SetOpKind::Intersect => RelOp::Intersect { lhs, rhs },
                ast::SetOpKind::Except => RelOp::Except { lhs, rhs },
            };
            rel = Rel {
                schema,
                props: BTreeSet::new(),
                op,
            };
        }

        if let Some(order_by) = &sfw.order_by {
            let specs = order_by
                .specs
                .iter()
                .map(|s| self.lower_sort_spec(s))
                .collect::<Result<Vec<_>>>()?;
            let schema = rel.schema.clone();
            let mut props = rel.props.clone();
            props.insert(RelProp::Ordered);
            rel = Rel {
                schema,
                props,
                op: RelOp::Sort {
                    input: Box::new(rel),
                    specs,
                },
            };
        }

        if let Some(limit) = &sfw.limit {
            let count = Box::new(self.lower_rex(limit)?);
            let (schema, props) = (rel.schema.clone(), rel.props.clone());
            rel = Rel {
                schema,
                props,
                op: RelOp::Limit {
                    input: Box::new(rel),
                    count,
                },
            };
        }

        if let Some(offset) = &sfw.offset {
            let count = Box::new(self.lower_rex(offset)?);
            let (schema, props) = (rel.schema.clone(), rel.props.clone());
            rel = Rel {
                schema,
                props,
                op: RelOp::Offset {
                    input: Box::new(rel),
                    count,
                },
            };
        }

        Ok(rel)
    }

    fn lower_from(&mut self, from: &ast::From) -> Result<Rel> {
        match from {
            ast::From::Scan {
                expr,
                as_alias,
                at_alias,
            } => {
                let source = Box::new(self.lower_rex(expr)?);
                let value = Binding {
                    name: convert_symbol(required_alias(as_alias, "FROM source")?),
                    ty: self.types.any,
                };
                match at_alias {
                    None => Ok(Rel {
                        schema: vec![value],
                        props: BTreeSet::new(),
                        op: RelOp::Scan { source },
                    }),
                    Some(at) => {
                        let index = Binding {
                            name: convert_symbol(at),
                            ty: self.types.any,
                        };
                        let mut props = BTreeSet::new();
                        props.insert(RelProp::Ordered);
                        Ok(Rel {
                            schema: vec![value, index],
                            props,
                            op: RelOp::ScanIndexed { source },
                        })
                    }
                }
            }

            ast::From::Unpivot {
                expr,
                as_alias,
                at_alias,
            } => {
                let source = Box::new(self.lower_rex(expr)?);
                let key = Binding {
                    name: convert_symbol(required_alias(at_alias, "UNPIVOT source (AT)")?),
                    ty: self.types.any,
                };
                let value = Binding {
                    name: convert_symbol(required_alias(as_alias, "UNPIVOT source")?),
                    ty: self.types.any,
                };
                Ok(Rel {
                    schema: vec![key, value],
                    props: BTreeSet::new(),
                    op: RelOp::Unpivot { source },
                })
            }

            ast::From::Join { kind, lhs, rhs, on } => {
                let lhs = Box::new(self.lower_from(lhs)?);
                let rhs = Box::new(self.lower_from(rhs)?);
                let kind = join_kind(kind.unwrap_or(ast::JoinKind::Inner));
                // CROSS/COMMA ignore any stray condition node; a missing
                // condition on the other kinds captures no predicate (equi).
                let on = match (kind, on) {
                    (JoinKind::Cross, _) | (_, None) => None,
                    (_, Some(cond)) => Some(Box::new(self.lower_rex(cond)?)),
                };
                // The join schema is left empty; the resolution pass owns it.
                Ok(Rel {
                    schema: vec![],
                    props: BTreeSet::new(),
                    op: RelOp::Join { lhs, rhs, kind, on },
                })
            }
        }
    }

    /// Lower a set-operation operand as a full independent SFW.
    ///
    /// Its projection must have a tabular form, so only a SELECT item list is
    /// accepted here.
    fn lower_set_operand(&mut self, sfw: &ast::Sfw) -> Result<Rel> {
        let pipeline = self.lower_pipeline(sfw)?;
        match &sfw.select {
            ast::Select::Project(items) => self.project(pipeline, items),
            ast::Select::Star => Err(BagqlError::Contract(
                "SELECT * must be star-expanded before lowering".to_string(),
            )),
            ast::Select::Value(_) | ast::Select::Pivot { .. } => Err(BagqlError::Unsupported(
                "SELECT VALUE/PIVOT cannot be a set-operation operand".to_string(),
            )),
        }
    }

    fn project(&mut self, input: Rel, items: &[ast::ProjectItem]) -> Result<Rel> {
        let mut schema = Vec::with_capacity(items.len());
        let mut exprs = Vec::with_capacity(items.len());
        for item in items {
            match item {
                ast::ProjectItem::All { expr } => {
                    let rex = self.lower_rex(expr)?;
                    schema.push(Binding {
                        name: self.fresh_binding_name(),
                        ty: self.types.any,
                    });
                    exprs.push(rex);
                }
                ast::ProjectItem::Expr { expr, as_alias } => {
                    let rex = self.lower_rex(expr)?;
                    let alias = as_alias.as_ref().ok_or_else(|| {
                        BagqlError::Contract(
                            "projection item is missing its AS alias".to_string(),
                        )
                    })?;
                    schema.push(Binding {
                        name: convert_symbol(alias),
                        ty: self.types.any,
                    });
                    exprs.push(rex);
                }
            }
        }
        // Project starts from an empty props set; an upstream Ordered marker
        // does not survive it.
        Ok(Rel {
            schema,
            props: BTreeSet::new(),
            op: RelOp::Project {
                input: Box::new(input),
                exprs,
            },
        })
    }

    fn lower_sort_spec(&mut self, spec: &ast::SortSpec) -> Result<SortSpec> {
        let rex = self.lower_rex(&spec.expr)?;
        let dir = match spec.dir {
            Some(ast::SortDir::Desc) => SortDir::Desc,
            Some(ast::SortDir::Asc) | None => SortDir::Asc,
        };
        let nulls = match spec.nulls {
            Some(ast::NullOrder::First) => NullOrder::First,
            Some(ast::NullOrder::Last) => NullOrder::Last,
            None => match dir {
                SortDir::Asc => NullOrder::Last,
                SortDir::Desc => NullOrder::First,
            },
        };
        Ok(SortSpec { rex, dir, nulls })
    }

    /// Wrap a finished pipeline into the query's value, typed list when the
    /// pipeline is ordered at this point and bag otherwise.
    fn wrap_select(&self, constructor: Rex, rel: Rel) -> Rex {
        let ty = if rel.props.contains(&RelProp::Ordered) {
            self.types.list
        } else {
            self.types.bag
        };
        Rex {
            ty,
            op: RexOp::Select {
                constructor: Box::new(constructor),
                rel: Box::new(rel),
            },
        }
    }

    /// Default struct constructor for plain SELECT: field name per binding,
    /// field value a resolved positional reference into that binding's slot.
    fn default_constructor(&self, schema: &[Binding]) -> Rex {
        let fields = schema
            .iter()
            .enumerate()
            .map(|(i, binding)| StructField {
                name: Rex {
                    ty: self.types.any,
                    op: RexOp::Lit(Value::string(binding.name.text.clone())),
                },
                value: Rex {
                    ty: binding.ty,
                    op: RexOp::VarResolved(i),
                },
            })
            .collect();
        Rex {
            ty: self.types.strct,
            op: RexOp::Struct(fields),
        }
    }
}

fn join_kind(kind: ast::JoinKind) -> JoinKind {
    match kind {
        ast::JoinKind::Inner => JoinKind::Inner,
        ast::JoinKind::Left | ast::JoinKind::LeftOuter => JoinKind::Left,
        ast::JoinKind::Right | ast::JoinKind::RightOuter => JoinKind::Right,
        ast::JoinKind::Full | ast::JoinKind::FullOuter => JoinKind::Full,
        ast::JoinKind::Cross | ast::JoinKind::Comma => JoinKind::Cross,
    }
}

fn required_alias<'a>(
    alias: &'a Option<ast::Symbol>,
    what: &str,
) -> Result<&'a ast::Symbol> {
    alias.as_ref().ok_or_else(|| {
        BagqlError::Contract(format!("{what} is missing its mandatory alias"))
    })
}
