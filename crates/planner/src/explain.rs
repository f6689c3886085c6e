//! Render plan IR as human-readable multiline text.

use crate::ir::{
    Case, FnRef, Identifier, JoinKind, NullOrder, PathStep, Rel, RelOp, RelProp, Rex, RexOp,
    SortDir, Symbol,
};
use bagql_common::Value;

/// Render a root `Rex` (and any relational pipelines under it).
pub fn explain_rex(rex: &Rex) -> String {
    let mut s = String::new();
    fmt_rex(rex, 0, &mut s);
    s
}

/// Render a relational pipeline.
pub fn explain_rel(rel: &Rel) -> String {
    let mut s = String::new();
    fmt_rel(rel, 0, &mut s);
    s
}

fn fmt_rex(rex: &Rex, indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent);
    match &rex.op {
        RexOp::Select { constructor, rel } => {
            out.push_str(&format!(
                "{pad}Select constructor={}\n",
                fmt_scalar(constructor)
            ));
            fmt_rel(rel, indent + 1, out);
        }
        RexOp::Pivot { key, value, rel } => {
            out.push_str(&format!(
                "{pad}Pivot key={} value={}\n",
                fmt_scalar(key),
                fmt_scalar(value)
            ));
            fmt_rel(rel, indent + 1, out);
        }
        RexOp::CollToScalar(inner) => {
            out.push_str(&format!("{pad}CollToScalar\n"));
            fmt_rex(inner, indent + 1, out);
        }
        _ => out.push_str(&format!("{pad}{}\n", fmt_scalar(rex))),
    }
}

fn fmt_rel(rel: &Rel, indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent);
    let props = if rel.props.contains(&RelProp::Ordered) {
        " ordered"
    } else {
        ""
    };
    match &rel.op {
        RelOp::Scan { source } => {
            out.push_str(&format!(
                "{pad}Scan {} schema={}{props}\n",
                fmt_scalar(source),
                fmt_schema(rel)
            ));
        }
        RelOp::ScanIndexed { source } => {
            out.push_str(&format!(
                "{pad}ScanIndexed {} schema={}{props}\n",
                fmt_scalar(source),
                fmt_schema(rel)
            ));
        }
        RelOp::Unpivot { source } => {
            out.push_str(&format!(
                "{pad}Unpivot {} schema={}{props}\n",
                fmt_scalar(source),
                fmt_schema(rel)
            ));
        }
        RelOp::Filter { input, predicate } => {
            out.push_str(&format!("{pad}Filter {}{props}\n", fmt_scalar(predicate)));
            fmt_rel(input, indent + 1, out);
        }
        RelOp::Project { input, exprs } => {
            out.push_str(&format!("{pad}Project{props}\n"));
            for (binding, expr) in rel.schema.iter().zip(exprs) {
                out.push_str(&format!(
                    "{pad}  {} := {}\n",
                    fmt_symbol(&binding.name),
                    fmt_scalar(expr)
                ));
            }
            fmt_rel(input, indent + 1, out);
        }
        RelOp::Join { lhs, rhs, kind, on } => {
            let kind = match kind {
                JoinKind::Inner => "inner",
                JoinKind::Left => "left",
                JoinKind::Right => "right",
                JoinKind::Full => "full",
                JoinKind::Cross => "cross",
            };
            match on {
                Some(cond) => out.push_str(&format!(
                    "{pad}Join kind={kind} on={}{props}\n",
                    fmt_scalar(cond)
                )),
                None => out.push_str(&format!("{pad}Join kind={kind}{props}\n")),
            }
            fmt_rel(lhs, indent + 1, out);
            fmt_rel(rhs, indent + 1, out);
        }
        RelOp::Union { lhs, rhs } => {
            out.push_str(&format!("{pad}Union{props}\n"));
            fmt_rel(lhs, indent + 1, out);
            fmt_rel(rhs, indent + 1, out);
        }
        RelOp::Intersect { lhs, rhs } => {
            out.push_str(&format!("{pad}Intersect{props}\n"));
            fmt_rel(lhs, indent + 1, out);
            fmt_rel(rhs, indent + 1, out);
        }
        RelOp::Except { lhs, rhs } => {
            out.push_str(&format!("{pad}Except{props}\n"));
            fmt_rel(lhs, indent + 1, out);
            fmt_rel(rhs, indent + 1, out);
        }
        RelOp::Sort { input, specs } => {
            let specs = specs
                .iter()
                .map(|s| {
                    format!(
                        "{} {} nulls_{}",
                        fmt_scalar(&s.rex),
                        match s.dir {
                            SortDir::Asc => "asc",
                            SortDir::Desc => "desc",
                        },
                        match s.nulls {
                            NullOrder::First => "first",
                            NullOrder::Last => "last",
                        }
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("{pad}Sort [{specs}]{props}\n"));
            fmt_rel(input, indent + 1, out);
        }
        RelOp::Limit { input, count } => {
            out.push_str(&format!("{pad}Limit {}{props}\n", fmt_scalar(count)));
            fmt_rel(input, indent + 1, out);
        }
        RelOp::Offset { input, count } => {
            out.push_str(&format!("{pad}Offset {}{props}\n", fmt_scalar(count)));
            fmt_rel(input, indent + 1, out);
        }
        RelOp::Aggregate {
            input,
            strategy,
            groups,
            calls,
        } => {
            out.push_str(&format!(
                "{pad}Aggregate strategy={strategy:?} groups={} calls={}{props}\n",
                groups.len(),
                calls.len()
            ));
            fmt_rel(input, indent + 1, out);
        }
    }
}

/// Single-line rendering of a scalar expression. Nested query wrappers are
/// elided; use [`explain_rex`] to see inside them.
fn fmt_scalar(rex: &Rex) -> String {
    match &rex.op {
        RexOp::Lit(v) => fmt_value(v),
        RexOp::VarUnresolved { id, scope } => {
            let prefix = match scope {
                crate::ir::VarScope::Default => "",
                crate::ir::VarScope::Local => "@",
            };
            format!("{prefix}{}", fmt_identifier(id))
        }
        RexOp::VarResolved(i) => format!("${i}"),
        RexOp::Path { root, steps } => {
            let mut s = fmt_scalar(root);
            for step in steps {
                match step {
                    PathStep::Index(k) => s.push_str(&format!("[{}]", fmt_scalar(k))),
                    PathStep::Wildcard => s.push_str("[*]"),
                    PathStep::Unpivot => s.push_str(".*"),
                }
            }
            s
        }
        RexOp::Call {
            func: FnRef::Unresolved(id),
            args,
        } => {
            let args = args.iter().map(fmt_scalar).collect::<Vec<_>>().join(", ");
            format!("{}({args})", fmt_identifier(id))
        }
        RexOp::Collection(values) => {
            let values = values.iter().map(fmt_scalar).collect::<Vec<_>>().join(", ");
            format!("collection({values})")
        }
        RexOp::Struct(fields) => {
            let fields = fields
                .iter()
                .map(|f| format!("{}: {}", fmt_scalar(&f.name), fmt_scalar(&f.value)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{{fields}}}")
        }
        RexOp::Select { .. } => "(select ...)".to_string(),
        RexOp::Pivot { .. } => "(pivot ...)".to_string(),
        RexOp::CollToScalar(inner) => format!("coerce({})", fmt_scalar(inner)),
    }
}

fn fmt_value(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::Missing => "missing".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => format!("'{s}'"),
    }
}

fn fmt_identifier(id: &Identifier) -> String {
    match id {
        Identifier::Symbol(s) => fmt_symbol(s),
        Identifier::Qualified { root, steps } => {
            let mut out = fmt_symbol(root);
            for step in steps {
                out.push('.');
                out.push_str(&fmt_symbol(step));
            }
            out
        }
    }
}

fn fmt_symbol(sym: &Symbol) -> String {
    match sym.case {
        Case::Sensitive => format!("\"{}\"", sym.text),
        Case::Insensitive => sym.text.clone(),
    }
}

fn fmt_schema(rel: &Rel) -> String {
    let names = rel
        .schema
        .iter()
        .map(|b| fmt_symbol(&b.name))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{names}]")
}
