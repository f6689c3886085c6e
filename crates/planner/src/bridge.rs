//! AST-to-plan identifier and type conversion.
//!
//! Total functions over their input domains; no conversion here can fail.

use bagql_ast as ast;

use crate::ir::{Case, Identifier, Symbol, TypeAtom};

/// Structural copy of an AST symbol, preserving case-sensitivity.
pub fn convert_symbol(sym: &ast::Symbol) -> Symbol {
    Symbol {
        text: sym.text.clone(),
        case: convert_case(sym.case),
    }
}

/// Structural copy of an AST identifier.
pub fn convert_identifier(id: &ast::Identifier) -> Identifier {
    match id {
        ast::Identifier::Symbol(s) => Identifier::Symbol(convert_symbol(s)),
        ast::Identifier::Qualified { root, steps } => Identifier::Qualified {
            root: convert_symbol(root),
            steps: steps.iter().map(convert_symbol).collect(),
        },
    }
}

pub fn convert_case(case: ast::Case) -> Case {
    match case {
        ast::Case::Sensitive => Case::Sensitive,
        ast::Case::Insensitive => Case::Insensitive,
    }
}

/// Map a coarse static type to its kind tag.
///
/// Lossy by design: precisions, lengths, and element/field detail are
/// discarded, and a later pass reconstructs structural types.
pub fn convert_type(ty: ast::StaticType) -> TypeAtom {
    match ty {
        ast::StaticType::Any => TypeAtom::Any,
        ast::StaticType::Null => TypeAtom::Null,
        ast::StaticType::Missing => TypeAtom::Missing,
        ast::StaticType::Bool => TypeAtom::Bool,
        ast::StaticType::Int8
        | ast::StaticType::Int16
        | ast::StaticType::Int32
        | ast::StaticType::Int64 => TypeAtom::Int,
        ast::StaticType::Float32 | ast::StaticType::Float64 => TypeAtom::Float,
        ast::StaticType::Decimal { .. } => TypeAtom::Decimal,
        ast::StaticType::Varchar(_) | ast::StaticType::String => TypeAtom::String,
        ast::StaticType::Symbol => TypeAtom::Symbol,
        ast::StaticType::DateTime => TypeAtom::DateTime,
        ast::StaticType::Struct => TypeAtom::Struct,
        ast::StaticType::Bag => TypeAtom::Bag,
        ast::StaticType::List => TypeAtom::List,
        ast::StaticType::Sexp => TypeAtom::Sexp,
    }
}
