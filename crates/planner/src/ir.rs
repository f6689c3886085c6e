//! Plan IR node definitions.
//!
//! Two node families make up a plan: [`Rel`] nodes describe one stage of a
//! tabular pipeline, [`Rex`] nodes describe a scalar (possibly
//! collection-valued) computation. Both are immutable: deriving a new node
//! never mutates an existing one, and pipelines are built by wrapping.

use std::collections::BTreeSet;

use bagql_common::Value;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identifiers and types
// ---------------------------------------------------------------------------

/// Case-sensitivity of a plan identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Case {
    Sensitive,
    Insensitive,
}

/// A single plan identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    pub text: String,
    pub case: Case,
}

impl Symbol {
    pub fn new(text: impl Into<String>, case: Case) -> Self {
        Symbol {
            text: text.into(),
            case,
        }
    }
}

/// A possibly dotted plan identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identifier {
    Symbol(Symbol),
    Qualified { root: Symbol, steps: Vec<Symbol> },
}

/// Placeholder type tag carried through lowering.
///
/// A closed set of kind names. Structural detail (element types, field sets,
/// precision/scale) is an external, later concern; lowering only ever carries
/// the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeAtom {
    Any,
    Null,
    Missing,
    Bool,
    Int,
    Float,
    Decimal,
    String,
    Symbol,
    DateTime,
    Struct,
    Bag,
    List,
    Sexp,
}

/// Opaque handle to a resolved type tag.
///
/// Produced only by [`crate::env::PlannerEnv::resolve_type`]; compare handles
/// for equality, or ask the environment which atom a handle names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef(pub(crate) u32);

// ---------------------------------------------------------------------------
// Rel
// ---------------------------------------------------------------------------

/// A named, typed output column of a [`Rel`] node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub name: Symbol,
    pub ty: TypeRef,
}

/// Operator-level property of a [`Rel`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RelProp {
    /// Output sequence order is significant and must be preserved downstream.
    Ordered,
}

/// One stage of a tabular computation pipeline.
///
/// `schema` names the output columns in order; order is semantically
/// significant when [`RelProp::Ordered`] is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rel {
    pub schema: Vec<Binding>,
    pub props: BTreeSet<RelProp>,
    pub op: RelOp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RelOp {
    Scan {
        source: Box<Rex>,
    },
    /// Scan with an ordinal binding alongside the value binding.
    ScanIndexed {
        source: Box<Rex>,
    },
    /// Struct-to-rows scan producing key and value bindings.
    Unpivot {
        source: Box<Rex>,
    },
    Filter {
        input: Box<Rel>,
        predicate: Box<Rex>,
    },
    /// Projections are positionally aligned with this node's schema bindings.
    Project {
        input: Box<Rel>,
        exprs: Vec<Rex>,
    },
    Join {
        lhs: Box<Rel>,
        rhs: Box<Rel>,
        kind: JoinKind,
        /// Present for theta joins; `None` for equi and cross joins.
        on: Option<Box<Rex>>,
    },
    Union {
        lhs: Box<Rel>,
        rhs: Box<Rel>,
    },
    Intersect {
        lhs: Box<Rel>,
        rhs: Box<Rel>,
    },
    Except {
        lhs: Box<Rel>,
        rhs: Box<Rel>,
    },
    Sort {
        input: Box<Rel>,
        specs: Vec<SortSpec>,
    },
    Limit {
        input: Box<Rel>,
        count: Box<Rex>,
    },
    Offset {
        input: Box<Rel>,
        count: Box<Rex>,
    },
    /// Reserved for GROUP BY lowering. Never constructed in the current
    /// version; variant exists so downstream matches stay exhaustive when
    /// aggregation lands.
    Aggregate {
        input: Box<Rel>,
        strategy: AggStrategy,
        groups: Vec<Rex>,
        calls: Vec<Rex>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggStrategy {
    Full,
    Partial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub rex: Rex,
    pub dir: SortDir,
    pub nulls: NullOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDir {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NullOrder {
    First,
    Last,
}

// ---------------------------------------------------------------------------
// Rex
// ---------------------------------------------------------------------------

/// A scalar-value operator node.
///
/// Every node carries exactly one type reference; lowering assigns the "any"
/// placeholder wherever a precise tag is unknown at this stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rex {
    pub ty: TypeRef,
    pub op: RexOp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RexOp {
    Lit(Value),
    /// A variable whose binding site is not yet determined.
    VarUnresolved {
        id: Identifier,
        scope: VarScope,
    },
    /// Zero-based positional index into an enclosing [`Rel`]'s schema.
    /// Produced only by the synthesized default projection; external passes
    /// must not assume all variables are resolved after lowering.
    VarResolved(usize),
    Path {
        root: Box<Rex>,
        steps: Vec<PathStep>,
    },
    Call {
        func: FnRef,
        args: Vec<Rex>,
    },
    Collection(Vec<Rex>),
    Struct(Vec<StructField>),
    /// Relation to bag/list: applies `constructor` to each binding tuple.
    Select {
        constructor: Box<Rex>,
        rel: Box<Rel>,
    },
    /// Relation to struct: one field per tuple, named by `key`.
    Pivot {
        key: Box<Rex>,
        value: Box<Rex>,
        rel: Box<Rel>,
    },
    /// Coercion of a collection-valued subquery to its single element.
    /// Cardinality violation is a runtime error, not detected here.
    CollToScalar(Box<Rex>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarScope {
    Default,
    Local,
}

/// A function reference. Always unresolved at this stage; catalog resolution
/// is a later pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FnRef {
    Unresolved(Identifier),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructField {
    pub name: Rex,
    pub value: Rex,
}

/// One navigation step of a path [`Rex`].
///
/// A surface symbol step arrives here as an index-by-string-key step; a later
/// pass may reclassify a path's leading steps as direct bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathStep {
    Index(Rex),
    Wildcard,
    Unpivot,
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

/// A lowered plan statement, handed to external resolution/optimization/
/// evaluation stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Query { root: Rex },
}
