//! Normalized AST node definitions for the bagql surface language.
//!
//! These nodes are the input contract of the planner's lowering phase. They
//! are produced by the parser and the normalization pass (alias synthesis,
//! star-expansion), which live outside this repository.
//!
//! Normalization guarantees consumers may rely on:
//! - every FROM source carries an explicit AS-alias;
//! - `SELECT *` has been expanded into explicit projection items;
//! - named projection items always carry an AS-alias.

use bagql_common::Value;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identifiers and coarse static types
// ---------------------------------------------------------------------------

/// Case-sensitivity of an identifier as written in query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Case {
    Sensitive,
    Insensitive,
}

/// A single identifier token.
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

    /// Double-quoted identifier.
    pub fn sensitive(text: impl Into<String>) -> Self {
        Symbol::new(text, Case::Sensitive)
    }

    /// Unquoted identifier.
    pub fn insensitive(text: impl Into<String>) -> Self {
        Symbol::new(text, Case::Insensitive)
    }
}

/// A possibly dotted identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identifier {
    Symbol(Symbol),
    Qualified { root: Symbol, steps: Vec<Symbol> },
}

impl Identifier {
    pub fn symbol(text: impl Into<String>, case: Case) -> Self {
        Identifier::Symbol(Symbol::new(text, case))
    }
}

/// Coarse static type, as produced by the external type-inference pass.
///
/// Structural detail (precisions, lengths, element/field types) is carried
/// here but discarded by the planner's type bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaticType {
    Any,
    Null,
    Missing,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal {
        precision: Option<u32>,
        scale: Option<u32>,
    },
    Varchar(Option<u32>),
    String,
    Symbol,
    DateTime,
    Struct,
    Bag,
    List,
    Sexp,
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

/// A top-level statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Query(Expr),
    Ddl(Ddl),
    Exec { name: Symbol, args: Vec<Expr> },
}

/// Data-definition statements. Parsed but not lowered in the current version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Ddl {
    CreateTable { name: Symbol },
    DropTable { name: Symbol },
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

/// Variable lookup scope: `@x` forces local bindings first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    Default,
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Pos,
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Plus,
    Minus,
    Times,
    Divide,
    Modulo,
    Concat,
    And,
    Or,
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// Source collection constructor kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    Bag,
    List,
    Sexp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Lit(Value),
    Var {
        id: Identifier,
        scope: Scope,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Path {
        root: Box<Expr>,
        steps: Vec<PathStep>,
    },
    Call {
        func: Identifier,
        args: Vec<Expr>,
    },
    Collection {
        kind: CollectionKind,
        values: Vec<Expr>,
    },
    Struct(Vec<StructField>),
    Sfw(Box<Sfw>),
    /// Dynamic statement parameter (`?`). No lowering rule yet.
    Parameter(usize),
}

impl Expr {
    pub fn var(id: Identifier) -> Self {
        Expr::Var {
            id,
            scope: Scope::Default,
        }
    }
}

/// One struct-constructor field: `name : value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructField {
    pub name: Expr,
    pub value: Expr,
}

/// One navigation step of a path expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathStep {
    /// `.name` or `."name"`.
    Symbol(Symbol),
    /// `[expr]`.
    Index(Expr),
    /// `[*]`.
    Wildcard,
    /// `.*`.
    Unpivot,
}

// ---------------------------------------------------------------------------
// SELECT-FROM-WHERE
// ---------------------------------------------------------------------------

/// A SELECT-FROM-WHERE query body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sfw {
    pub select: Select,
    pub from: From,
    pub where_clause: Option<Expr>,
    pub group_by: Option<GroupBy>,
    pub set_op: Option<SetOp>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
}

/// The projection clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Select {
    Project(Vec<ProjectItem>),
    /// `SELECT *`. Must be expanded away by normalization before lowering.
    Star,
    Value(Box<Expr>),
    Pivot { key: Box<Expr>, value: Box<Expr> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProjectItem {
    /// `expr.*`: projects all of the expression's bindings.
    All { expr: Expr },
    /// `expr AS alias`: the alias is mandatory after normalization.
    Expr {
        expr: Expr,
        as_alias: Option<Symbol>,
    },
}

/// A FROM source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum From {
    Scan {
        expr: Expr,
        as_alias: Option<Symbol>,
        at_alias: Option<Symbol>,
    },
    Unpivot {
        expr: Expr,
        as_alias: Option<Symbol>,
        at_alias: Option<Symbol>,
    },
    Join {
        kind: Option<JoinKind>,
        lhs: Box<From>,
        rhs: Box<From>,
        on: Option<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    Left,
    LeftOuter,
    Right,
    RightOuter,
    Full,
    FullOuter,
    Cross,
    Comma,
}

/// GROUP BY clause. Carried structurally; lowering rejects it until the
/// reserved aggregation operator is implemented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBy {
    pub keys: Vec<GroupKey>,
    pub group_as: Option<Symbol>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupKey {
    pub expr: Expr,
    pub as_alias: Option<Symbol>,
}

/// A trailing set operation: `<sfw> UNION <operand>` and friends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetOp {
    pub kind: SetOpKind,
    pub operand: Box<Sfw>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetOpKind {
    Union,
    Intersect,
    Except,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub specs: Vec<SortSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub expr: Expr,
    pub dir: Option<SortDir>,
    pub nulls: Option<NullOrder>,
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
