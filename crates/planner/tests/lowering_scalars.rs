use bagql_ast as ast;
use bagql_common::{BagqlError, Value};
use bagql_planner::{
    lower, FnRef, Identifier, PathStep, RexOp, Statement, TypeAtom, TypeRegistry, VarScope,
};

fn var(name: &str) -> ast::Expr {
    ast::Expr::var(ast::Identifier::symbol(name, ast::Case::Insensitive))
}

fn scalar_query(expr: ast::Expr) -> ast::Statement {
    ast::Statement::Query(expr)
}

fn root(statement: &ast::Statement, env: &TypeRegistry) -> bagql_planner::Rex {
    match lower(statement, env).expect("lowering failed") {
        Statement::Query { root } => root,
    }
}

fn call_name(rex: &bagql_planner::Rex) -> &str {
    match &rex.op {
        RexOp::Call {
            func: FnRef::Unresolved(Identifier::Symbol(sym)),
            ..
        } => &sym.text,
        other => panic!("expected call with symbol function ref, got {other:?}"),
    }
}

#[test]
fn operators_lower_to_lowercased_calls() {
    let env = TypeRegistry::new();

    let plus = root(
        &scalar_query(ast::Expr::Binary {
            op: ast::BinaryOp::Plus,
            lhs: Box::new(ast::Expr::Lit(Value::Int(1))),
            rhs: Box::new(ast::Expr::Lit(Value::Int(2))),
        }),
        &env,
    );
    assert_eq!(call_name(&plus), "plus");
    match &plus.op {
        RexOp::Call { args, .. } => {
            assert_eq!(args[0].op, RexOp::Lit(Value::Int(1)));
            assert_eq!(args[1].op, RexOp::Lit(Value::Int(2)));
        }
        _ => unreachable!(),
    }

    let eq = root(
        &scalar_query(ast::Expr::Binary {
            op: ast::BinaryOp::Eq,
            lhs: Box::new(var("a")),
            rhs: Box::new(var("b")),
        }),
        &env,
    );
    assert_eq!(call_name(&eq), "eq");

    let not = root(
        &scalar_query(ast::Expr::Unary {
            op: ast::UnaryOp::Not,
            expr: Box::new(var("x")),
        }),
        &env,
    );
    assert_eq!(call_name(&not), "not");
}

#[test]
fn path_symbol_steps_become_string_key_indexes() {
    // a.b[0][*].*
    let env = TypeRegistry::new();
    let path = root(
        &scalar_query(ast::Expr::Path {
            root: Box::new(var("a")),
            steps: vec![
                ast::PathStep::Symbol(ast::Symbol::insensitive("b")),
                ast::PathStep::Index(ast::Expr::Lit(Value::Int(0))),
                ast::PathStep::Wildcard,
                ast::PathStep::Unpivot,
            ],
        }),
        &env,
    );
    let steps = match &path.op {
        RexOp::Path { steps, .. } => steps,
        other => panic!("expected path, got {other:?}"),
    };
    match &steps[0] {
        PathStep::Index(key) => assert_eq!(key.op, RexOp::Lit(Value::string("b"))),
        other => panic!("expected string-key index step, got {other:?}"),
    }
    match &steps[1] {
        PathStep::Index(key) => assert_eq!(key.op, RexOp::Lit(Value::Int(0))),
        other => panic!("expected index step, got {other:?}"),
    }
    assert!(matches!(steps[2], PathStep::Wildcard));
    assert!(matches!(steps[3], PathStep::Unpivot));
}

#[test]
fn container_constructors_carry_their_kind_tags() {
    let env = TypeRegistry::new();
    for (kind, atom) in [
        (ast::CollectionKind::Bag, TypeAtom::Bag),
        (ast::CollectionKind::List, TypeAtom::List),
        (ast::CollectionKind::Sexp, TypeAtom::Sexp),
    ] {
        let rex = root(
            &scalar_query(ast::Expr::Collection {
                kind,
                values: vec![ast::Expr::Lit(Value::Int(1))],
            }),
            &env,
        );
        assert_eq!(env.atom_of(rex.ty), Some(atom), "for {kind:?}");
    }

    let strct = root(
        &scalar_query(ast::Expr::Struct(vec![ast::StructField {
            name: ast::Expr::Lit(Value::string("k")),
            value: ast::Expr::Lit(Value::Int(1)),
        }])),
        &env,
    );
    assert_eq!(env.atom_of(strct.ty), Some(TypeAtom::Struct));
}

#[test]
fn scalars_default_to_the_any_tag() {
    let env = TypeRegistry::new();
    for expr in [
        ast::Expr::Lit(Value::Null),
        var("a"),
        ast::Expr::Call {
            func: ast::Identifier::symbol("f", ast::Case::Insensitive),
            args: vec![],
        },
    ] {
        let rex = root(&scalar_query(expr), &env);
        assert_eq!(env.atom_of(rex.ty), Some(TypeAtom::Any));
    }
}

#[test]
fn local_scope_is_preserved() {
    let env = TypeRegistry::new();
    let rex = root(
        &scalar_query(ast::Expr::Var {
            id: ast::Identifier::symbol("x", ast::Case::Insensitive),
            scope: ast::Scope::Local,
        }),
        &env,
    );
    match &rex.op {
        RexOp::VarUnresolved { scope, .. } => assert_eq!(*scope, VarScope::Local),
        other => panic!("expected unresolved var, got {other:?}"),
    }
}

#[test]
fn nested_subquery_in_scalar_position_is_coerced() {
    // x = (SELECT VALUE v FROM t AS v): the right operand collapses to a
    // scalar; the top-level query itself is never wrapped.
    let subquery = ast::Expr::Sfw(Box::new(ast::Sfw {
        select: ast::Select::Value(Box::new(var("v"))),
        from: ast::From::Scan {
            expr: var("t"),
            as_alias: Some(ast::Symbol::insensitive("v")),
            at_alias: None,
        },
        where_clause: None,
        group_by: None,
        set_op: None,
        order_by: None,
        limit: None,
        offset: None,
    }));

    let env = TypeRegistry::new();
    let cmp = root(
        &scalar_query(ast::Expr::Binary {
            op: ast::BinaryOp::Eq,
            lhs: Box::new(var("x")),
            rhs: Box::new(subquery.clone()),
        }),
        &env,
    );
    match &cmp.op {
        RexOp::Call { args, .. } => match &args[1].op {
            RexOp::CollToScalar(inner) => {
                assert!(matches!(inner.op, RexOp::Select { .. }))
            }
            other => panic!("expected coercion wrapper, got {other:?}"),
        },
        other => panic!("expected call, got {other:?}"),
    }

    // Top-level SFW: relational lowering directly, no coercion wrapper.
    let top = root(&ast::Statement::Query(subquery), &env);
    assert!(matches!(top.op, RexOp::Select { .. }));
}

#[test]
fn dynamic_parameters_are_unsupported() {
    let err = lower(
        &scalar_query(ast::Expr::Parameter(0)),
        &TypeRegistry::new(),
    )
    .unwrap_err();
    assert!(matches!(err, BagqlError::Unsupported(_)), "got {err:?}");
}
