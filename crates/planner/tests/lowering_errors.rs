use bagql_ast as ast;
use bagql_common::BagqlError;
use bagql_planner::{lower, TypeRegistry};

fn var(name: &str) -> ast::Expr {
    ast::Expr::var(ast::Identifier::symbol(name, ast::Case::Insensitive))
}

fn sfw(select: ast::Select) -> ast::Sfw {
    ast::Sfw {
        select,
        from: ast::From::Scan {
            expr: var("t"),
            as_alias: Some(ast::Symbol::insensitive("t1")),
            at_alias: None,
        },
        where_clause: None,
        group_by: None,
        set_op: None,
        order_by: None,
        limit: None,
        offset: None,
    }
}

#[test]
fn non_query_statements_are_unsupported() {
    let env = TypeRegistry::new();

    let ddl = ast::Statement::Ddl(ast::Ddl::DropTable {
        name: ast::Symbol::insensitive("t"),
    });
    let err = lower(&ddl, &env).unwrap_err();
    assert!(matches!(err, BagqlError::Unsupported(_)), "got {err:?}");

    let exec = ast::Statement::Exec {
        name: ast::Symbol::insensitive("proc"),
        args: vec![],
    };
    let err = lower(&exec, &env).unwrap_err();
    assert!(matches!(err, BagqlError::Unsupported(_)), "got {err:?}");
}

#[test]
fn group_by_is_a_reserved_extension() {
    let mut body = sfw(ast::Select::Value(Box::new(var("t1"))));
    body.group_by = Some(ast::GroupBy {
        keys: vec![ast::GroupKey {
            expr: var("a"),
            as_alias: Some(ast::Symbol::insensitive("a")),
        }],
        group_as: None,
    });
    let err = lower(
        &ast::Statement::Query(ast::Expr::Sfw(Box::new(body))),
        &TypeRegistry::new(),
    )
    .unwrap_err();
    assert!(matches!(err, BagqlError::Unsupported(_)), "got {err:?}");
}

#[test]
fn select_value_set_operand_is_unsupported() {
    let mut body = sfw(ast::Select::Project(vec![ast::ProjectItem::Expr {
        expr: var("a"),
        as_alias: Some(ast::Symbol::insensitive("a")),
    }]));
    body.set_op = Some(ast::SetOp {
        kind: ast::SetOpKind::Union,
        operand: Box::new(sfw(ast::Select::Value(Box::new(var("t1"))))),
    });
    let err = lower(
        &ast::Statement::Query(ast::Expr::Sfw(Box::new(body))),
        &TypeRegistry::new(),
    )
    .unwrap_err();
    assert!(matches!(err, BagqlError::Unsupported(_)), "got {err:?}");
}

#[test]
fn failures_abort_the_whole_statement() {
    // The unsupported construct sits deep in the WHERE clause; no partial
    // plan comes back.
    let mut body = sfw(ast::Select::Value(Box::new(var("t1"))));
    body.where_clause = Some(ast::Expr::Binary {
        op: ast::BinaryOp::And,
        lhs: Box::new(var("p")),
        rhs: Box::new(ast::Expr::Parameter(0)),
    });
    let result = lower(
        &ast::Statement::Query(ast::Expr::Sfw(Box::new(body))),
        &TypeRegistry::new(),
    );
    assert!(result.is_err());
}
