//! Parenthesized rendering of syntax trees, used for `--dump-ast` and tests.

use crate::ast::{Expr, Stmt};

pub fn print_expr(expr: &Expr) -> String {
    match expr {
        Expr::Literal(literal) => literal.value.to_string(),
        Expr::Grouping(grouping) => parenthesize("group", &[&*grouping.expr]),
        Expr::Unary(unary) => parenthesize(&unary.operator.lexeme, &[&*unary.expr]),
        Expr::Var(var_expr) => var_expr.ident.lexeme.clone(),
        Expr::Assign(assign) => {
            format!("(= {} {})", assign.ident.lexeme, print_expr(&assign.value))
        }
        Expr::Binary(binary) => {
            parenthesize(&binary.operator.lexeme, &[&*binary.left, &*binary.right])
        }
    }
}

pub fn print_stmt(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Expr(expr_stmt) => parenthesize(";", &[&expr_stmt.expr]),
        Stmt::Print(print_stmt) => parenthesize("print", &[&print_stmt.expr]),
        Stmt::VarDecl(var_decl) => match &var_decl.init {
            Some(init) => format!("(var {} {})", var_decl.ident.lexeme, print_expr(init)),
            None => format!("(var {})", var_decl.ident.lexeme),
        },
        Stmt::Block(block) => {
            let mut out = String::from("(block");
            for stmt in &block.stmts {
                out.push(' ');
                out.push_str(&print_stmt(stmt));
            }
            out.push(')');
            out
        }
    }
}

fn parenthesize(name: &str, exprs: &[&Expr]) -> String {
    let mut out = format!("({}", name);
    for expr in exprs {
        out.push(' ');
        out.push_str(&print_expr(expr));
    }
    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{BinaryExpr, BinaryOp, GroupingExpr, LiteralExpr, UnaryExpr, UnaryOp},
        token::{Token, TokenKind},
        value::Value,
    };

    fn number(value: f64) -> Expr {
        LiteralExpr {
            value: Value::Number(value),
        }
        .into()
    }

    #[test]
    fn hand_built_tree() {
        let expr: Expr = BinaryExpr {
            op: BinaryOp::Multiply,
            operator: Token::new(TokenKind::Star, "*", None, 1),
            left: Box::new(
                UnaryExpr {
                    op: UnaryOp::Negate,
                    operator: Token::new(TokenKind::Minus, "-", None, 1),
                    expr: Box::new(number(123.0)),
                }
                .into(),
            ),
            right: Box::new(
                GroupingExpr {
                    expr: Box::new(number(45.67)),
                }
                .into(),
            ),
        }
        .into();

        assert_eq!(print_expr(&expr), "(* (- 123) (group 45.67))");
    }

    #[test]
    fn literals() {
        assert_eq!(print_expr(&LiteralExpr { value: Value::Nil }.into()), "nil");
        assert_eq!(
            print_expr(&LiteralExpr { value: Value::Bool(false) }.into()),
            "false"
        );
        assert_eq!(
            print_expr(&LiteralExpr { value: Value::String("s".into()) }.into()),
            "s"
        );
    }
}
