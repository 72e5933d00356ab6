use std::io::{self, Write};

use tracing::{debug, trace};

use crate::{
    ast::{self, BinaryOp, UnaryOp},
    common::RuntimeError,
    environment::Environment,
    token::Token,
    value::{is_equal, Value},
};

/// Executes statements against one environment that lives as long as the
/// interpreter, so bindings persist across calls to [`Interpreter::interpret`].
#[derive(Debug)]
pub struct Interpreter<W: Write = io::Stdout> {
    environment: Environment,
    out: W,
}

impl Interpreter<io::Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(out: W) -> Self {
        Interpreter {
            environment: Environment::new(),
            out,
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Runs `stmts` in order and stops at the first runtime error.
    pub fn interpret(&mut self, stmts: &[ast::Stmt]) -> Result<(), RuntimeError> {
        debug!(statements = stmts.len(), "interpreting");
        for stmt in stmts {
            self.interpret_stmt(stmt)?;
        }
        Ok(())
    }

    fn interpret_stmt(&mut self, stmt: &ast::Stmt) -> Result<(), RuntimeError> {
        match stmt {
            ast::Stmt::Expr(expr_stmt) => {
                self.interpret_expr(&expr_stmt.expr)?;
            }
            ast::Stmt::Print(print_stmt) => {
                let value = self.interpret_expr(&print_stmt.expr)?;
                writeln!(self.out, "{}", value).map_err(|err| RuntimeError::Output {
                    message: err.to_string(),
                    line: print_stmt.keyword.line,
                })?;
            }
            ast::Stmt::VarDecl(var_decl) => {
                let value = match &var_decl.init {
                    Some(init) => self.interpret_expr(init)?,
                    None => Value::Nil,
                };
                self.environment.define(var_decl.ident.lexeme.clone(), value);
            }
            ast::Stmt::Block(block) => self.interpret_block(block)?,
        }

        Ok(())
    }

    fn interpret_block(&mut self, block: &ast::Block) -> Result<(), RuntimeError> {
        self.environment.nest();
        trace!(depth = self.environment.depth(), "entered block");

        let result = block
            .stmts
            .iter()
            .try_for_each(|stmt| self.interpret_stmt(stmt));

        // restored on the error path too
        self.environment.unnest();
        trace!(depth = self.environment.depth(), "left block");

        result
    }

    fn interpret_expr(&mut self, expr: &ast::Expr) -> Result<Value, RuntimeError> {
        match expr {
            ast::Expr::Literal(literal) => Ok(literal.value.clone()),
            ast::Expr::Grouping(grouping) => self.interpret_expr(&grouping.expr),
            ast::Expr::Var(var_expr) => self.environment.get(&var_expr.ident).cloned(),
            ast::Expr::Assign(assign) => {
                let value = self.interpret_expr(&assign.value)?;
                self.environment.assign(&assign.ident, value.clone())?;
                Ok(value)
            }
            ast::Expr::Unary(unary) => {
                let operand = self.interpret_expr(&unary.expr)?;
                match unary.op {
                    UnaryOp::Negate => match operand {
                        Value::Number(number) => Ok(Value::Number(-number)),
                        _ => Err(type_error(&unary.operator, "Operand must be a number.")),
                    },
                    UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
                }
            }
            ast::Expr::Binary(binary) => {
                let left = self.interpret_expr(&binary.left)?;
                let right = self.interpret_expr(&binary.right)?;
                interpret_binary(binary.op, &binary.operator, left, right)
            }
        }
    }
}

fn interpret_binary(
    op: BinaryOp,
    operator: &Token,
    left: Value,
    right: Value,
) -> Result<Value, RuntimeError> {
    match op {
        BinaryOp::Equal => Ok(Value::Bool(is_equal(&left, &right))),
        BinaryOp::NotEqual => Ok(Value::Bool(!is_equal(&left, &right))),
        BinaryOp::Add => match (left, right) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
            (Value::String(l), Value::String(r)) => Ok(Value::String(l + &r)),
            _ => Err(type_error(
                operator,
                "Operands must be two numbers or two strings.",
            )),
        },
        BinaryOp::Subtract => {
            let (l, r) = number_operands(operator, left, right)?;
            Ok(Value::Number(l - r))
        }
        BinaryOp::Multiply => {
            let (l, r) = number_operands(operator, left, right)?;
            Ok(Value::Number(l * r))
        }
        BinaryOp::Divide => {
            let (l, r) = number_operands(operator, left, right)?;
            if r == 0.0 {
                return Err(RuntimeError::DivisionByZero {
                    operator: operator.clone(),
                });
            }
            Ok(Value::Number(l / r))
        }
        BinaryOp::Greater => {
            let (l, r) = number_operands(operator, left, right)?;
            Ok(Value::Bool(l > r))
        }
        BinaryOp::GreaterEqual => {
            let (l, r) = number_operands(operator, left, right)?;
            Ok(Value::Bool(l >= r))
        }
        BinaryOp::Less => {
            let (l, r) = number_operands(operator, left, right)?;
            Ok(Value::Bool(l < r))
        }
        BinaryOp::LessEqual => {
            let (l, r) = number_operands(operator, left, right)?;
            Ok(Value::Bool(l <= r))
        }
    }
}

fn number_operands(operator: &Token, left: Value, right: Value) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok((l, r)),
        _ => Err(type_error(operator, "Operands must be numbers.")),
    }
}

fn type_error(operator: &Token, message: &'static str) -> RuntimeError {
    RuntimeError::Type {
        operator: operator.clone(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::scan, parser::parse};
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> (String, Result<(), RuntimeError>) {
        let (tokens, lex_errors) = scan(source);
        assert!(lex_errors.is_empty(), "unexpected lex errors: {:?}", lex_errors);
        let (stmts, errors) = parse(&tokens);
        assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);

        let mut interpreter = Interpreter::with_output(Vec::new());
        let result = interpreter.interpret(&stmts);
        let output = String::from_utf8(interpreter.into_output()).unwrap();
        (output, result)
    }

    fn output_of(source: &str) -> String {
        let (output, result) = run(source);
        assert_eq!(result, Ok(()));
        output
    }

    fn error_of(source: &str) -> String {
        run(source).1.unwrap_err().to_string()
    }

    #[test]
    fn arithmetic() {
        assert_eq!(output_of("print 1 + 2 * 3;"), "7\n");
        assert_eq!(output_of("print (1 + 2) * 3;"), "9\n");
        assert_eq!(output_of("print 7 / 2;"), "3.5\n");
        assert_eq!(output_of("print -(3 - 5);"), "2\n");
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(output_of("print \"hello\" + \"world\";"), "helloworld\n");
    }

    #[test]
    fn comparison_and_equality() {
        assert_eq!(
            output_of("print 1 < 2; print 2 <= 1; print 3 > 3; print 3 >= 3;"),
            "true\nfalse\nfalse\ntrue\n"
        );
        assert_eq!(
            output_of("print 1 == 1; print 1 == \"1\"; print nil == nil; print nil != false;"),
            "true\nfalse\ntrue\ntrue\n"
        );
        assert_eq!(output_of("print \"a\" == \"a\";"), "true\n");
    }

    #[test]
    fn logical_not_uses_truthiness() {
        assert_eq!(
            output_of("print !nil; print !false; print !0; print !\"\";"),
            "true\ntrue\nfalse\nfalse\n"
        );
    }

    #[test]
    fn mixed_addition_is_a_type_error() {
        assert_eq!(
            error_of("1 + \"a\";"),
            "Operands must be two numbers or two strings.\n[line 1]"
        );
    }

    #[test]
    fn numeric_operators_need_numbers() {
        assert_eq!(error_of("\"a\" * 2;"), "Operands must be numbers.\n[line 1]");
        assert_eq!(error_of("\ntrue < 1;"), "Operands must be numbers.\n[line 2]");
        assert_eq!(error_of("-\"a\";"), "Operand must be a number.\n[line 1]");
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let (_, result) = run("5 / 0;");
        assert!(matches!(result, Err(RuntimeError::DivisionByZero { .. })));
        assert_eq!(error_of("5 / 0;"), "Division by zero.\n[line 1]");

        let (_, result) = run("5 / -0;");
        assert!(matches!(result, Err(RuntimeError::DivisionByZero { .. })));
        assert_eq!(output_of("print 0 / 5;"), "0\n");
    }

    #[test]
    fn variables_and_assignment() {
        assert_eq!(output_of("var a; print a;"), "nil\n");
        assert_eq!(output_of("var a = 1; a = a + 1; print a;"), "2\n");
        assert_eq!(output_of("var a; var b; a = b = 3; print a; print b;"), "3\n3\n");
        assert_eq!(output_of("var a = 1; print a = 5;"), "5\n");
    }

    #[test]
    fn block_shadowing_does_not_leak() {
        assert_eq!(output_of("var x = 1; { var x = 2; } print x;"), "1\n");
        assert_eq!(
            output_of("var x = 1; { var x = 2; { x = 3; print x; } print x; } print x;"),
            "3\n3\n1\n"
        );
        assert_eq!(output_of("var x = 1; { x = 2; } print x;"), "2\n");
    }

    #[test]
    fn undefined_variable() {
        assert_eq!(error_of("\n\nprint y;"), "Undefined variable 'y'.\n[line 3]");
        assert_eq!(error_of("y = 1;"), "Undefined variable 'y'.\n[line 1]");
        assert_eq!(error_of("{ var y = 1; } print y;"), "Undefined variable 'y'.\n[line 1]");
    }

    #[test]
    fn first_error_stops_execution() {
        let (output, result) = run("print 1; print nope; print 2;");
        assert_eq!(output, "1\n");
        assert!(result.is_err());
    }

    #[test]
    fn environment_is_restored_after_failing_block() {
        let (tokens, _) = scan("var x = 1; { var x = 2; print nope; }");
        let (stmts, _) = parse(&tokens);

        let mut interpreter = Interpreter::with_output(Vec::new());
        assert!(interpreter.interpret(&stmts).is_err());
        assert_eq!(interpreter.environment().depth(), 1);

        let (tokens, _) = scan("print x;");
        let (stmts, _) = parse(&tokens);
        interpreter.interpret(&stmts).unwrap();
        assert_eq!(interpreter.output().as_slice(), b"1\n");
    }
}
