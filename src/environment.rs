use std::collections::HashMap;

use crate::{common::RuntimeError, token::Token, value::Value};

/// The scope chain, kept as a stack of frames. Frame 0 is the global scope
/// and is never popped; each block pushes a frame on entry and pops it on
/// exit.
#[derive(Debug, Clone)]
pub struct Environment {
    stack: Vec<HashMap<String, Value>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            stack: vec![HashMap::new()],
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn nest(&mut self) {
        self.stack.push(HashMap::new());
    }

    pub fn unnest(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Binds `name` in the innermost scope, replacing any previous binding
    /// there. Outer scopes are never touched.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        if let Some(current_scope) = self.stack.last_mut() {
            current_scope.insert(name.into(), value);
        }
    }

    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        for scope in self.stack.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(&name.lexeme) {
                *slot = value;
                return Ok(());
            }
        }

        Err(RuntimeError::UndefinedVariable { name: name.clone() })
    }

    pub fn get(&self, name: &Token) -> Result<&Value, RuntimeError> {
        self.stack
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name.lexeme))
            .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn ident(name: &str) -> Token {
        Token::new(TokenKind::Ident, name, None, 1)
    }

    #[test]
    fn define_then_get() {
        let mut env = Environment::new();
        env.define("a", Value::Number(1.0));
        assert_eq!(env.get(&ident("a")), Ok(&Value::Number(1.0)));

        env.define("a", Value::Bool(true));
        assert_eq!(env.get(&ident("a")), Ok(&Value::Bool(true)));
    }

    #[test]
    fn missing_name_is_undefined() {
        let env = Environment::new();
        let err = env.get(&ident("nope")).unwrap_err();
        assert_eq!(err.to_string(), "Undefined variable 'nope'.\n[line 1]");
    }

    #[test]
    fn assign_never_creates_a_binding() {
        let mut env = Environment::new();
        assert!(env.assign(&ident("a"), Value::Nil).is_err());
        assert!(env.get(&ident("a")).is_err());
    }

    #[test]
    fn shadowing_does_not_touch_outer_scope() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));

        env.nest();
        env.define("x", Value::Number(2.0));
        assert_eq!(env.get(&ident("x")), Ok(&Value::Number(2.0)));
        env.unnest();

        assert_eq!(env.get(&ident("x")), Ok(&Value::Number(1.0)));
    }

    #[test]
    fn assign_updates_nearest_enclosing_binding() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));

        env.nest();
        env.assign(&ident("x"), Value::Number(5.0)).unwrap();
        assert_eq!(env.depth(), 2);
        env.unnest();

        assert_eq!(env.get(&ident("x")), Ok(&Value::Number(5.0)));
    }

    #[test]
    fn global_scope_is_never_popped() {
        let mut env = Environment::new();
        env.define("g", Value::Nil);
        env.unnest();
        assert_eq!(env.depth(), 1);
        assert!(env.get(&ident("g")).is_ok());
    }
}
