use std::fmt;

use crate::token::Literal;

/// A dynamically typed runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
}

impl Value {
    /// Only `nil` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }
}

/// Values of different kinds are never equal. Numbers follow IEEE-754, so
/// `NaN` is not equal to itself.
pub fn is_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Nil, Value::Nil) => true,
        (Value::Bool(left), Value::Bool(right)) => left == right,
        (Value::Number(left), Value::Number(right)) => left == right,
        (Value::String(left), Value::String(right)) => left == right,
        _ => false,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        is_equal(self, other)
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Number(number) => Value::Number(number),
            Literal::String(string) => Value::String(string),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(boolean) => write!(f, "{}", boolean),
            Value::Number(number) => write_number(f, *number),
            Value::String(string) => f.write_str(string),
        }
    }
}

/// Shortest round-trip digits. Decimal exponents below -4 or from 6 upward
/// switch to exponent form with a signed, two-digit exponent (`1e+06`,
/// `1.5e-07`).
fn write_number(f: &mut fmt::Formatter<'_>, number: f64) -> fmt::Result {
    if number.is_nan() {
        return f.write_str("NaN");
    }
    if number.is_infinite() {
        return f.write_str(if number > 0.0 { "+Inf" } else { "-Inf" });
    }
    if number == 0.0 {
        return write!(f, "{}", number);
    }

    let scientific = format!("{:e}", number);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if (-4..6).contains(&exponent) {
        write!(f, "{}", number)
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::String(String::new()).is_truthy());
    }

    #[test]
    fn equality_requires_same_kind() {
        assert!(is_equal(&Value::Nil, &Value::Nil));
        assert!(!is_equal(&Value::Nil, &Value::Bool(false)));
        assert!(!is_equal(&Value::Number(1.0), &Value::String("1".into())));
        assert!(is_equal(&Value::String("a".into()), &Value::String("a".into())));
        assert!(!is_equal(&Value::Number(f64::NAN), &Value::Number(f64::NAN)));
    }

    #[test]
    fn string_form() {
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::String("hi".into()).to_string(), "hi");
    }

    #[test]
    fn large_and_small_numbers_use_exponent_form() {
        let shown = |number: f64| Value::Number(number).to_string();

        assert_eq!(shown(100000.0), "100000");
        assert_eq!(shown(123456.5), "123456.5");
        assert_eq!(shown(0.0001), "0.0001");
        assert_eq!(shown(-0.0), "-0");

        assert_eq!(shown(1e6), "1e+06");
        assert_eq!(shown(1234567.0), "1.234567e+06");
        assert_eq!(shown(1e21), "1e+21");
        assert_eq!(shown(-2.5e100), "-2.5e+100");
        assert_eq!(shown(0.00001), "1e-05");
        assert_eq!(shown(1.5e-7), "1.5e-07");

        assert_eq!(shown(f64::INFINITY), "+Inf");
        assert_eq!(shown(f64::NEG_INFINITY), "-Inf");
        assert_eq!(shown(f64::NAN), "NaN");
    }
}
