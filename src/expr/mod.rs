//! Condition language for key/value rules.
//!
//! Expressions are compiled once, when a rule source is parsed, and evaluated
//! against the resource map of each state the rule is checked on.
//!
//! # Syntax
//!
//! - Literals: `42`, `2.5`, `"text"`, `'text'`, `true`, `false`, `nil`/`null`
//! - Identifiers name resources; an undefined resource evaluates to `nil`
//! - Operators, loosest first: `||`/`or`, `&&`/`and`, `==` `!=`,
//!   `<` `<=` `>` `>=`, `+` `-`, `*` `/` `%`, unary `!`/`not` and `-`
//! - Functions: `has("key")`, `len(value)`
//!
//! Parentheses, unary operators, calls and operator chains may nest at most
//! 256 levels deep; deeper input is a parse error.
//!
//! # Example
//!
//! ```rust
//! use blindspot::expr::Expression;
//! use serde_json::json;
//! use std::collections::BTreeMap;
//!
//! let expr = Expression::parse("server_status == 'running' && user_count < 2").unwrap();
//! let mut resources = BTreeMap::new();
//! resources.insert("server_status".to_string(), json!("running"));
//! resources.insert("user_count".to_string(), json!(1));
//!
//! assert!(expr.eval_bool(&resources).unwrap());
//! ```

mod eval;
mod lexer;
mod parser;

use crate::core::EvalError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// An expression failed to parse.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("at offset {offset}: {message}")]
pub struct ExprError {
    /// Byte offset into the source text.
    pub offset: usize,
    pub message: String,
}

impl ExprError {
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

/// A compiled expression.
#[derive(Debug, Clone)]
pub struct Expression {
    source: String,
    root: parser::Node,
}

impl Expression {
    pub fn parse(source: &str) -> Result<Self, ExprError> {
        let root = parser::parse(source)?;
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    /// The text the expression was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate against a resource map.
    pub fn eval(&self, resources: &BTreeMap<String, Value>) -> Result<Value, EvalError> {
        eval::eval(&self.root, resources)
    }

    /// Evaluate and require a boolean result.
    pub fn eval_bool(&self, resources: &BTreeMap<String, Value>) -> Result<bool, EvalError> {
        match self.eval(resources)? {
            Value::Bool(b) => Ok(b),
            other => Err(EvalError::NotBoolean {
                found: eval::type_name(&other).to_string(),
            }),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn eval(source: &str, resources: &BTreeMap<String, Value>) -> Result<Value, EvalError> {
        Expression::parse(source).unwrap().eval(resources)
    }

    #[test]
    fn compares_resources_with_literals() {
        let resources = env(&[("server_status", json!("running")), ("user_count", json!(0))]);

        assert_eq!(eval("server_status == 'running'", &resources), Ok(json!(true)));
        assert_eq!(eval("user_count > 0", &resources), Ok(json!(false)));
        assert_eq!(eval("user_count >= 0 and not (server_status != \"running\")", &resources), Ok(json!(true)));
    }

    #[test]
    fn undefined_identifiers_are_nil() {
        let resources = env(&[]);

        assert_eq!(eval("missing", &resources), Ok(Value::Null));
        assert_eq!(eval("missing == nil", &resources), Ok(json!(true)));
        assert_eq!(eval("missing == null", &resources), Ok(json!(true)));
    }

    #[test]
    fn has_checks_presence() {
        let resources = env(&[("user_count", json!(0))]);

        assert_eq!(eval("has('user_count')", &resources), Ok(json!(true)));
        assert_eq!(eval("has(\"other\")", &resources), Ok(json!(false)));
        assert!(eval("has(1)", &resources).is_err());
    }

    #[test]
    fn len_measures_collections() {
        let resources = env(&[("names", json!(["a", "b"])), ("word", json!("héllo"))]);

        assert_eq!(eval("len(names)", &resources), Ok(json!(2)));
        assert_eq!(eval("len(word)", &resources), Ok(json!(5)));
        assert!(eval("len(1)", &resources).is_err());
    }

    #[test]
    fn integer_arithmetic_stays_integral() {
        let resources = env(&[("n", json!(7))]);

        assert_eq!(eval("n + 1 * 2", &resources), Ok(json!(9)));
        assert_eq!(eval("n % 4", &resources), Ok(json!(3)));
        assert_eq!(eval("-n", &resources), Ok(json!(-7)));
    }

    #[test]
    fn division_yields_float() {
        let resources = env(&[]);

        assert_eq!(eval("7 / 2", &resources), Ok(json!(3.5)));
        assert_eq!(eval("1 + 0.5", &resources), Ok(json!(1.5)));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let resources = env(&[]);

        assert_eq!(eval("1 / 0", &resources), Err(EvalError::DivisionByZero));
        assert_eq!(eval("1 % 0", &resources), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn overflow_is_an_error() {
        let resources = env(&[("big", json!(i64::MAX))]);

        assert_eq!(eval("big + 1", &resources), Err(EvalError::Overflow));
    }

    #[test]
    fn strings_concatenate() {
        let resources = env(&[("name", json!("srv"))]);

        assert_eq!(eval("name + '-1'", &resources), Ok(json!("srv-1")));
    }

    #[test]
    fn mixed_numbers_compare_numerically() {
        let resources = env(&[("n", json!(1))]);

        assert_eq!(eval("n == 1.0", &resources), Ok(json!(true)));
        assert_eq!(eval("n < 1.5", &resources), Ok(json!(true)));
    }

    #[test]
    fn equality_across_types_is_false() {
        let resources = env(&[("n", json!(1))]);

        assert_eq!(eval("n == '1'", &resources), Ok(json!(false)));
        assert_eq!(eval("n != '1'", &resources), Ok(json!(true)));
    }

    #[test]
    fn ordering_across_types_is_an_error() {
        let resources = env(&[("n", json!(1))]);

        assert!(matches!(eval("n < 'a'", &resources), Err(EvalError::Type { .. })));
        assert!(matches!(eval("missing > 0", &resources), Err(EvalError::Type { .. })));
    }

    #[test]
    fn logical_operators_short_circuit() {
        let resources = env(&[]);

        assert_eq!(eval("false && (1 < 'x')", &resources), Ok(json!(false)));
        assert_eq!(eval("true || (1 < 'x')", &resources), Ok(json!(true)));
    }

    #[test]
    fn logical_operators_require_booleans() {
        let resources = env(&[("n", json!(1))]);

        assert!(eval("n && true", &resources).is_err());
        assert!(eval("!n", &resources).is_err());
    }

    #[test]
    fn eval_bool_rejects_non_boolean_results() {
        let expr = Expression::parse("1 + 1").unwrap();

        assert_eq!(
            expr.eval_bool(&env(&[])),
            Err(EvalError::NotBoolean {
                found: "int".to_string()
            })
        );
    }

    #[test]
    fn parse_errors_carry_offsets() {
        let err = Expression::parse("a == 'x' &&").unwrap_err();

        assert_eq!(err.offset, 11);
    }

    #[test]
    fn display_shows_source() {
        let expr = Expression::parse("has('a')").unwrap();

        assert_eq!(expr.to_string(), "has('a')");
    }
}
