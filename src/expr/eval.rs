//! Evaluation of parsed expressions against a resource map.

use super::parser::{BinaryOp, Function, Node, UnaryOp};
use crate::core::EvalError;
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub(crate) fn eval(node: &Node, resources: &BTreeMap<String, Value>) -> Result<Value, EvalError> {
    match node {
        Node::Literal(value) => Ok(value.clone()),
        Node::Var(name) => Ok(resources.get(name).cloned().unwrap_or(Value::Null)),
        Node::Unary(op, operand) => unary(*op, eval(operand, resources)?),
        Node::And(left, right) => {
            if !boolean("&&", eval(left, resources)?)? {
                return Ok(Value::Bool(false));
            }
            boolean("&&", eval(right, resources)?).map(Value::Bool)
        }
        Node::Or(left, right) => {
            if boolean("||", eval(left, resources)?)? {
                return Ok(Value::Bool(true));
            }
            boolean("||", eval(right, resources)?).map(Value::Bool)
        }
        Node::Binary(op, left, right) => {
            binary(*op, eval(left, resources)?, eval(right, resources)?)
        }
        Node::Call(function, args) => {
            let args = args
                .iter()
                .map(|arg| eval(arg, resources))
                .collect::<Result<Vec<_>, _>>()?;
            call(*function, &args, resources)
        }
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "nil",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "map",
    }
}

fn boolean(op: &str, value: Value) -> Result<bool, EvalError> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(EvalError::type_error(format!(
            "operand of '{op}' must be bool, got {}",
            type_name(&other)
        ))),
    }
}

fn unary(op: UnaryOp, value: Value) -> Result<Value, EvalError> {
    match op {
        UnaryOp::Not => boolean("!", value).map(|b| Value::Bool(!b)),
        UnaryOp::Neg => match Numeric::of(&value) {
            Some(Numeric::Int(n)) => n.checked_neg().map(Value::from).ok_or(EvalError::Overflow),
            Some(Numeric::Float(x)) => float(-x),
            None => Err(EvalError::type_error(format!(
                "cannot negate {}",
                type_name(&value)
            ))),
        },
    }
}

fn binary(op: BinaryOp, left: Value, right: Value) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(equal(&left, &right))),
        BinaryOp::Ne => Ok(Value::Bool(!equal(&left, &right))),
        BinaryOp::Lt => compare(&left, &right, "<").map(|o| Value::Bool(o == Ordering::Less)),
        BinaryOp::Le => compare(&left, &right, "<=").map(|o| Value::Bool(o != Ordering::Greater)),
        BinaryOp::Gt => compare(&left, &right, ">").map(|o| Value::Bool(o == Ordering::Greater)),
        BinaryOp::Ge => compare(&left, &right, ">=").map(|o| Value::Bool(o != Ordering::Less)),
        BinaryOp::Add => {
            if let (Value::String(a), Value::String(b)) = (&left, &right) {
                return Ok(Value::String(format!("{a}{b}")));
            }
            arithmetic(&left, &right, "+", i64::checked_add, |a, b| a + b)
        }
        BinaryOp::Sub => arithmetic(&left, &right, "-", i64::checked_sub, |a, b| a - b),
        BinaryOp::Mul => arithmetic(&left, &right, "*", i64::checked_mul, |a, b| a * b),
        BinaryOp::Div => {
            let (a, b) = floats(&left, &right, "/")?;
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            float(a / b)
        }
        BinaryOp::Rem => match (Numeric::of(&left), Numeric::of(&right)) {
            (Some(Numeric::Int(_)), Some(Numeric::Int(0))) => Err(EvalError::DivisionByZero),
            (Some(Numeric::Int(a)), Some(Numeric::Int(b))) => {
                a.checked_rem(b).map(Value::from).ok_or(EvalError::Overflow)
            }
            _ => Err(mismatch("%", &left, &right)),
        },
    }
}

fn call(function: Function, args: &[Value], resources: &BTreeMap<String, Value>) -> Result<Value, EvalError> {
    let arg = args.first().unwrap_or(&Value::Null);
    match function {
        Function::Has => match arg {
            Value::String(key) => Ok(Value::Bool(resources.contains_key(key))),
            other => Err(EvalError::type_error(format!(
                "has() expects a string key, got {}",
                type_name(other)
            ))),
        },
        Function::Len => {
            let len = match arg {
                Value::String(s) => s.chars().count(),
                Value::Array(items) => items.len(),
                Value::Object(map) => map.len(),
                other => {
                    return Err(EvalError::type_error(format!(
                        "len() expects a string, array or map, got {}",
                        type_name(other)
                    )))
                }
            };
            i64::try_from(len).map(Value::from).map_err(|_| EvalError::Overflow)
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    fn of(value: &Value) -> Option<Self> {
        let Value::Number(n) = value else {
            return None;
        };
        n.as_i64()
            .map(Self::Int)
            .or_else(|| n.as_f64().map(Self::Float))
    }

    fn as_f64(self) -> f64 {
        match self {
            Self::Int(n) => n as f64,
            Self::Float(x) => x,
        }
    }
}

/// Equality across any two values. Integers and floats compare numerically.
fn equal(left: &Value, right: &Value) -> bool {
    match (Numeric::of(left), Numeric::of(right)) {
        (Some(Numeric::Int(a)), Some(Numeric::Int(b))) => a == b,
        (Some(a), Some(b)) => a.as_f64() == b.as_f64(),
        _ => left == right,
    }
}

fn compare(left: &Value, right: &Value, op: &str) -> Result<Ordering, EvalError> {
    match (Numeric::of(left), Numeric::of(right)) {
        (Some(Numeric::Int(a)), Some(Numeric::Int(b))) => return Ok(a.cmp(&b)),
        (Some(a), Some(b)) => {
            return a
                .as_f64()
                .partial_cmp(&b.as_f64())
                .ok_or_else(|| mismatch(op, left, right))
        }
        _ => {}
    }
    match (left, right) {
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        _ => Err(mismatch(op, left, right)),
    }
}

fn arithmetic(
    left: &Value,
    right: &Value,
    op: &str,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, EvalError> {
    match (Numeric::of(left), Numeric::of(right)) {
        (Some(Numeric::Int(a)), Some(Numeric::Int(b))) => {
            int_op(a, b).map(Value::from).ok_or(EvalError::Overflow)
        }
        (Some(a), Some(b)) => float(float_op(a.as_f64(), b.as_f64())),
        _ => Err(mismatch(op, left, right)),
    }
}

fn floats(left: &Value, right: &Value, op: &str) -> Result<(f64, f64), EvalError> {
    match (Numeric::of(left), Numeric::of(right)) {
        (Some(a), Some(b)) => Ok((a.as_f64(), b.as_f64())),
        _ => Err(mismatch(op, left, right)),
    }
}

/// JSON has no NaN or infinity, so a non-finite result is an overflow.
fn float(x: f64) -> Result<Value, EvalError> {
    Number::from_f64(x)
        .map(Value::Number)
        .ok_or(EvalError::Overflow)
}

fn mismatch(op: &str, left: &Value, right: &Value) -> EvalError {
    EvalError::type_error(format!(
        "cannot apply '{op}' to {} and {}",
        type_name(left),
        type_name(right)
    ))
}
