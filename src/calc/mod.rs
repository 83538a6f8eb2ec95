//! Restricted arithmetic evaluator for the calculate command.
//!
//! Expressions are tokenized, parsed by hand into a small tree and evaluated
//! over `f64`. The only names that resolve are the constant `pi` and the
//! whitelisted one-argument functions; nothing else is reachable.

mod lexer;
mod parser;

use parser::{BinaryOp, Expr};
use std::f64::consts::PI;
use thiserror::Error;

/// Decimal places kept in results.
const RESULT_DECIMALS: usize = 5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The operation has no real result (e.g. square root of a negative number).
    #[error("undefined")]
    Domain,

    /// A name that is neither a whitelisted function nor a constant.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Malformed syntax, division by zero, overflow, misuse of a name.
    #[error("invalid expression: {0}")]
    Invalid(String),
}

type Function = fn(f64) -> Result<f64, EvalError>;

/// Whitelisted one-argument functions.
const FUNCTIONS: &[(&str, Function)] = &[
    ("floor", |x| Ok(x.floor())),
    ("ceil", |x| Ok(x.ceil())),
    ("sqrt", sqrt),
    ("sin", |x| Ok(x.sin())),
    ("cos", |x| Ok(x.cos())),
    ("tan", |x| Ok(x.tan())),
    ("asin", asin),
    ("acos", acos),
    ("atan", |x| Ok(x.atan())),
    ("degrees", |x| Ok(x.to_degrees())),
    ("deg", |x| Ok(x.to_degrees())),
    ("radians", |x| Ok(x.to_radians())),
    ("rad", |x| Ok(x.to_radians())),
];

fn sqrt(x: f64) -> Result<f64, EvalError> {
    if x < 0.0 {
        return Err(EvalError::Domain);
    }
    Ok(x.sqrt())
}

fn asin(x: f64) -> Result<f64, EvalError> {
    if !(-1.0..=1.0).contains(&x) {
        return Err(EvalError::Domain);
    }
    Ok(x.asin())
}

fn acos(x: f64) -> Result<f64, EvalError> {
    if !(-1.0..=1.0).contains(&x) {
        return Err(EvalError::Domain);
    }
    Ok(x.acos())
}

fn lookup_function(name: &str) -> Option<Function> {
    FUNCTIONS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, function)| *function)
}

/// Evaluate `raw` and round the result to five decimal places.
pub fn evaluate(raw: &str) -> Result<f64, EvalError> {
    let tokens = lexer::tokenize(raw)?;
    let expr = parser::parse(&tokens)?;
    let value = eval(&expr)?;
    Ok(round_result(value))
}

fn eval(expr: &Expr) -> Result<f64, EvalError> {
    let value = match expr {
        Expr::Number(n) => *n,
        Expr::Name(name) => match name.as_str() {
            "pi" => PI,
            _ if lookup_function(name).is_some() => {
                return Err(EvalError::Invalid(format!("'{name}' must be called")))
            }
            _ => return Err(EvalError::UnknownFunction(name.clone())),
        },
        Expr::Call(name, args) => {
            let function = match lookup_function(name) {
                Some(function) => function,
                None if name == "pi" => {
                    return Err(EvalError::Invalid("'pi' is not callable".to_string()))
                }
                None => return Err(EvalError::UnknownFunction(name.clone())),
            };
            let [arg] = args.as_slice() else {
                return Err(EvalError::Invalid(format!(
                    "{name}() takes exactly one argument ({} given)",
                    args.len()
                )));
            };
            function(eval(arg)?)?
        }
        Expr::Neg(inner) => -eval(inner)?,
        Expr::Binary(op, lhs, rhs) => {
            let lhs = eval(lhs)?;
            let rhs = eval(rhs)?;
            apply(*op, lhs, rhs)?
        }
    };

    if !value.is_finite() {
        return Err(EvalError::Invalid("numeric overflow".to_string()));
    }
    Ok(value)
}

fn apply(op: BinaryOp, lhs: f64, rhs: f64) -> Result<f64, EvalError> {
    match op {
        BinaryOp::Add => Ok(lhs + rhs),
        BinaryOp::Sub => Ok(lhs - rhs),
        BinaryOp::Mul => Ok(lhs * rhs),
        BinaryOp::Div => {
            if rhs == 0.0 {
                return Err(EvalError::Invalid("division by zero".to_string()));
            }
            Ok(lhs / rhs)
        }
        BinaryOp::Pow => {
            if lhs == 0.0 && rhs < 0.0 {
                return Err(EvalError::Invalid("zero to a negative power".to_string()));
            }
            let result = lhs.powf(rhs);
            // Negative base with a fractional exponent has no real value
            if result.is_nan() {
                return Err(EvalError::Domain);
            }
            Ok(result)
        }
    }
}

fn round_result(value: f64) -> f64 {
    // Beyond 1e15 an f64 has no fractional digits left to round
    if value.abs() >= 1e15 {
        return value;
    }
    // Formatting rounds the exact binary value, so half-way inputs such as
    // 0.123455 (stored slightly below) round down rather than up
    let rounded = format!("{:.*}", RESULT_DECIMALS, value)
        .parse::<f64>()
        .unwrap_or(value);
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Render an evaluation result, dropping a trailing `.0` on whole numbers.
pub fn format_number(value: f64) -> String {
    format!("{value}")
}
