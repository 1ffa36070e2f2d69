//! Safe arithmetic evaluation
//!
//! Expressions are tokenized, parsed into an [`Expr`] tree and walked. The
//! only things that can appear in the tree are numbers, operators and, in the
//! extended grammar, calls into a fixed table of math functions, so user text
//! never reaches anything that could execute code.

pub mod lexer;
pub mod parser;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, ExpressionError};
use crate::number::Number;
pub use parser::{BinaryOp, Expr, UnaryOp};

/// Which syntax the evaluator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grammar {
    /// Numeric literals, `+ - * /`, unary signs and parentheses
    #[default]
    Strict,
    /// Strict plus `^`/`**`, `%` and the allow-listed functions
    Extended,
}

/// Functions callable in the extended grammar.
pub const ALLOWED_FUNCTIONS: &[&str] = &[
    "sqrt", "abs", "round", "min", "max", "floor", "ceil", "sin", "cos", "tan", "log", "log10", "exp",
    "pow",
];

#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    grammar: Grammar,
}

impl Evaluator {
    pub fn new(grammar: Grammar) -> Self {
        Self { grammar }
    }

    pub fn strict() -> Self {
        Self::new(Grammar::Strict)
    }

    pub fn extended() -> Self {
        Self::new(Grammar::Extended)
    }

    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    pub fn parse(&self, src: &str) -> Result<Expr, ExpressionError> {
        let tokens = lexer::tokenize(src)?;
        parser::Parser::new(&tokens, self.grammar).parse()
    }

    pub fn evaluate(&self, src: &str) -> Result<Number, CalcError> {
        let expr = self.parse(src)?;
        let value = eval_expr(&expr)?;
        log::debug!("evaluated '{}' = {}", src, value);
        Ok(value)
    }
}

fn eval_expr(expr: &Expr) -> Result<Number, CalcError> {
    match expr {
        Expr::Literal(n) => Ok(*n),
        Expr::Unary { op, operand } => {
            let value = eval_expr(operand)?;
            match op {
                UnaryOp::Neg => value.neg(),
                UnaryOp::Pos => Ok(value),
            }
        }
        Expr::Binary { op, lhs, rhs } => {
            let a = eval_expr(lhs)?;
            let b = eval_expr(rhs)?;
            match op {
                BinaryOp::Add => a.add(b),
                BinaryOp::Sub => a.sub(b),
                BinaryOp::Mul => a.mul(b),
                BinaryOp::Div => a.div(b),
                BinaryOp::Rem => a.rem(b),
                BinaryOp::Pow => a.pow(b),
            }
        }
        Expr::Call { name, args } => {
            let values = args.iter().map(eval_expr).collect::<Result<Vec<_>, _>>()?;
            call_function(name, &values)
        }
    }
}

fn arity(name: &str, expected: &str, got: usize) -> CalcError {
    CalcError::Expression(ExpressionError::Arity {
        name: name.to_string(),
        expected: expected.to_string(),
        got,
    })
}

fn one(name: &str, args: &[Number]) -> Result<f64, CalcError> {
    match args {
        [x] => Ok(x.as_f64()),
        _ => Err(arity(name, "1", args.len())),
    }
}

fn to_int(value: f64) -> Result<Number, CalcError> {
    if value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Ok(Number::Int(value as i64))
    } else {
        Err(CalcError::Overflow)
    }
}

fn call_function(name: &str, args: &[Number]) -> Result<Number, CalcError> {
    match name {
        "sqrt" => {
            let x = one(name, args)?;
            if x < 0.0 {
                return Err(CalcError::Domain(format!("sqrt of negative number {}", x)));
            }
            Number::float(x.sqrt())
        }
        "abs" => match args {
            [Number::Int(i)] => i.checked_abs().map(Number::Int).ok_or(CalcError::Overflow),
            [Number::Float(f)] => Ok(Number::Float(f.abs())),
            _ => Err(arity(name, "1", args.len())),
        },
        "round" => match args {
            [Number::Int(i)] => Ok(Number::Int(*i)),
            [Number::Float(f)] => to_int(f.round_ties_even()),
            [x, digits] => {
                let digits = match digits {
                    Number::Int(d) => i32::try_from(*d).map_err(|_| CalcError::Overflow)?,
                    Number::Float(_) => {
                        return Err(CalcError::Domain("round() digits must be an integer".to_string()))
                    }
                };
                let scale = 10f64.powi(digits);
                Number::float((x.as_f64() * scale).round_ties_even() / scale)
            }
            _ => Err(arity(name, "1 or 2", args.len())),
        },
        "min" | "max" => {
            let mut iter = args.iter().copied();
            let mut best = iter.next().ok_or_else(|| arity(name, "at least 1", 0))?;
            for candidate in iter {
                let better = if name == "min" {
                    candidate.as_f64() < best.as_f64()
                } else {
                    candidate.as_f64() > best.as_f64()
                };
                if better {
                    best = candidate;
                }
            }
            Ok(best)
        }
        "floor" => to_int(one(name, args)?.floor()),
        "ceil" => to_int(one(name, args)?.ceil()),
        "sin" => Number::float(one(name, args)?.sin()),
        "cos" => Number::float(one(name, args)?.cos()),
        "tan" => Number::float(one(name, args)?.tan()),
        "exp" => Number::float(one(name, args)?.exp()),
        "log" => {
            let (x, base) = match args {
                [x] => (x.as_f64(), None),
                [x, b] => (x.as_f64(), Some(b.as_f64())),
                _ => return Err(arity(name, "1 or 2", args.len())),
            };
            if x <= 0.0 {
                return Err(CalcError::Domain(format!("log of non-positive number {}", x)));
            }
            match base {
                None => Number::float(x.ln()),
                Some(b) if b > 0.0 && b != 1.0 => Number::float(x.ln() / b.ln()),
                Some(b) => Err(CalcError::Domain(format!("invalid logarithm base {}", b))),
            }
        }
        "log10" => {
            let x = one(name, args)?;
            if x <= 0.0 {
                return Err(CalcError::Domain(format!("log of non-positive number {}", x)));
            }
            Number::float(x.log10())
        }
        "pow" => match args {
            [a, b] => Number::float(a.as_f64().powf(b.as_f64())),
            _ => Err(arity(name, "2", args.len())),
        },
        _ => Err(CalcError::Expression(ExpressionError::FunctionNotAllowed {
            name: name.to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict(src: &str) -> Result<Number, CalcError> {
        Evaluator::strict().evaluate(src)
    }

    fn extended(src: &str) -> Result<Number, CalcError> {
        Evaluator::extended().evaluate(src)
    }

    #[test]
    fn test_basic_expression() {
        assert_eq!(strict("2 + 3 * 4").unwrap(), Number::Int(14));
        assert_eq!(strict("(2 + 3) * 4").unwrap(), Number::Int(20));
        assert_eq!(strict("10 / 4").unwrap(), Number::Float(2.5));
        assert_eq!(strict("-3 - -2").unwrap(), Number::Int(-1));
        assert_eq!(strict("1.5 * 2").unwrap(), Number::Float(3.0));
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(strict("10 - 4 - 3").unwrap(), Number::Int(3));
        assert_eq!(strict("16 / 4 / 2").unwrap(), Number::Float(2.0));
    }

    #[test]
    fn test_division_by_zero_is_error() {
        assert_eq!(strict("1 / 0"), Err(CalcError::DivisionByZero));
        assert_eq!(strict("1 / (2 - 2)"), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_rejects_non_arithmetic_input() {
        for src in [
            "__import__('os').system('ls')",
            "import os",
            "abc",
            "2 + x",
            "open(\"f\")",
            "2 ^ 3",
            "sqrt(4)",
            "[1, 2]",
            "1; 2",
        ] {
            assert!(
                matches!(strict(src), Err(CalcError::Expression(_))),
                "strict evaluator accepted {:?}",
                src
            );
        }
    }

    #[test]
    fn test_extended_operators() {
        assert_eq!(extended("2 ^ 10").unwrap(), Number::Int(1024));
        assert_eq!(extended("2 ** 3 ** 2").unwrap(), Number::Int(512));
        assert_eq!(extended("-2 ^ 2").unwrap(), Number::Int(-4));
        assert_eq!(extended("17 % 5").unwrap(), Number::Int(2));
    }

    #[test]
    fn test_extended_functions() {
        assert_eq!(extended("sqrt(16)").unwrap(), Number::Float(4.0));
        assert_eq!(extended("abs(-3)").unwrap(), Number::Int(3));
        assert_eq!(extended("round(2.5)").unwrap(), Number::Int(2));
        assert_eq!(extended("round(3.14159, 2)").unwrap(), Number::Float(3.14));
        assert_eq!(extended("max(1, 7, 3)").unwrap(), Number::Int(7));
        assert_eq!(extended("min(4, 2.5)").unwrap(), Number::Float(2.5));
        assert_eq!(extended("floor(2.7) + ceil(2.1)").unwrap(), Number::Int(5));
        assert_eq!(extended("log(100, 10)").unwrap().as_f64().round(), 2.0);
    }

    #[test]
    fn test_extended_function_errors() {
        assert!(matches!(
            extended("system(1)"),
            Err(CalcError::Expression(ExpressionError::FunctionNotAllowed { .. }))
        ));
        assert!(matches!(extended("sqrt(-1)"), Err(CalcError::Domain(_))));
        assert!(matches!(
            extended("sqrt(1, 2)"),
            Err(CalcError::Expression(ExpressionError::Arity { got: 2, .. }))
        ));
        assert!(matches!(extended("log(0)"), Err(CalcError::Domain(_))));
        assert_eq!(extended("0 ^ -1"), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_allowed_function_table_is_callable() {
        for name in ALLOWED_FUNCTIONS {
            let src = if *name == "pow" {
                format!("{}(2, 2)", name)
            } else {
                format!("{}(1)", name)
            };
            assert!(extended(&src).is_ok(), "{} should be callable", name);
        }
    }
}
