//! Error types for every user-facing failure in the calculator and the agent
//!
//! Each variant maps to one kind of bad input or failed side effect. None of
//! them are fatal: the front ends render the message and carry on, so the
//! `Display` text is written for the person at the keyboard.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("Invalid input: '{0}' is not a menu choice (expected 1-4)")]
    InvalidChoice(String),
    #[error("Invalid number: '{0}'")]
    InvalidNumber(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    Overflow,
    #[error("math domain error: {0}")]
    Domain(String),
    #[error("Sorry, I couldn't understand your request.")]
    UnknownCommand,
    #[error("Invalid expression: {0}")]
    Expression(#[from] ExpressionError),
    #[error("{0}")]
    Conversion(String),
    #[error("{0}")]
    Statistics(String),
    #[error("CSV error: {0}")]
    Csv(String),
    #[error("filesystem write failure: {0}")]
    Io(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for CalcError {
    fn from(err: std::io::Error) -> Self {
        CalcError::Io(err.to_string())
    }
}

/// Lexing and parsing failures, each carrying the byte offset it was found at.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("empty expression")]
    Empty,
    #[error("unexpected character '{ch}' at {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("malformed number '{text}' at {pos}")]
    MalformedNumber { text: String, pos: usize },
    #[error("identifiers are not allowed ('{name}' at {pos})")]
    IdentifierNotAllowed { name: String, pos: usize },
    #[error("function '{name}' is not allowed")]
    FunctionNotAllowed { name: String },
    #[error("operator '{op}' is not allowed at {pos}")]
    OperatorNotAllowed { op: String, pos: usize },
    #[error("unexpected {found} at {pos}")]
    UnexpectedToken { found: String, pos: usize },
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("expression has {tokens} tokens, the limit is {max}")]
    TooLong { tokens: usize, max: usize },
    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),
    #[error("missing closing parenthesis for '(' at {pos}")]
    UnclosedParen { pos: usize },
    #[error("function '{name}' takes {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: String,
        got: usize,
    },
}
