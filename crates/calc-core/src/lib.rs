//! Core library for the menu calculator and the text-driven calculator agent.
//!
//! # Architecture Overview
//!
//! - **Menu calculator**: one-shot four-operation session over any reader/writer pair
//! - **Safe evaluation**: lexer, recursive-descent parser and tree walker with a strict
//!   grammar by default and an opt-in extended one
//! - **Agent**: keyword intent classification dispatching to per-intent handlers for
//!   arithmetic, unit conversion, statistics and CSV export
//! - **Configuration system**: optional YAML file with defaults for every field

pub mod agent;
pub mod config;
pub mod csv_export;
pub mod errors;
pub mod eval;
pub mod handlers;
pub mod intent;
pub mod menu;
pub mod number;
pub mod repl;
pub mod stats;
pub mod units;

pub use agent::{AgentResponse, CalculatorAgent};
pub use config::*;
pub use errors::{CalcError, ExpressionError};
pub use eval::{Evaluator, Grammar};
pub use intent::Intent;
pub use number::Number;
