//! Menu driven four-operation calculator
//!
//! One session shows the menu, reads a choice and two operands, and prints
//! the result. Bad input ends the session with a message rather than an
//! error, so only I/O failures surface as `Err`.

use std::io::{self, BufRead, Write};

use crate::errors::CalcError;
use crate::number::Number;
use crate::repl::read_line_lossy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Addition,
        Operation::Subtraction,
        Operation::Multiplication,
        Operation::Division,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Operation::Addition => "Addition",
            Operation::Subtraction => "Subtraction",
            Operation::Multiplication => "Multiplication",
            Operation::Division => "Division",
        }
    }

    pub fn from_choice(choice: &str) -> Result<Self, CalcError> {
        let invalid = || CalcError::InvalidChoice(choice.trim().to_string());
        let index: usize = choice.trim().parse().map_err(|_| invalid())?;
        index
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(invalid)
    }

    pub fn apply(&self, a: Number, b: Number) -> Result<Number, CalcError> {
        match self {
            Operation::Addition => a.add(b),
            Operation::Subtraction => a.sub(b),
            Operation::Multiplication => a.mul(b),
            Operation::Division => a.div(b),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Completed { operation: Operation, result: Number },
    Rejected(CalcError),
}

pub fn print_menu<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output, "Simple Calculator")?;
    for (i, op) in Operation::ALL.iter().enumerate() {
        writeln!(output, "{}. {}", i + 1, op.label())?;
    }
    Ok(())
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, text: &str) -> io::Result<String> {
    write!(output, "{}", text)?;
    output.flush()?;
    let line = read_line_lossy(input)?.unwrap_or_default();
    Ok(line.trim().to_string())
}

fn reject<W: Write>(output: &mut W, err: CalcError) -> io::Result<SessionOutcome> {
    log::warn!("calculator session rejected input: {}", err);
    match &err {
        CalcError::InvalidChoice(_) => writeln!(output, "{}", err)?,
        _ => writeln!(output, "Error: {}", err)?,
    }
    Ok(SessionOutcome::Rejected(err))
}

pub fn run_session<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<SessionOutcome> {
    print_menu(output)?;

    let choice = prompt(input, output, "Choose an operation: ")?;
    let operation = match Operation::from_choice(&choice) {
        Ok(op) => op,
        Err(err) => return reject(output, err),
    };

    let mut operands = Vec::with_capacity(2);
    for label in ["Enter first number: ", "Enter second number: "] {
        let text = prompt(input, output, label)?;
        match text.parse::<Number>() {
            Ok(n) => operands.push(n),
            Err(err) => return reject(output, err),
        }
    }

    match operation.apply(operands[0], operands[1]) {
        Ok(result) => {
            writeln!(output, "The result is {}", result)?;
            Ok(SessionOutcome::Completed { operation, result })
        }
        Err(err) => reject(output, err),
    }
}
