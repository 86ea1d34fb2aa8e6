//! # linecalc
//!
//! An arbitrary-precision line calculator. A line goes through four stages:
//!
//! 1. [`preprocess`] rewrites aliases, constants and unit suffixes,
//! 2. [`parse`] builds an [`Expr`] tree,
//! 3. [`Calculator::evaluate`] reduces the tree to a [`rug::Float`],
//! 4. [`format()`] renders the value as grouped decimal/hex/binary, or as a
//!    plain float when it is not an exact integer.
//!
//! ```ignore
//! let calc = Calculator::default();
//! let answer = linecalc::answer(&calc, "1K + 1")?;
//! assert_eq!(answer.parts(), ["1,025", "0x401", "0b100_00000001"]);
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod eval;
pub mod format;
pub mod lexer;
pub mod parser;
pub mod preprocess;
pub mod repl;

use tracing::debug;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use config::Config;
pub use error::{CalcError, ConfigError, EvalError, SyntaxError};
pub use eval::Calculator;
pub use format::{format, Answer};
pub use parser::parse;
pub use preprocess::preprocess;

/// Preprocesses and parses one input line.
pub fn parse_line(line: &str) -> Result<Expr, SyntaxError> {
    let text = preprocess(line);
    let tree = parse(&text)?;
    debug!(?tree, "parsed");
    Ok(tree)
}

/// Runs the whole pipeline on one input line.
pub fn answer(calc: &Calculator, line: &str) -> Result<Answer, CalcError> {
    let tree = parse_line(line)?;
    let value = calc.evaluate(&tree)?;
    debug!(%value, "evaluated");
    Ok(format(&value, calc.config().show_max_bits))
}
