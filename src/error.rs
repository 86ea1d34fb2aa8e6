//! Error types for every stage of the pipeline.

use thiserror::Error;

use crate::ast::{BinaryOp, UnaryOp};

/// The line could not be turned into an expression tree.
///
/// Positions are byte offsets into the text handed to the parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("unexpected character {found:?}")]
    UnexpectedCharacter { found: String, pos: usize },
    #[error("unexpected {found}")]
    UnexpectedToken { found: String, pos: usize },
    #[error("unexpected end of expression")]
    UnexpectedEnd { pos: usize },
    #[error("expression nested too deeply (max {max})")]
    TooDeep { max: usize, pos: usize },
}

impl SyntaxError {
    pub fn position(&self) -> usize {
        match self {
            SyntaxError::UnexpectedCharacter { pos, .. }
            | SyntaxError::UnexpectedToken { pos, .. }
            | SyntaxError::UnexpectedEnd { pos }
            | SyntaxError::TooDeep { pos, .. } => *pos,
        }
    }
}

/// Evaluation of a well-formed tree failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("malformed number: {0}")]
    MalformedLiteral(String),
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),
    #[error("unknown function: {0}")]
    UnknownFunction(String),
    #[error("unknown unit: {0}")]
    UnknownUnit(String),
    #[error("invalid unary operator: {0}")]
    InvalidUnaryOperator(UnaryOp),
    #[error("invalid operator: {0}")]
    InvalidBinaryOperator(BinaryOp),
    #[error("division by zero")]
    DivisionByZero,
    #[error("no arguments")]
    MissingArguments,
    #[error("invalid unit")]
    InvalidUnitTarget,
    #[error("invalid call")]
    InvalidCall,
    #[error("negative shift count")]
    NegativeShiftCount,
    #[error("exponent too large")]
    ExponentTooLarge,
    #[error("integer operation on a non-finite value")]
    NotFinite,
    #[error("integer operand wider than {max} bits")]
    IntegerTooLarge { max: u64 },
    #[error("result out of range")]
    Overflow,
    #[error("{0} is undefined for this argument")]
    UndefinedResult(String),
}

/// Anything that can go wrong turning a line into an answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Rejected session settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("precision must be at least {minimum} bits (got {requested})")]
    PrecisionTooLow { requested: u32, minimum: u32 },
    #[error("precision must be at most {maximum} bits (got {requested})")]
    PrecisionTooHigh { requested: u32, maximum: u32 },
}
