//! Tree-walking evaluator over arbitrary-precision floats.
//!
//! Every value is a [`Float`] at the calculator's working precision. The
//! integer-only operators (`% ^ << >> & |` and prefix `!`) truncate their
//! operands toward zero, work on [`Integer`], and round the result back into
//! the working precision. Powers and shifts that would build an integer wider
//! than [`MAX_INTEGER_BITS`] stay in floating point.

use std::collections::HashMap;

use rug::float::{Constant, Round};
use rug::ops::Pow;
use rug::{Assign, Float, Integer};

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::config::{Config, MAX_INTEGER_BITS, UNITS};
use crate::error::EvalError;

type EvalResult = Result<Float, EvalError>;

/// Evaluation context: settings plus the two read-only tables.
#[derive(Debug, Clone)]
pub struct Calculator {
    config: Config,
    idents: HashMap<&'static str, Float>,
    units: HashMap<&'static str, i64>,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Calculator {
    pub fn new(config: Config) -> Self {
        let prec = config.precision;
        let idents = HashMap::from([
            ("pi", Float::with_val(prec, Constant::Pi)),
            ("e", Float::with_val(prec, 1).exp()),
        ]);
        let units = UNITS.into_iter().collect();
        Self {
            config,
            idents,
            units,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn float<T>(&self, value: T) -> Float
    where
        Float: Assign<T>,
    {
        Float::with_val(self.config.precision, value)
    }

    /// Evaluates a tree to a single value.
    pub fn evaluate(&self, expr: &Expr) -> EvalResult {
        match expr {
            Expr::Literal(text) => self.literal(text),
            Expr::Identifier(name) => self
                .idents
                .get(name.as_str())
                .cloned()
                .ok_or_else(|| EvalError::UnknownIdentifier(name.clone())),
            Expr::Unary { op, operand } => {
                let x = self.evaluate(operand)?;
                self.unary(*op, x)
            }
            Expr::Binary { op, left, right } => {
                let x = self.evaluate(left)?;
                let y = self.evaluate(right)?;
                self.binary(*op, x, y)
            }
            Expr::Call { callee, args } => self.call(callee, args),
            Expr::Unit { expr, unit } => self.unit(expr, unit),
        }
    }

    fn literal(&self, text: &str) -> EvalResult {
        let malformed = || EvalError::MalformedLiteral(text.to_owned());
        let digits = text.replace('_', "");
        let radix = match digits.get(..2) {
            Some("0x" | "0X") => 16,
            Some("0b" | "0B") => 2,
            Some("0o" | "0O") => 8,
            _ => 10,
        };
        if radix != 10 {
            let int = Integer::from_str_radix(&digits[2..], radix).map_err(|_| malformed())?;
            return Ok(self.float(int));
        }

        // "1." and ".5" are valid literals; spell them out in full.
        let (mantissa, exponent) = match digits.find(['e', 'E']) {
            Some(at) => digits.split_at(at),
            None => (digits.as_str(), ""),
        };
        let mut normalized = String::with_capacity(digits.len() + 2);
        if mantissa.starts_with('.') {
            normalized.push('0');
        }
        normalized.push_str(mantissa);
        if mantissa.ends_with('.') {
            normalized.push('0');
        }
        normalized.push_str(exponent);

        let parsed = Float::parse(&normalized).map_err(|_| malformed())?;
        Ok(Float::with_val_round(self.config.precision, parsed, Round::Nearest).0)
    }

    fn unary(&self, op: UnaryOp, x: Float) -> EvalResult {
        match op {
            UnaryOp::Plus => Ok(x),
            UnaryOp::Neg => Ok(-x),
            UnaryOp::Not => {
                let p = truncate(&x)?;
                Ok(self.float(!p))
            }
            UnaryOp::Xor | UnaryOp::And => Err(EvalError::InvalidUnaryOperator(op)),
        }
    }

    fn binary(&self, op: BinaryOp, x: Float, y: Float) -> EvalResult {
        match op {
            BinaryOp::Add => Ok(x + y),
            BinaryOp::Sub => Ok(x - y),
            BinaryOp::Mul => Ok(x * y),
            BinaryOp::Div => {
                if y.is_zero() {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(x / y)
            }
            BinaryOp::Pow => {
                let base = whole(&x)?;
                self.pow(base, truncate(&y)?)
            }
            BinaryOp::Shl => {
                let base = whole(&x)?;
                self.shl(base, shift_count(&truncate(&y)?)?)
            }
            BinaryOp::Shr => {
                let base = whole(&x)?;
                self.shr(base, shift_count(&truncate(&y)?)?)
            }
            BinaryOp::Rem | BinaryOp::And | BinaryOp::Or => {
                let p = truncate(&x)?;
                let q = truncate(&y)?;
                Ok(self.float(integer_op(op, p, q)?))
            }
            BinaryOp::AndNot
            | BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge
            | BinaryOp::LogicalAnd
            | BinaryOp::LogicalOr => Err(EvalError::InvalidBinaryOperator(op)),
        }
    }

    fn call(&self, callee: &Expr, args: &[Expr]) -> EvalResult {
        let Some(first) = args.first() else {
            return Err(EvalError::MissingArguments);
        };

        match callee {
            Expr::Identifier(name) => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.evaluate(arg)?.to_f64());
                }
                self.function(name, values[0])
            }
            // `1.(K)` lexes as a call on the literal `1.`
            Expr::Literal(_) => self.unit(callee, first),
            _ => Err(EvalError::InvalidCall),
        }
    }

    /// Builtins run in double precision.
    fn function(&self, name: &str, arg: f64) -> EvalResult {
        let result = match name {
            "sqrt" => arg.sqrt(),
            "sin" => arg.sin(),
            "cos" => arg.cos(),
            "tan" => arg.tan(),
            _ => return Err(EvalError::UnknownFunction(name.to_owned())),
        };
        if result.is_nan() {
            return Err(EvalError::UndefinedResult(name.to_owned()));
        }
        Ok(self.float(result))
    }

    fn unit(&self, expr: &Expr, unit: &Expr) -> EvalResult {
        let Expr::Identifier(unit) = unit else {
            return Err(EvalError::InvalidUnitTarget);
        };
        let x = self.evaluate(expr)?;
        let scale = *self
            .units
            .get(unit.as_str())
            .ok_or_else(|| EvalError::UnknownUnit(unit.clone()))?;
        if scale >= 0 {
            Ok(x * scale)
        } else {
            Ok(x / scale.unsigned_abs())
        }
    }

    /// `base^q` for a whole `base`. Non-positive exponents give 1. Results
    /// wider than [`MAX_INTEGER_BITS`] are rounded at the working precision.
    fn pow(&self, base: Float, q: Integer) -> EvalResult {
        if q <= 0 {
            return Ok(self.float(1));
        }
        let Some(exp) = q.to_u32() else {
            return if base == 0 || base == 1 {
                Ok(base)
            } else if base == -1 {
                Ok(if q.is_odd() { base } else { self.float(1) })
            } else {
                Err(EvalError::ExponentTooLarge)
            };
        };
        if integer_bits(&base).saturating_mul(u64::from(exp)) <= MAX_INTEGER_BITS {
            let p = truncate(&base)?;
            return Ok(self.float(p.pow(exp)));
        }
        in_range(base.pow(exp))
    }

    fn shl(&self, base: Float, count: u32) -> EvalResult {
        if integer_bits(&base).saturating_add(u64::from(count)) <= MAX_INTEGER_BITS {
            let p = truncate(&base)?;
            return Ok(self.float(p << count));
        }
        in_range(base << count)
    }

    /// Arithmetic shift: rounds toward negative infinity.
    fn shr(&self, base: Float, count: u32) -> EvalResult {
        if integer_bits(&base) <= MAX_INTEGER_BITS {
            let p = truncate(&base)?;
            return Ok(self.float(p >> count));
        }
        Ok((base >> count).floor())
    }
}

/// `x` rounded toward zero, kept as a float.
fn whole(x: &Float) -> EvalResult {
    if x.is_finite() {
        Ok(x.clone().trunc())
    } else {
        Err(EvalError::NotFinite)
    }
}

/// Bits needed for the integer part of `x`.
fn integer_bits(x: &Float) -> u64 {
    x.get_exp()
        .and_then(|exp| u64::try_from(exp).ok())
        .unwrap_or(0)
}

/// Integer part of `x`, rounding toward zero.
fn truncate(x: &Float) -> Result<Integer, EvalError> {
    if integer_bits(x) > MAX_INTEGER_BITS {
        return Err(EvalError::IntegerTooLarge {
            max: MAX_INTEGER_BITS,
        });
    }
    x.to_integer_round(Round::Zero)
        .map(|(int, _)| int)
        .ok_or(EvalError::NotFinite)
}

fn in_range(x: Float) -> EvalResult {
    if x.is_finite() {
        Ok(x)
    } else {
        Err(EvalError::Overflow)
    }
}

fn integer_op(op: BinaryOp, p: Integer, q: Integer) -> Result<Integer, EvalError> {
    match op {
        BinaryOp::Rem => {
            if q == 0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(p.div_rem_euc(q).1)
        }
        BinaryOp::And => Ok(p & q),
        BinaryOp::Or => Ok(p | q),
        _ => Err(EvalError::InvalidBinaryOperator(op)),
    }
}

/// Shift counts wrap modulo 2^32; negative counts are rejected.
fn shift_count(q: &Integer) -> Result<u32, EvalError> {
    if *q < 0 {
        return Err(EvalError::NegativeShiftCount);
    }
    Ok(q.to_u32_wrapping())
}
