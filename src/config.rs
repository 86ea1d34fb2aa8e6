//! Fixed parameters of the calculator.
//!
//! Everything here is read once when a [`Calculator`](crate::Calculator) is
//! built. The tables are plain `const` data so they can be inspected by tests
//! and by the preprocessor without constructing anything.

use crate::error::ConfigError;

/// Working precision of every intermediate value, in mantissa bits.
pub const DEFAULT_PRECISION: u32 = 128;

/// Lowest working precision accepted by [`Config::with_precision`].
pub const MIN_PRECISION: u32 = 72;

/// Highest working precision accepted by [`Config::with_precision`].
pub const MAX_PRECISION: u32 = 1 << 20;

/// Widest exact integer the integer operators will build. Powers and left
/// shifts whose result would be wider are computed in floating point at the
/// working precision instead.
pub const MAX_INTEGER_BITS: u64 = 1 << 24;

/// Integers wider than this are shown through the float branch instead of
/// the decimal/hex/binary triple.
pub const SHOW_MAX_BITS: u32 = 300;

/// Unit suffixes and their scale.
///
/// Positive entries multiply the annotated value. Negative entries divide it
/// by their absolute value.
pub const UNITS: [(&str, i64); 10] = [
    ("K", 1 << 10),           // kibi
    ("M", 1 << 20),           // mebi
    ("G", 1 << 30),           // gibi
    ("T", 1 << 40),           // tebi
    ("k", 1_000),             // kilo
    ("m", 1_000_000),         // mega
    ("g", 1_000_000_000),     // giga
    ("t", 1_000_000_000_000), // tera
    ("u", -1_000_000),        // micro
    ("n", -1_000_000_000),    // nano
];

/// Literal rewrites applied to the raw line before anything else, in order.
pub const SUBSTITUTIONS: [(&str, &str); 3] = [
    ("~", "!"),  // complement
    ("**", "^"), // power
    ("pi", "3.14159265358979323846264338327950288419716939937510582097494"),
];

/// Runtime settings of a calculator session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Mantissa bits of every value.
    pub precision: u32,
    /// Widest integer rendered in three bases.
    pub show_max_bits: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            show_max_bits: SHOW_MAX_BITS,
        }
    }
}

impl Config {
    /// Returns a copy with a different working precision.
    pub fn with_precision(self, precision: u32) -> Result<Self, ConfigError> {
        if precision < MIN_PRECISION {
            return Err(ConfigError::PrecisionTooLow {
                requested: precision,
                minimum: MIN_PRECISION,
            });
        }
        if precision > MAX_PRECISION {
            return Err(ConfigError::PrecisionTooHigh {
                requested: precision,
                maximum: MAX_PRECISION,
            });
        }
        Ok(Self { precision, ..self })
    }

    /// Returns a copy with a different display cap.
    pub fn with_show_max_bits(self, show_max_bits: u32) -> Self {
        Self {
            show_max_bits,
            ..self
        }
    }
}
