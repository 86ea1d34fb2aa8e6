//! Rendering of evaluated values.
//!
//! Exact integers get three views: grouped decimal, grouped hex and grouped
//! binary. Negative integers that fit a 32- or 64-bit register show their
//! two's-complement bit pattern in hex and binary; wider ones show a minus
//! sign and the magnitude. Anything else is printed as the shortest decimal
//! that reads back to the same value, positional for moderate exponents and
//! scientific otherwise.

use rug::{Float, Integer};

/// A rendered result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Integer {
        decimal: String,
        hex: String,
        binary: String,
    },
    Fraction(String),
}

impl Answer {
    /// The display strings in order.
    pub fn parts(&self) -> Vec<&str> {
        match self {
            Answer::Integer {
                decimal,
                hex,
                binary,
            } => vec![decimal.as_str(), hex.as_str(), binary.as_str()],
            Answer::Fraction(text) => vec![text.as_str()],
        }
    }
}

/// Renders `value`. Integers wider than `max_bits` fall back to the float
/// form.
pub fn format(value: &Float, max_bits: u32) -> Answer {
    match exact_integer(value) {
        Some(int) if int.significant_bits() <= max_bits => format_integer(int),
        _ => Answer::Fraction(shortest_decimal(value)),
    }
}

fn exact_integer(value: &Float) -> Option<Integer> {
    if value.is_integer() {
        value.to_integer()
    } else {
        None
    }
}

fn format_integer(int: Integer) -> Answer {
    let decimal = group(&int.to_string_radix(10), ',', 3);

    let (minus, bits) = if int < 0 {
        match int.significant_bits() {
            0..=32 => ("", int + (Integer::from(1) << 32u32)),
            33..=64 => ("", int + (Integer::from(1) << 64u32)),
            _ => ("-", int.abs()),
        }
    } else {
        ("", int)
    };

    Answer::Integer {
        decimal,
        hex: format!("{minus}0x{}", group(&bits.to_string_radix(16), '_', 4)),
        binary: format!("{minus}0b{}", group(&bits.to_string_radix(2), '_', 8)),
    }
}

fn shortest_decimal(value: &Float) -> String {
    let Some((negative, digits, exp)) = shortest_digits(value) else {
        return value.to_string();
    };
    let mut out = String::with_capacity(digits.len() + 8);
    if negative {
        out.push('-');
    }
    // `value = 0.digits * 10^exp`
    let sci = exp - 1;
    if !(-4..6).contains(&sci) {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let sign = if sci < 0 { '-' } else { '+' };
        out.push_str(&format!("e{sign}{:02}", sci.unsigned_abs()));
    } else if exp <= 0 {
        out.push_str("0.");
        out.push_str(&"0".repeat(exp.unsigned_abs() as usize));
        out.push_str(&digits);
    } else {
        let int_len = exp.unsigned_abs() as usize;
        if digits.len() <= int_len {
            out.push_str(&digits);
            out.push_str(&"0".repeat(int_len - digits.len()));
        } else {
            out.push_str(&digits[..int_len]);
            out.push('.');
            out.push_str(&digits[int_len..]);
        }
    }
    out
}

/// Fewest significant digits that round back to `value` at its precision.
/// `None` for zero, infinities and NaN.
fn shortest_digits(value: &Float) -> Option<(bool, String, i32)> {
    if !value.is_normal() {
        return None;
    }
    // Enough digits always round-trip.
    let most = (f64::from(value.prec()) * std::f64::consts::LOG10_2).ceil() as usize + 1;
    let (mut lo, mut hi) = (1, most);
    while lo < hi {
        let mid = (lo + hi) / 2;
        if round_trips(value, mid) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    let (negative, digits, exp) = value.to_sign_string_exp(10, Some(hi));
    let digits = digits.trim_end_matches('0');
    Some((negative, digits.to_owned(), exp?))
}

fn round_trips(value: &Float, n: usize) -> bool {
    let (negative, digits, exp) = value.to_sign_string_exp(10, Some(n));
    let Some(exp) = exp else {
        return false;
    };
    let sign = if negative { "-" } else { "" };
    Float::parse(format!("{sign}0.{digits}e{exp}"))
        .map(|parsed| Float::with_val(value.prec(), parsed) == *value)
        .unwrap_or(false)
}

/// Inserts `sep` every `n` digits counting from the right. A leading `-`
/// stays attached to its digit.
pub fn group(digits: &str, sep: char, n: usize) -> String {
    let mut reversed = String::with_capacity(digits.len() + digits.len() / n);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % n == 0 && c != '-' {
            reversed.push(sep);
        }
        reversed.push(c);
    }
    reversed.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SHOW_MAX_BITS;

    fn answer(value: impl Into<Integer>) -> Answer {
        format(&Float::with_val(128, value.into()), SHOW_MAX_BITS)
    }

    fn integer(decimal: &str, hex: &str, binary: &str) -> Answer {
        Answer::Integer {
            decimal: decimal.into(),
            hex: hex.into(),
            binary: binary.into(),
        }
    }

    #[test]
    fn grouping() {
        assert_eq!(group("1234567", ',', 3), "1,234,567");
        assert_eq!(group("123", ',', 3), "123");
        assert_eq!(group("-123", ',', 3), "-123");
        assert_eq!(group("-1234", ',', 3), "-1,234");
        assert_eq!(group("ffffffff", '_', 4), "ffff_ffff");
        assert_eq!(group("", ',', 3), "");
    }

    #[test]
    fn grouping_strips_back_to_the_original() {
        for digits in ["1", "12", "123", "1234", "-98765432101234567890"] {
            let grouped = group(digits, ',', 3);
            assert_eq!(grouped.replace(',', ""), digits);
        }
    }

    #[test]
    fn small_positive() {
        assert_eq!(answer(4), integer("4", "0x4", "0b100"));
        assert_eq!(answer(0), integer("0", "0x0", "0b0"));
        assert_eq!(
            answer(1024),
            integer("1,024", "0x400", "0b100_00000000")
        );
    }

    #[test]
    fn negative_fits_32_bits() {
        assert_eq!(
            answer(-1),
            integer(
                "-1",
                "0xffff_ffff",
                "0b11111111_11111111_11111111_11111111"
            )
        );
        let Answer::Integer { hex, .. } = answer(-(1i64 << 31)) else {
            panic!("expected integer answer");
        };
        assert_eq!(hex, "0x8000_0000");
    }

    #[test]
    fn negative_fits_64_bits() {
        let Answer::Integer { decimal, hex, binary } = answer(-(1i64 << 40)) else {
            panic!("expected integer answer");
        };
        assert_eq!(decimal, "-1,099,511,627,776");
        assert_eq!(hex, "0xffff_ff00_0000_0000");
        assert_eq!(binary.len(), "0b".len() + 64 + 7);

        let Answer::Integer { hex, .. } = answer(-(1i64 << 32)) else {
            panic!("expected integer answer");
        };
        assert_eq!(hex, "0xffff_ffff_0000_0000");
    }

    #[test]
    fn wide_negative_keeps_its_sign() {
        let value = -(Integer::from(1) << 64u32);
        let Answer::Integer { hex, binary, .. } = answer(value) else {
            panic!("expected integer answer");
        };
        assert_eq!(hex, "-0x1_0000_0000_0000_0000");
        assert!(binary.starts_with("-0b1_00000000"));
    }

    #[test]
    fn display_cap() {
        let at_cap = Integer::from(1) << (SHOW_MAX_BITS - 1);
        assert!(matches!(answer(at_cap), Answer::Integer { .. }));
        let over_cap = Integer::from(1) << SHOW_MAX_BITS;
        assert!(matches!(answer(over_cap), Answer::Fraction(_)));
    }

    fn fraction(value: Float) -> String {
        match format(&value, SHOW_MAX_BITS) {
            Answer::Fraction(text) => text,
            other => panic!("expected fraction, got {other:?}"),
        }
    }

    fn decimal(text: &str) -> Float {
        Float::with_val(128, Float::parse(text).unwrap())
    }

    #[test]
    fn fractions_use_the_shortest_digits() {
        assert_eq!(fraction(Float::with_val(128, 0.25)), "0.25");
        assert_eq!(fraction(Float::with_val(128, -1.5)), "-1.5");
        assert_eq!(fraction(decimal("0.1")), "0.1");
        assert_eq!(fraction(decimal("0.001")), "0.001");
        assert_eq!(fraction(decimal("123.456")), "123.456");
    }

    #[test]
    fn fractions_switch_to_scientific_outside_the_positional_range() {
        assert_eq!(fraction(decimal("1e-5")), "1e-05");
        assert_eq!(fraction(decimal("0.0001")), "0.0001");
        assert_eq!(fraction(decimal("1234567.5")), "1.2345675e+06");
        assert_eq!(fraction(decimal("123456.5")), "123456.5");
    }

    #[test]
    fn fractions_read_back_exactly() {
        let third: Float = Float::with_val(128, 1) / 3;
        let text = fraction(third.clone());
        assert!(text.starts_with("0.3333333333"), "{text}");
        assert_eq!(decimal(&text), third);
        assert_eq!(format(&third, SHOW_MAX_BITS).parts(), vec![text.as_str()]);
    }

    #[test]
    fn wide_integers_print_in_scientific_form() {
        let text = fraction(Float::with_val(128, Integer::from(1) << 400u32));
        assert!(text.starts_with("2.5822498780869"), "{text}");
        assert!(text.ends_with("e+120"), "{text}");
    }
}
