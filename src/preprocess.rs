//! Text rewrites applied before parsing.
//!
//! Aliases and constants are replaced literally. A unit suffix glued to a
//! number becomes a unit annotation, `1K` → `1.(K)`, which the evaluator
//! resolves through the unit table.

use std::sync::OnceLock;

use regex::Regex;
use tracing::trace;

use crate::config::{SUBSTITUTIONS, UNITS};

const NUMBER: &str = concat!(
    r"0[xX][0-9a-fA-F_]+",
    r"|0[bB][01_]+",
    r"|0[oO][0-7_]+",
    r"|(?:[0-9][0-9_]*(?:\.[0-9_]*)?|\.[0-9][0-9_]*)(?:[eE][+-]?[0-9]+)?",
);

fn unit_suffix() -> &'static Regex {
    static UNIT_SUFFIX: OnceLock<Regex> = OnceLock::new();
    UNIT_SUFFIX.get_or_init(|| {
        let units = UNITS
            .iter()
            .map(|(unit, _)| regex::escape(unit))
            .collect::<Vec<_>>()
            .join("|");
        // The number must not continue a name or another number.
        let pattern = format!(r"(^|[^\w.])({NUMBER})({units})\b");
        Regex::new(&pattern).expect("unit suffix pattern is valid")
    })
}

/// Rewrites shorthand in a raw input line into parser syntax.
pub fn preprocess(raw: &str) -> String {
    let mut line = raw.to_owned();
    for (from, to) in SUBSTITUTIONS {
        if line.contains(from) {
            line = line.replace(from, to);
        }
    }
    let line = unit_suffix().replace_all(&line, "${1}${2}.(${3})").into_owned();
    trace!(raw, preprocessed = %line, "preprocess");
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_are_replaced() {
        assert_eq!(preprocess("2**3"), "2^3");
        assert_eq!(preprocess("~5"), "!5");
    }

    #[test]
    fn pi_expands_to_digits() {
        assert!(preprocess("pi").starts_with("3.14159265358979323846"));
    }

    #[test]
    fn unit_suffix_becomes_annotation() {
        assert_eq!(preprocess("1K"), "1.(K)");
        assert_eq!(preprocess("1.5m"), "1.5.(m)");
        assert_eq!(preprocess("0x10G + 3u"), "0x10.(G) + 3.(u)");
        assert_eq!(preprocess("2e3k"), "2e3.(k)");
    }

    #[test]
    fn every_unit_is_recognised() {
        for (unit, _) in UNITS {
            assert_eq!(preprocess(&format!("7{unit}")), format!("7.({unit})"));
        }
    }

    #[test]
    fn identifiers_are_left_alone() {
        assert_eq!(preprocess("a1k"), "a1k");
        assert_eq!(preprocess("1kb"), "1kb");
        assert_eq!(preprocess("sqrt(4) + tan(1)"), "sqrt(4) + tan(1)");
        assert_eq!(preprocess("unknownvar+1"), "unknownvar+1");
    }

    #[test]
    fn number_must_start_a_token() {
        assert_eq!(preprocess("x1.5m"), "x1.5m");
        assert_eq!(preprocess("1.2.5k"), "1.2.5k");
        assert_eq!(preprocess(".5k"), ".5.(k)");
        assert_eq!(preprocess("2*.5k"), "2*.5.(k)");
        assert_eq!(preprocess("1K+2K"), "1.(K)+2.(K)");
        assert_eq!(preprocess("(3M)"), "(3.(M))");
    }

    #[test]
    fn suffix_must_touch_the_number() {
        assert_eq!(preprocess("1 K"), "1 K");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(preprocess("(1+2)*3 << 4"), "(1+2)*3 << 4");
    }
}
