use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use colored::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use linecalc::config::{Config, DEFAULT_PRECISION, SHOW_MAX_BITS};
use linecalc::{answer, repl, Calculator};

/// Arbitrary-precision calculator. Integer answers are shown in grouped
/// decimal, hexadecimal and binary.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Working precision in mantissa bits.
    #[arg(short, long, default_value_t = DEFAULT_PRECISION)]
    precision: u32,

    /// Widest integer, in bits, shown in all three bases.
    #[arg(short, long, default_value_t = SHOW_MAX_BITS)]
    max_bits: u32,

    /// Expression to evaluate once. Starts the interactive prompt when empty.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    expr: Vec<String>,
}

fn main() -> ExitCode {
    // RUST_LOG filter, stderr output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let config = Config::default()
        .with_precision(args.precision)?
        .with_show_max_bits(args.max_bits);

    if args.expr.is_empty() {
        repl::run(config)?;
        return Ok(ExitCode::SUCCESS);
    }

    let calc = Calculator::new(config);
    match answer(&calc, &args.expr.join(" ")) {
        Ok(ans) => {
            for part in ans.parts() {
                println!("{part}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", err.to_string().truecolor(0xDC, 0x64, 0x5A));
            Ok(ExitCode::FAILURE)
        }
    }
}
