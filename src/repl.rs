//! Interactive front end.
//!
//! Reads lines with rustyline, answers them, and prints the answer parts on
//! as few terminal lines as fit. Lines starting with `:` are session commands:
//!
//! - `:precision N` rebuilds the calculator at `N` bits
//! - `:ast` toggles printing the parsed tree
//! - `:help` lists the commands

use std::path::PathBuf;

use anyhow::Result;
use colored::*;
use rustyline::{error::ReadlineError, Config as EditorConfig, DefaultEditor};
use tracing::{debug, warn};

use crate::config::{Config, MAX_PRECISION, MIN_PRECISION};
use crate::error::SyntaxError;
use crate::eval::Calculator;
use crate::format::{format, Answer};
use crate::{parse_line, preprocess};

const PROMPT: &str = "> ";
const ANSWER_PROMPT: &str = "=> ";
const HISTORY_FILE: &str = ".linecalc_history";
const DEFAULT_WIDTH: usize = 80;

const HELP: &str = "\
Operators: + - * / % ^ ** << >> & | ! ~
Functions: sqrt sin cos tan
Units:     K M G T (binary)  k m g t (decimal)  u n (divisors)
Constants: pi e
Commands:  :precision N   :ast   :help";

struct Colours {
    integer: (u8, u8, u8),
    fraction: (u8, u8, u8),
    tree: (u8, u8, u8),
    carat: (u8, u8, u8),
    error: (u8, u8, u8),
    message: (u8, u8, u8),
}

const COLOURS: Colours = Colours {
    integer: (0xB4, 0xB4, 0xB4),  // Light gray
    fraction: (0x8C, 0x64, 0x8C), // Muted purple
    tree: (0x8C, 0x8C, 0xB4),     // Muted blue
    carat: (0xFF, 0x14, 0x00),    // Bright red
    error: (0xDC, 0x64, 0x5A),    // Soft red
    message: (0x78, 0xB4, 0x78),  // Soft green
};

/// What the REPL should show for one line.
#[derive(Debug, PartialEq)]
pub enum Reply {
    Answer {
        tree: Option<String>,
        answer: Answer,
    },
    Message(String),
    Error {
        message: String,
        /// Column of a syntax error in the line as typed.
        column: Option<usize>,
    },
}

/// Session state: the current calculator and display toggles.
pub struct Session {
    calc: Calculator,
    show_ast: bool,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            calc: Calculator::new(config),
            show_ast: false,
        }
    }

    pub fn config(&self) -> &Config {
        self.calc.config()
    }

    /// Handles one non-empty line.
    pub fn process_line(&mut self, line: &str) -> Reply {
        if let Some(command) = line.trim_start().strip_prefix(':') {
            return self.command(command);
        }

        let tree = match parse_line(line) {
            Ok(tree) => tree,
            Err(err) => return syntax_reply(line, &err),
        };
        let rendered = self.show_ast.then(|| format!("{tree:#?}"));
        match self.calc.evaluate(&tree) {
            Ok(value) => Reply::Answer {
                tree: rendered,
                answer: format(&value, self.config().show_max_bits),
            },
            Err(err) => Reply::Error {
                message: err.to_string(),
                column: None,
            },
        }
    }

    fn command(&mut self, input: &str) -> Reply {
        let input = input.trim();
        let (name, arg) = match input.split_once(|c: char| c.is_ascii_whitespace()) {
            Some((name, arg)) => (name, arg.trim()),
            None => (input, ""),
        };

        match name {
            s if s.eq_ignore_ascii_case("precision") => {
                if arg.is_empty() {
                    return Reply::Message(format!(
                        "Precision is {} bits.",
                        self.config().precision
                    ));
                }
                let bits = match arg.parse::<u32>() {
                    Ok(bits) => bits,
                    Err(_) => {
                        return error(format!(
                            "Precision must be a whole number of bits ({MIN_PRECISION} to {MAX_PRECISION})!"
                        ))
                    }
                };
                match self.config().with_precision(bits) {
                    Ok(config) => {
                        self.calc = Calculator::new(config);
                        Reply::Message(format!("Precision set to {bits} bits."))
                    }
                    Err(err) => error(err.to_string()),
                }
            }
            s if s.eq_ignore_ascii_case("ast") => {
                self.show_ast = !self.show_ast;
                Reply::Message(format!(
                    "Tree display {}",
                    if self.show_ast { "enabled" } else { "disabled" }
                ))
            }
            s if s.eq_ignore_ascii_case("help") => Reply::Message(HELP.to_owned()),
            _ => error("Unknown command!".to_owned()),
        }
    }
}

fn error(message: String) -> Reply {
    Reply::Error {
        message,
        column: None,
    }
}

/// The caret is only meaningful when preprocessing left the line untouched.
fn syntax_reply(line: &str, err: &SyntaxError) -> Reply {
    let column = (preprocess(line) == line).then(|| err.position());
    Reply::Error {
        message: err.to_string(),
        column,
    }
}

/// Lays out answer parts after the answer prompt, keeping parts on one line
/// while they fit in `width` columns. Continuation lines are indented under
/// the first part.
pub fn layout(parts: &[&str], width: usize) -> Vec<String> {
    let indent = " ".repeat(ANSWER_PROMPT.len());
    let mut rows: Vec<String> = Vec::new();
    let mut col = 0;
    for (i, part) in parts.iter().enumerate() {
        let lead = if i == 0 { ANSWER_PROMPT } else { indent.as_str() };
        let piece = format!("{lead}{part}");
        let len = piece.chars().count();
        match rows.last_mut() {
            Some(row) if col + len < width => {
                row.push_str(&piece);
                col += len;
            }
            _ => {
                rows.push(piece);
                col = len;
            }
        }
    }
    rows
}

fn print_reply(reply: &Reply) {
    match reply {
        Reply::Answer { tree, answer } => {
            if let Some(tree) = tree {
                println!("{}", tree.truecolor(COLOURS.tree.0, COLOURS.tree.1, COLOURS.tree.2));
            }
            let colour = match answer {
                Answer::Integer { .. } => COLOURS.integer,
                Answer::Fraction(_) => COLOURS.fraction,
            };
            let width = termion::terminal_size()
                .map(|(w, _)| w as usize)
                .unwrap_or(DEFAULT_WIDTH);
            for row in layout(&answer.parts(), width) {
                let (lead, rest) = row.split_at(ANSWER_PROMPT.len());
                println!("{}{}", lead.bold(), rest.truecolor(colour.0, colour.1, colour.2));
            }
        }
        Reply::Message(msg) => println!(
            "{}",
            msg.truecolor(COLOURS.message.0, COLOURS.message.1, COLOURS.message.2)
        ),
        Reply::Error { message, column } => {
            if let Some(pos) = column {
                println!(
                    "{}{}",
                    " ".repeat(PROMPT.len() + pos),
                    "^".truecolor(COLOURS.carat.0, COLOURS.carat.1, COLOURS.carat.2)
                );
            }
            println!(
                "{}",
                message.truecolor(COLOURS.error.0, COLOURS.error.1, COLOURS.error.2)
            );
        }
    }
}

fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(HISTORY_FILE))
}

/// Runs the interactive loop until an empty line, Ctrl-C or end of input.
pub fn run(config: Config) -> Result<()> {
    let editor_config = EditorConfig::builder().build();
    let mut rl = DefaultEditor::with_config(editor_config)?;
    let history = history_path();
    if let Some(path) = &history {
        if rl.load_history(path).is_err() {
            debug!(path = %path.display(), "no history loaded");
        }
    }

    let mut session = Session::new(config);

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    println!("Goodbye!");
                    break;
                }
                rl.add_history_entry(line.as_str())?;
                debug!(line = %line, "processing input");
                print_reply(&session.process_line(&line));
            }
            Err(ReadlineError::Interrupted) => {
                println!("Goodbye!");
                break;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("{:?}", err);
                break;
            }
        }
    }

    if let Some(path) = &history {
        if let Err(err) = rl.save_history(path) {
            warn!(path = %path.display(), %err, "could not save history");
        }
    }
    Ok(())
}
