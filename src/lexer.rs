//! Tokens of the calculator syntax, generated with logos.

use std::fmt;
use std::ops::Range;

use logos::Logos;

use crate::error::SyntaxError;

fn text(lex: &mut logos::Lexer<Token>) -> String {
    lex.slice().to_owned()
}

#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    /// Numeric literal exactly as written: `12`, `1.5`, `1.`, `.5`, `2e10`,
    /// `0xff`, `0b1010`, `0o17`, with optional `_` separators.
    #[regex(r"0[xX][0-9a-fA-F_]+", text)]
    #[regex(r"0[bB][01_]+", text)]
    #[regex(r"0[oO][0-7_]+", text)]
    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9]+)?", text)]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", text)]
    Number(String),
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", text)]
    Ident(String),
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("&^")]
    AmpCaret,
    #[token("!")]
    Bang,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token(">")]
    Gt,
    #[token(">=")]
    Ge,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Token::Number(n) => return write!(f, "number {n}"),
            Token::Ident(name) => return write!(f, "name {name}"),
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Caret => "^",
            Token::Shl => "<<",
            Token::Shr => ">>",
            Token::Amp => "&",
            Token::Pipe => "|",
            Token::AmpCaret => "&^",
            Token::Bang => "!",
            Token::EqEq => "==",
            Token::NotEq => "!=",
            Token::Lt => "<",
            Token::Le => "<=",
            Token::Gt => ">",
            Token::Ge => ">=",
            Token::AndAnd => "&&",
            Token::OrOr => "||",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Comma => ",",
            Token::Dot => ".",
        };
        write!(f, "'{symbol}'")
    }
}

/// Splits `input` into tokens with their byte spans.
pub fn tokenize(input: &str) -> Result<Vec<(Token, Range<usize>)>, SyntaxError> {
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(input).spanned() {
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                return Err(SyntaxError::UnexpectedCharacter {
                    found: input[span.clone()].to_owned(),
                    pos: span.start,
                })
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        tokenize(input)
            .expect("tokenize should succeed")
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn numbers_keep_their_text() {
        assert_eq!(
            kinds("12 1.5 .5 2e10 0xff 0b1010 1_000"),
            vec![
                Token::Number("12".into()),
                Token::Number("1.5".into()),
                Token::Number(".5".into()),
                Token::Number("2e10".into()),
                Token::Number("0xff".into()),
                Token::Number("0b1010".into()),
                Token::Number("1_000".into()),
            ]
        );
    }

    #[test]
    fn trailing_dot_belongs_to_the_number() {
        assert_eq!(
            kinds("1.(K)"),
            vec![
                Token::Number("1.".into()),
                Token::LParen,
                Token::Ident("K".into()),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn second_dot_is_a_separate_token() {
        assert_eq!(
            kinds("1.5.(m)"),
            vec![
                Token::Number("1.5".into()),
                Token::Dot,
                Token::LParen,
                Token::Ident("m".into()),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn multi_char_operators() {
        assert_eq!(
            kinds("1<<2>>3&^4&&5||6<=7"),
            vec![
                Token::Number("1".into()),
                Token::Shl,
                Token::Number("2".into()),
                Token::Shr,
                Token::Number("3".into()),
                Token::AmpCaret,
                Token::Number("4".into()),
                Token::AndAnd,
                Token::Number("5".into()),
                Token::OrOr,
                Token::Number("6".into()),
                Token::Le,
                Token::Number("7".into()),
            ]
        );
    }

    #[test]
    fn spans_are_byte_offsets() {
        let tokens = tokenize("  sqrt (4)").unwrap();
        assert_eq!(tokens[0].1, 2..6);
        assert_eq!(tokens[1].1, 7..8);
    }

    #[test]
    fn unknown_character_is_reported() {
        let err = tokenize("1 $ 2").unwrap_err();
        assert_eq!(
            err,
            SyntaxError::UnexpectedCharacter {
                found: "$".into(),
                pos: 2
            }
        );
    }
}
