//! Precedence-climbing parser from tokens to [`Expr`].
//!
//! Binding, loosest first. Every binary level is left associative; `^`
//! (power) sits with the additive operators, so `2*3^2` is `(2*3)^2`.
//!
//! ```text
//! ||
//! &&
//! == != < <= > >=
//! + - | ^
//! * / % << >> & &^
//! prefix + - ! ^ &
//! postfix f(a, b)  x.(u)
//! ```

use std::ops::Range;

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::SyntaxError;
use crate::lexer::{tokenize, Token};

/// Maximum nesting of prefix operators and parentheses.
pub const MAX_DEPTH: usize = 256;

/// Parses one complete expression.
pub fn parse(input: &str) -> Result<Expr, SyntaxError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        end: input.len(),
    };
    let expr = parser.parse_binary(1)?;
    match parser.peek() {
        None => Ok(expr),
        Some((token, span)) => Err(SyntaxError::UnexpectedToken {
            found: token.to_string(),
            pos: span.start,
        }),
    }
}

struct Parser {
    tokens: Vec<(Token, Range<usize>)>,
    pos: usize,
    depth: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&(Token, Range<usize>)> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.peek().map(|(t, _)| t)
    }

    fn next(&mut self) -> Option<(Token, Range<usize>)> {
        let item = self.tokens.get(self.pos).cloned();
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    fn unexpected(&self, item: Option<(Token, Range<usize>)>) -> SyntaxError {
        match item {
            Some((token, span)) => SyntaxError::UnexpectedToken {
                found: token.to_string(),
                pos: span.start,
            },
            None => SyntaxError::UnexpectedEnd { pos: self.end },
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), SyntaxError> {
        match self.next() {
            Some((token, _)) if token == expected => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    fn peek_binary(&self) -> Option<BinaryOp> {
        let op = match self.peek_token()? {
            Token::Plus => BinaryOp::Add,
            Token::Minus => BinaryOp::Sub,
            Token::Star => BinaryOp::Mul,
            Token::Slash => BinaryOp::Div,
            Token::Percent => BinaryOp::Rem,
            Token::Caret => BinaryOp::Pow,
            Token::Shl => BinaryOp::Shl,
            Token::Shr => BinaryOp::Shr,
            Token::Amp => BinaryOp::And,
            Token::Pipe => BinaryOp::Or,
            Token::AmpCaret => BinaryOp::AndNot,
            Token::EqEq => BinaryOp::Eq,
            Token::NotEq => BinaryOp::Ne,
            Token::Lt => BinaryOp::Lt,
            Token::Le => BinaryOp::Le,
            Token::Gt => BinaryOp::Gt,
            Token::Ge => BinaryOp::Ge,
            Token::AndAnd => BinaryOp::LogicalAnd,
            Token::OrOr => BinaryOp::LogicalOr,
            _ => return None,
        };
        Some(op)
    }

    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.peek_binary() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.pos += 1;
            let right = self.parse_binary(prec + 1)?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, SyntaxError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            let pos = self.peek().map_or(self.end, |(_, span)| span.start);
            return Err(SyntaxError::TooDeep {
                max: MAX_DEPTH,
                pos,
            });
        }
        let op = match self.peek_token() {
            Some(Token::Plus) => Some(UnaryOp::Plus),
            Some(Token::Minus) => Some(UnaryOp::Neg),
            Some(Token::Bang) => Some(UnaryOp::Not),
            Some(Token::Caret) => Some(UnaryOp::Xor),
            Some(Token::Amp) => Some(UnaryOp::And),
            _ => None,
        };
        let expr = match op {
            Some(op) => {
                self.pos += 1;
                Expr::unary(op, self.parse_unary()?)
            }
            None => self.parse_postfix()?,
        };
        self.depth -= 1;
        Ok(expr)
    }

    fn parse_postfix(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_token() {
                Some(Token::LParen) => {
                    self.pos += 1;
                    let args = self.parse_args()?;
                    expr = Expr::call(expr, args);
                }
                Some(Token::Dot) => {
                    self.pos += 1;
                    self.expect(Token::LParen)?;
                    let unit = self.parse_binary(1)?;
                    self.expect(Token::RParen)?;
                    expr = Expr::unit(expr, unit);
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Arguments after the opening parenthesis, through the closing one.
    fn parse_args(&mut self) -> Result<Vec<Expr>, SyntaxError> {
        let mut args = Vec::new();
        if self.peek_token() == Some(&Token::RParen) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.parse_binary(1)?);
            match self.next() {
                Some((Token::Comma, _)) => continue,
                Some((Token::RParen, _)) => return Ok(args),
                other => return Err(self.unexpected(other)),
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        match self.next() {
            Some((Token::Number(text), _)) => Ok(Expr::Literal(text)),
            Some((Token::Ident(name), _)) => Ok(Expr::Identifier(name)),
            Some((Token::LParen, _)) => {
                let expr = self.parse_binary(1)?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            other => Err(self.unexpected(other)),
        }
    }
}
