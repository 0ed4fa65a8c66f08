//! Boolean conditions of `if`/`elif` blocks.
//!
//! ```text
//! expr  := and ('||' and)*
//! and   := unary ('&&'? unary)*
//! unary := '!' unary | '(' expr ')' | test
//! test  := OPT ('|' OPT)* DIM | DIM '=' OPT ('|' OPT)*
//! ```
//!
//! Juxtaposed tests are conjunctive, so the dimensions form
//! `int|long key obj value` is a valid condition.

use std::fmt;

use crate::context::Context;
use crate::error::GenError;
use crate::lexer::{lex, Spanned, Token};
use crate::options::DimOption;

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The dimension is bound to one of the options.
    Test { dim: String, options: Vec<DimOption> },
    Not(Box<Condition>),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    pub fn parse(src: &str) -> Result<Condition, GenError> {
        let tokens = lex(src)?;
        let mut parser = Parser {
            src,
            tokens: &tokens,
            pos: 0,
        };
        let cond = parser.parse_expr()?;
        if parser.peek() != &Token::Eof {
            return Err(parser.err(format!("unexpected {:?} after condition", parser.peek())));
        }
        Ok(cond)
    }

    /// Parse a condition found at `offset` of `template` and check that every
    /// dimension it tests exists in `context`. Errors point at `offset`.
    pub fn parse_checked(
        src: &str,
        context: &Context,
        template: &str,
        offset: usize,
    ) -> Result<Condition, GenError> {
        let cond = Condition::parse(src).map_err(|e| match e {
            GenError::Malformed(m) => GenError::malformed(
                template,
                offset,
                format!("{} in condition `{}`", m.message, src.trim()),
            ),
            other => other,
        })?;
        let mut dims = Vec::new();
        cond.collect_dims(&mut dims);
        if let Some(missing) = dims.into_iter().find(|d| context.get(d).is_none()) {
            return Err(GenError::malformed(
                template,
                offset,
                format!("Nonexistent dimension: {missing}, available dims: {context}"),
            ));
        }
        Ok(cond)
    }

    pub fn check(&self, context: &Context) -> bool {
        match self {
            Condition::Test { dim, options } => {
                context.get(dim).is_some_and(|o| options.contains(o))
            }
            Condition::Not(c) => !c.check(context),
            Condition::And(a, b) => a.check(context) && b.check(context),
            Condition::Or(a, b) => a.check(context) || b.check(context),
        }
    }

    fn collect_dims<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Condition::Test { dim, .. } => out.push(dim),
            Condition::Not(c) => c.collect_dims(out),
            Condition::And(a, b) | Condition::Or(a, b) => {
                a.collect_dims(out);
                b.collect_dims(out);
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Test { dim, options } => {
                write!(f, "{dim}=")?;
                for (i, o) in options.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{o}")?;
                }
                Ok(())
            }
            Condition::Not(c) => write!(f, "!({c})"),
            Condition::And(a, b) => write!(f, "({a} && {b})"),
            Condition::Or(a, b) => write!(f, "({a} || {b})"),
        }
    }
}

struct Parser<'a> {
    src: &'a str,
    tokens: &'a [Spanned],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn cur(&self) -> &Spanned {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        &self.cur().token
    }

    fn advance(&mut self) -> &Spanned {
        let t = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn err(&self, message: impl Into<String>) -> GenError {
        GenError::malformed(self.src, self.cur().offset, message)
    }

    fn take_word(&mut self) -> Result<String, GenError> {
        match self.peek() {
            Token::Word(w) => {
                let w = w.clone();
                self.advance();
                Ok(w)
            }
            other => Err(self.err(format!("expected a dimension or option, got {:?}", other))),
        }
    }

    fn starts_unary(&self) -> bool {
        matches!(self.peek(), Token::Not | Token::LParen | Token::Word(_))
    }

    fn parse_expr(&mut self) -> Result<Condition, GenError> {
        let mut left = self.parse_and()?;
        while self.peek() == &Token::Or {
            self.advance();
            let right = self.parse_and()?;
            left = Condition::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Condition, GenError> {
        let mut left = self.parse_unary()?;
        loop {
            if self.peek() == &Token::And {
                self.advance();
            } else if !self.starts_unary() {
                break;
            }
            let right = self.parse_unary()?;
            left = Condition::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Condition, GenError> {
        match self.peek() {
            Token::Not => {
                self.advance();
                Ok(Condition::Not(Box::new(self.parse_unary()?)))
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                if self.peek() != &Token::RParen {
                    return Err(self.err("expected ')'"));
                }
                self.advance();
                Ok(inner)
            }
            _ => self.parse_test(),
        }
    }

    fn parse_test(&mut self) -> Result<Condition, GenError> {
        let first = self.take_word()?;
        if self.peek() == &Token::Eq {
            self.advance();
            let options = self.parse_options()?;
            return Ok(Condition::Test {
                dim: first,
                options,
            });
        }
        let mut options = vec![DimOption::parse(&first)];
        while self.peek() == &Token::Pipe {
            self.advance();
            options.push(DimOption::parse(&self.take_word()?));
        }
        let dim = self.take_word()?;
        Ok(Condition::Test { dim, options })
    }

    fn parse_options(&mut self) -> Result<Vec<DimOption>, GenError> {
        let mut options = vec![DimOption::parse(&self.take_word()?)];
        while self.peek() == &Token::Pipe {
            self.advance();
            options.push(DimOption::parse(&self.take_word()?));
        }
        Ok(options)
    }
}
