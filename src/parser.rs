//! A small recursive-descent parser for the surface syntax described in
//! `SPEC_FULL.md` §0.4.
//!
//! Parsing itself is named an external collaborator by the distilled
//! specification (§1) — the focus of this crate is the encoder and the two
//! solvers — but the CLI driver needs *some* way to turn formula text into a
//! [`PForm`], so this module provides a compact, single-pass parser for the
//! grammar:
//!
//! ```text
//! spec    := ('F' | 'G') '(' pltl ')'
//! pltl    := iff
//! iff     := impl ('<->' impl)*
//! impl    := or ('->' impl)?          -- right-assoc
//! or      := and ('|' and)*
//! and     := since ('&' since)*
//! since   := unary (('S' | 'T') unary)*
//! unary   := ('!' unary) | atom
//! atom    := 'true' | 'false' | ident
//!          | 'Y' '(' pltl ')' | 'Z' '(' pltl ')'
//!          | 'O' '(' pltl ')' | 'H' '(' pltl ')'
//!          | '(' pltl ')'
//! ```

use crate::error::{Result, SynthError};
use crate::logic::{Alphabet, PForm};

/// The outer temporal wrapper of a specification (§3 `Spec.type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameType {
    /// `F(body)`: a reachability objective.
    Eventually,
    /// `G(body)`: a safety objective.
    Always,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    True,
    False,
    LParen,
    RParen,
    Not,
    And,
    Or,
    Arrow,
    DArrow,
    Since,
    Triggered,
    Yesterday,
    WYesterday,
    Once,
    Historically,
    EventuallyWrapper,
    AlwaysWrapper,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    text: &'a str,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.char_indices().peekable(),
            text,
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(&(i, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
                continue;
            }
            match c {
                '(' => {
                    self.chars.next();
                    tokens.push(Token::LParen);
                }
                ')' => {
                    self.chars.next();
                    tokens.push(Token::RParen);
                }
                '!' => {
                    self.chars.next();
                    tokens.push(Token::Not);
                }
                '&' => {
                    self.chars.next();
                    tokens.push(Token::And);
                }
                '|' => {
                    self.chars.next();
                    tokens.push(Token::Or);
                }
                '-' => {
                    self.chars.next();
                    match self.chars.next() {
                        Some((_, '>')) => tokens.push(Token::Arrow),
                        _ => return Err(SynthError::ParseError(format!(
                            "expected '->' at position {}",
                            i
                        ))),
                    }
                }
                '<' => {
                    self.chars.next();
                    match (self.chars.next(), self.chars.next()) {
                        (Some((_, '-')), Some((_, '>'))) => tokens.push(Token::DArrow),
                        _ => return Err(SynthError::ParseError(format!(
                            "expected '<->' at position {}",
                            i
                        ))),
                    }
                }
                c if c.is_alphabetic() || c == '_' => {
                    let start = i;
                    let mut end = i + c.len_utf8();
                    self.chars.next();
                    while let Some(&(j, d)) = self.chars.peek() {
                        if d.is_alphanumeric() || d == '_' {
                            end = j + d.len_utf8();
                            self.chars.next();
                        } else {
                            break;
                        }
                    }
                    let word = &self.text[start..end];
                    tokens.push(match word {
                        "true" => Token::True,
                        "false" => Token::False,
                        "Y" => Token::Yesterday,
                        "Z" => Token::WYesterday,
                        "O" => Token::Once,
                        "H" => Token::Historically,
                        "S" => Token::Since,
                        "T" => Token::Triggered,
                        "F" => Token::EventuallyWrapper,
                        "G" => Token::AlwaysWrapper,
                        other => Token::Ident(other.to_string()),
                    });
                }
                other => {
                    return Err(SynthError::ParseError(format!(
                        "unexpected character '{}' at position {}",
                        other, i
                    )))
                }
            }
        }
        Ok(tokens)
    }
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    sigma: &'a Alphabet,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn expect(&mut self, expected: &Token) -> Result<()> {
        match self.advance() {
            Some(ref t) if t == expected => Ok(()),
            other => Err(SynthError::ParseError(format!(
                "expected {:?}, found {:?}",
                expected, other
            ))),
        }
    }

    fn parse_spec(&mut self) -> Result<(GameType, PForm)> {
        let game_type = match self.advance() {
            Some(Token::EventuallyWrapper) => GameType::Eventually,
            Some(Token::AlwaysWrapper) => GameType::Always,
            other => {
                return Err(SynthError::SpecShapeError(format!(
                    "formula must be wrapped in 'F(...)' or 'G(...)', found {:?}",
                    other
                )))
            }
        };
        self.expect(&Token::LParen)?;
        let body = self.parse_iff()?;
        self.expect(&Token::RParen)?;
        if self.pos != self.tokens.len() {
            return Err(SynthError::ParseError(
                "trailing tokens after top-level formula".to_string(),
            ));
        }
        Ok((game_type, body))
    }

    fn parse_iff(&mut self) -> Result<PForm> {
        let mut left = self.parse_impl()?;
        while matches!(self.peek(), Some(Token::DArrow)) {
            self.advance();
            let right = self.parse_impl()?;
            left = left.iff(right);
        }
        Ok(left)
    }

    fn parse_impl(&mut self) -> Result<PForm> {
        let left = self.parse_or()?;
        if matches!(self.peek(), Some(Token::Arrow)) {
            self.advance();
            let right = self.parse_impl()?;
            Ok(left.implies(right))
        } else {
            Ok(left)
        }
    }

    fn parse_or(&mut self) -> Result<PForm> {
        let mut left = self.parse_and()?;
        while matches!(self.peek(), Some(Token::Or)) {
            self.advance();
            let right = self.parse_and()?;
            left = left.or(right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<PForm> {
        let mut left = self.parse_since()?;
        while matches!(self.peek(), Some(Token::And)) {
            self.advance();
            let right = self.parse_since()?;
            left = left.and(right);
        }
        Ok(left)
    }

    fn parse_since(&mut self) -> Result<PForm> {
        let mut left = self.parse_unary()?;
        loop {
            match self.peek() {
                Some(Token::Since) => {
                    self.advance();
                    let right = self.parse_unary()?;
                    left = left.since(right);
                }
                Some(Token::Triggered) => {
                    self.advance();
                    let right = self.parse_unary()?;
                    left = left.triggered(right);
                }
                _ => break,
            }
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<PForm> {
        match self.peek() {
            Some(Token::Not) => {
                self.advance();
                Ok(self.parse_unary()?.not())
            }
            _ => self.parse_atom(),
        }
    }

    fn parse_atom(&mut self) -> Result<PForm> {
        match self.advance() {
            Some(Token::True) => Ok(PForm::top()),
            Some(Token::False) => Ok(PForm::bottom()),
            Some(Token::Ident(name)) => Ok(PForm::prop(self.sigma.proposition(name))),
            Some(Token::LParen) => {
                let inner = self.parse_iff()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Yesterday) => Ok(self.parse_wrapped()?.yesterday()),
            Some(Token::WYesterday) => Ok(self.parse_wrapped()?.w_yesterday()),
            Some(Token::Once) => Ok(self.parse_wrapped()?.once()),
            Some(Token::Historically) => Ok(self.parse_wrapped()?.historically()),
            other => Err(SynthError::ParseError(format!(
                "unexpected token {:?} while parsing an atom",
                other
            ))),
        }
    }

    fn parse_wrapped(&mut self) -> Result<PForm> {
        self.expect(&Token::LParen)?;
        let inner = self.parse_iff()?;
        self.expect(&Token::RParen)?;
        Ok(inner)
    }
}

/// Parses the text of a top-level specification formula, `F(psi)` or
/// `G(psi)`, interning every proposition it mentions into `sigma`.
pub fn parse_spec_formula(sigma: &Alphabet, text: &str) -> Result<(GameType, PForm)> {
    let tokens = Lexer::new(text).tokenize()?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        sigma,
    };
    parser.parse_spec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scenario_formulas() {
        let sigma = Alphabet::new();
        for text in [
            "F(c0)",
            "G(c0)",
            "G(u0)",
            "F(O(u0) & c0)",
            "G(H(u0) -> c0)",
            "F(Y(c0) & !c0)",
        ] {
            parse_spec_formula(&sigma, text).unwrap_or_else(|e| panic!("{}: {}", text, e));
        }
    }

    #[test]
    fn rejects_missing_wrapper() {
        let sigma = Alphabet::new();
        assert!(parse_spec_formula(&sigma, "c0 & c1").is_err());
    }

    #[test]
    fn rejects_trailing_garbage() {
        let sigma = Alphabet::new();
        assert!(parse_spec_formula(&sigma, "F(c0) c1").is_err());
    }

    #[test]
    fn implication_is_right_associative() {
        let sigma = Alphabet::new();
        let (_, body) = parse_spec_formula(&sigma, "F(a -> b -> c)").unwrap();
        // a -> (b -> c)
        match body {
            PForm::Bin(crate::logic::pform::BinOp::Implies, _, rhs) => {
                assert!(matches!(*rhs, PForm::Bin(crate::logic::pform::BinOp::Implies, _, _)));
            }
            _ => panic!("expected an implication"),
        }
    }
}
