use super::token::{Keyword, Pos, Symbol, Token, TokenKind};
use crate::error::{Error, TokenInfo};

/// Token stream with the current token and one token of lookahead.
///
/// A lexical error from the underlying stream ends it; the error is returned
/// by the first `expect_*` that runs past the last good token, or by `finish`.
pub struct Cursor<I: Iterator<Item = Result<Token, Error>>> {
    tokens: I,
    current: Option<Token>,
    lookahead: Option<Token>,
    error: Option<Error>,
}

impl<I: Iterator<Item = Result<Token, Error>>> Cursor<I> {
    pub fn new(tokens: I) -> Self {
        let mut cursor = Cursor {
            tokens,
            current: None,
            lookahead: None,
            error: None,
        };
        cursor.current = cursor.pull();
        cursor.lookahead = cursor.pull();
        cursor
    }

    fn pull(&mut self) -> Option<Token> {
        if self.error.is_some() {
            return None;
        }
        match self.tokens.next()? {
            Ok(token) => Some(token),
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }

    /// Current token, without consuming it.
    pub fn peek(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    /// Consume the current token and return it.
    pub fn next(&mut self) -> Option<Token> {
        let token = self.current.take();
        self.current = self.lookahead.take();
        self.lookahead = self.pull();
        token
    }

    /// Current token matches the condition.
    pub fn check_if<F: Fn(&Token) -> bool>(&self, cond: F) -> bool {
        self.current.as_ref().is_some_and(cond)
    }

    /// Lookahead token matches the condition.
    pub fn check2_if<F: Fn(&Token) -> bool>(&self, cond: F) -> bool {
        self.lookahead.as_ref().is_some_and(cond)
    }

    /// Consume the current token if it matches the condition.
    pub fn consume_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> Option<Token> {
        if self.check_if(cond) {
            self.next()
        } else {
            None
        }
    }

    /// Current token must match the condition.
    pub fn expect_tobe<F: Fn(&Token) -> bool>(
        &mut self,
        expected: &str,
        cond: F,
    ) -> Result<Token, Error> {
        if self.current.is_none() {
            return Err(self.eof(expected));
        }
        match &self.current {
            Some(token) if cond(token) => {}
            Some(token) => {
                return Err(Error::UnexpectedToken {
                    expected: expected.to_string(),
                    found: TokenInfo::from(token),
                })
            }
            None => {}
        }
        match self.next() {
            Some(token) => Ok(token),
            None => Err(self.eof(expected)),
        }
    }

    pub fn expect_symbol(&mut self, sym: Symbol) -> Result<Token, Error> {
        self.expect_tobe(&format!("`{}`", sym), |t| t.symbol() == Some(sym))
    }

    pub fn expect_keyword(&mut self, kw: Keyword) -> Result<Token, Error> {
        self.expect_tobe(&format!("`{}`", kw), |t| t.keyword() == Some(kw))
    }

    pub fn expect_ident(&mut self, what: &str) -> Result<(String, Pos), Error> {
        let token = self.expect_tobe(what, |t| matches!(t.kind, TokenKind::Ident(_)))?;
        match token.kind {
            TokenKind::Ident(name) => Ok((name, token.pos)),
            _ => Err(self.eof(what)),
        }
    }

    fn eof(&mut self, expected: &str) -> Error {
        self.error
            .take()
            .unwrap_or_else(|| Error::UnexpectedEOF(expected.to_string()))
    }

    /// The stream must be exhausted.
    pub fn finish(&mut self) -> Result<(), Error> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        match &self.current {
            Some(token) => Err(Error::UnexpectedToken {
                expected: "end of file".to_string(),
                found: TokenInfo::from(token),
            }),
            None => Ok(()),
        }
    }
}

#[macro_export]
macro_rules! check {
    ($cursor:expr, $kind:pat) => {
        $cursor.check_if(|token| matches!(&token.kind, $kind))
    };
}

#[macro_export]
macro_rules! check2 {
    ($cursor:expr, $kind:pat) => {
        $cursor.check2_if(|token| matches!(&token.kind, $kind))
    };
}

#[macro_export]
macro_rules! expect {
    ($cursor:expr, $kind:pat, $expected:expr) => {
        $cursor.expect_tobe($expected, |token| matches!(&token.kind, $kind))
    };
}

#[macro_export]
macro_rules! optional {
    ($cursor:expr, $kind:pat) => {
        $cursor.consume_if(|token| matches!(&token.kind, $kind))
    };
}
