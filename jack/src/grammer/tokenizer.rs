use super::token::{Keyword, Pos, Symbol, Token, TokenKind};
use crate::error::Error;

/// Largest value a Jack constant can carry.
pub const MAX_CONST: u16 = 32767;

/// Lazy, forward-only Jack tokenizer.
///
/// One token is read ahead at construction so `has_more_tokens` is meaningful
/// before the first `advance`. Whitespace and both comment styles are skipped.
pub struct Tokenizer<'a> {
    src: &'a str,
    offset: usize,
    row: usize,
    col: usize,
    current: Option<Token>,
    next: Option<Result<Token, Error>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        let mut tokenizer = Tokenizer {
            src,
            offset: 0,
            row: 1,
            col: 1,
            current: None,
            next: None,
        };
        tokenizer.next = tokenizer.scan_token();
        tokenizer
    }

    pub fn has_more_tokens(&self) -> bool {
        self.next.is_some()
    }

    /// Make the read-ahead token current and read the following one.
    pub fn advance(&mut self) -> Result<(), Error> {
        match self.next.take() {
            Some(Ok(token)) => {
                self.current = Some(token);
                self.next = self.scan_token();
                Ok(())
            }
            Some(Err(e)) => Err(e),
            None => Err(Error::UnexpectedEOF("token".to_string())),
        }
    }

    /// Current token; `None` before the first `advance`.
    pub fn token(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    // ------------------------------------------------------------------------
    // Character level

    fn peek_char(&self) -> Option<char> {
        self.src[self.offset..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.src[self.offset..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.row += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn pos(&self) -> Pos {
        Pos {
            row: self.row,
            col: self.col,
        }
    }

    /// Skip whitespace and comments. Fails on an unterminated block comment.
    fn skip_trivia(&mut self) -> Result<(), Error> {
        loop {
            match (self.peek_char(), self.peek_second()) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.pos();
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.peek_char() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => return Err(Error::UnterminatedComment(start)),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    // ------------------------------------------------------------------------
    // Token level

    fn scan_token(&mut self) -> Option<Result<Token, Error>> {
        if let Err(e) = self.skip_trivia() {
            return Some(Err(e));
        }
        let pos = self.pos();
        let c = self.peek_char()?;

        let kind = if let Some(sym) = Symbol::from_char(c) {
            self.bump();
            Ok(TokenKind::Symbol(sym))
        } else if c == '"' {
            self.scan_string(pos)
        } else if c.is_ascii_digit() {
            self.scan_int(pos)
        } else if c.is_ascii_alphabetic() || c == '_' {
            Ok(self.scan_word())
        } else {
            Err(Error::UnexpectedChar(c, pos))
        };
        Some(kind.map(|kind| Token::new(kind, pos)))
    }

    /// Characters and length must fit a VM constant.
    fn scan_string(&mut self, pos: Pos) -> Result<TokenKind, Error> {
        self.bump();
        let mut s = String::new();
        let mut len: u16 = 0;
        loop {
            let at = self.pos();
            match self.bump() {
                Some('"') => return Ok(TokenKind::StrConst(s)),
                Some('\n') | None => return Err(Error::UnterminatedString(pos)),
                Some(c) if u32::from(c) > u32::from(MAX_CONST) => {
                    return Err(Error::InvalidStringChar(c, at))
                }
                Some(c) => {
                    if len == MAX_CONST {
                        return Err(Error::StringTooLong(pos));
                    }
                    len += 1;
                    s.push(c);
                }
            }
        }
    }

    fn scan_int(&mut self, pos: Pos) -> Result<TokenKind, Error> {
        let mut digits = String::new();
        while let Some(c) = self.peek_char().filter(|c| c.is_ascii_digit()) {
            digits.push(c);
            self.bump();
        }
        match digits.parse::<u16>() {
            Ok(v) if v <= MAX_CONST => Ok(TokenKind::IntConst(v)),
            _ => Err(Error::IntegerOverflow(digits, pos)),
        }
    }

    fn scan_word(&mut self) -> TokenKind {
        let mut word = String::new();
        while let Some(c) = self
            .peek_char()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        {
            word.push(c);
            self.bump();
        }
        match word.parse::<Keyword>() {
            Ok(kw) => TokenKind::Keyword(kw),
            Err(_) => TokenKind::Ident(word),
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token, Error>;

    /// Yields tokens until the end of input; a lexical error is yielded once and ends the stream.
    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_more_tokens() {
            return None;
        }
        match self.advance() {
            Ok(()) => self.current.clone().map(Ok),
            Err(e) => Some(Err(e)),
        }
    }
}
