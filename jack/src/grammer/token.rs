use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;
use strum::{Display, EnumString, IntoStaticStr};

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Pos) -> Self {
        Token { kind, pos }
    }

    pub fn token_type(&self) -> TokenType {
        match self.kind {
            TokenKind::Keyword(_) => TokenType::Keyword,
            TokenKind::Symbol(_) => TokenType::Symbol,
            TokenKind::Ident(_) => TokenType::Identifier,
            TokenKind::IntConst(_) => TokenType::IntConst,
            TokenKind::StrConst(_) => TokenType::StringConst,
        }
    }

    pub fn keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    pub fn symbol(&self) -> Option<Symbol> {
        match self.kind {
            TokenKind::Symbol(sym) => Some(sym),
            _ => None,
        }
    }

    pub fn identifier(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn int_val(&self) -> Option<u16> {
        match self.kind {
            TokenKind::IntConst(v) => Some(v),
            _ => None,
        }
    }

    pub fn string_val(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::StrConst(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenType {
    #[strum(serialize = "keyword")]
    Keyword,
    #[strum(serialize = "symbol")]
    Symbol,
    #[strum(serialize = "identifier")]
    Identifier,
    #[strum(serialize = "integerConstant")]
    IntConst,
    #[strum(serialize = "stringConstant")]
    StringConst,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Keyword(Keyword),
    Symbol(Symbol),
    Ident(String),
    IntConst(u16),
    StrConst(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(kw) => write!(f, "`{}`", kw),
            TokenKind::Symbol(sym) => write!(f, "`{}`", sym),
            TokenKind::Ident(name) => write!(f, "identifier `{}`", name),
            TokenKind::IntConst(v) => write!(f, "integer `{}`", v),
            TokenKind::StrConst(s) => write!(f, "string \"{}\"", s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Keyword {
    Class,
    Constructor,
    Function,
    Method,
    Field,
    Static,
    Var,
    Int,
    Char,
    Boolean,
    Void,
    True,
    False,
    Null,
    This,
    Let,
    Do,
    If,
    Else,
    While,
    Return,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive, IntoStaticStr,
)]
#[repr(u8)]
pub enum Symbol {
    #[strum(serialize = "{")]
    LCurly = b'{',
    #[strum(serialize = "}")]
    RCurly = b'}',
    #[strum(serialize = "(")]
    LParen = b'(',
    #[strum(serialize = ")")]
    RParen = b')',
    #[strum(serialize = "[")]
    LBracket = b'[',
    #[strum(serialize = "]")]
    RBracket = b']',
    #[strum(serialize = ".")]
    Period = b'.',
    #[strum(serialize = ",")]
    Comma = b',',
    #[strum(serialize = ";")]
    Semicolon = b';',
    #[strum(serialize = "+")]
    Plus = b'+',
    #[strum(serialize = "-")]
    Minus = b'-',
    #[strum(serialize = "*")]
    Star = b'*',
    #[strum(serialize = "/")]
    Slash = b'/',
    #[strum(serialize = "&")]
    Ampasand = b'&',
    #[strum(serialize = "|")]
    Pipe = b'|',
    #[strum(serialize = "<")]
    LAngle = b'<',
    #[strum(serialize = ">")]
    RAngle = b'>',
    #[strum(serialize = "=")]
    Equal = b'=',
    #[strum(serialize = "~")]
    Tilde = b'~',
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        f.write_str(s)
    }
}

impl Symbol {
    pub fn from_char(c: char) -> Option<Symbol> {
        u8::try_from(c).ok().and_then(|b| Symbol::try_from(b).ok())
    }
}

/// 1-based row and column of the first character of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

/// Pattern for a keyword token kind.
#[macro_export]
macro_rules! kw {
    ($kw:ident) => {
        $crate::grammer::token::TokenKind::Keyword($crate::grammer::token::Keyword::$kw)
    };
}

/// Pattern for a symbol token kind.
#[macro_export]
macro_rules! sym {
    ($sym:ident) => {
        $crate::grammer::token::TokenKind::Symbol($crate::grammer::token::Symbol::$sym)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_names() {
        assert_eq!("constructor".parse::<Keyword>(), Ok(Keyword::Constructor));
        assert_eq!(Keyword::Boolean.to_string(), "boolean");
        assert!("Class".parse::<Keyword>().is_err());
    }

    #[test]
    fn symbol_chars() {
        assert_eq!(Symbol::from_char('~'), Some(Symbol::Tilde));
        assert_eq!(Symbol::from_char('{'), Some(Symbol::LCurly));
        assert_eq!(Symbol::from_char('!'), None);
        assert_eq!(Symbol::from_char('あ'), None);
        assert_eq!(Symbol::Ampasand.to_string(), "&");
        assert_eq!(Symbol::LCurly.to_string(), "{");
        assert_eq!(Symbol::RCurly.to_string(), "}");
        assert_eq!(u8::from(Symbol::Semicolon), b';');
    }
}
