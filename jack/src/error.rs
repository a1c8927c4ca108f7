use crate::grammer::token::{Pos, Token, TokenKind};
use color_print::cprintln;
use indexmap::IndexMap;
use std::fmt;
use thiserror::Error;

/// Token kind and position, kept for error reporting.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub kind: TokenKind,
    pub pos: Pos,
}

impl fmt::Display for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.pos)
    }
}

impl From<&Token> for TokenInfo {
    fn from(token: &Token) -> Self {
        TokenInfo {
            kind: token.kind.clone(),
            pos: token.pos,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    // Lexical errors
    #[error("Unterminated comment starting at {0}")]
    UnterminatedComment(Pos),

    #[error("Unterminated string constant starting at {0}")]
    UnterminatedString(Pos),

    #[error("Integer constant `{0}` out of range at {1}")]
    IntegerOverflow(String, Pos),

    #[error("Unexpected character `{0}` at {1}")]
    UnexpectedChar(char, Pos),

    #[error("Character `{0}` at {1} does not fit in a string constant")]
    InvalidStringChar(char, Pos),

    #[error("String constant starting at {0} is too long")]
    StringTooLong(Pos),

    // Parse errors
    #[error("Unexpected end of file, expected {0}")]
    UnexpectedEOF(String),

    #[error("Unexpected token: {found}, expected {expected}")]
    UnexpectedToken { expected: String, found: TokenInfo },

    // Semantic errors
    #[error("Undefined variable: `{0}` at {1}")]
    UndefinedVariable(String, Pos),

    #[error("{file}: {source}")]
    In {
        file: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Class `{class}` is defined in both {first} and {second}")]
    DuplicateClass {
        class: String,
        first: String,
        second: String,
    },

    // IO errors
    #[error("No input files found in {0}")]
    NoInput(String),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Attach the source file name.
    pub fn in_file(self, file: &str) -> Error {
        Error::In {
            file: file.to_string(),
            source: Box::new(self),
        }
    }

    /// Position in the source, for errors that point at a token or character.
    pub fn pos(&self) -> Option<Pos> {
        match self {
            Error::UnterminatedComment(pos)
            | Error::UnterminatedString(pos)
            | Error::IntegerOverflow(_, pos)
            | Error::UnexpectedChar(_, pos)
            | Error::InvalidStringChar(_, pos)
            | Error::StringTooLong(pos)
            | Error::UndefinedVariable(_, pos) => Some(*pos),
            Error::UnexpectedToken { found, .. } => Some(found.pos),
            Error::In { source, .. } => source.pos(),
            _ => None,
        }
    }

    /// Print error with the offending line and a caret under the column.
    pub fn print_diag(&self, files: &IndexMap<String, Vec<String>>) {
        let (file, source) = match self {
            Error::In { file, source } => (file, source.as_ref()),
            _ => {
                cprintln!("<red,bold>error</>: {}", self);
                return;
            }
        };
        cprintln!("<red,bold>error</>: {}", source);
        let Some(pos) = source.pos() else {
            cprintln!("     <blue>--></> <underline>{}</>", file);
            return;
        };
        let content = files
            .get(file)
            .and_then(|lines| lines.get(pos.row.saturating_sub(1)))
            .map(|s| s.as_str())
            .unwrap_or("");
        cprintln!("     <blue>--></> <underline>{}:{}:{}</>", file, pos.row, pos.col);
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", pos.row, content);
        cprintln!(
            "      <blue>|</> {}<red,bold>^</>",
            " ".repeat(pos.col.saturating_sub(1))
        );
    }
}
