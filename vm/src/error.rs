use color_print::cprintln;
use indexmap::IndexMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown command: `{0}`")]
    UnknownCommand(String),

    #[error("Unknown segment: `{0}`")]
    UnknownSegment(String),

    #[error("Invalid index: `{0}`")]
    InvalidIndex(String),

    #[error("Index {1} out of range for segment `{0}`")]
    IndexOutOfRange(String, u16),

    #[error("Cannot pop to the constant segment")]
    PopConstant,

    #[error("Invalid name: `{0}`")]
    InvalidName(String),

    #[error("File name `{0}` cannot be used as a static namespace")]
    InvalidFileName(String),

    #[error("Wrong number of arguments for `{0}`")]
    Arity(String),

    #[error("{file}:{}: {source}", .line + 1)]
    At {
        file: String,
        line: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("No input files found in {0}")]
    NoInput(String),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write output")]
    Write(#[from] std::io::Error),
}

impl Error {
    /// Attach a source location (0-based line index).
    pub fn at(self, file: &str, line: usize) -> Error {
        Error::At {
            file: file.to_string(),
            line,
            source: Box::new(self),
        }
    }

    pub fn print_diag(&self, files: &IndexMap<String, Vec<String>>) {
        match self {
            Error::At { file, line, source } => {
                cprintln!("<red,bold>error</>: {}", source);
                let line_num = line + 1;
                let content = files
                    .get(file)
                    .and_then(|lines| lines.get(*line))
                    .map(|s| s.as_str())
                    .unwrap_or("");
                cprintln!("     <blue>--></> <underline>{}:{}</>", file, line_num);
                cprintln!("      <blue>|</>");
                cprintln!(" <blue>{:>4} |</> {}", line_num, content);
                cprintln!("      <blue>|</>");
            }
            _ => cprintln!("<red,bold>error</>: {}", self),
        }
    }
}
