use color_print::cprintln;
use indexmap::IndexMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown computation: `{0}`")]
    UnknownComp(String),

    #[error("Unknown destination: `{0}`")]
    UnknownDest(String),

    #[error("Unknown jump: `{0}`")]
    UnknownJump(String),

    #[error("Invalid symbol: `{0}`")]
    InvalidSymbol(String),

    #[error("Address out of range: `{0}`")]
    AddressOutOfRange(String),

    #[error("No address left for variable: `{0}`")]
    VariableOverflow(String),

    #[error("Program does not fit in ROM (max {} instructions)", arch::inst::MAX_ADDR as u32 + 1)]
    RomOverflow,

    #[error("Syntax Error: Cannot parse `{0}`")]
    SyntaxError(String),

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

    /// Print error with diagnostic information showing file location and line content
    pub fn print_diag(&self, files: &IndexMap<String, Vec<String>>) {
        match self {
            Error::At { file, line, source } => {
                cprintln!("<red,bold>error</>: {}", source);
                print_location(files, file, *line);
            }
            _ => cprintln!("<red,bold>error</>: {}", self),
        }
    }
}

/// Non-fatal finding reported while assembling.
#[derive(Debug, Clone)]
pub struct Warning {
    pub message: String,
    pub file: String,
    pub line: usize,
    pub note: Option<(String, String, usize)>,
}

impl Warning {
    pub fn print_diag(&self, files: &IndexMap<String, Vec<String>>) {
        cprintln!("<yellow,bold>warn</>: {}", self.message);
        print_location(files, &self.file, self.line);
        if let Some((message, file, line)) = &self.note {
            cprintln!("<green,bold>note</>: {}", message);
            print_location(files, file, *line);
        }
    }
}

fn print_location(files: &IndexMap<String, Vec<String>>, file: &str, line_idx: usize) {
    // line_idx is 0-based, display as 1-based
    let line_num = line_idx + 1;
    cprintln!("     <blue>--></> <underline>{}:{}</>", file, line_num);
    cprintln!("      <blue>|</>");

    let line_content = files
        .get(file)
        .and_then(|lines| lines.get(line_idx))
        .map(|s| s.as_str())
        .unwrap_or("");

    cprintln!(" <blue>{:>4} |</> {}", line_num, line_content);
    cprintln!("      <blue>|</>");
}
