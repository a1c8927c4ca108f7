use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Line {}: not a 16-bit binary instruction: `{1}`", .0 + 1)]
    InvalidLine(usize, String),

    #[error("Program does not fit in ROM: {0} instructions")]
    RomOverflow(usize),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Invalid config file: {0}")]
    Config(String, #[source] serde_yaml::Error),
}
