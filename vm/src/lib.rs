pub mod codewriter;
pub mod error;
pub mod parser;

use std::path::{Path, PathBuf};

pub use codewriter::CodeWriter;
pub use error::Error;
pub use parser::parse_line;

/// Translate named VM sources into one assembly program.
/// The static namespace of each source is the file stem of its name.
pub fn translate_sources(sources: &[(String, String)], bootstrap: bool) -> Result<String, Error> {
    let mut writer = CodeWriter::new(Vec::new());
    if bootstrap {
        writer.bootstrap()?;
    }
    for (name, text) in sources {
        let stem = arch::source::stem(Path::new(name));
        if !parser::is_name(&stem) {
            return Err(Error::InvalidFileName(name.clone()));
        }
        writer.set_file(&stem);
        for (idx, line) in text.lines().enumerate() {
            if let Some(cmd) = parse_line(line).map_err(|e| e.at(name, idx))? {
                writer.write(&cmd).map_err(|e| Error::from(e).at(name, idx))?;
            }
        }
    }
    if !bootstrap {
        writer.write_end_loop()?;
    }
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

/// Read a `.vm` file, or every `.vm` file below a directory in sorted order.
pub fn read_sources(path: &Path) -> Result<Vec<(String, String)>, Error> {
    let files = arch::source::collect(path, "vm")
        .map_err(|e| Error::FileOpen(path.display().to_string(), e))?;
    if files.is_empty() {
        return Err(Error::NoInput(path.display().to_string()));
    }
    files
        .into_iter()
        .map(|file| {
            let text = std::fs::read_to_string(&file)
                .map_err(|e| Error::FileOpen(file.display().to_string(), e))?;
            Ok((file.display().to_string(), text))
        })
        .collect()
}

/// Translate a file or directory and write `X.asm` (or `dir/dir.asm`).
/// Nothing is written unless every source translates.
pub fn translate_path(path: &Path, bootstrap: bool) -> Result<PathBuf, Error> {
    let sources = read_sources(path)?;
    let asm = translate_sources(&sources, bootstrap)?;
    let output = arch::source::output_path(path, "asm");
    std::fs::write(&output, asm).map_err(|e| Error::FileCreate(output.display().to_string(), e))?;
    Ok(output)
}
