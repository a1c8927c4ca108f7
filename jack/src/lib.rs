pub mod engine;
pub mod error;
pub mod grammer;
pub mod symbols;
pub mod util;
pub mod vmwriter;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

pub use engine::CompilationEngine;
pub use error::Error;
use grammer::tokenizer::Tokenizer;

/// Compile one class to VM code. `name` is used in error messages.
pub fn compile_source(name: &str, text: &str) -> Result<String, Error> {
    let mut engine = CompilationEngine::new(Tokenizer::new(text), Vec::new());
    engine.compile_class().map_err(|e| e.in_file(name))?;
    Ok(String::from_utf8_lossy(&engine.into_inner()).into_owned())
}

/// Read a `.jack` file, or every `.jack` file below a directory in sorted order.
pub fn read_sources(path: &Path) -> Result<Vec<(PathBuf, String)>, Error> {
    let files = arch::source::collect(path, "jack")
        .map_err(|e| Error::FileOpen(path.display().to_string(), e))?;
    if files.is_empty() {
        return Err(Error::NoInput(path.display().to_string()));
    }
    files
        .into_iter()
        .map(|file| {
            let text = std::fs::read_to_string(&file)
                .map_err(|e| Error::FileOpen(file.display().to_string(), e))?;
            Ok((file, text))
        })
        .collect()
}

/// Compile read sources; returns `(Class.vm file name, VM code)` pairs.
/// Fails on the first class that does not compile, or on two classes with the same name.
pub fn compile_sources(sources: &[(PathBuf, String)]) -> Result<Vec<(PathBuf, String)>, Error> {
    let mut seen: IndexMap<String, String> = IndexMap::new();
    let mut outputs = Vec::new();
    for (file, text) in sources {
        let file_name = file.display().to_string();
        let class = arch::source::stem(file);
        if let Some(first) = seen.insert(class.clone(), file_name.clone()) {
            return Err(Error::DuplicateClass {
                class,
                first,
                second: file_name,
            });
        }
        let vm = compile_source(&file_name, text)?;
        outputs.push((PathBuf::from(class).with_extension("vm"), vm));
    }
    Ok(outputs)
}

/// Compile every class under `path`.
pub fn compile_path(path: &Path) -> Result<Vec<(PathBuf, String)>, Error> {
    compile_sources(&read_sources(path)?)
}

/// Default output directory: `build/` next to the input.
pub fn default_outdir(input: &Path) -> PathBuf {
    let base = if input.is_dir() {
        input
    } else {
        input.parent().unwrap_or(Path::new("."))
    };
    base.join("build")
}

/// Write compiled classes into `outdir`; returns the written paths.
pub fn write_outputs(outputs: &[(PathBuf, String)], outdir: &Path) -> Result<Vec<PathBuf>, Error> {
    std::fs::create_dir_all(outdir)
        .map_err(|e| Error::FileCreate(outdir.display().to_string(), e))?;
    outputs
        .iter()
        .map(|(name, vm)| {
            let path = outdir.join(name);
            std::fs::write(&path, vm)
                .map_err(|e| Error::FileCreate(path.display().to_string(), e))?;
            Ok(path)
        })
        .collect()
}

/// Compile `input` and write one `.vm` file per class into `outdir`.
/// Nothing is written unless every class compiles.
pub fn compile_to_dir(input: &Path, outdir: &Path) -> Result<Vec<PathBuf>, Error> {
    write_outputs(&compile_path(input)?, outdir)
}
