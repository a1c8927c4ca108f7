pub mod error;
pub mod parser;
pub mod symbols;
pub mod util;

use arch::inst::{Inst, MAX_ADDR};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

pub use error::{Error, Warning};
pub use parser::{Addr, Stmt};
pub use symbols::Symbols;

/// One source line after pass 1.
#[derive(Debug, Clone)]
pub struct Line {
    pub file: String,
    pub idx: usize,
    pub stmt: Option<Stmt>,
    /// Address of the instruction, for A/C statements.
    pub pc: Option<u16>,
    /// Encoded instruction, filled in by pass 2.
    pub inst: Option<Inst>,
}

/// Two-pass assembler. Sources added in order form one program with one symbol table.
pub struct Assembler {
    files: IndexMap<String, Vec<String>>,
    lines: Vec<Line>,
    symbols: Symbols,
    warnings: Vec<Warning>,
    labels: IndexMap<String, (String, usize)>,
    pc: u16,
}

impl Assembler {
    pub fn new() -> Self {
        Assembler {
            files: IndexMap::new(),
            lines: Vec::new(),
            symbols: Symbols::new(),
            warnings: Vec::new(),
            labels: IndexMap::new(),
            pc: 0,
        }
    }

    /// Pass 1: parse every line and bind labels to the address of the next instruction.
    pub fn add_source(&mut self, name: &str, text: &str) -> Result<(), Error> {
        let raws: Vec<String> = text.lines().map(|s| s.to_string()).collect();
        for (idx, raw) in raws.iter().enumerate() {
            let stmt = Stmt::parse(raw).map_err(|e| e.at(name, idx))?;
            let mut pc = None;
            match &stmt {
                Some(Stmt::Label(label)) => {
                    if self.pc > MAX_ADDR {
                        return Err(Error::RomOverflow.at(name, idx));
                    }
                    self.symbols.define_label(label, self.pc);
                    let here = (name.to_string(), idx);
                    if let Some(prev) = self.labels.insert(label.clone(), here) {
                        self.warnings.push(Warning {
                            message: format!("Re-defined label: `{}`", label),
                            file: name.to_string(),
                            line: idx,
                            note: Some((
                                "Already defined here. The last definition is used.".into(),
                                prev.0,
                                prev.1,
                            )),
                        });
                    }
                }
                Some(_) => {
                    if self.pc > MAX_ADDR {
                        return Err(Error::RomOverflow.at(name, idx));
                    }
                    pc = Some(self.pc);
                    self.pc += 1;
                }
                None => {}
            }
            self.lines.push(Line {
                file: name.to_string(),
                idx,
                stmt,
                pc,
                inst: None,
            });
        }
        self.files.insert(name.to_string(), raws);
        Ok(())
    }

    /// Pass 2: resolve symbols, allocating variables from address 16, and encode.
    pub fn resolve(&mut self) -> Result<Vec<Inst>, Error> {
        let mut insts = Vec::new();
        for line in self.lines.iter_mut() {
            let inst = match &line.stmt {
                Some(Stmt::A(Addr::Literal(v))) => Inst::A(*v),
                Some(Stmt::A(Addr::Symbol(s))) => {
                    let addr = self
                        .symbols
                        .resolve(s)
                        .map_err(|e| e.at(&line.file, line.idx))?;
                    Inst::A(addr)
                }
                Some(Stmt::C(dest, comp, jump)) => Inst::C(*dest, *comp, *jump),
                Some(Stmt::Label(_)) | None => continue,
            };
            line.inst = Some(inst.clone());
            insts.push(inst);
        }
        Ok(insts)
    }

    pub fn files(&self) -> &IndexMap<String, Vec<String>> {
        &self.files
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn symbols(&self) -> &Symbols {
        &self.symbols
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

/// `.hack` text: one 16-character line per instruction, no trailing newline.
pub fn to_hack(insts: &[Inst]) -> String {
    insts
        .iter()
        .map(|inst| inst.to_line())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assemble named sources as one program.
pub fn assemble(sources: &[(String, String)]) -> Result<String, Error> {
    let mut asm = Assembler::new();
    for (name, text) in sources {
        asm.add_source(name, text)?;
    }
    let insts = asm.resolve()?;
    Ok(to_hack(&insts))
}

/// Read a `.asm` file, or every `.asm` file below a directory.
/// Any failure stops the whole batch.
pub fn read_sources(path: &Path) -> Result<Vec<(String, String)>, Error> {
    let files = arch::source::collect(path, "asm")
        .map_err(|e| Error::FileOpen(path.display().to_string(), e))?;
    if files.is_empty() {
        return Err(Error::NoInput(path.display().to_string()));
    }
    let mut sources = Vec::new();
    for file in files {
        let text = std::fs::read_to_string(&file)
            .map_err(|e| Error::FileOpen(file.display().to_string(), e))?;
        sources.push((file.display().to_string(), text));
    }
    Ok(sources)
}

/// Assemble a file or directory and write the `.hack` output; returns the output path.
pub fn assemble_path(path: &Path) -> Result<PathBuf, Error> {
    let sources = read_sources(path)?;
    let hack = assemble(&sources)?;
    let output = arch::source::output_path(path, "hack");
    std::fs::write(&output, hack).map_err(|e| Error::FileCreate(output.display().to_string(), e))?;
    Ok(output)
}
