use crate::parser::Stmt;
use crate::Assembler;
use color_print::cformat;

/// Listing of every source line with its address and encoded word.
pub fn print_dump(asm: &Assembler) {
    let mut current: Option<&str> = None;
    for line in asm.lines() {
        if current != Some(line.file.as_str()) {
            current = Some(line.file.as_str());
            let width = 45usize.saturating_sub(line.file.len());
            println!("{}+------[{}]{}", "-".repeat(24), line.file, "-".repeat(width));
        }

        let raw = asm
            .files()
            .get(&line.file)
            .and_then(|lines| lines.get(line.idx))
            .map(|s| s.trim())
            .unwrap_or("");
        let comment = match raw.find("//") {
            Some(idx) => cformat!("<dim>{}</>", &raw[idx..]),
            None => String::new(),
        };

        let line_num = line.idx + 1;
        let body = match (&line.stmt, line.pc, &line.inst) {
            (Some(stmt), Some(pc), Some(inst)) => format!(
                "[{:04X}] {} | {:>4}: {} {}",
                pc,
                inst.to_line(),
                line_num,
                stmt.cformat(),
                comment
            ),
            (Some(stmt @ Stmt::Label(_)), _, _) => {
                format!("{:24}| {:>4}: {} {}", "", line_num, stmt.cformat(), comment)
            }
            (Some(stmt), _, _) => format!(
                "{} | {:>4}: {} {}",
                cformat!("<r,s>[????] !!!!!!!!!!!!!!!!</>"),
                line_num,
                stmt.cformat(),
                comment
            ),
            (None, _, _) => format!("{:24}| {:>4}: {}", "", line_num, comment),
        };
        println!("{}", body);
    }
    println!("------------------------+-----------------------------------------------------");

    for (name, (kind, addr)) in asm.symbols().iter() {
        if *kind != crate::symbols::SymbolKind::Predefined {
            println!("  {:?} {:<24} = {}", kind, name, addr);
        }
    }
}
