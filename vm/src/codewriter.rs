use std::io::{self, Write};

use arch::symbol::{POINTER_BASE, STACK_BASE, TEMP_BASE};
use arch::vm::{ArithOp, Command, Segment};

/// Function that owns the code emitted before the first `function` command.
pub const WRAPPER: &str = "Sys._wrapper";

/// Lowers VM commands to Hack assembly text.
///
/// Labels are scoped by the current function: `f$L` for program labels,
/// `f$cmp.<k>.<OP>` for comparisons and `f$ret.<k>` for return addresses.
/// Both counters restart at every `function`.
pub struct CodeWriter<W: Write> {
    out: W,
    file: String,
    func: String,
    cmp_count: usize,
    ret_count: usize,
}

impl<W: Write> CodeWriter<W> {
    pub fn new(out: W) -> Self {
        CodeWriter {
            out,
            file: String::new(),
            func: WRAPPER.to_string(),
            cmp_count: 0,
            ret_count: 0,
        }
    }

    /// Static variables of the following commands are named `<file>.<i>`.
    pub fn set_file(&mut self, file: &str) {
        self.file = file.to_string();
    }

    fn set_func(&mut self, func: &str) {
        self.func = func.to_string();
        self.cmp_count = 0;
        self.ret_count = 0;
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, lines: &[&str]) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    fn scoped(&self, label: &str) -> String {
        format!("{}${}", self.func, label)
    }

    /// `SP = 256; call Sys.init 0`
    pub fn bootstrap(&mut self) -> io::Result<()> {
        self.emit(&[&format!("@{}", STACK_BASE), "D=A", "@SP", "M=D"])?;
        self.write_call("Sys.init", 0)
    }

    /// Trailing loop for programs that have no `Sys.init` to return into.
    pub fn write_end_loop(&mut self) -> io::Result<()> {
        self.set_func(WRAPPER);
        let end = self.scoped("END");
        self.emit(&[&format!("({})", end), &format!("@{}", end), "0;JMP"])
    }

    /// Translate one command, preceded by a comment echoing it.
    pub fn write(&mut self, cmd: &Command) -> io::Result<()> {
        writeln!(self.out, "// {}", cmd)?;
        match cmd {
            Command::Push(seg, idx) => self.write_push(*seg, *idx),
            Command::Pop(seg, idx) => self.write_pop(*seg, *idx),
            Command::Arith(op) => self.write_arithmetic(*op),
            Command::Label(label) => self.write_label(label),
            Command::Goto(label) => self.write_goto(label),
            Command::IfGoto(label) => self.write_if(label),
            Command::Function(name, n) => self.write_function(name, *n),
            Command::Call(name, n) => self.write_call(name, *n),
            Command::Return => self.write_return(),
        }
    }

    // ------------------------------------------------------------------------
    // Stack primitives

    /// `*SP++ = D`
    fn push_d(&mut self) -> io::Result<()> {
        self.emit(&["@SP", "M=M+1", "A=M-1", "M=D"])
    }

    /// `D = *--SP`
    fn pop_d(&mut self) -> io::Result<()> {
        self.emit(&["@SP", "AM=M-1", "D=M"])
    }

    /// `D = value` for a constant.
    fn load_const(&mut self, value: u16) -> io::Result<()> {
        self.emit(&[&format!("@{}", value), "D=A"])
    }

    /// `D = RAM[symbol]`
    fn load(&mut self, symbol: &str) -> io::Result<()> {
        self.emit(&[&format!("@{}", symbol), "D=M"])
    }

    fn store(&mut self, symbol: &str) -> io::Result<()> {
        self.emit(&[&format!("@{}", symbol), "M=D"])
    }

    /// Leaves the address of `seg[idx]` in both A and D.
    fn select(&mut self, seg: Segment, idx: u16) -> io::Result<()> {
        let base = match seg {
            Segment::Static => {
                return self.emit(&[&format!("@{}.{}", self.file, idx), "D=A"]);
            }
            Segment::Pointer => {
                self.load_const(POINTER_BASE)?;
                return self.emit(&[&format!("@{}", idx), "AD=D+A"]);
            }
            Segment::Temp => {
                self.load_const(TEMP_BASE)?;
                return self.emit(&[&format!("@{}", idx), "AD=D+A"]);
            }
            Segment::Argument => "ARG",
            Segment::Local => "LCL",
            Segment::This => "THIS",
            Segment::That => "THAT",
            Segment::Constant => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "constant segment has no address",
                ))
            }
        };
        self.load(base)?;
        self.emit(&[&format!("@{}", idx), "AD=D+A"])
    }

    // ------------------------------------------------------------------------
    // Memory access

    pub fn write_push(&mut self, seg: Segment, idx: u16) -> io::Result<()> {
        if seg == Segment::Constant {
            self.load_const(idx)?;
        } else {
            self.select(seg, idx)?;
            self.emit(&["D=M"])?;
        }
        self.push_d()
    }

    /// Uses R13 for the target address.
    pub fn write_pop(&mut self, seg: Segment, idx: u16) -> io::Result<()> {
        self.select(seg, idx)?;
        self.store("R13")?;
        self.pop_d()?;
        self.emit(&["@R13", "A=M", "M=D"])
    }

    // ------------------------------------------------------------------------
    // Arithmetic

    pub fn write_arithmetic(&mut self, op: ArithOp) -> io::Result<()> {
        match op {
            ArithOp::Neg => self.unary("-"),
            ArithOp::Not => self.unary("!"),
            ArithOp::Add => self.binary("+"),
            ArithOp::Sub => self.binary("-"),
            ArithOp::And => self.binary("&"),
            ArithOp::Or => self.binary("|"),
            ArithOp::Eq | ArithOp::Gt | ArithOp::Lt => {
                self.compare(&op.to_string().to_uppercase())
            }
        }
    }

    fn unary(&mut self, op: &str) -> io::Result<()> {
        self.emit(&["@SP", "A=M-1", &format!("M={}M", op)])
    }

    /// Pops y, leaves A pointing at y's slot and `D = x op y`.
    fn binary_to_d(&mut self, op: &str) -> io::Result<()> {
        self.emit(&["@SP", "M=M-1", "A=M-1", "D=M", "A=A+1", &format!("D=D{}M", op)])
    }

    fn binary(&mut self, op: &str) -> io::Result<()> {
        self.binary_to_d(op)?;
        self.emit(&["A=A-1", "M=D"])
    }

    fn compare(&mut self, op: &str) -> io::Result<()> {
        self.binary_to_d("-")?;
        let prefix = self.scoped(&format!("cmp.{}", self.cmp_count));
        self.cmp_count += 1;
        let yes = format!("{}.{}", prefix, op);
        let no = format!("{}.NOT.{}", prefix, op);
        self.emit(&[
            &format!("@{}", yes),
            &format!("D;J{}", op),
            "@SP",
            "A=M-1",
            "M=0",
            &format!("@{}", no),
            "0;JMP",
            &format!("({})", yes),
            "@SP",
            "A=M-1",
            "M=-1",
            &format!("({})", no),
        ])
    }

    // ------------------------------------------------------------------------
    // Program flow

    pub fn write_label(&mut self, label: &str) -> io::Result<()> {
        let label = self.scoped(label);
        self.emit(&[&format!("({})", label)])
    }

    pub fn write_goto(&mut self, label: &str) -> io::Result<()> {
        let label = self.scoped(label);
        self.emit(&[&format!("@{}", label), "0;JMP"])
    }

    pub fn write_if(&mut self, label: &str) -> io::Result<()> {
        self.pop_d()?;
        let label = self.scoped(label);
        self.emit(&[&format!("@{}", label), "D;JNE"])
    }

    // ------------------------------------------------------------------------
    // Function calls

    pub fn write_function(&mut self, name: &str, locals: u16) -> io::Result<()> {
        self.set_func(name);
        self.emit(&[&format!("({})", name)])?;
        if locals > 0 {
            self.load_const(0)?;
            for _ in 0..locals {
                self.push_d()?;
            }
        }
        Ok(())
    }

    pub fn write_call(&mut self, name: &str, args: u16) -> io::Result<()> {
        let ret = self.scoped(&format!("ret.{}", self.ret_count));
        self.ret_count += 1;

        self.emit(&[&format!("@{}", ret), "D=A"])?;
        self.push_d()?;
        for reg in ["LCL", "ARG", "THIS", "THAT"] {
            self.load(reg)?;
            self.push_d()?;
        }
        self.emit(&[
            "@SP",
            "D=M",
            "@LCL",
            "M=D",
            "@5",
            "D=D-A",
            &format!("@{}", args),
            "D=D-A",
            "@ARG",
            "M=D",
            &format!("@{}", name),
            "0;JMP",
            &format!("({})", ret),
        ])
    }

    /// The return value is held in R13 until the caller's frame is restored,
    /// since `*ARG` may alias the return address slot when no arguments were passed.
    pub fn write_return(&mut self) -> io::Result<()> {
        self.pop_d()?;
        self.store("R13")?;
        self.load("ARG")?;
        self.store("R14")?;
        self.load("LCL")?;
        self.store("SP")?;
        for reg in ["THAT", "THIS", "ARG", "LCL", "R15"] {
            self.pop_d()?;
            self.store(reg)?;
        }
        self.load("R14")?;
        self.emit(&["@SP", "M=D+1"])?;
        self.load("R13")?;
        self.emit(&["@R14", "A=M", "M=D", "@R15", "A=M", "0;JMP"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lower(cmds: &[Command]) -> Vec<String> {
        let mut writer = CodeWriter::new(Vec::new());
        writer.set_file("Foo");
        for cmd in cmds {
            writer.write(cmd).unwrap();
        }
        String::from_utf8(writer.into_inner())
            .unwrap()
            .lines()
            .map(|s| s.to_string())
            .collect()
    }

    macro_rules! test_lower {
        ($($name:ident: [$($cmd:expr),*] => [$($line:expr),* $(,)?],)*) => {
            $(
                #[test]
                fn $name() {
                    let expect: Vec<&str> = vec![$($line),*];
                    assert_eq!(lower(&[$($cmd),*]), expect);
                }
            )*
        }
    }

    test_lower! {
        push_constant: [Command::Push(Segment::Constant, 7)] => [
            "// push constant 7", "@7", "D=A", "@SP", "M=M+1", "A=M-1", "M=D",
        ],
        push_static: [Command::Push(Segment::Static, 3)] => [
            "// push static 3", "@Foo.3", "D=A", "D=M", "@SP", "M=M+1", "A=M-1", "M=D",
        ],
        push_local: [Command::Push(Segment::Local, 2)] => [
            "// push local 2", "@LCL", "D=M", "@2", "AD=D+A", "D=M",
            "@SP", "M=M+1", "A=M-1", "M=D",
        ],
        pop_temp: [Command::Pop(Segment::Temp, 6)] => [
            "// pop temp 6", "@5", "D=A", "@6", "AD=D+A", "@R13", "M=D",
            "@SP", "AM=M-1", "D=M", "@R13", "A=M", "M=D",
        ],
        add: [Command::Arith(ArithOp::Add)] => [
            "// add", "@SP", "M=M-1", "A=M-1", "D=M", "A=A+1", "D=D+M", "A=A-1", "M=D",
        ],
        not: [Command::Arith(ArithOp::Not)] => ["// not", "@SP", "A=M-1", "M=!M"],
        goto_is_scoped: [Command::Function("Foo.f".into(), 0), Command::Goto("L".into())] => [
            "// function Foo.f 0", "(Foo.f)", "// goto L", "@Foo.f$L", "0;JMP",
        ],
        function_locals: [Command::Function("Foo.g".into(), 2)] => [
            "// function Foo.g 2", "(Foo.g)", "@0", "D=A",
            "@SP", "M=M+1", "A=M-1", "M=D",
            "@SP", "M=M+1", "A=M-1", "M=D",
        ],
    }

    #[test]
    fn compare_labels_count_per_function() {
        let lines = lower(&[
            Command::Arith(ArithOp::Eq),
            Command::Arith(ArithOp::Lt),
            Command::Function("Foo.f".into(), 0),
            Command::Arith(ArithOp::Gt),
        ]);
        assert!(lines.contains(&"(Sys._wrapper$cmp.0.EQ)".to_string()));
        assert!(lines.contains(&"(Sys._wrapper$cmp.1.NOT.LT)".to_string()));
        assert!(lines.contains(&"D;JLT".to_string()));
        assert!(lines.contains(&"(Foo.f$cmp.0.GT)".to_string()));
    }

    #[test]
    fn return_labels_count_per_function() {
        let lines = lower(&[
            Command::Function("Foo.f".into(), 0),
            Command::Call("Foo.g".into(), 1),
            Command::Call("Foo.g".into(), 1),
            Command::Function("Foo.h".into(), 0),
            Command::Call("Foo.g".into(), 0),
        ]);
        assert!(lines.contains(&"(Foo.f$ret.0)".to_string()));
        assert!(lines.contains(&"(Foo.f$ret.1)".to_string()));
        assert!(lines.contains(&"(Foo.h$ret.0)".to_string()));
        assert!(!lines.contains(&"(Foo.h$ret.1)".to_string()));
    }

    #[test]
    fn bootstrap_calls_sys_init() {
        let mut writer = CodeWriter::new(Vec::new());
        writer.bootstrap().unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert!(text.starts_with("@256\nD=A\n@SP\nM=D\n@Sys._wrapper$ret.0\nD=A\n"));
        assert!(text.contains("@Sys.init\n0;JMP\n(Sys._wrapper$ret.0)\n"));
    }
}
