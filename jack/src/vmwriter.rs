use arch::vm::{ArithOp, Command, Segment};
use std::io::{self, Write};

/// Writes VM commands as text, one per line.
pub struct VmWriter<W: Write> {
    out: W,
}

impl<W: Write> VmWriter<W> {
    pub fn new(out: W) -> Self {
        VmWriter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn write(&mut self, cmd: Command) -> io::Result<()> {
        writeln!(self.out, "{}", cmd)
    }

    pub fn write_push(&mut self, seg: Segment, idx: u16) -> io::Result<()> {
        self.write(Command::Push(seg, idx))
    }

    pub fn write_pop(&mut self, seg: Segment, idx: u16) -> io::Result<()> {
        self.write(Command::Pop(seg, idx))
    }

    pub fn write_arithmetic(&mut self, op: ArithOp) -> io::Result<()> {
        self.write(Command::Arith(op))
    }

    pub fn write_label(&mut self, label: &str) -> io::Result<()> {
        self.write(Command::Label(label.to_string()))
    }

    pub fn write_goto(&mut self, label: &str) -> io::Result<()> {
        self.write(Command::Goto(label.to_string()))
    }

    pub fn write_if(&mut self, label: &str) -> io::Result<()> {
        self.write(Command::IfGoto(label.to_string()))
    }

    pub fn write_call(&mut self, name: &str, args: u16) -> io::Result<()> {
        self.write(Command::Call(name.to_string(), args))
    }

    pub fn write_function(&mut self, name: &str, locals: u16) -> io::Result<()> {
        self.write(Command::Function(name.to_string(), locals))
    }

    pub fn write_return(&mut self) -> io::Result<()> {
        self.write(Command::Return)
    }
}
