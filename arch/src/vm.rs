use std::fmt;
use strum::{Display, EnumIter, EnumString};

/// Memory segments addressable by `push`/`pop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Segment {
    Constant,
    Argument,
    Local,
    Static,
    This,
    That,
    Pointer,
    Temp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ArithOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

/// One stack-machine instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Push(Segment, u16),
    Pop(Segment, u16),
    Arith(ArithOp),
    Label(String),
    Goto(String),
    IfGoto(String),
    Function(String, u16),
    Call(String, u16),
    Return,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Push(seg, idx) => write!(f, "push {} {}", seg, idx),
            Command::Pop(seg, idx) => write!(f, "pop {} {}", seg, idx),
            Command::Arith(op) => write!(f, "{}", op),
            Command::Label(label) => write!(f, "label {}", label),
            Command::Goto(label) => write!(f, "goto {}", label),
            Command::IfGoto(label) => write!(f, "if-goto {}", label),
            Command::Function(name, n) => write!(f, "function {} {}", name, n),
            Command::Call(name, n) => write!(f, "call {} {}", name, n),
            Command::Return => write!(f, "return"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_names() {
        assert_eq!(Segment::Argument.to_string(), "argument");
        assert_eq!("that".parse::<Segment>(), Ok(Segment::That));
        assert!("heap".parse::<Segment>().is_err());
    }

    #[test]
    fn command_text() {
        assert_eq!(Command::Push(Segment::Constant, 7).to_string(), "push constant 7");
        assert_eq!(Command::Arith(ArithOp::Eq).to_string(), "eq");
        assert_eq!(Command::IfGoto("ELSE0".into()).to_string(), "if-goto ELSE0");
        assert_eq!(
            Command::Function("Main.main".into(), 2).to_string(),
            "function Main.main 2"
        );
    }
}
