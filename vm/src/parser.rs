use arch::inst::MAX_ADDR;
use arch::symbol::TEMP_SIZE;
use arch::vm::{ArithOp, Command, Segment};

use crate::error::Error;

/// Parse one line of VM code. Blank and comment-only lines give `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, Error> {
    let code = match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    };
    let words: Vec<&str> = code.split_whitespace().collect();
    let Some((&head, args)) = words.split_first() else {
        return Ok(None);
    };

    let cmd = match head {
        "push" | "pop" => {
            let [seg, idx] = args else {
                return Err(Error::Arity(head.to_string()));
            };
            let seg: Segment = seg
                .parse()
                .map_err(|_| Error::UnknownSegment(seg.to_string()))?;
            let idx = index(idx)?;
            check_segment(seg, idx)?;
            if head == "push" {
                Command::Push(seg, idx)
            } else if seg == Segment::Constant {
                return Err(Error::PopConstant);
            } else {
                Command::Pop(seg, idx)
            }
        }
        "label" | "goto" | "if-goto" => {
            let [label] = args else {
                return Err(Error::Arity(head.to_string()));
            };
            let label = name(label)?;
            match head {
                "label" => Command::Label(label),
                "goto" => Command::Goto(label),
                _ => Command::IfGoto(label),
            }
        }
        "function" | "call" => {
            let [func, n] = args else {
                return Err(Error::Arity(head.to_string()));
            };
            let func = name(func)?;
            let n = index(n)?;
            match head {
                "function" => Command::Function(func, n),
                _ => Command::Call(func, n),
            }
        }
        "return" => {
            if !args.is_empty() {
                return Err(Error::Arity(head.to_string()));
            }
            Command::Return
        }
        _ => {
            let op: ArithOp = head
                .parse()
                .map_err(|_| Error::UnknownCommand(head.to_string()))?;
            if !args.is_empty() {
                return Err(Error::Arity(head.to_string()));
            }
            Command::Arith(op)
        }
    };
    Ok(Some(cmd))
}

fn index(s: &str) -> Result<u16, Error> {
    match s.parse::<u16>() {
        Ok(v) if v <= MAX_ADDR => Ok(v),
        _ => Err(Error::InvalidIndex(s.to_string())),
    }
}

fn check_segment(seg: Segment, idx: u16) -> Result<(), Error> {
    let limit = match seg {
        Segment::Pointer => 2,
        Segment::Temp => TEMP_SIZE,
        _ => return Ok(()),
    };
    if idx < limit {
        Ok(())
    } else {
        Err(Error::IndexOutOfRange(seg.to_string(), idx))
    }
}

/// Function and label names: letters, digits, `_ . $ :`, not starting with a digit.
/// Letters, digits, `_ . $ :`, not starting with a digit.
pub fn is_name(s: &str) -> bool {
    s.chars().next().is_some_and(|c| !c.is_ascii_digit())
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':'))
}

fn name(s: &str) -> Result<String, Error> {
    if is_name(s) {
        Ok(s.to_string())
    } else {
        Err(Error::InvalidName(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! case {
        ($($name:ident: $line:expr => $expect:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(parse_line($line).unwrap(), $expect);
                }
            )*
        }
    }

    case! {
        blank: "" => None,
        comment: "  // push constant 1" => None,
        push: "push constant 7" => Some(Command::Push(Segment::Constant, 7)),
        pop_trailing_comment: "pop local 2 // x" => Some(Command::Pop(Segment::Local, 2)),
        tabs: "\tpush\targument  1" => Some(Command::Push(Segment::Argument, 1)),
        arith: "add" => Some(Command::Arith(ArithOp::Add)),
        compare: "lt" => Some(Command::Arith(ArithOp::Lt)),
        label: "label LOOP_START" => Some(Command::Label("LOOP_START".into())),
        if_goto: "if-goto END" => Some(Command::IfGoto("END".into())),
        function: "function Main.fibonacci 0" => Some(Command::Function("Main.fibonacci".into(), 0)),
        call: "call Math.multiply 2" => Some(Command::Call("Math.multiply".into(), 2)),
        ret: "return" => Some(Command::Return),
        pointer_one: "pop pointer 1" => Some(Command::Pop(Segment::Pointer, 1)),
        temp_seven: "push temp 7" => Some(Command::Push(Segment::Temp, 7)),
    }

    #[test]
    fn errors() {
        assert!(matches!(parse_line("mul"), Err(Error::UnknownCommand(_))));
        assert!(matches!(parse_line("push heap 0"), Err(Error::UnknownSegment(_))));
        assert!(matches!(parse_line("push local x"), Err(Error::InvalidIndex(_))));
        assert!(matches!(parse_line("push constant 32768"), Err(Error::InvalidIndex(_))));
        assert!(matches!(parse_line("pop constant 0"), Err(Error::PopConstant)));
        assert!(matches!(parse_line("pop pointer 2"), Err(Error::IndexOutOfRange(_, 2))));
        assert!(matches!(parse_line("push temp 8"), Err(Error::IndexOutOfRange(_, 8))));
        assert!(matches!(parse_line("push local"), Err(Error::Arity(_))));
        assert!(matches!(parse_line("add 1"), Err(Error::Arity(_))));
        assert!(matches!(parse_line("goto 1abc"), Err(Error::InvalidName(_))));
    }

    #[test]
    fn display_parses_back() {
        for line in ["push static 3", "pop that 0", "neg", "goto L", "call Foo.bar 3"] {
            let cmd = parse_line(line).unwrap().unwrap();
            assert_eq!(cmd.to_string(), line);
        }
    }
}
