use arch::inst::{Comp, Dest, Jump, MAX_ADDR};
use color_print::cformat;

use crate::error::Error;

// ----------------------------------------------------------------------------
// Statement

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    A(Addr),
    C(Dest, Comp, Jump),
    Label(String),
}

impl Stmt {
    /// Parse one source line. Blank and comment-only lines give `None`.
    pub fn parse(line: &str) -> Result<Option<Stmt>, Error> {
        let code = match line.find("//") {
            Some(idx) => &line[..idx],
            None => line,
        };
        let code: String = code.chars().filter(|c| !c.is_whitespace()).collect();

        if code.is_empty() {
            return Ok(None);
        }

        // (LABEL)
        if let Some(rest) = code.strip_prefix('(') {
            let label = rest
                .strip_suffix(')')
                .ok_or(Error::SyntaxError(code.clone()))?;
            if !is_symbol(label) {
                return Err(Error::InvalidSymbol(label.to_string()));
            }
            return Ok(Some(Stmt::Label(label.to_string())));
        }

        // @value
        if let Some(value) = code.strip_prefix('@') {
            return Addr::parse(value).map(|addr| Some(Stmt::A(addr)));
        }

        // dest=comp;jump
        let (dest, rest) = match code.split_once('=') {
            Some((dest, rest)) => (dest, rest),
            None => ("null", code.as_str()),
        };
        let (comp, jump) = match rest.split_once(';') {
            Some((comp, jump)) => (comp, jump),
            None => (rest, "null"),
        };
        let dest = Dest::parse(dest).ok_or(Error::UnknownDest(dest.to_string()))?;
        let comp = Comp::parse(comp).ok_or(Error::UnknownComp(comp.to_string()))?;
        let jump = jump
            .parse::<Jump>()
            .map_err(|_| Error::UnknownJump(jump.to_string()))?;
        Ok(Some(Stmt::C(dest, comp, jump)))
    }

    pub fn cformat(&self) -> String {
        match self {
            Stmt::A(addr) => cformat!("  <r>@</>{}", addr.cformat()),
            Stmt::C(dest, comp, jump) => {
                let dest = match dest.is_null() {
                    true => String::new(),
                    false => cformat!("<b>{}</>=", dest),
                };
                let jump = match jump {
                    Jump::NULL => String::new(),
                    _ => cformat!(";<r>{}</>", jump),
                };
                format!("  {}{}{}", dest, comp, jump)
            }
            Stmt::Label(label) => cformat!("<g>({})</>", label),
        }
    }
}

// ----------------------------------------------------------------------------
// Address operand

#[derive(Debug, Clone, PartialEq)]
pub enum Addr {
    Literal(u16),
    Symbol(String),
}

impl Addr {
    fn parse(s: &str) -> Result<Addr, Error> {
        if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
            return match s.parse::<u16>() {
                Ok(v) if v <= MAX_ADDR => Ok(Addr::Literal(v)),
                _ => Err(Error::AddressOutOfRange(s.to_string())),
            };
        }
        if is_symbol(s) {
            Ok(Addr::Symbol(s.to_string()))
        } else {
            Err(Error::InvalidSymbol(s.to_string()))
        }
    }

    fn cformat(&self) -> String {
        match self {
            Addr::Literal(v) => cformat!("<y>{}</>", v),
            Addr::Symbol(s) => cformat!("<c>{}</>", s),
        }
    }
}

/// Letters, digits, `_ . $ :`, not starting with a digit.
fn is_symbol(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || matches!(c, '_' | '.' | '$' | ':') => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(dest: &str, comp: &str, jump: Jump) -> Stmt {
        Stmt::C(Dest::parse(dest).unwrap(), Comp::parse(comp).unwrap(), jump)
    }

    macro_rules! case {
        ($($name:ident: $line:expr => $expect:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(Stmt::parse($line).unwrap(), $expect);
                }
            )*
        }
    }

    case! {
        blank: "   " => None,
        comment_only: "// hello" => None,
        literal: "@21" => Some(Stmt::A(Addr::Literal(21))),
        symbol: "@LOOP // jump target" => Some(Stmt::A(Addr::Symbol("LOOP".into()))),
        vm_symbol: "@Main.main$ret.0" => Some(Stmt::A(Addr::Symbol("Main.main$ret.0".into()))),
        label: "(END)" => Some(Stmt::Label("END".into())),
        assign: "D=M" => Some(c("D", "M", Jump::NULL)),
        jump_only: "0;JMP" => Some(c("null", "0", Jump::JMP)),
        full: "AM=M-1;JNE" => Some(c("AM", "M-1", Jump::JNE)),
        spaced: "  D = D + A  " => Some(c("D", "D+A", Jump::NULL)),
    }

    #[test]
    fn errors() {
        assert!(matches!(Stmt::parse("D=D*A"), Err(Error::UnknownComp(s)) if s == "D*A"));
        assert!(matches!(Stmt::parse("X=A"), Err(Error::UnknownDest(_))));
        assert!(matches!(Stmt::parse("0;JMPX"), Err(Error::UnknownJump(_))));
        assert!(matches!(Stmt::parse("@32768"), Err(Error::AddressOutOfRange(_))));
        assert!(matches!(Stmt::parse("@1abc"), Err(Error::InvalidSymbol(_))));
        assert!(matches!(Stmt::parse("(END"), Err(Error::SyntaxError(_))));
        assert!(matches!(Stmt::parse("()"), Err(Error::InvalidSymbol(_))));
    }
}
