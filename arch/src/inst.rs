use crate::alu::{comp_code, comp_mnemonic};

use color_print::cformat;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;
use strum::{Display, EnumIter, EnumString};

/// Largest value an A-instruction can load.
pub const MAX_ADDR: u16 = 0x7FFF;

// ----------------------------------------------------------------------------
// Destination

/// Destination field `d1 d2 d3` = `A D M`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dest(u8);

impl Dest {
    pub const A: u8 = 0b100;
    pub const D: u8 = 0b010;
    pub const M: u8 = 0b001;

    /// Accepts `null` or any ordering of the letters `A`, `D`, `M`, each at most once.
    pub fn parse(s: &str) -> Option<Dest> {
        if s == "null" {
            return Some(Dest(0));
        }
        if s.is_empty() {
            return None;
        }
        let mut bits = 0;
        for ch in s.chars() {
            let bit = match ch {
                'A' => Dest::A,
                'D' => Dest::D,
                'M' => Dest::M,
                _ => return None,
            };
            if bits & bit != 0 {
                return None;
            }
            bits |= bit;
        }
        Some(Dest(bits))
    }

    pub fn from_bits(bits: u8) -> Dest {
        Dest(bits & 0b111)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    pub fn a(self) -> bool {
        self.0 & Dest::A != 0
    }

    pub fn d(self) -> bool {
        self.0 & Dest::D != 0
    }

    pub fn m(self) -> bool {
        self.0 & Dest::M != 0
    }
}

impl fmt::Display for Dest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "null");
        }
        for (set, name) in [(self.a(), "A"), (self.d(), "D"), (self.m(), "M")] {
            if set {
                write!(f, "{}", name)?;
            }
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Computation

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comp(u8);

impl Comp {
    pub fn parse(s: &str) -> Option<Comp> {
        comp_code(s).map(Comp)
    }

    /// Only bit patterns present in the computation table are accepted.
    pub fn from_bits(bits: u8) -> Option<Comp> {
        comp_mnemonic(bits & 0x7F).map(|_| Comp(bits & 0x7F))
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Comp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", comp_mnemonic(self.0).unwrap_or("?"))
    }
}

// ----------------------------------------------------------------------------
// Jump

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    Display,
    EnumIter,
)]
#[repr(u8)]
pub enum Jump {
    #[default]
    #[strum(serialize = "null")]
    NULL,
    JGT,
    JEQ,
    JGE,
    JLT,
    JNE,
    JLE,
    JMP,
}

impl Jump {
    pub fn from_bits(bits: u8) -> Jump {
        // Three bits always map onto a variant.
        Jump::try_from(bits & 0b111).unwrap_or_default()
    }

    /// Whether the jump is taken for an ALU output.
    pub fn taken(self, out: u16) -> bool {
        let out = out as i16;
        match self {
            Jump::NULL => false,
            Jump::JGT => out > 0,
            Jump::JEQ => out == 0,
            Jump::JGE => out >= 0,
            Jump::JLT => out < 0,
            Jump::JNE => out != 0,
            Jump::JLE => out <= 0,
            Jump::JMP => true,
        }
    }
}

// ----------------------------------------------------------------------------
// Instruction

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    A(u16),
    C(Dest, Comp, Jump),
}

impl Inst {
    pub fn to_bin(&self) -> u16 {
        match *self {
            Inst::A(val) => val & MAX_ADDR,
            Inst::C(dest, comp, jump) => {
                let jump: u8 = jump.into();
                0b111 << 13
                    | (comp.bits() as u16) << 6
                    | (dest.bits() as u16) << 3
                    | jump as u16
            }
        }
    }

    pub fn from_bin(bin: u16) -> Option<Inst> {
        if bin & 0x8000 == 0 {
            return Some(Inst::A(bin));
        }
        let comp = Comp::from_bits((bin >> 6) as u8)?;
        let dest = Dest::from_bits((bin >> 3) as u8);
        let jump = Jump::from_bits(bin as u8);
        Some(Inst::C(dest, comp, jump))
    }

    /// Sixteen `0`/`1` characters, most significant bit first.
    pub fn to_line(&self) -> String {
        format!("{:016b}", self.to_bin())
    }

    pub fn from_line(line: &str) -> Option<Inst> {
        if line.len() != 16 {
            return None;
        }
        u16::from_str_radix(line, 2).ok().and_then(Inst::from_bin)
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inst::A(val) => write!(f, "@{}", val),
            Inst::C(dest, comp, jump) => {
                if !dest.is_null() {
                    write!(f, "{}=", dest)?;
                }
                write!(f, "{}", comp)?;
                if *jump != Jump::NULL {
                    write!(f, ";{}", jump)?;
                }
                Ok(())
            }
        }
    }
}

impl Inst {
    pub fn cformat(&self) -> String {
        match self {
            Inst::A(val) => cformat!("<y>@{}</>", val),
            Inst::C(dest, comp, jump) => {
                let dest = match dest.is_null() {
                    true => String::new(),
                    false => cformat!("<b>{}</>=", dest),
                };
                let jump = match jump {
                    Jump::NULL => String::new(),
                    _ => cformat!(";<r>{}</>", jump),
                };
                format!("{}{}{}", dest, comp, jump)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn c(dest: &str, comp: &str, jump: &str) -> Inst {
        Inst::C(
            Dest::parse(dest).unwrap(),
            Comp::parse(comp).unwrap(),
            jump.parse().unwrap(),
        )
    }

    macro_rules! test_encode {
        ($($name:ident: $inst:expr => $line:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let inst = $inst;
                    assert_eq!(inst.to_line(), $line);
                    assert_eq!(Inst::from_line($line), Some(inst));
                }
            )*
        }
    }

    test_encode! {
        encode_at_two: Inst::A(2) => "0000000000000010",
        encode_at_zero: Inst::A(0) => "0000000000000000",
        encode_at_max: Inst::A(MAX_ADDR) => "0111111111111111",
        encode_d_eq_a: c("D", "A", "null") => "1110110000010000",
        encode_d_eq_d_plus_a: c("D", "D+A", "null") => "1110000010010000",
        encode_m_eq_d: c("M", "D", "null") => "1110001100001000",
        encode_jmp: c("null", "0", "JMP") => "1110101010000111",
        encode_dm_eq_m_plus_one: c("DM", "M+1", "null") => "1111110111011000",
        encode_adm_jle: c("ADM", "D|M", "JLE") => "1111010101111110",
        encode_d_jgt: c("null", "D", "JGT") => "1110001100000001",
    }

    #[test]
    fn dest_letters_any_order() {
        assert_eq!(Dest::parse("MD"), Dest::parse("DM"));
        assert_eq!(Dest::parse("AMD").map(Dest::bits), Some(0b111));
        assert_eq!(Dest::parse("MM"), None);
        assert_eq!(Dest::parse("X"), None);
        assert_eq!(Dest::parse(""), None);
    }

    #[test]
    fn decode_reproduces_mnemonics() {
        for jump in Jump::iter() {
            for dest in ["null", "M", "D", "DM", "A", "AM", "AD", "ADM"] {
                for comp in ["0", "-1", "D+M", "A-D", "!M", "D&A"] {
                    let line = c(dest, comp, &jump.to_string()).to_line();
                    match Inst::from_line(&line) {
                        Some(Inst::C(d, cc, j)) => {
                            assert_eq!(d.to_string(), dest);
                            assert_eq!(cc.to_string(), comp);
                            assert_eq!(j, jump);
                        }
                        other => panic!("{} decoded as {:?}", line, other),
                    }
                }
            }
        }
    }

    #[test]
    fn undefined_comp_bits() {
        // a=1 c=101010 is not a defined computation
        assert_eq!(Inst::from_bin(0b1111_1010_1000_0000), None);
    }

    #[test]
    fn display() {
        assert_eq!(c("AM", "M-1", "null").to_string(), "AM=M-1");
        assert_eq!(c("null", "D", "JNE").to_string(), "D;JNE");
        assert_eq!(Inst::A(17).to_string(), "@17");
    }
}
