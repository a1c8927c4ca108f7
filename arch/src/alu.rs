use bimap::BiMap;
use once_cell::sync::Lazy;

/// Computation field of a C-instruction: `a c1 c2 c3 c4 c5 c6`.
pub static COMP: Lazy<BiMap<&'static str, u8>> = Lazy::new(|| {
    [
        ("0", 0b0101010),
        ("1", 0b0111111),
        ("-1", 0b0111010),
        ("D", 0b0001100),
        ("A", 0b0110000),
        ("M", 0b1110000),
        ("!D", 0b0001101),
        ("!A", 0b0110001),
        ("!M", 0b1110001),
        ("-D", 0b0001111),
        ("-A", 0b0110011),
        ("-M", 0b1110011),
        ("D+1", 0b0011111),
        ("A+1", 0b0110111),
        ("M+1", 0b1110111),
        ("D-1", 0b0001110),
        ("A-1", 0b0110010),
        ("M-1", 0b1110010),
        ("D+A", 0b0000010),
        ("D+M", 0b1000010),
        ("D-A", 0b0010011),
        ("D-M", 0b1010011),
        ("A-D", 0b0000111),
        ("M-D", 0b1000111),
        ("D&A", 0b0000000),
        ("D&M", 0b1000000),
        ("D|A", 0b0010101),
        ("D|M", 0b1010101),
    ]
    .into_iter()
    .collect()
});

/// Look up a computation mnemonic.
/// Commutative forms such as `A+D` or `M|D` resolve to their table spelling.
pub fn comp_code(mnemonic: &str) -> Option<u8> {
    if let Some(code) = COMP.get_by_left(mnemonic) {
        return Some(*code);
    }
    let chars: Vec<char> = mnemonic.chars().collect();
    match chars.as_slice() {
        [x, op @ ('+' | '&' | '|'), y] => {
            let swapped: String = [*y, *op, *x].iter().collect();
            COMP.get_by_left(swapped.as_str()).copied()
        }
        _ => None,
    }
}

pub fn comp_mnemonic(code: u8) -> Option<&'static str> {
    COMP.get_by_right(&code).copied()
}

macro_rules! bit {
    ($c:expr, $n:expr) => {
        ($c >> $n) & 1 == 1
    };
}

/// Hack ALU over the six control bits `zx nx zy ny f no`.
pub fn alu(ctrl: u8, x: u16, y: u16) -> u16 {
    let x = if bit!(ctrl, 5) { 0 } else { x };
    let x = if bit!(ctrl, 4) { !x } else { x };
    let y = if bit!(ctrl, 3) { 0 } else { y };
    let y = if bit!(ctrl, 2) { !y } else { y };
    let out = if bit!(ctrl, 1) {
        x.wrapping_add(y)
    } else {
        x & y
    };
    if bit!(ctrl, 0) {
        !out
    } else {
        out
    }
}

/// Evaluate a 7-bit computation field; the `a` bit selects `M` over `A` as the y input.
pub fn compute(comp: u8, d: u16, a: u16, m: u16) -> u16 {
    let y = if bit!(comp, 6) { m } else { a };
    alu(comp & 0x3F, d, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_comp {
        ($($name:ident: $mnemonic:expr => $expect:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let code = comp_code($mnemonic).unwrap();
                    // D = 7, A = 3, M = 11
                    assert_eq!(compute(code, 7, 3, 11), $expect as u16);
                }
            )*
        }
    }

    test_comp! {
        comp_zero: "0" => 0,
        comp_one: "1" => 1,
        comp_minus_one: "-1" => -1i16,
        comp_d: "D" => 7,
        comp_m: "M" => 11,
        comp_not_a: "!A" => !3u16,
        comp_neg_d: "-D" => -7i16,
        comp_d_plus_one: "D+1" => 8,
        comp_m_minus_one: "M-1" => 10,
        comp_d_plus_a: "D+A" => 10,
        comp_d_minus_m: "D-M" => -4i16,
        comp_a_minus_d: "A-D" => -4i16,
        comp_d_and_a: "D&A" => 3,
        comp_d_or_m: "D|M" => 15,
        comp_swapped_add: "A+D" => 10,
        comp_swapped_or: "M|D" => 15,
    }

    #[test]
    fn unknown_comp() {
        assert_eq!(comp_code("D*A"), None);
        assert_eq!(comp_code("A-M"), None);
        assert_eq!(comp_code("D-1+"), None);
    }

    #[test]
    fn table_is_invertible() {
        for (mnemonic, code) in COMP.iter() {
            assert_eq!(comp_mnemonic(*code), Some(*mnemonic));
        }
    }
}
