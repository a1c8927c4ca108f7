use once_cell::sync::Lazy;

pub const SP: u16 = 0;
pub const LCL: u16 = 1;
pub const ARG: u16 = 2;
pub const THIS: u16 = 3;
pub const THAT: u16 = 4;
pub const SCREEN: u16 = 0x4000;
pub const KBD: u16 = 0x6000;

/// Base of the `pointer` segment (THIS, THAT).
pub const POINTER_BASE: u16 = 3;
/// Base of the `temp` segment (R5..R12).
pub const TEMP_BASE: u16 = 5;
pub const TEMP_SIZE: u16 = 8;
/// First address handed out to assembler variables.
pub const VARIABLE_BASE: u16 = 16;
/// First usable stack address.
pub const STACK_BASE: u16 = 256;

pub const ROM_SIZE: usize = 0x8000;

/// Symbols every assembly program starts with.
pub static PREDEFINED: Lazy<Vec<(String, u16)>> = Lazy::new(|| {
    let mut symbols: Vec<(String, u16)> = (0..16).map(|i| (format!("R{}", i), i)).collect();
    symbols.extend(
        [
            ("SP", SP),
            ("LCL", LCL),
            ("ARG", ARG),
            ("THIS", THIS),
            ("THAT", THAT),
            ("SCREEN", SCREEN),
            ("KBD", KBD),
        ]
        .into_iter()
        .map(|(name, addr)| (name.to_string(), addr)),
    );
    symbols
});

#[test]
fn predefined() {
    assert_eq!(PREDEFINED.len(), 23);
    assert!(PREDEFINED.contains(&("R15".to_string(), 15)));
    assert!(PREDEFINED.contains(&("KBD".to_string(), 24576)));
    assert!(PREDEFINED.contains(&("SCREEN".to_string(), 16384)));
}
