use hackasm::{assemble, assemble_path, Assembler, Error};

fn src(name: &str, text: &str) -> Vec<(String, String)> {
    vec![(name.to_string(), text.to_string())]
}

fn assert(code: &str, expect: &[&str]) {
    let hack = assemble(&src("Test.asm", code)).unwrap();
    println!("{}", hack);
    assert_eq!(hack.lines().collect::<Vec<_>>(), expect);
}

macro_rules! case {
    ($name:ident, $code:expr, [$($expect:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            assert($code, &[$($expect),*]);
        }
    };
}

case!(
    add_two_constants,
    "@2\nD=A\n@3\nD=D+A\n@0\nM=D\n",
    [
        "0000000000000010",
        "1110110000010000",
        "0000000000000011",
        "1110000010010000",
        "0000000000000000",
        "1110001100001000",
    ]
);

case!(
    label_binds_to_next_instruction,
    "// comment\n(START)\n@END\n0;JMP\n(END)\n@START\n0;JMP\n",
    [
        "0000000000000010",
        "1110101010000111",
        "0000000000000000",
        "1110101010000111",
    ]
);

case!(
    variables_from_sixteen,
    "@i\nM=1\n@sum\nM=0\n@i\nD=M\n",
    [
        "0000000000010000",
        "1110111111001000",
        "0000000000010001",
        "1110101010001000",
        "0000000000010000",
        "1111110000010000",
    ]
);

case!(
    predefined_symbols,
    "@SCREEN\n@KBD\n@R15\n@THAT\n",
    [
        "0100000000000000",
        "0110000000000000",
        "0000000000001111",
        "0000000000000100",
    ]
);

case!(
    forward_label_is_not_a_variable,
    "@LOOP\n0;JMP\n@x\n(LOOP)\n@x\n",
    [
        "0000000000000011",
        "1110101010000111",
        "0000000000010000",
        "0000000000010000",
    ]
);

#[test]
fn no_trailing_newline() {
    let hack = assemble(&src("Test.asm", "@1\n@2\n")).unwrap();
    assert_eq!(hack, "0000000000000001\n0000000000000010");
}

#[test]
fn label_address_counts_only_instructions() {
    let code = "(A)\n// x\n\n@1\n(B)\n(C)\nD=A\n@B\n@C\n";
    let mut asm = Assembler::new();
    asm.add_source("Test.asm", code).unwrap();
    asm.resolve().unwrap();
    assert_eq!(asm.symbols().get("A"), Some(0));
    assert_eq!(asm.symbols().get("B"), Some(1));
    assert_eq!(asm.symbols().get("C"), Some(1));
}

#[test]
fn duplicate_label_last_wins() {
    let code = "(X)\n@1\n(X)\n@X\n";
    let mut asm = Assembler::new();
    asm.add_source("Test.asm", code).unwrap();
    let insts = asm.resolve().unwrap();
    assert_eq!(asm.warnings().len(), 1);
    assert_eq!(asm.warnings()[0].line, 2);
    assert_eq!(insts[1].to_line(), "0000000000000001");
}

#[test]
fn unknown_comp_has_location() {
    let err = assemble(&src("Bad.asm", "@1\nD=D*A\n")).unwrap_err();
    match err {
        Error::At { file, line, source } => {
            assert_eq!(file, "Bad.asm");
            assert_eq!(line, 1);
            assert!(matches!(*source, Error::UnknownComp(ref s) if s == "D*A"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

fn rom_overflow_line(code: &str) -> usize {
    match assemble(&src("Big.asm", code)).unwrap_err() {
        Error::At { line, source, .. } => {
            assert!(matches!(*source, Error::RomOverflow));
            line
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn full_rom_assembles() {
    let hack = assemble(&src("Big.asm", &"D=A\n".repeat(32768))).unwrap();
    assert_eq!(hack.lines().count(), 32768);
}

#[test]
fn instruction_past_rom_is_an_error() {
    assert_eq!(rom_overflow_line(&"D=A\n".repeat(32769)), 32768);
    assert_eq!(rom_overflow_line(&"D=A\n".repeat(65536)), 32768);
}

#[test]
fn label_past_rom_is_an_error() {
    let code = format!("@END\n0;JMP\n{}(END)\n", "D=A\n".repeat(32766));
    assert_eq!(rom_overflow_line(&code), 32768);
}

#[test]
fn labels_are_shared_across_files() {
    let sources = vec![
        ("A.asm".to_string(), "@Lib.start\n0;JMP\n".to_string()),
        ("B.asm".to_string(), "(Lib.start)\n@7\n".to_string()),
    ];
    let hack = assemble(&sources).unwrap();
    assert_eq!(hack.lines().next(), Some("0000000000000010"));
}

#[test]
fn directory_stops_on_first_error() {
    let dir = std::env::temp_dir().join(format!("hackasm-batch-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("a.asm"), "@1\nD=A\n").unwrap();
    std::fs::write(dir.join("b.asm"), "D=Q\n").unwrap();

    assert!(assemble_path(&dir).is_err());
    let output = arch::source::output_path(&dir, "hack");
    assert!(!output.exists());

    std::fs::write(dir.join("b.asm"), "M=D\n").unwrap();
    let written = assemble_path(&dir).unwrap();
    assert_eq!(written, output);
    assert_eq!(
        std::fs::read_to_string(&written).unwrap(),
        "0000000000000001\n1110110000010000\n1110001100001000"
    );

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn empty_directory_is_an_error() {
    let dir = std::env::temp_dir().join(format!("hackasm-empty-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    assert!(matches!(assemble_path(&dir), Err(Error::NoInput(_))));
    std::fs::remove_dir_all(&dir).unwrap();
}
