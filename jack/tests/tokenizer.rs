use jackc::grammer::token::TokenKind;
use jackc::grammer::tokenizer::Tokenizer;

fn kinds(src: &str) -> Vec<TokenKind> {
    Tokenizer::new(src)
        .map(|t| t.expect("lexical error").kind)
        .collect()
}

fn assert_same(a: &str, b: &str) {
    assert_eq!(kinds(a), kinds(b));
}

macro_rules! case {
    ($name:ident, $a:expr, $b:expr) => {
        #[test]
        fn $name() {
            assert_same($a, $b);
        }
    };
}

case!(
    line_vs_block,
    "let x = 1; // set x\nlet y = x / 2;",
    "let x = 1; /* set x */ let y = x / 2;"
);
case!(
    doc_comment,
    "/** Point class.\n * @author\n */\nclass Point {}",
    "class Point {}"
);
case!(
    comment_between_tokens,
    "do Output.printInt(/* arg */ 1);",
    "do Output.printInt(1);"
);
case!(
    no_whitespace,
    "if(x<1){let y=-x;}",
    "if ( x < 1 ) { let y = - x ; }"
);
case!(
    comment_markers_in_string,
    "let s = \"// not /* a */ comment\";",
    "let s = \"// not /* a */ comment\"; // trailing"
);

#[test]
fn accessors() {
    let mut t = Tokenizer::new("while x 12 \"s\" ;");
    let mut seen = Vec::new();
    while t.has_more_tokens() {
        t.advance().unwrap();
        seen.push(t.token().unwrap().token_type().to_string());
    }
    assert_eq!(
        seen,
        vec!["keyword", "identifier", "integerConstant", "stringConstant", "symbol"]
    );
}
