pub mod cursor;
pub mod token;
pub mod tokenizer;
