pub mod alu;
pub mod inst;
pub mod source;
pub mod symbol;
pub mod vm;
