pub mod arena;
pub mod ast;
pub mod lex;
pub mod parse;
pub mod code_gen;
pub mod compiler;
