pub mod asm_gen;
