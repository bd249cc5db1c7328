use std::path::PathBuf;
use clap::{ ArgAction, Parser };

use crate::arena::DEFAULT_ARENA_CAPACITY;

/// Compiles a `.newton` source file to x86-64 NASM assembly for Linux.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct CLOpt {
    /// Source file, read from standard input when omitted
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    #[arg(short, long, default_value = "out.asm", value_name = "PATH")]
    output: PathBuf,

    /// Upper bound for the AST arena
    #[arg(long, default_value_t = DEFAULT_ARENA_CAPACITY, value_name = "BYTES")]
    arena_capacity: usize,

    /// Treat warnings and lexical errors as fatal
    #[arg(long)]
    strict: bool,

    #[arg(long)]
    dump_tokens: bool,

    #[arg(long)]
    dump_ast: bool,

    /// Print the assembly instead of writing the output file
    #[arg(short = 'S', long)]
    stdout: bool,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl CLOpt {
    pub fn file(&self) -> Option<&PathBuf> {
        self.file.as_ref()
    }

    pub fn output(&self) -> &PathBuf {
        &self.output
    }

    pub fn arena_capacity(&self) -> usize {
        self.arena_capacity
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn dump_tokens(&self) -> bool {
        self.dump_tokens
    }

    pub fn dump_ast(&self) -> bool {
        self.dump_ast
    }

    pub fn stdout(&self) -> bool {
        self.stdout
    }

    pub fn verbose(&self) -> u8 {
        self.verbose
    }
}
