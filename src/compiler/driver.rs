use std::fs;
use std::io::{ self, BufRead, Write };
use std::path::{ Path, PathBuf };

use clap::Parser as _;
use tempfile::Builder;
use thiserror::Error;
use tracing::{ debug, error, info, warn };

use crate::arena::Arena;
use crate::code_gen::asm_gen::{ AsmGen, GenError, GenWarning };
use crate::compiler::cl::CLOpt;
use crate::compiler::logging;
use crate::lex::lexer::{ LexError, Lexer };
use crate::parse::parser::{ ParseError, Parser };

pub const SOURCE_EXTENSION: &str = "newton";

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("no source file given")]
    NoInput,

    #[error("error reading file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("[Parser error] {0}")]
    Parse(#[from] ParseError),

    #[error("[Generator error] {0}")]
    Gen(#[from] GenError),

    #[error("{count} warning(s) treated as errors")]
    Strict { count: usize },

    #[error("error writing file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

impl CompileError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CompileError::NoInput | CompileError::Read { .. } => 3,
            CompileError::Parse(_) => 4,
            CompileError::Gen(_) | CompileError::Strict { .. } => 5,
            CompileError::Write { .. } => 6,
        }
    }
}

/// Result of one successful pipeline run, with the non-fatal diagnostics
/// collected on the way.
#[derive(Debug)]
pub struct Compiled {
    pub asm: String,
    pub lex_errors: Vec<LexError>,
    pub warnings: Vec<GenWarning>,
}

impl Compiled {
    pub fn diagnostic_count(&self) -> usize {
        self.lex_errors.len() + self.warnings.len()
    }
}

pub fn compile(args: Vec<String>) -> i32 {
    // parse args
    let args = match CLOpt::try_parse_from(args) {
        Ok(parsed_args) => parsed_args,
        Err(e) => {
            let _ = e.print();
            return e.exit_code();
        }
    };

    logging::init(args.verbose());

    match run(&args) {
        Ok(()) => 0,
        Err(e) => {
            error!("{}", e);
            e.exit_code()
        }
    }
}

pub fn run(args: &CLOpt) -> Result<(), CompileError> {
    let input_file = match args.file() {
        Some(path) => path.clone(),
        None => prompt_for_path(io::stdin().lock())?,
    };

    let mut suffix_warnings = 0;
    if !has_source_extension(&input_file) {
        warn!(file = %input_file.display(), "invalid file format, expected a .{} file", SOURCE_EXTENSION);
        suffix_warnings += 1;
    }

    let code = fs::read_to_string(&input_file)
        .map_err(|source| CompileError::Read { path: input_file.clone(), source })?;

    let compiled = compile_source(&code, args)?;

    let count = compiled.diagnostic_count() + suffix_warnings;
    if args.strict() && count > 0 {
        return Err(CompileError::Strict { count });
    }

    if args.stdout() {
        print!("{}", compiled.asm);
    }
    else {
        write_output(args.output(), &compiled.asm)?;
        info!(output = %args.output().display(), "assembly written");
    }

    Ok(())
}

/// Runs lexer, parser and generator over `code`. The arena lives here so it
/// outlives both the parse and the generation pass.
pub fn compile_source(code: &str, args: &CLOpt) -> Result<Compiled, CompileError> {
    // language frontend
    let mut lexer = Lexer::new(code);
    let tokens = lexer.tokenize();
    debug!(tokens = tokens.len(), lines = lexer.line(), "lexed source");

    if args.dump_tokens() {
        for tok in &tokens {
            println!("{:?}", tok);
        }
    }

    let arena = Arena::with_capacity(args.arena_capacity());
    let mut parser = Parser::new(tokens, &arena);
    let program = parser.parse_all()?;

    if args.dump_ast() {
        println!("{:#?}", program);
    }

    // assembly generation
    let mut asm_gen = AsmGen::new();
    let asm = asm_gen.gen_program(&program)?;

    debug!(arena_used = arena.used(), arena_capacity = arena.capacity(), "compilation finished");

    Ok(Compiled {
        asm,
        lex_errors: lexer.errors().to_vec(),
        warnings: asm_gen.warnings().to_vec(),
    })
}

pub fn has_source_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// Reads the source path as the first line of `input`.
pub fn prompt_for_path<R: BufRead>(mut input: R) -> Result<PathBuf, CompileError> {
    let mut line = String::new();
    input.read_line(&mut line)
        .map_err(|source| CompileError::Read { path: PathBuf::from("<stdin>"), source })?;

    let path = line.trim();
    if path.is_empty() {
        Err(CompileError::NoInput)
    }
    else {
        Ok(PathBuf::from(path))
    }
}

// a temporary file next to the target is persisted over it, so a failed
// write never leaves a truncated listing behind
fn write_output(path: &Path, asm: &str) -> Result<(), CompileError> {
    let write_err = |source: io::Error| CompileError::Write { path: path.to_path_buf(), source };

    let dir = path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut file = Builder::new()
        .prefix(".newtonc")
        .suffix(".asm")
        .tempfile_in(dir)
        .map_err(write_err)?;

    file.write_all(asm.as_bytes()).map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}
