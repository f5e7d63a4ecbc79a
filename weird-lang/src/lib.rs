//! Weird Lang: a three-stage source-to-source compiler.
//!
//! `parser::lexer` turns source text into tokens, `parser::parser` rebuilds
//! them into a statement tree whose expressions are already-lowered
//! JavaScript text, and `backends` emits a runnable program from that tree.

pub mod backends;
pub mod config;
pub mod error;
pub mod ir;
pub mod output;
pub mod parser;
pub mod span;

pub use config::CompilerConfig;
pub use error::CompileError;

use ir::ast::Program;
use parser::lexer::{Lexer, Token};

/// The three artifacts of one compile.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub program: Program,
    pub code: String,
}

pub fn compile(source: &str, config: &CompilerConfig) -> Result<Compilation, CompileError> {
    let tokens = Lexer::with_options(source, config.lexer).tokenize()?;
    let program = parser::parser::parse_tokens(&tokens)?;
    let mut backend = config.target.create(config.generator);
    let code = backend.generate(&program)?;

    Ok(Compilation {
        tokens,
        program,
        code,
    })
}
