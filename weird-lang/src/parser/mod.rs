pub mod lexer;
pub mod parser;
pub mod reserved;

use crate::error::CompileError;
use crate::ir::ast;

/// Source text straight to AST, without code generation.
pub fn parse(source: &str, options: lexer::LexerOptions) -> Result<ast::Program, CompileError> {
    let tokens = lexer::Lexer::with_options(source, options).tokenize()?;
    let program = parser::parse_tokens(&tokens)?;
    Ok(program)
}
