use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::Compilation;
use crate::backends::BackendType;
use crate::error::CompileError;
use crate::ir::ast::Program;
use crate::parser::lexer::Token;

pub const TOKENS_FILE: &str = "tokens.json";
pub const AST_FILE: &str = "ast.json";

pub fn tokens_json(tokens: &[Token]) -> Result<String, CompileError> {
    Ok(serde_json::to_string_pretty(tokens)?)
}

pub fn ast_json(program: &Program) -> Result<String, CompileError> {
    Ok(serde_json::to_string_pretty(program)?)
}

/// Writes the token dump, the AST dump and the generated code into `dir`,
/// creating it if needed. Returns the paths written, in that order.
pub fn write_artifacts(
    dir: &Path,
    compilation: &Compilation,
    target: BackendType,
) -> Result<Vec<PathBuf>, CompileError> {
    fs::create_dir_all(dir)?;

    let artifacts = [
        (TOKENS_FILE, tokens_json(&compilation.tokens)?),
        (AST_FILE, ast_json(&compilation.program)?),
        (target.output_file(), compilation.code.clone()),
    ];

    let mut written = Vec::with_capacity(artifacts.len());
    for (name, contents) in artifacts {
        let path = dir.join(name);
        fs::write(&path, contents)?;
        info!(path = %path.display(), "wrote artifact");
        written.push(path);
    }
    Ok(written)
}
