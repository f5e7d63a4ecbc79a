use crate::backends::{BackendType, GeneratorOptions};
use crate::parser::lexer::{InvalidCharPolicy, LexerOptions};

/// Everything one compile needs besides the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompilerConfig {
    pub lexer: LexerOptions,
    pub generator: GeneratorOptions,
    pub target: BackendType,
}

impl CompilerConfig {
    pub fn strict(mut self, strict: bool) -> Self {
        self.lexer.invalid_chars = if strict {
            InvalidCharPolicy::Reject
        } else {
            InvalidCharPolicy::Skip
        };
        self
    }

    pub fn async_wrap(mut self, async_wrap: bool) -> Self {
        self.generator.async_wrap = async_wrap;
        self
    }

    pub fn target(mut self, target: BackendType) -> Self {
        self.target = target;
        self
    }
}
