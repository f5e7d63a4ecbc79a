use thiserror::Error;

use crate::span::Span;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Unexpected character '{ch}' at {span}")]
    UnexpectedCharacter { ch: char, span: Span },

    #[error("Unterminated {quote}-quoted string literal starting at {span}")]
    UnterminatedLiteral { quote: char, span: Span },

    #[error("Invalid number literal '{text}' at {span}")]
    InvalidNumber { text: String, span: Span },

    #[error("Syntax error at {span}: expected {expected}, but reached end of input")]
    UnexpectedEndOfInput { expected: String, span: Span },

    #[error("Syntax error at {span}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Syntax error at {span}: empty expression in {context}")]
    EmptyExpression { context: &'static str, span: Span },

    #[error("Unknown target: {name}")]
    UnknownTarget { name: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}

impl CompileError {
    /// Source position of the offending input, when the error has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedCharacter { span, .. }
            | Self::UnterminatedLiteral { span, .. }
            | Self::InvalidNumber { span, .. }
            | Self::UnexpectedEndOfInput { span, .. }
            | Self::UnexpectedToken { span, .. }
            | Self::EmptyExpression { span, .. } => Some(*span),
            Self::UnknownTarget { .. } | Self::Io { .. } | Self::Serialize { .. } => None,
        }
    }
}
