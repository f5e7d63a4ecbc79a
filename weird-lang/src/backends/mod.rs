pub mod javascript;

use crate::error::CompileError;
use crate::ir::ast;

pub trait Backend {
    fn generate(&mut self, program: &ast::Program) -> Result<String, CompileError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Wrap the whole program in `(async () => { ... })();` so input reads
    /// can suspend.
    pub async_wrap: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self { async_wrap: true }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendType {
    #[default]
    JavaScript,
}

impl BackendType {
    pub fn all() -> Vec<Self> {
        vec![Self::JavaScript]
    }

    pub fn from_name(name: &str) -> Result<Self, CompileError> {
        Self::all()
            .into_iter()
            .find(|backend| backend.name() == name)
            .ok_or_else(|| CompileError::UnknownTarget {
                name: name.to_string(),
            })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::JavaScript => "js",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::JavaScript => "JavaScript for Node.js (async stdin via node:readline)",
        }
    }

    /// File name of the generated code artifact.
    pub fn output_file(&self) -> &'static str {
        match self {
            Self::JavaScript => "code.js",
        }
    }

    pub fn create(&self, options: GeneratorOptions) -> Box<dyn Backend> {
        match self {
            Self::JavaScript => Box::new(javascript::JavaScriptBackend::new(options)),
        }
    }
}
