use tracing::{info, warn};

use super::{Backend, GeneratorOptions};
use crate::error::CompileError;
use crate::ir::ast::{self, Statement};

/// Shared line reader, prepended once to any program that reads input.
pub const INPUT_PREAMBLE: &str = r#"const readline = require('node:readline').createInterface({
  input: process.stdin,
  output: process.stdout,
});
function readLineAsyncQuestion(message) {
  return new Promise((resolve, reject) => {
    readline.question(message, (answer) => {
      resolve(answer);
    });
  });
}

"#;

const READ_LINE: &str = "readLineAsyncQuestion";
const CLOSE_INPUT: &str = "readline.close();\n";
const ASYNC_OPEN: &str = "(async () => {\n";
const ASYNC_CLOSE: &str = "})();";

pub struct JavaScriptBackend {
    options: GeneratorOptions,
    reads_input: bool,
}

impl Backend for JavaScriptBackend {
    fn generate(&mut self, program: &ast::Program) -> Result<String, CompileError> {
        Ok(self.generate_program(program))
    }
}

impl JavaScriptBackend {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            options,
            reads_input: false,
        }
    }

    pub fn generate_program(&mut self, program: &ast::Program) -> String {
        info!(
            statements = program.body.len(),
            async_wrap = self.options.async_wrap,
            "generating code"
        );
        self.reads_input = false;
        let body = self.generate_block(&program.body);

        let mut code = String::new();
        if self.reads_input {
            if !self.options.async_wrap {
                warn!("input reads are awaited outside an async wrapper; the host must allow top-level await");
            }
            code.push_str(INPUT_PREAMBLE);
        }
        if self.options.async_wrap {
            code.push_str(ASYNC_OPEN);
        }
        code.push_str(&body);
        if self.reads_input {
            code.push_str(CLOSE_INPUT);
        }
        if self.options.async_wrap {
            code.push_str(ASYNC_CLOSE);
        }

        info!(bytes = code.len(), reads_input = self.reads_input, "code generation completed");
        code
    }

    /// Statements of one block, never wrapped; nested bodies recurse here.
    fn generate_block(&mut self, block: &[Statement]) -> String {
        block
            .iter()
            .map(|statement| self.generate_statement(statement))
            .collect()
    }

    fn generate_statement(&mut self, statement: &Statement) -> String {
        match statement {
            Statement::Declaration { name, value: None } => format!("let {name};\n"),
            Statement::Declaration {
                name,
                value: Some(value),
            } => format!("let {name} = {value};\n"),
            Statement::Print { value } => format!("console.log({value});\n"),
            Statement::Input { name, prompt } => {
                self.reads_input = true;
                let prompt = prompt.as_deref().unwrap_or("\"\"");
                format!("let {name} = await {READ_LINE}({prompt});\n")
            }
            Statement::Condition {
                test,
                body,
                else_body,
            } => {
                let mut code = format!("if ({test}) {{\n{}}}\n", self.generate_block(body));
                if !else_body.is_empty() {
                    code.push_str(&format!("else {{\n{}}}\n", self.generate_block(else_body)));
                }
                code
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(body: Vec<Statement>, async_wrap: bool) -> String {
        JavaScriptBackend::new(GeneratorOptions { async_wrap }).generate_program(&ast::Program { body })
    }

    fn input(name: &str, prompt: Option<&str>) -> Statement {
        Statement::Input {
            name: name.to_string(),
            prompt: prompt.map(str::to_string),
        }
    }

    #[test]
    fn plain_statements_without_wrapper() {
        let code = generate(
            vec![
                Statement::Declaration {
                    name: "x".to_string(),
                    value: Some("1 + 2".to_string()),
                },
                Statement::Declaration {
                    name: "y".to_string(),
                    value: None,
                },
                Statement::Print {
                    value: "x".to_string(),
                },
            ],
            false,
        );
        assert_eq!(code, "let x = 1 + 2;\nlet y;\nconsole.log(x);\n");
    }

    #[test]
    fn async_wrapper_surrounds_the_program() {
        let code = generate(
            vec![Statement::Print {
                value: "1".to_string(),
            }],
            true,
        );
        assert_eq!(code, "(async () => {\nconsole.log(1);\n})();");
    }

    #[test]
    fn condition_with_and_without_else() {
        let print = |value: &str| Statement::Print {
            value: value.to_string(),
        };
        let code = generate(
            vec![
                Statement::Condition {
                    test: "x == 1".to_string(),
                    body: vec![print("\"yes\"")],
                    else_body: vec![print("\"no\"")],
                },
                Statement::Condition {
                    test: "y".to_string(),
                    body: vec![],
                    else_body: vec![],
                },
            ],
            true,
        );
        assert_eq!(
            code,
            "(async () => {\n\
             if (x == 1) {\nconsole.log(\"yes\");\n}\nelse {\nconsole.log(\"no\");\n}\n\
             if (y) {\n}\n\
             })();"
        );
    }

    #[test]
    fn input_prepends_preamble_and_closes_once() {
        let code = generate(vec![input("a", Some("\"A? \"")), input("b", None)], true);

        let expected = format!(
            "{INPUT_PREAMBLE}(async () => {{\n\
             let a = await readLineAsyncQuestion(\"A? \");\n\
             let b = await readLineAsyncQuestion(\"\");\n\
             readline.close();\n\
             }})();"
        );
        assert_eq!(code, expected);
    }

    #[test]
    fn nested_input_is_hoisted_to_the_top_level() {
        let code = generate(
            vec![Statement::Condition {
                test: "true".to_string(),
                body: vec![input("a", None)],
                else_body: vec![Statement::Condition {
                    test: "false".to_string(),
                    body: vec![input("b", None)],
                    else_body: vec![],
                }],
            }],
            true,
        );

        assert!(code.starts_with(INPUT_PREAMBLE));
        assert_eq!(code.matches("function readLineAsyncQuestion").count(), 1);
        assert_eq!(code.matches("readline.close()").count(), 1);
        assert!(code.ends_with("}\nreadline.close();\n})();"));
        assert_eq!(code.matches("(async () =>").count(), 1);
    }

    #[test]
    fn backend_state_resets_between_programs() {
        let mut backend = JavaScriptBackend::new(GeneratorOptions::default());
        let with_input = ast::Program {
            body: vec![input("a", None)],
        };
        let without_input = ast::Program {
            body: vec![Statement::Print {
                value: "1".to_string(),
            }],
        };

        assert!(backend.generate(&with_input).unwrap().contains(CLOSE_INPUT));
        assert!(!backend.generate(&without_input).unwrap().contains(CLOSE_INPUT));
    }
}
