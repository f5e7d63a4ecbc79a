use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "program")]
pub struct Program {
    pub body: Vec<Statement>,
}

/// Expressions are kept as already-lowered JavaScript text.
pub type Expression = String;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Statement {
    /// socho x = 1 plus 2;
    Declaration {
        name: String,
        value: Option<Expression>,
    },
    /// likho x
    Print { value: Expression },
    /// pucho naam "Naam batao: "
    Input {
        name: String,
        prompt: Option<Expression>,
    },
    /// agar x equals 1 { ... } warna { ... }
    Condition {
        test: Expression,
        body: Vec<Statement>,
        #[serde(rename = "elseBody")]
        else_body: Vec<Statement>,
    },
}

impl Statement {
    /// Nested blocks owned by this statement, in source order.
    pub fn blocks(&self) -> impl Iterator<Item = &[Statement]> {
        let blocks: [&[Statement]; 2] = match self {
            Self::Condition { body, else_body, .. } => [body.as_slice(), else_body.as_slice()],
            _ => [&[], &[]],
        };
        blocks.into_iter()
    }
}

impl Program {
    /// True if any statement, however deeply nested, reads input.
    pub fn reads_input(&self) -> bool {
        fn any_input(block: &[Statement]) -> bool {
            block.iter().any(|statement| {
                matches!(statement, Statement::Input { .. }) || statement.blocks().any(any_input)
            })
        }
        any_input(&self.body)
    }
}
