//! Static reserved-symbol table shared by the lexer and the parser.

/// `socho x = ...;`
pub const DECLARE: &str = "socho";
/// `likho x`
pub const PRINT: &str = "likho";
/// `pucho x "prompt"`
pub const INPUT: &str = "pucho";
/// `agar cond { ... }`
pub const IF: &str = "agar";
/// `warna { ... }`
pub const ELSE: &str = "warna";

pub const KEYWORDS: &[&str] = &[DECLARE, PRINT, INPUT, IF, ELSE];

pub const WORD_OPERATORS: &[&str] = &[
    "plus",
    "minus",
    "times",
    "divided_by",
    "modulus",
    "mod",
    "equals",
    "not_equals",
    "AND",
    "OR",
    "NOT",
    "increase",
    "decrease",
    "sehi",
    "galat",
];

// Greedy matching only extends a candidate that is itself an operator,
// so every prefix of a multi-character operator has to be listed.
pub const SYMBOL_OPERATORS: &[&str] = &[
    "=", "==", "===", "!", "!=", "!==", "<", "<=", ">", ">=", "+", "++", "+=", "-", "--", "-=",
    "*", "*=", "/", "/=", "%", "%=", "&", "&&", "|", "||",
];

pub const BRACKETS: &[char] = &['{', '}', '(', ')', '[', ']'];

pub const BLOCK_OPEN: &str = "{";
pub const BLOCK_CLOSE: &str = "}";

pub const END_OF_STATEMENT: char = ';';

/// Operators that introduce an initializer after a declared name.
pub const ASSIGNMENT: &[&str] = &["=", "equals"];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

pub fn is_word_operator(word: &str) -> bool {
    WORD_OPERATORS.contains(&word)
}

pub fn is_symbol_operator(candidate: &str) -> bool {
    SYMBOL_OPERATORS.contains(&candidate)
}

pub fn is_bracket(ch: char) -> bool {
    BRACKETS.contains(&ch)
}

/// Where an expression is being rebuilt; conditions only lower the
/// comparison, logical and boolean words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprContext {
    Declaration,
    Condition,
}

impl ExprContext {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Declaration => "declaration",
            Self::Condition => "condition",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lowering {
    /// Rewritten to a target symbol or literal, padded with single spaces.
    Padded(&'static str),
    /// `increase`/`decrease`: compound assignment when an integer step
    /// follows, unary step otherwise.
    Step {
        compound: &'static str,
        unary: &'static str,
    },
}

pub fn lower_word_operator(word: &str, context: ExprContext) -> Option<Lowering> {
    use ExprContext::Declaration;

    let lowering = match (word, context) {
        ("equals", _) => Lowering::Padded("=="),
        ("not_equals", _) => Lowering::Padded("!="),
        ("AND", _) => Lowering::Padded("&&"),
        ("OR", _) => Lowering::Padded("||"),
        ("NOT", _) => Lowering::Padded("!"),
        ("sehi", _) => Lowering::Padded("true"),
        ("galat", _) => Lowering::Padded("false"),
        ("plus", Declaration) => Lowering::Padded("+"),
        ("minus", Declaration) => Lowering::Padded("-"),
        ("times", Declaration) => Lowering::Padded("*"),
        ("divided_by", Declaration) => Lowering::Padded("/"),
        ("modulus" | "mod", Declaration) => Lowering::Padded("%"),
        ("increase", Declaration) => Lowering::Step {
            compound: "+=",
            unary: "++",
        },
        ("decrease", Declaration) => Lowering::Step {
            compound: "-=",
            unary: "--",
        },
        _ => return None,
    };
    Some(lowering)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_multi_char_operator_prefix_is_an_operator() {
        for op in SYMBOL_OPERATORS {
            for end in 1..op.len() {
                assert!(is_symbol_operator(&op[..end]), "missing prefix of {op}");
            }
        }
    }

    #[test]
    fn arithmetic_words_are_not_lowered_in_conditions() {
        assert_eq!(
            lower_word_operator("plus", ExprContext::Declaration),
            Some(Lowering::Padded("+"))
        );
        assert_eq!(lower_word_operator("plus", ExprContext::Condition), None);
        assert_eq!(lower_word_operator("increase", ExprContext::Condition), None);
        assert_eq!(
            lower_word_operator("AND", ExprContext::Condition),
            Some(Lowering::Padded("&&"))
        );
    }

    #[test]
    fn keywords_and_word_operators_do_not_overlap() {
        for keyword in KEYWORDS {
            assert!(!is_word_operator(keyword));
        }
    }
}
