use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use super::reserved;
use crate::error::CompileError;
use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    Keyword,
    Operator,
    Identifier,
    Integer,
    Float,
    String,
    Bracket,
    EndOfStatement,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Keyword => "keyword",
            Self::Operator => "operator",
            Self::Identifier => "identifier",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Bracket => "bracket",
            Self::EndOfStatement => "end of statement",
        };
        f.write_str(name)
    }
}

/// Integer literals past `i64` keep their kind but carry an `f64` value,
/// the way JavaScript reads them.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

// Largest magnitude at which every whole f64 is an exact integer.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

impl Serialize for TokenValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::Float(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Self::Float(n) => serializer.serialize_f64(*n),
            Self::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) if n.is_nan() => f.write_str("NaN"),
            Self::Float(n) if n.is_infinite() => {
                f.write_str(if n.is_sign_negative() { "-Infinity" } else { "Infinity" })
            }
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub value: TokenValue,
    #[serde(skip)]
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, value: TokenValue, span: Span) -> Self {
        Self { kind, value, span }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// True for a token of `kind` whose literal text is `text`.
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text() == Some(text)
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.is(TokenKind::Keyword, keyword)
    }

    pub fn describe(&self) -> String {
        format!("{} '{}'", self.kind, self.value)
    }
}

/// What the lexer does with a character that starts no token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvalidCharPolicy {
    /// Log it, remember it and keep scanning.
    #[default]
    Skip,
    /// Fail with `CompileError::UnexpectedCharacter`.
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexerOptions {
    pub invalid_chars: InvalidCharPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedChar {
    pub ch: char,
    pub span: Span,
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, CompileError> {
    Lexer::new(source).tokenize()
}

pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    offset: usize,
    line: usize,
    column: usize,
    options: LexerOptions,
    skipped: Vec<SkippedChar>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_options(source, LexerOptions::default())
    }

    pub fn with_options(source: &'a str, options: LexerOptions) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            offset: 0,
            line: 1,
            column: 1,
            options,
            skipped: Vec::new(),
        }
    }

    /// Characters dropped under `InvalidCharPolicy::Skip`.
    pub fn skipped(&self) -> &[SkippedChar] {
        &self.skipped
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, CompileError> {
        info!(bytes = self.source.len(), "tokenizing");
        let mut tokens = Vec::new();

        while let Some(&(start, ch)) = self.chars.peek() {
            let (line, column) = (self.line, self.column);

            let token = if ch.is_whitespace() {
                self.bump();
                continue;
            } else if ch.is_ascii_alphabetic() || ch == '_' {
                self.scan_word(start, line, column)
            } else if ch.is_ascii_digit() {
                self.scan_number(start, line, column)?
            } else if matches!(ch, '"' | '\'' | '`') {
                self.scan_string(ch, start, line, column)?
            } else if reserved::is_symbol_operator(ch.encode_utf8(&mut [0u8; 4])) {
                self.scan_symbol(start, line, column)
            } else if reserved::is_bracket(ch) {
                self.bump();
                self.single(TokenKind::Bracket, ch, start, line, column)
            } else if ch == reserved::END_OF_STATEMENT {
                self.bump();
                self.single(TokenKind::EndOfStatement, ch, start, line, column)
            } else {
                self.bump();
                let span = Span::new(line, column, start, self.offset);
                match self.options.invalid_chars {
                    InvalidCharPolicy::Skip => {
                        warn!(character = %ch, position = %span, "skipping invalid character");
                        self.skipped.push(SkippedChar { ch, span });
                        continue;
                    }
                    InvalidCharPolicy::Reject => {
                        return Err(CompileError::UnexpectedCharacter { ch, span });
                    }
                }
            };

            debug!(kind = %token.kind, value = %token.value, position = %token.span, "token");
            tokens.push(token);
        }

        info!(tokens = tokens.len(), skipped = self.skipped.len(), "tokenizing completed");
        Ok(tokens)
    }

    fn bump(&mut self) -> Option<char> {
        let (_, ch) = self.chars.next()?;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn bump_while(&mut self, accept: impl Fn(char) -> bool) {
        while let Some(&(_, ch)) = self.chars.peek() {
            if !accept(ch) {
                break;
            }
            self.bump();
        }
    }

    fn single(&self, kind: TokenKind, ch: char, start: usize, line: usize, column: usize) -> Token {
        Token::new(
            kind,
            TokenValue::Text(ch.to_string()),
            Span::new(line, column, start, self.offset),
        )
    }

    fn scan_word(&mut self, start: usize, line: usize, column: usize) -> Token {
        self.bump_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        let word = &self.source[start..self.offset];

        let kind = if reserved::is_keyword(word) {
            TokenKind::Keyword
        } else if reserved::is_word_operator(word) {
            TokenKind::Operator
        } else {
            TokenKind::Identifier
        };

        Token::new(
            kind,
            TokenValue::Text(word.to_string()),
            Span::new(line, column, start, self.offset),
        )
    }

    fn scan_number(&mut self, start: usize, line: usize, column: usize) -> Result<Token, CompileError> {
        self.bump_while(|ch| ch.is_ascii_digit() || ch == '.');
        let text = &self.source[start..self.offset];
        let span = Span::new(line, column, start, self.offset);
        let invalid = || CompileError::InvalidNumber {
            text: text.to_string(),
            span,
        };

        let token = if text.contains('.') {
            let value = text.parse::<f64>().map_err(|_| invalid())?;
            Token::new(TokenKind::Float, TokenValue::Float(value), span)
        } else {
            let value = match text.parse::<i64>() {
                Ok(value) => TokenValue::Integer(value),
                Err(_) => TokenValue::Float(text.parse::<f64>().map_err(|_| invalid())?),
            };
            Token::new(TokenKind::Integer, value, span)
        };
        Ok(token)
    }

    fn scan_string(
        &mut self,
        quote: char,
        start: usize,
        line: usize,
        column: usize,
    ) -> Result<Token, CompileError> {
        self.bump(); // opening quote
        loop {
            match self.bump() {
                Some(ch) if ch == quote => break,
                Some(_) => {}
                None => {
                    return Err(CompileError::UnterminatedLiteral {
                        quote,
                        span: Span::new(line, column, start, self.offset),
                    });
                }
            }
        }

        Ok(Token::new(
            TokenKind::String,
            TokenValue::Text(self.source[start..self.offset].to_string()),
            Span::new(line, column, start, self.offset),
        ))
    }

    fn scan_symbol(&mut self, start: usize, line: usize, column: usize) -> Token {
        self.bump();
        while let Some(&(_, next)) = self.chars.peek() {
            let candidate = &self.source[start..self.offset + next.len_utf8()];
            if !reserved::is_symbol_operator(candidate) {
                break;
            }
            self.bump();
        }

        Token::new(
            TokenKind::Operator,
            TokenValue::Text(self.source[start..self.offset].to_string()),
            Span::new(line, column, start, self.offset),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_values(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|token| (token.kind, token.value.to_string()))
            .collect()
    }

    #[test]
    fn whitespace_only_input_has_no_tokens() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("  \n\t \r\n  ").unwrap().is_empty());
    }

    #[test]
    fn classifies_words() {
        assert_eq!(
            kinds_and_values("socho total plus _tmp1 sehi"),
            vec![
                (TokenKind::Keyword, "socho".to_string()),
                (TokenKind::Identifier, "total".to_string()),
                (TokenKind::Operator, "plus".to_string()),
                (TokenKind::Identifier, "_tmp1".to_string()),
                (TokenKind::Operator, "sehi".to_string()),
            ]
        );
    }

    #[test]
    fn numbers_become_integers_or_floats() {
        let tokens = tokenize("42 3.25 7.").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[0].value, TokenValue::Integer(42));
        assert_eq!(tokens[1].kind, TokenKind::Float);
        assert_eq!(tokens[1].value, TokenValue::Float(3.25));
        assert_eq!(tokens[2].kind, TokenKind::Float);
        assert_eq!(tokens[2].value, TokenValue::Float(7.0));
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = tokenize("socho x = 1.2.3;").unwrap_err();
        match err {
            CompileError::InvalidNumber { text, span } => {
                assert_eq!(text, "1.2.3");
                assert_eq!((span.line, span.column), (1, 11));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn integers_past_i64_stay_integers() {
        let tokens = tokenize("12345678901234567890").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[0].value, TokenValue::Float(12345678901234567890.0));
        assert_eq!(tokens[0].value.to_string(), "12345678901234567000");
    }

    #[test]
    fn overflowing_literals_render_as_infinity() {
        let float = format!("{}.5", "1".repeat(400));
        let integer = "9".repeat(400);
        for source in [float.as_str(), integer.as_str()] {
            let tokens = tokenize(source).unwrap();
            assert_eq!(tokens.len(), 1);
            assert_eq!(tokens[0].value.to_string(), "Infinity");
        }
    }

    #[test]
    fn whole_floats_serialize_without_fraction() {
        let tokens = tokenize("3.0 2.5").unwrap();
        assert_eq!(serde_json::to_string(&tokens[0].value).unwrap(), "3");
        assert_eq!(serde_json::to_string(&tokens[1].value).unwrap(), "2.5");
    }

    #[test]
    fn strings_keep_their_quotes() {
        assert_eq!(
            kinds_and_values(r#""hi there" 'a' `b c`"#),
            vec![
                (TokenKind::String, "\"hi there\"".to_string()),
                (TokenKind::String, "'a'".to_string()),
                (TokenKind::String, "`b c`".to_string()),
            ]
        );
    }

    #[test]
    fn other_quotes_do_not_close_a_string() {
        assert_eq!(
            kinds_and_values(r#""it's""#),
            vec![(TokenKind::String, "\"it's\"".to_string())]
        );
    }

    #[test]
    fn unterminated_string_is_fatal() {
        let err = tokenize("likho \"oops").unwrap_err();
        match err {
            CompileError::UnterminatedLiteral { quote, span } => {
                assert_eq!(quote, '"');
                assert_eq!((span.line, span.column), (1, 7));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn symbol_operators_match_greedily() {
        assert_eq!(
            kinds_and_values("a===b!==c<=d&&e||!f++"),
            vec![
                (TokenKind::Identifier, "a".to_string()),
                (TokenKind::Operator, "===".to_string()),
                (TokenKind::Identifier, "b".to_string()),
                (TokenKind::Operator, "!==".to_string()),
                (TokenKind::Identifier, "c".to_string()),
                (TokenKind::Operator, "<=".to_string()),
                (TokenKind::Identifier, "d".to_string()),
                (TokenKind::Operator, "&&".to_string()),
                (TokenKind::Identifier, "e".to_string()),
                (TokenKind::Operator, "||".to_string()),
                (TokenKind::Operator, "!".to_string()),
                (TokenKind::Identifier, "f".to_string()),
                (TokenKind::Operator, "++".to_string()),
            ]
        );
    }

    #[test]
    fn brackets_and_terminators() {
        assert_eq!(
            kinds_and_values("{ ( ) } ;"),
            vec![
                (TokenKind::Bracket, "{".to_string()),
                (TokenKind::Bracket, "(".to_string()),
                (TokenKind::Bracket, ")".to_string()),
                (TokenKind::Bracket, "}".to_string()),
                (TokenKind::EndOfStatement, ";".to_string()),
            ]
        );
    }

    #[test]
    fn invalid_characters_are_skipped_by_default() {
        let mut lexer = Lexer::new("x @ y\n#");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens.len(), 2);
        let skipped: Vec<_> = lexer
            .skipped()
            .iter()
            .map(|s| (s.ch, s.span.line, s.span.column))
            .collect();
        assert_eq!(skipped, vec![('@', 1, 3), ('#', 2, 1)]);
    }

    #[test]
    fn invalid_characters_can_be_rejected() {
        let options = LexerOptions {
            invalid_chars: InvalidCharPolicy::Reject,
        };
        let err = Lexer::with_options("socho x = 1, 2;", options)
            .tokenize()
            .unwrap_err();
        assert!(matches!(err, CompileError::UnexpectedCharacter { ch: ',', .. }));
    }

    #[test]
    fn spans_track_lines_and_columns() {
        let tokens = tokenize("socho x;\n  likho x").unwrap();
        let positions: Vec<_> = tokens
            .iter()
            .map(|t| (t.span.line, t.span.column, t.span.start, t.span.end))
            .collect();
        assert_eq!(
            positions,
            vec![(1, 1, 0, 5), (1, 7, 6, 7), (1, 8, 7, 8), (2, 3, 11, 16), (2, 9, 17, 18)]
        );
    }

    #[test]
    fn serializes_like_the_token_dump() {
        let tokens = tokenize("socho x = 1.5;").unwrap();
        let json = serde_json::to_value(&tokens).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "type": "keyword", "value": "socho" },
                { "type": "identifier", "value": "x" },
                { "type": "operator", "value": "=" },
                { "type": "float", "value": 1.5 },
                { "type": "endOfStatement", "value": ";" },
            ])
        );
    }
}
