use tracing::{debug, info, warn};

use super::lexer::{Token, TokenKind};
use super::reserved::{self, ExprContext, Lowering};
use crate::error::CompileError;
use crate::ir::ast::{self, Statement};

pub fn parse_tokens(tokens: &[Token]) -> Result<ast::Program, CompileError> {
    info!(tokens = tokens.len(), "parsing");
    let body = Parser::new(tokens).parse_block()?;
    info!(statements = body.len(), "parsing completed");
    Ok(ast::Program { body })
}

/// Cursor over an immutable token slice. Nested blocks get their own
/// parser over the sub-slice between the braces.
struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, position: 0 }
    }

    fn parse_block(&mut self) -> Result<Vec<Statement>, CompileError> {
        let mut statements = Vec::new();

        while let Some(token) = self.advance() {
            let statement = match (token.kind, token.text()) {
                (TokenKind::Keyword, Some(reserved::DECLARE)) => self.parse_declaration(token)?,
                (TokenKind::Keyword, Some(reserved::PRINT)) => self.parse_print(token)?,
                (TokenKind::Keyword, Some(reserved::INPUT)) => self.parse_input(token)?,
                (TokenKind::Keyword, Some(reserved::IF)) => self.parse_condition(token)?,
                (TokenKind::EndOfStatement, _) => continue,
                _ => {
                    warn!(token = %token.describe(), position = %token.span, "skipping stray token");
                    continue;
                }
            };
            debug!(?statement, "parsed statement");
            statements.push(statement);
        }

        Ok(statements)
    }

    fn parse_declaration(&mut self, keyword: &Token) -> Result<Statement, CompileError> {
        let name = self.expect_identifier(keyword)?;

        let assigns = self.peek().is_some_and(|token| {
            token.kind == TokenKind::Operator
                && token.text().is_some_and(|op| reserved::ASSIGNMENT.contains(&op))
        });
        let value = if assigns {
            let assignment = self.advance().unwrap_or(keyword);
            Some(self.parse_expression(ExprContext::Declaration, assignment, |token| {
                token.kind == TokenKind::EndOfStatement
            })?)
        } else {
            None
        };

        Ok(Statement::Declaration {
            name: name.value.to_string(),
            value,
        })
    }

    fn parse_print(&mut self, keyword: &Token) -> Result<Statement, CompileError> {
        let expected = "a value after 'likho'";
        let token = self.expect(expected, |token| {
            !matches!(token.kind, TokenKind::EndOfStatement | TokenKind::Bracket)
        })
        .map_err(|err| Self::anchor_to(err, keyword))?;

        Ok(Statement::Print {
            value: token.value.to_string(),
        })
    }

    fn parse_input(&mut self, keyword: &Token) -> Result<Statement, CompileError> {
        let name = self.expect_identifier(keyword)?;

        let prompt = match self.peek() {
            Some(token) if token.kind == TokenKind::String => {
                self.advance();
                Some(token.value.to_string())
            }
            _ => None,
        };

        Ok(Statement::Input {
            name: name.value.to_string(),
            prompt,
        })
    }

    fn parse_condition(&mut self, keyword: &Token) -> Result<Statement, CompileError> {
        let test = self.parse_expression(ExprContext::Condition, keyword, |token| {
            token.is(TokenKind::Bracket, reserved::BLOCK_OPEN)
        })?;
        let body = Self::parse_sub_block(self.collect_block()?)?;

        let else_body = match self.peek() {
            Some(token) if token.is_keyword(reserved::ELSE) => {
                self.advance();
                match self.peek() {
                    Some(next) if next.is_keyword(reserved::IF) => {
                        self.advance();
                        vec![self.parse_condition(next)?]
                    }
                    _ => Self::parse_sub_block(self.collect_block()?)?,
                }
            }
            _ => Vec::new(),
        };

        Ok(Statement::Condition {
            test,
            body,
            else_body,
        })
    }

    fn parse_sub_block(tokens: &[Token]) -> Result<Vec<Statement>, CompileError> {
        let statements = Parser::new(tokens).parse_block()?;
        debug!(tokens = tokens.len(), statements = statements.len(), "parsed block");
        Ok(statements)
    }

    /// Consumes `{ ... }` by bracket-depth counting and returns the tokens
    /// strictly between the outer braces.
    fn collect_block(&mut self) -> Result<&'a [Token], CompileError> {
        let expected = "'{' to open a block";
        self.expect(expected, |token| token.is(TokenKind::Bracket, reserved::BLOCK_OPEN))?;

        let start = self.position;
        let mut depth = 1usize;
        while let Some(token) = self.advance() {
            if token.is(TokenKind::Bracket, reserved::BLOCK_OPEN) {
                depth += 1;
            } else if token.is(TokenKind::Bracket, reserved::BLOCK_CLOSE) {
                depth -= 1;
                if depth == 0 {
                    return Ok(&self.tokens[start..self.position - 1]);
                }
            }
        }

        Err(self.end_of_input("'}' to close the block"))
    }

    /// Rebuilds an expression as lowered text from the tokens up to (not
    /// including) the first one accepted by `is_end`.
    fn parse_expression(
        &mut self,
        context: ExprContext,
        anchor: &Token,
        is_end: impl Fn(&Token) -> bool,
    ) -> Result<String, CompileError> {
        let mut expression = String::new();

        while let Some(token) = self.peek() {
            if is_end(token) {
                break;
            }
            self.advance();

            let lowering = match (token.kind, token.text()) {
                (TokenKind::Operator, Some(word)) => reserved::lower_word_operator(word, context),
                _ => None,
            };

            match lowering {
                Some(Lowering::Padded(symbol)) => {
                    expression.push_str(&format!(" {symbol} "));
                }
                Some(Lowering::Step { compound, unary }) => match self.peek() {
                    Some(step) if step.kind == TokenKind::Integer => {
                        self.advance();
                        expression.push_str(&format!(" {compound} {}", step.value));
                    }
                    _ => expression.push_str(&format!(" {unary} ")),
                },
                None => expression.push_str(&token.value.to_string()),
            }
        }

        let expression = expression.trim();
        if expression.is_empty() {
            return Err(CompileError::EmptyExpression {
                context: context.describe(),
                span: anchor.span,
            });
        }
        Ok(expression.to_string())
    }

    fn expect_identifier(&mut self, keyword: &Token) -> Result<&'a Token, CompileError> {
        let expected = format!("a variable name after '{}'", keyword.value);
        self.expect(&expected, |token| token.kind == TokenKind::Identifier)
            .map_err(|err| Self::anchor_to(err, keyword))
    }

    // Cursor helpers
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn expect(
        &mut self,
        expected: &str,
        accept: impl Fn(&Token) -> bool,
    ) -> Result<&'a Token, CompileError> {
        match self.advance() {
            Some(token) if accept(token) => Ok(token),
            Some(token) => Err(CompileError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.describe(),
                span: token.span,
            }),
            None => Err(self.end_of_input(expected)),
        }
    }

    fn end_of_input(&self, expected: &str) -> CompileError {
        CompileError::UnexpectedEndOfInput {
            expected: expected.to_string(),
            span: self.tokens.last().map(|token| token.span.after()).unwrap_or_default(),
        }
    }

    /// A token missing right after a keyword is reported just past that
    /// keyword, which is also correct inside a block's sub-slice.
    fn anchor_to(err: CompileError, keyword: &Token) -> CompileError {
        match err {
            CompileError::UnexpectedEndOfInput { expected, .. } => CompileError::UnexpectedEndOfInput {
                expected,
                span: keyword.span.after(),
            },
            other => other,
        }
    }
}
