use std::iter::Peekable;

use crate::{
    ast::{Block, Expr},
    error::ParseError,
    interpreter::{
        lexer::{SpannedToken, Token},
        parser::{
            binary::parse_logical_or,
            statement::parse_statement,
            utils::{end_of_input, expect, unexpected},
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a whole program: statements up to the end-of-input token.
///
/// # Parameters
/// - `tokens`: Token iterator over the output of the lexer.
///
/// # Returns
/// The top-level statements in source order.
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Block>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let mut program = Vec::new();

    while let Some((token, _)) = tokens.peek()
          && *token != Token::Eof
    {
        program.push(parse_statement(tokens)?);
    }

    Ok(program)
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing.
/// It begins at the lowest-precedence level, logical OR, and recursively
/// descends through the precedence hierarchy.
///
/// Grammar: `expression := logical_or`
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, Position)` pairs.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    parse_logical_or(tokens)
}

/// Parses a braced statement block `{ ... }`.
///
/// # Errors
/// - `UnexpectedToken` if the block does not start with `{`.
/// - `UnexpectedEof` if the input ends before the closing `}`.
/// - Propagates any errors from the statements inside.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Block>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    expect(tokens, &Token::LBrace)?;

    let mut statements = Vec::new();
    loop {
        match tokens.peek().copied() {
            Some((Token::RBrace, _)) => {
                tokens.next();
                return Ok(statements);
            },
            Some((Token::Eof, position)) => return Err(unexpected(&Token::Eof, *position, "'}'")),
            Some(_) => statements.push(parse_statement(tokens)?),
            None => return Err(end_of_input("'}'")),
        }
    }
}
