use std::{collections::HashSet, iter::Peekable};

use crate::{
    ast::CastType,
    error::ParseError,
    interpreter::{
        lexer::{Position, SpannedToken, Token},
        parser::core::ParseResult,
    },
};

/// Builds the error for a token the grammar does not allow here.
///
/// Reaching [`Token::Eof`] is reported as a premature end of input rather
/// than as an unexpected token.
pub(in crate::interpreter::parser) fn unexpected(token: &Token,
                                                 position: Position,
                                                 expected: &str)
                                                 -> ParseError {
    let Position { line, column } = position;
    if *token == Token::Eof {
        ParseError::UnexpectedEof { expected: expected.to_string(),
                                    line,
                                    column }
    } else {
        ParseError::UnexpectedToken { expected: expected.to_string(),
                                      found: token.to_string(),
                                      line,
                                      column }
    }
}

/// The error for a token stream that stops without an end-of-input token.
pub(in crate::interpreter::parser) fn end_of_input(expected: &str) -> ParseError {
    ParseError::UnexpectedEof { expected: expected.to_string(),
                                line:     0,
                                column:   0, }
}

/// Consumes the next token, which must equal `expected`.
///
/// # Returns
/// The position of the consumed token.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    expected: &Token)
                                                    -> ParseResult<Position>
    where I: Iterator<Item = &'a SpannedToken>
{
    match tokens.next() {
        Some((token, position)) if token == expected => Ok(*position),
        Some((token, position)) => Err(unexpected(token, *position, &expected.to_string())),
        None => Err(end_of_input(&expected.to_string())),
    }
}

/// Looks `n` tokens past the next one without consuming anything.
///
/// `peek_nth(tokens, 0)` is the same token as `tokens.peek()`.
pub(in crate::interpreter::parser) fn peek_nth<'a, I>(tokens: &Peekable<I>, n: usize) -> Option<&'a Token>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let mut ahead = tokens.clone();
    ahead.nth(n).map(|(token, _)| token)
}

/// Maps a type keyword to the cast it names.
pub(in crate::interpreter::parser) const fn cast_type(token: &Token) -> Option<CastType> {
    match token {
        Token::IntType => Some(CastType::Int),
        Token::FloatType => Some(CastType::Float),
        Token::StrType => Some(CastType::Str),
        Token::BoolType => Some(CastType::Bool),
        _ => None,
    }
}

/// Checks for `( type )` starting at the next token.
pub(in crate::interpreter::parser) fn peek_cast<'a, I>(tokens: &Peekable<I>) -> Option<CastType>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    match (peek_nth(tokens, 0), peek_nth(tokens, 1), peek_nth(tokens, 2)) {
        (Some(Token::LParen), Some(keyword), Some(Token::RParen)) => cast_type(keyword),
        _ => None,
    }
}

/// Parses a comma-separated list of items until a closing token.
///
/// The opening delimiter has already been consumed. This utility is shared by
/// array, set and map literals, call arguments, and `print`. It repeatedly
/// calls `parse_item` to parse one element, expecting either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list.
///
/// Grammar (simplified): `list := item ("," item)* ","?`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list (e.g., `]` or `)`).
/// - `trailing`: Whether a comma may directly precede `closing`.
///
/// # Returns
/// A vector of parsed items.
///
/// # Errors
/// Returns a `ParseError` if:
/// - an item fails to parse,
/// - an unexpected token is encountered,
/// - the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token,
    trailing: bool)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let mut items = Vec::new();
    if let Some((tok, _)) = tokens.peek()
       && tok == closing
    {
        tokens.next();

        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        match tokens.next() {
            Some((Token::Comma, _)) => {
                if trailing
                   && let Some((tok, _)) = tokens.peek()
                   && tok == closing
                {
                    tokens.next();
                    break;
                }
            },
            Some((tok, _)) if tok == closing => break,
            Some((tok, position)) => {
                return Err(unexpected(tok, *position, &format!("',' or {closing}")));
            },
            None => return Err(end_of_input(&closing.to_string())),
        }
    }
    Ok(items)
}

/// Parses a plain identifier and returns its name.
///
/// # Errors
/// Returns a `ParseError` if the next token is not an identifier.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>,
                                                              expected: &str)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a SpannedToken>
{
    match tokens.next() {
        Some((Token::Identifier(name), _)) => Ok(name.clone()),
        Some((tok, position)) => Err(unexpected(tok, *position, expected)),
        None => Err(end_of_input(expected)),
    }
}

/// Parses a parenthesized parameter list `(a, b, c)`.
///
/// `invalid` builds the error reported for anything that is not a name, so
/// functions and lambdas can report their own error kinds.
///
/// # Errors
/// - The `invalid` error for a non-identifier parameter or missing `(`/`)`.
/// - `DuplicateParameter` when a name is listed twice.
pub(in crate::interpreter::parser) fn parse_parameters<'a, I>(
    tokens: &mut Peekable<I>,
    invalid: impl Fn(String, Position) -> ParseError)
    -> ParseResult<Vec<String>>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    match tokens.next() {
        Some((Token::LParen, _)) => {},
        Some((tok, position)) => return Err(invalid(format!("expected '(' but found {tok}"), *position)),
        None => return Err(end_of_input("'('")),
    }

    let mut params = Vec::new();
    let mut seen = HashSet::new();
    if let Some((Token::RParen, _)) = tokens.peek() {
        tokens.next();
        return Ok(params);
    }

    loop {
        match tokens.next() {
            Some((Token::Identifier(name), position)) => {
                if !seen.insert(name.as_str()) {
                    return Err(ParseError::DuplicateParameter { name:   name.clone(),
                                                                line:   position.line,
                                                                column: position.column, });
                }
                params.push(name.clone());
            },
            Some((tok, position)) => {
                return Err(invalid(format!("expected parameter name but found {tok}"), *position));
            },
            None => return Err(end_of_input("parameter name")),
        }

        match tokens.next() {
            Some((Token::Comma, _)) => {},
            Some((Token::RParen, _)) => return Ok(params),
            Some((tok, position)) => {
                return Err(invalid(format!("expected ',' or ')' but found {tok}"), *position));
            },
            None => return Err(end_of_input("')'")),
        }
    }
}
