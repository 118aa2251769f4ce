use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{FunctionDecl, Stmt},
    error::ParseError,
    interpreter::{
        lexer::{SpannedToken, Token},
        parser::{
            core::{ParseResult, parse_block, parse_expression},
            utils::{end_of_input, expect, parse_identifier, parse_parameters},
        },
    },
};

/// Parses an `if` statement with any number of `elif` branches and an
/// optional `else`.
///
/// Syntax:
/// ```text
///     if <condition> { ... }
///     elif <condition> { ... }
///     else { ... }
/// ```
///
/// # Parameters
/// - `tokens`: Token stream positioned at the `if` keyword.
///
/// # Returns
/// A `Stmt::If` node holding every branch in source order.
pub fn parse_if<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let line = expect(tokens, &Token::If)?.line;

    let condition = parse_expression(tokens)?;
    let body = parse_block(tokens)?;
    let mut branches = vec![(condition, body)];

    while let Some((Token::Elif, _)) = tokens.peek() {
        tokens.next();
        let condition = parse_expression(tokens)?;
        let body = parse_block(tokens)?;
        branches.push((condition, body));
    }

    let else_branch = match tokens.peek() {
        Some((Token::Else, _)) => {
            tokens.next();
            Some(parse_block(tokens)?)
        },
        _ => None,
    };

    Ok(Stmt::If { branches,
                  else_branch,
                  line })
}

/// Parses `for name in iterable { ... }`.
pub fn parse_for<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let line = expect(tokens, &Token::For)?.line;
    let var = parse_identifier(tokens, "loop variable after 'for'")?;
    expect(tokens, &Token::In)?;
    let iterable = parse_expression(tokens)?;
    let body = parse_block(tokens)?;

    Ok(Stmt::For { var,
                   iterable,
                   body,
                   line })
}

/// Parses `while condition { ... }`.
pub fn parse_while<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let line = expect(tokens, &Token::While)?.line;
    let condition = parse_expression(tokens)?;
    let body = parse_block(tokens)?;

    Ok(Stmt::While { condition,
                     body,
                     line })
}

/// Parses `do { ... } while condition;`.
///
/// Unlike the other loop forms this one ends with a semicolon.
pub fn parse_do_while<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let line = expect(tokens, &Token::Do)?.line;
    let body = parse_block(tokens)?;
    expect(tokens, &Token::While)?;
    let condition = parse_expression(tokens)?;
    expect(tokens, &Token::Semicolon)?;

    Ok(Stmt::DoWhile { body,
                       condition,
                       line })
}

/// Parses a function definition.
///
/// Syntax:
/// ```text
///     fun <name>(<param>, ...) { ... }
/// ```
///
/// # Errors
/// - `InvalidFunctionDefinition` if the name or a parameter is not an
///   identifier, or the parameter list is malformed.
/// - `DuplicateParameter` if a parameter name repeats.
/// - Propagates any errors from the body.
pub fn parse_function_definition<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let line = expect(tokens, &Token::Fun)?.line;

    let name = match tokens.next() {
        Some((Token::Identifier(name), _)) => name.clone(),
        Some((tok, position)) => {
            return Err(ParseError::InvalidFunctionDefinition { details: format!("expected function name after 'fun', found {tok}"),
                                                               line:    position.line,
                                                               column:  position.column, });
        },
        None => return Err(end_of_input("function name")),
    };

    let params = parse_parameters(tokens, |details, position| {
                     ParseError::InvalidFunctionDefinition { details,
                                                             line: position.line,
                                                             column: position.column }
                 })?;
    let body = parse_block(tokens)?;

    Ok(Stmt::FunctionDef { decl: Rc::new(FunctionDecl { name,
                                                        params,
                                                        body,
                                                        line }),
                           line })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{lexer::tokenize, parser::core::parse_program};

    fn parse_source(source: &str) -> ParseResult<Vec<Stmt>> {
        let tokens = tokenize(source).expect("source should tokenize");
        parse_program(&mut tokens.iter().peekable())
    }

    #[test]
    fn if_collects_elif_branches() {
        let program = parse_source("if a { } elif b { } elif c { } else { }").unwrap();
        let [Stmt::If { branches, else_branch, .. }] = program.as_slice() else {
            panic!("expected a single if statement, got {program:?}");
        };
        assert_eq!(branches.len(), 3);
        assert!(else_branch.is_some());
    }

    #[test]
    fn do_while_needs_semicolon() {
        assert!(parse_source("do { } while x;").is_ok());
        assert!(parse_source("do { } while x").is_err());
    }

    #[test]
    fn duplicate_parameters_are_rejected() {
        let err = parse_source("fun f(a, a) { }").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateParameter { ref name, .. } if name == "a"));
    }

    #[test]
    fn function_name_must_be_identifier() {
        let err = parse_source("fun 3() { }").unwrap_err();
        assert!(matches!(err, ParseError::InvalidFunctionDefinition { .. }));
    }

    #[test]
    fn unclosed_block_is_end_of_input() {
        let err = parse_source("while true { x++;").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }
}
