use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Stmt},
    error::ParseError,
    interpreter::{
        lexer::{SpannedToken, Token},
        parser::{
            block::{parse_do_while, parse_for, parse_function_definition, parse_if, parse_while},
            core::{ParseResult, parse_expression},
            unary::parse_primary,
            utils::{end_of_input, expect, parse_comma_separated, parse_identifier, unexpected},
        },
    },
};

/// Parses a single statement.
///
/// The first token decides the form:
/// - a keyword (`let`, `lock`, `fun`, `print`, `if`, loops, `lib`, `return`,
///   `break`, `continue`),
/// - `++`/`--` for a prefix increment,
/// - an arithmetic operator for a compound assignment such as `+5 x;`,
/// - an identifier that may start an assignment form,
/// - anything else is an expression statement terminated by `;`.
///
/// The statement's source line is taken from its first token.
///
/// # Parameters
/// - `tokens`: Token iterator containing `(Token, Position)` pairs.
///
/// # Returns
/// A parsed [`Stmt`] node.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let Some((token, position)) = tokens.peek().copied() else {
        return Err(end_of_input("a statement"));
    };
    let line = position.line;

    match token {
        Token::Fun => parse_function_definition(tokens),
        Token::Return => parse_return(tokens),
        Token::Lib => parse_import(tokens),
        Token::Let => parse_declaration(tokens, false),
        Token::Lock => parse_declaration(tokens, true),
        Token::Print => parse_print(tokens),
        Token::If => parse_if(tokens),
        Token::For => parse_for(tokens),
        Token::While => parse_while(tokens),
        Token::Do => parse_do_while(tokens),
        Token::Break => {
            tokens.next();
            expect(tokens, &Token::Semicolon)?;
            Ok(Stmt::Break { line })
        },
        Token::Continue => {
            tokens.next();
            expect(tokens, &Token::Semicolon)?;
            Ok(Stmt::Continue { line })
        },
        Token::Increment | Token::Decrement => parse_prefix_increment(tokens),
        Token::Plus | Token::Minus | Token::Star | Token::Slash | Token::Percent | Token::Power => {
            parse_compound_assignment(tokens)
        },
        Token::Identifier(_) => {
            if let Some(statement) = parse_assignment(tokens)? {
                return Ok(statement);
            }
            parse_expression_statement(tokens)
        },
        _ => parse_expression_statement(tokens),
    }
}

/// Parses `expr;`.
fn parse_expression_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let line = tokens.peek().map_or(0, |(_, position)| position.line);
    let expr = parse_expression(tokens)?;
    expect(tokens, &Token::Semicolon)?;

    Ok(Stmt::Expression { expr, line })
}

/// Parses the statements that start with an identifier and are not plain
/// expressions.
///
/// Recognized forms:
/// - `name++;` / `name--;`
/// - `name[i]...[n] as value;`: every bracket pair is skipped before checking
///   for `as`, so `grid[1][2] + 1;` stays an expression
/// - `name as value;`
///
/// # Returns
/// - `Ok(Some(statement))` if one of the forms matched,
/// - `Ok(None)` if the identifier starts an expression statement.
fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Option<Stmt>>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let mut lookahead = tokens.clone();
    let Some((Token::Identifier(name), position)) = lookahead.next() else {
        return Ok(None);
    };
    let line = position.line;

    match lookahead.peek().copied() {
        Some((Token::Increment | Token::Decrement, _)) => parse_postfix_increment(tokens).map(Some),
        Some((Token::LBracket, _)) if index_chain_is_assigned(lookahead.clone()) => {
            parse_index_assignment(tokens).map(Some)
        },
        Some((Token::As, _)) => {
            tokens.next();
            tokens.next();
            let value = parse_expression(tokens)?;
            expect(tokens, &Token::Semicolon)?;

            Ok(Some(Stmt::Assign { name: name.clone(),
                                   value,
                                   line }))
        },
        _ => Ok(None),
    }
}

/// Skips every `[...]` pair, nested brackets included, and reports whether
/// `as` follows the chain.
fn index_chain_is_assigned<'a, I>(mut lookahead: Peekable<I>) -> bool
    where I: Iterator<Item = &'a SpannedToken>
{
    while let Some((Token::LBracket, _)) = lookahead.peek() {
        lookahead.next();
        let mut depth = 1usize;
        while depth > 0 {
            match lookahead.next() {
                Some((Token::LBracket, _)) => depth += 1,
                Some((Token::RBracket, _)) => depth -= 1,
                Some((Token::Eof, _)) | None => return false,
                Some(_) => {},
            }
        }
    }

    matches!(lookahead.peek(), Some((Token::As, _)))
}

/// Parses `name[i]...[n] as value;`.
fn parse_index_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let line = tokens.peek().map_or(0, |(_, position)| position.line);
    let target = parse_identifier(tokens, "variable name")?;

    let mut indices = Vec::new();
    while let Some((Token::LBracket, _)) = tokens.peek() {
        tokens.next();
        indices.push(parse_expression(tokens)?);
        expect(tokens, &Token::RBracket)?;
    }

    expect(tokens, &Token::As)?;
    let value = parse_expression(tokens)?;
    expect(tokens, &Token::Semicolon)?;

    Ok(Stmt::IndexAssign { target,
                           indices,
                           value,
                           line })
}

/// Parses `let`/`lock` declarations, including `[a, b]` destructuring.
///
/// Grammar:
/// ```text
///     ("let" | "lock") name "as" expression ";"
///     ("let" | "lock") "[" name ("," name)* "]" "as" expression ";"
/// ```
fn parse_declaration<'a, I>(tokens: &mut Peekable<I>, constant: bool) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let line = tokens.next().map_or(0, |(_, position)| position.line);

    if let Some((Token::LBracket, _)) = tokens.peek() {
        tokens.next();
        let names = parse_comma_separated(tokens, parse_pattern_name, &Token::RBracket, false)?;
        expect(tokens, &Token::As)?;
        let value = parse_expression(tokens)?;
        expect(tokens, &Token::Semicolon)?;

        return Ok(Stmt::Destructure { names,
                                      value,
                                      constant,
                                      line });
    }

    let name = parse_identifier(tokens, "variable name after 'let' or 'lock'")?;
    expect(tokens, &Token::As)?;
    let value = parse_expression(tokens)?;
    expect(tokens, &Token::Semicolon)?;

    Ok(Stmt::Let { name,
                   value,
                   constant,
                   line })
}

/// One name inside a destructuring pattern.
fn parse_pattern_name<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<String>
    where I: Iterator<Item = &'a SpannedToken>
{
    match tokens.next() {
        Some((Token::Identifier(name), _)) => Ok(name.clone()),
        Some((tok, position)) => {
            Err(ParseError::InvalidDestructuring { details: format!("expected variable name but found {tok}"),
                                                   line:    position.line,
                                                   column:  position.column, })
        },
        None => Err(end_of_input("variable name")),
    }
}

/// Parses a compound assignment: operator, operand, target name.
///
/// `+5 x;` reads as `x as x + 5;`. The operand is a primary expression, so
/// `*(a + b) x;` needs the parentheses.
fn parse_compound_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let (op, line) = match tokens.next() {
        Some((Token::Plus, position)) => (BinaryOperator::Add, position.line),
        Some((Token::Minus, position)) => (BinaryOperator::Sub, position.line),
        Some((Token::Star, position)) => (BinaryOperator::Mul, position.line),
        Some((Token::Slash, position)) => (BinaryOperator::Div, position.line),
        Some((Token::Percent, position)) => (BinaryOperator::Mod, position.line),
        Some((Token::Power, position)) => (BinaryOperator::Pow, position.line),
        Some((tok, position)) => return Err(unexpected(tok, *position, "compound assignment operator")),
        None => return Err(end_of_input("compound assignment operator")),
    };

    let value = parse_primary(tokens)?;

    let name = match tokens.next() {
        Some((Token::Identifier(name), _)) => name.clone(),
        Some((tok, position)) => {
            return Err(ParseError::InvalidSyntax { details: format!("expected variable name in compound assignment, found {tok}"),
                                                   line:    position.line,
                                                   column:  position.column, });
        },
        None => return Err(end_of_input("variable name")),
    };
    expect(tokens, &Token::Semicolon)?;

    Ok(Stmt::CompoundAssign { name,
                              op,
                              value,
                              line })
}

/// Parses `++name;` or `--name;`.
fn parse_prefix_increment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a SpannedToken>
{
    let (delta, line) = match tokens.next() {
        Some((Token::Increment, position)) => (1, position.line),
        Some((Token::Decrement, position)) => (-1, position.line),
        Some((tok, position)) => return Err(unexpected(tok, *position, "'++' or '--'")),
        None => return Err(end_of_input("'++' or '--'")),
    };

    let name = match tokens.next() {
        Some((Token::Identifier(name), _)) => name.clone(),
        Some((tok, position)) => {
            return Err(ParseError::InvalidSyntax { details: format!("expected variable name after increment operator, found {tok}"),
                                                   line:    position.line,
                                                   column:  position.column, });
        },
        None => return Err(end_of_input("variable name")),
    };
    expect(tokens, &Token::Semicolon)?;

    Ok(Stmt::Increment { name,
                         delta,
                         prefix: true,
                         line })
}

/// Parses `name++;` or `name--;`.
fn parse_postfix_increment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a SpannedToken>
{
    let line = tokens.peek().map_or(0, |(_, position)| position.line);
    let name = parse_identifier(tokens, "variable name")?;
    let delta = match tokens.next() {
        Some((Token::Increment, _)) => 1,
        Some((Token::Decrement, _)) => -1,
        Some((tok, position)) => return Err(unexpected(tok, *position, "'++' or '--'")),
        None => return Err(end_of_input("'++' or '--'")),
    };
    expect(tokens, &Token::Semicolon)?;

    Ok(Stmt::Increment { name,
                         delta,
                         prefix: false,
                         line })
}

/// Parses `print(a, b, ...);`.
fn parse_print<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let line = tokens.next().map_or(0, |(_, position)| position.line);
    expect(tokens, &Token::LParen)?;
    let arguments = parse_comma_separated(tokens, parse_expression, &Token::RParen, false)?;
    expect(tokens, &Token::Semicolon)?;

    Ok(Stmt::Print { arguments, line })
}

/// Parses `lib $name.path;` into the dotted path `name.path`.
fn parse_import<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let line = tokens.next().map_or(0, |(_, position)| position.line);
    expect(tokens, &Token::Dollar)?;

    let mut segments = vec![parse_identifier(tokens, "library name after '$'")?];
    while let Some((Token::Dot, _)) = tokens.peek() {
        tokens.next();
        segments.push(parse_identifier(tokens, "module name after '.'")?);
    }
    expect(tokens, &Token::Semicolon)?;

    Ok(Stmt::Import { path: segments.join("."),
                      line })
}

/// Parses `return;` or `return value;`.
fn parse_return<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let line = tokens.next().map_or(0, |(_, position)| position.line);

    if let Some((Token::Semicolon, _)) = tokens.peek() {
        tokens.next();
        return Ok(Stmt::Return { value: None,
                                 line });
    }

    let value = parse_expression(tokens)?;
    expect(tokens, &Token::Semicolon)?;

    Ok(Stmt::Return { value: Some(value),
                      line })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        ast::{Expr, LiteralValue},
        interpreter::lexer::tokenize,
    };

    fn parse_one(source: &str) -> ParseResult<Stmt> {
        let tokens = tokenize(source).expect("source should tokenize");
        parse_statement(&mut tokens.iter().peekable())
    }

    #[test]
    fn compound_assignment_takes_operand_before_name() {
        let statement = parse_one("+5 x;").unwrap();
        assert_eq!(statement,
                   Stmt::CompoundAssign { name:  "x".to_string(),
                                          op:    BinaryOperator::Add,
                                          value: Expr::Literal { value: LiteralValue::Integer(5),
                                                                 line:  1, },
                                          line:  1, });
    }

    #[test]
    fn index_chain_followed_by_as_is_assignment() {
        let statement = parse_one("grid[1][2] as 9;").unwrap();
        assert!(matches!(statement, Stmt::IndexAssign { ref indices, .. } if indices.len() == 2));
    }

    #[test]
    fn index_chain_without_as_is_expression() {
        let statement = parse_one("grid[1][2] + 1;").unwrap();
        assert!(matches!(statement, Stmt::Expression { .. }));
    }

    #[test]
    fn postfix_and_prefix_increments() {
        assert!(matches!(parse_one("i++;").unwrap(),
                         Stmt::Increment { delta: 1, prefix: false, .. }));
        assert!(matches!(parse_one("--i;").unwrap(),
                         Stmt::Increment { delta: -1, prefix: true, .. }));
    }

    #[test]
    fn destructuring_requires_names() {
        let err = parse_one("let [a, 1] as pair;").unwrap_err();
        assert!(matches!(err, ParseError::InvalidDestructuring { .. }));
    }

    #[test]
    fn import_joins_dotted_path() {
        assert_eq!(parse_one("lib $math.main;").unwrap(),
                   Stmt::Import { path: "math.main".to_string(),
                                  line: 1, });
    }

    #[test]
    fn missing_semicolon_reports_end_of_input() {
        let err = parse_one("let x as 1").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }
}
