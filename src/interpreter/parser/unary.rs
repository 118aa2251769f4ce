use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{Expr, LambdaBody, LambdaDecl, LiteralValue, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::{Position, SpannedToken, Token},
        parser::{
            core::{ParseResult, parse_block, parse_expression},
            utils::{
                cast_type, end_of_input, expect, parse_comma_separated, parse_parameters,
                peek_cast, peek_nth, unexpected,
            },
        },
    },
};

/// The number of tokens after `{` inspected when deciding whether it opens a
/// map literal.
const MAP_LOOKAHEAD: usize = 14;

/// Parses a unary expression.
///
/// Prefix `-` and `!` nest, so `!!x` and `- -x` are accepted.
///
/// The rule is: `unary := ("-" | "!") unary | postfix`
///
/// # Parameters
/// - `tokens`: Token stream with position information.
///
/// # Returns
/// A unary or postfix expression node.
pub fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let op = match tokens.peek() {
        Some((Token::Minus, _)) => UnaryOperator::Negate,
        Some((Token::Bang, _)) => UnaryOperator::Not,
        _ => return parse_postfix(tokens),
    };
    let line = tokens.next().map_or(0, |(_, position)| position.line);
    let expr = parse_unary(tokens)?;

    Ok(Expr::UnaryOp { op,
                       expr: Box::new(expr),
                       line })
}

/// Parses a chain of index accesses such as `grid[1][2]`.
///
/// The rule is: `postfix := call ("[" expression "]")*`
pub fn parse_postfix<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let mut node = parse_call(tokens)?;

    while let Some((Token::LBracket, position)) = tokens.peek().copied() {
        tokens.next();
        let index = parse_expression(tokens)?;
        expect(tokens, &Token::RBracket)?;
        node = Expr::Index { container: Box::new(node),
                             index:     Box::new(index),
                             line:      position.line, };
    }

    Ok(node)
}

/// Parses the suffixes that follow a primary expression.
///
/// Suffixes repeat in any order:
/// - `(type)` casts the value,
/// - `(args)` calls it; `range(...)` is turned into a range node,
/// - `.Nf` formats it with `N` decimals.
///
/// # Errors
/// - `InvalidRangeArguments` for `range` with other than 1 to 3 arguments.
/// - `InvalidFormatSpecifier` if the digits after `.` are not followed by `f`.
fn parse_call<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let mut node = parse_primary(tokens)?;

    loop {
        match tokens.peek().copied() {
            Some((Token::LParen, position)) => {
                if let Some(target) = peek_cast(tokens) {
                    tokens.nth(2);
                    node = Expr::Cast { target,
                                        expr: Box::new(node),
                                        line: position.line };
                    continue;
                }

                tokens.next();
                let arguments = parse_comma_separated(tokens, parse_expression, &Token::RParen, false)?;
                node = match node {
                    Expr::Variable { ref name, line } if name == "range" => {
                        build_range(arguments, line, position.column)?
                    },
                    callee => Expr::Call { callee: Box::new(callee),
                                           arguments,
                                           line: position.line },
                };
            },
            Some((Token::Dot, position)) => {
                let Some(Token::Integer(digits)) = peek_nth(tokens, 1) else {
                    break;
                };
                tokens.nth(1);
                match tokens.next() {
                    Some((Token::Identifier(suffix), _)) if suffix == "f" => {},
                    Some((tok, position)) => {
                        return Err(ParseError::InvalidFormatSpecifier { details: format!("expected 'f' after precision, found {tok}"),
                                                                        line:    position.line,
                                                                        column:  position.column, });
                    },
                    None => return Err(end_of_input("'f'")),
                }
                let precision = usize::try_from(*digits).map_err(|_| {
                                    ParseError::InvalidFormatSpecifier { details: format!("precision {digits} is out of range"),
                                                                         line:    position.line,
                                                                         column:  position.column, }
                                })?;
                node = Expr::Format { expr: Box::new(node),
                                      precision,
                                      line: position.line };
            },
            _ => break,
        }
    }

    Ok(node)
}

/// Turns the arguments of `range(...)` into an inclusive range node.
///
/// `range(n)` starts at 1, `range(a, b)` steps by 1, `range(a, b, s)` steps by
/// `s`.
fn build_range(arguments: Vec<Expr>, line: usize, column: usize) -> ParseResult<Expr> {
    let count = arguments.len();
    let mut arguments = arguments.into_iter();

    let (start, stop, step) = match (arguments.next(), arguments.next(), arguments.next()) {
        (Some(stop), None, None) => {
            let start = Expr::Literal { value: LiteralValue::Integer(1),
                                        line };
            (start, stop, None)
        },
        (Some(start), Some(stop), None) if count == 2 => (start, stop, None),
        (Some(start), Some(stop), Some(step)) if count == 3 => (start, stop, Some(Box::new(step))),
        _ => return Err(ParseError::InvalidRangeArguments { count, line, column }),
    };

    Ok(Expr::Range { start: Box::new(start),
                     stop: Box::new(stop),
                     step,
                     line })
}

/// Parses a primary expression.
///
/// Primary forms are literals, names, parenthesized expressions, the prefix
/// cast `(type)expr`, container literals, lambdas and `input(...)`.
///
/// # Errors
/// - `UnexpectedBrace` for a `{` that does not open a map literal.
/// - `UnexpectedToken` for a token that cannot start an expression.
pub fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let Some((token, position)) = tokens.peek().copied() else {
        return Err(end_of_input("an expression"));
    };
    let line = position.line;

    let literal = match token {
        Token::Integer(v) => Some(LiteralValue::Integer(*v)),
        Token::Float(v) => Some(LiteralValue::Float(*v)),
        Token::Text(s) => Some(LiteralValue::Text(s.clone())),
        Token::True => Some(LiteralValue::Bool(true)),
        Token::False => Some(LiteralValue::Bool(false)),
        _ => None,
    };
    if let Some(value) = literal {
        tokens.next();
        return Ok(Expr::Literal { value, line });
    }

    match token {
        Token::Identifier(name) => {
            tokens.next();
            Ok(Expr::Variable { name: name.clone(),
                                line })
        },
        Token::LParen => {
            if let Some(target) = peek_cast(tokens) {
                tokens.nth(2);
                let expr = parse_unary(tokens)?;
                return Ok(Expr::Cast { target,
                                       expr: Box::new(expr),
                                       line });
            }
            tokens.next();
            let expr = parse_expression(tokens)?;
            expect(tokens, &Token::RParen)?;
            Ok(expr)
        },
        Token::LBracket => {
            tokens.next();
            let elements = parse_comma_separated(tokens, parse_expression, &Token::RBracket, true)?;
            Ok(Expr::ArrayLiteral { elements, line })
        },
        Token::Hash => {
            tokens.next();
            expect(tokens, &Token::LBrace)?;
            let elements = parse_comma_separated(tokens, parse_expression, &Token::RBrace, true)?;
            Ok(Expr::SetLiteral { elements, line })
        },
        Token::LBrace => {
            if !opens_map_literal(tokens) {
                return Err(ParseError::UnexpectedBrace { line,
                                                         column: position.column });
            }
            tokens.next();
            let entries = parse_comma_separated(tokens, parse_map_entry, &Token::RBrace, true)?;
            Ok(Expr::MapLiteral { entries, line })
        },
        Token::Lamb => parse_lambda(tokens),
        Token::Input => parse_input(tokens),
        _ => Err(unexpected(token, *position, "an expression")),
    }
}

/// Decides whether the `{` at the front of `tokens` opens a map literal.
///
/// `{}` is an empty map. Otherwise the next few tokens are scanned for a colon
/// outside any nested brackets; a `;` or the matching `}` ends the scan.
fn opens_map_literal<'a, I>(tokens: &Peekable<I>) -> bool
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let mut ahead = tokens.clone();
    ahead.next();

    let (mut parens, mut brackets, mut braces) = (0i32, 0i32, 0i32);
    for (offset, (token, _)) in ahead.take(MAP_LOOKAHEAD).enumerate() {
        match token {
            Token::RBrace if offset == 0 => return true,
            Token::LParen => parens += 1,
            Token::RParen => parens -= 1,
            Token::LBracket => brackets += 1,
            Token::RBracket => brackets -= 1,
            Token::LBrace => braces += 1,
            Token::RBrace if braces > 0 => braces -= 1,
            Token::RBrace | Token::Semicolon | Token::Eof => return false,
            Token::Colon if parens == 0 && brackets == 0 && braces == 0 => return true,
            _ => {},
        }
    }

    false
}

/// Parses one `key: value` pair of a map literal.
fn parse_map_entry<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<(Expr, Expr)>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let key = parse_expression(tokens)?;
    expect(tokens, &Token::Colon)?;
    let value = parse_expression(tokens)?;

    Ok((key, value))
}

/// Parses a lambda expression.
///
/// Syntax:
/// ```text
///     lamb (<param>, ...) => <expression>
///     lamb (<param>, ...) => { ... }
/// ```
///
/// # Errors
/// - `InvalidLambda` for a malformed parameter list or a missing `=>`.
/// - `DuplicateParameter` if a parameter name repeats.
fn parse_lambda<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let line = expect(tokens, &Token::Lamb)?.line;

    let params = parse_parameters(tokens, invalid_lambda)?;

    match tokens.next() {
        Some((Token::Arrow, _)) => {},
        Some((tok, position)) => {
            return Err(invalid_lambda(format!("expected '=>' after parameters, found {tok}"), *position));
        },
        None => return Err(end_of_input("'=>'")),
    }

    let body = match tokens.peek() {
        Some((Token::LBrace, _)) => LambdaBody::Block(parse_block(tokens)?),
        _ => LambdaBody::Expression(Box::new(parse_expression(tokens)?)),
    };

    Ok(Expr::Lambda { decl: Rc::new(LambdaDecl { params, body, line }),
                      line })
}

fn invalid_lambda(details: String, position: Position) -> ParseError {
    ParseError::InvalidLambda { details,
                                line: position.line,
                                column: position.column }
}

/// Parses `input()` or `input(type)`.
fn parse_input<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let line = expect(tokens, &Token::Input)?.line;
    expect(tokens, &Token::LParen)?;

    let target = tokens.peek().and_then(|(token, _)| cast_type(token));
    if target.is_some() {
        tokens.next();
    }
    expect(tokens, &Token::RParen)?;

    Ok(Expr::Input { target, line })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{ast::CastType, interpreter::lexer::tokenize};

    fn parse_source(source: &str) -> ParseResult<Expr> {
        let tokens = tokenize(source).expect("source should tokenize");
        parse_expression(&mut tokens.iter().peekable())
    }

    #[test]
    fn prefix_and_suffix_casts() {
        assert!(matches!(parse_source("(int)x").unwrap(),
                         Expr::Cast { target: CastType::Int, .. }));
        assert!(matches!(parse_source("x(str)").unwrap(),
                         Expr::Cast { target: CastType::Str, .. }));
    }

    #[test]
    fn parenthesized_expression_is_not_a_cast() {
        assert!(matches!(parse_source("(x)").unwrap(), Expr::Variable { .. }));
    }

    #[test]
    fn format_suffix_reads_precision() {
        assert!(matches!(parse_source("x.2f").unwrap(),
                         Expr::Format { precision: 2, .. }));
        assert!(matches!(parse_source("x.2g").unwrap_err(),
                         ParseError::InvalidFormatSpecifier { .. }));
    }

    #[test]
    fn range_argument_counts() {
        assert!(matches!(parse_source("range(5)").unwrap(), Expr::Range { step: None, .. }));
        assert!(matches!(parse_source("range(1, 10, 2)").unwrap(),
                         Expr::Range { step: Some(_), .. }));
        assert!(matches!(parse_source("range()").unwrap_err(),
                         ParseError::InvalidRangeArguments { count: 0, .. }));
        assert!(matches!(parse_source("range(1, 2, 3, 4)").unwrap_err(),
                         ParseError::InvalidRangeArguments { count: 4, .. }));
    }

    #[test]
    fn brace_opens_map_only_with_colon() {
        assert!(matches!(parse_source("{}").unwrap(), Expr::MapLiteral { .. }));
        assert!(matches!(parse_source("{\"a\": 1, \"b\": [1, 2],}").unwrap(),
                         Expr::MapLiteral { ref entries, .. } if entries.len() == 2));
        assert!(matches!(parse_source("{ x; }").unwrap_err(),
                         ParseError::UnexpectedBrace { .. }));
    }

    #[test]
    fn lambda_bodies() {
        let Expr::Lambda { decl, .. } = parse_source("lamb (a, b) => a + b").unwrap() else {
            panic!("expected a lambda");
        };
        assert_eq!(decl.params, vec!["a".to_string(), "b".to_string()]);
        assert!(matches!(decl.body, LambdaBody::Expression(_)));

        let Expr::Lambda { decl, .. } = parse_source("lamb () => { return 1; }").unwrap() else {
            panic!("expected a lambda");
        };
        assert!(matches!(decl.body, LambdaBody::Block(_)));
    }

    #[test]
    fn lambda_requires_arrow() {
        assert!(matches!(parse_source("lamb (a) a").unwrap_err(),
                         ParseError::InvalidLambda { .. }));
    }

    #[test]
    fn set_and_array_literals_allow_trailing_comma() {
        assert!(matches!(parse_source("#{1, 2,}").unwrap(),
                         Expr::SetLiteral { ref elements, .. } if elements.len() == 2));
        assert!(matches!(parse_source("[1, 2, 3,]").unwrap(),
                         Expr::ArrayLiteral { ref elements, .. } if elements.len() == 3));
    }

    #[test]
    fn typed_input() {
        assert_eq!(parse_source("input(float)").unwrap(),
                   Expr::Input { target: Some(CastType::Float),
                                 line:   1, });
    }
}
