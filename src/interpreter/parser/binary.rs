use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        lexer::{SpannedToken, Token},
        parser::{core::ParseResult, unary::parse_unary},
    },
};

/// Parses one left-associative precedence level.
///
/// `operand` parses the next-higher level and `accepts` selects the operators
/// that belong to this one.
fn parse_left_associative<'a, I>(tokens: &mut Peekable<I>,
                                 operand: fn(&mut Peekable<I>) -> ParseResult<Expr>,
                                 accepts: fn(BinaryOperator) -> bool)
                                 -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let mut left = operand(tokens)?;
    loop {
        if let Some((token, position)) = tokens.peek().copied()
           && let Some(op) = token_to_binary_operator(token)
           && accepts(op)
        {
            tokens.next();
            let right = operand(tokens)?;
            left = Expr::BinaryOp { left: Box::new(left),
                                    op,
                                    right: Box::new(right),
                                    line: position.line };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Parses logical OR expressions.
///
/// The rule is: `logical_or := logical_and ("or" logical_and)*`
pub fn parse_logical_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    parse_left_associative(tokens, parse_logical_and, |op| op == BinaryOperator::Or)
}

/// Parses logical AND expressions.
///
/// The rule is: `logical_and := comparison ("and" comparison)*`
pub fn parse_logical_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    parse_left_associative(tokens, parse_comparison, |op| op == BinaryOperator::And)
}

/// Parses comparison expressions.
///
/// All six comparison operators share one level and associate to the left,
/// so `a < b = true` compares `a < b` with `true`.
///
/// The rule is: `comparison := additive (("=" | "!=" | "<" | ">" | "<=" | ">=")
/// additive)*`
pub fn parse_comparison<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    parse_left_associative(tokens, parse_additive, |op| {
        matches!(op,
                 BinaryOperator::Equal
                 | BinaryOperator::NotEqual
                 | BinaryOperator::Less
                 | BinaryOperator::Greater
                 | BinaryOperator::LessEqual
                 | BinaryOperator::GreaterEqual)
    })
}

/// Parses addition and subtraction expressions.
///
/// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    parse_left_associative(tokens, parse_multiplicative, |op| {
        matches!(op, BinaryOperator::Add | BinaryOperator::Sub)
    })
}

/// Parses multiplication-level expressions.
///
/// The rule is: `multiplicative := power (("*" | "/" | "%") power)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    parse_left_associative(tokens, parse_power, |op| {
        matches!(op, BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod)
    })
}

/// Parses exponentiation, which is right-associative.
///
/// The left operand is a unary expression, so `-2 ** 2` is `(-2) ** 2`.
///
/// The rule is: `power := unary ("**" power)?`
pub fn parse_power<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let left = parse_unary(tokens)?;

    if let Some((Token::Power, position)) = tokens.peek().copied() {
        tokens.next();
        let right = parse_power(tokens)?;
        return Ok(Expr::BinaryOp { left:  Box::new(left),
                                   op:    BinaryOperator::Pow,
                                   right: Box::new(right),
                                   line:  position.line, });
    }

    Ok(left)
}

/// Maps a token to the binary operator it spells, if any.
///
/// # Parameters
/// - `token`: The token to convert.
///
/// # Returns
/// `Some(BinaryOperator)` when the token is an infix operator.
const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Sub),
        Token::Star => Some(BinaryOperator::Mul),
        Token::Slash => Some(BinaryOperator::Div),
        Token::Percent => Some(BinaryOperator::Mod),
        Token::Power => Some(BinaryOperator::Pow),
        Token::Equal => Some(BinaryOperator::Equal),
        Token::NotEqual => Some(BinaryOperator::NotEqual),
        Token::Less => Some(BinaryOperator::Less),
        Token::Greater => Some(BinaryOperator::Greater),
        Token::LessEqual => Some(BinaryOperator::LessEqual),
        Token::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        Token::And => Some(BinaryOperator::And),
        Token::Or => Some(BinaryOperator::Or),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ast::LiteralValue, interpreter::lexer::tokenize};

    fn parse_source(source: &str) -> Expr {
        let tokens = tokenize(source).expect("source should tokenize");
        parse_logical_or(&mut tokens.iter().peekable()).expect("source should parse")
    }

    fn integer(expr: &Expr) -> Option<i64> {
        match expr {
            Expr::Literal { value: LiteralValue::Integer(v), .. } => Some(*v),
            _ => None,
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let Expr::BinaryOp { op, right, .. } = parse_source("x + y * 2") else {
            panic!("expected a binary operation");
        };
        assert_eq!(op, BinaryOperator::Add);
        assert!(matches!(*right, Expr::BinaryOp { op: BinaryOperator::Mul, .. }));
    }

    #[test]
    fn power_is_right_associative() {
        let Expr::BinaryOp { left, right, .. } = parse_source("2 ** 3 ** 2") else {
            panic!("expected a binary operation");
        };
        assert_eq!(integer(&left), Some(2));
        assert!(matches!(*right, Expr::BinaryOp { op: BinaryOperator::Pow, .. }));
    }

    #[test]
    fn subtraction_is_left_associative() {
        let Expr::BinaryOp { left, right, .. } = parse_source("10 - 3 - 2") else {
            panic!("expected a binary operation");
        };
        assert!(matches!(*left, Expr::BinaryOp { op: BinaryOperator::Sub, .. }));
        assert_eq!(integer(&right), Some(2));
    }

    #[test]
    fn or_is_loosest() {
        let Expr::BinaryOp { op, .. } = parse_source("a and b or c = d") else {
            panic!("expected a binary operation");
        };
        assert_eq!(op, BinaryOperator::Or);
    }
}
