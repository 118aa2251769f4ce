/// Parser entry points.
///
/// Holds the program and block loops, the expression entry point, and the
/// shared [`core::ParseResult`] alias.
pub mod core;

/// Statement parsing.
///
/// Dispatches on the first token of a statement and resolves the lookahead
/// cases that start with an identifier: reassignment, index assignment and
/// postfix increments.
pub mod statement;

/// Control flow and declarations with braced bodies.
///
/// `if`/`elif`/`else`, the three loop forms and `fun` definitions. None of
/// these take a trailing semicolon except `do { } while c;`.
pub mod block;

/// Binary operator parsing.
///
/// One function per precedence level, from `or` down to the right-associative
/// power operator.
pub mod binary;

/// Unary, postfix and primary expressions.
///
/// Handles prefix operators, index chains, call/cast/format suffixes, and all
/// primary forms including lambdas and container literals.
pub mod unary;

/// Small helpers shared by the parsing functions.
pub mod utils;
