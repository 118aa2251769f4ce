/// Core evaluation logic and run state.
///
/// Contains the `Interpreter`, the `Flow` signal that carries `break`,
/// `continue` and `return` outward, block execution and the expression
/// dispatcher.
pub mod core;

/// Statement execution.
///
/// Declarations, assignments, increments, `print`, `if`, function
/// definitions and imports. Loops are delegated to [`control`].
pub mod statement;

/// Loops and ranges.
///
/// Implements `for`, `while` and `do ... while` on top of the `Flow` signal,
/// and builds the arrays produced by `range(...)`.
pub mod control;

/// Binary operator evaluation logic.
///
/// Handles arithmetic, exponentiation, comparisons and the logical
/// connectives.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements arithmetic negation and logical NOT.
pub mod unary;

/// Indexing.
///
/// Reads through `container[index]` and writes through
/// `name[i]...[n] as value;`, with 1-based and negative positions.
pub mod index;

/// Calls of user functions, lambdas, builtins and library natives.
///
/// User-defined bodies run against a snapshot of the environment that is put
/// back when the call returns.
pub mod call;

/// Casts, fixed-decimal formatting and typed `input(...)`.
pub mod conversion;

/// Function evaluation.
///
/// The builtin registry and the array, map and set builtins.
pub mod function;
