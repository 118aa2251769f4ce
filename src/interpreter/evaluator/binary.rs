/// Operator dispatch.
pub mod core;
/// `+`, `-`, `*`, `/` and floored `%`, including text and array
/// concatenation.
pub mod arithmetic;
/// Exponentiation with checked int powers.
pub mod power;
/// Equality and ordering.
pub mod comparison;
/// `and` / `or` on evaluated operands.
pub mod logic;
