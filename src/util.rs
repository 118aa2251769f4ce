/// Numeric helpers.
///
/// Index normalization for 1-based and negative indices, integer/float
/// conversions that never silently wrap, floored modulo, and the printed form
/// of floats. Everything here is independent of the evaluator so the same
/// rules apply to indexing, builtins, and libraries alike.
pub mod num;
