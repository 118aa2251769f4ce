/// Runtime values.
///
/// Defines the `Value` enum for scalars, shared containers and callables,
/// together with truthiness, loose equality, ordering and the printed form
/// used by `print` and `str` casts.
pub mod core;
/// Hashable map keys and set elements.
///
/// Defines the `Key` type, which restricts keys to primitives and merges
/// integral floats with the equal integer.
pub mod key;
