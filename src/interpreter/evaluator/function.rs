/// The `len` builtin, shared by every container kind and text.
pub mod builtin;
/// Array builtins.
///
/// Mutating builtins change the array in place and return it, so the change
/// is visible through every name that holds it. Positions are 1-based and
/// negative positions count from the end.
pub mod array;
/// Map builtins.
///
/// Maps keep insertion order. Keys are text, numbers or booleans.
pub mod map;
/// Set builtins: membership, mutation and set algebra.
pub mod set;
/// The builtin registry.
///
/// Holds the arity model, the static table of builtin names and the argument
/// helpers shared by the builtin and library modules.
pub mod core;
