use std::fmt::{self, Display};

use tracing::trace;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            function::{array, builtin, map, set},
        },
        value::{
            core::{ArrayRef, MapRef, SetRef, Value},
            key::Key,
        },
    },
};

/// Type alias for builtin and library function handlers.
///
/// A handler receives a slice of evaluated argument values and the line
/// number, and returns the call's result.
pub type BuiltinFn = fn(&[Value], usize) -> EvalResult<Value>;

/// Specifies the allowed number of arguments for a builtin or native.
///
/// - `Exact(n)` means exactly `n` arguments.
/// - `OneOf(slice)` means any count listed in `slice`.
/// - `AtLeast(n)` means `n` or more arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
    AtLeast(usize),
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    ///
    /// # Example
    /// ```
    /// use puffing::interpreter::evaluator::function::core::Arity;
    ///
    /// assert!(Arity::OneOf(&[2, 3]).check(3));
    /// assert!(!Arity::AtLeast(2).check(1));
    /// ```
    #[must_use]
    pub fn check(&self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == *m,
            Self::OneOf(counts) => counts.contains(&n),
            Self::AtLeast(m) => n >= *m,
        }
    }

    /// Builds the error for a call with `found` arguments.
    pub(crate) fn mismatch(&self, name: &str, found: usize, line: usize) -> RuntimeError {
        RuntimeError::ArgumentCount { name: name.to_string(),
                                      expected: self.to_string(),
                                      found,
                                      line }
    }
}

impl Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::OneOf(counts) => {
                let counts: Vec<String> = counts.iter().map(ToString::to_string).collect();
                write!(f, "{}", counts.join(" or "))
            },
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - whether it mutates its first argument in place,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (entry metadata),
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                mutates: $mutates:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        /// One entry of the builtin registry.
        pub struct BuiltinDef {
            pub name:    &'static str,
            pub arity:   Arity,
            pub mutates: bool,
            pub func:    BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, mutates: $mutates, func: $func },
            )*
        ];
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "len"                      => { arity: Arity::Exact(1), mutates: false, func: builtin::len },

    "push"                     => { arity: Arity::Exact(2), mutates: true, func: array::push },
    "pop"                      => { arity: Arity::Exact(1), mutates: true, func: array::pop },
    "shift"                    => { arity: Arity::Exact(1), mutates: true, func: array::shift },
    "unshift"                  => { arity: Arity::Exact(2), mutates: true, func: array::unshift },
    "insert"                   => { arity: Arity::Exact(3), mutates: true, func: array::insert },
    "remove"                   => { arity: Arity::Exact(2), mutates: true, func: array::remove },
    "clear"                    => { arity: Arity::Exact(1), mutates: true, func: array::clear },
    "reverse"                  => { arity: Arity::Exact(1), mutates: true, func: array::reverse },
    "sort"                     => { arity: Arity::Exact(1), mutates: true, func: array::sort },
    "contains"                 => { arity: Arity::Exact(2), mutates: false, func: array::contains },
    "index_of"                 => { arity: Arity::Exact(2), mutates: false, func: array::index_of },
    "slice"                    => { arity: Arity::OneOf(&[2, 3]), mutates: false, func: array::slice },
    "join"                     => { arity: Arity::Exact(2), mutates: false, func: array::join },
    "sum"                      => { arity: Arity::Exact(1), mutates: false, func: array::sum },
    "min"                      => { arity: Arity::Exact(1), mutates: false, func: |args, line| array::extreme("min", args, line) },
    "max"                      => { arity: Arity::Exact(1), mutates: false, func: |args, line| array::extreme("max", args, line) },

    "keys"                     => { arity: Arity::Exact(1), mutates: false, func: map::keys },
    "values"                   => { arity: Arity::Exact(1), mutates: false, func: map::values },
    "items"                    => { arity: Arity::Exact(1), mutates: false, func: map::items },
    "has_key"                  => { arity: Arity::Exact(2), mutates: false, func: map::has_key },
    "set"                      => { arity: Arity::Exact(3), mutates: true, func: map::set },
    "get"                      => { arity: Arity::OneOf(&[2, 3]), mutates: false, func: map::get },
    "delete_key"               => { arity: Arity::Exact(2), mutates: true, func: map::delete_key },
    "clear_dict"               => { arity: Arity::Exact(1), mutates: true, func: map::clear_dict },
    "update"                   => { arity: Arity::Exact(2), mutates: true, func: map::update },
    "copy_dict"                => { arity: Arity::Exact(1), mutates: false, func: map::copy_dict },
    "merge"                    => { arity: Arity::AtLeast(2), mutates: false, func: map::merge },

    "set_add"                  => { arity: Arity::Exact(2), mutates: true, func: set::add },
    "set_remove"               => { arity: Arity::Exact(2), mutates: true, func: set::remove },
    "set_discard"              => { arity: Arity::Exact(2), mutates: true, func: set::discard },
    "set_clear"                => { arity: Arity::Exact(1), mutates: true, func: set::clear },
    "set_contains"             => { arity: Arity::Exact(2), mutates: false, func: set::contains },
    "set_union"                => { arity: Arity::AtLeast(2), mutates: false, func: set::union },
    "set_intersection"         => { arity: Arity::AtLeast(2), mutates: false, func: set::intersection },
    "set_difference"           => { arity: Arity::AtLeast(2), mutates: false, func: set::difference },
    "set_symmetric_difference" => { arity: Arity::Exact(2), mutates: false, func: set::symmetric_difference },
    "set_is_subset"            => { arity: Arity::Exact(2), mutates: false, func: set::is_subset },
    "set_is_superset"          => { arity: Arity::Exact(2), mutates: false, func: set::is_superset },
    "set_is_disjoint"          => { arity: Arity::Exact(2), mutates: false, func: set::is_disjoint },
    "set_copy"                 => { arity: Arity::Exact(1), mutates: false, func: set::copy },
    "set_to_array"             => { arity: Arity::Exact(1), mutates: false, func: set::to_array },
    "array_to_set"             => { arity: Arity::Exact(1), mutates: false, func: set::from_array },
}

/// Finds a builtin by name.
#[must_use]
pub fn lookup_builtin(name: &str) -> Option<&'static BuiltinDef> {
    BUILTIN_TABLE.iter().find(|b| b.name == name)
}

impl Interpreter {
    /// Calls a builtin from its unevaluated argument expressions.
    ///
    /// Arity is checked before anything is evaluated. For a mutating builtin
    /// whose first argument is a bare name, that name must be bound and not
    /// constant. Because containers are shared handles, the mutation is then
    /// visible through the name.
    ///
    /// # Parameters
    /// - `builtin`: The registry entry.
    /// - `arguments`: Argument expressions.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// The builtin's result, or an error if the count, the target name or the
    /// builtin itself fails.
    pub(crate) fn call_builtin(&mut self,
                               builtin: &BuiltinDef,
                               arguments: &[Expr],
                               line: usize)
                               -> EvalResult<Value> {
        if !builtin.arity.check(arguments.len()) {
            return Err(builtin.arity.mismatch(builtin.name, arguments.len(), line));
        }

        if builtin.mutates
           && let Some(Expr::Variable { name, .. }) = arguments.first()
        {
            self.env.check_writable(name, line)?;
        }

        let args = self.eval_arguments(arguments)?;
        trace!(builtin = builtin.name, args = args.len(), "calling builtin");
        (builtin.func)(&args, line)
    }
}

/// Converts a value into a map key.
///
/// Map keys are text, numbers or booleans.
///
/// # Errors
/// `InvalidKeyType` for `none`, containers and callables.
pub fn map_key(value: &Value, line: usize) -> EvalResult<Key> {
    match Key::from_value(value) {
        Some(Key::None) | None => Err(RuntimeError::InvalidKeyType { found: value.type_name(),
                                                                     line }),
        Some(key) => Ok(key),
    }
}

/// Converts a value into a set element.
///
/// Set elements are text, numbers, booleans or `none`.
///
/// # Errors
/// `InvalidSetElement` for containers and callables.
pub fn set_element(value: &Value, line: usize) -> EvalResult<Key> {
    Key::from_value(value).ok_or(RuntimeError::InvalidSetElement { found: value.type_name(),
                                                                   line })
}

/// Builds the error for an argument of the wrong kind.
pub(crate) fn wrong_argument(function: &str,
                             details: impl Into<String>,
                             line: usize)
                             -> RuntimeError {
    RuntimeError::InvalidArgument { function: function.to_string(),
                                    details: details.into(),
                                    line }
}

/// Checks that exactly `N` arguments were passed and names them.
///
/// # Example
/// ```text
/// let [target, value] = exact_args::<2>("push", args, line)?;
/// ```
pub(crate) fn exact_args<'a, const N: usize>(function: &str,
                                             args: &'a [Value],
                                             line: usize)
                                             -> EvalResult<&'a [Value; N]> {
    args.try_into()
        .map_err(|_| Arity::Exact(N).mismatch(function, args.len(), line))
}

/// Extracts an array handle from an argument.
pub(crate) fn array_ref(function: &str, value: &Value, line: usize) -> EvalResult<ArrayRef> {
    match value {
        Value::Array(items) => Ok(items.clone()),
        other => Err(wrong_argument(function,
                                    format!("expected an array, got {}", other.type_name()),
                                    line)),
    }
}

/// Extracts a map handle from an argument.
pub(crate) fn map_ref(function: &str, value: &Value, line: usize) -> EvalResult<MapRef> {
    match value {
        Value::Map(entries) => Ok(entries.clone()),
        other => Err(wrong_argument(function,
                                    format!("expected a map, got {}", other.type_name()),
                                    line)),
    }
}

/// Extracts a set handle from an argument.
pub(crate) fn set_ref(function: &str, value: &Value, line: usize) -> EvalResult<SetRef> {
    match value {
        Value::Set(elements) => Ok(elements.clone()),
        other => Err(wrong_argument(function,
                                    format!("expected a set, got {}", other.type_name()),
                                    line)),
    }
}

/// Extracts an integer from an argument.
pub(crate) fn integer(function: &str, value: &Value, line: usize) -> EvalResult<i64> {
    match value {
        Value::Integer(n) => Ok(*n),
        other => Err(wrong_argument(function,
                                    format!("expected an int, got {}", other.type_name()),
                                    line)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn builtin_names_are_unique() {
        let names: HashSet<_> = BUILTIN_FUNCTIONS.iter().collect();
        assert_eq!(names.len(), BUILTIN_FUNCTIONS.len());
    }

    #[test]
    fn arity_describes_itself() {
        assert_eq!(Arity::Exact(1).to_string(), "1");
        assert_eq!(Arity::OneOf(&[2, 3]).to_string(), "2 or 3");
        assert_eq!(Arity::AtLeast(2).to_string(), "at least 2");
    }

    #[test]
    fn mutating_builtins_are_flagged() {
        for name in ["push", "pop", "set", "set_add", "clear_dict"] {
            assert!(lookup_builtin(name).is_some_and(|b| b.mutates), "{name}");
        }
        for name in ["len", "contains", "get", "set_union"] {
            assert!(lookup_builtin(name).is_some_and(|b| !b.mutates), "{name}");
        }
    }
}
