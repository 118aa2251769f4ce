use tracing::trace;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            function::core::{Arity, BuiltinFn},
        },
        value::core::Value,
    },
};

/// Builds a static table of library natives.
///
/// Each entry provides the name the native is bound under, its arity and the
/// function pointer implementing it.
macro_rules! natives {
    ($($name:literal => $arity:expr, $func:expr;)*) => {
        &[$(NativeFunction { name: $name, arity: $arity, func: $func },)*]
    };
}

/// `lib $math.main;`
///
/// Floating-point functions over ints and floats, plus the `pi`, `e` and
/// `tau` constants. Results outside a function's domain raise `MathDomain`
/// instead of producing NaN.
pub mod math;
/// `lib $string.main;`
///
/// Text functions. Unlike indexing, which is 1-based, every position taken or
/// returned here is a zero-based character offset.
pub mod text;

/// A function provided by an imported library.
///
/// Natives are bound as ordinary values when their library is imported, so a
/// later `let` can shadow them like any other name.
#[derive(Debug)]
pub struct NativeFunction {
    /// The name the native is bound under.
    pub name:  &'static str,
    /// Accepted argument counts.
    pub arity: Arity,
    /// The implementation.
    pub func:  BuiltinFn,
}

/// One importable library.
struct Library {
    path:      &'static str,
    natives:   &'static [NativeFunction],
    constants: &'static [(&'static str, f64)],
}

static LIBRARIES: &[Library] = &[Library { path:      "math.main",
                                           natives:   math::NATIVES,
                                           constants: math::CONSTANTS, },
                                 Library { path:      "string.main",
                                           natives:   text::NATIVES,
                                           constants: &[], }];

/// The paths accepted by `lib $...;`.
///
/// # Example
/// ```
/// use puffing::interpreter::library::library_paths;
///
/// assert!(library_paths().any(|path| path == "math.main"));
/// ```
pub fn library_paths() -> impl Iterator<Item = &'static str> {
    LIBRARIES.iter().map(|library| library.path)
}

impl Interpreter {
    /// Executes `lib $path;`.
    ///
    /// Every native and constant of the library is bound in the environment,
    /// replacing existing bindings of the same names. Importing a library a
    /// second time binds its names again.
    ///
    /// # Errors
    /// - `LibraryNotFound` for an unknown path.
    /// - `ConstantModification` when one of the names is a constant. Nothing
    ///   is bound in that case.
    ///
    /// # Example
    /// ```
    /// use puffing::execute;
    ///
    /// let run = execute("lib $math.main; print(floor(pi));").unwrap();
    /// assert_eq!(run.output, "3");
    ///
    /// assert!(execute("lib $physics.main;").is_err());
    /// ```
    pub(crate) fn import_library(&mut self, path: &str, line: usize) -> EvalResult<()> {
        let Some(library) = LIBRARIES.iter().find(|library| library.path == path) else {
            return Err(RuntimeError::LibraryNotFound { path: path.to_string(),
                                                       line });
        };

        let names = library.natives
                           .iter()
                           .map(|native| native.name)
                           .chain(library.constants.iter().map(|(name, _)| *name));
        for name in names {
            if self.env.is_constant(name) {
                return Err(RuntimeError::ConstantModification { name: name.to_string(),
                                                                line });
            }
        }

        for native in library.natives {
            self.env.define(native.name, Value::Native(native));
        }
        for (name, value) in library.constants {
            self.env.define(name, Value::Float(*value));
        }

        let first_import = self.env.register_library(path);
        trace!(library = path,
               natives = library.natives.len(),
               first_import,
               "imported library");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{Error, execute};

    #[test]
    fn native_names_are_unique_across_libraries() {
        let mut seen = HashSet::new();
        for library in LIBRARIES {
            for native in library.natives {
                assert!(seen.insert(native.name), "{}", native.name);
            }
            for (name, _) in library.constants {
                assert!(seen.insert(*name), "{name}");
            }
        }
    }

    #[test]
    fn unknown_library_fails() {
        let err = execute("lib $math.extra;").unwrap_err();
        assert_eq!(err,
                   Error::Runtime(RuntimeError::LibraryNotFound { path: "math.extra".into(),
                                                                  line: 1, }));
    }

    #[test]
    fn import_does_not_replace_constants() {
        let err = execute("lock pi as 3;\nlib $math.main;").unwrap_err();
        assert_eq!(err,
                   Error::Runtime(RuntimeError::ConstantModification { name: "pi".into(),
                                                                       line: 2, }));
    }

    #[test]
    fn natives_can_be_shadowed() {
        let run = execute("lib $string.main; let upper as 1; print(upper);").unwrap();
        assert_eq!(run.output, "1");
    }

    #[test]
    fn natives_are_values() {
        let run = execute("lib $string.main; let shout as upper; print(shout(\"hi\"));").unwrap();
        assert_eq!(run.output, "HI");
    }
}
