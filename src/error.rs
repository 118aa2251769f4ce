/// Lexical errors.
///
/// Raised while turning source text into tokens: unterminated strings and
/// block comments, characters outside the language, and integer literals that
/// do not fit the runtime integer type.
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while building the syntax tree from
/// tokens. Parse errors include unexpected tokens, a premature end of input,
/// malformed declarations, and invalid special forms such as `range(...)` or
/// the `.Nf` format suffix.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation and execution.
/// Runtime errors include things like division by zero, type mismatches,
/// invalid indexing, writes to constants, or failed conversions.
pub mod runtime_error;

pub use lex_error::LexError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Any failure produced while executing a program from source text.
///
/// The three categories are kept apart so callers can tell a lexical problem
/// from a syntax problem from a failure during evaluation.
///
/// # Example
/// ```
/// use puffing::{Error, execute};
///
/// let err = execute("let x as \"open;").unwrap_err();
/// assert!(matches!(err, Error::Lex(_)));
///
/// let err = execute("let x as ;").unwrap_err();
/// assert!(matches!(err, Error::Parse(_)));
///
/// let err = execute("print(missing);").unwrap_err();
/// assert!(matches!(err, Error::Runtime(_)));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The source text could not be tokenized.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// The token stream does not form a valid program.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Evaluation failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// Returns the source line the error points at.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Lex(e) => e.line(),
            Self::Parse(e) => e.line(),
            Self::Runtime(e) => e.line(),
        }
    }
}
