/// Represents all errors that can occur while tokenizing source text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    /// A string literal reached the end of input without its closing quote.
    #[error("Error on line {line}, column {column}: Unterminated string literal.")]
    UnterminatedString {
        /// The line of the opening quote.
        line:   usize,
        /// The column of the opening quote.
        column: usize,
    },
    /// A `?-` block comment reached the end of input without `-?`.
    #[error("Error on line {line}, column {column}: Unterminated block comment.")]
    UnterminatedComment {
        /// The line where the comment starts.
        line:   usize,
        /// The column where the comment starts.
        column: usize,
    },
    /// A character that does not start any token.
    #[error("Error on line {line}, column {column}: Unknown character '{character}'.")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// The source line where the error occurred.
        line:      usize,
        /// The source column where the error occurred.
        column:    usize,
    },
    /// A numeric literal that cannot be represented.
    #[error("Error on line {line}, column {column}: Invalid number literal '{literal}'.")]
    InvalidNumber {
        /// The literal as written.
        literal: String,
        /// The source line where the error occurred.
        line:    usize,
        /// The source column where the error occurred.
        column:  usize,
    },
}

impl LexError {
    /// The source line of the error.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnterminatedString { line, .. }
            | Self::UnterminatedComment { line, .. }
            | Self::InvalidCharacter { line, .. }
            | Self::InvalidNumber { line, .. } => *line,
        }
    }

    /// The source column of the error.
    #[must_use]
    pub const fn column(&self) -> usize {
        match self {
            Self::UnterminatedString { column, .. }
            | Self::UnterminatedComment { column, .. }
            | Self::InvalidCharacter { column, .. }
            | Self::InvalidNumber { column, .. } => *column,
        }
    }
}
