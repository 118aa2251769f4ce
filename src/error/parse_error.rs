/// Represents all errors that can occur during parsing.
///
/// Every variant carries the line and column of the token where the parser
/// gave up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Found a token other than the one the grammar requires.
    #[error("Error on line {line}, column {column}: Expected {expected}, found {found}.")]
    UnexpectedToken {
        /// What the parser was looking for.
        expected: String,
        /// The token encountered.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
        /// The source column where the error occurred.
        column:   usize,
    },
    /// Reached the end of input in the middle of a construct.
    #[error("Error on line {line}, column {column}: Unexpected end of input, expected {expected}.")]
    UnexpectedEof {
        /// What the parser was looking for.
        expected: String,
        /// The source line where the error occurred.
        line:     usize,
        /// The source column where the error occurred.
        column:   usize,
    },
    /// A construct that is syntactically malformed.
    #[error("Error on line {line}, column {column}: Invalid syntax: {details}.")]
    InvalidSyntax {
        /// Description of the problem.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
        /// The source column where the error occurred.
        column:  usize,
    },
    /// A destructuring pattern `[a, b]` that is not a list of names.
    #[error("Error on line {line}, column {column}: Invalid destructuring pattern: {details}.")]
    InvalidDestructuring {
        /// Description of the problem.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
        /// The source column where the error occurred.
        column:  usize,
    },
    /// A malformed `fun` definition.
    #[error("Error on line {line}, column {column}: Invalid function definition: {details}.")]
    InvalidFunctionDefinition {
        /// Description of the problem.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
        /// The source column where the error occurred.
        column:  usize,
    },
    /// A malformed `lamb` expression.
    #[error("Error on line {line}, column {column}: Invalid lambda: {details}.")]
    InvalidLambda {
        /// Description of the problem.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
        /// The source column where the error occurred.
        column:  usize,
    },
    /// The same parameter name listed twice.
    #[error("Error on line {line}, column {column}: Duplicate parameter '{name}'.")]
    DuplicateParameter {
        /// The repeated parameter.
        name:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// `range(...)` called with an unsupported number of arguments.
    #[error("Error on line {line}, column {column}: range() takes 1, 2, or 3 arguments, got {count}.")]
    InvalidRangeArguments {
        /// The number of arguments supplied.
        count:  usize,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A `.N` suffix that is not followed by `f`.
    #[error("Error on line {line}, column {column}: Invalid format specifier: {details}.")]
    InvalidFormatSpecifier {
        /// Description of the problem.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
        /// The source column where the error occurred.
        column:  usize,
    },
    /// A `{` in expression position that does not open a map literal.
    #[error("Error on line {line}, column {column}: Unexpected '{{' in expression context.")]
    UnexpectedBrace {
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
}

impl ParseError {
    /// The source line of the error.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnexpectedToken { line, .. }
            | Self::UnexpectedEof { line, .. }
            | Self::InvalidSyntax { line, .. }
            | Self::InvalidDestructuring { line, .. }
            | Self::InvalidFunctionDefinition { line, .. }
            | Self::InvalidLambda { line, .. }
            | Self::DuplicateParameter { line, .. }
            | Self::InvalidRangeArguments { line, .. }
            | Self::InvalidFormatSpecifier { line, .. }
            | Self::UnexpectedBrace { line, .. } => *line,
        }
    }

    /// The source column of the error.
    #[must_use]
    pub const fn column(&self) -> usize {
        match self {
            Self::UnexpectedToken { column, .. }
            | Self::UnexpectedEof { column, .. }
            | Self::InvalidSyntax { column, .. }
            | Self::InvalidDestructuring { column, .. }
            | Self::InvalidFunctionDefinition { column, .. }
            | Self::InvalidLambda { column, .. }
            | Self::DuplicateParameter { column, .. }
            | Self::InvalidRangeArguments { column, .. }
            | Self::InvalidFormatSpecifier { column, .. }
            | Self::UnexpectedBrace { column, .. } => *column,
        }
    }
}
