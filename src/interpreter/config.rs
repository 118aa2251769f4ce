/// The recursion limit used when no other is configured.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 200;

/// Settings for one interpreter instance.
///
/// # Example
/// ```
/// use puffing::interpreter::config::InterpreterConfig;
///
/// let config = InterpreterConfig::default().with_max_call_depth(50);
/// assert_eq!(config.max_call_depth, 50);
/// assert!(!config.echo_output);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Nested function and lambda calls allowed before `RecursionTooDeep`.
    pub max_call_depth: usize,
    /// Also write printed text to stdout as it is produced.
    pub echo_output:    bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self { max_call_depth: DEFAULT_MAX_CALL_DEPTH,
               echo_output:    false, }
    }
}

impl InterpreterConfig {
    /// Replaces the recursion limit.
    #[must_use]
    pub const fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    /// Turns streaming of printed text to stdout on or off.
    #[must_use]
    pub const fn with_echo_output(mut self, echo_output: bool) -> Self {
        self.echo_output = echo_output;
        self
    }
}
