/// Settings for an interpreter run.
///
/// Holds the recursion limit and whether printed text is echoed to stdout as
/// it is produced.
pub mod config;
/// The binding table of a run.
///
/// One flat layer of names, the set of names declared with `lock`, the
/// imported libraries, and the snapshots taken around calls.
pub mod environment;
/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator traverses the AST, evaluates expressions and statements,
/// performs arithmetic and logical operations, manages variable state, and
/// produces results. It is the core execution engine of the interpreter.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Runs loops, calls and the `break`/`continue`/`return` signals.
/// - Reports runtime errors such as division by zero or invalid operations.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a stream of
/// tokens, each corresponding to meaningful language elements such as numbers,
/// identifiers, operators, delimiters, and keywords. This is the first stage of
/// interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with type and source
///   location.
/// - Handles numeric and string literals, identifiers, and operators.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// Importable libraries.
///
/// `lib $math.main;` and `lib $string.main;` bind their natives and constants
/// as ordinary values in the environment.
pub mod library;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// an AST that represents the syntactic structure of expressions and
/// statements. This enables later phases to analyze and execute user code.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes (expressions, statements).
/// - Validates correct grammar and syntax, reporting errors with location info.
/// - Supports special forms such as `range(...)`, casts and `.Nf` formats.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the values a program computes with: none, integers,
/// floats, booleans, text, the shared array, map and set containers, and the
/// three kinds of callables. It also provides truthiness, equality, ordering
/// and the printed form.
///
/// # Responsibilities
/// - Defines the `Value` enum and all supported value variants.
/// - Restricts map keys and set elements to hashable primitives.
/// - Renders values the way `print` and `str` casts show them.
pub mod value;
