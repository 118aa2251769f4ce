use std::fmt;

use logos::{Lexer, Logos, Skip};

use crate::error::LexError;

/// Represents a lexical token in the source input.
///
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// Keywords are matched as exact tokens and win over [`Token::Identifier`]
/// only when the whole word matches, so `letter` is still an identifier.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(error = LexFailure)]
#[logos(skip r"[ \t\r\f\x0B]+")]
pub enum Token {
    /// Floating-point literal tokens, such as `3.14`. There is no exponent form.
    #[regex(r"[0-9]+\.[0-9]+", parse_float)]
    Float(f64),
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),
    /// Double-quoted text literal with escapes already resolved.
    #[token("\"", lex_string)]
    Text(String),
    /// Identifier tokens; variable or function names such as `x` or `square`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// `let`
    #[token("let")]
    Let,
    /// `lock`
    #[token("lock")]
    Lock,
    /// `as`
    #[token("as")]
    As,
    /// `if`
    #[token("if")]
    If,
    /// `elif`
    #[token("elif")]
    Elif,
    /// `else`
    #[token("else")]
    Else,
    /// `print`
    #[token("print")]
    Print,
    /// `input`
    #[token("input")]
    Input,
    /// `lib`
    #[token("lib")]
    Lib,
    /// `for`
    #[token("for")]
    For,
    /// `in`
    #[token("in")]
    In,
    /// `while`
    #[token("while")]
    While,
    /// `do`
    #[token("do")]
    Do,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `int`
    #[token("int")]
    IntType,
    /// `float`
    #[token("float")]
    FloatType,
    /// `str`
    #[token("str")]
    StrType,
    /// `bool`
    #[token("bool")]
    BoolType,
    /// `true`
    #[token("true")]
    True,
    /// `false`
    #[token("false")]
    False,
    /// `and`
    #[token("and")]
    And,
    /// `or`
    #[token("or")]
    Or,
    /// `fun`
    #[token("fun")]
    Fun,
    /// `lamb`
    #[token("lamb")]
    Lamb,
    /// `return`
    #[token("return")]
    Return,

    /// `**`
    #[token("**")]
    Power,
    /// `++`
    #[token("++")]
    Increment,
    /// `--`
    #[token("--")]
    Decrement,
    /// `!=`
    #[token("!=")]
    NotEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `=>`
    #[token("=>")]
    Arrow,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `=`
    #[token("=")]
    Equal,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `!`
    #[token("!")]
    Bang,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `.`
    #[token(".")]
    Dot,
    /// `$`
    #[token("$")]
    Dollar,
    /// `,`
    #[token(",")]
    Comma,
    /// `:`
    #[token(":")]
    Colon,
    /// `#`
    #[token("#")]
    Hash,

    /// `? comment to end of line`
    #[regex(r"\?([^\-\n][^\n]*)?", logos::skip, allow_greedy = true)]
    Comment,
    /// `?- block comment -?`, closed by the first `-?`.
    #[token("?-", skip_block_comment)]
    BlockComment,
    /// Line breaks only advance the position bookkeeping.
    #[token("\n", |lex| {
        lex.extras.line      += 1;
        lex.extras.line_start = lex.span().end;
        Skip
    })]
    NewLine,

    /// End of input. Never produced by logos itself; [`tokenize`] appends it.
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Float(v) => return write!(f, "number {v}"),
            Self::Integer(v) => return write!(f, "number {v}"),
            Self::Text(s) => return write!(f, "text \"{s}\""),
            Self::Identifier(name) => return write!(f, "identifier '{name}'"),
            Self::Eof => return write!(f, "end of input"),
            Self::Comment | Self::BlockComment | Self::NewLine => return write!(f, "comment"),
            Self::Let => "let",
            Self::Lock => "lock",
            Self::As => "as",
            Self::If => "if",
            Self::Elif => "elif",
            Self::Else => "else",
            Self::Print => "print",
            Self::Input => "input",
            Self::Lib => "lib",
            Self::For => "for",
            Self::In => "in",
            Self::While => "while",
            Self::Do => "do",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::IntType => "int",
            Self::FloatType => "float",
            Self::StrType => "str",
            Self::BoolType => "bool",
            Self::True => "true",
            Self::False => "false",
            Self::And => "and",
            Self::Or => "or",
            Self::Fun => "fun",
            Self::Lamb => "lamb",
            Self::Return => "return",
            Self::Power => "**",
            Self::Increment => "++",
            Self::Decrement => "--",
            Self::NotEqual => "!=",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Arrow => "=>",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Equal => "=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::Bang => "!",
            Self::Semicolon => ";",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Dot => ".",
            Self::Dollar => "$",
            Self::Comma => ",",
            Self::Colon => ":",
            Self::Hash => "#",
        };
        write!(f, "'{symbol}'")
    }
}

/// A source location, both components 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// The source line.
    pub line:   usize,
    /// The character column within the line.
    pub column: usize,
}

/// A token paired with the position of its first character.
pub type SpannedToken = (Token, Position);

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number and the byte offset where that line starts,
/// so columns can be derived from a token's span.
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line:       usize,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:       1,
               line_start: 0, }
    }
}

/// The raw failure reported by a token callback, before positions are known.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LexFailure {
    /// No token matches the input at this point.
    #[default]
    InvalidCharacter,
    /// A `"` with no closing quote.
    UnterminatedString,
    /// A `?-` with no closing `-?`.
    UnterminatedComment,
    /// An integer literal outside the `i64` range.
    InvalidNumber,
}

/// Parses a floating-point literal from the current token slice.
///
/// # Parameters
/// - `lex`: Reference to the Logos lexer at the current token.
///
/// # Returns
/// - `Some(f64)`: The parsed floating-point value if successful.
/// - `None`: If the token slice is not a valid float.
fn parse_float(lex: &Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Parses an integer literal from the current token slice.
///
/// # Errors
/// [`LexFailure::InvalidNumber`] when the digits do not fit an `i64`.
fn parse_integer(lex: &Lexer<Token>) -> Result<i64, LexFailure> {
    lex.slice().parse().map_err(|_| LexFailure::InvalidNumber)
}

/// Scans the body of a text literal after its opening quote.
///
/// Recognized escapes are `\n`, `\t`, `\"` and `\\`; any other escaped
/// character stands for itself. Literals may span lines.
///
/// # Errors
/// [`LexFailure::UnterminatedString`] if the input ends before the closing
/// quote.
fn lex_string(lex: &mut Lexer<Token>) -> Result<String, LexFailure> {
    let base = lex.span().end;
    let remainder = lex.remainder();
    let mut text = String::new();
    let mut chars = remainder.char_indices();

    while let Some((offset, c)) = chars.next() {
        match c {
            '"' => {
                lex.bump(offset + 1);
                return Ok(text);
            },
            '\\' => {
                let Some((_, escaped)) = chars.next() else {
                    break;
                };
                text.push(match escaped {
                              'n' => '\n',
                              't' => '\t',
                              other => other,
                          });
                if escaped == '\n' {
                    lex.extras.line += 1;
                    lex.extras.line_start = base + offset + 2;
                }
            },
            '\n' => {
                lex.extras.line += 1;
                lex.extras.line_start = base + offset + 1;
                text.push(c);
            },
            _ => text.push(c),
        }
    }

    Err(LexFailure::UnterminatedString)
}

/// Skips a block comment up to and including the first `-?`.
///
/// # Errors
/// [`LexFailure::UnterminatedComment`] if no `-?` follows.
fn skip_block_comment(lex: &mut Lexer<Token>) -> Result<Skip, LexFailure> {
    let base = lex.span().end;
    let remainder = lex.remainder();
    let Some(end) = remainder.find("-?") else {
        return Err(LexFailure::UnterminatedComment);
    };

    let body = &remainder[..end];
    lex.extras.line += body.matches('\n').count();
    if let Some(last) = body.rfind('\n') {
        lex.extras.line_start = base + last + 1;
    }
    lex.bump(end + 2);

    Ok(Skip)
}

/// Converts source text into a token stream terminated by [`Token::Eof`].
///
/// # Parameters
/// - `source`: The program text.
///
/// # Returns
/// Every token with the line and column of its first character.
///
/// # Errors
/// Returns the first [`LexError`] encountered: an unterminated text literal or
/// block comment, an integer literal that does not fit, or a character that
/// starts no token.
///
/// # Example
/// ```
/// use puffing::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("let x as 1.5;").unwrap();
/// let kinds: Vec<Token> = tokens.into_iter().map(|(token, _)| token).collect();
/// assert_eq!(kinds,
///            vec![Token::Let,
///                 Token::Identifier("x".to_string()),
///                 Token::As,
///                 Token::Float(1.5),
///                 Token::Semicolon,
///                 Token::Eof]);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, LexError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let position = position_of(source, &lexer.extras, span.start);
        match result {
            Ok(token) => tokens.push((token, position)),
            Err(failure) => {
                let Position { line, column } = position;
                return Err(match failure {
                               LexFailure::InvalidCharacter => {
                                   let character = source[span.start..].chars().next().unwrap_or('\0');
                                   LexError::InvalidCharacter { character,
                                                                line,
                                                                column }
                               },
                               LexFailure::UnterminatedString => LexError::UnterminatedString { line, column },
                               LexFailure::UnterminatedComment => LexError::UnterminatedComment { line, column },
                               LexFailure::InvalidNumber => LexError::InvalidNumber { literal: lexer.slice().to_string(),
                                                                                      line,
                                                                                      column },
                           });
            },
        }
    }

    let end = position_of(source, &lexer.extras, source.len());
    tokens.push((Token::Eof, end));

    Ok(tokens)
}

/// Computes the position of a byte offset on the lexer's current line.
///
/// Tokens that span lines (text literals) have already advanced the line
/// bookkeeping when the token is returned, so their start is located by
/// scanning back from the offset instead.
fn position_of(source: &str, extras: &LexerExtras, offset: usize) -> Position {
    if offset >= extras.line_start {
        let column = source[extras.line_start..offset].chars().count() + 1;
        return Position { line: extras.line,
                          column };
    }

    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    Position { line,
               column: before[line_start..].chars().count() + 1 }
}
