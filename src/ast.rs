use std::{fmt, rc::Rc};

/// A sequence of statements, such as a program or a braced body.
pub type Block = Vec<Stmt>;

/// Represents a literal value in the language.
///
/// `LiteralValue` covers the raw constants that can appear directly in source
/// code. Container literals are expressions of their own because their
/// elements are evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A 64-bit signed integer literal.
    Integer(i64),
    /// A 64-bit floating-point literal.
    Float(f64),
    /// A boolean literal value: `true` or `false`.
    Bool(bool),
    /// A text literal with escapes resolved.
    Text(String),
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// The target of a cast or a typed `input(...)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CastType {
    /// `int`
    Int,
    /// `float`
    Float,
    /// `str`
    Str,
    /// `bool`
    Bool,
}

impl CastType {
    /// The keyword spelling of the type.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bool => "bool",
        }
    }
}

/// An abstract syntax tree (AST) node representing an expression.
///
/// Each variant models a distinct syntactic construct and records the line it
/// started on so runtime errors can point back at the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (number, text, boolean).
    Literal {
        /// The constant value.
        value: LiteralValue,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// Array literal `[a, b, c]`.
    ArrayLiteral {
        /// Elements of the array.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// Set literal `#{a, b, c}`.
    SetLiteral {
        /// Elements of the set.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// Map literal `{k: v, ...}`.
    MapLiteral {
        /// Key and value expressions in source order.
        entries: Vec<(Self, Self)>,
        /// Line number in the source code.
        line:    usize,
    },
    /// One indexing step `container[index]`; chains nest.
    Index {
        /// The value being indexed.
        container: Box<Self>,
        /// The index or key.
        index:     Box<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// A unary operation (negation or logical not).
    UnaryOp {
        /// The unary operator to apply.
        op:   UnaryOperator,
        /// The operand expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// A binary operation.
    BinaryOp {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `(type)expr` or `expr(type)`.
    Cast {
        /// The conversion target.
        target: CastType,
        /// The value being converted.
        expr:   Box<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// `expr.Nf`, a number rendered with a fixed number of decimals.
    Format {
        /// The number being formatted.
        expr:      Box<Self>,
        /// Digits after the decimal point.
        precision: usize,
        /// Line number in the source code.
        line:      usize,
    },
    /// Call of a function, lambda, builtin, or library native.
    Call {
        /// The called expression, usually a bare name.
        callee:    Box<Self>,
        /// Arguments to the call.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `lamb (params) => body`.
    Lambda {
        /// The shared declaration, also held by the runtime value.
        decl: Rc<LambdaDecl>,
        /// Line number in the source code.
        line: usize,
    },
    /// `range(...)`, an inclusive integer sequence.
    Range {
        /// First element.
        start: Box<Self>,
        /// Last element, included when the step reaches it.
        stop:  Box<Self>,
        /// Distance between elements, `1` when absent.
        step:  Option<Box<Self>>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `input()` or `input(type)`.
    Input {
        /// Conversion applied to the line read, text when absent.
        target: Option<CastType>,
        /// Line number in the source code.
        line:   usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    /// ## Example
    /// ```
    /// use puffing::ast::Expr;
    ///
    /// let expr = Expr::Variable { name: "x".to_string(),
    ///                             line: 5, };
    ///
    /// assert_eq!(expr.line_number(), 5);
    /// ```
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::Variable { line, .. }
            | Self::ArrayLiteral { line, .. }
            | Self::SetLiteral { line, .. }
            | Self::MapLiteral { line, .. }
            | Self::Index { line, .. }
            | Self::UnaryOp { line, .. }
            | Self::BinaryOp { line, .. }
            | Self::Cast { line, .. }
            | Self::Format { line, .. }
            | Self::Call { line, .. }
            | Self::Lambda { line, .. }
            | Self::Range { line, .. }
            | Self::Input { line, .. } => *line,
        }
    }
}

/// A named function declared with `fun`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// The name of the function.
    pub name:   String,
    /// The parameter names, all distinct.
    pub params: Vec<String>,
    /// The statements executed when the function is called.
    pub body:   Block,
    /// Line number in the source code.
    pub line:   usize,
}

/// An anonymous function declared with `lamb`.
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaDecl {
    /// The parameter names, all distinct.
    pub params: Vec<String>,
    /// The lambda body.
    pub body:   LambdaBody,
    /// Line number in the source code.
    pub line:   usize,
}

/// The two shapes a lambda body can take.
#[derive(Debug, Clone, PartialEq)]
pub enum LambdaBody {
    /// `=> expr`: the expression's value is the result.
    Expression(Box<Expr>),
    /// `=> { ... }`: ordinary statements with `return`.
    Block(Block),
}

/// Represents a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `let name as value;` or `lock name as value;`.
    Let {
        /// The name being declared.
        name:     String,
        /// The initial value.
        value:    Expr,
        /// Whether the binding was declared with `lock`.
        constant: bool,
        /// Line number in the source code.
        line:     usize,
    },
    /// `let [a, b] as value;`.
    Destructure {
        /// The names in pattern order.
        names:    Vec<String>,
        /// The value being unpacked.
        value:    Expr,
        /// Whether the bindings were declared with `lock`.
        constant: bool,
        /// Line number in the source code.
        line:     usize,
    },
    /// `name as value;`.
    Assign {
        /// The name of the variable.
        name:  String,
        /// The value which is being assigned.
        value: Expr,
        /// Line number in the source code.
        line:  usize,
    },
    /// `name[i]...[n] as value;`.
    IndexAssign {
        /// The root variable.
        target:  String,
        /// The index chain, outermost first.
        indices: Vec<Expr>,
        /// The value stored at the end of the chain.
        value:   Expr,
        /// Line number in the source code.
        line:    usize,
    },
    /// `+e name;` and the other operator-prefixed updates.
    CompoundAssign {
        /// The name of the variable.
        name:  String,
        /// The binary operation applied to the current value.
        op:    BinaryOperator,
        /// The right operand.
        value: Expr,
        /// Line number in the source code.
        line:  usize,
    },
    /// `name++;`, `++name;`, `name--;` or `--name;`.
    Increment {
        /// The name of the variable.
        name:   String,
        /// `+1` or `-1`.
        delta:  i64,
        /// Whether the statement yields the updated value.
        prefix: bool,
        /// Line number in the source code.
        line:   usize,
    },
    /// `print(a, b, ...);`.
    Print {
        /// The values printed in order, with no separator.
        arguments: Vec<Expr>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `if c { } elif c { } else { }`.
    If {
        /// Conditions with their bodies, the `if` first then each `elif`.
        branches:    Vec<(Expr, Block)>,
        /// The `else` body.
        else_branch: Option<Block>,
        /// Line number in the source code.
        line:        usize,
    },
    /// `for name in iterable { }`.
    For {
        /// The loop variable.
        var:      String,
        /// The value iterated over.
        iterable: Expr,
        /// The loop body.
        body:     Block,
        /// Line number in the source code.
        line:     usize,
    },
    /// `while condition { }`.
    While {
        /// Checked before each iteration.
        condition: Expr,
        /// The loop body.
        body:      Block,
        /// Line number in the source code.
        line:      usize,
    },
    /// `do { } while condition;`.
    DoWhile {
        /// The loop body, run at least once.
        body:      Block,
        /// Checked after each iteration.
        condition: Expr,
        /// Line number in the source code.
        line:      usize,
    },
    /// `break;`
    Break {
        /// Line number in the source code.
        line: usize,
    },
    /// `continue;`
    Continue {
        /// Line number in the source code.
        line: usize,
    },
    /// `return;` or `return value;`.
    Return {
        /// The returned value, none when absent.
        value: Option<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `fun name(params) { }`.
    FunctionDef {
        /// The shared declaration, also held by the runtime value.
        decl: Rc<FunctionDecl>,
        /// Line number in the source code.
        line: usize,
    },
    /// `lib $path;`.
    Import {
        /// The dotted library path, such as `math.main`.
        path: String,
        /// Line number in the source code.
        line: usize,
    },
    /// A standalone expression evaluated for its result.
    Expression {
        /// The expression to evaluate.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
}

impl Stmt {
    /// Gets the line number from `self`.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Let { line, .. }
            | Self::Destructure { line, .. }
            | Self::Assign { line, .. }
            | Self::IndexAssign { line, .. }
            | Self::CompoundAssign { line, .. }
            | Self::Increment { line, .. }
            | Self::Print { line, .. }
            | Self::If { line, .. }
            | Self::For { line, .. }
            | Self::While { line, .. }
            | Self::DoWhile { line, .. }
            | Self::Break { line }
            | Self::Continue { line }
            | Self::Return { line, .. }
            | Self::FunctionDef { line, .. }
            | Self::Import { line, .. }
            | Self::Expression { line, .. } => *line,
        }
    }
}

/// Represents a binary operator.
///
/// Binary operators include arithmetic, comparisons and the two logical
/// connectives.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition or concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Floored modulo (`%`)
    Mod,
    /// Exponentiation (`**`)
    Pow,
    /// Equal to (`=`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Logical and (`and`)
    And,
    /// Logical or (`or`)
    Or,
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (e.g. `-x`).
    Negate,
    /// Logical NOT (e.g. `!x`).
    Not,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or,
            Pow, Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Pow => "**",
            Equal => "=",
            NotEqual => "!=",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            And => "and",
            Or => "or",
        };
        write!(f, "{operator}")
    }
}
