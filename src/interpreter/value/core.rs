use std::{
    cell::RefCell,
    cmp::Ordering,
    fmt::{self, Display},
    rc::Rc,
};

use indexmap::{IndexMap, IndexSet};

use crate::{
    ast::{FunctionDecl, LambdaDecl, LiteralValue},
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, library::NativeFunction, value::key::Key},
    util::num::{format_float, i64_to_f64},
};

/// Shared handle to an array. Every alias sees in-place mutation.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;
/// Shared handle to a map, which keeps insertion order.
pub type MapRef = Rc<RefCell<IndexMap<Key, Value>>>;
/// Shared handle to a set, which keeps insertion order.
pub type SetRef = Rc<RefCell<IndexSet<Key>>>;

/// Represents a runtime value in the interpreter.
///
/// Scalars are copied on assignment. Arrays, maps and sets are reference
/// counted, so two bindings may alias one container and see each other's
/// mutations.
#[derive(Debug, Clone)]
pub enum Value {
    /// The absence of a value, printed as `none`.
    None,
    /// A 64-bit signed integer.
    Integer(i64),
    /// A double precision floating-point number.
    Float(f64),
    /// A boolean value (`true` or `false`).
    Bool(bool),
    /// A text value.
    Text(String),
    /// An ordered array, indexed from 1 in source code.
    Array(ArrayRef),
    /// A map from hashable keys to values.
    Map(MapRef),
    /// A set of hashable elements.
    Set(SetRef),
    /// A function declared with `fun`.
    Function(Rc<FunctionDecl>),
    /// An anonymous function declared with `lamb`.
    Lambda(Rc<LambdaDecl>),
    /// A function provided by an imported library.
    Native(&'static NativeFunction),
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(Rc::new(RefCell::new(v)))
    }
}

impl From<IndexMap<Key, Self>> for Value {
    fn from(v: IndexMap<Key, Self>) -> Self {
        Self::Map(Rc::new(RefCell::new(v)))
    }
}

impl From<IndexSet<Key>> for Value {
    fn from(v: IndexSet<Key>) -> Self {
        Self::Set(Rc::new(RefCell::new(v)))
    }
}

impl From<&LiteralValue> for Value {
    fn from(lit: &LiteralValue) -> Self {
        match lit {
            LiteralValue::Integer(i) => (*i).into(),
            LiteralValue::Float(f) => (*f).into(),
            LiteralValue::Bool(b) => (*b).into(),
            LiteralValue::Text(s) => s.as_str().into(),
        }
    }
}

impl Value {
    /// The name of the value's type as it appears in error messages.
    ///
    /// # Example
    /// ```
    /// use puffing::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Integer(1).type_name(), "int");
    /// assert_eq!(Value::from("hi").type_name(), "str");
    /// ```
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Integer(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Text(_) => "str",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::Set(_) => "set",
            Self::Function(_) => "function",
            Self::Lambda(_) => "lambda",
            Self::Native(_) => "native function",
        }
    }

    /// Evaluates the value in a boolean context.
    ///
    /// `none`, `false`, zero and empty text or containers are falsy.
    /// Everything else is truthy.
    ///
    /// # Example
    /// ```
    /// use puffing::interpreter::value::core::Value;
    ///
    /// assert!(!Value::Integer(0).is_truthy());
    /// assert!(!Value::from(vec![]).is_truthy());
    /// assert!(Value::from("0").is_truthy());
    /// ```
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(b) => *b,
            Self::Integer(n) => *n != 0,
            Self::Float(f) => *f != 0.0,
            Self::Text(s) => !s.is_empty(),
            Self::Array(a) => !a.borrow().is_empty(),
            Self::Map(m) => !m.borrow().is_empty(),
            Self::Set(s) => !s.borrow().is_empty(),
            Self::Function(_) | Self::Lambda(_) | Self::Native(_) => true,
        }
    }

    /// Whether the value is an integer or a float.
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Float(_))
    }

    /// Whether the value can be called.
    #[must_use]
    pub const fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_) | Self::Lambda(_) | Self::Native(_))
    }

    /// Converts the value to an `f64`, or returns an error if not numeric.
    ///
    /// # Parameters
    /// - `line`: Source code line number for error reporting.
    ///
    /// # Returns
    /// - `Ok(f64)`: If value is an integer or a float.
    /// - `Err(RuntimeError::TypeMismatch)`: Otherwise.
    ///
    /// # Example
    /// ```
    /// use puffing::interpreter::value::core::Value;
    ///
    /// let x = Value::Integer(10);
    /// assert_eq!(x.as_number(42).unwrap(), 10.0);
    /// assert!(Value::Bool(true).as_number(42).is_err());
    /// ```
    pub fn as_number(&self, line: usize) -> EvalResult<f64> {
        match self {
            Self::Integer(n) => Ok(i64_to_f64(*n)),
            Self::Float(f) => Ok(*f),
            other => Err(RuntimeError::TypeMismatch { details: format!("expected a number, got {}",
                                                                       other.type_name()),
                                                      line }),
        }
    }

    /// Orders two values for `<`, `>`, `<=`, `>=`, `sort`, `min` and `max`.
    ///
    /// Numbers compare by value across int and float, text compares
    /// lexicographically by character, and arrays compare element by element.
    ///
    /// # Returns
    /// `None` when the pair has no ordering, including any comparison with
    /// NaN.
    ///
    /// # Example
    /// ```
    /// use std::cmp::Ordering;
    ///
    /// use puffing::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Integer(2).compare(&Value::Float(2.5)), Some(Ordering::Less));
    /// assert_eq!(Value::from("b").compare(&Value::from("a")), Some(Ordering::Greater));
    /// assert_eq!(Value::Integer(1).compare(&Value::from("1")), None);
    /// ```
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Float(b)) => i64_to_f64(*a).partial_cmp(b),
            (Self::Float(a), Self::Integer(b)) => a.partial_cmp(&i64_to_f64(*b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Array(a), Self::Array(b)) => {
                if Rc::ptr_eq(a, b) {
                    return Some(Ordering::Equal);
                }
                let (a, b) = (a.borrow(), b.borrow());
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.compare(y)? {
                        Ordering::Equal => {},
                        ordering => return Some(ordering),
                    }
                }
                Some(a.len().cmp(&b.len()))
            },
            _ => None,
        }
    }

    /// Builds a new array value from an iterator of values.
    pub fn array_from<I>(items: I) -> Self
        where I: IntoIterator<Item = Self>
    {
        items.into_iter().collect::<Vec<_>>().into()
    }
}

impl PartialEq for Value {
    /// Loose equality used by `=` and `!=`.
    ///
    /// Numbers compare across int and float, containers compare by content,
    /// and values of different kinds are unequal.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Integer(a), Self::Float(b)) | (Self::Float(b), Self::Integer(a)) => {
                i64_to_f64(*a) == *b
            },
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Self::Map(a), Self::Map(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.iter().all(|(k, v)| b.get(k).is_some_and(|w| v == w))
            },
            (Self::Set(a), Self::Set(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.iter().all(|k| b.contains(k))
            },
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Lambda(a), Self::Lambda(b)) => Rc::ptr_eq(a, b),
            (Self::Native(a), Self::Native(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl Display for Value {
    /// Text prints raw at the top level and quoted inside containers. A
    /// container that contains itself prints as `[...]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(self, f, false, &mut Vec::new())
    }
}

/// Writes `value`, tracking the containers currently being printed.
fn write_value(value: &Value,
               f: &mut fmt::Formatter<'_>,
               nested: bool,
               active: &mut Vec<*const ()>)
               -> fmt::Result {
    match value {
        Value::None => write!(f, "None"),
        Value::Integer(n) => write!(f, "{n}"),
        Value::Float(x) => write!(f, "{}", format_float(*x)),
        Value::Bool(true) => write!(f, "True"),
        Value::Bool(false) => write!(f, "False"),
        Value::Text(s) if nested => write!(f, "\"{s}\""),
        Value::Text(s) => write!(f, "{s}"),
        Value::Array(a) => {
            let id = Rc::as_ptr(a).cast::<()>();
            if active.contains(&id) {
                return write!(f, "[...]");
            }
            active.push(id);
            write!(f, "[")?;
            for (index, item) in a.borrow().iter().enumerate() {
                if index > 0 {
                    write!(f, ", ")?;
                }
                write_value(item, f, true, active)?;
            }
            active.pop();
            write!(f, "]")
        },
        Value::Map(m) => {
            let id = Rc::as_ptr(m).cast::<()>();
            if active.contains(&id) {
                return write!(f, "{{...}}");
            }
            active.push(id);
            write!(f, "{{")?;
            for (index, (key, item)) in m.borrow().iter().enumerate() {
                if index > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}: ")?;
                write_value(item, f, true, active)?;
            }
            active.pop();
            write!(f, "}}")
        },
        Value::Set(s) => {
            let set = s.borrow();
            let mut elems: Vec<&Key> = set.iter().collect();
            elems.sort();

            write!(f, "#{{")?;
            for (index, key) in elems.iter().enumerate() {
                if index > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}")?;
            }
            write!(f, "}}")
        },
        Value::Function(decl) => write!(f, "<function {}>", decl.name),
        Value::Lambda(decl) => write!(f, "<lambda ({} params)>", decl.params.len()),
        Value::Native(native) => write!(f, "<native function {}>", native.name),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn nested_text_is_quoted() {
        let value = Value::array_from([Value::Integer(1), "a".into(), Value::Float(2.0)]);
        assert_eq!(value.to_string(), r#"[1, "a", 2.0]"#);
        assert_eq!(Value::from("a").to_string(), "a");
    }

    #[test]
    fn sets_print_sorted() {
        let set: IndexSet<Key> = [Key::Integer(3), Key::Text("x".into()), Key::Integer(1)].into_iter()
                                                                                            .collect();
        assert_eq!(Value::from(set).to_string(), r#"#{1, 3, "x"}"#);
    }

    #[test]
    fn maps_keep_insertion_order() {
        let mut map = IndexMap::new();
        map.insert(Key::Text("b".into()), Value::Integer(1));
        map.insert(Key::Text("a".into()), Value::None);
        assert_eq!(Value::from(map).to_string(), r#"{"b": 1, "a": None}"#);
    }

    #[test]
    fn scalars_print_like_the_language() {
        let items = Value::array_from([Value::Bool(true), Value::None, Value::from("a\nb \"q\"")]);
        assert_eq!(items.to_string(), "[True, None, \"a\nb \"q\"\"]");
        assert_eq!(Value::Bool(false).to_string(), "False");
        assert_eq!(Value::from("raw \"text\"").to_string(), "raw \"text\"");
    }

    #[test]
    fn self_containing_array_terminates() {
        let value = Value::array_from([Value::Integer(1)]);
        if let Value::Array(items) = &value {
            items.borrow_mut().push(value.clone());
        }
        assert_eq!(value.to_string(), "[1, [...]]");
    }

    #[test]
    fn equality_is_numeric_across_kinds() {
        assert_eq!(Value::Integer(2), Value::Float(2.0));
        assert_ne!(Value::Integer(1), Value::Bool(true));
        assert_eq!(Value::array_from([Value::Integer(1), Value::Integer(2)]),
                   Value::array_from([Value::Integer(1), Value::Float(2.0)]));
    }
}
