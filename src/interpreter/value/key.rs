use std::{
    cmp::Ordering,
    fmt::{self, Display},
    hash::{Hash, Hasher},
};

use ordered_float::OrderedFloat;

use crate::{
    interpreter::value::core::Value,
    util::num::{f64_as_exact_i64, i64_to_f64},
};

/// A hashable primitive used as a map key or a set element.
///
/// Floats with an integral value are stored as integers, so `2.0` and `2`
/// name the same key. Booleans are their own kind and never collide with
/// `0` or `1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    /// The absence of a value.
    None,
    /// `true` or `false`.
    Bool(bool),
    /// A whole number.
    Integer(i64),
    /// A number with a fractional part, or a non-finite one.
    Float(OrderedFloat<f64>),
    /// A text value.
    Text(String),
}

impl Key {
    /// Builds a key from a runtime value.
    ///
    /// # Returns
    /// `None` when the value is a container or callable, which cannot be
    /// hashed.
    ///
    /// # Example
    /// ```
    /// use puffing::interpreter::value::{core::Value, key::Key};
    ///
    /// assert_eq!(Key::from_value(&Value::Float(2.0)), Some(Key::Integer(2)));
    /// assert_eq!(Key::from_value(&Value::from(vec![])), None);
    /// ```
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::None => Some(Self::None),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Integer(n) => Some(Self::Integer(*n)),
            Value::Float(f) => Some(Self::from_float(*f)),
            Value::Text(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// Normalizes a float into a key.
    #[must_use]
    pub fn from_float(value: f64) -> Self {
        f64_as_exact_i64(value).map_or(Self::Float(OrderedFloat(value)), Self::Integer)
    }

    /// Converts the key back into a runtime value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::None => Value::None,
            Self::Bool(b) => Value::Bool(*b),
            Self::Integer(n) => Value::Integer(*n),
            Self::Float(f) => Value::Float(f.into_inner()),
            Self::Text(s) => Value::Text(s.clone()),
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Bool(_) => 1,
            Self::Integer(_) | Self::Float(_) => 2,
            Self::Text(_) => 3,
        }
    }
}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::None => state.write_u8(0),
            Self::Bool(b) => {
                state.write_u8(1);
                b.hash(state);
            },
            Self::Integer(n) => {
                state.write_u8(2);
                n.hash(state);
            },
            Self::Float(f) => {
                state.write_u8(3);
                f.hash(state);
            },
            Self::Text(s) => {
                state.write_u8(4);
                s.hash(state);
            },
        }
    }
}

impl Ord for Key {
    /// Orders keys for printing sets: none, then booleans, then numbers by
    /// value, then text.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.cmp(b),
            // Ties between an integer and a float that round to the same f64
            // put the integer first to stay consistent with `Eq`.
            (Self::Integer(a), Self::Float(b)) => {
                OrderedFloat(i64_to_f64(*a)).cmp(b).then(Ordering::Less)
            },
            (Self::Float(a), Self::Integer(b)) => {
                a.cmp(&OrderedFloat(i64_to_f64(*b))).then(Ordering::Greater)
            },
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Key {
    /// Keys print the way values print inside a container, so text is
    /// quoted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "\"{s}\""),
            other => write!(f, "{}", other.to_value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn integral_floats_share_integer_keys() {
        let mut seen = HashSet::new();
        seen.insert(Key::from_value(&Value::Integer(3)).unwrap());
        assert!(!seen.insert(Key::from_value(&Value::Float(3.0)).unwrap()));
        assert!(seen.insert(Key::from_value(&Value::Float(3.5)).unwrap()));
    }

    #[test]
    fn booleans_do_not_collide_with_numbers() {
        assert_ne!(Key::Bool(true), Key::Integer(1));
    }

    #[test]
    fn ordering_groups_kinds() {
        let mut keys = vec![Key::Text("a".into()),
                            Key::Float(OrderedFloat(1.5)),
                            Key::Integer(2),
                            Key::Bool(false),
                            Key::None,
                            Key::Integer(1)];
        keys.sort();
        assert_eq!(keys,
                   vec![Key::None,
                        Key::Bool(false),
                        Key::Integer(1),
                        Key::Float(OrderedFloat(1.5)),
                        Key::Integer(2),
                        Key::Text("a".into())]);
    }
}
