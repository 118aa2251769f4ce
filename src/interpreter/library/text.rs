use crate::{
    interpreter::{
        evaluator::{
            core::EvalResult,
            function::core::{Arity, exact_args, integer, wrong_argument},
        },
        library::NativeFunction,
        value::core::Value,
    },
    util::num::usize_to_i64,
};

pub(super) static NATIVES: &[NativeFunction] = natives! {
    "upper"       => Arity::Exact(1), upper;
    "lower"       => Arity::Exact(1), lower;
    "capitalize"  => Arity::Exact(1), capitalize;
    "title"       => Arity::Exact(1), title;
    "strip"       => Arity::Exact(1), strip;
    "lstrip"      => Arity::Exact(1), lstrip;
    "rstrip"      => Arity::Exact(1), rstrip;
    "split"       => Arity::OneOf(&[1, 2]), split;
    "replace"     => Arity::Exact(3), replace;
    "startswith"  => Arity::Exact(2), startswith;
    "endswith"    => Arity::Exact(2), endswith;
    "find"        => Arity::Exact(2), find;
    "count"       => Arity::Exact(2), count;
    "repeat"      => Arity::Exact(2), repeat;
    "reverse_str" => Arity::Exact(1), reverse_str;
    "is_alpha"    => Arity::Exact(1), is_alpha;
    "is_digit"    => Arity::Exact(1), is_digit;
    "is_alnum"    => Arity::Exact(1), is_alnum;
    "is_lower"    => Arity::Exact(1), is_lower;
    "is_upper"    => Arity::Exact(1), is_upper;
    "is_space"    => Arity::Exact(1), is_space;
    "substring"   => Arity::OneOf(&[2, 3]), substring;
    "char_at"     => Arity::Exact(2), char_at;
    "pad_left"    => Arity::OneOf(&[2, 3]), pad_left;
    "pad_right"   => Arity::OneOf(&[2, 3]), pad_right;
    "trim"        => Arity::OneOf(&[1, 2]), trim;
};

/// Longest text, in bytes, that `repeat` and the pad natives will build.
const MAX_BUILT_BYTES: usize = 1 << 30;

/// Byte length of `times` copies of a `unit`-byte piece.
///
/// # Errors
/// `InvalidArgument` when the result would be longer than
/// [`MAX_BUILT_BYTES`].
fn built_length(function: &str, unit: usize, times: usize, line: usize) -> EvalResult<usize> {
    unit.checked_mul(times)
        .filter(|bytes| *bytes <= MAX_BUILT_BYTES)
        .ok_or_else(|| {
            wrong_argument(function,
                           format!("result would be longer than {MAX_BUILT_BYTES} bytes"),
                           line)
        })
}

/// The text a native works on.
///
/// The subject of every native may be any value and is taken in its printed
/// form, so `upper(12)` is `"12"`.
fn subject(value: &Value) -> String {
    match value {
        Value::Text(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Borrows a text argument other than the subject.
fn text<'a>(function: &str, value: &'a Value, line: usize) -> EvalResult<&'a str> {
    match value {
        Value::Text(s) => Ok(s),
        other => Err(wrong_argument(function,
                                    format!("expected a str, got {}", other.type_name()),
                                    line)),
    }
}

/// Reads an optional single-character fill argument, a space when absent.
fn fill_char(function: &str, value: Option<&Value>, line: usize) -> EvalResult<char> {
    let Some(value) = value else {
        return Ok(' ');
    };
    let mut chars = text(function, value, line)?.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(wrong_argument(function, "the fill must be exactly one character", line)),
    }
}

/// Defines a one-argument native mapping the subject to new text.
macro_rules! text_native {
    ($($fname:ident => $transform:expr),* $(,)?) => {
        $(
            fn $fname(args: &[Value], line: usize) -> EvalResult<Value> {
                let [s] = exact_args::<1>(stringify!($fname), args, line)?;
                let transform: fn(&str) -> String = $transform;
                Ok(Value::Text(transform(&subject(s))))
            }
        )*
    };
}

text_native! {
    upper => str::to_uppercase,
    lower => str::to_lowercase,
    capitalize => |s| {
        let mut chars = s.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
        })
    },
    title => |s| {
        let mut after_letter = false;
        let mut titled = String::with_capacity(s.len());
        for c in s.chars() {
            if after_letter {
                titled.extend(c.to_lowercase());
            } else {
                titled.extend(c.to_uppercase());
            }
            after_letter = c.is_alphabetic();
        }
        titled
    },
    strip => |s| s.trim().to_string(),
    lstrip => |s| s.trim_start().to_string(),
    rstrip => |s| s.trim_end().to_string(),
    reverse_str => |s| s.chars().rev().collect(),
}

/// Defines a one-argument predicate native.
///
/// The empty text fails every predicate.
macro_rules! predicate_native {
    ($($fname:ident => $test:expr),* $(,)?) => {
        $(
            fn $fname(args: &[Value], line: usize) -> EvalResult<Value> {
                let [s] = exact_args::<1>(stringify!($fname), args, line)?;
                let test: fn(&str) -> bool = $test;
                let s = subject(s);
                Ok(Value::Bool(!s.is_empty() && test(&s)))
            }
        )*
    };
}

predicate_native! {
    is_alpha => |s| s.chars().all(char::is_alphabetic),
    is_digit => |s| s.chars().all(char::is_numeric),
    is_alnum => |s| s.chars().all(char::is_alphanumeric),
    is_space => |s| s.chars().all(char::is_whitespace),
    is_lower => |s| s.chars().any(char::is_lowercase) && !s.chars().any(char::is_uppercase),
    is_upper => |s| s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase),
}

/// `split(s, sep?)` cuts `s` at every occurrence of `sep`, a single space by
/// default. Adjacent separators produce empty pieces.
fn split(args: &[Value], line: usize) -> EvalResult<Value> {
    let (s, separator) = match args {
        [s] => (subject(s), " "),
        [s, separator] => (subject(s), text("split", separator, line)?),
        _ => return Err(Arity::OneOf(&[1, 2]).mismatch("split", args.len(), line)),
    };
    if separator.is_empty() {
        return Err(wrong_argument("split", "empty separator", line));
    }
    Ok(Value::array_from(s.split(separator).map(Value::from)))
}

/// `replace(s, old, new)` replaces every occurrence of `old`.
fn replace(args: &[Value], line: usize) -> EvalResult<Value> {
    let [s, old, new] = exact_args::<3>("replace", args, line)?;
    let old = text("replace", old, line)?;
    let new = text("replace", new, line)?;
    Ok(Value::Text(subject(s).replace(old, new)))
}

fn startswith(args: &[Value], line: usize) -> EvalResult<Value> {
    let [s, prefix] = exact_args::<2>("startswith", args, line)?;
    Ok(Value::Bool(subject(s).starts_with(text("startswith", prefix, line)?)))
}

fn endswith(args: &[Value], line: usize) -> EvalResult<Value> {
    let [s, suffix] = exact_args::<2>("endswith", args, line)?;
    Ok(Value::Bool(subject(s).ends_with(text("endswith", suffix, line)?)))
}

/// `find(s, sub)` is the zero-based character position of the first `sub`,
/// or `-1`.
///
/// # Example
/// ```
/// use puffing::execute;
///
/// let run = execute(r#"lib $string.main; print(find("héllo", "l"), find("abc", "z"));"#);
/// assert_eq!(run.unwrap().output, "2-1");
/// ```
fn find(args: &[Value], line: usize) -> EvalResult<Value> {
    let [s, sub] = exact_args::<2>("find", args, line)?;
    let s = subject(s);
    let position = s.find(text("find", sub, line)?)
                    .map_or(-1, |byte| usize_to_i64(s[..byte].chars().count()));
    Ok(Value::Integer(position))
}

/// `count(s, sub)` counts non-overlapping occurrences of `sub`.
fn count(args: &[Value], line: usize) -> EvalResult<Value> {
    let [s, sub] = exact_args::<2>("count", args, line)?;
    let found = subject(s).matches(text("count", sub, line)?).count();
    Ok(Value::Integer(usize_to_i64(found)))
}

/// `repeat(s, n)` is `s` repeated `n` times, empty for `n <= 0`.
fn repeat(args: &[Value], line: usize) -> EvalResult<Value> {
    let [s, times] = exact_args::<2>("repeat", args, line)?;
    let times = usize::try_from(integer("repeat", times, line)?).unwrap_or(0);
    let s = subject(s);
    built_length("repeat", s.len(), times, line)?;
    Ok(Value::Text(s.repeat(times)))
}

/// Resolves a zero-based position that may count back from the end,
/// clamped to `0..=length`.
fn clamp_position(position: i64, length: usize) -> usize {
    let length_i64 = usize_to_i64(length);
    let position = if position < 0 { position + length_i64 } else { position };
    usize::try_from(position.clamp(0, length_i64)).unwrap_or(length)
}

/// `substring(s, start, end?)` takes the characters from `start` up to but
/// not including `end`, which defaults to the end of `s`. Negative positions
/// count back from the end and bounds are clamped.
fn substring(args: &[Value], line: usize) -> EvalResult<Value> {
    let (s, start, end) = match args {
        [s, start] => (subject(s), integer("substring", start, line)?, None),
        [s, start, end] => (subject(s),
                            integer("substring", start, line)?,
                            Some(integer("substring", end, line)?)),
        _ => return Err(Arity::OneOf(&[2, 3]).mismatch("substring", args.len(), line)),
    };

    let length = s.chars().count();
    let start = clamp_position(start, length);
    let end = end.map_or(length, |end| clamp_position(end, length));
    let taken: String = s.chars().skip(start).take(end.saturating_sub(start)).collect();
    Ok(Value::Text(taken))
}

/// `char_at(s, i)` is the character at zero-based position `i`, or empty
/// text when `i` is out of range.
fn char_at(args: &[Value], line: usize) -> EvalResult<Value> {
    let [s, position] = exact_args::<2>("char_at", args, line)?;
    let position = integer("char_at", position, line)?;
    let found = usize::try_from(position).ok()
                                         .and_then(|position| subject(s).chars().nth(position))
                                         .map(String::from)
                                         .unwrap_or_default();
    Ok(Value::Text(found))
}

/// Shared body of `pad_left` and `pad_right`.
fn pad(function: &str, args: &[Value], line: usize, left: bool) -> EvalResult<Value> {
    let (s, width, fill) = match args {
        [s, width] => (subject(s), integer(function, width, line)?, None),
        [s, width, fill] => (subject(s), integer(function, width, line)?, Some(fill)),
        _ => return Err(Arity::OneOf(&[2, 3]).mismatch(function, args.len(), line)),
    };
    let fill = fill_char(function, fill, line)?;

    let missing = usize::try_from(width).unwrap_or(0).saturating_sub(s.chars().count());
    built_length(function, fill.len_utf8(), missing, line)?;
    let padding: String = std::iter::repeat_n(fill, missing).collect();
    Ok(Value::Text(if left { padding + &s } else { s + &padding }))
}

/// `pad_left(s, width, fill?)` right-aligns `s` in `width` characters.
fn pad_left(args: &[Value], line: usize) -> EvalResult<Value> {
    pad("pad_left", args, line, true)
}

/// `pad_right(s, width, fill?)` left-aligns `s` in `width` characters.
fn pad_right(args: &[Value], line: usize) -> EvalResult<Value> {
    pad("pad_right", args, line, false)
}

/// `trim(s, chars?)` strips whitespace, or any of `chars`, from both ends.
fn trim(args: &[Value], line: usize) -> EvalResult<Value> {
    match args {
        [s] => Ok(Value::Text(subject(s).trim().to_string())),
        [s, chars] => {
            let chars = text("trim", chars, line)?;
            Ok(Value::Text(subject(s).trim_matches(|c: char| chars.contains(c)).to_string()))
        },
        _ => Err(Arity::OneOf(&[1, 2]).mismatch("trim", args.len(), line)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{error::RuntimeError, execute};

    fn text_of(value: EvalResult<Value>) -> String {
        match value.unwrap() {
            Value::Text(s) => s,
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn oversized_results_are_rejected() {
        let err = repeat(&["ab".into(), Value::Integer(i64::MAX)], 4).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidArgument { line: 4, .. }));
        assert_eq!(text_of(repeat(&["".into(), Value::Integer(i64::MAX)], 1)), "");

        let err = pad_left(&["x".into(), Value::Integer(i64::MAX)], 2).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidArgument { line: 2, .. }));
        let err = pad_right(&["x".into(), Value::Integer(i64::MAX), "*".into()], 3).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidArgument { line: 3, .. }));

        let err = execute("lib $string.main;
let s as repeat(\"ab\", 9223372036854775807);")
                      .unwrap_err();
        assert!(matches!(err, crate::Error::Runtime(RuntimeError::InvalidArgument { line: 2, .. })));
    }

    #[test]
    fn case_changes() {
        assert_eq!(text_of(capitalize(&["hELLO world".into()], 1)), "Hello world");
        assert_eq!(text_of(title(&["they're bill's friends".into()], 1)),
                   "They'Re Bill'S Friends");
        assert_eq!(text_of(upper(&[Value::Integer(12)], 1)), "12");
    }

    #[test]
    fn predicates_reject_empty_text() {
        assert_eq!(is_space(&["".into()], 1).unwrap(), Value::Bool(false));
        assert_eq!(is_lower(&["abc1".into()], 1).unwrap(), Value::Bool(true));
        assert_eq!(is_upper(&["123".into()], 1).unwrap(), Value::Bool(false));
        assert_eq!(is_digit(&["042".into()], 1).unwrap(), Value::Bool(true));
    }

    #[test]
    fn split_keeps_empty_pieces() {
        let pieces = split(&["a,,b".into(), ",".into()], 1).unwrap();
        assert_eq!(pieces, Value::array_from(["a".into(), "".into(), "b".into()]));
        assert!(split(&["a".into(), "".into()], 1).is_err());
    }

    #[test]
    fn substring_is_zero_based_and_clamped() {
        let s: Value = "puffing".into();
        assert_eq!(text_of(substring(&[s.clone(), Value::Integer(1), Value::Integer(4)], 1)),
                   "uff");
        assert_eq!(text_of(substring(&[s.clone(), Value::Integer(-3)], 1)), "ing");
        assert_eq!(text_of(substring(&[s, Value::Integer(5), Value::Integer(99)], 1)), "ng");
    }

    #[test]
    fn char_at_out_of_range_is_empty() {
        assert_eq!(text_of(char_at(&["abc".into(), Value::Integer(0)], 1)), "a");
        assert_eq!(text_of(char_at(&["abc".into(), Value::Integer(3)], 1)), "");
        assert_eq!(text_of(char_at(&["abc".into(), Value::Integer(-1)], 1)), "");
    }

    #[test]
    fn padding() {
        assert_eq!(text_of(pad_left(&["7".into(), Value::Integer(3), "0".into()], 1)), "007");
        assert_eq!(text_of(pad_right(&["ab".into(), Value::Integer(1)], 1)), "ab");
        let err = pad_left(&["7".into(), Value::Integer(3), "00".into()], 4).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidArgument { line: 4, .. }));
    }

    #[test]
    fn trim_with_custom_characters() {
        assert_eq!(text_of(trim(&["xxhixy".into(), "xy".into()], 1)), "hi");
        assert_eq!(text_of(trim(&["  hi \n".into()], 1)), "hi");
    }

    #[test]
    fn counting_and_repeating() {
        assert_eq!(count(&["banana".into(), "an".into()], 1).unwrap(), Value::Integer(2));
        assert_eq!(text_of(repeat(&["ab".into(), Value::Integer(3)], 1)), "ababab");
        assert_eq!(text_of(repeat(&["ab".into(), Value::Integer(-1)], 1)), "");
    }

    #[test]
    fn library_from_source() {
        let source = r#"
            lib $string.main;
            let words as split("the quick fox");
            print(len(words), upper(words[2]), reverse_str("abc"));
        "#;
        assert_eq!(execute(source).unwrap().output, "3QUICKcba");
    }
}
