use std::f64::consts::{E, PI, TAU};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::EvalResult,
            function::core::{Arity, exact_args, integer, wrong_argument},
        },
        library::NativeFunction,
        value::core::Value,
    },
    util::num::{f64_to_i64_truncated, i64_to_f64},
};

pub(super) static NATIVES: &[NativeFunction] = natives! {
    "sqrt"  => Arity::Exact(1), sqrt;
    "sin"   => Arity::Exact(1), sin;
    "cos"   => Arity::Exact(1), cos;
    "tan"   => Arity::Exact(1), tan;
    "asin"  => Arity::Exact(1), asin;
    "acos"  => Arity::Exact(1), acos;
    "atan"  => Arity::Exact(1), atan;
    "log"   => Arity::OneOf(&[1, 2]), log;
    "log10" => Arity::Exact(1), log10;
    "log2"  => Arity::Exact(1), log2;
    "exp"   => Arity::Exact(1), exp;
    "ceil"  => Arity::Exact(1), ceil;
    "floor" => Arity::Exact(1), floor;
    "abs"   => Arity::Exact(1), abs;
    "round" => Arity::OneOf(&[1, 2]), round;
    "pow"   => Arity::Exact(2), pow;
};

pub(super) static CONSTANTS: &[(&str, f64)] = &[("pi", PI), ("e", E), ("tau", TAU)];

/// Reads a numeric argument as a float.
fn number(function: &str, value: &Value, line: usize) -> EvalResult<f64> {
    match value {
        Value::Integer(n) => Ok(i64_to_f64(*n)),
        Value::Float(f) => Ok(*f),
        other => Err(wrong_argument(function,
                                    format!("expected a number, got {}", other.type_name()),
                                    line)),
    }
}

/// Wraps a float result, rejecting NaN produced from non-NaN input and
/// infinity produced from finite input.
fn checked(function: &str, input: f64, result: f64, line: usize) -> EvalResult<Value> {
    if result.is_nan() && !input.is_nan() {
        return Err(RuntimeError::MathDomain { function: function.to_string(),
                                              line });
    }
    if result.is_infinite() && input.is_finite() {
        return Err(RuntimeError::Overflow { line });
    }
    Ok(Value::Float(result))
}

/// Defines a one-argument native that applies an `f64` method.
///
/// Ints are promoted to floats first, and the result is always a float.
macro_rules! float_native {
    ($($fname:ident => $method:ident),* $(,)?) => {
        $(
            fn $fname(args: &[Value], line: usize) -> EvalResult<Value> {
                let [x] = exact_args::<1>(stringify!($fname), args, line)?;
                let x = number(stringify!($fname), x, line)?;
                checked(stringify!($fname), x, x.$method(), line)
            }
        )*
    };
}

float_native! {
    sin => sin,
    cos => cos,
    tan => tan,
    atan => atan,
    exp => exp,
}

/// Defines a one-argument native that only accepts inputs where `$domain`
/// holds.
macro_rules! bounded_native {
    ($($fname:ident => $method:ident where $domain:expr),* $(,)?) => {
        $(
            fn $fname(args: &[Value], line: usize) -> EvalResult<Value> {
                let [x] = exact_args::<1>(stringify!($fname), args, line)?;
                let x = number(stringify!($fname), x, line)?;
                let in_domain: fn(f64) -> bool = $domain;
                if !in_domain(x) {
                    return Err(RuntimeError::MathDomain { function: stringify!($fname).to_string(),
                                                          line });
                }
                checked(stringify!($fname), x, x.$method(), line)
            }
        )*
    };
}

bounded_native! {
    sqrt => sqrt where |x| x >= 0.0,
    asin => asin where |x| (-1.0..=1.0).contains(&x),
    acos => acos where |x| (-1.0..=1.0).contains(&x),
    log10 => log10 where |x| x > 0.0,
    log2 => log2 where |x| x > 0.0,
}

/// `log(x)` is the natural logarithm, `log(x, base)` the logarithm to
/// `base`.
///
/// # Errors
/// `MathDomain` for a non-positive `x`, or a base that is non-positive or
/// `1`.
fn log(args: &[Value], line: usize) -> EvalResult<Value> {
    let domain = || RuntimeError::MathDomain { function: "log".to_string(),
                                               line };

    let (x, base) = match args {
        [x] => (number("log", x, line)?, None),
        [x, base] => (number("log", x, line)?, Some(number("log", base, line)?)),
        _ => return Err(Arity::OneOf(&[1, 2]).mismatch("log", args.len(), line)),
    };
    if x <= 0.0 {
        return Err(domain());
    }

    match base {
        None => checked("log", x, x.ln(), line),
        Some(base) if base <= 0.0 || base == 1.0 => Err(domain()),
        Some(base) => checked("log", x, x.ln() / base.ln(), line),
    }
}

/// Converts an already rounded float to an int.
fn rounded_to_int(value: f64, line: usize) -> EvalResult<Value> {
    f64_to_i64_truncated(value, RuntimeError::Overflow { line }).map(Value::Integer)
}

/// Smallest int not below `x`.
fn ceil(args: &[Value], line: usize) -> EvalResult<Value> {
    match exact_args::<1>("ceil", args, line)? {
        [Value::Integer(n)] => Ok(Value::Integer(*n)),
        [x] => rounded_to_int(number("ceil", x, line)?.ceil(), line),
    }
}

/// Largest int not above `x`.
fn floor(args: &[Value], line: usize) -> EvalResult<Value> {
    match exact_args::<1>("floor", args, line)? {
        [Value::Integer(n)] => Ok(Value::Integer(*n)),
        [x] => rounded_to_int(number("floor", x, line)?.floor(), line),
    }
}

/// Absolute value as a float.
fn abs(args: &[Value], line: usize) -> EvalResult<Value> {
    let [x] = exact_args::<1>("abs", args, line)?;
    Ok(Value::Float(number("abs", x, line)?.abs()))
}

/// `round(x)` rounds to the nearest int, `round(x, digits)` to `digits`
/// decimals. Halfway cases go to the even neighbour.
///
/// With `digits`, ints stay ints and floats stay floats. A negative `digits`
/// rounds to tens, hundreds and so on.
fn round(args: &[Value], line: usize) -> EvalResult<Value> {
    let (x, digits) = match args {
        [x] => (x, None),
        [x, digits] => (x, Some(integer("round", digits, line)?)),
        _ => return Err(Arity::OneOf(&[1, 2]).mismatch("round", args.len(), line)),
    };

    let Some(digits) = digits else {
        return match x {
            Value::Integer(n) => Ok(Value::Integer(*n)),
            _ => rounded_to_int(number("round", x, line)?.round_ties_even(), line),
        };
    };

    let exponent = i32::try_from(digits.unsigned_abs()).map_err(|_| {
                       wrong_argument("round", format!("{digits} digits is out of range"), line)
                   })?;
    let factor = 10f64.powi(exponent);
    let to_digits = |x: f64| {
        if digits >= 0 {
            (x * factor).round_ties_even() / factor
        } else {
            (x / factor).round_ties_even() * factor
        }
    };

    match x {
        Value::Integer(n) if digits >= 0 => Ok(Value::Integer(*n)),
        Value::Integer(n) => rounded_to_int(to_digits(i64_to_f64(*n)), line),
        _ => {
            let x = number("round", x, line)?;
            let rounded = to_digits(x);
            Ok(Value::Float(if rounded.is_finite() { rounded } else { x }))
        },
    }
}

/// `x` raised to `y`, always as a float.
fn pow(args: &[Value], line: usize) -> EvalResult<Value> {
    let [x, y] = exact_args::<2>("pow", args, line)?;
    let x = number("pow", x, line)?;
    let y = number("pow", y, line)?;
    checked("pow", x, x.powf(y), line)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::execute;

    fn float(value: &Value) -> f64 {
        match value {
            Value::Float(f) => *f,
            other => panic!("expected a float, got {other:?}"),
        }
    }

    #[test]
    fn square_root_of_negative_is_domain_error() {
        let err = sqrt(&[Value::Integer(-4)], 7).unwrap_err();
        assert_eq!(err,
                   RuntimeError::MathDomain { function: "sqrt".into(),
                                              line:     7, });
        assert_eq!(sqrt(&[Value::Integer(16)], 1).unwrap(), Value::Float(4.0));
    }

    #[test]
    fn inverse_trig_is_bounded() {
        assert!(asin(&[Value::Float(1.5)], 1).is_err());
        assert!(acos(&[Value::Integer(-2)], 1).is_err());
        assert!((float(&asin(&[Value::Integer(1)], 1).unwrap()) - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn logarithms() {
        assert!((float(&log(&[Value::Integer(8), Value::Integer(2)], 1).unwrap()) - 3.0).abs()
                < 1e-12);
        assert!((float(&log10(&[Value::Integer(1000)], 1).unwrap()) - 3.0).abs() < 1e-12);
        assert!(log(&[Value::Integer(0)], 1).is_err());
        assert!(log(&[Value::Integer(5), Value::Integer(1)], 1).is_err());
        assert!(log2(&[Value::Float(-1.0)], 1).is_err());
    }

    #[test]
    fn rounding_to_ints() {
        assert_eq!(ceil(&[Value::Float(1.2)], 1).unwrap(), Value::Integer(2));
        assert_eq!(floor(&[Value::Float(-1.2)], 1).unwrap(), Value::Integer(-2));
        assert_eq!(round(&[Value::Float(2.5)], 1).unwrap(), Value::Integer(2));
        assert_eq!(round(&[Value::Float(3.5)], 1).unwrap(), Value::Integer(4));
        assert!(floor(&[Value::Float(f64::INFINITY)], 1).is_err());
    }

    #[test]
    fn rounding_to_digits() {
        assert_eq!(round(&[Value::Float(3.14159), Value::Integer(2)], 1).unwrap(),
                   Value::Float(3.14));
        assert_eq!(round(&[Value::Integer(1250), Value::Integer(-2)], 1).unwrap(),
                   Value::Integer(1200));
        assert_eq!(round(&[Value::Integer(7), Value::Integer(3)], 1).unwrap(), Value::Integer(7));
    }

    #[test]
    fn text_is_not_a_number() {
        let err = exp(&[Value::from("1")], 2).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidArgument { line: 2, .. }));
    }

    #[test]
    fn overflowing_results_are_errors() {
        assert_eq!(exp(&[Value::Float(1000.0)], 3).unwrap_err(), RuntimeError::Overflow { line: 3 });
        assert!(pow(&[Value::Integer(-8), Value::Float(0.5)], 1).is_err());
        assert_eq!(pow(&[Value::Integer(2), Value::Integer(10)], 1).unwrap(),
                   Value::Float(1024.0));
    }

    #[test]
    fn library_from_source() {
        let run = execute("lib $math.main; print(abs(-3), \" \", round(tau / 2, 2));").unwrap();
        assert_eq!(run.output, "3.0 3.14");
    }
}
