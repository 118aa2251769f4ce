/// Why a user-facing index could not be mapped to a storage slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFault {
    /// Index `0`; user indices start at 1.
    Zero,
    /// Past either end of the container.
    OutOfRange,
}

/// Maps a user-facing index onto a zero-based storage slot.
///
/// Positive `k` addresses slot `k - 1`, negative `k` counts from the end so
/// `-1` is the last element, and `0` addresses nothing.
///
/// ## Errors
/// Returns [`IndexFault::Zero`] for `0` and [`IndexFault::OutOfRange`] when the
/// slot lies outside `0..len`.
///
/// ## Example
/// ```
/// use puffing::util::num::{IndexFault, normalize_index};
///
/// assert_eq!(normalize_index(1, 3), Ok(0));
/// assert_eq!(normalize_index(3, 3), Ok(2));
/// assert_eq!(normalize_index(-1, 3), Ok(2));
/// assert_eq!(normalize_index(-3, 3), Ok(0));
/// assert_eq!(normalize_index(0, 3), Err(IndexFault::Zero));
/// assert_eq!(normalize_index(4, 3), Err(IndexFault::OutOfRange));
/// assert_eq!(normalize_index(-4, 3), Err(IndexFault::OutOfRange));
/// ```
pub fn normalize_index(index: i64, len: usize) -> Result<usize, IndexFault> {
    let len = usize_to_i64(len);
    let slot = match index {
        0 => return Err(IndexFault::Zero),
        k if k > 0 => k - 1,
        k => len + k,
    };

    if (0..len).contains(&slot) {
        usize::try_from(slot).map_err(|_| IndexFault::OutOfRange)
    } else {
        Err(IndexFault::OutOfRange)
    }
}

/// Converts a length or position to `i64`, saturating at `i64::MAX`.
#[must_use]
pub fn usize_to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Promotes an integer operand to a float for mixed arithmetic.
///
/// Magnitudes above 2^53 round to the nearest representable float, which is
/// what mixed integer/float arithmetic is expected to do.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn i64_to_f64(value: i64) -> f64 {
    value as f64
}

/// Truncates a float toward zero into an `i64`.
///
/// ## Errors
/// Returns `Err(error)` for NaN, infinities, and values outside the `i64`
/// range.
///
/// ## Example
/// ```
/// use puffing::util::num::f64_to_i64_truncated;
///
/// assert_eq!(f64_to_i64_truncated(3.9, "bad"), Ok(3));
/// assert_eq!(f64_to_i64_truncated(-3.9, "bad"), Ok(-3));
/// assert_eq!(f64_to_i64_truncated(f64::NAN, "bad"), Err("bad"));
/// assert_eq!(f64_to_i64_truncated(1e20, "bad"), Err("bad"));
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_truncated<E>(value: f64, error: E) -> Result<i64, E> {
    if !value.is_finite() {
        return Err(error);
    }
    let truncated = value.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(error);
    }
    Ok(truncated as i64)
}

/// Returns the integer a float is exactly equal to, if any.
///
/// ## Example
/// ```
/// use puffing::util::num::f64_as_exact_i64;
///
/// assert_eq!(f64_as_exact_i64(2.0), Some(2));
/// assert_eq!(f64_as_exact_i64(2.5), None);
/// assert_eq!(f64_as_exact_i64(f64::INFINITY), None);
/// ```
#[must_use]
pub fn f64_as_exact_i64(value: f64) -> Option<i64> {
    if value.fract() != 0.0 {
        return None;
    }
    f64_to_i64_truncated(value, ()).ok()
}

/// Floored integer modulo: the result takes the sign of the divisor.
///
/// The divisor must be non-zero.
///
/// ## Example
/// ```
/// use puffing::util::num::floor_mod_i64;
///
/// assert_eq!(floor_mod_i64(7, 3), 1);
/// assert_eq!(floor_mod_i64(-7, 3), 2);
/// assert_eq!(floor_mod_i64(7, -3), -2);
/// assert_eq!(floor_mod_i64(i64::MIN, -1), 0);
/// ```
#[must_use]
pub const fn floor_mod_i64(dividend: i64, divisor: i64) -> i64 {
    let remainder = dividend.wrapping_rem(divisor);
    if remainder != 0 && ((remainder < 0) != (divisor < 0)) {
        remainder + divisor
    } else {
        remainder
    }
}

/// Floored float modulo: the result takes the sign of the divisor.
#[must_use]
pub fn floor_mod_f64(dividend: f64, divisor: f64) -> f64 {
    let remainder = dividend % divisor;
    if remainder != 0.0 && ((remainder < 0.0) != (divisor < 0.0)) {
        remainder + divisor
    } else {
        remainder
    }
}

/// Renders a float the way the language prints it.
///
/// Integral values keep a trailing `.0`, very large and very small magnitudes
/// switch to exponent notation with a signed two-digit exponent.
///
/// ## Example
/// ```
/// use puffing::util::num::format_float;
///
/// assert_eq!(format_float(3.0), "3.0");
/// assert_eq!(format_float(2.5), "2.5");
/// assert_eq!(format_float(-0.125), "-0.125");
/// assert_eq!(format_float(1e16), "1e+16");
/// assert_eq!(format_float(1.5e-7), "1.5e-07");
/// assert_eq!(format_float(f64::INFINITY), "inf");
/// ```
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{value:e}");
        if let Some((mantissa, exponent)) = formatted.split_once('e') {
            let (sign, digits) = exponent.strip_prefix('-')
                                         .map_or(("+", exponent), |digits| ("-", digits));
            return format!("{mantissa}e{sign}{digits:0>2}");
        }
        return formatted;
    }

    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
