//! Numeric argument extraction shared by every operator that takes a count,
//! a length or an integer operand.
//!
//! Accepted bounds are exact integers in `[i64::MIN, i64::MAX]`, whatever
//! numeric width carries them. Doubles must be finite with no fractional part
//! and lie in `[-2^63, 2^63)`; decimals must be integral after normalisation
//! (`2.000` is fine) and fit in 64 bits.
//!
//! Decimals are inspected through their digits and exponent, so a value such
//! as `1E+20000000` is rejected without expanding the power of ten.

use bigdecimal::{
    BigDecimal, ToPrimitive, Zero,
    num_bigint::{BigInt, Sign},
};
use model::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumericError {
    #[error("expected a number, got {0}")]
    NotANumber(String),

    #[error("{0} is not an exact integer")]
    NotIntegral(String),

    #[error("{0} is negative")]
    Negative(String),

    #[error("{0} is out of range for a 64-bit integer")]
    OutOfRange(String),
}

// 2^63 is exactly representable as a double, i64::MAX is not.
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

/// The exact integer a numeric value represents, or why it doesn't.
pub fn exact_integer(value: &Value) -> Result<i64, NumericError> {
    match value {
        Value::Int32(v) => Ok(*v as i64),
        Value::Int64(v) => Ok(*v),
        Value::Double(v) => {
            if v.is_nan() || (v.is_finite() && v.fract() != 0.0) {
                return Err(NumericError::NotIntegral(value.to_string()));
            }
            if v.is_infinite() || *v >= TWO_POW_63 || *v < -TWO_POW_63 {
                return Err(NumericError::OutOfRange(value.to_string()));
            }
            Ok(*v as i64)
        }
        Value::Decimal(d) => {
            let parts = DecimalParts::of(d);
            if parts.fractional {
                return Err(NumericError::NotIntegral(value.to_string()));
            }
            parts
                .whole
                .ok_or_else(|| NumericError::OutOfRange(value.to_string()))
        }
        other => Err(NumericError::NotANumber(other.to_string())),
    }
}

/// Like [`exact_integer`], additionally rejecting negative values.
pub fn exact_non_negative_integer(value: &Value) -> Result<u64, NumericError> {
    let n = exact_integer(value)?;
    u64::try_from(n).map_err(|_| NumericError::Negative(value.to_string()))
}

/// Truncates a numeric value toward zero. `None` for non-numbers and NaN.
pub fn truncate_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Int32(v) => Some(*v as i64),
        Value::Int64(v) => Some(*v),
        Value::Double(v) if v.is_nan() => None,
        // `as` saturates at the i64 bounds.
        Value::Double(v) => Some(v.trunc() as i64),
        Value::Decimal(d) => {
            let parts = DecimalParts::of(d);
            Some(parts.whole.unwrap_or(if parts.negative { i64::MIN } else { i64::MAX }))
        }
        _ => None,
    }
}

// No i64 has more than 19 decimal digits.
const MAX_I64_DIGITS: i64 = 19;

/// A decimal split at the decimal point, truncating toward zero.
struct DecimalParts {
    /// `None` when the integral part does not fit in an i64.
    whole: Option<i64>,
    /// A non-zero fraction was dropped.
    fractional: bool,
    negative: bool,
}

impl DecimalParts {
    fn of(d: &BigDecimal) -> Self {
        let (digits, scale) = d.as_bigint_and_exponent();
        let negative = digits.sign() == Sign::Minus;

        if digits.is_zero() {
            return Self {
                whole: Some(0),
                fractional: false,
                negative,
            };
        }

        if scale > 0 {
            // A decimal integer has no more digits than bits, so this is |d| < 1.
            if scale.unsigned_abs() > digits.bits() {
                return Self {
                    whole: Some(0),
                    fractional: true,
                    negative,
                };
            }
            let divisor = pow10(scale.unsigned_abs());
            Self {
                whole: (&digits / &divisor).to_i64(),
                fractional: !(&digits % &divisor).is_zero(),
                negative,
            }
        } else if scale < -MAX_I64_DIGITS {
            Self {
                whole: None,
                fractional: false,
                negative,
            }
        } else {
            Self {
                whole: (digits * pow10(scale.unsigned_abs())).to_i64(),
                fractional: false,
                negative,
            }
        }
    }
}

/// `10^exp`; callers keep `exp` no larger than the bit length of digits they hold.
fn pow10(exp: u64) -> BigInt {
    let exp = u32::try_from(exp).unwrap_or(u32::MAX);
    BigInt::from(10u8).pow(exp)
}
