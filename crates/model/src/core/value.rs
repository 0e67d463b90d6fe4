use crate::core::{data_type::ValueType, document::Document, identifiers::ObjectId};
use bigdecimal::{BigDecimal, FromPrimitive};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

/// A single typed value inside a document or a filter.
///
/// The numeric variants are distinct tags, but every comparison in this crate
/// treats them as one bracket ordered by numeric value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Double(f64),
    Decimal(BigDecimal),
    String(String),
    Date(DateTime<Utc>),
    ObjectId(ObjectId),
    Array(Vec<Value>),
    Document(Document),
}

/// Pluggable string ordering used when values are compared.
pub type StringOrder<'a> = &'a dyn Fn(&str, &str) -> Ordering;

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Int32(_) => ValueType::Int32,
            Value::Int64(_) => ValueType::Int64,
            Value::Double(_) => ValueType::Double,
            Value::Decimal(_) => ValueType::Decimal,
            Value::String(_) => ValueType::String,
            Value::Date(_) => ValueType::Date,
            Value::ObjectId(_) => ValueType::ObjectId,
            Value::Array(_) => ValueType::Array,
            Value::Document(_) => ValueType::Document,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_number(&self) -> bool {
        self.value_type().is_numeric()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }

    /// Truthiness of a flag-like argument: `false`, `null` and numeric zero are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Int32(v) => *v != 0,
            Value::Int64(v) => *v != 0,
            Value::Double(v) => *v != 0.0,
            Value::Decimal(d) => !d.eq(&BigDecimal::from(0)),
            _ => true,
        }
    }

    /// Rank of the type bracket this value sorts in. All numbers share one rank.
    pub fn canonical_rank(&self) -> u8 {
        match self {
            Value::Null => 5,
            Value::Int32(_) | Value::Int64(_) | Value::Double(_) | Value::Decimal(_) => 10,
            Value::String(_) => 15,
            Value::Document(_) => 20,
            Value::Array(_) => 25,
            Value::ObjectId(_) => 35,
            Value::Boolean(_) => 40,
            Value::Date(_) => 45,
        }
    }

    /// Total order over values using binary string comparison.
    pub fn canonical_cmp(&self, other: &Value) -> Ordering {
        self.compare_by(other, &|a, b| a.cmp(b))
    }

    /// Structural equality under the canonical order (`1 == 1.0`).
    pub fn equivalent(&self, other: &Value) -> bool {
        self.canonical_cmp(other) == Ordering::Equal
    }

    /// Total order over values where strings, at any depth, are ordered by `strings`.
    pub fn compare_by(&self, other: &Value, strings: StringOrder<'_>) -> Ordering {
        use Value::*;

        let rank = self.canonical_rank().cmp(&other.canonical_rank());
        if rank != Ordering::Equal {
            return rank;
        }

        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (String(a), String(b)) => strings(a, b),
            (Boolean(a), Boolean(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            (ObjectId(a), ObjectId(b)) => a.cmp(b),
            (Array(a), Array(b)) => {
                for (l, r) in a.iter().zip(b.iter()) {
                    let ord = l.compare_by(r, strings);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            (Document(a), Document(b)) => {
                for ((lk, lv), (rk, rv)) in a.iter().zip(b.iter()) {
                    let ord = lk.cmp(rk).then_with(|| lv.compare_by(rv, strings));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => compare_numbers(self, other),
        }
    }
}

/// Orders two numeric values of any width without losing precision.
/// NaN equals NaN and sorts below every other number.
fn compare_numbers(left: &Value, right: &Value) -> Ordering {
    use Value::*;

    match (left, right) {
        (Int32(a), Int32(b)) => a.cmp(b),
        (Int32(a), Int64(b)) => (*a as i64).cmp(b),
        (Int64(a), Int32(b)) => a.cmp(&(*b as i64)),
        (Int64(a), Int64(b)) => a.cmp(b),
        (Double(a), Double(b)) => compare_doubles(*a, *b),
        (Int32(a), Double(b)) => compare_int_double(*a as i64, *b),
        (Int64(a), Double(b)) => compare_int_double(*a, *b),
        (Double(a), Int32(b)) => compare_int_double(*b as i64, *a).reverse(),
        (Double(a), Int64(b)) => compare_int_double(*b, *a).reverse(),
        (Decimal(a), Decimal(b)) => a.cmp(b),
        (Decimal(a), other) => compare_decimal(a, other),
        (other, Decimal(b)) => compare_decimal(b, other).reverse(),
        // Non-numeric pairs never reach here; callers check the bracket first.
        _ => Ordering::Equal,
    }
}

fn compare_doubles(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Exact comparison of an integer against a double.
fn compare_int_double(i: i64, f: f64) -> Ordering {
    // 2^63 is exactly representable, i64::MAX is not.
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

    if f.is_nan() {
        return Ordering::Greater;
    }
    if f >= TWO_POW_63 {
        return Ordering::Less;
    }
    if f < -TWO_POW_63 {
        return Ordering::Greater;
    }

    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => compare_doubles(0.0, f - whole),
        ord => ord,
    }
}

/// Compares a decimal with a numeric value of another width.
fn compare_decimal(d: &BigDecimal, other: &Value) -> Ordering {
    let other = match other {
        Value::Int32(v) => BigDecimal::from(*v),
        Value::Int64(v) => BigDecimal::from(*v),
        Value::Double(v) if v.is_nan() => return Ordering::Greater,
        Value::Double(v) if v.is_infinite() => {
            return if *v > 0.0 {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        Value::Double(v) => match BigDecimal::from_f64(*v) {
            Some(converted) => converted,
            None => return Ordering::Equal,
        },
        _ => return Ordering::Equal,
    };
    d.cmp(&other)
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<BigDecimal> for Value {
    fn from(v: BigDecimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Date(v)
    }
}

impl From<ObjectId> for Value {
    fn from(v: ObjectId) -> Self {
        Value::ObjectId(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Document> for Value {
    fn from(v: Document) -> Self {
        Value::Document(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "NumberLong({v})"),
            Value::Double(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{v:.1}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "NumberDecimal(\"{v}\")"),
            Value::String(v) => write!(f, "\"{}\"", v.replace('"', "\\\"")),
            Value::Date(v) => write!(f, "new Date(\"{}\")", v.to_rfc3339()),
            Value::ObjectId(v) => write!(f, "ObjectId(\"{v}\")"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Document(doc) => write!(f, "{doc}"),
        }
    }
}
