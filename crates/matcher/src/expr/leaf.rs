use crate::{collation::StringComparator, numeric::truncate_to_i64, path::Traversal};
use bitflags::bitflags;
use model::{Value, ValueType};
use regex::Regex;
use std::{cmp::Ordering, sync::Arc};

/// Predicate applied to a single resolved value.
#[derive(Debug, Clone)]
pub enum LeafTest {
    Compare(Comparison),
    In(InSet),
    Exists,
    Type(TypeSet),
    Regex(RegexTest),
    Mod { divisor: i64, remainder: i64 },
    Size(i64),
    MinItems(u64),
    MaxItems(u64),
    UniqueItems,
    MinLength(u64),
    MaxLength(u64),
}

impl LeafTest {
    /// Array-shape tests see only the array, never its elements.
    pub fn traversal(&self) -> Traversal {
        match self {
            LeafTest::Size(_)
            | LeafTest::MinItems(_)
            | LeafTest::MaxItems(_)
            | LeafTest::UniqueItems => Traversal::WholeValue,
            _ => Traversal::ExpandLeafArrays,
        }
    }

    pub fn operator_name(&self) -> &'static str {
        match self {
            LeafTest::Compare(c) => c.op.operator_name(),
            LeafTest::In(_) => "$in",
            LeafTest::Exists => "$exists",
            LeafTest::Type(_) => "$type",
            LeafTest::Regex(_) => "$regex",
            LeafTest::Mod { .. } => "$mod",
            LeafTest::Size(_) => "$size",
            LeafTest::MinItems(_) => "$_internalSchemaMinItems",
            LeafTest::MaxItems(_) => "$_internalSchemaMaxItems",
            LeafTest::UniqueItems => "$_internalSchemaUniqueItems",
            LeafTest::MinLength(_) => "$_internalSchemaMinLength",
            LeafTest::MaxLength(_) => "$_internalSchemaMaxLength",
        }
    }

    /// Outcome when the path does not exist in the candidate.
    pub fn matches_missing(&self) -> bool {
        match self {
            LeafTest::Compare(c) => c.matches_null_or_missing(),
            LeafTest::In(set) => set.has_null,
            _ => false,
        }
    }

    pub fn matches_value(&self, value: &Value) -> bool {
        match self {
            LeafTest::Compare(c) => c.matches(value),
            LeafTest::In(set) => set.contains(value),
            LeafTest::Exists => true,
            LeafTest::Type(types) => types.contains_type(value.value_type()),
            LeafTest::Regex(re) => value.as_str().is_some_and(|s| re.regex.is_match(s)),
            LeafTest::Mod { divisor, remainder } => {
                value.is_number()
                    && truncate_to_i64(value)
                        .is_some_and(|n| n.wrapping_rem(*divisor) == *remainder)
            }
            LeafTest::Size(len) => value
                .as_array()
                .is_some_and(|items| i64::try_from(items.len()).is_ok_and(|n| n == *len)),
            LeafTest::MinItems(bound) => value
                .as_array()
                .is_some_and(|items| items.len() as u64 >= *bound),
            LeafTest::MaxItems(bound) => value
                .as_array()
                .is_some_and(|items| items.len() as u64 <= *bound),
            LeafTest::UniqueItems => value.as_array().is_some_and(all_distinct),
            LeafTest::MinLength(bound) => value
                .as_str()
                .is_some_and(|s| s.chars().count() as u64 >= *bound),
            LeafTest::MaxLength(bound) => value
                .as_str()
                .is_some_and(|s| s.chars().count() as u64 <= *bound),
        }
    }
}

/// Pairwise structural distinctness, in `O(n log n)`.
fn all_distinct(items: &[Value]) -> bool {
    if items.len() < 2 {
        return true;
    }
    let mut sorted: Vec<&Value> = items.iter().collect();
    sorted.sort_by(|a, b| a.canonical_cmp(b));
    sorted.windows(2).all(|pair| !pair[0].equivalent(pair[1]))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    pub fn operator_name(self) -> &'static str {
        match self {
            CompareOp::Eq => "$eq",
            CompareOp::Lt => "$lt",
            CompareOp::Lte => "$lte",
            CompareOp::Gt => "$gt",
            CompareOp::Gte => "$gte",
        }
    }

    fn accepts(self, ord: Ordering) -> bool {
        match self {
            CompareOp::Eq => ord == Ordering::Equal,
            CompareOp::Lt => ord == Ordering::Less,
            CompareOp::Lte => ord != Ordering::Greater,
            CompareOp::Gt => ord == Ordering::Greater,
            CompareOp::Gte => ord != Ordering::Less,
        }
    }
}

/// Comparison against a literal operand. Only values in the operand's type
/// bracket can satisfy it; strings are ordered by the captured comparator.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub op: CompareOp,
    pub operand: Value,
    pub comparator: Arc<dyn StringComparator>,
}

impl Comparison {
    pub fn matches(&self, value: &Value) -> bool {
        if value.canonical_rank() != self.operand.canonical_rank() {
            return false;
        }
        let cmp = self.comparator.as_ref();
        self.op
            .accepts(value.compare_by(&self.operand, &|a, b| cmp.compare(a, b)))
    }

    fn matches_null_or_missing(&self) -> bool {
        self.operand.is_null() && matches!(self.op, CompareOp::Eq | CompareOp::Lte | CompareOp::Gte)
    }
}

/// `$in` operand list.
#[derive(Debug, Clone)]
pub struct InSet {
    values: Vec<Value>,
    has_null: bool,
    comparator: Arc<dyn StringComparator>,
}

impl InSet {
    pub fn new(values: Vec<Value>, comparator: Arc<dyn StringComparator>) -> Self {
        let has_null = values.iter().any(Value::is_null);
        Self {
            values,
            has_null,
            comparator,
        }
    }

    pub fn contains(&self, value: &Value) -> bool {
        let cmp = self.comparator.as_ref();
        self.values.iter().any(|candidate| {
            value.compare_by(candidate, &|a, b| cmp.compare(a, b)) == Ordering::Equal
        })
    }
}

bitflags! {
    /// Set of value types accepted by a `$type` predicate.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TypeSet: u16 {
        const DOUBLE    = 1 << 0;
        const STRING    = 1 << 1;
        const DOCUMENT  = 1 << 2;
        const ARRAY     = 1 << 3;
        const OBJECT_ID = 1 << 4;
        const BOOLEAN   = 1 << 5;
        const DATE      = 1 << 6;
        const NULL      = 1 << 7;
        const INT32     = 1 << 8;
        const INT64     = 1 << 9;
        const DECIMAL   = 1 << 10;

        const NUMBER = Self::DOUBLE.bits()
            | Self::INT32.bits()
            | Self::INT64.bits()
            | Self::DECIMAL.bits();
    }
}

impl TypeSet {
    pub fn of(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Double => TypeSet::DOUBLE,
            ValueType::String => TypeSet::STRING,
            ValueType::Document => TypeSet::DOCUMENT,
            ValueType::Array => TypeSet::ARRAY,
            ValueType::ObjectId => TypeSet::OBJECT_ID,
            ValueType::Boolean => TypeSet::BOOLEAN,
            ValueType::Date => TypeSet::DATE,
            ValueType::Null => TypeSet::NULL,
            ValueType::Int32 => TypeSet::INT32,
            ValueType::Int64 => TypeSet::INT64,
            ValueType::Decimal => TypeSet::DECIMAL,
        }
    }

    pub fn contains_type(&self, value_type: ValueType) -> bool {
        self.intersects(TypeSet::of(value_type))
    }
}

#[derive(Debug, Clone)]
pub struct RegexTest {
    pub regex: Regex,
    pub pattern: String,
    pub options: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collation::{CaseInsensitiveComparator, SimpleComparator};

    fn compare(op: CompareOp, operand: Value) -> Comparison {
        Comparison {
            op,
            operand,
            comparator: Arc::new(SimpleComparator),
        }
    }

    #[test]
    fn test_comparison_stays_in_type_bracket() {
        let gt = compare(CompareOp::Gt, Value::Int32(0));
        assert!(gt.matches(&Value::Double(0.5)));
        assert!(!gt.matches(&Value::from("string")));
        assert!(!gt.matches(&Value::Boolean(true)));
    }

    #[test]
    fn test_comparison_null_operand_matches_missing() {
        let eq = LeafTest::Compare(compare(CompareOp::Eq, Value::Null));
        let lt = LeafTest::Compare(compare(CompareOp::Lt, Value::Null));
        assert!(eq.matches_missing());
        assert!(!lt.matches_missing());
    }

    #[test]
    fn test_comparator_is_used_for_strings() {
        let eq = Comparison {
            op: CompareOp::Eq,
            operand: Value::from("Hello"),
            comparator: Arc::new(CaseInsensitiveComparator),
        };
        assert!(eq.matches(&Value::from("hELLO")));
        assert!(!compare(CompareOp::Eq, Value::from("Hello")).matches(&Value::from("hello")));
    }

    #[test]
    fn test_in_set() {
        let set = InSet::new(
            vec![Value::Int32(1), Value::from("a"), Value::Null],
            Arc::new(SimpleComparator),
        );
        assert!(set.contains(&Value::Double(1.0)));
        assert!(set.contains(&Value::from("a")));
        assert!(!set.contains(&Value::from("b")));
        assert!(LeafTest::In(set).matches_missing());
    }

    #[test]
    fn test_type_set() {
        assert!(TypeSet::NUMBER.contains_type(ValueType::Int64));
        assert!(TypeSet::NUMBER.contains_type(ValueType::Decimal));
        assert!(!TypeSet::NUMBER.contains_type(ValueType::String));
        let set = TypeSet::STRING | TypeSet::NULL;
        assert!(set.contains_type(ValueType::Null));
        assert!(!set.contains_type(ValueType::Array));
    }

    #[test]
    fn test_mod() {
        let test = LeafTest::Mod {
            divisor: 4,
            remainder: 1,
        };
        assert!(test.matches_value(&Value::Int32(9)));
        assert!(test.matches_value(&Value::Double(9.7)));
        assert!(!test.matches_value(&Value::Int32(8)));
        assert!(!test.matches_value(&Value::from("9")));

        let overflow = LeafTest::Mod {
            divisor: -1,
            remainder: 0,
        };
        assert!(overflow.matches_value(&Value::Int64(i64::MIN)));
    }

    #[test]
    fn test_unique_items_uses_numeric_equivalence() {
        let items = vec![Value::Int32(1), Value::Double(1.0)];
        assert!(!all_distinct(&items));
        let items = vec![Value::Int32(1), Value::from("1")];
        assert!(all_distinct(&items));
    }

    #[test]
    fn test_string_length_counts_code_points() {
        let min = LeafTest::MinLength(3);
        assert!(min.matches_value(&Value::from("héé")));
        assert!(!min.matches_value(&Value::from("hé")));
        assert!(!min.matches_value(&Value::Int32(123)));

        let max = LeafTest::MaxLength(2);
        assert!(max.matches_value(&Value::from("é")));
        assert!(!max.matches_value(&Value::from("abc")));
    }
}
