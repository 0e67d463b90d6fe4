use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

/// Type tag of a [`Value`](crate::core::value::Value), with the alias and
/// numeric code a `$type` predicate may name it by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ValueType {
    Double,
    String,
    Document,
    Array,
    ObjectId,
    Boolean,
    Date,
    Null,
    Int32,
    Int64,
    Decimal,
}

lazy_static! {
    static ref TYPE_ALIASES: HashMap<&'static str, ValueType> = build_alias_map();
}

impl ValueType {
    pub const ALL: [ValueType; 11] = [
        ValueType::Double,
        ValueType::String,
        ValueType::Document,
        ValueType::Array,
        ValueType::ObjectId,
        ValueType::Boolean,
        ValueType::Date,
        ValueType::Null,
        ValueType::Int32,
        ValueType::Int64,
        ValueType::Decimal,
    ];

    pub fn code(self) -> i32 {
        match self {
            ValueType::Double => 1,
            ValueType::String => 2,
            ValueType::Document => 3,
            ValueType::Array => 4,
            ValueType::ObjectId => 7,
            ValueType::Boolean => 8,
            ValueType::Date => 9,
            ValueType::Null => 10,
            ValueType::Int32 => 16,
            ValueType::Int64 => 18,
            ValueType::Decimal => 19,
        }
    }

    pub fn alias(self) -> &'static str {
        match self {
            ValueType::Double => "double",
            ValueType::String => "string",
            ValueType::Document => "object",
            ValueType::Array => "array",
            ValueType::ObjectId => "objectId",
            ValueType::Boolean => "bool",
            ValueType::Date => "date",
            ValueType::Null => "null",
            ValueType::Int32 => "int",
            ValueType::Int64 => "long",
            ValueType::Decimal => "decimal",
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Alias lookup is case-sensitive, like the aliases themselves.
    pub fn from_alias(alias: &str) -> Option<Self> {
        TYPE_ALIASES.get(alias).copied()
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ValueType::Int32 | ValueType::Int64 | ValueType::Double | ValueType::Decimal
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.alias())
    }
}

fn build_alias_map() -> HashMap<&'static str, ValueType> {
    let mut map = HashMap::new();
    for value_type in ValueType::ALL {
        map.insert(value_type.alias(), value_type);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_and_code_lookup_agree() {
        for value_type in ValueType::ALL {
            assert_eq!(ValueType::from_alias(value_type.alias()), Some(value_type));
            assert_eq!(ValueType::from_code(value_type.code()), Some(value_type));
        }
    }

    #[test]
    fn test_unknown_aliases() {
        assert_eq!(ValueType::from_alias("String"), None);
        assert_eq!(ValueType::from_alias("number"), None);
        assert_eq!(ValueType::from_code(5), None);
    }
}
