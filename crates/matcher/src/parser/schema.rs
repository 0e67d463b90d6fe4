//! `$_internalSchema*` operators used by JSON Schema validation.

use super::parse_document;
use crate::{
    context::ParseContext,
    error::{ParseError, Result},
    expr::{LeafTest, MatchExpr},
    numeric::exact_non_negative_integer,
    path::FieldPath,
};
use model::Value;

fn bound(keyword: &str, arg: &Value) -> Result<u64> {
    exact_non_negative_integer(arg).map_err(|err| {
        ParseError::FailedToParse(format!(
            "{keyword} must be a non-negative integer: {err}"
        ))
    })
}

pub(super) fn min_items(path: &FieldPath, arg: &Value, _ctx: &ParseContext) -> Result<MatchExpr> {
    let min = bound("$_internalSchemaMinItems", arg)?;
    Ok(MatchExpr::leaf(path.clone(), LeafTest::MinItems(min)))
}

pub(super) fn max_items(path: &FieldPath, arg: &Value, _ctx: &ParseContext) -> Result<MatchExpr> {
    let max = bound("$_internalSchemaMaxItems", arg)?;
    Ok(MatchExpr::leaf(path.clone(), LeafTest::MaxItems(max)))
}

pub(super) fn min_length(path: &FieldPath, arg: &Value, _ctx: &ParseContext) -> Result<MatchExpr> {
    let min = bound("$_internalSchemaMinLength", arg)?;
    Ok(MatchExpr::leaf(path.clone(), LeafTest::MinLength(min)))
}

pub(super) fn max_length(path: &FieldPath, arg: &Value, _ctx: &ParseContext) -> Result<MatchExpr> {
    let max = bound("$_internalSchemaMaxLength", arg)?;
    Ok(MatchExpr::leaf(path.clone(), LeafTest::MaxLength(max)))
}

/// Only the literal `true` is accepted; truthy numbers are not.
pub(super) fn unique_items(
    path: &FieldPath,
    arg: &Value,
    _ctx: &ParseContext,
) -> Result<MatchExpr> {
    match arg {
        Value::Boolean(true) => Ok(MatchExpr::leaf(path.clone(), LeafTest::UniqueItems)),
        other => Err(ParseError::FailedToParse(format!(
            "$_internalSchemaUniqueItems must be set to true, got {other}"
        ))),
    }
}

/// The sub-filter is not the root of the query, so top-level-only operators
/// are rejected inside it.
pub(super) fn object_match(path: &FieldPath, arg: &Value, ctx: &ParseContext) -> Result<MatchExpr> {
    let Value::Document(doc) = arg else {
        return Err(ParseError::FailedToParse(format!(
            "$_internalSchemaObjectMatch must be an object, got {arg}"
        )));
    };
    let sub = parse_document(doc, &ctx.nested())?;
    Ok(MatchExpr::ObjectMatch {
        path: path.clone(),
        sub: Box::new(sub),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    #[test]
    fn test_bound_message_names_the_operator() {
        let err = bound("$_internalSchemaMinItems", &Value::Double(2.5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FailedToParse);
        assert!(err.message().starts_with("$_internalSchemaMinItems"));
    }

    #[test]
    fn test_bounds_accept_every_numeric_width() {
        let decimal = Value::Decimal(BigDecimal::from_str("2.000").unwrap());
        for arg in [Value::Int32(2), Value::Int64(2), Value::Double(2.0), decimal] {
            assert_eq!(bound("$_internalSchemaMaxItems", &arg), Ok(2));
        }
    }

    #[test]
    fn test_unique_items_argument() {
        let ctx = ParseContext::default();
        let path = FieldPath::new("a");
        assert!(unique_items(&path, &Value::Boolean(true), &ctx).is_ok());
        for bad in [
            Value::Int32(1),
            Value::Double(1.0),
            Value::Boolean(false),
            Value::from(""),
        ] {
            assert!(unique_items(&path, &bad, &ctx).is_err());
        }
    }
}
