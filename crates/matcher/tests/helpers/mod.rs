#![allow(dead_code)]

use bigdecimal::BigDecimal;
use matcher::{MatchExpr, ParseContext, Result, parse};
use model::{Document, Value};
use std::str::FromStr;

pub fn doc(json: serde_json::Value) -> Document {
    Document::try_from(json).expect("test documents are JSON objects")
}

pub fn parse_json(json: serde_json::Value) -> Result<MatchExpr> {
    parse(&doc(json), &ParseContext::default())
}

pub fn parse_with(json: serde_json::Value, ctx: &ParseContext) -> Result<MatchExpr> {
    parse(&doc(json), ctx)
}

pub fn compile(json: serde_json::Value) -> MatchExpr {
    parse_json(json).expect("filter should compile")
}

/// `{field: {op: arg}}`, for arguments JSON cannot express.
pub fn operator(field: &str, op: &str, arg: impl Into<Value>) -> Document {
    Document::new().with(field, Document::new().with(op, arg))
}

pub fn decimal(s: &str) -> Value {
    Value::Decimal(BigDecimal::from_str(s).expect("valid decimal literal"))
}

pub fn matches(expr: &MatchExpr, json: serde_json::Value) -> bool {
    expr.matches(&doc(json))
}
