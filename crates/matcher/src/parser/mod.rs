//! Filter document compiler.
//!
//! Keys starting with `$` are operators; everything else is a field path.
//! A field whose value is a document with a leading `$` key is compiled as an
//! operator document for that path, any other value is an implicit `$eq`.
//! Sibling predicates are conjoined.

mod leaf;
mod logical;
mod registry;
mod schema;

use crate::{
    context::ParseContext,
    error::{ParseError, Result},
    expr::MatchExpr,
    path::FieldPath,
};
use model::{Document, Value};
use tracing::{debug, trace};

pub use registry::{OperatorParser, OperatorRegistry, FIELD_OPERATORS};

/// Compiles `filter` under `ctx`.
pub fn parse(filter: &Document, ctx: &ParseContext) -> Result<MatchExpr> {
    match parse_document(filter, ctx) {
        Ok(expr) => {
            debug!(root = expr.kind_name(), "compiled filter {}", filter);
            Ok(expr)
        }
        Err(err) => {
            debug!(kind = %err.kind(), "failed to compile filter {}: {}", filter, err.message());
            Err(err)
        }
    }
}

pub(crate) fn parse_document(filter: &Document, ctx: &ParseContext) -> Result<MatchExpr> {
    let ctx = ctx.descend()?;
    let mut children = Vec::with_capacity(filter.len());

    for (key, value) in filter.iter() {
        if key.starts_with('$') {
            ctx.check_allowed(key)?;
            trace!(operator = key, "compiling top-level operator");
            if let Some(expr) = logical::parse_top_level(key, value, &ctx)? {
                children.push(expr);
            }
        } else {
            children.push(parse_field(key, value, &ctx)?);
        }
    }

    Ok(MatchExpr::and_of(children))
}

fn parse_field(key: &str, value: &Value, ctx: &ParseContext) -> Result<MatchExpr> {
    let path = FieldPath::new(key);
    match value {
        Value::Document(doc) if is_operator_document(doc) => {
            parse_operator_document(&path, doc, ctx)
        }
        _ => Ok(leaf::equality(path, value.clone(), ctx)),
    }
}

pub(crate) fn is_operator_document(doc: &Document) -> bool {
    doc.first_key().is_some_and(|k| k.starts_with('$'))
}

/// Compiles every operator of `doc` against `path`.
pub(crate) fn parse_operator_document(
    path: &FieldPath,
    doc: &Document,
    ctx: &ParseContext,
) -> Result<MatchExpr> {
    let ctx = ctx.descend()?;
    let mut children = Vec::with_capacity(doc.len());

    for (key, arg) in doc.iter() {
        if !key.starts_with('$') {
            return Err(ParseError::BadValue(format!("unknown operator: {key}")));
        }
        ctx.check_allowed(key)?;
        trace!(operator = key, path = %path, "compiling field operator");

        match key {
            "$regex" => children.push(leaf::regex(path, arg, doc.get("$options"))?),
            "$options" => {
                if !doc.contains_key("$regex") {
                    return Err(ParseError::FailedToParse(
                        "$options needs a $regex".to_string(),
                    ));
                }
            }
            _ => {
                let parser = FIELD_OPERATORS
                    .get(key)
                    .ok_or_else(|| ParseError::BadValue(format!("unknown operator: {key}")))?;
                children.push(parser(path, arg, &ctx)?);
            }
        }
    }

    Ok(MatchExpr::and_of(children))
}
