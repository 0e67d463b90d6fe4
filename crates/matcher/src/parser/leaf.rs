use super::{
    is_operator_document, logical::is_top_level_operator, parse_document, parse_operator_document,
};
use crate::{
    context::ParseContext,
    error::{ParseError, Result},
    expr::{CompareOp, Comparison, InSet, LeafTest, MatchExpr, RegexTest, TypeSet},
    numeric::{exact_integer, truncate_to_i64},
    path::FieldPath,
};
use model::{Value, ValueType};
use regex::RegexBuilder;

pub(super) fn equality(path: FieldPath, operand: Value, ctx: &ParseContext) -> MatchExpr {
    comparison(path, CompareOp::Eq, operand, ctx)
}

fn comparison(path: FieldPath, op: CompareOp, operand: Value, ctx: &ParseContext) -> MatchExpr {
    MatchExpr::leaf(
        path,
        LeafTest::Compare(Comparison {
            op,
            operand,
            comparator: ctx.comparator().clone(),
        }),
    )
}

pub(super) fn eq(path: &FieldPath, arg: &Value, ctx: &ParseContext) -> Result<MatchExpr> {
    Ok(comparison(path.clone(), CompareOp::Eq, arg.clone(), ctx))
}

pub(super) fn ne(path: &FieldPath, arg: &Value, ctx: &ParseContext) -> Result<MatchExpr> {
    Ok(MatchExpr::not(eq(path, arg, ctx)?))
}

pub(super) fn lt(path: &FieldPath, arg: &Value, ctx: &ParseContext) -> Result<MatchExpr> {
    Ok(comparison(path.clone(), CompareOp::Lt, arg.clone(), ctx))
}

pub(super) fn lte(path: &FieldPath, arg: &Value, ctx: &ParseContext) -> Result<MatchExpr> {
    Ok(comparison(path.clone(), CompareOp::Lte, arg.clone(), ctx))
}

pub(super) fn gt(path: &FieldPath, arg: &Value, ctx: &ParseContext) -> Result<MatchExpr> {
    Ok(comparison(path.clone(), CompareOp::Gt, arg.clone(), ctx))
}

pub(super) fn gte(path: &FieldPath, arg: &Value, ctx: &ParseContext) -> Result<MatchExpr> {
    Ok(comparison(path.clone(), CompareOp::Gte, arg.clone(), ctx))
}

pub(super) fn in_list(path: &FieldPath, arg: &Value, ctx: &ParseContext) -> Result<MatchExpr> {
    let Value::Array(items) = arg else {
        return Err(ParseError::FailedToParse(format!("$in needs an array, got {arg}")));
    };
    if items
        .iter()
        .any(|item| matches!(item, Value::Document(doc) if is_operator_document(doc)))
    {
        return Err(ParseError::FailedToParse(
            "cannot nest $ under $in".to_string(),
        ));
    }
    Ok(MatchExpr::leaf(
        path.clone(),
        LeafTest::In(InSet::new(items.clone(), ctx.comparator().clone())),
    ))
}

pub(super) fn not_in_list(path: &FieldPath, arg: &Value, ctx: &ParseContext) -> Result<MatchExpr> {
    Ok(MatchExpr::not(in_list(path, arg, ctx)?))
}

pub(super) fn exists(path: &FieldPath, arg: &Value, _ctx: &ParseContext) -> Result<MatchExpr> {
    let exists = MatchExpr::leaf(path.clone(), LeafTest::Exists);
    Ok(if arg.is_truthy() { exists } else { MatchExpr::not(exists) })
}

pub(super) fn type_of(path: &FieldPath, arg: &Value, _ctx: &ParseContext) -> Result<MatchExpr> {
    let types = match arg {
        Value::Array(items) if items.is_empty() => {
            return Err(ParseError::FailedToParse(
                "$type must match at least one type".to_string(),
            ));
        }
        Value::Array(items) => items
            .iter()
            .map(type_set)
            .try_fold(TypeSet::empty(), |acc, set| set.map(|s| acc | s))?,
        single => type_set(single)?,
    };
    Ok(MatchExpr::leaf(path.clone(), LeafTest::Type(types)))
}

fn type_set(value: &Value) -> Result<TypeSet> {
    let value_type = match value {
        Value::String(alias) if alias == "number" => return Ok(TypeSet::NUMBER),
        Value::String(alias) => ValueType::from_alias(alias),
        number if number.is_number() => exact_integer(number)
            .ok()
            .and_then(|code| i32::try_from(code).ok())
            .and_then(ValueType::from_code),
        other => {
            return Err(ParseError::FailedToParse(format!(
                "type must be represented as a number or a string, got {other}"
            )));
        }
    };
    value_type
        .map(TypeSet::of)
        .ok_or_else(|| ParseError::FailedToParse(format!("unknown type name or code: {value}")))
}

pub(super) fn size(path: &FieldPath, arg: &Value, _ctx: &ParseContext) -> Result<MatchExpr> {
    let len = exact_integer(arg)
        .map_err(|err| ParseError::FailedToParse(format!("$size must be a whole number: {err}")))?;
    Ok(MatchExpr::leaf(path.clone(), LeafTest::Size(len)))
}

pub(super) fn all(path: &FieldPath, arg: &Value, ctx: &ParseContext) -> Result<MatchExpr> {
    let Value::Array(items) = arg else {
        return Err(ParseError::FailedToParse(format!("$all needs an array, got {arg}")));
    };
    if items.is_empty() {
        return Ok(MatchExpr::AlwaysFalse);
    }

    let is_elem_match = |item: &Value| {
        matches!(item, Value::Document(doc) if doc.first_key() == Some("$elemMatch"))
    };

    let children = if is_elem_match(&items[0]) {
        items
            .iter()
            .map(|item| match item {
                Value::Document(doc) if is_elem_match(item) => {
                    parse_operator_document(path, doc, ctx)
                }
                _ => Err(ParseError::FailedToParse(
                    "$all/$elemMatch has to be consistent".to_string(),
                )),
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        items
            .iter()
            .map(|item| match item {
                Value::Document(doc) if is_operator_document(doc) => Err(ParseError::FailedToParse(
                    "no $ expressions in $all".to_string(),
                )),
                _ => Ok(equality(path.clone(), item.clone(), ctx)),
            })
            .collect::<Result<Vec<_>>>()?
    };

    Ok(MatchExpr::and_of(children))
}

/// Value form when the argument's first key is a field-level operator,
/// object form otherwise. Both compile under the nested context.
pub(super) fn elem_match(path: &FieldPath, arg: &Value, ctx: &ParseContext) -> Result<MatchExpr> {
    let Value::Document(doc) = arg else {
        return Err(ParseError::FailedToParse(format!(
            "$elemMatch needs an object, got {arg}"
        )));
    };
    let nested = ctx.nested();

    let value_form = doc
        .first_key()
        .is_some_and(|k| k.starts_with('$') && !is_top_level_operator(k));

    if value_form {
        let sub = parse_operator_document(&FieldPath::empty(), doc, &nested)?;
        Ok(MatchExpr::ElemMatchValue {
            path: path.clone(),
            sub: Box::new(sub),
        })
    } else {
        let sub = parse_document(doc, &nested)?;
        Ok(MatchExpr::ElemMatchObject {
            path: path.clone(),
            sub: Box::new(sub),
        })
    }
}

pub(super) fn not(path: &FieldPath, arg: &Value, ctx: &ParseContext) -> Result<MatchExpr> {
    match arg {
        Value::Document(doc) if is_operator_document(doc) => {
            Ok(MatchExpr::not(parse_operator_document(path, doc, ctx)?))
        }
        Value::Document(doc) if doc.is_empty() => Err(ParseError::FailedToParse(
            "$not cannot be empty".to_string(),
        )),
        _ => Err(ParseError::FailedToParse(format!(
            "$not needs an operator object, got {arg}"
        ))),
    }
}

pub(super) fn modulo(path: &FieldPath, arg: &Value, _ctx: &ParseContext) -> Result<MatchExpr> {
    let (divisor, remainder) = match arg {
        Value::Array(items) if items.len() == 2 => (&items[0], &items[1]),
        Value::Array(items) if items.len() < 2 => {
            return Err(ParseError::FailedToParse(
                "malformed mod, not enough elements".to_string(),
            ));
        }
        Value::Array(_) => {
            return Err(ParseError::FailedToParse(
                "malformed mod, too many elements".to_string(),
            ));
        }
        _ => {
            return Err(ParseError::FailedToParse(
                "malformed mod, needs to be an array".to_string(),
            ));
        }
    };

    let number = |v: &Value, what: &str| {
        truncate_to_i64(v).ok_or_else(|| {
            ParseError::FailedToParse(format!("malformed mod, {what} not a number: {v}"))
        })
    };
    let divisor = number(divisor, "divisor")?;
    let remainder = number(remainder, "remainder")?;
    if divisor == 0 {
        return Err(ParseError::FailedToParse(
            "divisor cannot be 0".to_string(),
        ));
    }

    Ok(MatchExpr::leaf(path.clone(), LeafTest::Mod { divisor, remainder }))
}

/// `$regex` with its sibling `$options`, if any.
pub(super) fn regex(
    path: &FieldPath,
    pattern: &Value,
    options: Option<&Value>,
) -> Result<MatchExpr> {
    let Value::String(pattern) = pattern else {
        return Err(ParseError::FailedToParse(format!(
            "$regex has to be a string, got {pattern}"
        )));
    };
    let options = match options {
        None => String::new(),
        Some(Value::String(options)) => options.clone(),
        Some(other) => {
            return Err(ParseError::FailedToParse(format!(
                "$options has to be a string, got {other}"
            )));
        }
    };

    let mut builder = RegexBuilder::new(pattern);
    for flag in options.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            other => {
                return Err(ParseError::FailedToParse(format!(
                    "invalid flag in regex options: {other}"
                )));
            }
        };
    }
    let regex = builder
        .build()
        .map_err(|err| ParseError::FailedToParse(format!("invalid regex {pattern:?}: {err}")))?;

    Ok(MatchExpr::leaf(
        path.clone(),
        LeafTest::Regex(RegexTest {
            regex,
            pattern: pattern.clone(),
            options,
        }),
    ))
}
