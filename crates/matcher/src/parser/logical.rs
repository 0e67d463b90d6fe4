use super::parse_document;
use crate::{
    context::ParseContext,
    error::{ParseError, Result},
    expr::{MatchExpr, TextQuery},
};
use model::Value;

/// Operators that are only meaningful as keys of a whole filter.
pub(crate) const TOP_LEVEL_OPERATORS: [&str; 8] = [
    "$and", "$or", "$nor", "$where", "$text", "$comment", "$isolated", "$atomic",
];

pub(crate) fn is_top_level_operator(keyword: &str) -> bool {
    TOP_LEVEL_OPERATORS.contains(&keyword)
}

/// `None` for operators that contribute no node (`$comment`).
pub(crate) fn parse_top_level(
    keyword: &str,
    arg: &Value,
    ctx: &ParseContext,
) -> Result<Option<MatchExpr>> {
    let expr = match keyword {
        "$and" => MatchExpr::And(clauses(keyword, arg, ctx)?),
        "$or" => MatchExpr::Or(clauses(keyword, arg, ctx)?),
        "$nor" => MatchExpr::Nor(clauses(keyword, arg, ctx)?),
        "$where" => match arg {
            Value::String(code) => MatchExpr::Where { code: code.clone() },
            other => {
                return Err(ParseError::FailedToParse(format!(
                    "$where argument must be a string, got {other}"
                )));
            }
        },
        "$text" => MatchExpr::Text(text_query(arg)?),
        "$comment" => return Ok(None),
        "$isolated" | "$atomic" => MatchExpr::Isolated,
        _ => {
            return Err(ParseError::BadValue(format!(
                "unknown top level operator: {keyword}"
            )));
        }
    };
    Ok(Some(expr))
}

fn clauses(keyword: &str, arg: &Value, ctx: &ParseContext) -> Result<Vec<MatchExpr>> {
    let items = match arg {
        Value::Array(items) if !items.is_empty() => items,
        Value::Array(_) => {
            return Err(ParseError::FailedToParse(format!(
                "{keyword} argument must be a non-empty array"
            )));
        }
        _ => {
            return Err(ParseError::FailedToParse(format!(
                "{keyword} argument must be an array"
            )));
        }
    };

    items
        .iter()
        .map(|item| match item {
            Value::Document(doc) => parse_document(doc, ctx),
            _ => Err(ParseError::FailedToParse(format!(
                "{keyword} argument's entries must be objects"
            ))),
        })
        .collect()
}

fn text_query(arg: &Value) -> Result<TextQuery> {
    let Value::Document(doc) = arg else {
        return Err(ParseError::FailedToParse(
            "$text expects an object".to_string(),
        ));
    };

    let mut search = None;
    let mut query = TextQuery {
        search: String::new(),
        language: None,
        case_sensitive: false,
        diacritic_sensitive: false,
    };

    for (key, value) in doc.iter() {
        match (key, value) {
            ("$search", Value::String(s)) => search = Some(s.clone()),
            ("$language", Value::String(s)) => query.language = Some(s.clone()),
            ("$caseSensitive", Value::Boolean(b)) => query.case_sensitive = *b,
            ("$diacriticSensitive", Value::Boolean(b)) => query.diacritic_sensitive = *b,
            ("$search" | "$language" | "$caseSensitive" | "$diacriticSensitive", other) => {
                return Err(ParseError::FailedToParse(format!(
                    "$text {key} has the wrong type: {other}"
                )));
            }
            _ => {
                return Err(ParseError::FailedToParse(format!(
                    "unrecognized $text field: {key}"
                )));
            }
        }
    }

    query.search = search.ok_or_else(|| {
        ParseError::FailedToParse("$text requires a $search string".to_string())
    })?;
    Ok(query)
}
