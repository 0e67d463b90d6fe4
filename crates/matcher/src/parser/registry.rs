use super::{leaf, schema};
use crate::{context::ParseContext, error::Result, expr::MatchExpr, path::FieldPath};
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Builds the node for one field-level operator from its argument.
pub type OperatorParser = fn(&FieldPath, &model::Value, &ParseContext) -> Result<MatchExpr>;

/// Field-level operators by keyword. `$regex` and `$options` are compiled as a
/// pair by the operator-document parser and are not listed here.
pub struct OperatorRegistry {
    operators: HashMap<&'static str, OperatorParser>,
}

lazy_static! {
    pub static ref FIELD_OPERATORS: OperatorRegistry = OperatorRegistry::new();
}

impl OperatorRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            operators: HashMap::new(),
        };

        registry.register("$eq", leaf::eq);
        registry.register("$ne", leaf::ne);
        registry.register("$lt", leaf::lt);
        registry.register("$lte", leaf::lte);
        registry.register("$gt", leaf::gt);
        registry.register("$gte", leaf::gte);
        registry.register("$in", leaf::in_list);
        registry.register("$nin", leaf::not_in_list);
        registry.register("$exists", leaf::exists);
        registry.register("$type", leaf::type_of);
        registry.register("$size", leaf::size);
        registry.register("$all", leaf::all);
        registry.register("$elemMatch", leaf::elem_match);
        registry.register("$not", leaf::not);
        registry.register("$mod", leaf::modulo);

        registry.register("$_internalSchemaMinItems", schema::min_items);
        registry.register("$_internalSchemaMaxItems", schema::max_items);
        registry.register("$_internalSchemaUniqueItems", schema::unique_items);
        registry.register("$_internalSchemaObjectMatch", schema::object_match);
        registry.register("$_internalSchemaMinLength", schema::min_length);
        registry.register("$_internalSchemaMaxLength", schema::max_length);

        registry
    }

    pub fn register(&mut self, keyword: &'static str, parser: OperatorParser) {
        self.operators.insert(keyword, parser);
    }

    pub fn get(&self, keyword: &str) -> Option<OperatorParser> {
        self.operators.get(keyword).copied()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.operators.contains_key(keyword)
    }

    pub fn keywords(&self) -> Vec<&'static str> {
        let mut keywords: Vec<_> = self.operators.keys().copied().collect();
        keywords.sort_unstable();
        keywords
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
