//! Compiled match expressions.
//!
//! A [`MatchExpr`] is produced by [`crate::parser::parse`] and is well typed
//! by construction: every argument has already been validated, so
//! [`MatchExpr::matches`] is total.

mod eval;
pub mod leaf;

use crate::path::FieldPath;
pub use leaf::{CompareOp, Comparison, InSet, LeafTest, RegexTest, TypeSet};

#[derive(Debug, Clone)]
pub enum MatchExpr {
    And(Vec<MatchExpr>),
    Or(Vec<MatchExpr>),
    Nor(Vec<MatchExpr>),
    Not(Box<MatchExpr>),
    /// Produced by `$all: []`.
    AlwaysFalse,

    /// A predicate on the value(s) found at `path`.
    Leaf { path: FieldPath, test: LeafTest },

    /// `$elemMatch` whose argument is a sub-filter over document elements.
    ElemMatchObject { path: FieldPath, sub: Box<MatchExpr> },
    /// `$elemMatch` whose argument is a set of operators applied to each element.
    ElemMatchValue { path: FieldPath, sub: Box<MatchExpr> },
    /// `$_internalSchemaObjectMatch`.
    ObjectMatch { path: FieldPath, sub: Box<MatchExpr> },

    /// `$where` accepted under the no-op extension policy.
    Where { code: String },
    /// `$text` accepted under the no-op extension policy.
    Text(TextQuery),
    /// `$isolated` / `$atomic`.
    Isolated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuery {
    pub search: String,
    pub language: Option<String>,
    pub case_sensitive: bool,
    pub diacritic_sensitive: bool,
}

impl MatchExpr {
    /// Conjunction of `children`, collapsing the single-child case.
    pub fn and_of(mut children: Vec<MatchExpr>) -> MatchExpr {
        if children.len() == 1 {
            children.remove(0)
        } else {
            MatchExpr::And(children)
        }
    }

    pub fn leaf(path: FieldPath, test: LeafTest) -> MatchExpr {
        MatchExpr::Leaf { path, test }
    }

    pub fn not(child: MatchExpr) -> MatchExpr {
        MatchExpr::Not(Box::new(child))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            MatchExpr::And(_) => "$and",
            MatchExpr::Or(_) => "$or",
            MatchExpr::Nor(_) => "$nor",
            MatchExpr::Not(_) => "$not",
            MatchExpr::AlwaysFalse => "$alwaysFalse",
            MatchExpr::Leaf { test, .. } => test.operator_name(),
            MatchExpr::ElemMatchObject { .. } | MatchExpr::ElemMatchValue { .. } => "$elemMatch",
            MatchExpr::ObjectMatch { .. } => "$_internalSchemaObjectMatch",
            MatchExpr::Where { .. } => "$where",
            MatchExpr::Text(_) => "$text",
            MatchExpr::Isolated => "$isolated",
        }
    }

    /// Direct children of logical and sub-filter nodes.
    pub fn children(&self) -> Vec<&MatchExpr> {
        match self {
            MatchExpr::And(c) | MatchExpr::Or(c) | MatchExpr::Nor(c) => c.iter().collect(),
            MatchExpr::Not(c) => vec![c.as_ref()],
            MatchExpr::ElemMatchObject { sub, .. }
            | MatchExpr::ElemMatchValue { sub, .. }
            | MatchExpr::ObjectMatch { sub, .. } => vec![sub.as_ref()],
            _ => Vec::new(),
        }
    }

    /// Whether the tree requests isolated execution.
    pub fn is_isolated(&self) -> bool {
        matches!(self, MatchExpr::Isolated) || self.children().iter().any(|c| c.is_isolated())
    }
}
