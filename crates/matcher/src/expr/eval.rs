use super::MatchExpr;
use crate::path::{Root, Traversal};
use model::{Document, Value};

impl MatchExpr {
    /// Whether `doc` satisfies this expression.
    pub fn matches(&self, doc: &Document) -> bool {
        self.eval(Root::Document(doc))
    }

    /// Evaluates the expression against a bare value, as the per-element
    /// predicates of a value-form `$elemMatch` are.
    pub fn matches_value(&self, value: &Value) -> bool {
        self.eval(Root::Value(value))
    }

    fn eval(&self, root: Root<'_>) -> bool {
        match self {
            MatchExpr::And(children) => children.iter().all(|c| c.eval(root)),
            MatchExpr::Or(children) => children.iter().any(|c| c.eval(root)),
            MatchExpr::Nor(children) => !children.iter().any(|c| c.eval(root)),
            MatchExpr::Not(child) => !child.eval(root),
            MatchExpr::AlwaysFalse => false,

            MatchExpr::Leaf { path, test } => {
                path.any_match(root, test.traversal(), &mut |value| match value {
                    Some(v) => test.matches_value(v),
                    None => test.matches_missing(),
                })
            }

            MatchExpr::ElemMatchObject { path, sub } => {
                path.any_match(root, Traversal::WholeValue, &mut |value| match value {
                    Some(Value::Array(items)) => items.iter().any(|item| match item {
                        Value::Document(doc) => sub.matches(doc),
                        _ => false,
                    }),
                    _ => false,
                })
            }

            MatchExpr::ElemMatchValue { path, sub } => {
                path.any_match(root, Traversal::WholeValue, &mut |value| match value {
                    Some(Value::Array(items)) => {
                        items.iter().any(|item| sub.eval(Root::Value(item)))
                    }
                    _ => false,
                })
            }

            MatchExpr::ObjectMatch { path, sub } => {
                path.any_match(root, Traversal::ExpandLeafArrays, &mut |value| match value {
                    Some(Value::Document(doc)) => sub.matches(doc),
                    _ => false,
                })
            }

            MatchExpr::Where { .. } | MatchExpr::Text(_) | MatchExpr::Isolated => true,
        }
    }
}
