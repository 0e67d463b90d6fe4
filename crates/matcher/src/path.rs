use model::{Document, Value};
use std::fmt;

/// Dot-separated location inside a document (e.g. `a.b.0.c`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    dotted: String,
    segments: Vec<String>,
}

/// How the value found at the end of a path is presented to a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// The value itself, then each element if it is an array.
    ExpandLeafArrays,
    /// The value itself only.
    WholeValue,
}

/// Where evaluation starts: a candidate document, or a bare array element
/// (for the predicates of a value-form `$elemMatch`).
#[derive(Debug, Clone, Copy)]
pub(crate) enum Root<'a> {
    Document(&'a Document),
    Value(&'a Value),
}

impl FieldPath {
    pub fn new(dotted: &str) -> Self {
        Self {
            dotted: dotted.to_string(),
            segments: dotted.split('.').map(|s| s.to_string()).collect(),
        }
    }

    /// The path that names the evaluation root itself.
    pub fn empty() -> Self {
        Self {
            dotted: String::new(),
            segments: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.dotted
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Resolves the path from `root` and reports whether `pred` holds for any
    /// value reached. `pred` receives `None` wherever the path is missing.
    pub(crate) fn any_match<F>(&self, root: Root<'_>, traversal: Traversal, pred: &mut F) -> bool
    where
        F: FnMut(Option<&Value>) -> bool,
    {
        match root {
            // An element is tested as-is; its own elements are not expanded.
            Root::Value(value) if self.is_empty() => pred(Some(value)),
            Root::Value(value) => walk_value(value, &self.segments, traversal, pred),
            Root::Document(doc) => match self.segments.split_first() {
                Some((head, rest)) => match doc.get(head) {
                    Some(child) => walk_value(child, rest, traversal, pred),
                    None => pred(None),
                },
                None => pred(None),
            },
        }
    }
}

fn walk_value<F>(value: &Value, segments: &[String], traversal: Traversal, pred: &mut F) -> bool
where
    F: FnMut(Option<&Value>) -> bool,
{
    let Some((head, rest)) = segments.split_first() else {
        return visit_leaf(value, traversal, pred);
    };

    match value {
        Value::Document(doc) => match doc.get(head) {
            Some(child) => walk_value(child, rest, traversal, pred),
            None => pred(None),
        },
        Value::Array(items) => walk_array(items, head, rest, traversal, pred),
        _ => pred(None),
    }
}

/// An array in the middle of a path: a numeric segment indexes into it, and
/// every document element is searched for the segment as a field name.
fn walk_array<F>(
    items: &[Value],
    head: &str,
    rest: &[String],
    traversal: Traversal,
    pred: &mut F,
) -> bool
where
    F: FnMut(Option<&Value>) -> bool,
{
    let mut reached = false;
    let index = array_index(head);

    if let Some(element) = index.and_then(|i| items.get(i)) {
        reached = true;
        if walk_value(element, rest, traversal, pred) {
            return true;
        }
    }

    for item in items {
        if let Value::Document(doc) = item {
            let hit = match doc.get(head) {
                Some(child) => {
                    reached = true;
                    walk_value(child, rest, traversal, pred)
                }
                // An index segment is not "missing" from the elements it didn't address.
                None if index.is_some() => false,
                None => {
                    reached = true;
                    pred(None)
                }
            };
            if hit {
                return true;
            }
        }
    }

    !reached && pred(None)
}

fn visit_leaf<F>(value: &Value, traversal: Traversal, pred: &mut F) -> bool
where
    F: FnMut(Option<&Value>) -> bool,
{
    if pred(Some(value)) {
        return true;
    }
    match (traversal, value) {
        (Traversal::ExpandLeafArrays, Value::Array(items)) => {
            items.iter().any(|item| pred(Some(item)))
        }
        _ => false,
    }
}

/// `"0"`, `"12"`; not `"01"`, `"-1"` or `""`.
fn array_index(segment: &str) -> Option<usize> {
    let canonical = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if canonical { segment.parse().ok() } else { None }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dotted)
    }
}
