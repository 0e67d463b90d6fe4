use std::{cmp::Ordering, fmt};

/// String ordering consulted by comparison and membership predicates.
///
/// Implementations are shared by every evaluation of a compiled tree and
/// must be safe for concurrent read-only use.
pub trait StringComparator: fmt::Debug + Send + Sync {
    fn compare(&self, left: &str, right: &str) -> Ordering;
}

/// Binary (code unit) ordering.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleComparator;

impl StringComparator for SimpleComparator {
    fn compare(&self, left: &str, right: &str) -> Ordering {
        left.cmp(right)
    }
}

/// ASCII case-folding ordering.
#[derive(Debug, Default, Clone, Copy)]
pub struct CaseInsensitiveComparator;

impl StringComparator for CaseInsensitiveComparator {
    fn compare(&self, left: &str, right: &str) -> Ordering {
        let l = left.bytes().map(|b| b.to_ascii_lowercase());
        let r = right.bytes().map(|b| b.to_ascii_lowercase());
        l.cmp(r)
    }
}
