use crate::{
    collation::{SimpleComparator, StringComparator},
    error::{ParseError, Result},
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, sync::Arc};

/// Operators that only make sense at the root of a full filter.
pub const TOP_LEVEL_ONLY: [&str; 4] = ["$isolated", "$atomic", "$where", "$text"];

/// Operators whose behaviour is supplied by the embedding executor.
pub const EXTENSION_OPERATORS: [&str; 2] = ["$where", "$text"];

/// What to do with extension operators (`$where`, `$text`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionsPolicy {
    /// Reject them with `BadValue`.
    #[default]
    Disallow,
    /// Validate their arguments and compile them into placeholders that match
    /// every document.
    Noop,
}

/// Parser configuration. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    pub extensions: ExtensionsPolicy,
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            extensions: ExtensionsPolicy::Disallow,
            max_depth: 100,
        }
    }
}

/// Which operators the parser may accept at the current nesting level.
///
/// Contexts are never mutated. Every narrowing step (`restrict`, `nested`,
/// `descend`) returns a new context, so a restriction made on the way down
/// holds for everything below it.
#[derive(Debug, Clone)]
pub struct ParseContext {
    disallowed: BTreeSet<String>,
    extensions: ExtensionsPolicy,
    comparator: Arc<dyn StringComparator>,
    depth_remaining: usize,
}

impl ParseContext {
    pub fn new(options: &ParserOptions) -> Self {
        Self::with_comparator(options, Arc::new(SimpleComparator))
    }

    pub fn with_comparator(options: &ParserOptions, comparator: Arc<dyn StringComparator>) -> Self {
        Self {
            disallowed: BTreeSet::new(),
            extensions: options.extensions,
            comparator,
            depth_remaining: options.max_depth,
        }
    }

    /// A copy of this context that also rejects `keyword`.
    pub fn restrict(&self, keyword: &str) -> Self {
        let mut next = self.clone();
        next.disallowed.insert(keyword.to_string());
        next
    }

    /// The context for a sub-filter that is not the root of the query.
    pub fn nested(&self) -> Self {
        TOP_LEVEL_ONLY
            .iter()
            .fold(self.clone(), |ctx, keyword| ctx.restrict(keyword))
    }

    pub fn is_allowed(&self, keyword: &str) -> bool {
        if self.disallowed.contains(keyword) {
            return false;
        }
        !(self.extensions == ExtensionsPolicy::Disallow && EXTENSION_OPERATORS.contains(&keyword))
    }

    pub fn extensions(&self) -> ExtensionsPolicy {
        self.extensions
    }

    pub fn comparator(&self) -> &Arc<dyn StringComparator> {
        &self.comparator
    }

    pub(crate) fn check_allowed(&self, keyword: &str) -> Result<()> {
        if self.is_allowed(keyword) {
            return Ok(());
        }

        if self.disallowed.contains(keyword) && TOP_LEVEL_ONLY.contains(&keyword) {
            Err(ParseError::BadValue(format!(
                "{keyword} can only be applied to the top-level document"
            )))
        } else {
            Err(ParseError::BadValue(format!(
                "{keyword} is not allowed in this context"
            )))
        }
    }

    /// Consumes one level of the nesting budget.
    pub(crate) fn descend(&self) -> Result<Self> {
        let depth_remaining = self.depth_remaining.checked_sub(1).ok_or_else(|| {
            ParseError::BadValue("filter exceeds the maximum allowed nesting depth".to_string())
        })?;
        Ok(Self {
            depth_remaining,
            ..self.clone()
        })
    }
}

impl Default for ParseContext {
    fn default() -> Self {
        Self::new(&ParserOptions::default())
    }
}
