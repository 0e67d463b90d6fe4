//! Compiles filter documents into match expressions and evaluates them
//! against candidate documents.
//!
//! ```text
//! filter + ParseContext --parse--> MatchExpr --matches(doc)--> bool
//! ```
//!
//! A compiled [`MatchExpr`] is immutable and `Send + Sync`; compile once and
//! share it across as many evaluating threads as needed.

pub mod collation;
pub mod context;
pub mod error;
pub mod expr;
pub mod numeric;
pub mod parser;
pub mod path;

pub use collation::{CaseInsensitiveComparator, SimpleComparator, StringComparator};
pub use context::{ExtensionsPolicy, ParseContext, ParserOptions};
pub use error::{ErrorKind, ParseError, Result};
pub use expr::MatchExpr;
pub use parser::parse;
pub use path::FieldPath;
