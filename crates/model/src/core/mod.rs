pub mod convert;
pub mod data_type;
pub mod document;
pub mod error;
pub mod identifiers;
pub mod value;
