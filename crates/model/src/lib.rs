//! Value model shared by filters and the documents they are matched against.

pub mod core;

pub use crate::core::{
    data_type::ValueType, document::Document, error::ModelError, identifiers::ObjectId,
    value::Value,
};
