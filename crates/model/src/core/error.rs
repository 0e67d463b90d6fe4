use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("expected a JSON object at the document root, got {0}")]
    NotADocument(String),

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),
}
