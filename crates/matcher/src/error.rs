use std::fmt;
use thiserror::Error;

/// Error taxonomy shared with the surrounding command layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An operator is well formed but not permitted where it appears.
    BadValue,
    /// An operator argument has the wrong type, shape or value.
    FailedToParse,
    /// Count-based limits of the command layer. Never raised by the matcher.
    InvalidLength,
}

impl ErrorKind {
    pub fn code(self) -> i32 {
        match self {
            ErrorKind::BadValue => 2,
            ErrorKind::FailedToParse => 9,
            ErrorKind::InvalidLength => 342,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::BadValue => "BadValue",
            ErrorKind::FailedToParse => "FailedToParse",
            ErrorKind::InvalidLength => "InvalidLength",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("BadValue: {0}")]
    BadValue(String),

    #[error("FailedToParse: {0}")]
    FailedToParse(String),

    #[error("InvalidLength: {0}")]
    InvalidLength(String),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::BadValue(_) => ErrorKind::BadValue,
            ParseError::FailedToParse(_) => ErrorKind::FailedToParse,
            ParseError::InvalidLength(_) => ErrorKind::InvalidLength,
        }
    }

    pub fn code(&self) -> i32 {
        self.kind().code()
    }

    pub fn message(&self) -> &str {
        match self {
            ParseError::BadValue(m)
            | ParseError::FailedToParse(m)
            | ParseError::InvalidLength(m) => m,
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_message() {
        let err = ParseError::FailedToParse("$size needs a number".to_string());
        assert_eq!(err.kind(), ErrorKind::FailedToParse);
        assert_eq!(err.code(), 9);
        assert_eq!(err.message(), "$size needs a number");
        assert_eq!(err.to_string(), "FailedToParse: $size needs a number");
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ErrorKind::BadValue.code(), 2);
        assert_eq!(ErrorKind::InvalidLength.code(), 342);
        assert_eq!(
            ParseError::InvalidLength("batch".into()).kind(),
            ErrorKind::InvalidLength
        );
    }
}
