//! Error types shared by every rule and by the composite validator.

use std::fmt;
use thiserror::Error;

/// Identifies which rule rejected a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NoNumber,
    NoSpecialCharacter,
    NoUppercase,
    NoLowercase,
    TooShort,
    Breached,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 6] = [
        ErrorKind::NoNumber,
        ErrorKind::NoSpecialCharacter,
        ErrorKind::NoUppercase,
        ErrorKind::NoLowercase,
        ErrorKind::TooShort,
        ErrorKind::Breached,
    ];

    /// Key of this kind in the message catalog.
    pub fn key(self) -> &'static str {
        match self {
            ErrorKind::NoNumber => "has_number_validator",
            ErrorKind::NoSpecialCharacter => "has_special_character",
            ErrorKind::NoUppercase => "has_upper_characters",
            ErrorKind::NoLowercase => "has_lower_characters",
            ErrorKind::TooShort => "long_enough",
            ErrorKind::Breached => "leaked_password",
        }
    }

    /// Reverse of [`ErrorKind::key`].
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single rule failure.
///
/// Two errors are equal when they render the same, i.e. same kind and same message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ValidationError {
    kind: ErrorKind,
    message: String,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The breach-lookup service could not be consulted.
///
/// This is not a policy failure: a password whose lookup failed is neither
/// known to be breached nor known to be safe.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Breach lookup request failed: {0}")]
    Transport(String),
    #[error("Breach lookup returned HTTP status {0}")]
    Status(u16),
    #[error("Breach lookup response could not be read: {0}")]
    Body(String),
    #[error("Invalid breach lookup base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Failure of an asynchronous validation.
#[cfg(feature = "async")]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("Validation cancelled")]
    Cancelled,
    #[error("Validation task failed: {0}")]
    TaskFailed(String),
}
