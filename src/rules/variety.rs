//! Character variety rules - uppercase, lowercase, numbers, special chars.

use super::Rule;
use crate::error::{ErrorKind, LookupError};

/// At least one ASCII digit `0`-`9`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberPresence;

/// At least one character that is neither a letter nor a digit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecialCharacterPresence;

/// At least one uppercase letter.
#[derive(Debug, Clone, Copy, Default)]
pub struct UppercasePresence;

/// At least one lowercase letter.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercasePresence;

impl Rule for NumberPresence {
    fn kind(&self) -> ErrorKind {
        ErrorKind::NoNumber
    }

    fn evaluate(&self, password: &str) -> Result<bool, LookupError> {
        Ok(password.chars().any(|c| c.is_ascii_digit()))
    }
}

impl Rule for SpecialCharacterPresence {
    fn kind(&self) -> ErrorKind {
        ErrorKind::NoSpecialCharacter
    }

    fn evaluate(&self, password: &str) -> Result<bool, LookupError> {
        Ok(password.chars().any(|c| !c.is_alphanumeric()))
    }
}

impl Rule for UppercasePresence {
    fn kind(&self) -> ErrorKind {
        ErrorKind::NoUppercase
    }

    fn evaluate(&self, password: &str) -> Result<bool, LookupError> {
        Ok(password.chars().any(char::is_uppercase))
    }
}

impl Rule for LowercasePresence {
    fn kind(&self) -> ErrorKind {
        ErrorKind::NoLowercase
    }

    fn evaluate(&self, password: &str) -> Result<bool, LookupError> {
        Ok(password.chars().any(char::is_lowercase))
    }
}
