//! Length rule - checks password minimum length.

use super::Rule;
use crate::error::{ErrorKind, LookupError};

pub const DEFAULT_MIN_LENGTH: usize = 8;

/// Password holds at least `min_length` characters (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimumLength {
    min_length: usize,
}

impl MinimumLength {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }
}

impl Default for MinimumLength {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LENGTH)
    }
}

impl Rule for MinimumLength {
    fn kind(&self) -> ErrorKind {
        ErrorKind::TooShort
    }

    fn evaluate(&self, password: &str) -> Result<bool, LookupError> {
        Ok(password.chars().count() >= self.min_length)
    }
}
