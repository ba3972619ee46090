//! Password rules
//!
//! Each rule checks one independent policy and reports a pass/fail verdict.

mod breach;
mod length;
mod variety;

pub use breach::NotBreached;
pub use length::{MinimumLength, DEFAULT_MIN_LENGTH};
pub use variety::{LowercasePresence, NumberPresence, SpecialCharacterPresence, UppercasePresence};

use secrecy::{ExposeSecret, SecretString};

use crate::catalog::MessageCatalog;
use crate::error::{ErrorKind, LookupError, ValidationError};

/// A single password policy.
pub trait Rule {
    /// Failure kind reported when the password does not satisfy this rule.
    fn kind(&self) -> ErrorKind;

    /// Returns `Ok(true)` when the password satisfies the rule.
    ///
    /// Only the breach rule can return `Err`, when its lookup service fails.
    fn evaluate(&self, password: &str) -> Result<bool, LookupError>;

    /// Evaluates the rule once and captures the verdict.
    fn check(
        &self,
        password: &SecretString,
        catalog: &MessageCatalog,
    ) -> Result<RuleResult, LookupError> {
        RuleResult::evaluate(self, password, catalog)
    }
}

/// Verdict of one rule on one password.
///
/// `error` is present exactly when `is_valid` is false.
#[derive(Debug)]
pub struct RuleResult {
    password: SecretString,
    is_valid: bool,
    error: Option<ValidationError>,
}

impl RuleResult {
    pub fn evaluate<R: Rule + ?Sized>(
        rule: &R,
        password: &SecretString,
        catalog: &MessageCatalog,
    ) -> Result<Self, LookupError> {
        let pwd = password.expose_secret();
        let is_valid = rule.evaluate(pwd)?;
        let error = (!is_valid).then(|| catalog.error(rule.kind()));
        Ok(Self {
            password: SecretString::new(pwd.into()),
            is_valid,
            error,
        })
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    pub fn into_error(self) -> Option<ValidationError> {
        self.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_result_valid_has_no_error() {
        let pwd = SecretString::new("qwerty1.!".to_string().into());
        let result = NumberPresence
            .check(&pwd, &MessageCatalog::default())
            .unwrap();
        assert!(result.is_valid());
        assert!(result.error().is_none());
        assert_eq!(result.password().expose_secret(), "qwerty1.!");
    }

    #[test]
    fn test_rule_result_invalid_carries_catalog_error() {
        let catalog = MessageCatalog::parse("ValidationError:\n  has_number_validator: Add a digit\n").unwrap();
        let pwd = SecretString::new("qwerty.!".to_string().into());
        let result = RuleResult::evaluate(&NumberPresence, &pwd, &catalog).unwrap();
        assert!(!result.is_valid());
        assert_eq!(
            result.into_error(),
            Some(ValidationError::new(ErrorKind::NoNumber, "Add a digit"))
        );
    }

    #[test]
    fn test_rule_result_through_trait_object() {
        let rule: Box<dyn Rule> = Box::new(MinimumLength::default());
        let pwd = SecretString::new("qwerty".to_string().into());
        let result = rule.check(&pwd, &MessageCatalog::default()).unwrap();
        assert!(!result.is_valid());
        assert_eq!(result.error().map(ValidationError::kind), Some(ErrorKind::TooShort));
    }
}
