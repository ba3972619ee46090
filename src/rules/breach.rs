//! Breach rule - checks the password against a public breach corpus.

use super::Rule;
use crate::breach::{range_contains, BreachLookup, HashParts};
use crate::error::{ErrorKind, LookupError};

/// Password does not appear in the breach corpus behind `lookup`.
pub struct NotBreached<'a> {
    lookup: &'a dyn BreachLookup,
}

impl<'a> NotBreached<'a> {
    pub fn new(lookup: &'a dyn BreachLookup) -> Self {
        Self { lookup }
    }
}

impl Rule for NotBreached<'_> {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Breached
    }

    fn evaluate(&self, password: &str) -> Result<bool, LookupError> {
        let parts = HashParts::of(password);
        let body = self.lookup.range(parts.prefix())?;
        let breached = range_contains(&body, parts.suffix());

        #[cfg(feature = "tracing")]
        {
            if breached {
                tracing::info!("Password hash found in breach range {}", parts.prefix());
            }
        }

        Ok(!breached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breach::stub::StubLookup;
    use crate::catalog::MessageCatalog;
    use crate::error::ValidationError;
    use secrecy::SecretString;

    #[test]
    fn test_not_breached_positive() {
        let lookup = StubLookup::returning(
            "63A05C0ED0176787A4F1574FF0075F7521E:10556095\n\r7387376AFD1B3DAB553D439C8A7D7CDDED1:3",
        );
        let pwd = SecretString::new("qwerty".to_string().into());
        let result = NotBreached::new(&lookup)
            .check(&pwd, &MessageCatalog::default())
            .unwrap();
        assert!(result.is_valid());
        assert!(result.error().is_none());
        assert_eq!(lookup.calls(), 1);
    }

    #[test]
    fn test_not_breached_negative() {
        let lookup = StubLookup::returning(
            "73A05C0ED0176787A4F1574FF0075F7521E:10556095\n\r7387376AFD1B3DAB553D439C8A7D7CDDED1:3",
        );
        let catalog = MessageCatalog::default();
        let pwd = SecretString::new("qwerty".to_string().into());
        let result = NotBreached::new(&lookup).check(&pwd, &catalog).unwrap();
        assert!(!result.is_valid());
        assert_eq!(
            result.error(),
            Some(&ValidationError::new(
                ErrorKind::Breached,
                catalog.message(ErrorKind::Breached)
            ))
        );
    }

    #[test]
    fn test_lookup_failure_is_not_a_verdict() {
        let lookup = StubLookup::failing(LookupError::Status(503));
        let rule = NotBreached::new(&lookup);
        assert_eq!(rule.evaluate("qwerty"), Err(LookupError::Status(503)));
    }
}
