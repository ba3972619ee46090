//! Composite password validator - runs every rule against one password.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

#[cfg(feature = "async")]
use tokio::sync::mpsc;

#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

use crate::breach::BreachLookup;
use crate::catalog::MessageCatalog;
#[cfg(feature = "async")]
use crate::error::CheckError;
use crate::error::{LookupError, ValidationError};
use crate::rules::{
    self, LowercasePresence, MinimumLength, NumberPresence, Rule, RuleResult,
    SpecialCharacterPresence, UppercasePresence, DEFAULT_MIN_LENGTH,
};

/// Identifies one of the rules run by [`PasswordValidator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Number,
    Length,
    Special,
    Upper,
    Lower,
    NotBreached,
}

impl RuleKind {
    /// Order in which rules run and errors are reported.
    pub const DEFAULT_ORDER: [RuleKind; 6] = [
        RuleKind::Number,
        RuleKind::Length,
        RuleKind::Special,
        RuleKind::Upper,
        RuleKind::Lower,
        RuleKind::NotBreached,
    ];
}

/// How far a validation runs once a rule has failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckMode {
    /// Stop at the first failing rule. Later rules, the breach lookup
    /// included, are never evaluated.
    Fast,
    /// Evaluate every rule and report every failure.
    #[default]
    Exhaustive,
}

/// Outcome of a validation.
///
/// `errors` is `None` when the password is valid, otherwise the failures in
/// rule order: all of them in [`CheckMode::Exhaustive`], only the first one
/// in [`CheckMode::Fast`].
#[derive(Debug)]
pub struct Validation {
    password: SecretString,
    rules: Vec<RuleKind>,
    is_valid: bool,
    errors: Option<Vec<ValidationError>>,
}

impl Validation {
    fn new(
        password: &SecretString,
        rules: &[RuleKind],
        is_valid: bool,
        errors: Vec<ValidationError>,
    ) -> Self {
        Self {
            password: SecretString::new(password.expose_secret().into()),
            rules: rules.to_vec(),
            is_valid,
            errors: (!is_valid).then_some(errors),
        }
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn rules(&self) -> &[RuleKind] {
        &self.rules
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> Option<&[ValidationError]> {
        self.errors.as_deref()
    }

    pub fn into_errors(self) -> Option<Vec<ValidationError>> {
        self.errors
    }
}

/// Runs the fixed rule list with an injected catalog and breach lookup.
pub struct PasswordValidator {
    catalog: Arc<MessageCatalog>,
    lookup: Arc<dyn BreachLookup>,
    min_length: usize,
    rules: Vec<RuleKind>,
}

impl PasswordValidator {
    pub fn new(catalog: Arc<MessageCatalog>, lookup: Arc<dyn BreachLookup>) -> Self {
        Self {
            catalog,
            lookup,
            min_length: DEFAULT_MIN_LENGTH,
            rules: RuleKind::DEFAULT_ORDER.to_vec(),
        }
    }

    /// Overrides the minimum length used by [`RuleKind::Length`].
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn rules(&self) -> &[RuleKind] {
        &self.rules
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    fn rule(&self, kind: RuleKind) -> Box<dyn Rule + '_> {
        match kind {
            RuleKind::Number => Box::new(NumberPresence),
            RuleKind::Length => Box::new(MinimumLength::new(self.min_length)),
            RuleKind::Special => Box::new(SpecialCharacterPresence),
            RuleKind::Upper => Box::new(UppercasePresence),
            RuleKind::Lower => Box::new(LowercasePresence),
            RuleKind::NotBreached => Box::new(rules::NotBreached::new(self.lookup.as_ref())),
        }
    }

    fn check_rule(&self, kind: RuleKind, password: &SecretString) -> Result<RuleResult, LookupError> {
        self.rule(kind).check(password, &self.catalog)
    }

    /// Single pass over the rule list; each rule is evaluated at most once.
    ///
    /// `before_rule` runs ahead of every rule and can abort the pass.
    fn run<E: From<LookupError>>(
        &self,
        password: &SecretString,
        mode: CheckMode,
        mut before_rule: impl FnMut(RuleKind) -> Result<(), E>,
    ) -> Result<Validation, E> {
        let mut is_valid = true;
        let mut errors = Vec::new();
        for &kind in &self.rules {
            before_rule(kind)?;
            let result = self.check_rule(kind, password)?;
            if result.is_valid() {
                continue;
            }
            is_valid = false;
            errors.extend(result.into_error());
            if mode == CheckMode::Fast {
                #[cfg(feature = "tracing")]
                tracing::debug!("Password rejected by {:?}, skipping remaining rules", kind);
                break;
            }
        }
        Ok(Validation::new(password, &self.rules, is_valid, errors))
    }

    /// Validates in the given mode.
    pub fn check(&self, password: &SecretString, mode: CheckMode) -> Result<Validation, LookupError> {
        self.run(password, mode, |_| Ok::<(), LookupError>(()))
    }

    /// Fast check: stops at the first failing rule.
    ///
    /// The breach lookup, last in the list, is skipped whenever a local rule
    /// already rejects the password.
    pub fn is_valid(&self, password: &SecretString) -> Result<bool, LookupError> {
        Ok(self.check(password, CheckMode::Fast)?.is_valid())
    }

    /// Exhaustive check: runs every rule and returns all failures in rule order.
    pub fn collect_errors(&self, password: &SecretString) -> Result<Vec<ValidationError>, LookupError> {
        Ok(self
            .check(password, CheckMode::Exhaustive)?
            .into_errors()
            .unwrap_or_default())
    }

    /// Verdict plus the complete error list, from one exhaustive pass.
    ///
    /// Every rule, the breach lookup included, is evaluated exactly once.
    pub fn validate(&self, password: &SecretString) -> Result<Validation, LookupError> {
        self.check(password, CheckMode::Exhaustive)
    }

    #[cfg(feature = "async")]
    fn check_cancellable(
        &self,
        password: &SecretString,
        mode: CheckMode,
        token: &CancellationToken,
    ) -> Result<Validation, CheckError> {
        self.run(password, mode, |_kind| {
            if token.is_cancelled() {
                #[cfg(feature = "tracing")]
                tracing::info!("Password validation cancelled before {:?}", _kind);
                return Err(CheckError::Cancelled);
            }
            Ok(())
        })
    }
}

/// Async version that runs the validation on a blocking task and sends the
/// result via channel.
///
/// The token is checked before each rule.
#[cfg(feature = "async")]
pub async fn validate_password_tx(
    validator: Arc<PasswordValidator>,
    password: SecretString,
    mode: CheckMode,
    token: CancellationToken,
    tx: mpsc::Sender<Result<Validation, CheckError>>,
) {
    #[cfg(feature = "tracing")]
    tracing::info!("validation is about to start...");

    let outcome = tokio::task::spawn_blocking(move || {
        validator.check_cancellable(&password, mode, &token)
    })
    .await
    .unwrap_or_else(|e| {
        #[cfg(feature = "tracing")]
        tracing::error!("Password validation task failed: {}", e);
        Err(CheckError::TaskFailed(e.to_string()))
    });

    if let Err(_e) = tx.send(outcome).await {
        #[cfg(feature = "tracing")]
        tracing::error!("Failed to send password validation result: {}", _e);
    }
}
