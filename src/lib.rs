//! Password validation library
//!
//! This library checks a password against six independent rules: a digit,
//! a special character, an uppercase letter, a lowercase letter, a minimum
//! length and absence from a public breach corpus. Failures are reported with
//! messages taken from a replaceable catalog.
//!
//! # Features
//!
//! - `async` (default): Enables channel-based validation with cancellation support
//! - `hibp` (default): Enables the Have I Been Pwned range API client
//! - `tracing`: Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! - `PWD_MESSAGES_PATH`: Custom path to the message catalog
//!   (default: `./assets/messages.yaml`)
//! - `PWD_BREACH_API_URL`: Custom breach API base URL
//!   (default: `https://api.pwnedpasswords.com`)
//!
//! # Example
//!
//! ```rust,no_run
//! use pwd_validators::{init_catalog, validate_password};
//! use secrecy::SecretString;
//!
//! // Load custom messages (optional, call once at startup)
//! let _ = init_catalog();
//!
//! let password = SecretString::new("MyP@ssw0rd!".to_string().into());
//! match validate_password(&password) {
//!     Ok(validation) if validation.is_valid() => println!("Password accepted"),
//!     Ok(validation) => {
//!         for error in validation.errors().unwrap_or_default() {
//!             println!("{}", error);
//!         }
//!     }
//!     Err(e) => println!("Could not check breach corpus: {}", e),
//! }
//! ```

// Internal modules
mod breach;
mod catalog;
mod error;
mod rules;
mod validator;

// Public API
pub use breach::{get_breach_api_url, range_contains, BreachLookup, HashParts, BREACH_API_URL};
pub use catalog::{
    get_catalog_path, global_catalog, init_catalog, init_catalog_from_path, CatalogError,
    MessageCatalog,
};
pub use error::{ErrorKind, LookupError, ValidationError};
pub use rules::{
    LowercasePresence, MinimumLength, NotBreached, NumberPresence, Rule, RuleResult,
    SpecialCharacterPresence, UppercasePresence, DEFAULT_MIN_LENGTH,
};
pub use validator::{CheckMode, PasswordValidator, RuleKind, Validation};

#[cfg(feature = "hibp")]
pub use breach::HibpClient;

#[cfg(feature = "async")]
pub use error::CheckError;

#[cfg(feature = "async")]
pub use validator::validate_password_tx;

/// Validates a password with the process-wide catalog against the breach API
/// configured by `PWD_BREACH_API_URL`.
#[cfg(feature = "hibp")]
pub fn validate_password(password: &secrecy::SecretString) -> Result<Validation, LookupError> {
    let lookup = HibpClient::from_env()?;
    PasswordValidator::new(global_catalog(), std::sync::Arc::new(lookup)).validate(password)
}
