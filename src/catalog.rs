//! Message catalog management module
//!
//! Handles loading the human-readable messages attached to rule failures.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use serde::Deserialize;
use thiserror::Error;

use crate::error::{ErrorKind, ValidationError};

static CATALOG: RwLock<Option<Arc<MessageCatalog>>> = RwLock::new(None);

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Message catalog file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read message catalog file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Message catalog file is empty")]
    EmptyFile,
    #[error("Failed to parse message catalog: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// On-disk layout of the catalog.
#[derive(Debug, Deserialize)]
struct MessageFile {
    #[serde(rename = "ValidationError", default)]
    validation_error: HashMap<String, String>,
}

/// Read-only mapping from rule failure kind to its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCatalog {
    messages: HashMap<ErrorKind, String>,
    loaded: usize,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        let messages = ErrorKind::ALL
            .into_iter()
            .map(|kind| (kind, default_message(kind).to_string()))
            .collect();
        Self { messages, loaded: 0 }
    }
}

fn default_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NoNumber => "Password must contain at least one number",
        ErrorKind::NoSpecialCharacter => "Password must contain at least one special character",
        ErrorKind::NoUppercase => "Password must contain at least one uppercase letter",
        ErrorKind::NoLowercase => "Password must contain at least one lowercase letter",
        ErrorKind::TooShort => "Password is not long enough",
        ErrorKind::Breached => "Password has appeared in a known data breach",
    }
}

impl MessageCatalog {
    /// Parses a YAML catalog:
    ///
    /// ```text
    /// ValidationError:
    ///   has_number_validator: "Add a digit"
    /// ```
    ///
    /// Kinds absent from `text` keep their built-in message; unknown keys are
    /// ignored.
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let file: MessageFile = serde_yaml::from_str(text)?;
        let mut catalog = Self::default();
        for (key, message) in file.validation_error {
            match ErrorKind::from_key(&key) {
                Some(kind) => {
                    catalog.messages.insert(kind, message);
                    catalog.loaded += 1;
                }
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Ignoring unknown message catalog key: {}", key);
                }
            }
        }
        Ok(catalog)
    }

    /// Number of messages taken from the parsed file rather than the defaults.
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn message(&self, kind: ErrorKind) -> &str {
        self.messages
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| default_message(kind))
    }

    /// Builds the failure reported by the rule of the given kind.
    pub fn error(&self, kind: ErrorKind) -> ValidationError {
        ValidationError::new(kind, self.message(kind))
    }
}

/// Returns the message catalog file path.
///
/// Priority:
/// 1. Environment variable `PWD_MESSAGES_PATH`
/// 2. Default path `./assets/messages.yaml`
pub fn get_catalog_path() -> PathBuf {
    std::env::var("PWD_MESSAGES_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./assets/messages.yaml"))
}

/// Initializes the process-wide message catalog from external file.
///
/// Set `PWD_MESSAGES_PATH` to specify a custom location, otherwise
/// `./assets/messages.yaml` is used. Returns the number of messages read
/// from the file.
///
/// # Errors
///
/// Returns error if the file does not exist, cannot be read, is empty or is
/// not valid YAML.
pub fn init_catalog() -> Result<usize, CatalogError> {
    let path = get_catalog_path();
    init_catalog_from_path(&path)
}

/// Initializes the process-wide message catalog from a specific file path.
pub fn init_catalog_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<usize, CatalogError> {
    // Idempotent: once loaded, later calls are no-ops
    {
        let guard = CATALOG.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(catalog) = guard.as_ref() {
            return Ok(catalog.loaded());
        }
    }

    let path = path.as_ref();

    if !path.exists() {
        #[cfg(feature = "tracing")]
        tracing::error!("Message catalog initialization FAILED: FileNotFound {:?}", path);
        return Err(CatalogError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;

    if content.trim().is_empty() {
        #[cfg(feature = "tracing")]
        tracing::error!("Message catalog initialization FAILED: Empty file {:?}", path);
        return Err(CatalogError::EmptyFile);
    }

    let catalog = MessageCatalog::parse(&content)?;
    let count = catalog.loaded();
    {
        let mut guard = CATALOG.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::new(catalog));
    }

    #[cfg(feature = "tracing")]
    tracing::info!("Message catalog initialized: {} messages from {:?}", count, path);

    Ok(count)
}

/// Returns the process-wide catalog, or the built-in messages when
/// [`init_catalog`] has not been called.
pub fn global_catalog() -> Arc<MessageCatalog> {
    let guard = CATALOG.read().unwrap_or_else(PoisonError::into_inner);
    guard
        .clone()
        .unwrap_or_else(|| Arc::new(MessageCatalog::default()))
}

/// Resets the catalog for testing purposes.
#[cfg(test)]
pub fn reset_catalog_for_testing() {
    let mut guard = CATALOG.write().unwrap_or_else(PoisonError::into_inner);
    *guard = None;
}
