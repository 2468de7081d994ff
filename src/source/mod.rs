//! Source Module - Where raw secret key text comes from
//!
//! A missing value is reported here, before any decoding happens, so callers
//! can tell "not configured" apart from "configured but unreadable".

use std::collections::HashMap;
use thiserror::Error;

/// Variable read when no other name is configured
pub const DEFAULT_VARIABLE_NAME: &str = "PRIVATE_KEY";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Environment variable {name} not found")]
    Missing { name: String },

    #[error("Environment variable {name} is not valid unicode")]
    NotUnicode { name: String },
}

/// Supplies raw secret key text by name
pub trait SecretSource {
    /// Read the value stored under `name`.
    ///
    /// An unset or empty value is [`SourceError::Missing`].
    fn read(&self, name: &str) -> Result<String, SourceError>;
}

/// Reads from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl SecretSource for EnvSource {
    fn read(&self, name: &str) -> Result<String, SourceError> {
        match std::env::var(name) {
            Ok(value) if !value.is_empty() => Ok(value),
            Ok(_) | Err(std::env::VarError::NotPresent) => Err(SourceError::Missing {
                name: name.to_string(),
            }),
            Err(std::env::VarError::NotUnicode(_)) => Err(SourceError::NotUnicode {
                name: name.to_string(),
            }),
        }
    }
}

/// In-memory source, mostly for tests and embedding
#[derive(Clone, Default)]
pub struct MemorySource {
    values: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under `name`
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }
}

impl std::fmt::Debug for MemorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // names only, values are secrets
        f.debug_set().entries(self.values.keys()).finish()
    }
}

impl SecretSource for MemorySource {
    fn read(&self, name: &str) -> Result<String, SourceError> {
        self.values
            .get(name)
            .filter(|value| !value.is_empty())
            .cloned()
            .ok_or_else(|| SourceError::Missing {
                name: name.to_string(),
            })
    }
}
