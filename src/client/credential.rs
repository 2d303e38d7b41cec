//! Model provider credential lookup and validation.

use keyring::Entry;
use std::env;
use std::fmt;

use crate::{Error, Result};

/// Placeholder left in sample code and config templates.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY";

/// Keyring service under which credentials are looked up.
pub const KEYRING_SERVICE: &str = "api-fncall-bridge";

/// Environment variable consulted after the keyring.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Opaque provider credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Validate and wrap a raw key.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(Error::InvalidCredential {
                reason: "API key is empty".to_string(),
            });
        }
        if raw.trim() == PLACEHOLDER_API_KEY {
            return Err(Error::InvalidCredential {
                reason: format!("API key is still the '{}' placeholder", PLACEHOLDER_API_KEY),
            });
        }
        Ok(Self(raw))
    }

    /// Resolve from the system keyring (`provider` entry), then `GEMINI_API_KEY`.
    pub fn from_environment(provider: &str) -> Result<Self> {
        Self::new(lookup(provider).unwrap_or_default())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

fn lookup(provider: &str) -> Option<String> {
    // 1. Try Keyring
    if let Ok(entry) = Entry::new(KEYRING_SERVICE, provider) {
        if let Ok(key) = entry.get_password() {
            return Some(key);
        }
    }

    // 2. Try Environment Variable
    env::var(API_KEY_ENV).ok()
}
