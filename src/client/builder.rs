use std::time::Duration;

use super::core::FunctionCallClient;
use super::credential::Credential;
use crate::transport::{HttpTransport, TransportOptions};
use crate::Result;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1";

/// Keyring entry name used when no key is given explicitly.
const KEYRING_PROVIDER: &str = "gemini";

/// Builder for [`FunctionCallClient`].
///
/// Keep this surface area small and predictable.
#[derive(Debug, Default)]
pub struct FunctionCallClientBuilder {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    transport: TransportOptions,
}

impl FunctionCallClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this key instead of the keyring / `GEMINI_API_KEY` lookup.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Model id, e.g. `gemini-1.5-flash`.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Override the provider base URL (primarily for testing with mock servers).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Bound on the provider round trip.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport = self.transport.with_timeout(timeout);
        self
    }

    pub fn proxy_url(mut self, url: impl Into<String>) -> Self {
        self.transport = self.transport.with_proxy_url(url);
        self
    }

    /// Validate the credential, then build the client.
    ///
    /// An empty or placeholder key fails with
    /// [`Error::InvalidCredential`](crate::Error::InvalidCredential) before
    /// any HTTP client is created.
    pub fn build(self) -> Result<FunctionCallClient> {
        let credential = match self.api_key {
            Some(key) => Credential::new(key)?,
            None => Credential::from_environment(KEYRING_PROVIDER)?,
        };

        let transport = HttpTransport::new(&self.transport)?;

        Ok(FunctionCallClient {
            transport,
            credential,
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }
}
