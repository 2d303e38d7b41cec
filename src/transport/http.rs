use crate::Result;
use reqwest::Proxy;
use std::env;
use std::time::Duration;

/// Default bound on each network round trip.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Header carrying our own correlation id on outgoing requests.
pub const REQUEST_ID_HEADER: &str = "x-fncall-request-id";

/// Knobs for building the underlying `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    /// Per-request timeout. Falls back to `FNCALL_HTTP_TIMEOUT_SECS`, then 30s.
    pub timeout: Option<Duration>,
    /// Proxy for all schemes. Falls back to `FNCALL_PROXY_URL`.
    pub proxy_url: Option<String>,
}

impl TransportOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    fn resolved_timeout(&self) -> Duration {
        self.timeout.unwrap_or_else(|| {
            Duration::from_secs(
                env::var("FNCALL_HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            )
        })
    }
}

/// Status and body of a completed HTTP exchange, regardless of status class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Thin wrapper over a pooled `reqwest::Client` with bounded timeouts.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(options: &TransportOptions) -> Result<Self> {
        let timeout = options.resolved_timeout();

        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(
                env::var("FNCALL_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(32),
            )
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        let proxy_url = options
            .proxy_url
            .clone()
            .or_else(|| env::var("FNCALL_PROXY_URL").ok());
        if let Some(proxy_url) = proxy_url {
            let proxy = Proxy::all(&proxy_url).map_err(|e| {
                TransportError::Other(format!("invalid proxy url '{}': {}", proxy_url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self { client, timeout })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send a request and read the whole body as text.
    ///
    /// Non-2xx statuses are returned, not raised; callers map them to their
    /// own error variant.
    pub async fn send(
        &self,
        request: reqwest::RequestBuilder,
        request_id: Option<&str>,
    ) -> Result<RawResponse> {
        let request = match request_id {
            Some(id) => request.header(REQUEST_ID_HEADER, id),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))?;

        Ok(RawResponse { status, body })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
