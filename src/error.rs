use crate::openapi::DescriptionError;
use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// JSON path or configuration key that caused the error (e.g., "candidates[0].content.parts")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "function_call_client", "bridge_config")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the bridge.
///
/// Operations excluded by the converter are not errors; they are reported in
/// [`crate::schema::ConversionReport`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid model provider credential: {reason}")]
    InvalidCredential { reason: String },

    #[error("Model provider returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Malformed model response: {message}{}", format_context(.context))]
    MalformedResponse {
        message: String,
        context: ErrorContext,
    },

    #[error("Malformed input: {message}{}", format_context(.context))]
    MalformedInput {
        message: String,
        context: ErrorContext,
    },

    #[error("Missing required argument '{argument}' for operation '{operation}'")]
    MissingArgument { operation: String, argument: String },

    #[error("No operation is registered for function '{name}'")]
    UnknownFunction { name: String },

    #[error("Duplicate operationId '{operation_id}' in API description")]
    DuplicateOperation { operation_id: String },

    #[error("Operation '{operation}' failed with HTTP {status}: {body}")]
    Dispatch {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("API description error: {0}")]
    Description(#[from] DescriptionError),

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a malformed model response error with structured context
    pub fn malformed_response(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::MalformedResponse {
            message: msg.into(),
            context,
        }
    }

    /// Create a malformed input error with structured context
    pub fn malformed_input(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::MalformedInput {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::MalformedResponse { context, .. }
            | Error::MalformedInput { context, .. }
            | Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }

    /// HTTP status carried by the error, if the failure came from a remote peer.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } | Error::Dispatch { status, .. } => Some(*status),
            Error::Transport(TransportError::Http(e)) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether a caller-side retry may succeed.
    ///
    /// Nothing in this crate retries on its own; this only classifies the
    /// failure for callers that wrap `get_function_call` or `dispatch`.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::Upstream { status, .. } | Error::Dispatch { status, .. } => {
                *status == 429 || (500..600).contains(status)
            }
            _ => false,
        }
    }
}
