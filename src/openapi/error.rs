//! API description error types

/// Errors raised while obtaining or parsing an API description.
#[derive(Debug, thiserror::Error)]
pub enum DescriptionError {
    #[error("Failed to load API description from {path}: {reason}{}", .hint.as_ref().map(|h| format!("\n Hint: {}", h)).unwrap_or_default())]
    LoadError {
        path: String,
        reason: String,
        hint: Option<String>,
    },

    #[error("Malformed API description: {0}")]
    Malformed(String),
}

impl DescriptionError {
    /// Attach an actionable hint to the error
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        let hint_val = Some(hint.into());
        if let DescriptionError::LoadError { ref mut hint, .. } = self {
            *hint = hint_val;
        }
        self
    }
}
