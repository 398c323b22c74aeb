use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeneratorError>;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("GEMINI_API_KEY or GOOGLE_API_KEY not found in environment variables")]
    MissingCredential,

    #[error("image service request failed: {0}")]
    Service(String),

    #[error("no image data found in response{}", finish_reason_suffix(.finish_reason))]
    NoImageProduced { finish_reason: Option<String> },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl GeneratorError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    /// Whether the failure was raised before any request left the process.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::MissingCredential | Self::Config(_)
        )
    }
}

fn finish_reason_suffix(finish_reason: &Option<String>) -> String {
    finish_reason
        .as_deref()
        .map(|reason| format!(" (finish reason: {reason})"))
        .unwrap_or_default()
}

impl From<reqwest::Error> for GeneratorError {
    fn from(value: reqwest::Error) -> Self {
        Self::Service(value.to_string())
    }
}

impl From<serde_json::Error> for GeneratorError {
    fn from(value: serde_json::Error) -> Self {
        Self::Service(format!("malformed response body: {value}"))
    }
}

impl From<anyhow::Error> for GeneratorError {
    fn from(value: anyhow::Error) -> Self {
        Self::Config(format!("{value:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_errors_are_detected_locally() {
        assert!(GeneratorError::invalid_input("empty prompt").is_precondition());
        assert!(GeneratorError::MissingCredential.is_precondition());
        assert!(!GeneratorError::service("boom").is_precondition());
        assert!(!GeneratorError::NoImageProduced { finish_reason: None }.is_precondition());
    }

    #[test]
    fn missing_image_message_carries_finish_reason() {
        let blocked = GeneratorError::NoImageProduced {
            finish_reason: Some("SAFETY".to_string()),
        };
        assert_eq!(
            blocked.to_string(),
            "no image data found in response (finish reason: SAFETY)"
        );

        let silent = GeneratorError::NoImageProduced { finish_reason: None };
        assert_eq!(silent.to_string(), "no image data found in response");
    }

    #[test]
    fn anyhow_context_chain_is_preserved() {
        let err: GeneratorError = anyhow::anyhow!("bad port")
            .context("parsing config/app_config.toml")
            .into();
        assert_eq!(
            err.to_string(),
            "configuration error: parsing config/app_config.toml: bad port"
        );
    }
}
