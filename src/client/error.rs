use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response carrying the server's error envelope.
    #[error("API error {status} {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Rejected locally before any request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    /// A form submission is already in flight.
    #[error("A submission is already pending")]
    Busy,
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    /// Message suitable for a form-level error line.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::Parse(format!("invalid url: {err}"))
    }
}
