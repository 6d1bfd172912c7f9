use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrmError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unsupported CRM provider: {provider}")]
    UnsupportedProvider { provider: String },

    #[error("{provider} returned status {status}: {body}")]
    RemoteApiError {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("Unexpected {provider} payload: {context}")]
    UnexpectedPayload { provider: String, context: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidInputError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Internal server error")]
    InternalError,
}

impl CrmError {
    /// Recognized application errors cross the adapter boundary unchanged.
    /// Vendor failures (non-2xx responses, transport errors, malformed
    /// payloads) do not; they are logged with their detail and collapse to
    /// the generic internal error.
    pub fn is_recognized(&self) -> bool {
        matches!(
            self,
            CrmError::UnsupportedProvider { .. }
                | CrmError::InvalidInputError { .. }
                | CrmError::MissingConfigError { .. }
                | CrmError::ConfigValidationError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CrmError>;
