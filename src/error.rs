// Error types shared by the forms, the API client and the server

use thiserror::Error;

/// Shown when the prediction API cannot be reached or answers garbage.
pub const CONNECTION_MESSAGE: &str = "Failed to connect to server. Please try again.";

/// Shown when the API rejects a request without saying why.
pub const API_FALLBACK_MESSAGE: &str = "Failed to calculate risk";

/// Shown when a required field is left blank.
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields";

// ============================================================================
// VALIDATION ERROR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{}", MISSING_FIELDS_MESSAGE)]
    Missing { field: String },

    #[error("{label} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        label: String,
        min: f64,
        max: f64,
    },
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Missing { field } => field,
            ValidationError::OutOfRange { field, .. } => field,
        }
    }
}

// ============================================================================
// SCREENING ERROR
// ============================================================================

#[derive(Debug, Error)]
pub enum ScreeningError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("prediction API error: {0}")]
    Api(String),

    #[error("unknown screening: {0}")]
    UnknownForm(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ScreeningError {
    /// Text shown inline under the form
    pub fn user_message(&self) -> String {
        match self {
            ScreeningError::Validation(e) => e.to_string(),
            ScreeningError::Connection(_) => CONNECTION_MESSAGE.to_string(),
            ScreeningError::Api(msg) => msg.clone(),
            ScreeningError::UnknownForm(name) => format!("Unknown screening: {}", name),
            ScreeningError::Config(msg) => msg.clone(),
        }
    }
}

impl From<reqwest::Error> for ScreeningError {
    fn from(err: reqwest::Error) -> Self {
        ScreeningError::Connection(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScreeningError>;
