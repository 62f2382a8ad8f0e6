use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Unknown date-range filter requested by the caller
    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),

    /// Malformed or inverted date range
    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    /// Payout state-machine violation, including lost-update races
    #[error("Illegal payout transition: {0}")]
    IllegalTransition(String),

    /// Unknown report output format requested by the caller
    #[error("Unsupported report format: {0}")]
    UnsupportedFormat(String),

    /// Internal report rendering failure; the cause is logged, not exposed
    #[error("Report generation failed: {0}")]
    ReportGeneration(String),

    /// Validation errors for business rules
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        HttpResponse::build(status_code).json(serde_json::json!({
            "error": {
                "message": error_message,
                "code": status_code.as_u16(),
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnsupportedFilter(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidRange(_) => StatusCode::BAD_REQUEST,
            AppError::IllegalTransition(_) => StatusCode::CONFLICT,
            AppError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            AppError::ReportGeneration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn unsupported_filter(kind: impl Into<String>) -> Self {
        AppError::UnsupportedFilter(kind.into())
    }

    pub fn invalid_range(msg: impl Into<String>) -> Self {
        AppError::InvalidRange(msg.into())
    }

    pub fn illegal_transition(msg: impl Into<String>) -> Self {
        AppError::IllegalTransition(msg.into())
    }

    pub fn unsupported_format(kind: impl Into<String>) -> Self {
        AppError::UnsupportedFormat(kind.into())
    }

    pub fn report_generation(msg: impl Into<String>) -> Self {
        AppError::ReportGeneration(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
