// src/application/error_handling.rs
//
// Error Handling for Commands
//
// ARCHITECTURE:
// - Maps internal errors → user-friendly responses
// - Provides consistent error format for UI
// - Logs errors for debugging
//
// Resolution failures are NOT errors here: they travel as ResolutionOutcome.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Standard error response for UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories for UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Invalid input/validation error (400)
    Validation,

    /// Domain invariant violation (422)
    DomainError,

    /// Bad configuration
    Configuration,

    /// Analysis backend error (502)
    ExternalService,

    /// File system error (500)
    FileSystem,

    /// Other/unknown error (500)
    Internal,
}

impl ErrorResponse {
    fn new(error_type: ErrorType, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error_type,
            message: message.into(),
            details,
        }
    }

    /// Create error response from AppError
    pub fn from_app_error(error: AppError) -> Self {
        match error {
            AppError::Domain(domain_error) => Self::new(
                ErrorType::DomainError,
                "Domain validation failed",
                Some(domain_error.to_string()),
            ),

            AppError::Config(message) => {
                log::error!("Configuration error: {}", message);
                Self::new(ErrorType::Configuration, "Invalid configuration", Some(message))
            }

            AppError::Serialization(serde_error) => {
                log::error!("Serialization error: {:?}", serde_error);
                Self::new(ErrorType::Internal, "Data serialization failed", None)
            }

            AppError::Io(io_error) => {
                log::error!("IO error: {:?}", io_error);
                Self::new(
                    ErrorType::FileSystem,
                    "File system operation failed",
                    Some(io_error.to_string()),
                )
            }

            AppError::Http(http_error) => {
                log::error!("HTTP error: {:?}", http_error);
                Self::new(
                    ErrorType::ExternalService,
                    "External service error",
                    Some(http_error.to_string()),
                )
            }

            AppError::Backend { status } => {
                log::error!("Analysis backend returned status: {}", status);
                Self::new(
                    ErrorType::ExternalService,
                    "External service error",
                    Some(format!("status {}", status)),
                )
            }

            AppError::Other(message) => {
                log::error!("Other error: {}", message);
                Self::new(ErrorType::Internal, message, None)
            }
        }
    }

    /// Create validation error
    pub fn validation(message: String) -> Self {
        Self::new(ErrorType::Validation, message, None)
    }

    /// Serialized form handed back to the webview
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "Internal error".to_string())
    }
}

/// Helper trait to convert Results to ErrorResponse
pub trait ToErrorResponse<T> {
    fn to_error_response(self) -> Result<T, String>;
}

impl<T> ToErrorResponse<T> for Result<T, AppError> {
    fn to_error_response(self) -> Result<T, String> {
        self.map_err(|e| ErrorResponse::from_app_error(e).to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error() {
        let error = ErrorResponse::from_app_error(AppError::Domain(
            crate::domain::DomainError::InvariantViolation("unresolved drop".to_string()),
        ));
        assert_eq!(error.error_type, ErrorType::DomainError);
        assert!(error.details.unwrap().contains("unresolved drop"));
    }

    #[test]
    fn test_validation_error() {
        let error = ErrorResponse::validation("Path must not be empty".to_string());
        assert_eq!(error.error_type, ErrorType::Validation);
        assert_eq!(error.message, "Path must not be empty");
    }

    #[test]
    fn test_backend_failure_is_external_service() {
        let error = ErrorResponse::from_app_error(AppError::Backend {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        });
        assert_eq!(error.error_type, ErrorType::ExternalService);
        assert!(error.details.unwrap().contains("500"));
    }

    #[test]
    fn test_other_error_is_internal_whatever_it_says() {
        let error = ErrorResponse::from_app_error(AppError::Other(
            "Analysis backend mentioned in passing".to_string(),
        ));
        assert_eq!(error.error_type, ErrorType::Internal);
    }

    #[test]
    fn test_result_conversion_serializes() {
        let result: Result<(), AppError> = Err(AppError::Config("bad timeout".to_string()));
        let json = result.to_error_response().unwrap_err();
        assert!(json.contains("\"error_type\":\"configuration\""));
        assert!(json.contains("bad timeout"));
    }
}
