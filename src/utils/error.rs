use crate::domain::ports::{AuthError, ProviderError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Place search failed: {0}")]
    ProviderError(#[from] ProviderError),

    #[error("Authentication failed: {0}")]
    AuthError(#[from] AuthError),

    #[error("Location access is not authorized")]
    LocationUnauthorized,
}

/// 錯誤分類，用於日誌與 CLI 輸出
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Validation,
    Storage,
    Authentication,
    Permission,
}

/// 錯誤嚴重程度，CLI 依此決定退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::HttpError(_) | AppError::ProviderError(_) => ErrorCategory::Network,
            AppError::IoError(_) | AppError::SerializationError(_) => ErrorCategory::Storage,
            AppError::ConfigValidationError { .. }
            | AppError::MissingConfigError { .. }
            | AppError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            AppError::ValidationError { .. } => ErrorCategory::Validation,
            AppError::AuthError(_) => ErrorCategory::Authentication,
            AppError::LocationUnauthorized => ErrorCategory::Permission,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Permission => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Authentication => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::HttpError(_) | AppError::ProviderError(_) => {
                "No se pudo contactar al servicio remoto".to_string()
            }
            AppError::AuthError(e) => crate::core::auth::auth_error_message(e),
            AppError::LocationUnauthorized => {
                "Se necesita permiso de ubicación para buscar lugares cercanos".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the network connection and try again",
            ErrorCategory::Configuration => "Review the configuration file and CLI flags",
            ErrorCategory::Validation => "Correct the input values and retry",
            ErrorCategory::Storage => "Check that the data directory exists and is writable",
            ErrorCategory::Authentication => "Verify the credentials or the API key",
            ErrorCategory::Permission => "Grant location permission in the configuration",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            AppError::validation("bad radius").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            AppError::MissingConfigError {
                field: "auth.api_key".to_string()
            }
            .severity(),
            ErrorSeverity::High
        );
        assert_eq!(
            AppError::ProviderError(ProviderError::NoNetwork("offline".into())).category(),
            ErrorCategory::Network
        );
    }

    #[test]
    fn test_user_friendly_message_for_auth_error() {
        let err = AppError::AuthError(AuthError::Backend {
            code: "EMAIL_EXISTS".to_string(),
            message: "EMAIL_EXISTS".to_string(),
        });
        assert!(err.user_friendly_message().contains("ya está registrado"));
    }
}
