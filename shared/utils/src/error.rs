use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fields::DecodeError;

#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum FieldmarkError {
    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Missing file: {message}")]
    MissingFile { message: String },

    #[error("Unsupported file type: {filename}")]
    UnsupportedFileType { filename: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl FieldmarkError {
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn missing_file(message: impl Into<String>) -> Self {
        Self::MissingFile {
            message: message.into(),
        }
    }

    pub fn unsupported_file_type(filename: impl Into<String>) -> Self {
        Self::UnsupportedFileType {
            filename: filename.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Decode { .. } => "DECODE_ERROR",
            Self::MissingFile { .. } => "MISSING_FILE",
            Self::UnsupportedFileType { .. } => "UNSUPPORTED_FILE_TYPE",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Decode { .. } => 422,
            Self::MissingFile { .. } => 400,
            Self::UnsupportedFileType { .. } => 400,
            Self::Validation { .. } => 400,
            Self::Configuration { .. } => 500,
            Self::Internal { .. } => 500,
        }
    }

    /// Short message safe to show to the uploader.
    pub fn public_message(&self) -> String {
        match self {
            Self::Decode { .. } => "Failed to parse CSV file".to_string(),
            Self::MissingFile { message } => message.clone(),
            Self::UnsupportedFileType { .. } => "Invalid file type".to_string(),
            Self::Validation { .. } => self.to_string(),
            Self::Configuration { .. } | Self::Internal { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}

pub type FieldmarkResult<T> = Result<T, FieldmarkError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl From<FieldmarkError> for ErrorResponse {
    fn from(error: FieldmarkError) -> Self {
        let details = match &error {
            FieldmarkError::Decode { message } => Some(serde_json::json!({ "cause": message })),
            _ => None,
        };
        Self {
            error: error.public_message(),
            code: error.error_code().to_string(),
            message: error.to_string(),
            details,
        }
    }
}

impl From<DecodeError> for FieldmarkError {
    fn from(error: DecodeError) -> Self {
        Self::decode(error.to_string())
    }
}

impl From<serde_json::Error> for FieldmarkError {
    fn from(error: serde_json::Error) -> Self {
        Self::validation("JSON", error.to_string())
    }
}

impl From<config::ConfigError> for FieldmarkError {
    fn from(error: config::ConfigError) -> Self {
        Self::configuration(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_maps_to_unprocessable() {
        let error: FieldmarkError = DecodeError::InvalidEncoding { line: Some(3) }.into();
        assert_eq!(error.error_code(), "DECODE_ERROR");
        assert_eq!(error.http_status_code(), 422);

        let response = ErrorResponse::from(error);
        assert_eq!(response.error, "Failed to parse CSV file");
        assert!(response.details.is_some());
    }

    #[test]
    fn test_upload_rejections_are_client_errors() {
        assert_eq!(FieldmarkError::missing_file("No file part").http_status_code(), 400);
        assert_eq!(
            FieldmarkError::unsupported_file_type("notes.pdf").http_status_code(),
            400
        );
        let response = ErrorResponse::from(FieldmarkError::missing_file("No selected file"));
        assert_eq!(response.error, "No selected file");
        assert_eq!(response.code, "MISSING_FILE");
    }
}
