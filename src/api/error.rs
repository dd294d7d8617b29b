//! API error types for catalog and deployment calls

use std::fmt;

/// Errors that can occur when talking to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Connection, timeout or transport failure
    NetworkError { provider: String, message: String },
    /// Non-success HTTP status
    HttpError {
        provider: String,
        status: u16,
        message: String,
    },
    /// Response body did not match the expected shape
    DecodeError { provider: String, message: String },
}

impl ApiError {
    /// Get the provider name for this error
    pub fn provider_name(&self) -> &str {
        match self {
            ApiError::NetworkError { provider, .. } => provider,
            ApiError::HttpError { provider, .. } => provider,
            ApiError::DecodeError { provider, .. } => provider,
        }
    }

    /// HTTP status, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Create a network error for a provider
    pub fn network(provider: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::NetworkError {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP error for a provider
    pub fn http(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        ApiError::HttpError {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Create a decode error for a provider
    pub fn decode(provider: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::DecodeError {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NetworkError { provider, message } => {
                write!(f, "{}: Network error - {}", provider, message)
            }
            ApiError::HttpError {
                provider,
                status,
                message,
            } => {
                if message.is_empty() {
                    write!(f, "{}: HTTP {}", provider, status)
                } else {
                    write!(f, "{}: HTTP {} - {}", provider, status, message)
                }
            }
            ApiError::DecodeError { provider, message } => {
                write!(f, "{}: Unexpected response - {}", provider, message)
            }
        }
    }
}

impl std::error::Error for ApiError {}
