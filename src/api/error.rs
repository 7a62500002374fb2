//! API error types for the helpdesk and asset-inventory clients

use thiserror::Error;

/// Errors that can occur during a single call to an external API
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 401 Unauthorized - token invalid or expired
    #[error("{provider}: Unauthorized (401)")]
    Unauthorized { provider: String },

    /// 403 Forbidden - token lacks required permissions
    #[error("{provider}: Forbidden (403) - insufficient permissions")]
    Forbidden { provider: String },

    /// Network, TLS or timeout error before a response arrived
    #[error("{provider}: Network error - {message}")]
    Network { provider: String, message: String },

    /// Any other non-2xx status
    #[error("{provider}: HTTP {status} - {message}")]
    Http {
        provider: String,
        status: u16,
        message: String,
    },

    /// Response body could not be decoded
    #[error("{provider}: Parse error - {message}")]
    Parse { provider: String, message: String },

    /// 2xx response whose envelope reported `success=false`
    #[error("{provider}: Request rejected - {message}")]
    Rejected { provider: String, message: String },

    /// Credential exchange did not yield a token
    #[error("{provider}: Authentication failed - {message}")]
    AuthenticationFailed { provider: String, message: String },
}

impl ApiError {
    /// Check if this is an authentication error (401, 403 or failed credential exchange)
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized { .. }
                | ApiError::Forbidden { .. }
                | ApiError::AuthenticationFailed { .. }
        )
    }

    /// Get the provider name for this error
    pub fn provider_name(&self) -> &str {
        match self {
            ApiError::Unauthorized { provider }
            | ApiError::Forbidden { provider }
            | ApiError::Network { provider, .. }
            | ApiError::Http { provider, .. }
            | ApiError::Parse { provider, .. }
            | ApiError::Rejected { provider, .. }
            | ApiError::AuthenticationFailed { provider, .. } => provider,
        }
    }

    pub fn unauthorized(provider: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            provider: provider.into(),
        }
    }

    pub fn forbidden(provider: impl Into<String>) -> Self {
        ApiError::Forbidden {
            provider: provider.into(),
        }
    }

    pub fn network(provider: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Network {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn http(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        ApiError::Http {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    pub fn parse(provider: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Parse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn rejected(provider: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Rejected {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Convert any error raised while exchanging credentials into `AuthenticationFailed`
    pub fn into_auth_failure(self) -> Self {
        match self {
            ApiError::AuthenticationFailed { .. } => self,
            other => ApiError::AuthenticationFailed {
                provider: other.provider_name().to_string(),
                message: other.to_string(),
            },
        }
    }
}
