//! Error types shared by the token store, the auth context and the API client.

use thiserror::Error;

/// Failures reading or writing the persisted token record.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("token store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("token store contents are invalid: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Failures of the OAuth token lifecycle.
///
/// Every variant leaves the auth context in `Unauthenticated`; the user
/// recovers by logging in again.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("state mismatch: the authorization response carried no known state")]
    StateMismatch,

    #[error("token exchange failed: {error}{}", description.as_deref().map(|d| format!(" ({d})")).unwrap_or_default())]
    TokenExchangeFailed {
        error: String,
        description: Option<String>,
    },

    #[error("no refresh token available, please log in again")]
    NoRefreshToken,

    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    /// The short error code used in redirect query parameters.
    pub fn code(&self) -> &str {
        match self {
            AuthError::StateMismatch => "state_mismatch",
            AuthError::TokenExchangeFailed { .. } => "token_exchange_failed",
            AuthError::NoRefreshToken => "no_refresh_token",
            AuthError::RefreshFailed(_) => "refresh_failed",
            AuthError::Store(_) => "token_store_failed",
        }
    }
}

/// Failures of an authenticated Web API call.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("no active Spotify device found, start playback on a device first")]
    NoActiveDevice,

    #[error("API error: {status}")]
    Status { status: u16 },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    /// Whether the failure was an authorization rejection by the provider.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 })
    }
}

/// Missing or malformed configuration values.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}
