//! Error taxonomy for the login flow.
//!
//! Every per-request variant is terminal: the handler answers with an error status and
//! no session is issued. [`AuthError::Config`] only occurs while building configuration
//! at startup.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// State cookie missing, state query parameter missing, or the two differ.
    #[error("OAuth state mismatch")]
    CsrfMismatch,

    /// The provider rejected the authorization code, or the token request failed.
    #[error("token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// The token was accepted but the user profile could not be retrieved.
    #[error("user fetch failed: {0}")]
    UserFetchFailed(String),

    /// Session cookie present but unsigned, tampered with or corrupt.
    #[error("session cookie could not be decoded")]
    SessionDecodeFailed,

    #[error("session cookie could not be encoded: {0}")]
    SessionEncodeFailed(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
