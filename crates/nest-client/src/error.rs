//! Errors raised by [`crate::NestClient`].
//!
//! Non-success HTTP statuses are not errors; callers inspect
//! [`crate::ApiResponse::status`] themselves.

use thiserror::Error;

use crate::auth::AuthError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("{method} {url} failed: {source}")]
    Transport {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to encode request payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to build NEST HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}
