//! Authentication error types.

use thiserror::Error;
use userhub_core::error::UserHubError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User not found.")]
    UserNotFound,

    #[error("Wrong password")]
    WrongPassword,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("key material error: {0}")]
    KeyLoad(String),

    #[error("signing error: {0}")]
    Signing(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for UserHubError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UserNotFound
            | AuthError::WrongPassword
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => UserHubError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::KeyLoad(msg) => UserHubError::KeyMaterial(msg),
            AuthError::Signing(msg) | AuthError::Crypto(msg) => UserHubError::Crypto(msg),
        }
    }
}
