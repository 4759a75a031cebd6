//! Error types for the UserHub system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserHubError {
    #[error("Validation failed: {}", messages.join("; "))]
    Validation { messages: Vec<String> },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Key material error: {0}")]
    KeyMaterial(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),
}

impl UserHubError {
    /// Messages safe to hand back to the caller.
    ///
    /// Validation failures keep every field message; storage and key
    /// failures collapse to a single opaque message.
    pub fn messages(&self) -> Vec<String> {
        match self {
            UserHubError::Validation { messages } => messages.clone(),
            UserHubError::Conflict { message } => vec![message.clone()],
            UserHubError::AuthenticationFailed { reason } => vec![reason.clone()],
            UserHubError::NotFound { .. } => vec![self.to_string()],
            UserHubError::Database(_)
            | UserHubError::KeyMaterial(_)
            | UserHubError::Crypto(_) => vec!["Internal server error".to_string()],
        }
    }

    /// `true` for failures the caller cannot correct (storage, keys,
    /// crypto primitives).
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            UserHubError::Database(_)
                | UserHubError::KeyMaterial(_)
                | UserHubError::Crypto(_)
        )
    }
}

pub type UserHubResult<T> = Result<T, UserHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_keeps_every_message() {
        let err = UserHubError::Validation {
            messages: vec!["full_name: too short".into(), "password: weak".into()],
        };
        assert_eq!(err.messages().len(), 2);
        assert!(!err.is_internal());
    }

    #[test]
    fn internal_errors_are_opaque() {
        for err in [
            UserHubError::Database("connection reset by peer".into()),
            UserHubError::KeyMaterial("keys/jwt_private.pem: permission denied".into()),
            UserHubError::Crypto("invalid hash format".into()),
        ] {
            assert_eq!(err.messages(), vec!["Internal server error".to_string()]);
            assert!(err.is_internal());
        }
    }

    #[test]
    fn authentication_reason_is_passed_through() {
        let err = UserHubError::AuthenticationFailed {
            reason: "Wrong password".into(),
        };
        assert_eq!(err.messages(), vec!["Wrong password".to_string()]);
    }
}
