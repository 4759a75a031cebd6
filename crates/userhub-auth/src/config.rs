//! Authentication configuration.

use std::path::PathBuf;

/// Configuration for the token service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Path to the PEM-encoded RSA private key used for signing.
    pub private_key_path: PathBuf,
    /// Path to the PEM-encoded RSA public key used for verification.
    pub public_key_path: PathBuf,
    /// Token lifetime in seconds (default: 86_400 = 24 hours).
    pub token_lifetime_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            private_key_path: PathBuf::from("keys/jwt_private.pem"),
            public_key_path: PathBuf::from("keys/jwt_public.pem"),
            token_lifetime_secs: 86_400,
        }
    }
}
