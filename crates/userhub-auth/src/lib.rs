//! UserHub Auth — credential hashing, RS256 token issuance/verification,
//! field validation policy and the identity workflow built on top of
//! them.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;
pub mod validator;

pub use config::AuthConfig;
pub use error::AuthError;
pub use password::{Argon2Hasher, CredentialHasher};
pub use service::{IdentityService, LoginInput, LoginOutput, RegisterInput, RegisterOutput};
pub use token::{TokenClaims, TokenService};
pub use validator::{FieldError, Validator};
