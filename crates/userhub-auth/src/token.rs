//! RS256 token issuance and verification.
//!
//! Keys are read from the configured PEM files on every call, so a
//! rotated key pair takes effect without a restart. Tokens are never
//! persisted; validity is the signature plus `exp`.

use std::path::Path;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Only the RSA PKCS#1 v1.5 family is accepted on verification.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];

/// Claims embedded in every token.
///
/// Decoding is strict: a token whose payload lacks one of these fields,
/// or carries one with the wrong type, is rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Account identifier; authoritative for every downstream lookup.
    pub user_id: String,
    pub phone_number: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// Issues and verifies signed tokens.
#[derive(Debug, Clone)]
pub struct TokenService {
    config: AuthConfig,
}

async fn read_key(path: &Path, kind: &str) -> Result<Vec<u8>, AuthError> {
    tokio::fs::read(path).await.map_err(|e| {
        AuthError::KeyLoad(format!(
            "failed to read {kind} key file {}: {e}",
            path.display()
        ))
    })
}

impl TokenService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Token lifetime in seconds.
    pub fn lifetime_secs(&self) -> u64 {
        self.config.token_lifetime_secs
    }

    /// Issue a token for the account, valid for the configured lifetime.
    pub async fn issue(&self, user_id: &str, phone_number: &str) -> Result<String, AuthError> {
        self.issue_at(user_id, phone_number, Utc::now()).await
    }

    /// Issue a token as if it had been created at `issued_at`.
    pub async fn issue_at(
        &self,
        user_id: &str,
        phone_number: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let iat = issued_at.timestamp();
        let exp = i64::try_from(self.config.token_lifetime_secs)
            .ok()
            .and_then(|lifetime| iat.checked_add(lifetime))
            .ok_or_else(|| {
                AuthError::Signing(format!(
                    "token lifetime of {}s overflows the expiry timestamp",
                    self.config.token_lifetime_secs
                ))
            })?;
        let claims = TokenClaims {
            user_id: user_id.to_string(),
            phone_number: phone_number.to_string(),
            iat,
            exp,
        };

        let pem = read_key(&self.config.private_key_path, "private").await?;
        let key = EncodingKey::from_rsa_pem(&pem)
            .map_err(|e| AuthError::KeyLoad(format!("failed to parse private key: {e}")))?;

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify signature, algorithm family and expiry, then decode the
    /// claims.
    pub async fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let pem = read_key(&self.config.public_key_path, "public").await?;
        let key = DecodingKey::from_rsa_pem(&pem)
            .map_err(|e| AuthError::KeyLoad(format!("failed to parse public key: {e}")))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.set_required_spec_claims(&["exp"]);
        validation.leeway = 0;

        jsonwebtoken::decode::<TokenClaims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::Duration;

    use super::*;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    fn test_config() -> AuthConfig {
        AuthConfig {
            private_key_path: fixture("jwt_private.pem"),
            public_key_path: fixture("jwt_public.pem"),
            token_lifetime_secs: 86_400,
        }
    }

    #[tokio::test]
    async fn token_roundtrip() {
        let tokens = TokenService::new(test_config());

        let token = tokens.issue("u1", "+6281234567890").await.unwrap();
        let claims = tokens.verify(&token).await.unwrap();

        assert_eq!(claims.user_id, "u1");
        assert_eq!(claims.phone_number, "+6281234567890");
        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[tokio::test]
    async fn token_is_rs256() {
        let tokens = TokenService::new(test_config());
        let token = tokens.issue("u1", "+6281234567890").await.unwrap();

        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);
    }

    #[tokio::test]
    async fn token_older_than_lifetime_is_expired() {
        let tokens = TokenService::new(test_config());
        let issued_at = Utc::now() - Duration::hours(25);

        let token = tokens.issue_at("u1", "+6281234567890", issued_at).await.unwrap();
        let err = tokens.verify(&token).await.unwrap_err();

        assert!(matches!(err, AuthError::TokenExpired), "got: {err:?}");
    }

    #[tokio::test]
    async fn token_just_inside_lifetime_is_accepted() {
        let tokens = TokenService::new(test_config());
        let issued_at = Utc::now() - Duration::hours(23);

        let token = tokens.issue_at("u1", "+6281234567890", issued_at).await.unwrap();
        assert_eq!(tokens.verify(&token).await.unwrap().user_id, "u1");
    }

    #[tokio::test]
    async fn token_signed_by_other_key_is_rejected() {
        let foreign = TokenService::new(AuthConfig {
            private_key_path: fixture("other_private.pem"),
            public_key_path: fixture("other_public.pem"),
            ..test_config()
        });
        let token = foreign.issue("u1", "+6281234567890").await.unwrap();

        let err = TokenService::new(test_config()).verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid(_)), "got: {err:?}");
    }

    #[tokio::test]
    async fn hmac_token_is_rejected() {
        // Algorithm confusion: an HS256 token keyed with the public key PEM.
        let public_pem = std::fs::read(fixture("jwt_public.pem")).unwrap();
        let claims = TokenClaims {
            user_id: "u1".into(),
            phone_number: "+6281234567890".into(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 3600,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&public_pem),
        )
        .unwrap();

        let err = TokenService::new(test_config()).verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid(_)), "got: {err:?}");
    }

    #[tokio::test]
    async fn malformed_token_is_rejected() {
        let err = TokenService::new(test_config())
            .verify("not.a.token")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid(_)));
    }

    #[tokio::test]
    async fn missing_user_id_claim_is_rejected() {
        #[derive(Serialize)]
        struct Partial {
            phone_number: String,
            iat: i64,
            exp: i64,
        }

        let private_pem = std::fs::read(fixture("jwt_private.pem")).unwrap();
        let now = Utc::now().timestamp();
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &Partial {
                phone_number: "+6281234567890".into(),
                iat: now,
                exp: now + 3600,
            },
            &EncodingKey::from_rsa_pem(&private_pem).unwrap(),
        )
        .unwrap();

        let err = TokenService::new(test_config()).verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid(_)), "got: {err:?}");
    }

    #[tokio::test]
    async fn oversized_lifetime_is_signing_error() {
        for lifetime in [u64::MAX, i64::MAX as u64] {
            let tokens = TokenService::new(AuthConfig {
                token_lifetime_secs: lifetime,
                ..test_config()
            });

            let err = tokens.issue("u1", "+6281234567890").await.unwrap_err();
            assert!(matches!(err, AuthError::Signing(_)), "got: {err:?}");
        }
    }

    #[tokio::test]
    async fn missing_private_key_is_key_load_error() {
        let tokens = TokenService::new(AuthConfig {
            private_key_path: fixture("does_not_exist.pem"),
            ..test_config()
        });

        let err = tokens.issue("u1", "+6281234567890").await.unwrap_err();
        assert!(matches!(err, AuthError::KeyLoad(_)), "got: {err:?}");
    }

    #[tokio::test]
    async fn garbage_public_key_is_key_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public.pem");
        std::fs::write(&path, "-----BEGIN PUBLIC KEY-----\nnope\n-----END PUBLIC KEY-----\n")
            .unwrap();

        let valid = TokenService::new(test_config());
        let token = valid.issue("u1", "+6281234567890").await.unwrap();

        let broken = TokenService::new(AuthConfig {
            public_key_path: path,
            ..test_config()
        });
        let err = broken.verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::KeyLoad(_)), "got: {err:?}");
    }
}
