//! Password salting, hashing and verification.
//!
//! Every credential carries its own 16-character alphanumeric salt which
//! is appended to the password before Argon2id hashing. The resulting PHC
//! string is what gets stored; the plaintext never leaves this module.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::Rng;
use rand::distr::Alphanumeric;

use crate::error::AuthError;

/// Length of the per-credential salt.
pub const SALT_LENGTH: usize = 16;

/// Salts, hashes and verifies passwords.
///
/// Implementations are stateless; the identity workflow holds one and
/// calls it for every register and login.
pub trait CredentialHasher: Send + Sync {
    /// Fresh per-credential salt of [`SALT_LENGTH`] characters.
    fn generate_salt(&self) -> String;

    /// Hash `password + salt`.
    fn hash(&self, password: &str, salt: &str) -> Result<String, AuthError>;

    /// `Ok(false)` on mismatch, `Err` if the stored hash is unusable.
    fn verify(&self, password: &str, salt: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Argon2id with default parameters, salt drawn from `[a-zA-Z0-9]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn generate_salt(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(SALT_LENGTH)
            .map(char::from)
            .collect()
    }

    fn hash(&self, password: &str, salt: &str) -> Result<String, AuthError> {
        let salted = format!("{password}{salt}");

        let phc_salt_bytes: [u8; 16] = rand::rng().random();
        let phc_salt = SaltString::encode_b64(&phc_salt_bytes)
            .map_err(|e| AuthError::Crypto(format!("salt encoding: {e}")))?;

        Argon2::default()
            .hash_password(salted.as_bytes(), &phc_salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Crypto(format!("password hash error: {e}")))
    }

    fn verify(&self, password: &str, salt: &str, hash: &str) -> Result<bool, AuthError> {
        let salted = format!("{password}{salt}");

        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::Crypto(format!("invalid hash format: {e}")))?;

        match Argon2::default().verify_password(salted.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Crypto(format!("verify error: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salt_is_sixteen_alphanumeric_chars() {
        let salt = Argon2Hasher.generate_salt();
        assert_eq!(salt.len(), SALT_LENGTH);
        assert!(salt.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn salts_differ_between_calls() {
        assert_ne!(Argon2Hasher.generate_salt(), Argon2Hasher.generate_salt());
    }

    #[test]
    fn correct_password_matches() {
        let salt = Argon2Hasher.generate_salt();
        let hash = Argon2Hasher.hash("Hunter2!", &salt).unwrap();
        assert!(Argon2Hasher.verify("Hunter2!", &salt, &hash).unwrap());
    }

    #[test]
    fn hash_is_not_plaintext() {
        let hash = Argon2Hasher.hash("Hunter2!", "AbCdEfGh12345678").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("Hunter2!"));
    }

    #[test]
    fn single_character_password_mutation_fails() {
        let salt = Argon2Hasher.generate_salt();
        let hash = Argon2Hasher.hash("Hunter2!", &salt).unwrap();
        assert!(!Argon2Hasher.verify("Hunter2?", &salt, &hash).unwrap());
        assert!(!Argon2Hasher.verify("hunter2!", &salt, &hash).unwrap());
        assert!(!Argon2Hasher.verify("Hunter2", &salt, &hash).unwrap());
    }

    #[test]
    fn different_salt_fails() {
        let hash = Argon2Hasher.hash("Hunter2!", "AbCdEfGh12345678").unwrap();
        assert!(!Argon2Hasher.verify("Hunter2!", "AbCdEfGh12345679", &hash).unwrap());
    }

    #[test]
    fn mutated_hash_does_not_verify() {
        let salt = Argon2Hasher.generate_salt();
        let hash = Argon2Hasher.hash("Hunter2!", &salt).unwrap();

        // Flip the last character of the digest.
        let mut mutated = hash.clone();
        let last = mutated.pop().unwrap();
        mutated.push(if last == 'A' { 'B' } else { 'A' });

        let result = Argon2Hasher.verify("Hunter2!", &salt, &mutated);
        assert!(!matches!(result, Ok(true)));
    }

    #[test]
    fn malformed_hash_returns_error() {
        let result = Argon2Hasher.verify("pw", "AbCdEfGh12345678", "not-a-hash");
        assert!(result.is_err());
    }
}
