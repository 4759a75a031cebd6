//! Account domain model.
//!
//! An account is split across three records that always exist together:
//! the user row (identity and profile), the credential row (hash and
//! salt) and the login counter.

use serde::{Deserialize, Serialize};

/// Public profile of an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub full_name: String,
    pub phone_number: String,
}

/// Input for creating an account together with its credential and
/// login counter.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub full_name: String,
    pub phone_number: String,
    /// Already-hashed password (PHC string). Never the plaintext.
    pub password_hash: String,
    pub salt: String,
}

/// Credential row as read back during login.
#[derive(Debug, Clone)]
pub struct StoredCredential {
    pub user_id: String,
    pub password_hash: String,
    pub salt: String,
}

/// Sparse profile update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.phone_number.is_none()
    }
}
