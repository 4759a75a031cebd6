//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async so that store calls cancel
//! together with the request that issued them.

use crate::error::UserHubResult;
use crate::models::account::{NewAccount, Profile, ProfileUpdate, StoredCredential};

pub trait AccountRepository: Send + Sync {
    /// Count-based existence check on the phone number.
    fn phone_number_exists(
        &self,
        phone_number: &str,
    ) -> impl Future<Output = UserHubResult<bool>> + Send;

    /// Create the user, credential and login-counter records in one
    /// transaction and return the generated user ID.
    ///
    /// Either all three records become visible or none does.
    fn create_account(
        &self,
        input: NewAccount,
    ) -> impl Future<Output = UserHubResult<String>> + Send;

    fn find_credential_by_phone(
        &self,
        phone_number: &str,
    ) -> impl Future<Output = UserHubResult<StoredCredential>> + Send;

    fn increment_login_counter(
        &self,
        user_id: &str,
    ) -> impl Future<Output = UserHubResult<()>> + Send;

    fn login_count(&self, user_id: &str) -> impl Future<Output = UserHubResult<u64>> + Send;

    fn get_profile(&self, user_id: &str) -> impl Future<Output = UserHubResult<Profile>> + Send;

    /// Apply only the provided fields, then return the current profile.
    fn update_profile(
        &self,
        user_id: &str,
        input: ProfileUpdate,
    ) -> impl Future<Output = UserHubResult<Profile>> + Send;
}
