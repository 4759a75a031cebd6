//! Identity workflow — register, login and profile orchestration.

use tracing::{info, warn};
use userhub_core::error::{UserHubError, UserHubResult};
use userhub_core::models::account::{NewAccount, Profile, ProfileUpdate};
use userhub_core::repository::AccountRepository;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password::{Argon2Hasher, CredentialHasher};
use crate::token::TokenService;
use crate::validator::Validator;

/// Input for the registration flow.
#[derive(Debug)]
pub struct RegisterInput {
    pub phone_number: String,
    pub full_name: String,
    pub password: String,
}

#[derive(Debug)]
pub struct RegisterOutput {
    pub user_id: String,
}

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub phone_number: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed RS256 token.
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

/// Identity service.
///
/// Generic over the repository implementation so that the workflow has
/// no dependency on the database crate, and over the credential hasher.
pub struct IdentityService<R: AccountRepository, H: CredentialHasher = Argon2Hasher> {
    repo: R,
    validator: Validator<R>,
    hasher: H,
    tokens: TokenService,
}

impl<R: AccountRepository + Clone> IdentityService<R> {
    pub fn new(repo: R, config: AuthConfig) -> Self {
        let validator = Validator::new(repo.clone());
        Self::from_parts(repo, validator, Argon2Hasher, TokenService::new(config))
    }
}

impl<R: AccountRepository, H: CredentialHasher> IdentityService<R, H> {
    pub fn from_parts(repo: R, validator: Validator<R>, hasher: H, tokens: TokenService) -> Self {
        Self {
            repo,
            validator,
            hasher,
            tokens,
        }
    }

    /// Register a new account.
    ///
    /// Every field is validated and every failure is reported together;
    /// nothing is persisted unless all three pass.
    pub async fn register(&self, input: RegisterInput) -> UserHubResult<RegisterOutput> {
        let checks = [
            self.validator
                .validate_phone_number(&input.phone_number)
                .await?,
            self.validator.validate_full_name(&input.full_name),
            self.validator.validate_password(&input.password),
        ];

        let messages: Vec<String> = checks
            .into_iter()
            .filter_map(Result::err)
            .map(|e| e.to_string())
            .collect();
        if !messages.is_empty() {
            info!(failures = messages.len(), "Registration rejected by validation");
            return Err(UserHubError::Validation { messages });
        }

        let salt = self.hasher.generate_salt();
        let password_hash = self.hasher.hash(&input.password, &salt)?;

        let user_id = self
            .repo
            .create_account(NewAccount {
                full_name: input.full_name,
                phone_number: input.phone_number,
                password_hash,
                salt,
            })
            .await
            .inspect_err(|e| warn!(error = %e, "Account creation failed"))?;

        info!(user_id = %user_id, "Account registered");
        Ok(RegisterOutput { user_id })
    }

    /// Authenticate with phone number and password and issue a token.
    ///
    /// The login counter is incremented before the token is issued; if
    /// that write fails the login fails.
    pub async fn login(&self, input: LoginInput) -> UserHubResult<LoginOutput> {
        let credential = match self
            .repo
            .find_credential_by_phone(&input.phone_number)
            .await
        {
            Ok(c) => c,
            Err(UserHubError::NotFound { .. }) => return Err(AuthError::UserNotFound.into()),
            Err(e) => return Err(e),
        };

        let valid = self.hasher.verify(
            &input.password,
            &credential.salt,
            &credential.password_hash,
        )?;
        if !valid {
            warn!(user_id = %credential.user_id, "Login rejected: wrong password");
            return Err(AuthError::WrongPassword.into());
        }

        self.repo
            .increment_login_counter(&credential.user_id)
            .await?;

        let token = self
            .tokens
            .issue(&credential.user_id, &input.phone_number)
            .await?;

        info!(user_id = %credential.user_id, "Login succeeded");
        Ok(LoginOutput {
            token,
            expires_in: self.tokens.lifetime_secs(),
        })
    }

    /// Return the profile of the account the token was issued to.
    pub async fn get_profile(&self, token: &str) -> UserHubResult<Profile> {
        let claims = self.tokens.verify(token).await?;
        self.repo.get_profile(&claims.user_id).await
    }

    /// Update the profile of the account the token was issued to.
    ///
    /// Unlike registration, the first invalid field aborts the update.
    /// Full name is checked before phone number.
    pub async fn update_profile(
        &self,
        token: &str,
        input: ProfileUpdate,
    ) -> UserHubResult<Profile> {
        let claims = self.tokens.verify(token).await?;

        if let Some(full_name) = &input.full_name {
            self.validator.validate_full_name(full_name)?;
        }
        if let Some(phone_number) = &input.phone_number {
            self.validator
                .validate_phone_number(phone_number)
                .await??;
        }

        let profile = self.repo.update_profile(&claims.user_id, input).await?;
        info!(user_id = %claims.user_id, "Profile updated");
        Ok(profile)
    }
}
