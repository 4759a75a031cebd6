//! SurrealDB implementation of [`AccountRepository`].
//!
//! The user, credential (`password`) and counter (`login`) records of an
//! account share one generated UUID as their record key. Creation runs in
//! a single `BEGIN`/`COMMIT` block so a failing statement cancels all
//! three writes.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::{debug, warn};
use userhub_core::error::UserHubResult;
use userhub_core::models::account::{NewAccount, Profile, ProfileUpdate, StoredCredential};
use userhub_core::repository::AccountRepository;
use uuid::Uuid;

use crate::error::DbError;

const CREATE_ACCOUNT_TX: &str = "\
BEGIN TRANSACTION;
CREATE type::record('user', $id) SET \
    full_name = $full_name, \
    phone_number = $phone_number;
CREATE type::record('login', $id) SET \
    user_id = $id, \
    success_login = 0;
CREATE type::record('password', $id) SET \
    user_id = $id, \
    password = $password, \
    salt = $salt;
COMMIT TRANSACTION;
";

#[derive(Debug, SurrealValue)]
struct ProfileRow {
    full_name: String,
    phone_number: String,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            full_name: row.full_name,
            phone_number: row.phone_number,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct UserIdRow {
    record_id: String,
}

#[derive(Debug, SurrealValue)]
struct CredentialRow {
    password: String,
    salt: String,
}

#[derive(Debug, SurrealValue)]
struct LoginRow {
    success_login: u64,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB reports unique-index violations as
/// "Database index `...` already contains ...".
fn is_unique_violation(message: &str) -> bool {
    message.contains("already contains")
}

/// SurrealDB implementation of the account repository.
#[derive(Clone)]
pub struct SurrealAccountRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAccountRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn count_phone_numbers(&self, phone_number: &str) -> Result<u64, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM user \
                 WHERE phone_number = $phone_number GROUP ALL",
            )
            .bind(("phone_number", phone_number.to_string()))
            .await?;

        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<Profile, DbError> {
        let mut result = self
            .db
            .query("SELECT full_name, phone_number FROM type::record('user', $id)")
            .bind(("id", user_id.to_string()))
            .await?;

        let rows: Vec<ProfileRow> = result.take(0)?;
        rows.into_iter()
            .next()
            .map(Profile::from)
            .ok_or_else(|| DbError::NotFound {
                entity: "user".into(),
                id: user_id.to_string(),
            })
    }
}

impl<C: Connection> AccountRepository for SurrealAccountRepository<C> {
    async fn phone_number_exists(&self, phone_number: &str) -> UserHubResult<bool> {
        Ok(self.count_phone_numbers(phone_number).await? > 0)
    }

    async fn create_account(&self, input: NewAccount) -> UserHubResult<String> {
        let id = Uuid::new_v4().to_string();
        let phone_number = input.phone_number.clone();

        let response = self
            .db
            .query(CREATE_ACCOUNT_TX)
            .bind(("id", id.clone()))
            .bind(("full_name", input.full_name))
            .bind(("phone_number", input.phone_number))
            .bind(("password", input.password_hash))
            .bind(("salt", input.salt))
            .await
            .map_err(DbError::from)?;

        if let Err(e) = response.check() {
            let message = e.to_string();
            warn!(error = %message, "Account creation transaction cancelled");

            // A cancelled transaction may report a generic "not executed"
            // error for every statement; the phone number still being taken
            // after the rollback means another account owns it.
            if is_unique_violation(&message) || self.count_phone_numbers(&phone_number).await? > 0
            {
                return Err(DbError::Conflict("Phone numbers already exists.".into()).into());
            }
            return Err(DbError::Query(message).into());
        }

        debug!(user_id = %id, "Account records created");
        Ok(id)
    }

    async fn find_credential_by_phone(&self, phone_number: &str) -> UserHubResult<StoredCredential> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id FROM user WHERE phone_number = $phone_number")
            .bind(("phone_number", phone_number.to_string()))
            .await
            .map_err(DbError::from)?;

        let users: Vec<UserIdRow> = result.take(0).map_err(DbError::from)?;
        let user_id = users
            .into_iter()
            .next()
            .map(|row| row.record_id)
            .ok_or_else(|| DbError::NotFound {
                entity: "user".into(),
                id: format!("phone_number={phone_number}"),
            })?;

        let mut result = self
            .db
            .query("SELECT password, salt FROM password WHERE user_id = $user_id")
            .bind(("user_id", user_id.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CredentialRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "password".into(),
            id: user_id.clone(),
        })?;

        Ok(StoredCredential {
            user_id,
            password_hash: row.password,
            salt: row.salt,
        })
    }

    async fn increment_login_counter(&self, user_id: &str) -> UserHubResult<()> {
        let mut result = self
            .db
            .query(
                "UPDATE login SET success_login += 1 \
                 WHERE user_id = $user_id RETURN AFTER",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LoginRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "login".into(),
                id: user_id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn login_count(&self, user_id: &str) -> UserHubResult<u64> {
        let mut result = self
            .db
            .query("SELECT success_login FROM login WHERE user_id = $user_id")
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LoginRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "login".into(),
            id: user_id.to_string(),
        })?;
        Ok(row.success_login)
    }

    async fn get_profile(&self, user_id: &str) -> UserHubResult<Profile> {
        Ok(self.fetch_profile(user_id).await?)
    }

    async fn update_profile(&self, user_id: &str, input: ProfileUpdate) -> UserHubResult<Profile> {
        if input.is_empty() {
            return Ok(self.fetch_profile(user_id).await?);
        }

        let mut sets = Vec::new();
        if input.full_name.is_some() {
            sets.push("full_name = $full_name");
        }
        if input.phone_number.is_some() {
            sets.push("phone_number = $phone_number");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('user', $id) SET {} RETURN AFTER",
            sets.join(", ")
        );

        let mut builder = self.db.query(query).bind(("id", user_id.to_string()));
        if let Some(full_name) = input.full_name {
            builder = builder.bind(("full_name", full_name));
        }
        if let Some(phone_number) = input.phone_number {
            builder = builder.bind(("phone_number", phone_number));
        }

        let response = builder.await.map_err(DbError::from)?;
        let mut response = response.check().map_err(|e| {
            let message = e.to_string();
            if is_unique_violation(&message) {
                DbError::Conflict("Phone numbers already exists.".into())
            } else {
                DbError::Query(message)
            }
        })?;

        let rows: Vec<ProfileRow> = response.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: user_id.to_string(),
            }
            .into());
        }

        Ok(self.fetch_profile(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_unique_index_message() {
        assert!(is_unique_violation(
            "Database index `idx_user_phone_number` already contains '+6281234567890', \
             with record `user:abc`"
        ));
        assert!(!is_unique_violation("The query was not executed due to a failed transaction"));
    }
}
