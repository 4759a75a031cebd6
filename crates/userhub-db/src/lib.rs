//! UserHub Database — the SurrealDB-backed account store.
//!
//! [`open_account_store`] connects, migrates and returns a
//! [`repository::SurrealAccountRepository`], the
//! [`userhub_core::repository::AccountRepository`] implementation.
//! [`run_migrations`] is public so embedded engines can be prepared the
//! same way.

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, open_account_store};
pub use error::DbError;
pub use schema::run_migrations;
