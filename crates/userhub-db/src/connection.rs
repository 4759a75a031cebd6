//! Opening the account store on a SurrealDB server.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;
use crate::repository::SurrealAccountRepository;
use crate::schema::run_migrations;

/// Where the account tables live and the root credentials used to reach
/// them.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// `host:port` of the SurrealDB WebSocket endpoint.
    pub endpoint: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            endpoint: "127.0.0.1:8000".into(),
            namespace: "userhub".into(),
            database: "accounts".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

/// Connect, bring the account schema up to date and hand back the
/// repository.
///
/// The store is only returned once every migration has been applied and
/// the unique indexes behind phone-number conflict detection are in
/// place.
pub async fn open_account_store(
    config: &DbConfig,
) -> Result<SurrealAccountRepository<Client>, DbError> {
    let db = Surreal::new::<Ws>(config.endpoint.as_str()).await?;
    db.signin(Root {
        username: config.username.clone(),
        password: config.password.clone(),
    })
    .await?;
    db.use_ns(config.namespace.as_str())
        .use_db(config.database.as_str())
        .await?;

    let applied = run_migrations(&db).await?;
    info!(
        endpoint = %config.endpoint,
        namespace = %config.namespace,
        database = %config.database,
        applied,
        "Account store ready"
    );

    Ok(SurrealAccountRepository::new(db))
}
