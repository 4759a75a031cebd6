//! Server settings.
//!
//! Layered with figment, later sources winning:
//! built-in defaults, `userhub.toml`, `USERHUB_*` environment variables
//! (`__` separates nested keys, e.g. `USERHUB_DATABASE__ENDPOINT`), and finally
//! the bare `PRIVATE_KEY` / `PUBLIC_KEY` variables for the key paths.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use userhub_auth::AuthConfig;
use userhub_db::DbConfig;

pub const DEFAULT_CONFIG_FILE: &str = "userhub.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub bind_addr: String,
    pub request_timeout_secs: u64,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub endpoint: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    pub private_key_path: PathBuf,
    pub public_key_path: PathBuf,
    pub token_lifetime_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let db = DbConfig::default();
        let auth = AuthConfig::default();
        Self {
            bind_addr: "0.0.0.0:8080".into(),
            request_timeout_secs: 30,
            database: DatabaseSettings {
                endpoint: db.endpoint,
                namespace: db.namespace,
                database: db.database,
                username: db.username,
                password: db.password,
            },
            auth: AuthSettings {
                private_key_path: auth.private_key_path,
                public_key_path: auth.public_key_path,
                token_lifetime_secs: auth.token_lifetime_secs,
            },
        }
    }
}

impl Settings {
    /// Load settings using [`DEFAULT_CONFIG_FILE`]. A missing file is not
    /// an error.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let settings = Self::figment(path.as_ref()).extract()?;
        Ok(settings)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("USERHUB_").split("__"))
            .merge(
                Env::raw()
                    .only(&["PRIVATE_KEY"])
                    .map(|_| "auth.private_key_path".into()),
            )
            .merge(
                Env::raw()
                    .only(&["PUBLIC_KEY"])
                    .map(|_| "auth.public_key_path".into()),
            )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            endpoint: self.database.endpoint.clone(),
            namespace: self.database.namespace.clone(),
            database: self.database.database.clone(),
            username: self.database.username.clone(),
            password: self.database.password.clone(),
        }
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            private_key_path: self.auth.private_key_path.clone(),
            public_key_path: self.auth.public_key_path.clone(),
            token_lifetime_secs: self.auth.token_lifetime_secs,
        }
    }
}
