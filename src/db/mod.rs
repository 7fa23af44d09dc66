pub mod department;

use std::env;
use std::fmt;
use std::str::FromStr;

use log::debug;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};
use url::Url;

use crate::errors::AppError;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;
const DEFAULT_USER: &str = "fitness";
const DEFAULT_PASSWORD: &str = "fitnesspass";
const DEFAULT_DATABASE: &str = "fitnessdb";

/// Connection settings for the department store.
///
/// Resolved from `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD` and `DB_NAME`.
/// A `DATABASE_URL`, when present, wins over the individual variables.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub url: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            url: None,
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("url", &self.url.as_ref().map(|_| self.describe()))
            .finish()
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = DatabaseConfig::default();

        if let Some(host) = lookup("DB_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("DB_PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| AppError::ConfigError(format!("DB_PORT is not a valid port: {}", port)))?;
        }
        if let Some(user) = lookup("DB_USER") {
            config.user = user;
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            config.password = password;
        }
        if let Some(database) = lookup("DB_NAME") {
            config.database = database;
        }

        if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.is_empty()) {
            let parsed = Url::parse(&url)
                .map_err(|err| AppError::ConfigError(format!("DATABASE_URL is invalid: {}", err)))?;
            if !matches!(parsed.scheme(), "postgres" | "postgresql") {
                return Err(AppError::ConfigError(format!(
                    "DATABASE_URL must use the postgres scheme, got {}",
                    parsed.scheme()
                )));
            }
            config.url = Some(url);
        }

        Ok(config)
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions, AppError> {
        match &self.url {
            Some(url) => PgConnectOptions::from_str(url)
                .map_err(|err| AppError::ConfigError(err.to_string())),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.database)),
        }
    }

    /// Connection target without credentials, safe to print.
    pub fn describe(&self) -> String {
        match self.url.as_deref().and_then(|url| Url::parse(url).ok()) {
            Some(mut url) => {
                let _ = url.set_password(None);
                url.to_string()
            }
            None => format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database),
        }
    }
}

pub async fn connect(config: &DatabaseConfig) -> Result<PgConnection, AppError> {
    let options = config.connect_options()?;
    debug!("connecting to {}", config.describe());
    PgConnection::connect_with(&options)
        .await
        .map_err(|err| AppError::DatabaseError(err.to_string()))
}
