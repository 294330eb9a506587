use std::str::FromStr;

use crate::{
    config::{Env, PagerConfigError, PagerConfigResult},
    defaults,
    utils::{is_opt_env_var, trim_opt_env_key},
};
use serde::Deserialize;
use url::{ParseError, Url};

fn default_user() -> String {
    defaults::POSTGRES_USER.into()
}

fn default_password() -> String {
    defaults::POSTGRES_PASSWORD.into()
}

fn default_host() -> String {
    defaults::POSTGRES_HOST.into()
}

fn default_port() -> String {
    defaults::POSTGRES_PORT.into()
}

fn default_database() -> String {
    defaults::POSTGRES_DATABASE.into()
}

#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseConfig {
    Postgres {
        #[serde(default = "default_user")]
        user: String,
        #[serde(default = "default_password")]
        password: String,
        #[serde(default = "default_host")]
        host: String,
        #[serde(default = "default_port", deserialize_with = "port_string")]
        port: String,
        #[serde(default = "default_database")]
        database: String,
    },
}

/// YAML ports are usually written as integers; accept both forms.
fn port_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u64),
        Text(String),
    }

    Ok(match Port::deserialize(deserializer)? {
        Port::Number(n) => n.to_string(),
        Port::Text(s) => s,
    })
}

impl Env for DatabaseConfig {
    fn inject_opt_env_vars(&mut self) -> PagerConfigResult<()> {
        match self {
            DatabaseConfig::Postgres {
                user,
                password,
                host,
                port,
                database,
            } => {
                if is_opt_env_var(user) {
                    *user = std::env::var(trim_opt_env_key(user))?;
                }
                if is_opt_env_var(password) {
                    *password = std::env::var(trim_opt_env_key(password))?;
                }

                if is_opt_env_var(host) {
                    *host = std::env::var(trim_opt_env_key(host))?;
                }

                if is_opt_env_var(port) {
                    *port = std::env::var(trim_opt_env_key(port))?;
                }

                if is_opt_env_var(database) {
                    *database = std::env::var(trim_opt_env_key(database))?;
                }
            }
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// The connection URL, with credentials percent-encoded.
    pub fn connection_url(&self) -> PagerConfigResult<Url> {
        match self {
            DatabaseConfig::Postgres {
                user,
                password,
                host,
                port,
                database,
            } => {
                let mut url = Url::parse(&format!("postgres://{host}:{port}"))?;
                url.set_username(user)
                    .map_err(|_| PagerConfigError::ParseError(ParseError::EmptyHost))?;
                if !password.is_empty() {
                    url.set_password(Some(password))
                        .map_err(|_| PagerConfigError::ParseError(ParseError::EmptyHost))?;
                }
                url.set_path(&format!("/{database}"));
                Ok(url)
            }
        }
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseConfig::Postgres {
                user,
                host,
                port,
                database,
                ..
            } => f
                .debug_struct("PostgresConfig")
                .field("user", &user)
                .field("password", &"XXXX")
                .field("host", &host)
                .field("port", &port)
                .field("database", &database)
                .finish(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig::Postgres {
            user: default_user(),
            password: default_password(),
            host: default_host(),
            port: default_port(),
            database: default_database(),
        }
    }
}

/// Credentials are kept as written in the URL, percent-encoding included.
impl FromStr for DatabaseConfig {
    type Err = PagerConfigError;

    fn from_str(db_url: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(db_url)?;

        match url.scheme() {
            "postgres" | "postgresql" => {
                let host = url.host_str().ok_or(ParseError::EmptyHost)?;
                let port = url
                    .port()
                    .map(|p| p.to_string())
                    .unwrap_or_else(default_port);
                let database = url
                    .path_segments()
                    .and_then(|mut segments| segments.next())
                    .filter(|segment| !segment.is_empty())
                    .map(|segment| segment.to_string())
                    .unwrap_or_else(default_database);

                Ok(DatabaseConfig::Postgres {
                    user: url.username().to_string(),
                    password: url.password().unwrap_or_default().to_string(),
                    host: host.to_string(),
                    port,
                    database,
                })
            }
            scheme => Err(PagerConfigError::UnsupportedDatabase(scheme.to_string())),
        }
    }
}
