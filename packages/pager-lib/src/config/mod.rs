pub mod database;
pub mod paging;
pub mod relation;

pub use crate::{
    config::{
        database::DatabaseConfig,
        paging::PagingConfig,
        relation::{ColumnConfig, OrderFieldConfig, OrderSelectorConfig, RelationConfig},
    },
    defaults,
};
pub use clap::{Args, Parser};
use serde::Deserialize;
use std::{
    fs::File,
    io::Error,
    path::{Path, PathBuf},
    str::FromStr,
};
use strum::{AsRefStr, EnumString};
use thiserror::Error;

/// Error type returned by configuration operations.
#[derive(Error, Debug)]
pub enum PagerConfigError {
    #[error("Error parsing env variables from config")]
    EnvVarParseError(#[from] std::env::VarError),
    #[error("Error processing file: {0:?}")]
    ConfigFileError(#[from] Error),
    #[error("Error processing YAML file: {0:?}")]
    SerdeYamlError(#[from] serde_yaml::Error),
    #[error("URL parser error: {0:?}")]
    ParseError(#[from] url::ParseError),
    #[error("Database backend not supported: {0:?}")]
    UnsupportedDatabase(String),
}

/// Result type returned by configuration operations.
pub type PagerConfigResult<T> = core::result::Result<T, PagerConfigError>;

/// Set of PostgresQL configuration constants.
#[derive(Debug, EnumString, AsRefStr)]
pub enum EnvVar {
    #[strum(serialize = "POSTGRES_HOST")]
    PostgresHost,
    #[strum(serialize = "POSTGRES_PASSWORD")]
    PostgresPassword,
    #[strum(serialize = "POSTGRES_DATABASE")]
    PostgresDatabase,
    #[strum(serialize = "POSTGRES_PORT")]
    PostgresPort,
    #[strum(serialize = "POSTGRES_USER")]
    PostgresUser,
}

/// Return the value of an environment variable or a default value.
pub fn env_or_default(var: EnvVar, default: String) -> String {
    std::env::var(var.as_ref()).unwrap_or(default)
}

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "Pager",
    about = "Seek-based cursor pagination over relational associations.",
    version
)]
pub struct PagerArgs {
    /// Log level passed to the pager.
    #[clap(long, default_value = defaults::LOG_LEVEL, value_parser(["info", "debug", "error", "warn", "trace"]), help = "Log level passed to the pager.")]
    pub log_level: String,

    /// Pager config file.
    #[clap(short, long, value_name = "FILE", help = "Pager config file.")]
    pub config: Option<PathBuf>,

    /// Database type.
    #[clap(long, help = "Database type.", default_value = defaults::DATABASE, value_parser(["postgres"]))]
    pub database: String,

    /// Database connection string.
    #[clap(long, value_name = "URL", help = "Database connection string. Takes precedence over the --postgres-* options.")]
    pub database_url: Option<String>,

    /// Postgres username.
    #[clap(long, help = "Postgres username.")]
    pub postgres_user: Option<String>,

    /// Postgres database.
    #[clap(long, help = "Postgres database.")]
    pub postgres_database: Option<String>,

    /// Postgres password.
    #[clap(long, help = "Postgres password.")]
    pub postgres_password: Option<String>,

    /// Postgres host.
    #[clap(long, help = "Postgres host.")]
    pub postgres_host: Option<String>,

    /// Postgres port.
    #[clap(long, help = "Postgres port.")]
    pub postgres_port: Option<String>,

    /// Page size used when neither --first nor --last is given.
    #[clap(long, help = "Page size used when neither --first nor --last is given.", default_value_t = defaults::DEFAULT_PAGE_SIZE)]
    pub default_page_size: u64,

    /// Largest page a caller may request.
    #[clap(long, help = "Largest page a caller may request.", default_value_t = defaults::MAX_PAGE_SIZE)]
    pub max_page_size: u64,

    /// Enable verbose logging.
    #[clap(short, long, help = "Enable verbose logging.")]
    pub verbose: bool,
}

impl Default for PagerArgs {
    fn default() -> Self {
        Self {
            log_level: defaults::LOG_LEVEL.to_string(),
            config: None,
            database: defaults::DATABASE.to_string(),
            database_url: None,
            postgres_user: Some(defaults::POSTGRES_USER.to_string()),
            postgres_database: Some(defaults::POSTGRES_DATABASE.to_string()),
            postgres_password: None,
            postgres_host: Some(defaults::POSTGRES_HOST.to_string()),
            postgres_port: Some(defaults::POSTGRES_PORT.to_string()),
            default_page_size: defaults::DEFAULT_PAGE_SIZE,
            max_page_size: defaults::MAX_PAGE_SIZE,
            verbose: defaults::VERBOSE_LOGGING,
        }
    }
}

pub trait Env {
    fn inject_opt_env_vars(&mut self) -> PagerConfigResult<()>;
}

fn log_level() -> String {
    defaults::LOG_LEVEL.to_string()
}

/// Pager service configuration.
#[derive(Clone, Deserialize, Debug)]
pub struct PagerConfig {
    #[serde(default = "log_level")]
    pub log_level: String,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub paging: PagingConfig,
    #[serde(default)]
    pub relations: Vec<RelationConfig>,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            log_level: log_level(),
            verbose: defaults::VERBOSE_LOGGING,
            database: DatabaseConfig::default(),
            paging: PagingConfig::default(),
            relations: Vec::new(),
        }
    }
}

impl TryFrom<PagerArgs> for PagerConfig {
    type Error = PagerConfigError;

    fn try_from(args: PagerArgs) -> PagerConfigResult<Self> {
        let database = match (args.database_url.as_deref(), args.database.as_str()) {
            (Some(url), _) => DatabaseConfig::from_str(url)?,
            (None, "postgres") => DatabaseConfig::Postgres {
                user: args.postgres_user.unwrap_or_else(|| {
                    env_or_default(
                        EnvVar::PostgresUser,
                        defaults::POSTGRES_USER.to_string(),
                    )
                }),
                password: args.postgres_password.unwrap_or_else(|| {
                    env_or_default(
                        EnvVar::PostgresPassword,
                        defaults::POSTGRES_PASSWORD.to_string(),
                    )
                }),
                host: args.postgres_host.unwrap_or_else(|| {
                    env_or_default(
                        EnvVar::PostgresHost,
                        defaults::POSTGRES_HOST.to_string(),
                    )
                }),
                port: args.postgres_port.unwrap_or_else(|| {
                    env_or_default(
                        EnvVar::PostgresPort,
                        defaults::POSTGRES_PORT.to_string(),
                    )
                }),
                database: args.postgres_database.unwrap_or_else(|| {
                    env_or_default(
                        EnvVar::PostgresDatabase,
                        defaults::POSTGRES_DATABASE.to_string(),
                    )
                }),
            },
            (None, other) => {
                return Err(PagerConfigError::UnsupportedDatabase(other.to_string()))
            }
        };

        let mut config = PagerConfig {
            log_level: args.log_level,
            verbose: args.verbose,
            database,
            paging: PagingConfig {
                default_page_size: args.default_page_size,
                max_page_size: Some(args.max_page_size),
            },
            relations: Vec::new(),
        };

        config.inject_opt_env_vars()?;

        Ok(config)
    }
}

impl PagerConfig {
    /// Load a config file. Missing sections, and missing settings within a
    /// section, fall back to their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> PagerConfigResult<Self> {
        let file = File::open(path)?;
        let mut config: PagerConfig = serde_yaml::from_reader(file)?;
        config.inject_opt_env_vars()?;
        Ok(config)
    }

    /// Resolve the config from command line arguments, preferring the config
    /// file when one was given.
    pub fn from_args(args: PagerArgs) -> PagerConfigResult<Self> {
        match &args.config {
            Some(path) => {
                let mut config = Self::from_file(path)?;
                // Command line verbosity always wins over the file.
                config.verbose |= args.verbose;
                Ok(config)
            }
            None => Self::try_from(args),
        }
    }

    /// Look up a configured relation by name.
    pub fn relation(&self, name: &str) -> Option<&RelationConfig> {
        self.relations.iter().find(|r| r.name == name)
    }

    // Inject env vars into each section of the config
    pub fn inject_opt_env_vars(&mut self) -> PagerConfigResult<()> {
        self.database.inject_opt_env_vars()?;
        self.paging.inject_opt_env_vars()?;
        for relation in self.relations.iter_mut() {
            relation.inject_opt_env_vars()?;
        }

        Ok(())
    }
}
