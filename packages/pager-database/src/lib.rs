//! # pager-database
//!
//! A Postgres-backed [`pager::RowSource`]: connection pooling, rendering of
//! filters and orderings to parameterized SQL, and decoding of rows into
//! [`pager::Record`]s.

#![deny(unused_crate_dependencies)]

pub mod postgres;
pub mod relation;
pub mod sql;

pub use relation::PgRelation;

use pager::SourceError;
use pager_lib::utils::{attempt_database_connection, ServiceStatus};
use sqlx::{pool::PoolConnection, postgres::PgConnectOptions, Error as SqlxError};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PagerDatabaseError {
    #[error("Invalid connection string: {0:?}")]
    InvalidConnectionString(String),
    #[error("Database backend not supported: {0:?}")]
    BackendNotSupported(String),
    #[error("Invalid relation config: {0}")]
    InvalidRelation(String),
    #[error("Column {column:?} cannot be read as {kind}")]
    ColumnDecodeError { column: String, kind: String },
    #[error("Error from sqlx: {0:#?}")]
    SqlxError(#[from] SqlxError),
}

impl From<PagerDatabaseError> for SourceError {
    fn from(e: PagerDatabaseError) -> Self {
        SourceError::Other(anyhow::Error::new(e))
    }
}

pub type PagerDatabaseResult<T> = Result<T, PagerDatabaseError>;

#[derive(Clone, Debug)]
pub enum PagerConnectionPool {
    Postgres(sqlx::Pool<sqlx::Postgres>),
}

impl PagerConnectionPool {
    /// Connect to the database at `database_url`, retrying with backoff.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
    ) -> PagerDatabaseResult<PagerConnectionPool> {
        let url = url::Url::parse(database_url).map_err(|_| {
            PagerDatabaseError::InvalidConnectionString(database_url.into())
        })?;

        match url.scheme() {
            "postgres" | "postgresql" => {
                let options = PgConnectOptions::from_str(database_url)?;
                let pool = attempt_database_connection(|| {
                    sqlx::postgres::PgPoolOptions::new()
                        .max_connections(max_connections)
                        .connect_with(options.clone())
                })
                .await?;

                Ok(PagerConnectionPool::Postgres(pool))
            }
            err => Err(PagerDatabaseError::BackendNotSupported(err.into())),
        }
    }

    pub async fn is_connected(&self) -> PagerDatabaseResult<ServiceStatus> {
        match self {
            PagerConnectionPool::Postgres(p) => {
                let mut conn = p.acquire().await?;
                let result =
                    postgres::execute_query(&mut conn, "SELECT true;".to_string())
                        .await?;

                match result {
                    1 => Ok(ServiceStatus::OK),
                    _ => Ok(ServiceStatus::NotOk),
                }
            }
        }
    }

    pub async fn acquire(&self) -> sqlx::Result<PoolConnection<sqlx::Postgres>> {
        match self {
            PagerConnectionPool::Postgres(p) => p.acquire().await,
        }
    }
}
