use crate::{
    postgres, sql, PagerConnectionPool, PagerDatabaseError, PagerDatabaseResult,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use pager::{
    source::SourceResult, FieldKind, FieldValue, Filter, Record, RowSource, SliceQuery,
};
use pager_lib::config::RelationConfig;
use sqlx::{postgres::PgRow, Row};
use std::str::FromStr;
use tracing::debug;

/// A table read as a [`RowSource`] of [`Record`]s.
#[derive(Clone, Debug)]
pub struct PgRelation {
    pool: PagerConnectionPool,
    table: String,
    columns: Vec<(String, FieldKind)>,
}

impl PgRelation {
    pub fn new(
        pool: PagerConnectionPool,
        table: impl Into<String>,
        columns: Vec<(String, FieldKind)>,
    ) -> Self {
        Self {
            pool,
            table: table.into(),
            columns,
        }
    }

    pub fn from_config(
        pool: PagerConnectionPool,
        config: &RelationConfig,
    ) -> PagerDatabaseResult<Self> {
        let columns = config
            .columns
            .iter()
            .map(|c| {
                FieldKind::from_str(&c.kind)
                    .map(|kind| (c.name.clone(), kind))
                    .map_err(|_| {
                        PagerDatabaseError::InvalidRelation(format!(
                            "Column {:?} of {:?} has unsupported kind {:?}",
                            c.name, config.name, c.kind
                        ))
                    })
            })
            .collect::<PagerDatabaseResult<Vec<_>>>()?;

        Ok(Self::new(pool, config.table.clone(), columns))
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }
}

fn decode_column(
    row: &PgRow,
    name: &str,
    kind: FieldKind,
) -> PagerDatabaseResult<Option<FieldValue>> {
    let decode_error = || PagerDatabaseError::ColumnDecodeError {
        column: name.to_string(),
        kind: kind.to_string(),
    };

    let value = match kind {
        FieldKind::Int => row
            .try_get::<Option<i64>, _>(name)
            .or_else(|_| row.try_get::<Option<i32>, _>(name).map(|v| v.map(i64::from)))
            .or_else(|_| row.try_get::<Option<i16>, _>(name).map(|v| v.map(i64::from)))
            .map_err(|_| decode_error())?
            .map(FieldValue::Int),
        FieldKind::String => row
            .try_get::<Option<String>, _>(name)
            .map_err(|_| decode_error())?
            .map(FieldValue::String),
        FieldKind::Boolean => row
            .try_get::<Option<bool>, _>(name)
            .map_err(|_| decode_error())?
            .map(FieldValue::Boolean),
        FieldKind::Timestamp => row
            .try_get::<Option<DateTime<Utc>>, _>(name)
            .or_else(|_| {
                row.try_get::<Option<NaiveDateTime>, _>(name)
                    .map(|v| v.map(|t| Utc.from_utc_datetime(&t)))
            })
            .map_err(|_| decode_error())?
            .map(FieldValue::Timestamp),
    };

    Ok(value)
}

/// Decode the declared columns of `row`. NULL columns are left out.
pub fn decode_row(
    row: &PgRow,
    columns: &[(String, FieldKind)],
) -> PagerDatabaseResult<Record> {
    let mut record = Record::new();
    for (name, kind) in columns {
        if let Some(value) = decode_column(row, name, *kind)? {
            record.insert(name.clone(), value);
        }
    }
    Ok(record)
}

#[async_trait]
impl RowSource for PgRelation {
    type Row = Record;

    async fn fetch(&self, query: &SliceQuery) -> SourceResult<Vec<Record>> {
        let builder = sql::select_query(&self.table, self.column_names(), query);
        let mut conn = self.pool.acquire().await.map_err(PagerDatabaseError::from)?;

        let rows = postgres::fetch_rows(&mut conn, builder)
            .await
            .map_err(PagerDatabaseError::from)?;
        debug!(table = %self.table, rows = rows.len(), "Fetched slice");

        Ok(rows
            .iter()
            .map(|row| decode_row(row, &self.columns))
            .collect::<PagerDatabaseResult<Vec<_>>>()?)
    }

    async fn count(&self, filter: Option<&Filter>) -> SourceResult<u64> {
        let builder = sql::count_query(&self.table, filter);
        let mut conn = self.pool.acquire().await.map_err(PagerDatabaseError::from)?;

        let count = postgres::fetch_count(&mut conn, builder)
            .await
            .map_err(PagerDatabaseError::from)?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}
