use pager_lib::utils::format_sql_query;
use sqlx::{pool::PoolConnection, postgres::PgRow, Postgres, QueryBuilder, Row};
use tracing::debug;

pub async fn execute_query(
    conn: &mut PoolConnection<Postgres>,
    query: String,
) -> sqlx::Result<usize> {
    let mut builder = sqlx::QueryBuilder::new(query);
    let query = builder.build();
    let result = query.execute(conn).await?;
    Ok(result.rows_affected() as usize)
}

pub async fn fetch_rows(
    conn: &mut PoolConnection<Postgres>,
    mut builder: QueryBuilder<'_, Postgres>,
) -> sqlx::Result<Vec<PgRow>> {
    debug!("QUERY: {}", format_sql_query(builder.sql().to_string()));
    let query = builder.build();
    query.fetch_all(conn).await
}

pub async fn fetch_count(
    conn: &mut PoolConnection<Postgres>,
    mut builder: QueryBuilder<'_, Postgres>,
) -> sqlx::Result<i64> {
    debug!("QUERY: {}", format_sql_query(builder.sql().to_string()));
    let query = builder.build();
    let row = query.fetch_one(conn).await?;
    row.try_get(0)
}
