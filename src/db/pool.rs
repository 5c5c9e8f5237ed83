//! sqlx-backed executor for PostgreSQL, MySQL, and SQLite.
//!
//! Uses database-specific pools (PgPool, MySqlPool, SqlitePool) rather than
//! AnyPool to keep full type support. Statements run through
//! `raw_sql(..).fetch_many`, which yields rows and completion counts in one
//! pass, so row-returning statements that do not start with SELECT (PRAGMA,
//! SHOW, DESCRIBE) still produce their rows. Each engine's raw result keeps
//! the envelope its conventional driver would produce, so the normalizer
//! sees realistic shapes: postgres wraps rows in `{"rows", "rowCount"}`,
//! mysql returns a `[rows, meta]` pair, sqlite returns the row array
//! directly.

use crate::config::ConnectionProfile;
use crate::db::Executor;
use crate::db::row::{mysql_row_to_json, pg_row_to_json, sqlite_row_to_json};
use crate::dialect::Engine;
use crate::error::{GatewayError, GatewayResult};
use async_trait::async_trait;
use futures_util::StreamExt;
use serde_json::{Value as JsonValue, json};
use sqlx::{
    Either, MySqlPool, PgPool, SqlitePool, mysql::MySqlPoolOptions, postgres::PgPoolOptions,
    sqlite::SqliteConnectOptions, sqlite::SqlitePoolOptions,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Database-specific connection pool.
#[derive(Debug, Clone)]
enum DbPool {
    Postgres(PgPool),
    MySql(MySqlPool),
    Sqlite(SqlitePool),
}

/// Executor over a sqlx connection pool.
pub struct SqlxExecutor {
    pool: DbPool,
}

impl SqlxExecutor {
    /// Open a pool for the profile and verify it with a ping.
    pub async fn connect(profile: &ConnectionProfile) -> GatewayResult<Self> {
        let url = profile.url()?;
        let pool = match profile.engine {
            Engine::Postgres => {
                let pool = PgPoolOptions::new()
                    .min_connections(profile.pool.min)
                    .max_connections(profile.pool.max)
                    .acquire_timeout(ACQUIRE_TIMEOUT)
                    .idle_timeout(IDLE_TIMEOUT)
                    .test_before_acquire(true)
                    .connect(&url)
                    .await?;
                DbPool::Postgres(pool)
            }
            Engine::MySql => {
                let pool = MySqlPoolOptions::new()
                    .min_connections(profile.pool.min)
                    .max_connections(profile.pool.max)
                    .acquire_timeout(ACQUIRE_TIMEOUT)
                    .idle_timeout(IDLE_TIMEOUT)
                    .test_before_acquire(true)
                    .connect(&url)
                    .await?;
                DbPool::MySql(pool)
            }
            Engine::Sqlite => {
                let options = SqliteConnectOptions::from_str(&url)?
                    .create_if_missing(!profile.read_only)
                    .read_only(profile.read_only);
                let pool = SqlitePoolOptions::new()
                    .min_connections(profile.pool.min)
                    .max_connections(profile.pool.max)
                    .acquire_timeout(ACQUIRE_TIMEOUT)
                    .connect_with(options)
                    .await?;
                DbPool::Sqlite(pool)
            }
            other => {
                return Err(GatewayError::internal(format!(
                    "SqlxExecutor does not handle {other}"
                )));
            }
        };

        let executor = Self { pool };
        executor.execute(profile.engine.ping_query()).await?;
        Ok(executor)
    }

    /// Close the underlying pool.
    pub async fn close(&self) {
        match &self.pool {
            DbPool::Postgres(pool) => pool.close().await,
            DbPool::MySql(pool) => pool.close().await,
            DbPool::Sqlite(pool) => pool.close().await,
        }
    }
}

#[async_trait]
impl Executor for SqlxExecutor {
    async fn execute(&self, sql: &str) -> GatewayResult<JsonValue> {
        debug!(sql = %sql, "Executing statement");
        match &self.pool {
            DbPool::Postgres(pool) => run_postgres(pool, sql).await,
            DbPool::MySql(pool) => run_mysql(pool, sql).await,
            DbPool::Sqlite(pool) => run_sqlite(pool, sql).await,
        }
    }
}

/// Run a statement, collecting rows and affected counts in one pass.
async fn run_postgres(pool: &PgPool, sql: &str) -> GatewayResult<JsonValue> {
    let mut stream = sqlx::raw_sql(sql).fetch_many(pool);
    let mut rows: Vec<JsonValue> = Vec::new();
    let mut affected: u64 = 0;
    while let Some(item) = stream.next().await {
        match item? {
            Either::Left(done) => affected += done.rows_affected(),
            Either::Right(row) => rows.push(pg_row_to_json(&row)),
        }
    }
    let row_count = if rows.is_empty() {
        affected
    } else {
        rows.len() as u64
    };
    Ok(json!({ "rows": rows, "rowCount": row_count }))
}

async fn run_mysql(pool: &MySqlPool, sql: &str) -> GatewayResult<JsonValue> {
    let mut stream = sqlx::raw_sql(sql).fetch_many(pool);
    let mut rows: Vec<JsonValue> = Vec::new();
    let mut affected: u64 = 0;
    while let Some(item) = stream.next().await {
        match item? {
            Either::Left(done) => affected += done.rows_affected(),
            Either::Right(row) => rows.push(mysql_row_to_json(&row)),
        }
    }
    // mysql drivers return a [rows, fields] pair for row-returning
    // statements and an ok-packet object for writes
    if rows.is_empty() && affected > 0 {
        Ok(json!([[], { "affectedRows": affected }]))
    } else {
        Ok(json!([rows, []]))
    }
}

async fn run_sqlite(pool: &SqlitePool, sql: &str) -> GatewayResult<JsonValue> {
    let mut stream = sqlx::raw_sql(sql).fetch_many(pool);
    let mut rows: Vec<JsonValue> = Vec::new();
    let mut affected: u64 = 0;
    while let Some(item) = stream.next().await {
        match item? {
            Either::Left(done) => affected += done.rows_affected(),
            Either::Right(row) => rows.push(sqlite_row_to_json(&row)),
        }
    }
    // A write that changed rows reports the count; everything else (SELECT,
    // PRAGMA, DDL) reports its rows, possibly none
    if rows.is_empty() && affected > 0 {
        Ok(json!({ "rowCount": affected }))
    } else {
        Ok(JsonValue::Array(rows))
    }
}
