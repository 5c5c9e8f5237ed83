//! tiberius-backed executor for SQL Server.
//!
//! sqlx has no mssql driver, so this engine runs on tiberius with a bb8
//! pool. The raw result uses the node-mssql envelope the normalizer expects:
//! `{"recordset": [...], "rowCount": n}`.

use crate::config::ConnectionProfile;
use crate::db::Executor;
use crate::dialect::{QueryKind, classify};
use crate::error::{GatewayError, GatewayResult};
use async_trait::async_trait;
use bb8::Pool;
use bb8_tiberius::ConnectionManager;
use serde_json::{Map, Value as JsonValue, json};
use tiberius::{AuthMethod, Config, EncryptionLevel, Row};
use tracing::debug;

/// Executor over a bb8 pool of tiberius connections.
pub struct MssqlExecutor {
    pool: Pool<ConnectionManager>,
}

impl MssqlExecutor {
    /// Open a pool for the profile and verify it with a ping.
    pub async fn connect(profile: &ConnectionProfile) -> GatewayResult<Self> {
        let config = Self::tiberius_config(profile)?;
        let manager = ConnectionManager::new(config);
        let pool = Pool::builder()
            .min_idle(Some(profile.pool.min))
            .max_size(profile.pool.max)
            .build(manager)
            .await?;

        let executor = Self { pool };
        executor.execute(profile.engine.ping_query()).await?;
        Ok(executor)
    }

    fn tiberius_config(profile: &ConnectionProfile) -> GatewayResult<Config> {
        if let Some(cs) = &profile.connection_string {
            return Config::from_ado_string(cs)
                .map_err(|e| GatewayError::config(format!("Invalid connection string: {e}")));
        }

        let mut config = Config::new();
        config.host(&profile.host);
        if let Some(port) = profile.port {
            config.port(port);
        }
        if let Some(database) = &profile.database {
            config.database(database);
        }
        if let Some(user) = &profile.user {
            config.authentication(AuthMethod::sql_server(
                user,
                profile.password.as_deref().unwrap_or(""),
            ));
        }
        config.encryption(EncryptionLevel::On);
        config.trust_cert();
        Ok(config)
    }
}

#[async_trait]
impl Executor for MssqlExecutor {
    async fn execute(&self, sql: &str) -> GatewayResult<JsonValue> {
        debug!(sql = %sql, "Executing statement");
        let mut conn = self.pool.get().await?;

        match classify(sql) {
            QueryKind::SelectLike => {
                let stream = conn.query(sql, &[]).await?;
                let results = stream.into_results().await?;
                let rows: Vec<JsonValue> = results
                    .into_iter()
                    .flatten()
                    .map(|row| row_to_json(&row))
                    .collect();
                let row_count = rows.len();
                Ok(json!({ "recordset": rows, "rowCount": row_count }))
            }
            QueryKind::WriteOrDdl => {
                let result = conn.execute(sql, &[]).await?;
                let affected: u64 = result.rows_affected().iter().sum();
                Ok(json!({ "recordset": [], "rowCount": affected }))
            }
        }
    }
}

/// Decode a tiberius row into a JSON object with a type cascade.
fn row_to_json(row: &Row) -> JsonValue {
    let map: Map<String, JsonValue> = row
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| (col.name().to_string(), cell_to_json(row, idx)))
        .collect();
    JsonValue::Object(map)
}

fn cell_to_json(row: &Row, idx: usize) -> JsonValue {
    if let Ok(Some(v)) = row.try_get::<i32, _>(idx) {
        return json!(v);
    }
    if let Ok(Some(v)) = row.try_get::<i64, _>(idx) {
        return json!(v);
    }
    if let Ok(Some(v)) = row.try_get::<f64, _>(idx) {
        return json!(v);
    }
    if let Ok(Some(v)) = row.try_get::<f32, _>(idx) {
        return json!(v);
    }
    if let Ok(Some(v)) = row.try_get::<bool, _>(idx) {
        return json!(v);
    }
    if let Ok(Some(v)) = row.try_get::<&str, _>(idx) {
        return json!(v);
    }
    if let Ok(Some(v)) = row.try_get::<rust_decimal::Decimal, _>(idx) {
        return json!(v.to_string());
    }
    if let Ok(Some(v)) = row.try_get::<chrono::NaiveDateTime, _>(idx) {
        return json!(v.to_string());
    }
    if let Ok(Some(v)) = row.try_get::<&[u8], _>(idx) {
        return super::row::decode_binary_value(v);
    }
    JsonValue::Null
}
