//! Write-path execute tool.
//!
//! The read-only gate runs before anything reaches the executor: a read-only
//! profile rejects the write with a policy error and no SQL is sent. The
//! affected-row count is recovered from whichever field the driver's
//! envelope provides.

use crate::config::ConnectionProfile;
use crate::db::Executor;
use crate::dialect::normalize;
use crate::error::{GatewayError, GatewayResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info;

/// Input for the execute tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteInput {
    /// SQL statement to execute (INSERT, UPDATE, DELETE, DDL)
    pub sql: String,
}

/// Output from the execute tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ExecuteOutput {
    /// Number of rows the statement affected
    pub rows_affected: u64,
    /// Rows returned by the statement, if any (e.g. RETURNING clauses)
    pub rows: Vec<JsonValue>,
}

/// Handler for the execute tool.
pub struct WriteToolHandler {
    executor: Arc<dyn Executor>,
    profile: Arc<ConnectionProfile>,
}

impl WriteToolHandler {
    pub fn new(executor: Arc<dyn Executor>, profile: Arc<ConnectionProfile>) -> Self {
        Self { executor, profile }
    }

    /// Execute a write statement, subject to the read-only gate.
    pub async fn execute(&self, input: ExecuteInput) -> GatewayResult<ExecuteOutput> {
        if self.profile.read_only {
            return Err(GatewayError::policy(
                "execute",
                "connection is read-only (DB_READONLY is set)",
            ));
        }

        let sql = input.sql.trim();
        let raw = self.executor.execute(sql).await?;
        let rows = normalize(raw.clone(), self.profile.engine);
        let rows_affected = extract_affected(&raw, &rows);

        info!(
            engine = %self.profile.engine,
            rows_affected = rows_affected,
            "Write executed"
        );

        Ok(ExecuteOutput {
            rows_affected,
            rows,
        })
    }
}

/// Recover the affected-row count from a raw driver result.
///
/// Preference order: a top-level `rowCount`, a top-level `affectedRows`, the
/// same fields inside a mysql-style result tuple, then the normalized row
/// count as a last resort.
fn extract_affected(raw: &JsonValue, rows: &[JsonValue]) -> u64 {
    if let Some(n) = count_field(raw) {
        return n;
    }
    if let JsonValue::Array(parts) = raw {
        for part in parts {
            if let Some(n) = count_field(part) {
                return n;
            }
        }
    }
    rows.len() as u64
}

fn count_field(value: &JsonValue) -> Option<u64> {
    value
        .get("rowCount")
        .or_else(|| value.get("affectedRows"))
        .and_then(JsonValue::as_u64)
}
