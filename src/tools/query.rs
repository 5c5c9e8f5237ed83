//! Read-path query tool.
//!
//! Accepts only SELECT-like statements (surface keyword check), injects an
//! engine-appropriate row limit, and returns normalized rows. Write
//! statements are rejected with a policy error before the executor is
//! touched.

use crate::config::ConnectionProfile;
use crate::db::Executor;
use crate::dialect::{MAX_ROW_LIMIT, apply_limit, clamp_limit, ensure_select_like, normalize};
use crate::error::GatewayResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info;

/// Input for the query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryInput {
    /// SQL SELECT statement to execute. Writes are blocked; use the execute tool.
    pub sql: String,
    /// Maximum rows to return. Default: 100, max: 1000
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Output from the query tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct QueryOutput {
    /// Result rows as key-value objects
    pub rows: Vec<JsonValue>,
    /// Number of rows returned
    pub row_count: usize,
    /// True if the result was cut at the row-limit ceiling
    pub truncated: bool,
}

/// Handler for the query tool.
pub struct QueryToolHandler {
    executor: Arc<dyn Executor>,
    profile: Arc<ConnectionProfile>,
}

impl QueryToolHandler {
    pub fn new(executor: Arc<dyn Executor>, profile: Arc<ConnectionProfile>) -> Self {
        Self { executor, profile }
    }

    /// Execute a SELECT-like statement with a bounded row count.
    pub async fn query(&self, input: QueryInput) -> GatewayResult<QueryOutput> {
        let sql = input.sql.trim();
        ensure_select_like(sql)?;

        let limit = clamp_limit(input.limit);
        let limited = apply_limit(sql, limit, self.profile.engine);

        let raw = self.executor.execute(&limited).await?;
        let mut rows = normalize(raw, self.profile.engine);

        // A statement that carried its own limit skips injection, so the
        // ceiling is enforced again on the result
        let truncated = rows.len() > MAX_ROW_LIMIT as usize;
        if truncated {
            rows.truncate(MAX_ROW_LIMIT as usize);
        }

        let row_count = rows.len();
        info!(
            engine = %self.profile.engine,
            rows = row_count,
            limit = limit,
            "Query executed"
        );

        Ok(QueryOutput {
            rows,
            row_count,
            truncated,
        })
    }
}
