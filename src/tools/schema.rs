//! Schema introspection tools.
//!
//! These tools pair a dialect registry query with the executor and the
//! normalizer. Table names from the caller are sanitized here; the registry
//! sanitizes again on its own.

use crate::config::ConnectionProfile;
use crate::db::Executor;
use crate::dialect::{
    NormalizedRows, describe_table_query, foreign_keys_query, list_tables_query, normalize,
    sanitize_identifier, table_indexes_query,
};
use crate::error::GatewayResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{info, warn};

/// Input for the per-table schema tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TableInput {
    /// Table name. Characters outside [A-Za-z0-9_.] are stripped.
    pub table: String,
}

/// Output for the list_tables tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListTablesOutput {
    /// Tables and views as returned by the engine's catalog
    pub tables: NormalizedRows,
    /// Number of tables
    pub count: usize,
}

/// Output for the describe_table tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct DescribeTableOutput {
    /// Column descriptions in the engine's catalog shape
    pub columns: NormalizedRows,
    /// Number of columns
    pub count: usize,
}

/// Output for the table_indexes tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct TableIndexesOutput {
    /// Index descriptions in the engine's catalog shape
    pub indexes: NormalizedRows,
    /// Number of index entries
    pub count: usize,
}

/// Output for the foreign_keys tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ForeignKeysOutput {
    /// Foreign key descriptions in the engine's catalog shape
    pub foreign_keys: NormalizedRows,
    /// Number of foreign key entries
    pub count: usize,
}

/// Output for the schema_snapshot tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SchemaSnapshotOutput {
    /// Table name mapped to its column descriptions
    pub tables: serde_json::Map<String, JsonValue>,
    /// Number of tables in the snapshot
    pub table_count: usize,
}

/// Handler for the schema introspection tools.
pub struct SchemaToolHandler {
    executor: Arc<dyn Executor>,
    profile: Arc<ConnectionProfile>,
}

impl SchemaToolHandler {
    pub fn new(executor: Arc<dyn Executor>, profile: Arc<ConnectionProfile>) -> Self {
        Self { executor, profile }
    }

    /// List tables and views in the connected database.
    pub async fn list_tables(&self) -> GatewayResult<ListTablesOutput> {
        let sql = list_tables_query(self.profile.engine);
        let raw = self.executor.execute(&sql).await?;
        let tables = normalize(raw, self.profile.engine);
        let count = tables.len();
        info!(engine = %self.profile.engine, count = count, "Listed tables");
        Ok(ListTablesOutput { tables, count })
    }

    /// Describe the columns of a table.
    pub async fn describe_table(&self, input: TableInput) -> GatewayResult<DescribeTableOutput> {
        let table = sanitize_identifier(&input.table);
        let sql = describe_table_query(self.profile.engine, &table);
        let raw = self.executor.execute(&sql).await?;
        let columns = normalize(raw, self.profile.engine);
        let count = columns.len();
        Ok(DescribeTableOutput { columns, count })
    }

    /// List the indexes on a table.
    pub async fn table_indexes(&self, input: TableInput) -> GatewayResult<TableIndexesOutput> {
        let table = sanitize_identifier(&input.table);
        let sql = table_indexes_query(self.profile.engine, &table);
        let raw = self.executor.execute(&sql).await?;
        let indexes = normalize(raw, self.profile.engine);
        let count = indexes.len();
        Ok(TableIndexesOutput { indexes, count })
    }

    /// List the foreign keys declared on a table.
    pub async fn foreign_keys(&self, input: TableInput) -> GatewayResult<ForeignKeysOutput> {
        let table = sanitize_identifier(&input.table);
        let sql = foreign_keys_query(self.profile.engine, &table);
        let raw = self.executor.execute(&sql).await?;
        let foreign_keys = normalize(raw, self.profile.engine);
        let count = foreign_keys.len();
        Ok(ForeignKeysOutput {
            foreign_keys,
            count,
        })
    }

    /// Describe every table in the database in one pass.
    pub async fn schema_snapshot(&self) -> GatewayResult<SchemaSnapshotOutput> {
        let listing = self.list_tables().await?;
        let mut tables = serde_json::Map::new();

        for row in &listing.tables {
            let Some(name) = table_name_from_row(row) else {
                warn!(row = %row, "Skipping table row without a recognizable name");
                continue;
            };
            let described = self
                .describe_table(TableInput {
                    table: name.clone(),
                })
                .await?;
            tables.insert(name, JsonValue::Array(described.columns));
        }

        let table_count = tables.len();
        info!(engine = %self.profile.engine, tables = table_count, "Schema snapshot built");
        Ok(SchemaSnapshotOutput {
            tables,
            table_count,
        })
    }
}

/// Probe a catalog row for the table name.
///
/// Engines disagree on the column label: `table_name` (postgres, mssql,
/// oracle), `name` (sqlite), or a driver-specific label for mysql's
/// `SHOW FULL TABLES`, in which case the first string value wins.
fn table_name_from_row(row: &JsonValue) -> Option<String> {
    let obj = row.as_object()?;
    for key in ["table_name", "TABLE_NAME", "name"] {
        if let Some(name) = obj.get(key).and_then(JsonValue::as_str) {
            return Some(name.to_string());
        }
    }
    // mysql's SHOW FULL TABLES labels the column `Tables_in_<database>`
    if let Some(name) = obj
        .iter()
        .find(|(key, _)| key.starts_with("Tables_in"))
        .and_then(|(_, value)| value.as_str())
    {
        return Some(name.to_string());
    }
    obj.values()
        .find_map(JsonValue::as_str)
        .map(str::to_string)
}
