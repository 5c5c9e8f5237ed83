//! MCP service implementation using rmcp.
//!
//! This module defines the GatewayService struct with all gateway tools
//! exposed via the MCP protocol using the rmcp framework's macros.

use crate::config::ConnectionProfile;
use crate::db::Executor;
use crate::dialect::Engine;
use crate::tools::query::{QueryInput, QueryOutput, QueryToolHandler};
use crate::tools::schema::{
    DescribeTableOutput, ForeignKeysOutput, ListTablesOutput, SchemaSnapshotOutput,
    SchemaToolHandler, TableIndexesOutput, TableInput,
};
use crate::tools::write::{ExecuteInput, ExecuteOutput, WriteToolHandler};
use rmcp::Json;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    schemars::JsonSchema,
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use std::sync::Arc;

/// Output for the ping tool.
#[derive(Debug, Serialize, JsonSchema)]
pub struct PingOutput {
    /// Always "ok" when the database answered
    pub status: String,
    /// Connected engine
    pub engine: Engine,
    /// Database name or file the gateway is connected to
    pub database: String,
    /// True if write operations are rejected
    pub read_only: bool,
}

#[derive(Clone)]
pub struct GatewayService {
    /// Shared executor for the configured database
    executor: Arc<dyn Executor>,
    /// Immutable connection settings
    profile: Arc<ConnectionProfile>,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl GatewayService {
    /// Create a new GatewayService instance.
    pub fn new(executor: Arc<dyn Executor>, profile: Arc<ConnectionProfile>) -> Self {
        Self {
            executor,
            profile,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl GatewayService {
    #[tool(
        description = "Check database connectivity.\nReturns the engine, target database, and read-only status."
    )]
    async fn ping(&self) -> Result<Json<PingOutput>, McpError> {
        self.executor
            .execute(self.profile.engine.ping_query())
            .await?;
        Ok(Json(PingOutput {
            status: "ok".to_string(),
            engine: self.profile.engine,
            database: self.profile.database_label(),
            read_only: self.profile.read_only,
        }))
    }

    #[tool(
        description = "Execute a read-only SQL query (SELECT, WITH, or EXPLAIN).\nA row limit is applied automatically (default 100, max 1000).\nWrite statements are rejected; use the execute tool instead."
    )]
    async fn query(
        &self,
        Parameters(input): Parameters<QueryInput>,
    ) -> Result<Json<QueryOutput>, McpError> {
        let handler = QueryToolHandler::new(self.executor.clone(), self.profile.clone());
        handler.query(input).await.map(Json).map_err(Into::into)
    }

    #[tool(
        description = "Execute a write statement (INSERT, UPDATE, DELETE, DDL).\nRejected when the connection is read-only. Returns the affected row count."
    )]
    async fn execute(
        &self,
        Parameters(input): Parameters<ExecuteInput>,
    ) -> Result<Json<ExecuteOutput>, McpError> {
        let handler = WriteToolHandler::new(self.executor.clone(), self.profile.clone());
        handler.execute(input).await.map(Json).map_err(Into::into)
    }

    #[tool(description = "List all tables and views in the connected database.")]
    async fn list_tables(&self) -> Result<Json<ListTablesOutput>, McpError> {
        let handler = SchemaToolHandler::new(self.executor.clone(), self.profile.clone());
        handler.list_tables().await.map(Json).map_err(Into::into)
    }

    #[tool(
        description = "Describe the columns of a table: names, types, nullability, defaults."
    )]
    async fn describe_table(
        &self,
        Parameters(input): Parameters<TableInput>,
    ) -> Result<Json<DescribeTableOutput>, McpError> {
        let handler = SchemaToolHandler::new(self.executor.clone(), self.profile.clone());
        handler
            .describe_table(input)
            .await
            .map(Json)
            .map_err(Into::into)
    }

    #[tool(description = "List the indexes defined on a table.")]
    async fn table_indexes(
        &self,
        Parameters(input): Parameters<TableInput>,
    ) -> Result<Json<TableIndexesOutput>, McpError> {
        let handler = SchemaToolHandler::new(self.executor.clone(), self.profile.clone());
        handler
            .table_indexes(input)
            .await
            .map(Json)
            .map_err(Into::into)
    }

    #[tool(description = "List the foreign keys declared on a table.")]
    async fn foreign_keys(
        &self,
        Parameters(input): Parameters<TableInput>,
    ) -> Result<Json<ForeignKeysOutput>, McpError> {
        let handler = SchemaToolHandler::new(self.executor.clone(), self.profile.clone());
        handler
            .foreign_keys(input)
            .await
            .map(Json)
            .map_err(Into::into)
    }

    #[tool(
        description = "Snapshot the whole schema: every table with its column descriptions.\nUseful as a first call to orient in an unfamiliar database."
    )]
    async fn schema_snapshot(&self) -> Result<Json<SchemaSnapshotOutput>, McpError> {
        let handler = SchemaToolHandler::new(self.executor.clone(), self.profile.clone());
        handler
            .schema_snapshot()
            .await
            .map(Json)
            .map_err(Into::into)
    }
}

#[tool_handler]
impl ServerHandler for GatewayService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "sql-gateway-mcp".to_owned(),
                title: Some("SQL Gateway MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "SQL gateway tools for one configured database connection.\n\
                \n\
                ## Workflow\n\
                1. Call `ping` to confirm connectivity and see the engine and read-only status\n\
                2. Call `list_tables` or `schema_snapshot` to orient in the schema\n\
                3. Use `query` for reads; a row limit is applied automatically\n\
                4. Use `execute` for writes (rejected on read-only connections)\n\
                \n\
                ## Notes\n\
                - `query` accepts only SELECT, WITH, or EXPLAIN statements\n\
                - Table names passed to schema tools are stripped to [A-Za-z0-9_.]\n\
                - Engines: PostgreSQL, MySQL/MariaDB, SQL Server, SQLite, Oracle"
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayResult;
    use async_trait::async_trait;
    use serde_json::Value as JsonValue;

    struct NullExecutor;

    #[async_trait]
    impl Executor for NullExecutor {
        async fn execute(&self, _sql: &str) -> GatewayResult<JsonValue> {
            Ok(JsonValue::Null)
        }
    }

    fn test_profile() -> ConnectionProfile {
        let config = crate::config::Config {
            database: Some("app".to_string()),
            ..crate::config::Config::default()
        };
        config.connection_profile().unwrap()
    }

    #[test]
    fn test_service_creation() {
        let _service = GatewayService::new(Arc::new(NullExecutor), Arc::new(test_profile()));
    }

    #[test]
    fn test_server_info() {
        let service = GatewayService::new(Arc::new(NullExecutor), Arc::new(test_profile()));
        let info = service.get_info();
        assert_eq!(info.server_info.name, "sql-gateway-mcp");
        assert!(info.capabilities.tools.is_some());
    }

    struct FailingExecutor;

    #[async_trait]
    impl Executor for FailingExecutor {
        async fn execute(&self, _sql: &str) -> GatewayResult<JsonValue> {
            Err(crate::error::GatewayError::driver("connection refused", None))
        }
    }

    #[tokio::test]
    async fn test_ping_surfaces_driver_errors() {
        let service = GatewayService::new(Arc::new(FailingExecutor), Arc::new(test_profile()));
        let err = match service.ping().await {
            Err(err) => err,
            Ok(_) => panic!("ping should fail when the database is unreachable"),
        };
        assert_eq!(err.code.0, -32603);
    }

    #[tokio::test]
    async fn test_ping_reports_profile() {
        let service = GatewayService::new(Arc::new(NullExecutor), Arc::new(test_profile()));
        let Json(output) = service.ping().await.unwrap();
        assert_eq!(output.status, "ok");
        assert_eq!(output.engine, Engine::Postgres);
        assert_eq!(output.database, "app");
        assert!(!output.read_only);
    }
}
