//! MCP tool implementations.
//!
//! Tool handlers sit between the MCP service and the executor:
//! - `query`: read path with safety classification and limit injection
//! - `write`: write path behind the read-only gate
//! - `schema`: catalog introspection via the dialect registry

pub mod query;
pub mod schema;
pub mod write;

pub use query::{QueryInput, QueryOutput, QueryToolHandler};
pub use schema::{
    DescribeTableOutput, ForeignKeysOutput, ListTablesOutput, SchemaSnapshotOutput,
    SchemaToolHandler, TableIndexesOutput, TableInput,
};
pub use write::{ExecuteInput, ExecuteOutput, WriteToolHandler};
