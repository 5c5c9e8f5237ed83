//! SQL Gateway MCP Server Library
//!
//! This library provides MCP (Model Context Protocol) tools for AI assistants
//! to query and inspect SQL databases across five engines (PostgreSQL, MySQL,
//! SQL Server, SQLite, Oracle) through one dialect abstraction layer.

pub mod config;
pub mod db;
pub mod dialect;
pub mod error;
pub mod mcp;
pub mod tools;
pub mod transport;

pub use config::{Config, ConnectionProfile};
pub use dialect::Engine;
pub use error::GatewayError;
pub use mcp::GatewayService;
