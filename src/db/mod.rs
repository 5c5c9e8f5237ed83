//! Database execution layer.
//!
//! The dialect layer is pure; everything that touches a live connection is
//! behind the `Executor` trait here. `connect` picks the bundled executor for
//! the profile's engine: sqlx pools for PostgreSQL/MySQL/SQLite, a
//! tiberius/bb8 pool for SQL Server.

pub mod executor;
pub mod mssql;
pub mod pool;
pub mod row;

pub use executor::{Executor, connect};
pub use mssql::MssqlExecutor;
pub use pool::SqlxExecutor;
