//! Dialect abstraction layer.
//!
//! Everything engine-specific that does not require a live connection lives
//! here: catalog query text, identifier sanitization, raw result
//! normalization, and query safety (classification plus limit injection).
//! All functions in this module are pure and safe under concurrent use.

pub mod normalize;
pub mod registry;
pub mod safety;
pub mod sanitize;

pub use normalize::{NormalizedRows, normalize};
pub use registry::{
    describe_table_query, foreign_keys_query, list_tables_query, table_indexes_query,
};
pub use safety::{DEFAULT_ROW_LIMIT, MAX_ROW_LIMIT, QueryKind, apply_limit, clamp_limit, classify, ensure_select_like};
pub use sanitize::sanitize_identifier;

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Supported database engines.
///
/// The set is closed: adding an engine means extending every exhaustive
/// match in this module, which the compiler enforces.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[value(alias = "postgresql")]
    Postgres,
    /// Includes MariaDB
    #[value(alias = "mariadb")]
    MySql,
    #[value(alias = "sqlserver")]
    Mssql,
    Sqlite,
    Oracle,
}

impl Engine {
    /// Get the display name for this engine.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Postgres => "PostgreSQL",
            Self::MySql => "MySQL",
            Self::Mssql => "SQL Server",
            Self::Sqlite => "SQLite",
            Self::Oracle => "Oracle",
        }
    }

    /// Get the default port for this engine. SQLite is file-based.
    pub fn default_port(&self) -> Option<u16> {
        match self {
            Self::Postgres => Some(5432),
            Self::MySql => Some(3306),
            Self::Mssql => Some(1433),
            Self::Sqlite => None,
            Self::Oracle => Some(1521),
        }
    }

    /// Minimal liveness probe for this engine.
    pub fn ping_query(&self) -> &'static str {
        match self {
            Self::Oracle => "SELECT 1 FROM DUAL",
            _ => "SELECT 1",
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
