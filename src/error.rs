//! Error types for the SQL Gateway MCP server.
//!
//! All errors flow through `GatewayError` using `thiserror`. The variants map
//! directly to how a failure should surface over MCP: configuration problems
//! are fatal at startup, policy violations are rejected before any SQL runs,
//! and driver errors pass through with an identifying prefix.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("Policy violation: {operation} - {reason}")]
    Policy { operation: String, reason: String },

    #[error("Driver error: {message}")]
    Driver {
        message: String,
        /// e.g., "42P01" for undefined table
        sql_state: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl GatewayError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a policy violation error.
    pub fn policy(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Policy {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a driver error with optional SQL state.
    pub fn driver(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::Driver {
            message: message.into(),
            sql_state,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Convert sqlx errors to GatewayError.
impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => GatewayError::config(msg.to_string()),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                GatewayError::driver(db_err.message(), code)
            }
            sqlx::Error::Io(io_err) => {
                GatewayError::driver(format!("I/O error: {}", io_err), None)
            }
            sqlx::Error::Tls(tls_err) => {
                GatewayError::driver(format!("TLS error: {}", tls_err), None)
            }
            sqlx::Error::Protocol(msg) => {
                GatewayError::driver(format!("Protocol error: {}", msg), None)
            }
            sqlx::Error::PoolTimedOut => {
                GatewayError::driver("Connection pool acquire timed out", None)
            }
            sqlx::Error::PoolClosed => GatewayError::driver("Connection pool is closed", None),
            sqlx::Error::ColumnDecode { index, source } => {
                GatewayError::internal(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => {
                GatewayError::internal(format!("Decode error: {}", source))
            }
            sqlx::Error::WorkerCrashed => GatewayError::internal("Database worker crashed"),
            other => GatewayError::driver(other.to_string(), None),
        }
    }
}

/// Convert tiberius errors to GatewayError.
impl From<tiberius::error::Error> for GatewayError {
    fn from(err: tiberius::error::Error) -> Self {
        match &err {
            tiberius::error::Error::Server(token) => GatewayError::driver(
                token.message().to_string(),
                Some(token.code().to_string()),
            ),
            _ => GatewayError::driver(err.to_string(), None),
        }
    }
}

impl From<bb8_tiberius::Error> for GatewayError {
    fn from(err: bb8_tiberius::Error) -> Self {
        match err {
            bb8_tiberius::Error::Tiberius(e) => e.into(),
            bb8_tiberius::Error::Io(e) => GatewayError::driver(format!("I/O error: {}", e), None),
        }
    }
}

impl From<bb8::RunError<bb8_tiberius::Error>> for GatewayError {
    fn from(err: bb8::RunError<bb8_tiberius::Error>) -> Self {
        match err {
            bb8::RunError::User(e) => e.into(),
            bb8::RunError::TimedOut => {
                GatewayError::driver("Connection pool acquire timed out", None)
            }
        }
    }
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Build sql_state data as JSON value for MCP error payloads.
fn sql_state_data(sql_state: &Option<String>) -> Option<serde_json::Value> {
    sql_state
        .as_ref()
        .map(|s| serde_json::json!({ "sql_state": s }))
}

/// Convert GatewayError to MCP ErrorData for semantic error categorization.
impl From<GatewayError> for rmcp::ErrorData {
    fn from(err: GatewayError) -> Self {
        match &err {
            // Policy and Config violations are caller-correctable -> invalid_params
            GatewayError::Policy { .. } => rmcp::ErrorData::invalid_params(err.to_string(), None),
            GatewayError::Config { .. } => rmcp::ErrorData::invalid_params(err.to_string(), None),

            // Driver errors pass through unchanged, sql_state attached when present
            GatewayError::Driver { sql_state, .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), sql_state_data(sql_state))
            }

            GatewayError::Internal { .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), None)
            }
        }
    }
}
