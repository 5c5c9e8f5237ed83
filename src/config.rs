//! Configuration handling for the SQL Gateway MCP server.
//!
//! Configuration comes from CLI flags and environment variables. The database
//! side mirrors the conventional `DB_*` variables; the server side uses
//! `MCP_*`. Everything is validated once at startup into an immutable
//! `ConnectionProfile` that the rest of the server shares by `Arc`.

use crate::dialect::Engine;
use crate::error::{GatewayError, GatewayResult};
use clap::{Parser, ValueEnum};
use url::Url;

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/";
pub const DEFAULT_POOL_MIN: u32 = 1;
pub const DEFAULT_POOL_MAX: u32 = 5;

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// HTTP with streaming responses (for web clients)
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Connection pool bounds.
#[derive(Debug, Clone, Copy)]
pub struct PoolBounds {
    pub min: u32,
    pub max: u32,
}

impl Default for PoolBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_POOL_MIN,
            max: DEFAULT_POOL_MAX,
        }
    }
}

/// Validated, immutable connection settings built once at startup.
#[derive(Debug, Clone)]
pub struct ConnectionProfile {
    pub engine: Engine,
    pub host: String,
    /// Engine default applied when unset. None only for SQLite.
    pub port: Option<u16>,
    pub user: Option<String>,
    /// Sensitive - never log
    pub password: Option<String>,
    pub database: Option<String>,
    /// SQLite only
    pub filename: Option<String>,
    /// Full driver URL; overrides the assembled host/port/database URL
    pub connection_string: Option<String>,
    pub read_only: bool,
    pub pool: PoolBounds,
}

impl ConnectionProfile {
    /// Driver connection URL for the sqlx engines.
    ///
    /// Uses the explicit connection string when provided, otherwise assembles
    /// one from the profile fields with credentials percent-encoded.
    pub fn url(&self) -> GatewayResult<String> {
        if let Some(cs) = &self.connection_string {
            return Ok(cs.clone());
        }

        if self.engine == Engine::Sqlite {
            let filename = self.filename.as_deref().ok_or_else(|| {
                GatewayError::config("DB_FILENAME is required for sqlite")
            })?;
            return Ok(format!("sqlite://{}", filename));
        }

        let scheme = match self.engine {
            Engine::Postgres => "postgres",
            Engine::MySql => "mysql",
            Engine::Mssql => "mssql",
            Engine::Oracle => "oracle",
            Engine::Sqlite => unreachable!(),
        };

        let mut url = Url::parse(&format!("{}://{}", scheme, self.host))
            .map_err(|e| GatewayError::config(format!("Invalid host: {e}")))?;
        if let Some(port) = self.port {
            url.set_port(Some(port))
                .map_err(|_| GatewayError::config("Invalid port"))?;
        }
        if let Some(user) = &self.user {
            url.set_username(user)
                .map_err(|_| GatewayError::config("Invalid user"))?;
            if let Some(password) = &self.password {
                url.set_password(Some(password))
                    .map_err(|_| GatewayError::config("Invalid password"))?;
            }
        }
        if let Some(database) = &self.database {
            url.set_path(database);
        }
        Ok(url.to_string())
    }

    /// Human-readable target for the startup banner and ping output.
    pub fn database_label(&self) -> String {
        if let Some(db) = &self.database {
            return db.clone();
        }
        if let Some(file) = &self.filename {
            return file.clone();
        }
        "(connection string)".to_string()
    }

    /// Display-safe URL with the password masked.
    pub fn masked_url(&self) -> String {
        let url = match self.url() {
            Ok(url) => url,
            Err(_) => return "(invalid)".to_string(),
        };
        if let Some(at_pos) = url.find('@') {
            if let Some(colon_pos) = url[..at_pos].rfind(':') {
                return format!("{}****{}", &url[..colon_pos + 1], &url[at_pos..]);
            }
        }
        url
    }
}

/// Configuration for the SQL Gateway MCP server.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sql-gateway-mcp",
    about = "MCP gateway for SQL databases - uniform query and schema tools across five engines",
    version,
    author
)]
pub struct Config {
    /// Database engine
    #[arg(long = "client", value_enum, default_value = "postgres", env = "DB_CLIENT")]
    pub engine: Engine,

    /// Database host
    #[arg(long, default_value = "localhost", env = "DB_HOST")]
    pub host: String,

    /// Database port (engine default when omitted)
    #[arg(long, env = "DB_PORT")]
    pub port: Option<u16>,

    /// Database user
    #[arg(long, env = "DB_USER")]
    pub user: Option<String>,

    /// Database password
    #[arg(long, env = "DB_PASSWORD")]
    pub password: Option<String>,

    /// Database name (required for every engine except sqlite)
    #[arg(long, env = "DB_NAME")]
    pub database: Option<String>,

    /// SQLite database file path
    #[arg(long, env = "DB_FILENAME")]
    pub filename: Option<String>,

    /// Full connection string; overrides host/port/user/password/database
    #[arg(long, env = "DB_CONNECTION_STRING")]
    pub connection_string: Option<String>,

    /// Reject all write operations
    #[arg(long, env = "DB_READONLY")]
    pub read_only: bool,

    /// Minimum pool connections
    #[arg(long, default_value_t = DEFAULT_POOL_MIN, env = "DB_POOL_MIN")]
    pub pool_min: u32,

    /// Maximum pool connections
    #[arg(long, default_value_t = DEFAULT_POOL_MAX, env = "DB_POOL_MAX")]
    pub pool_max: u32,

    /// Transport mode (stdio or http)
    #[arg(short, long, value_enum, default_value = "stdio", env = "MCP_TRANSPORT")]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(long, default_value = DEFAULT_HTTP_HOST, env = "MCP_HTTP_HOST")]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(long, default_value_t = DEFAULT_HTTP_PORT, env = "MCP_HTTP_PORT")]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(long, default_value = DEFAULT_MCP_ENDPOINT, env = "MCP_ENDPOINT")]
    pub mcp_endpoint: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// Parse configuration from command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            engine: Engine::Postgres,
            host: "localhost".to_string(),
            port: None,
            user: None,
            password: None,
            database: None,
            filename: None,
            connection_string: None,
            read_only: false,
            pool_min: DEFAULT_POOL_MIN,
            pool_max: DEFAULT_POOL_MAX,
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// Validate the database settings into an immutable profile.
    ///
    /// Errors name the missing field so startup failures are actionable.
    pub fn connection_profile(&self) -> GatewayResult<ConnectionProfile> {
        if self.pool_min == 0 {
            return Err(GatewayError::config("DB_POOL_MIN must be greater than 0"));
        }
        if self.pool_min > self.pool_max {
            return Err(GatewayError::config(format!(
                "DB_POOL_MIN ({}) cannot exceed DB_POOL_MAX ({})",
                self.pool_min, self.pool_max
            )));
        }

        if self.connection_string.is_none() {
            match self.engine {
                Engine::Sqlite => {
                    if self.filename.is_none() {
                        return Err(GatewayError::config(
                            "DB_FILENAME is required for sqlite (or set DB_CONNECTION_STRING)",
                        ));
                    }
                }
                _ => {
                    if self.database.is_none() {
                        return Err(GatewayError::config(format!(
                            "DB_NAME is required for {} (or set DB_CONNECTION_STRING)",
                            self.engine
                        )));
                    }
                }
            }
        }

        Ok(ConnectionProfile {
            engine: self.engine,
            host: self.host.clone(),
            port: self.port.or_else(|| self.engine.default_port()),
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
            filename: self.filename.clone(),
            connection_string: self.connection_string.clone(),
            read_only: self.read_only,
            pool: PoolBounds {
                min: self.pool_min,
                max: self.pool_max,
            },
        })
    }

    /// Get the HTTP bind address.
    pub fn http_bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.transport, TransportMode::Stdio);
        assert_eq!(config.engine, Engine::Postgres);
        assert_eq!(config.host, "localhost");
        assert!(!config.read_only);
    }

    #[test]
    fn test_http_bind_addr() {
        let config = Config {
            http_host: "0.0.0.0".to_string(),
            http_port: 3000,
            ..Config::default()
        };
        assert_eq!(config.http_bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_profile_requires_database_for_postgres() {
        let config = Config::default();
        let err = config.connection_profile().unwrap_err();
        assert!(err.to_string().contains("DB_NAME"));
    }

    #[test]
    fn test_profile_requires_filename_for_sqlite() {
        let config = Config {
            engine: Engine::Sqlite,
            ..Config::default()
        };
        let err = config.connection_profile().unwrap_err();
        assert!(err.to_string().contains("DB_FILENAME"));
    }

    #[test]
    fn test_connection_string_lifts_requirements() {
        let config = Config {
            connection_string: Some("postgres://u:p@host/db".to_string()),
            ..Config::default()
        };
        let profile = config.connection_profile().unwrap();
        assert_eq!(profile.url().unwrap(), "postgres://u:p@host/db");
    }

    #[test]
    fn test_profile_applies_default_port() {
        let config = Config {
            database: Some("app".to_string()),
            ..Config::default()
        };
        let profile = config.connection_profile().unwrap();
        assert_eq!(profile.port, Some(5432));

        let config = Config {
            engine: Engine::Mssql,
            database: Some("app".to_string()),
            ..Config::default()
        };
        assert_eq!(config.connection_profile().unwrap().port, Some(1433));
    }

    #[test]
    fn test_explicit_port_wins() {
        let config = Config {
            engine: Engine::MySql,
            database: Some("app".to_string()),
            port: Some(13306),
            ..Config::default()
        };
        assert_eq!(config.connection_profile().unwrap().port, Some(13306));
    }

    #[test]
    fn test_pool_bounds_validated() {
        let config = Config {
            database: Some("app".to_string()),
            pool_min: 10,
            pool_max: 5,
            ..Config::default()
        };
        let err = config.connection_profile().unwrap_err();
        assert!(err.to_string().contains("DB_POOL_MIN"));

        let config = Config {
            database: Some("app".to_string()),
            pool_min: 0,
            ..Config::default()
        };
        assert!(config.connection_profile().is_err());
    }

    #[test]
    fn test_url_assembly_encodes_credentials() {
        let config = Config {
            engine: Engine::MySql,
            host: "db.internal".to_string(),
            user: Some("app".to_string()),
            password: Some("p@ss:word".to_string()),
            database: Some("sales".to_string()),
            ..Config::default()
        };
        let url = config.connection_profile().unwrap().url().unwrap();
        assert!(url.starts_with("mysql://app:"));
        assert!(url.ends_with("@db.internal:3306/sales"));
        // Raw password must not survive unencoded
        assert!(!url.contains("p@ss:word"));
    }

    #[test]
    fn test_sqlite_url_from_filename() {
        let config = Config {
            engine: Engine::Sqlite,
            filename: Some("data/app.db".to_string()),
            ..Config::default()
        };
        let profile = config.connection_profile().unwrap();
        assert_eq!(profile.url().unwrap(), "sqlite://data/app.db");
        assert_eq!(profile.database_label(), "data/app.db");
    }

    #[test]
    fn test_masked_url_hides_password() {
        let config = Config {
            database: Some("app".to_string()),
            user: Some("svc".to_string()),
            password: Some("secret".to_string()),
            ..Config::default()
        };
        let profile = config.connection_profile().unwrap();
        let masked = profile.masked_url();
        assert!(!masked.contains("secret"));
        assert!(masked.contains("****"));
    }

    #[test]
    fn test_database_label() {
        let config = Config {
            database: Some("sales".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.connection_profile().unwrap().database_label(),
            "sales"
        );

        let config = Config {
            connection_string: Some("postgres://h/d".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.connection_profile().unwrap().database_label(),
            "(connection string)"
        );
    }
}
