//! Query safety: statement classification and row-limit injection.
//!
//! Classification is a surface-level keyword check, not a parse. A statement
//! is read-only when its first keyword is SELECT, WITH, or EXPLAIN; anything
//! else takes the write path with its read-only gate. Limits are injected
//! per engine and only when the statement does not already carry one.

use super::Engine;
use crate::error::{GatewayError, GatewayResult};

/// Row limit applied when the caller does not supply one.
pub const DEFAULT_ROW_LIMIT: u32 = 100;
/// Hard ceiling on any row limit.
pub const MAX_ROW_LIMIT: u32 = 1000;

/// Result of surface-level statement classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// SELECT, WITH, or EXPLAIN prefix
    SelectLike,
    /// Everything else: DML, DDL, or unrecognized
    WriteOrDdl,
}

/// Classify a statement by its leading keyword.
pub fn classify(sql: &str) -> QueryKind {
    let upper = normalized_upper(sql);
    if upper.starts_with("SELECT") || upper.starts_with("WITH") || upper.starts_with("EXPLAIN") {
        QueryKind::SelectLike
    } else {
        QueryKind::WriteOrDdl
    }
}

/// Reject statements that are not SELECT-like.
pub fn ensure_select_like(sql: &str) -> GatewayResult<()> {
    match classify(sql) {
        QueryKind::SelectLike => Ok(()),
        QueryKind::WriteOrDdl => Err(GatewayError::policy(
            "query",
            "only SELECT, WITH, or EXPLAIN statements are allowed; use the execute tool for writes",
        )),
    }
}

/// Clamp a requested row limit into `[1, MAX_ROW_LIMIT]`, defaulting to
/// `DEFAULT_ROW_LIMIT` when absent.
pub fn clamp_limit(requested: Option<u32>) -> u32 {
    requested.unwrap_or(DEFAULT_ROW_LIMIT).clamp(1, MAX_ROW_LIMIT)
}

/// Inject a row limit into a SELECT-like statement, engine-appropriately.
///
/// Statements that already carry LIMIT, FETCH FIRST, or ROWNUM (or TOP for
/// SQL Server) are returned with only the trailing semicolon stripped, which
/// also makes this function idempotent.
pub fn apply_limit(sql: &str, limit: u32, engine: Engine) -> String {
    let clean = strip_trailing_semicolon(sql);
    let upper = normalized_upper(&clean);

    if upper.contains("LIMIT ") || upper.contains("FETCH FIRST") || upper.contains("ROWNUM") {
        return clean;
    }

    match engine {
        Engine::Oracle => format!("SELECT * FROM ({}) WHERE ROWNUM <= {}", clean, limit),
        Engine::Mssql => {
            if upper.contains("TOP ") {
                return clean;
            }
            if let Some(rest) = strip_select_prefix(&clean) {
                format!("SELECT TOP {}{}", limit, rest)
            } else {
                // WITH/EXPLAIN prefixes cannot take TOP at this position
                clean
            }
        }
        Engine::Postgres | Engine::MySql | Engine::Sqlite => {
            format!("{} LIMIT {}", clean, limit)
        }
    }
}

/// Uppercase and collapse all whitespace runs to single spaces.
fn normalized_upper(sql: &str) -> String {
    sql.to_uppercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_trailing_semicolon(sql: &str) -> String {
    let trimmed = sql.trim();
    trimmed
        .strip_suffix(';')
        .map(|s| s.trim_end())
        .unwrap_or(trimmed)
        .to_string()
}

/// Split off a leading `SELECT` keyword, case-insensitively, keeping the rest
/// (including its leading whitespace).
fn strip_select_prefix(sql: &str) -> Option<&str> {
    let trimmed = sql.trim_start();
    if trimmed.len() >= 6 && trimmed[..6].eq_ignore_ascii_case("select") {
        Some(&trimmed[6..])
    } else {
        None
    }
}
