//! Integration tests for the dialect catalog registry.
//!
//! The registry is pure text: every engine must produce non-empty catalog
//! SQL that targets its own system catalog and embeds only sanitized table
//! names.

use sql_gateway_mcp::dialect::{
    Engine, describe_table_query, foreign_keys_query, list_tables_query, sanitize_identifier,
    table_indexes_query,
};

const ALL_ENGINES: [Engine; 5] = [
    Engine::Postgres,
    Engine::MySql,
    Engine::Mssql,
    Engine::Sqlite,
    Engine::Oracle,
];

/// Every engine produces a non-empty query for every operation.
#[test]
fn test_registry_total_over_engines() {
    for engine in ALL_ENGINES {
        assert!(!list_tables_query(engine).trim().is_empty());
        assert!(!describe_table_query(engine, "users").trim().is_empty());
        assert!(!table_indexes_query(engine, "users").trim().is_empty());
        assert!(!foreign_keys_query(engine, "users").trim().is_empty());
    }
}

/// The same inputs always produce the same query text.
#[test]
fn test_registry_deterministic() {
    for engine in ALL_ENGINES {
        assert_eq!(
            describe_table_query(engine, "orders"),
            describe_table_query(engine, "orders")
        );
        assert_eq!(list_tables_query(engine), list_tables_query(engine));
    }
}

/// Each engine's list-tables query reads its own catalog.
#[test]
fn test_list_tables_targets_engine_catalog() {
    assert!(list_tables_query(Engine::Postgres).contains("information_schema.tables"));
    assert!(list_tables_query(Engine::Postgres).contains("table_schema = 'public'"));
    assert!(list_tables_query(Engine::MySql).contains("SHOW FULL TABLES"));
    assert!(list_tables_query(Engine::Mssql).contains("INFORMATION_SCHEMA.TABLES"));
    assert!(list_tables_query(Engine::Sqlite).contains("sqlite_master"));
    assert!(list_tables_query(Engine::Oracle).contains("user_tables"));
}

/// Describe-table queries order columns by catalog position where the
/// catalog supports it.
#[test]
fn test_describe_table_ordering() {
    assert!(describe_table_query(Engine::Postgres, "t").contains("ORDER BY ordinal_position"));
    assert!(describe_table_query(Engine::Mssql, "t").contains("ORDER BY ORDINAL_POSITION"));
    assert!(describe_table_query(Engine::Oracle, "t").contains("ORDER BY column_id"));
}

/// Oracle catalog lookups upcase the table name to match its default
/// identifier folding.
#[test]
fn test_oracle_upcases_table_name() {
    assert!(describe_table_query(Engine::Oracle, "users").contains("UPPER('users')"));
    assert!(table_indexes_query(Engine::Oracle, "users").contains("UPPER('users')"));
    assert!(foreign_keys_query(Engine::Oracle, "users").contains("UPPER('users')"));
}

/// SQLite schema tools ride on PRAGMA statements.
#[test]
fn test_sqlite_uses_pragmas() {
    assert_eq!(
        describe_table_query(Engine::Sqlite, "users"),
        "PRAGMA table_info(users)"
    );
    assert_eq!(
        table_indexes_query(Engine::Sqlite, "users"),
        "PRAGMA index_list(users)"
    );
    assert_eq!(
        foreign_keys_query(Engine::Sqlite, "users"),
        "PRAGMA foreign_key_list(users)"
    );
}

/// Hostile table names cannot smuggle statement separators or comments into
/// the generated SQL.
#[test]
fn test_hostile_table_names_neutralized() {
    let hostile = "users; DROP TABLE x--";
    for engine in ALL_ENGINES {
        for sql in [
            describe_table_query(engine, hostile),
            table_indexes_query(engine, hostile),
            foreign_keys_query(engine, hostile),
        ] {
            assert!(!sql.contains(';'), "{engine}: {sql}");
            assert!(!sql.contains("--"), "{engine}: {sql}");
        }
    }
}

/// The sanitizer strips everything outside [A-Za-z0-9_.].
#[test]
fn test_sanitizer_alphabet() {
    assert_eq!(
        sanitize_identifier("users; DROP TABLE x--"),
        "usersDROPTABLEx"
    );
    assert_eq!(sanitize_identifier("public.users"), "public.users");
    assert_eq!(sanitize_identifier(""), "");

    let sanitized = sanitize_identifier("a!@#$%^&*()b 'c' \"d\" `e`");
    assert!(
        sanitized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    );
    assert_eq!(sanitized, "abcde");
}

/// Registry output embeds the sanitized form of the table argument.
#[test]
fn test_registry_embeds_sanitized_name() {
    let sql = describe_table_query(Engine::Postgres, "my table");
    assert!(sql.contains("'mytable'"));
    assert!(!sql.contains("my table"));
}
