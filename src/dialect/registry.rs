//! Catalog query registry.
//!
//! Pure text templates: given an engine (and a table for the per-table
//! operations) produce the catalog SQL for that engine. No I/O happens here.
//! Table names are sanitized before interpolation even though callers are
//! expected to sanitize too; the registry must be safe on its own.

use super::Engine;
use super::sanitize::sanitize_identifier;

/// SQL listing tables and views in the connected database.
pub fn list_tables_query(engine: Engine) -> String {
    match engine {
        Engine::Postgres => "SELECT table_name, table_type \
             FROM information_schema.tables \
             WHERE table_schema = 'public' \
             ORDER BY table_name"
            .to_string(),
        Engine::MySql => "SHOW FULL TABLES".to_string(),
        Engine::Mssql => "SELECT TABLE_NAME as table_name, TABLE_TYPE as table_type \
             FROM INFORMATION_SCHEMA.TABLES \
             WHERE TABLE_TYPE IN ('BASE TABLE', 'VIEW') \
             ORDER BY TABLE_NAME"
            .to_string(),
        Engine::Sqlite => "SELECT name as table_name, type FROM sqlite_master \
             WHERE type IN ('table','view') ORDER BY name"
            .to_string(),
        Engine::Oracle => "SELECT table_name, 'TABLE' as table_type FROM user_tables \
             UNION ALL SELECT view_name, 'VIEW' FROM user_views ORDER BY 1"
            .to_string(),
    }
}

/// SQL describing the columns of a table.
pub fn describe_table_query(engine: Engine, table: &str) -> String {
    let table = sanitize_identifier(table);
    match engine {
        Engine::Postgres => format!(
            "SELECT column_name, data_type, character_maximum_length, \
             is_nullable, column_default \
             FROM information_schema.columns \
             WHERE table_name = '{table}' \
             ORDER BY ordinal_position"
        ),
        Engine::MySql => format!("DESCRIBE `{table}`"),
        Engine::Mssql => format!(
            "SELECT COLUMN_NAME as column_name, DATA_TYPE as data_type, \
             CHARACTER_MAXIMUM_LENGTH as max_length, IS_NULLABLE as is_nullable, \
             COLUMN_DEFAULT as column_default \
             FROM INFORMATION_SCHEMA.COLUMNS \
             WHERE TABLE_NAME = '{table}' \
             ORDER BY ORDINAL_POSITION"
        ),
        Engine::Sqlite => format!("PRAGMA table_info({table})"),
        Engine::Oracle => format!(
            "SELECT column_name, data_type, data_length, nullable, data_default \
             FROM user_tab_columns \
             WHERE table_name = UPPER('{table}') \
             ORDER BY column_id"
        ),
    }
}

/// SQL listing the indexes on a table.
pub fn table_indexes_query(engine: Engine, table: &str) -> String {
    let table = sanitize_identifier(table);
    match engine {
        Engine::Postgres => format!(
            "SELECT indexname as index_name, indexdef as definition \
             FROM pg_indexes \
             WHERE tablename = '{table}'"
        ),
        Engine::MySql => format!("SHOW INDEX FROM `{table}`"),
        Engine::Mssql => format!(
            "SELECT i.name as index_name, i.type_desc, c.name as column_name \
             FROM sys.indexes i \
             JOIN sys.index_columns ic ON i.object_id = ic.object_id AND i.index_id = ic.index_id \
             JOIN sys.columns c ON ic.object_id = c.object_id AND ic.column_id = c.column_id \
             WHERE OBJECT_NAME(i.object_id) = '{table}'"
        ),
        Engine::Sqlite => format!("PRAGMA index_list({table})"),
        Engine::Oracle => format!(
            "SELECT index_name, column_name, descend \
             FROM user_ind_columns \
             WHERE table_name = UPPER('{table}') \
             ORDER BY index_name, column_position"
        ),
    }
}

/// SQL listing the foreign keys declared on a table.
pub fn foreign_keys_query(engine: Engine, table: &str) -> String {
    let table = sanitize_identifier(table);
    match engine {
        Engine::Postgres => format!(
            "SELECT kcu.column_name, \
             ccu.table_name AS foreign_table_name, \
             ccu.column_name AS foreign_column_name \
             FROM information_schema.table_constraints AS tc \
             JOIN information_schema.key_column_usage AS kcu \
             ON tc.constraint_name = kcu.constraint_name \
             JOIN information_schema.constraint_column_usage AS ccu \
             ON ccu.constraint_name = tc.constraint_name \
             WHERE tc.constraint_type = 'FOREIGN KEY' AND tc.table_name = '{table}'"
        ),
        Engine::MySql => format!(
            "SELECT COLUMN_NAME, REFERENCED_TABLE_NAME, REFERENCED_COLUMN_NAME \
             FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE \
             WHERE TABLE_NAME = '{table}' AND REFERENCED_TABLE_NAME IS NOT NULL"
        ),
        Engine::Mssql => format!(
            "SELECT col.name AS column_name, \
             ref_tab.name AS foreign_table, \
             ref_col.name AS foreign_column \
             FROM sys.foreign_key_columns fkc \
             JOIN sys.objects obj ON obj.object_id = fkc.constraint_object_id \
             JOIN sys.tables tab ON tab.object_id = fkc.parent_object_id \
             JOIN sys.columns col ON col.column_id = fkc.parent_column_id AND col.object_id = tab.object_id \
             JOIN sys.tables ref_tab ON ref_tab.object_id = fkc.referenced_object_id \
             JOIN sys.columns ref_col ON ref_col.column_id = fkc.referenced_column_id AND ref_col.object_id = ref_tab.object_id \
             WHERE tab.name = '{table}'"
        ),
        Engine::Sqlite => format!("PRAGMA foreign_key_list({table})"),
        Engine::Oracle => format!(
            "SELECT a.column_name, c_pk.table_name r_table_name, b.column_name r_column_name \
             FROM user_cons_columns a \
             JOIN user_constraints c ON a.owner = c.owner AND a.constraint_name = c.constraint_name \
             JOIN user_constraints c_pk ON c.r_owner = c_pk.owner AND c.r_constraint_name = c_pk.constraint_name \
             JOIN user_cons_columns b ON c_pk.owner = b.owner AND c_pk.constraint_name = b.constraint_name \
             WHERE c.constraint_type = 'R' AND a.table_name = UPPER('{table}')"
        ),
    }
}
