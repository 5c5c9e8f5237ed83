//! Raw driver result normalization.
//!
//! Each driver hands back rows in its own envelope: node-style mssql drivers
//! use `{"recordset": [...]}`, postgres and oracle use `{"rows": [...]}`,
//! mysql returns a `[rows, fields]` pair, and sqlite returns the row array
//! directly. `normalize` flattens all of these into a plain row sequence so
//! the tool layer never sees engine-specific shapes.

use super::Engine;
use serde_json::Value as JsonValue;

/// Uniform result shape: an ordered sequence of row objects.
pub type NormalizedRows = Vec<JsonValue>;

/// Normalize a raw driver result into a row sequence.
///
/// Total: every input produces a result. `null` means "no rows". Shapes that
/// do not match the engine's convention pass through best-effort.
pub fn normalize(raw: JsonValue, engine: Engine) -> NormalizedRows {
    if raw.is_null() {
        return Vec::new();
    }

    match engine {
        Engine::Mssql => match raw {
            JsonValue::Object(mut obj) => match obj.remove("recordset") {
                Some(recordset) => into_rows(recordset),
                None => vec![JsonValue::Object(obj)],
            },
            other => passthrough(other),
        },
        Engine::Postgres | Engine::Oracle => match raw {
            JsonValue::Object(mut obj) => match obj.remove("rows") {
                Some(rows) => into_rows(rows),
                None => vec![JsonValue::Object(obj)],
            },
            other => passthrough(other),
        },
        Engine::MySql => match raw {
            // mysql drivers return [rows, fields]; only the rows matter
            JsonValue::Array(mut parts) if !parts.is_empty() => into_rows(parts.remove(0)),
            other => passthrough(other),
        },
        Engine::Sqlite => passthrough(raw),
    }
}

/// Interpret a value as a row sequence.
fn into_rows(value: JsonValue) -> NormalizedRows {
    match value {
        JsonValue::Null => Vec::new(),
        JsonValue::Array(rows) => rows,
        other => vec![other],
    }
}

/// Keep the value as-is: arrays become the row sequence, anything else a
/// single-row sequence.
fn passthrough(value: JsonValue) -> NormalizedRows {
    match value {
        JsonValue::Array(rows) => rows,
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_postgres_unwraps_rows() {
        let raw = json!({"rows": [{"a": 1}], "rowCount": 1});
        assert_eq!(normalize(raw, Engine::Postgres), vec![json!({"a": 1})]);
    }

    #[test]
    fn test_oracle_unwraps_rows() {
        let raw = json!({"rows": [{"ID": 7}]});
        assert_eq!(normalize(raw, Engine::Oracle), vec![json!({"ID": 7})]);
    }

    #[test]
    fn test_mssql_unwraps_recordset() {
        let raw = json!({"recordset": [{"a": 1}, {"a": 2}], "rowCount": 2});
        assert_eq!(
            normalize(raw, Engine::Mssql),
            vec![json!({"a": 1}), json!({"a": 2})]
        );
    }

    #[test]
    fn test_mysql_takes_first_tuple_element() {
        let raw = json!([[{"a": 1}], [{"field": "a"}]]);
        assert_eq!(normalize(raw, Engine::MySql), vec![json!({"a": 1})]);
    }

    #[test]
    fn test_sqlite_array_passes_through() {
        let raw = json!([{"a": 1}]);
        assert_eq!(normalize(raw, Engine::Sqlite), vec![json!({"a": 1})]);
    }

    #[test]
    fn test_null_means_no_rows_for_every_engine() {
        for engine in [
            Engine::Postgres,
            Engine::MySql,
            Engine::Mssql,
            Engine::Sqlite,
            Engine::Oracle,
        ] {
            assert!(normalize(JsonValue::Null, engine).is_empty());
        }
    }

    #[test]
    fn test_unexpected_shape_is_best_effort() {
        // Object without the expected key stays as a single row
        let raw = json!({"affectedRows": 3});
        assert_eq!(
            normalize(raw.clone(), Engine::Postgres),
            vec![json!({"affectedRows": 3})]
        );
        // Bare scalar becomes a one-element sequence
        assert_eq!(normalize(json!(42), Engine::Sqlite), vec![json!(42)]);
    }

    #[test]
    fn test_empty_rows() {
        assert!(normalize(json!({"rows": []}), Engine::Postgres).is_empty());
        assert!(normalize(json!({"recordset": []}), Engine::Mssql).is_empty());
        assert!(normalize(json!([[], []]), Engine::MySql).is_empty());
        assert!(normalize(json!([]), Engine::Sqlite).is_empty());
    }

    #[test]
    fn test_rows_key_null_means_no_rows() {
        assert!(normalize(json!({"rows": null}), Engine::Postgres).is_empty());
        assert!(normalize(json!({"recordset": null}), Engine::Mssql).is_empty());
    }
}
