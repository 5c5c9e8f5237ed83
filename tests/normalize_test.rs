//! Integration tests for raw driver result normalization.

use serde_json::{Value as JsonValue, json};
use sql_gateway_mcp::dialect::{Engine, normalize};

const ALL_ENGINES: [Engine; 5] = [
    Engine::Postgres,
    Engine::MySql,
    Engine::Mssql,
    Engine::Sqlite,
    Engine::Oracle,
];

/// Postgres and Oracle results unwrap the `rows` key.
#[test]
fn test_rows_envelope_unwrapped() {
    assert_eq!(
        normalize(json!({"rows": [{"a": 1}], "rowCount": 1}), Engine::Postgres),
        vec![json!({"a": 1})]
    );
    assert_eq!(
        normalize(json!({"rows": [{"ID": 1}, {"ID": 2}]}), Engine::Oracle),
        vec![json!({"ID": 1}), json!({"ID": 2})]
    );
}

/// SQL Server results unwrap the `recordset` key.
#[test]
fn test_recordset_envelope_unwrapped() {
    assert_eq!(
        normalize(
            json!({"recordset": [{"n": 1}], "rowCount": 1}),
            Engine::Mssql
        ),
        vec![json!({"n": 1})]
    );
}

/// MySQL results take the first element of the driver's [rows, fields] pair.
#[test]
fn test_mysql_pair_unwrapped() {
    assert_eq!(
        normalize(json!([[{"a": 1}], [{"name": "a"}]]), Engine::MySql),
        vec![json!({"a": 1})]
    );
}

/// SQLite results pass through: arrays become the sequence, a lone object
/// becomes a one-row sequence.
#[test]
fn test_sqlite_passthrough() {
    assert_eq!(
        normalize(json!([{"a": 1}, {"a": 2}]), Engine::Sqlite),
        vec![json!({"a": 1}), json!({"a": 2})]
    );
    assert_eq!(
        normalize(json!({"rowCount": 0}), Engine::Sqlite),
        vec![json!({"rowCount": 0})]
    );
}

/// Null normalizes to the empty sequence for every engine.
#[test]
fn test_null_is_empty_everywhere() {
    for engine in ALL_ENGINES {
        assert!(normalize(JsonValue::Null, engine).is_empty(), "{engine}");
    }
}

/// Empty result sets stay empty.
#[test]
fn test_empty_results() {
    assert!(normalize(json!({"rows": []}), Engine::Postgres).is_empty());
    assert!(normalize(json!({"recordset": []}), Engine::Mssql).is_empty());
    assert!(normalize(json!([[], []]), Engine::MySql).is_empty());
    assert!(normalize(json!([]), Engine::Sqlite).is_empty());
    assert!(normalize(json!({"rows": []}), Engine::Oracle).is_empty());
}

/// Normalization never fails: shapes that miss the engine convention pass
/// through best-effort instead of erroring.
#[test]
fn test_unexpected_shapes_total() {
    // Envelope key missing
    assert_eq!(
        normalize(json!({"affectedRows": 2}), Engine::Postgres),
        vec![json!({"affectedRows": 2})]
    );
    assert_eq!(
        normalize(json!({"something": true}), Engine::Mssql),
        vec![json!({"something": true})]
    );
    // Scalar instead of an envelope
    for engine in ALL_ENGINES {
        let out = normalize(json!("weird"), engine);
        assert_eq!(out.len(), 1, "{engine}");
    }
}

/// Row order is preserved through normalization.
#[test]
fn test_order_preserved() {
    let rows = json!([{"n": 3}, {"n": 1}, {"n": 2}]);
    let out = normalize(json!({"rows": rows}), Engine::Postgres);
    assert_eq!(out[0], json!({"n": 3}));
    assert_eq!(out[1], json!({"n": 1}));
    assert_eq!(out[2], json!({"n": 2}));
}
