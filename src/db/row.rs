//! Row-to-JSON conversion for the sqlx engines.
//!
//! Conversion is two-phase: the column's declared type is classified into a
//! `TypeCategory`, then an engine-specific decode cascade extracts the value.
//! NUMERIC/DECIMAL columns decode through `RawDecimal` to preserve the exact
//! database representation as a string; binary columns decode as UTF-8 text
//! when possible, base64 otherwise.

use serde_json::{Map, Value as JsonValue};
use sqlx::mysql::{MySqlRow, MySqlTypeInfo, MySqlValueRef};
use sqlx::postgres::{PgRow, PgTypeInfo, PgValueRef};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Decode, Row, Type, TypeInfo};

/// Logical category for database column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeCategory {
    Integer,
    Float,
    Decimal,
    Boolean,
    Binary,
    Json,
    Other,
}

fn categorize_type(type_name: &str, sqlite: bool) -> TypeCategory {
    let lower = type_name.to_lowercase();

    if lower.contains("decimal") || lower.contains("numeric") {
        // SQLite's NUMERIC affinity stores floats
        if sqlite {
            return TypeCategory::Float;
        }
        return TypeCategory::Decimal;
    }
    if lower.contains("int") || lower.contains("serial") || lower.contains("tiny") {
        return TypeCategory::Integer;
    }
    if lower == "bool" || lower == "boolean" {
        return TypeCategory::Boolean;
    }
    if lower.contains("float")
        || lower.contains("double")
        || lower == "real"
        || lower == "float4"
        || lower == "float8"
    {
        return TypeCategory::Float;
    }
    if lower == "json" || lower == "jsonb" {
        return TypeCategory::Json;
    }
    if lower.contains("blob") || lower.contains("binary") || lower == "bytea" {
        return TypeCategory::Binary;
    }
    TypeCategory::Other
}

/// Wrapper for raw DECIMAL/NUMERIC values as strings.
struct RawDecimal(String);

impl Type<sqlx::Postgres> for RawDecimal {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        let name = ty.name().to_lowercase();
        name.contains("numeric") || name.contains("decimal")
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for RawDecimal {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<sqlx::Postgres>>::decode(value)?;
        Ok(RawDecimal(s.to_string()))
    }
}

impl Type<sqlx::MySql> for RawDecimal {
    fn type_info() -> MySqlTypeInfo {
        <String as Type<sqlx::MySql>>::type_info()
    }

    fn compatible(ty: &MySqlTypeInfo) -> bool {
        let name = ty.name().to_lowercase();
        name.contains("decimal") || name.contains("numeric")
    }
}

impl<'r> Decode<'r, sqlx::MySql> for RawDecimal {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<sqlx::MySql>>::decode(value)?;
        Ok(RawDecimal(s.to_string()))
    }
}

/// Encode binary data: UTF-8 text when valid, base64 otherwise.
pub fn decode_binary_value(bytes: &[u8]) -> JsonValue {
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    match std::str::from_utf8(bytes) {
        Ok(s) => JsonValue::String(s.to_string()),
        Err(_) => JsonValue::String(STANDARD.encode(bytes)),
    }
}

fn f64_to_json(v: f64) -> JsonValue {
    serde_json::Number::from_f64(v)
        .map(JsonValue::Number)
        .unwrap_or_else(|| JsonValue::String(v.to_string()))
}

/// Convert a PostgreSQL row into a JSON object.
pub fn pg_row_to_json(row: &PgRow) -> JsonValue {
    let map: Map<String, JsonValue> = row
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let category = categorize_type(col.type_info().name(), false);
            (col.name().to_string(), pg_decode(row, idx, category))
        })
        .collect();
    JsonValue::Object(map)
}

fn pg_decode(row: &PgRow, idx: usize, category: TypeCategory) -> JsonValue {
    match category {
        TypeCategory::Decimal => match row.try_get::<Option<RawDecimal>, _>(idx) {
            Ok(Some(v)) => JsonValue::String(v.0),
            _ => JsonValue::Null,
        },
        TypeCategory::Integer => {
            if let Ok(Some(v)) = row.try_get::<Option<i16>, _>(idx) {
                return JsonValue::Number(v.into());
            }
            if let Ok(Some(v)) = row.try_get::<Option<i32>, _>(idx) {
                return JsonValue::Number(v.into());
            }
            if let Ok(Some(v)) = row.try_get::<Option<i64>, _>(idx) {
                return JsonValue::Number(v.into());
            }
            JsonValue::Null
        }
        TypeCategory::Boolean => row
            .try_get::<Option<bool>, _>(idx)
            .ok()
            .flatten()
            .map(JsonValue::Bool)
            .unwrap_or(JsonValue::Null),
        TypeCategory::Float => {
            if let Ok(Some(v)) = row.try_get::<Option<f64>, _>(idx) {
                return f64_to_json(v);
            }
            if let Ok(Some(v)) = row.try_get::<Option<f32>, _>(idx) {
                return f64_to_json(v as f64);
            }
            JsonValue::Null
        }
        TypeCategory::Binary => row
            .try_get::<Option<Vec<u8>>, _>(idx)
            .ok()
            .flatten()
            .map(|v| decode_binary_value(&v))
            .unwrap_or(JsonValue::Null),
        TypeCategory::Json => row
            .try_get::<Option<JsonValue>, _>(idx)
            .ok()
            .flatten()
            .unwrap_or(JsonValue::Null),
        TypeCategory::Other => row
            .try_get::<Option<String>, _>(idx)
            .ok()
            .flatten()
            .map(JsonValue::String)
            .unwrap_or(JsonValue::Null),
    }
}

/// Convert a MySQL row into a JSON object.
pub fn mysql_row_to_json(row: &MySqlRow) -> JsonValue {
    let map: Map<String, JsonValue> = row
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let category = categorize_type(col.type_info().name(), false);
            (col.name().to_string(), mysql_decode(row, idx, category))
        })
        .collect();
    JsonValue::Object(map)
}

fn mysql_decode(row: &MySqlRow, idx: usize, category: TypeCategory) -> JsonValue {
    match category {
        TypeCategory::Decimal => match row.try_get::<Option<RawDecimal>, _>(idx) {
            Ok(Some(v)) => JsonValue::String(v.0),
            _ => JsonValue::Null,
        },
        TypeCategory::Integer => {
            if let Ok(Some(v)) = row.try_get::<Option<i8>, _>(idx) {
                return JsonValue::Number(v.into());
            }
            if let Ok(Some(v)) = row.try_get::<Option<i16>, _>(idx) {
                return JsonValue::Number(v.into());
            }
            if let Ok(Some(v)) = row.try_get::<Option<i32>, _>(idx) {
                return JsonValue::Number(v.into());
            }
            if let Ok(Some(v)) = row.try_get::<Option<i64>, _>(idx) {
                return JsonValue::Number(v.into());
            }
            if let Ok(Some(v)) = row.try_get::<Option<u64>, _>(idx) {
                return JsonValue::Number(v.into());
            }
            JsonValue::Null
        }
        TypeCategory::Boolean => row
            .try_get::<Option<bool>, _>(idx)
            .ok()
            .flatten()
            .map(JsonValue::Bool)
            .unwrap_or(JsonValue::Null),
        TypeCategory::Float => {
            if let Ok(Some(v)) = row.try_get::<Option<f64>, _>(idx) {
                return f64_to_json(v);
            }
            if let Ok(Some(v)) = row.try_get::<Option<f32>, _>(idx) {
                return f64_to_json(v as f64);
            }
            JsonValue::Null
        }
        TypeCategory::Binary => row
            .try_get::<Option<Vec<u8>>, _>(idx)
            .ok()
            .flatten()
            .map(|v| decode_binary_value(&v))
            .unwrap_or(JsonValue::Null),
        TypeCategory::Json => row
            .try_get::<Option<JsonValue>, _>(idx)
            .ok()
            .flatten()
            .unwrap_or(JsonValue::Null),
        TypeCategory::Other => row
            .try_get::<Option<String>, _>(idx)
            .ok()
            .flatten()
            .map(JsonValue::String)
            .unwrap_or(JsonValue::Null),
    }
}

/// Convert a SQLite row into a JSON object.
pub fn sqlite_row_to_json(row: &SqliteRow) -> JsonValue {
    let map: Map<String, JsonValue> = row
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let category = categorize_type(col.type_info().name(), true);
            (col.name().to_string(), sqlite_decode(row, idx, category))
        })
        .collect();
    JsonValue::Object(map)
}

fn sqlite_decode(row: &SqliteRow, idx: usize, category: TypeCategory) -> JsonValue {
    match category {
        TypeCategory::Integer => row
            .try_get::<Option<i64>, _>(idx)
            .ok()
            .flatten()
            .map(|v| JsonValue::Number(v.into()))
            .unwrap_or(JsonValue::Null),
        TypeCategory::Boolean => row
            .try_get::<Option<bool>, _>(idx)
            .ok()
            .flatten()
            .map(JsonValue::Bool)
            .unwrap_or(JsonValue::Null),
        TypeCategory::Float | TypeCategory::Decimal => row
            .try_get::<Option<f64>, _>(idx)
            .ok()
            .flatten()
            .map(f64_to_json)
            .unwrap_or(JsonValue::Null),
        TypeCategory::Binary => row
            .try_get::<Option<Vec<u8>>, _>(idx)
            .ok()
            .flatten()
            .map(|v| decode_binary_value(&v))
            .unwrap_or(JsonValue::Null),
        TypeCategory::Json | TypeCategory::Other => row
            .try_get::<Option<String>, _>(idx)
            .ok()
            .flatten()
            .map(JsonValue::String)
            .unwrap_or(JsonValue::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_type() {
        assert_eq!(categorize_type("INT", false), TypeCategory::Integer);
        assert_eq!(categorize_type("BIGINT", false), TypeCategory::Integer);
        assert_eq!(categorize_type("DECIMAL", false), TypeCategory::Decimal);
        assert_eq!(categorize_type("NUMERIC", true), TypeCategory::Float);
        assert_eq!(categorize_type("BOOLEAN", false), TypeCategory::Boolean);
        assert_eq!(categorize_type("FLOAT8", false), TypeCategory::Float);
        assert_eq!(categorize_type("JSONB", false), TypeCategory::Json);
        assert_eq!(categorize_type("BYTEA", false), TypeCategory::Binary);
        assert_eq!(categorize_type("VARCHAR", false), TypeCategory::Other);
    }

    #[test]
    fn test_decode_binary_value_valid_utf8() {
        assert_eq!(
            decode_binary_value(b"hello"),
            JsonValue::String("hello".to_string())
        );
    }

    #[test]
    fn test_decode_binary_value_invalid_utf8_uses_base64() {
        let bytes: &[u8] = &[0xFF, 0xFE, 0x00, 0x01];
        assert_eq!(
            decode_binary_value(bytes),
            JsonValue::String("//4AAQ==".to_string())
        );
    }

    #[test]
    fn test_f64_to_json_handles_nan() {
        assert_eq!(f64_to_json(1.5), serde_json::json!(1.5));
        assert_eq!(f64_to_json(f64::NAN), JsonValue::String("NaN".to_string()));
    }
}
