use crate::error::{AssistantError, Result};
use serde::Serialize;
use std::time::Instant;
use tokio_postgres::types::Type;
use tokio_postgres::Client;

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<Vec<serde_json::Value>>,
    pub row_count: usize,
    pub execution_time_ms: u128,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: String,
}

impl ExecutionResult {
    /// Rows as ordered column → value mappings, one object per row.
    pub fn row_mappings(&self) -> Vec<serde_json::Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut obj = serde_json::Map::new();
                for (col, value) in self.columns.iter().zip(row) {
                    obj.insert(col.name.clone(), value.clone());
                }
                serde_json::Value::Object(obj)
            })
            .collect()
    }
}

/// Run a statement and collect every row. No safety check happens here; the
/// orchestrator only hands over SQL that passed validation.
pub async fn execute_query(client: &Client, sql: &str) -> Result<ExecutionResult> {
    let start = Instant::now();

    let stmt = client
        .prepare(sql)
        .await
        .map_err(|e| AssistantError::Execution(e.to_string()))?;
    let rows = client
        .query(&stmt, &[])
        .await
        .map_err(|e| AssistantError::Execution(e.to_string()))?;
    let execution_time_ms = start.elapsed().as_millis();

    let columns: Vec<ColumnDef> = stmt
        .columns()
        .iter()
        .map(|col| ColumnDef {
            name: col.name().to_string(),
            data_type: pg_type_to_string(col.type_()),
        })
        .collect();

    let mut result_rows = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut values = Vec::with_capacity(columns.len());
        for (i, col) in stmt.columns().iter().enumerate() {
            values.push(pg_value_to_json(row, i, col.type_()));
        }
        result_rows.push(values);
    }

    let row_count = result_rows.len();

    Ok(ExecutionResult {
        columns,
        rows: result_rows,
        row_count,
        execution_time_ms,
    })
}

fn pg_type_to_string(pg_type: &Type) -> String {
    match *pg_type {
        Type::BOOL => "boolean".into(),
        Type::INT2 => "smallint".into(),
        Type::INT4 => "integer".into(),
        Type::INT8 => "bigint".into(),
        Type::FLOAT4 => "real".into(),
        Type::FLOAT8 => "double precision".into(),
        Type::NUMERIC => "numeric".into(),
        Type::VARCHAR => "varchar".into(),
        Type::TEXT => "text".into(),
        Type::BPCHAR => "char".into(),
        Type::TIMESTAMP => "timestamp".into(),
        Type::TIMESTAMPTZ => "timestamptz".into(),
        Type::DATE => "date".into(),
        Type::TIME => "time".into(),
        Type::UUID => "uuid".into(),
        Type::JSON => "json".into(),
        Type::JSONB => "jsonb".into(),
        Type::BYTEA => "bytea".into(),
        _ => pg_type.name().to_string(),
    }
}

fn pg_value_to_json(row: &tokio_postgres::Row, idx: usize, pg_type: &Type) -> serde_json::Value {
    match *pg_type {
        Type::BOOL => row
            .try_get::<_, Option<bool>>(idx)
            .ok()
            .flatten()
            .map(serde_json::Value::Bool)
            .unwrap_or(serde_json::Value::Null),
        Type::INT2 => row
            .try_get::<_, Option<i16>>(idx)
            .ok()
            .flatten()
            .map(|v| serde_json::Value::Number(v.into()))
            .unwrap_or(serde_json::Value::Null),
        Type::INT4 => row
            .try_get::<_, Option<i32>>(idx)
            .ok()
            .flatten()
            .map(|v| serde_json::Value::Number(v.into()))
            .unwrap_or(serde_json::Value::Null),
        Type::INT8 => row
            .try_get::<_, Option<i64>>(idx)
            .ok()
            .flatten()
            .map(|v| serde_json::Value::Number(v.into()))
            .unwrap_or(serde_json::Value::Null),
        Type::FLOAT4 => row
            .try_get::<_, Option<f32>>(idx)
            .ok()
            .flatten()
            .and_then(|v| serde_json::Number::from_f64(v as f64))
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Type::FLOAT8 => row
            .try_get::<_, Option<f64>>(idx)
            .ok()
            .flatten()
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Type::JSON | Type::JSONB => row
            .try_get::<_, Option<serde_json::Value>>(idx)
            .ok()
            .flatten()
            .unwrap_or(serde_json::Value::Null),
        // Aggregates over integers come back as numeric, so SUM/AVG results
        // land here; rendered as text to keep arbitrary precision
        Type::NUMERIC => text_value(
            row.try_get::<_, Option<rust_decimal::Decimal>>(idx)
                .ok()
                .flatten(),
        ),
        Type::TIMESTAMP => text_value(
            row.try_get::<_, Option<chrono::NaiveDateTime>>(idx)
                .ok()
                .flatten(),
        ),
        Type::TIMESTAMPTZ => row
            .try_get::<_, Option<chrono::DateTime<chrono::Utc>>>(idx)
            .ok()
            .flatten()
            .map(|v| serde_json::Value::String(v.to_rfc3339()))
            .unwrap_or(serde_json::Value::Null),
        Type::DATE => text_value(
            row.try_get::<_, Option<chrono::NaiveDate>>(idx)
                .ok()
                .flatten(),
        ),
        Type::TIME => text_value(
            row.try_get::<_, Option<chrono::NaiveTime>>(idx)
                .ok()
                .flatten(),
        ),
        Type::UUID => text_value(
            row.try_get::<_, Option<uuid::Uuid>>(idx)
                .ok()
                .flatten(),
        ),
        _ => {
            // Fallback: try to get as string
            row.try_get::<_, Option<String>>(idx)
                .ok()
                .flatten()
                .map(serde_json::Value::String)
                .unwrap_or(serde_json::Value::Null)
        }
    }
}

/// Textual rendering for types JSON has no native shape for (decimals,
/// dates, times, uuids). NULL stays NULL.
fn text_value<T: ToString>(value: Option<T>) -> serde_json::Value {
    value
        .map(|v| serde_json::Value::String(v.to_string()))
        .unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_pg_types_render_sql_names() {
        assert_eq!(pg_type_to_string(&Type::INT8), "bigint");
        assert_eq!(pg_type_to_string(&Type::TEXT), "text");
        assert_eq!(pg_type_to_string(&Type::TIMESTAMPTZ), "timestamptz");
        assert_eq!(pg_type_to_string(&Type::NUMERIC), "numeric");
        assert_eq!(pg_type_to_string(&Type::TIME), "time");
    }

    #[test]
    fn numeric_and_time_values_render_as_text_not_null() {
        use std::str::FromStr;

        let total = rust_decimal::Decimal::from_str("12345.67").unwrap();
        assert_eq!(text_value(Some(total)), serde_json::json!("12345.67"));

        let t = chrono::NaiveTime::from_hms_opt(13, 45, 30).unwrap();
        assert_eq!(text_value(Some(t)), serde_json::json!("13:45:30"));

        assert_eq!(
            text_value::<rust_decimal::Decimal>(None),
            serde_json::Value::Null
        );
    }

    #[test]
    fn row_mappings_preserve_column_order() {
        let result = ExecutionResult {
            columns: vec![
                ColumnDef {
                    name: "product".into(),
                    data_type: "text".into(),
                },
                ColumnDef {
                    name: "quantity".into(),
                    data_type: "bigint".into(),
                },
            ],
            rows: vec![vec![
                serde_json::Value::String("widget".into()),
                serde_json::Value::Number(7.into()),
            ]],
            row_count: 1,
            execution_time_ms: 0,
        };

        let mappings = result.row_mappings();
        assert_eq!(mappings.len(), 1);
        let obj = mappings[0].as_object().unwrap();
        let keys: Vec<_> = obj.keys().collect();
        assert_eq!(keys, ["product", "quantity"]);
        assert_eq!(obj["quantity"], serde_json::json!(7));
    }
}
