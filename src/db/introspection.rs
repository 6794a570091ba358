use crate::error::{AssistantError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio_postgres::Client;

/// The `(catalog, schema, table)` triple naming the one table the assistant
/// answers questions about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableIdentity {
    pub catalog: String,
    pub schema: String,
    pub table: String,
}

impl TableIdentity {
    pub fn qualified(&self) -> String {
        format!("{}.{}.{}", self.catalog, self.schema, self.table)
    }
}

impl fmt::Display for TableIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.catalog, self.schema, self.table)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
}

/// Column metadata for the configured table, ordered by ordinal position.
/// Immutable once fetched; the schema cache owns it for the assistant's
/// lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub table: TableIdentity,
    pub columns: Vec<ColumnDescriptor>,
}

/// Fetch all columns for the table, or fail. Zero columns means the table
/// does not exist or is not visible to these credentials; a partial schema
/// is never returned.
pub async fn fetch_table_schema(client: &Client, table: &TableIdentity) -> Result<TableSchema> {
    let rows = client
        .query(
            "SELECT column_name, data_type, is_nullable = 'YES' as is_nullable
             FROM information_schema.columns
             WHERE table_schema = $1 AND table_name = $2
             ORDER BY ordinal_position",
            &[&table.schema, &table.table],
        )
        .await
        .map_err(|e| AssistantError::SchemaFetch(e.to_string()))?;

    if rows.is_empty() {
        return Err(AssistantError::SchemaFetch(format!(
            "table {} not found or not visible",
            table.qualified()
        )));
    }

    let columns = rows
        .iter()
        .map(|row| ColumnDescriptor {
            name: row.get(0),
            data_type: row.get(1),
            nullable: row.get(2),
        })
        .collect();

    Ok(TableSchema {
        table: table.clone(),
        columns,
    })
}
