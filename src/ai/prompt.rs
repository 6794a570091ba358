use crate::db::TableSchema;
use std::fmt::Write;

/// Assemble the nl→sql prompt from the cached schema and the user question.
///
/// Deterministic: the same `(question, schema)` pair always yields
/// byte-identical text, so prompts are testable and cacheable.
pub fn build_prompt(question: &str, schema: &TableSchema) -> String {
    let table = schema.table.qualified();

    let mut columns = String::new();
    for col in &schema.columns {
        let null = if col.nullable { "NULL" } else { "NOT NULL" };
        let _ = writeln!(columns, "  - {}: {} {}", col.name, col.data_type, null);
    }

    format!(
        "You are a SQL expert. Convert the following natural language query into a SQL query \
for a warehouse table.

Table: {table}

Table Schema:
{columns}
Natural Language Query: {question}

Important Guidelines:
1. Generate ONLY the SQL query without any explanation or markdown formatting
2. Use the exact table name: {table}
3. Use proper SQL syntax compatible with the warehouse
4. Include appropriate WHERE, GROUP BY, ORDER BY, and LIMIT clauses as needed
5. Make sure column names match exactly as shown in the schema
6. Return exactly one SQL statement, nothing else

SQL Query:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ColumnDescriptor, TableIdentity};

    fn sample_schema() -> TableSchema {
        TableSchema {
            table: TableIdentity {
                catalog: "supply".into(),
                schema: "sales".into(),
                table: "orders".into(),
            },
            columns: vec![
                ColumnDescriptor {
                    name: "product".into(),
                    data_type: "text".into(),
                    nullable: false,
                },
                ColumnDescriptor {
                    name: "quantity".into(),
                    data_type: "bigint".into(),
                    nullable: true,
                },
            ],
        }
    }

    #[test]
    fn identical_inputs_produce_identical_prompts() {
        let schema = sample_schema();
        let a = build_prompt("top products", &schema);
        let b = build_prompt("top products", &schema);
        assert_eq!(a, b);
    }

    #[test]
    fn prompt_carries_table_columns_and_question() {
        let prompt = build_prompt("Show me the top 10 products by quantity", &sample_schema());
        assert!(prompt.contains("supply.sales.orders"));
        assert!(prompt.contains("- product: text NOT NULL"));
        assert!(prompt.contains("- quantity: bigint NULL"));
        assert!(prompt.contains("Show me the top 10 products by quantity"));
        assert!(prompt.contains("exactly one SQL statement"));
    }
}
