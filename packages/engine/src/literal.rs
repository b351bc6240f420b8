use crate::ColumnValue;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Renders typed values as engine-safe SQL literals. Every value that reaches
/// statement text goes through this boundary.
pub trait LiteralRenderer {
    fn render(&self, value: &ColumnValue) -> String;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickHouseLiterals;

impl LiteralRenderer for ClickHouseLiterals {
    fn render(&self, value: &ColumnValue) -> String {
        match value {
            ColumnValue::Null => "NULL".to_string(),
            ColumnValue::Text(text) => quote_string(text),
            ColumnValue::Integer(number) => number.to_string(),
            ColumnValue::Unsigned(number) => number.to_string(),
            ColumnValue::Timestamp(timestamp) => {
                quote_string(&timestamp.format(TIMESTAMP_FORMAT).to_string())
            }
            ColumnValue::Function(call) => call.clone(),
        }
    }
}

pub(crate) fn quote_string(input: &str) -> String {
    format!("'{}'", escape_sql_string(input))
}

// ClickHouse treats backslash as an escape character inside string literals.
pub(crate) fn escape_sql_string(input: &str) -> String {
    input.replace('\\', "\\\\").replace('\'', "''")
}
