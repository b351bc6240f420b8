use crate::generator::{render, ClickHouseSqlGenerator, Database, Generated, GenericUpdate, SqlGenerator};
use crate::literal::LiteralRenderer;
use crate::sql::{escape_column_name, AlterUpdate, Expr, Predicate, Statement, TableRef};
use crate::topology::Topology;
use crate::{ChlogError, ColumnValue};

impl SqlGenerator<GenericUpdate> for ClickHouseSqlGenerator {
    /// Standalone tables take the host's plain `UPDATE`. Cluster tables need
    /// the engine's mutation form instead.
    fn generate_sql(
        &self,
        statement: &GenericUpdate,
        database: &dyn Database,
    ) -> Result<Generated, ChlogError> {
        if let Topology::Standalone = self.topology() {
            return Ok(Generated::UseDefault);
        }

        let catalog = statement
            .catalog
            .as_deref()
            .unwrap_or_else(|| database.catalog_name());
        let table = TableRef::new(catalog, &statement.table)?;

        let mut assignments = Vec::with_capacity(statement.new_values.len());
        for (column, value) in &statement.new_values {
            assignments.push((escape_column_name(column)?, Expr::Value(normalize_null(value))));
        }

        let predicate = statement.where_clause.as_deref().map(|clause| {
            Predicate::Raw(bind_placeholders(
                clause,
                &statement.where_params,
                database.literals(),
            ))
        });

        let statement = Statement::AlterUpdate(AlterUpdate {
            table,
            on_cluster: None,
            assignments,
            predicate,
        });
        Ok(render(database, vec![statement]))
    }
}

// The host writes the text "NULL" for SQL NULL.
fn normalize_null(value: &ColumnValue) -> ColumnValue {
    match value {
        ColumnValue::Text(text) if text.eq_ignore_ascii_case("NULL") => ColumnValue::Null,
        other => other.clone(),
    }
}

/// Replaces `?` placeholders outside string literals with the rendered
/// parameters, in order. Placeholders without a parameter are kept.
fn bind_placeholders(clause: &str, params: &[ColumnValue], literals: &dyn LiteralRenderer) -> String {
    let mut params = params.iter();
    let mut bound = String::with_capacity(clause.len());
    let mut in_string = false;
    let mut chars = clause.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if in_string => {
                bound.push(ch);
                if let Some(escaped) = chars.next() {
                    bound.push(escaped);
                }
            }
            '\'' => {
                in_string = !in_string;
                bound.push(ch);
            }
            '?' if !in_string => match params.next() {
                Some(value) => bound.push_str(&literals.render(&normalize_null(value))),
                None => bound.push(ch),
            },
            _ => bound.push(ch),
        }
    }
    bound
}
