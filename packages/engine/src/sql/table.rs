use std::fmt;

use sqlparser::ast::Ident;
use sqlparser::dialect::{ClickHouseDialect, Dialect};

use crate::errors;
use crate::ChlogError;

/// Catalog-qualified table name. The catalog is rendered back-quoted; the
/// table name is rendered bare, so it must be a plain identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    catalog: String,
    name: String,
}

impl TableRef {
    pub fn new(catalog: &str, name: &str) -> Result<Self, ChlogError> {
        if catalog.trim().is_empty() {
            return Err(errors::invalid_identifier_error("Catalog name", catalog));
        }
        validate_plain_identifier("Table name", name)?;
        Ok(Self {
            catalog: catalog.to_string(),
            name: name.to_string(),
        })
    }

    pub fn catalog(&self) -> &str {
        &self.catalog
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", Ident::with_quote('`', self.catalog.as_str()), self.name)
    }
}

pub(crate) fn validate_plain_identifier(kind: &str, value: &str) -> Result<(), ChlogError> {
    if is_plain_identifier(value) {
        Ok(())
    } else {
        Err(errors::invalid_identifier_error(kind, value))
    }
}

/// Renders a column name bare when it is a plain identifier and back-quoted
/// otherwise.
pub(crate) fn escape_column_name(name: &str) -> Result<String, ChlogError> {
    if name.is_empty() {
        return Err(errors::invalid_identifier_error("Column name", name));
    }
    if is_plain_identifier(name) {
        Ok(name.to_string())
    } else {
        Ok(Ident::with_quote('`', name).to_string())
    }
}

fn is_plain_identifier(value: &str) -> bool {
    let dialect = ClickHouseDialect {};
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => {
            dialect.is_identifier_start(first) && chars.all(|ch| dialect.is_identifier_part(ch))
        }
        None => false,
    }
}
