use crate::literal::{ClickHouseLiterals, LiteralRenderer};

pub const CLICKHOUSE_SHORT_NAME: &str = "clickhouse";
pub const DEFAULT_CATALOG: &str = "default";
pub const DEFAULT_CHANGELOG_TABLE: &str = "DATABASECHANGELOG";
pub const DEFAULT_LOCK_TABLE: &str = "DATABASECHANGELOGLOCK";

/// Database handle supplied by the host migration engine.
pub trait Database {
    /// Engine identifier; generators only act when this is `clickhouse`.
    fn short_name(&self) -> &str;

    fn catalog_name(&self) -> &str;

    fn changelog_table_name(&self) -> &str;

    fn lock_table_name(&self) -> &str;

    fn current_date_time_function(&self) -> &str {
        "now64()"
    }

    fn literals(&self) -> &dyn LiteralRenderer;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickHouseDatabase {
    catalog: String,
    changelog_table: String,
    lock_table: String,
    literals: ClickHouseLiterals,
}

impl ClickHouseDatabase {
    pub fn new(catalog: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            ..Self::default()
        }
    }

    pub fn with_table_names(
        mut self,
        changelog_table: impl Into<String>,
        lock_table: impl Into<String>,
    ) -> Self {
        self.changelog_table = changelog_table.into();
        self.lock_table = lock_table.into();
        self
    }
}

impl Default for ClickHouseDatabase {
    fn default() -> Self {
        Self {
            catalog: DEFAULT_CATALOG.to_string(),
            changelog_table: DEFAULT_CHANGELOG_TABLE.to_string(),
            lock_table: DEFAULT_LOCK_TABLE.to_string(),
            literals: ClickHouseLiterals,
        }
    }
}

impl Database for ClickHouseDatabase {
    fn short_name(&self) -> &str {
        CLICKHOUSE_SHORT_NAME
    }

    fn catalog_name(&self) -> &str {
        &self.catalog
    }

    fn changelog_table_name(&self) -> &str {
        &self.changelog_table
    }

    fn lock_table_name(&self) -> &str {
        &self.lock_table
    }

    fn literals(&self) -> &dyn LiteralRenderer {
        &self.literals
    }
}
