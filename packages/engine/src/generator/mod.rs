//! Adapter between the host migration engine and the bookkeeping templates.
//!
//! Each host statement type gets a [`SqlGenerator`] implementation on
//! [`ClickHouseSqlGenerator`]. Generators only act on ClickHouse handles and
//! otherwise return [`Generated::UseDefault`] so the host's own generator runs.

mod changelog;
mod database;
mod lock;
mod statements;
mod update;

use std::sync::Arc;

pub use database::{
    ClickHouseDatabase, Database, CLICKHOUSE_SHORT_NAME, DEFAULT_CATALOG,
    DEFAULT_CHANGELOG_TABLE, DEFAULT_LOCK_TABLE,
};
pub use statements::{
    ChangeSetRun, CreateChangelogTable, CreateLockTable, ExecType, GenericUpdate,
    InitializeLockTable, LockChangelog, LockOwner, MarkChangeSetRan, SelectLock, TagDatabase,
    UnlockChangelog, UpdateChangelogRow, UpdateChecksum, UpsertChangelogRow,
};

use crate::sql::{Statement, TableRef};
use crate::template::BookkeepingTables;
use crate::topology::{Topology, TopologyResolver};
use crate::ChlogError;

/// Priority of the host's generic generators.
pub const PRIORITY_DEFAULT: i32 = 1;
/// Priority of database-specific generators; wins over [`PRIORITY_DEFAULT`].
pub const PRIORITY_DATABASE: i32 = 5;

/// One ready-to-execute statement and the tables it touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sql {
    pub text: String,
    pub affected_tables: Vec<TableRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generated {
    /// Statements to execute, in order.
    Statements(Vec<Sql>),
    /// Let the host's generic generator handle the statement.
    UseDefault,
}

impl Generated {
    pub fn statements(&self) -> &[Sql] {
        match self {
            Self::Statements(statements) => statements,
            Self::UseDefault => &[],
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::UseDefault)
    }
}

pub trait SqlGenerator<S> {
    fn priority(&self) -> i32 {
        PRIORITY_DATABASE
    }

    fn supports(&self, _statement: &S, database: &dyn Database) -> bool {
        database.short_name().eq_ignore_ascii_case(CLICKHOUSE_SHORT_NAME)
    }

    fn generate_sql(&self, statement: &S, database: &dyn Database)
        -> Result<Generated, ChlogError>;
}

#[derive(Debug, Clone)]
pub struct ClickHouseSqlGenerator {
    resolver: Arc<TopologyResolver>,
}

impl ClickHouseSqlGenerator {
    pub fn new(resolver: Arc<TopologyResolver>) -> Self {
        Self { resolver }
    }

    pub fn topology(&self) -> Topology {
        self.resolver.resolve()
    }

    /// Checks [`SqlGenerator::supports`] and generates in one call.
    pub fn emit<S>(&self, statement: &S, database: &dyn Database) -> Result<Generated, ChlogError>
    where
        Self: SqlGenerator<S>,
    {
        if !self.supports(statement, database) {
            tracing::debug!(
                database = %database.short_name(),
                "not a clickhouse database, deferring to the default generator"
            );
            return Ok(Generated::UseDefault);
        }
        self.generate_sql(statement, database)
    }
}

fn bookkeeping_tables(database: &dyn Database) -> Result<BookkeepingTables, ChlogError> {
    BookkeepingTables::new(
        database.catalog_name(),
        database.changelog_table_name(),
        database.lock_table_name(),
    )
}

fn render(database: &dyn Database, statements: Vec<Statement>) -> Generated {
    let literals = database.literals();
    let rendered = statements
        .iter()
        .map(|statement| {
            let text = statement.render(literals);
            tracing::debug!(table = %statement.table(), sql = %text, "generated bookkeeping statement");
            Sql {
                text,
                affected_tables: vec![statement.table().clone()],
            }
        })
        .collect();
    Generated::Statements(rendered)
}

const MAX_TEXT_LENGTH: usize = 250;

/// Shortens `value` to at most 250 characters, marking the cut with `...`.
fn limit_size(value: &str) -> String {
    if value.chars().count() <= MAX_TEXT_LENGTH {
        return value.to_string();
    }
    let mut shortened: String = value.chars().take(MAX_TEXT_LENGTH - 3).collect();
    shortened.push_str("...");
    shortened
}
