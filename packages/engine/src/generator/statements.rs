//! Statement objects the host migration engine hands to the generators.

use crate::{ColumnValue, ColumnValueMap};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateChangelogTable;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateLockTable;

/// Clears the lock table and seeds it with the unlocked row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitializeLockTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockOwner {
    pub hostname: String,
    pub description: String,
    pub address: String,
}

impl LockOwner {
    pub fn new(
        hostname: impl Into<String>,
        description: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            description: description.into(),
            address: address.into(),
        }
    }

    /// Text stored in `LOCKEDBY`: `"<hostname> <description> (<address>)"`.
    pub fn locked_by(&self) -> String {
        format!("{} {} ({})", self.hostname, self.description, self.address)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockChangelog {
    pub owner: LockOwner,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnlockChangelog;

/// Reads the lock row. An empty column list reads every lock column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectLock {
    pub columns: Vec<String>,
}

impl SelectLock {
    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateChecksum {
    pub change_set_id: String,
    pub checksum: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecType {
    Executed,
    Failed,
    Skipped,
    Reran,
    MarkRan,
}

impl ExecType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Executed => "EXECUTED",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
            Self::Reran => "RERAN",
            Self::MarkRan => "MARK_RAN",
        }
    }

    /// Whether a changelog row already exists for the change set.
    pub const fn ran_before(self) -> bool {
        matches!(self, Self::Reran)
    }
}

/// What the host knows about a change set that just finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSetRun {
    pub id: String,
    pub checksum: String,
    pub order_executed: u64,
    pub deployment_id: String,
    pub tool_version: String,
    pub description: Option<String>,
    pub comments: Option<String>,
    pub contexts: Option<String>,
    pub labels: Option<String>,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkChangeSetRan {
    pub run: ChangeSetRun,
    pub exec_type: ExecType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDatabase {
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateChangelogRow {
    pub id: String,
    pub values: ColumnValueMap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpsertChangelogRow {
    pub id: String,
    pub values: ColumnValueMap,
}

/// Host-level `UPDATE` against an arbitrary table.
///
/// `where_clause` may contain `?` placeholders; they are bound in order to
/// `where_params`.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericUpdate {
    pub catalog: Option<String>,
    pub table: String,
    pub new_values: Vec<(String, ColumnValue)>,
    pub where_clause: Option<String>,
    pub where_params: Vec<ColumnValue>,
}

impl GenericUpdate {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            catalog: None,
            table: table.into(),
            new_values: Vec::new(),
            where_clause: None,
            where_params: Vec::new(),
        }
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<ColumnValue>) -> Self {
        self.new_values.push((column.into(), value.into()));
        self
    }

    pub fn filter(mut self, clause: impl Into<String>, params: Vec<ColumnValue>) -> Self {
        self.where_clause = Some(clause.into());
        self.where_params = params;
        self
    }
}
