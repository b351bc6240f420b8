use std::fmt;
use std::str::FromStr;

use crate::errors;
use crate::ChlogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Identity,
    Execution,
    Metadata,
}

/// Changelog columns in table order. Positional `SELECT`/`INSERT` lists are
/// rendered in this order, so it must match the order used by `CREATE TABLE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChangelogColumn {
    Id,
    Author,
    Filename,
    DateExecuted,
    OrderExecuted,
    ExecType,
    Md5Sum,
    Description,
    Comments,
    Tag,
    ToolVersion,
    Contexts,
    Labels,
    DeploymentId,
}

impl ChangelogColumn {
    pub const ALL: [Self; 14] = [
        Self::Id,
        Self::Author,
        Self::Filename,
        Self::DateExecuted,
        Self::OrderExecuted,
        Self::ExecType,
        Self::Md5Sum,
        Self::Description,
        Self::Comments,
        Self::Tag,
        Self::ToolVersion,
        Self::Contexts,
        Self::Labels,
        Self::DeploymentId,
    ];

    pub const IDENTITY: [Self; 3] = [Self::Id, Self::Author, Self::Filename];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Author => "AUTHOR",
            Self::Filename => "FILENAME",
            Self::DateExecuted => "DATEEXECUTED",
            Self::OrderExecuted => "ORDEREXECUTED",
            Self::ExecType => "EXECTYPE",
            Self::Md5Sum => "MD5SUM",
            Self::Description => "DESCRIPTION",
            Self::Comments => "COMMENTS",
            Self::Tag => "TAG",
            Self::ToolVersion => "LIQUIBASE",
            Self::Contexts => "CONTEXTS",
            Self::Labels => "LABELS",
            Self::DeploymentId => "DEPLOYMENT_ID",
        }
    }

    pub const fn sql_type(self) -> &'static str {
        match self {
            Self::Id | Self::Author | Self::Filename | Self::ExecType => "String",
            Self::DateExecuted => "DateTime64",
            Self::OrderExecuted => "UInt64",
            Self::Md5Sum
            | Self::Description
            | Self::Comments
            | Self::Tag
            | Self::ToolVersion
            | Self::Contexts
            | Self::Labels
            | Self::DeploymentId => "Nullable(String)",
        }
    }

    pub const fn role(self) -> ColumnRole {
        match self {
            Self::Id | Self::Author | Self::Filename => ColumnRole::Identity,
            Self::DateExecuted
            | Self::OrderExecuted
            | Self::ExecType
            | Self::ToolVersion
            | Self::DeploymentId => ColumnRole::Execution,
            Self::Md5Sum
            | Self::Description
            | Self::Comments
            | Self::Tag
            | Self::Contexts
            | Self::Labels => ColumnRole::Metadata,
        }
    }

    pub const fn is_identity(self) -> bool {
        matches!(self.role(), ColumnRole::Identity)
    }
}

impl fmt::Display for ChangelogColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LockColumn {
    Id,
    Locked,
    LockedBy,
    LockGranted,
    /// Collapse discriminator, standalone table only.
    Sign,
}

impl LockColumn {
    pub const STANDALONE: [Self; 5] = [
        Self::Id,
        Self::Locked,
        Self::LockedBy,
        Self::LockGranted,
        Self::Sign,
    ];

    pub const CLUSTER: [Self; 4] = [Self::Id, Self::Locked, Self::LockedBy, Self::LockGranted];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Locked => "LOCKED",
            Self::LockedBy => "LOCKEDBY",
            Self::LockGranted => "LOCKGRANTED",
            Self::Sign => "SIGN",
        }
    }

    pub const fn sql_type(self) -> &'static str {
        match self {
            Self::Id => "Int64",
            Self::Locked => "UInt8",
            Self::LockedBy => "Nullable(String)",
            Self::LockGranted => "Nullable(DateTime64)",
            Self::Sign => "Int8",
        }
    }
}

impl fmt::Display for LockColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LockColumn {
    type Err = ChlogError;

    // SIGN is an engine artifact and never selectable by the host.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ID" => Ok(Self::Id),
            "LOCKED" => Ok(Self::Locked),
            "LOCKEDBY" => Ok(Self::LockedBy),
            "LOCKGRANTED" => Ok(Self::LockGranted),
            _ => Err(errors::unknown_lock_column_error(value)),
        }
    }
}
