use crate::ChlogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    EmptyColumnMap,
    MissingIdentity,
    EmptyTag,
    ImmutableColumn,
    InvalidIdentifier,
    UnknownLockColumn,
    InvalidClusterConfig,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyColumnMap => "CHLOG_ERROR_EMPTY_COLUMN_MAP",
            Self::MissingIdentity => "CHLOG_ERROR_MISSING_IDENTITY",
            Self::EmptyTag => "CHLOG_ERROR_EMPTY_TAG",
            Self::ImmutableColumn => "CHLOG_ERROR_IMMUTABLE_COLUMN",
            Self::InvalidIdentifier => "CHLOG_ERROR_INVALID_IDENTIFIER",
            Self::UnknownLockColumn => "CHLOG_ERROR_UNKNOWN_LOCK_COLUMN",
            Self::InvalidClusterConfig => "CHLOG_ERROR_INVALID_CLUSTER_CONFIG",
        }
    }

    pub const fn all() -> &'static [Self] {
        &[
            Self::EmptyColumnMap,
            Self::MissingIdentity,
            Self::EmptyTag,
            Self::ImmutableColumn,
            Self::InvalidIdentifier,
            Self::UnknownLockColumn,
            Self::InvalidClusterConfig,
        ]
    }
}

fn build_error(code: ErrorCode, title: &str, description: &str) -> ChlogError {
    ChlogError::new(code.as_str(), title, description)
}

pub(crate) fn empty_column_map_error(operation: &str) -> ChlogError {
    build_error(
        ErrorCode::EmptyColumnMap,
        "Nothing to write",
        &format!("`{operation}` needs at least one column with a value; every entry was left unspecified."),
    )
}

pub(crate) fn missing_identity_error(operation: &str, field: &str) -> ChlogError {
    build_error(
        ErrorCode::MissingIdentity,
        "Missing row identity",
        &format!("`{operation}` requires a non-empty `{field}`."),
    )
}

pub(crate) fn empty_tag_error(operation: &str) -> ChlogError {
    build_error(
        ErrorCode::EmptyTag,
        "Empty tag",
        &format!("`{operation}` needs a non-blank tag to write into `TAG`."),
    )
}

pub(crate) fn immutable_column_error(operation: &str, column: &str) -> ChlogError {
    let guidance = match column {
        "ID" => "The row is addressed by `ID`, it can never be rewritten.",
        _ => "Identity columns are part of the table key. Use the upsert path to rewrite them.",
    };
    build_error(
        ErrorCode::ImmutableColumn,
        "Column cannot be mutated",
        &format!("`{operation}` cannot change `{column}`. {guidance}"),
    )
}

pub(crate) fn invalid_identifier_error(kind: &str, value: &str) -> ChlogError {
    build_error(
        ErrorCode::InvalidIdentifier,
        "Invalid identifier",
        &format!(
            "{kind} `{value}` is not a plain identifier. Use letters, digits and `_`, starting with a letter or `_`."
        ),
    )
}

pub(crate) fn unknown_lock_column_error(column: &str) -> ChlogError {
    build_error(
        ErrorCode::UnknownLockColumn,
        "Unknown lock column",
        &format!(
            "`{column}` is not a lock table column. Expected one of: ID, LOCKED, LOCKEDBY, LOCKGRANTED."
        ),
    )
}

pub(crate) fn invalid_cluster_config_error(unknown: &[String], missing: &[String]) -> ChlogError {
    let mut parts = Vec::new();
    for key in unknown {
        parts.push(format!("unknown property: {key}"));
    }
    if !missing.is_empty() {
        parts.push(format!(
            "the missing properties should be defined: {}",
            missing.join(", ")
        ));
    }
    build_error(
        ErrorCode::InvalidClusterConfig,
        "Invalid cluster settings",
        &parts.join(", "),
    )
}
