//! Per-topology statement synthesizers for the two bookkeeping tables.
//!
//! Standalone tables are merge-based: rows are appended and only replaced or
//! collapsed by background merges, so every standalone read goes through
//! `FINAL`. Cluster tables are backed by the coordination service and hold a
//! single current row per key, so their reads are plain.

pub mod changelog;
pub mod lock;

use crate::sql::TableRef;
use crate::ChlogError;

/// Lock row key; the lock table only ever holds this one logical row.
pub const LOCK_ROW_ID: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookkeepingTables {
    pub changelog: TableRef,
    pub lock: TableRef,
}

impl BookkeepingTables {
    pub fn new(catalog: &str, changelog: &str, lock: &str) -> Result<Self, ChlogError> {
        Ok(Self {
            changelog: TableRef::new(catalog, changelog)?,
            lock: TableRef::new(catalog, lock)?,
        })
    }
}
