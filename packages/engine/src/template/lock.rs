//! Lock table synthesizers.
//!
//! Standalone keeps the lock in a `CollapsingMergeTree`: acquiring appends a
//! `SIGN = 1` row, releasing appends the matching `SIGN = -1` row, and a merge
//! removes the pair. "Unlocked" is the state where every acquire row has been
//! cancelled and only the initial `LOCKED = 0` row remains. Rows collapse on
//! the sorting key `(ID, LOCKED)`, which is why the cancelling row repeats
//! `LOCKED = 1` instead of writing `LOCKED = 0`.

use crate::schema::LockColumn;
use crate::sql::{
    ColumnDef, CreateTable, Expr, Insert, Predicate, Select, SelectItem, Statement, TableEngine,
    Truncate,
};
use crate::template::{BookkeepingTables, LOCK_ROW_ID};
use crate::topology::{Dispatch, Topology};
use crate::{ChlogError, ColumnValue};

pub fn create_lock_table(topology: &Topology, tables: &BookkeepingTables) -> Statement {
    let engine = match topology {
        Topology::Standalone => TableEngine::CollapsingMergeTree {
            sign: LockColumn::Sign.to_string(),
            order_by: vec![LockColumn::Id.to_string(), LockColumn::Locked.to_string()],
        },
        Topology::Cluster(cluster) => TableEngine::KeeperMap {
            path: cluster.table_path(tables.lock.name()),
            keys_limit: Some(1),
            primary_key: vec![LockColumn::Id.to_string()],
        },
    };

    Statement::CreateTable(CreateTable {
        table: tables.lock.clone(),
        on_cluster: topology.on_cluster(),
        columns: lock_columns(topology)
            .iter()
            .map(|column| ColumnDef::new(column.as_str(), column.sql_type()))
            .collect(),
        engine,
    })
}

/// Acquires the lock for `owner`. No compare-and-set happens here; the caller
/// confirms ownership with a following [`select_lock`] read.
pub fn lock(
    topology: &Topology,
    tables: &BookkeepingTables,
    owner: &str,
    granted_at: ColumnValue,
) -> Statement {
    let values = vec![
        Expr::value(LOCK_ROW_ID),
        Expr::value(1_i64),
        Expr::value(owner),
        Expr::Value(granted_at),
    ];
    lock_row_insert(topology, tables, values, 1)
}

pub fn unlock(topology: &Topology, tables: &BookkeepingTables) -> Statement {
    // Standalone cancels the acquire row, so LOCKED stays 1 to match its key.
    let locked = match topology {
        Topology::Standalone => 1_i64,
        Topology::Cluster(_) => 0_i64,
    };
    let values = vec![
        Expr::value(LOCK_ROW_ID),
        Expr::value(locked),
        Expr::value(ColumnValue::Null),
        Expr::value(ColumnValue::Null),
    ];
    lock_row_insert(topology, tables, values, -1)
}

/// Seed row written after the lock table is truncated.
pub fn initial_lock_record(topology: &Topology, tables: &BookkeepingTables) -> Statement {
    let mut columns = vec![LockColumn::Id.to_string(), LockColumn::Locked.to_string()];
    let mut values = vec![Expr::value(LOCK_ROW_ID), Expr::value(0_i64)];
    if topology.is_standalone() {
        columns.push(LockColumn::Sign.to_string());
        values.push(Expr::value(1_i64));
    }
    Statement::Insert(Insert {
        table: tables.lock.clone(),
        columns,
        values,
    })
}

/// Reads the lock row. Standalone folds uncollapsed rows with `max(LOCKED)`
/// over a `FINAL` read and groups by the other requested columns.
pub fn select_lock(
    topology: &Topology,
    tables: &BookkeepingTables,
    requested: &[String],
) -> Result<Statement, ChlogError> {
    let mut columns = requested
        .iter()
        .map(|name| name.parse::<LockColumn>())
        .collect::<Result<Vec<_>, _>>()?;
    if columns.is_empty() {
        columns = LockColumn::CLUSTER.to_vec();
    }

    let filter = Predicate::eq(LockColumn::Id.as_str(), Expr::value(LOCK_ROW_ID));
    let select = match topology {
        Topology::Cluster(_) => Select::new(
            tables.lock.clone(),
            columns
                .iter()
                .map(|column| SelectItem::column(column.as_str()))
                .collect(),
        )
        .filter(filter),
        Topology::Standalone => {
            let items = columns
                .iter()
                .map(|column| match column {
                    LockColumn::Locked => SelectItem::Max(column.to_string()),
                    other => SelectItem::column(other.as_str()),
                })
                .collect();
            let group_by = columns
                .iter()
                .filter(|column| **column != LockColumn::Locked)
                .map(ToString::to_string)
                .collect();
            Select::new(tables.lock.clone(), items)
                .with_final(true)
                .filter(filter)
                .group_by(group_by)
        }
    };
    Ok(Statement::Select(select))
}

/// Same shape in both topologies; only the `ON CLUSTER` clause differs.
pub fn truncate_lock_table(topology: &Topology, tables: &BookkeepingTables) -> Statement {
    Dispatch::new(topology)
        .default_handler(|topology| {
            Statement::Truncate(Truncate {
                table: tables.lock.clone(),
                on_cluster: topology.on_cluster(),
            })
        })
        .run()
}

fn lock_row_insert(
    topology: &Topology,
    tables: &BookkeepingTables,
    mut values: Vec<Expr>,
    sign: i64,
) -> Statement {
    if topology.is_standalone() {
        values.push(Expr::value(sign));
    }
    Statement::Insert(Insert {
        table: tables.lock.clone(),
        columns: lock_columns(topology)
            .iter()
            .map(ToString::to_string)
            .collect(),
        values,
    })
}

fn lock_columns(topology: &Topology) -> &'static [LockColumn] {
    match topology {
        Topology::Standalone => &LockColumn::STANDALONE,
        Topology::Cluster(_) => &LockColumn::CLUSTER,
    }
}
