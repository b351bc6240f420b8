#![allow(dead_code)]

pub mod engine;

use chlog_engine::sql::{Insert, Statement};
use chlog_engine::template::{changelog, lock};
use chlog_engine::{BookkeepingTables, ChangelogColumn, ColumnValue, Topology};
use chrono::{DateTime, TimeZone, Utc};

use self::engine::SimulatedClickHouse;

#[macro_export]
macro_rules! topology_test {
    ($name:ident, |$topology:ident| $body:expr) => {
        paste::paste! {
            #[test]
            fn [<$name _standalone>]() {
                let $topology = chlog_engine::Topology::Standalone;
                $body
            }

            #[test]
            fn [<$name _cluster>]() {
                let $topology = $crate::support::cluster_topology();
                $body
            }
        }
    };
}

pub fn cluster_topology() -> Topology {
    Topology::cluster("c1", "/lb")
}

pub fn tables() -> BookkeepingTables {
    BookkeepingTables::new("default", "DATABASECHANGELOG", "DATABASECHANGELOGLOCK")
        .expect("default bookkeeping tables are valid")
}

/// Engine with both bookkeeping tables created and the lock row seeded.
pub fn bootstrapped(topology: &Topology) -> SimulatedClickHouse {
    let tables = tables();
    let mut engine = SimulatedClickHouse::new();
    engine
        .execute_all([
            changelog::create_changelog_table(topology, &tables),
            lock::create_lock_table(topology, &tables),
            lock::truncate_lock_table(topology, &tables),
            lock::initial_lock_record(topology, &tables),
        ])
        .expect("bootstrap statements should run");
    engine
}

pub fn at(minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, minute, second).unwrap()
}

/// The host's own insert for a freshly executed change set.
pub fn changelog_insert(
    tables: &BookkeepingTables,
    id: &str,
    executed_at: DateTime<Utc>,
    order_executed: u64,
) -> Statement {
    let values: Vec<(ChangelogColumn, ColumnValue)> = vec![
        (ChangelogColumn::Id, id.into()),
        (ChangelogColumn::Author, "alice".into()),
        (ChangelogColumn::Filename, "db/changelog.xml".into()),
        (ChangelogColumn::DateExecuted, executed_at.into()),
        (ChangelogColumn::OrderExecuted, order_executed.into()),
        (ChangelogColumn::ExecType, "EXECUTED".into()),
        (ChangelogColumn::Md5Sum, format!("9:{id}").into()),
        (ChangelogColumn::Comments, ColumnValue::Null),
        (ChangelogColumn::Tag, ColumnValue::Null),
    ];
    Statement::Insert(Insert {
        table: tables.changelog.clone(),
        columns: values.iter().map(|(column, _)| column.to_string()).collect(),
        values: values
            .into_iter()
            .map(|(_, value)| chlog_engine::sql::Expr::Value(value))
            .collect(),
    })
}
