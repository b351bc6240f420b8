mod error;
mod errors;
pub mod generator;
mod literal;
mod schema;
pub mod sql;
pub mod template;
pub mod topology;
mod value;

pub use error::ChlogError;
pub use errors::ErrorCode;
pub use generator::{
    ClickHouseDatabase, ClickHouseSqlGenerator, Database, Generated, Sql, SqlGenerator,
    PRIORITY_DATABASE, PRIORITY_DEFAULT,
};
pub use literal::{ClickHouseLiterals, LiteralRenderer};
pub use schema::{ChangelogColumn, ColumnRole, LockColumn};
pub use template::{BookkeepingTables, LOCK_ROW_ID};
pub use topology::{ClusterTopology, Dispatch, Topology, TopologyKind, TopologyResolver};
pub use value::{ColumnValue, ColumnValueMap};
