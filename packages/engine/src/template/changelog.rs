use crate::errors;
use crate::schema::ChangelogColumn;
use crate::sql::{
    AlterUpdate, ColumnDef, CreateTable, Expr, InsertSelect, Predicate, Select, SelectItem,
    Statement, TableEngine, Truncate,
};
use crate::template::BookkeepingTables;
use crate::topology::{Dispatch, Topology};
use crate::{ChlogError, ColumnValueMap};

pub fn create_changelog_table(topology: &Topology, tables: &BookkeepingTables) -> Statement {
    let engine = match topology {
        Topology::Standalone => TableEngine::ReplacingMergeTree {
            order_by: ChangelogColumn::IDENTITY
                .iter()
                .map(ToString::to_string)
                .collect(),
        },
        Topology::Cluster(cluster) => TableEngine::KeeperMap {
            path: cluster.table_path(tables.changelog.name()),
            keys_limit: None,
            primary_key: vec![ChangelogColumn::Id.to_string()],
        },
    };

    Statement::CreateTable(CreateTable {
        table: tables.changelog.clone(),
        on_cluster: topology.on_cluster(),
        columns: ChangelogColumn::ALL
            .iter()
            .map(|column| ColumnDef::new(column.as_str(), column.sql_type()))
            .collect(),
        engine,
    })
}

/// Best-effort mutation of the row addressed by `id`. Only supplied entries
/// are written; identity columns form the table key and are rejected.
pub fn update_changelog_row(
    tables: &BookkeepingTables,
    id: &str,
    values: &ColumnValueMap,
) -> Result<Statement, ChlogError> {
    const OPERATION: &str = "update changelog row";
    require_id(OPERATION, id)?;
    if let Some((column, _)) = values.supplied().find(|(column, _)| column.is_identity()) {
        return Err(errors::immutable_column_error(OPERATION, column.as_str()));
    }

    Ok(Statement::AlterUpdate(AlterUpdate {
        table: tables.changelog.clone(),
        on_cluster: None,
        assignments: assignments(OPERATION, values)?,
        predicate: Some(id_predicate(id)),
    }))
}

/// Rewrites columns of the row addressed by `id`, identity columns included.
///
/// Standalone cannot update the sorting key in place, so it re-inserts the
/// current row with the supplied values swapped in and leaves the stale
/// version to the replacing merge.
pub fn upsert_changelog_row(
    topology: &Topology,
    tables: &BookkeepingTables,
    id: &str,
    values: &ColumnValueMap,
) -> Result<Statement, ChlogError> {
    const OPERATION: &str = "upsert changelog row";
    require_id(OPERATION, id)?;
    if values.get(ChangelogColumn::Id).is_some() {
        return Err(errors::immutable_column_error(
            OPERATION,
            ChangelogColumn::Id.as_str(),
        ));
    }

    match topology {
        Topology::Cluster(cluster) => Ok(Statement::AlterUpdate(AlterUpdate {
            table: tables.changelog.clone(),
            on_cluster: Some(cluster.cluster_name().to_string()),
            assignments: assignments(OPERATION, values)?,
            predicate: Some(id_predicate(id)),
        })),
        Topology::Standalone => {
            if !values.has_supplied() {
                return Err(errors::empty_column_map_error(OPERATION));
            }
            let items = ChangelogColumn::ALL
                .iter()
                .map(|column| match values.get(*column) {
                    Some(value) => SelectItem::Expr(Expr::Value(value.clone())),
                    None => SelectItem::column(column.as_str()),
                })
                .collect();
            let source = Select::new(tables.changelog.clone(), items)
                .with_final(true)
                .filter(id_predicate(id))
                .limit(1);
            Ok(Statement::InsertSelect(InsertSelect {
                table: tables.changelog.clone(),
                columns: ChangelogColumn::ALL
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                source,
            }))
        }
    }
}

/// Sets `TAG` on the most recently executed row only.
pub fn tag_latest_row(
    topology: &Topology,
    tables: &BookkeepingTables,
    tag: &str,
) -> Result<Statement, ChlogError> {
    const OPERATION: &str = "tag latest row";
    if tag.trim().is_empty() {
        return Err(errors::empty_tag_error(OPERATION));
    }

    let identity: Vec<String> = ChangelogColumn::IDENTITY
        .iter()
        .map(ToString::to_string)
        .collect();
    let latest = Select::new(
        tables.changelog.clone(),
        identity
            .iter()
            .map(|column| SelectItem::column(column.as_str()))
            .collect(),
    )
    .with_final(topology.is_standalone())
    .order_by_desc(ChangelogColumn::DateExecuted.as_str())
    .order_by_desc(ChangelogColumn::OrderExecuted.as_str())
    .limit(1);

    Ok(Statement::AlterUpdate(AlterUpdate {
        table: tables.changelog.clone(),
        on_cluster: None,
        assignments: vec![(ChangelogColumn::Tag.to_string(), Expr::value(tag))],
        predicate: Some(Predicate::InSubquery {
            columns: identity,
            query: Box::new(latest),
        }),
    }))
}

/// Same shape in both topologies; only the `ON CLUSTER` clause differs.
pub fn truncate_changelog_table(topology: &Topology, tables: &BookkeepingTables) -> Statement {
    Dispatch::new(topology)
        .default_handler(|topology| {
            Statement::Truncate(Truncate {
                table: tables.changelog.clone(),
                on_cluster: topology.on_cluster(),
            })
        })
        .run()
}

fn require_id(operation: &str, id: &str) -> Result<(), ChlogError> {
    if id.trim().is_empty() {
        return Err(errors::missing_identity_error(operation, "id"));
    }
    Ok(())
}

fn id_predicate(id: &str) -> Predicate {
    Predicate::eq(ChangelogColumn::Id.as_str(), Expr::value(id))
}

fn assignments(
    operation: &str,
    values: &ColumnValueMap,
) -> Result<Vec<(String, Expr)>, ChlogError> {
    let assignments: Vec<_> = values
        .supplied()
        .map(|(column, value)| (column.to_string(), Expr::Value(value.clone())))
        .collect();
    if assignments.is_empty() {
        return Err(errors::empty_column_map_error(operation));
    }
    Ok(assignments)
}
