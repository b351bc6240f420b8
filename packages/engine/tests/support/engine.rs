#![allow(dead_code)]

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chlog_engine::sql::{Expr, Predicate, Select, SelectItem, Statement, TableEngine, TableRef};
use chlog_engine::ColumnValue;
use chrono::{DateTime, Duration, TimeZone, Utc};

pub type Row = BTreeMap<String, ColumnValue>;

#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ColumnValue>>,
}

impl ResultSet {
    fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Vec<&ColumnValue> {
        let index = self
            .columns
            .iter()
            .position(|column| column == name)
            .unwrap_or_else(|| panic!("column {name} not in result {:?}", self.columns));
        self.rows.iter().map(|row| &row[index]).collect()
    }

    pub fn single(&self, name: &str) -> &ColumnValue {
        let values = self.column(name);
        assert_eq!(values.len(), 1, "expected exactly one row, got {:?}", self.rows);
        values[0]
    }
}

#[derive(Debug, Clone)]
struct Table {
    columns: Vec<String>,
    engine: TableEngine,
    rows: Vec<Row>,
}

/// Minimal model of the two table families the bookkeeping statements
/// target.
///
/// Merge tables append every insert and only deduplicate (replacing) or
/// cancel sign pairs (collapsing) on `merge()` or in a `FINAL` read.
/// KeeperMap tables hold one row per primary key at all times.
#[derive(Debug)]
pub struct SimulatedClickHouse {
    tables: BTreeMap<String, Table>,
    clock: DateTime<Utc>,
}

impl Default for SimulatedClickHouse {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedClickHouse {
    pub fn new() -> Self {
        Self {
            tables: BTreeMap::new(),
            clock: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock
    }

    pub fn execute(&mut self, statement: &Statement) -> Result<ResultSet, String> {
        self.clock += Duration::milliseconds(1);
        match statement {
            Statement::CreateTable(create) => {
                self.tables.entry(key(&create.table)).or_insert_with(|| Table {
                    columns: create.columns.iter().map(|column| column.name.clone()).collect(),
                    engine: create.engine.clone(),
                    rows: Vec::new(),
                });
                Ok(ResultSet::empty())
            }
            Statement::Insert(insert) => {
                let values = insert
                    .values
                    .iter()
                    .map(|value| match value {
                        Expr::Value(value) => Ok(self.eval(value)),
                        Expr::Column(name) => Err(format!("column {name} in VALUES")),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                self.store(&insert.table, &insert.columns, values)?;
                Ok(ResultSet::empty())
            }
            Statement::InsertSelect(insert) => {
                let source = self.select(&insert.source)?;
                for row in source.rows {
                    self.store(&insert.table, &insert.columns, row)?;
                }
                Ok(ResultSet::empty())
            }
            Statement::AlterUpdate(update) => {
                let matcher = match &update.predicate {
                    Some(predicate) => Some(self.matcher(predicate)?),
                    None => None,
                };
                let now = self.clock;
                let table = self.table_mut(&update.table)?;
                let key_columns = key_columns(&table.engine);
                for (column, _) in &update.assignments {
                    if key_columns.contains(column) {
                        return Err(format!("cannot update key column {column}"));
                    }
                    if !table.columns.contains(column) {
                        return Err(format!("unknown column {column}"));
                    }
                }
                for row in &mut table.rows {
                    if matcher.as_ref().map_or(true, |matcher| matcher.matches(row)) {
                        let assigned = update
                            .assignments
                            .iter()
                            .map(|(column, value)| (column.clone(), eval_expr(value, row, now)))
                            .collect::<Vec<_>>();
                        row.extend(assigned);
                    }
                }
                Ok(ResultSet::empty())
            }
            Statement::Select(select) => self.select(select),
            Statement::Truncate(truncate) => {
                self.table_mut(&truncate.table)?.rows.clear();
                Ok(ResultSet::empty())
            }
        }
    }

    pub fn execute_all(
        &mut self,
        statements: impl IntoIterator<Item = Statement>,
    ) -> Result<(), String> {
        for statement in statements {
            self.execute(&statement)?;
        }
        Ok(())
    }

    /// Runs the background merge on every merge table.
    pub fn merge(&mut self) {
        for table in self.tables.values_mut() {
            table.rows = final_rows(table);
        }
    }

    pub fn physical_rows(&self, table: &TableRef) -> Vec<Row> {
        self.tables
            .get(&key(table))
            .map(|table| table.rows.clone())
            .unwrap_or_default()
    }

    fn eval(&self, value: &ColumnValue) -> ColumnValue {
        eval_value(value, self.clock)
    }

    fn table(&self, table: &TableRef) -> Result<&Table, String> {
        self.tables
            .get(&key(table))
            .ok_or_else(|| format!("table {table} does not exist"))
    }

    fn table_mut(&mut self, table: &TableRef) -> Result<&mut Table, String> {
        self.tables
            .get_mut(&key(table))
            .ok_or_else(|| format!("table {table} does not exist"))
    }

    fn store(
        &mut self,
        table_ref: &TableRef,
        columns: &[String],
        values: Vec<ColumnValue>,
    ) -> Result<(), String> {
        if columns.len() != values.len() {
            return Err(format!(
                "{} columns but {} values",
                columns.len(),
                values.len()
            ));
        }
        let table = self.table_mut(table_ref)?;
        let mut row: Row = table
            .columns
            .iter()
            .map(|column| (column.clone(), ColumnValue::Null))
            .collect();
        for (column, value) in columns.iter().zip(values) {
            if !table.columns.contains(column) {
                return Err(format!("unknown column {column}"));
            }
            row.insert(column.clone(), value);
        }

        match &table.engine {
            TableEngine::KeeperMap {
                keys_limit,
                primary_key,
                ..
            } => {
                let existing = table
                    .rows
                    .iter()
                    .position(|stored| same_key(stored, &row, primary_key));
                match existing {
                    Some(index) => table.rows[index] = row,
                    None => {
                        if keys_limit.is_some_and(|limit| table.rows.len() as u64 >= limit) {
                            return Err(format!("keys limit reached for {table_ref}"));
                        }
                        table.rows.push(row);
                    }
                }
            }
            TableEngine::CollapsingMergeTree { sign, .. } => {
                match row.get(sign) {
                    Some(ColumnValue::Integer(1 | -1)) => {}
                    other => return Err(format!("invalid {sign} value {other:?}")),
                }
                table.rows.push(row);
            }
            TableEngine::ReplacingMergeTree { .. } => table.rows.push(row),
        }
        Ok(())
    }

    fn select(&self, select: &Select) -> Result<ResultSet, String> {
        let table = self.table(&select.from)?;
        let mut rows = if select.final_read {
            final_rows(table)
        } else {
            table.rows.clone()
        };
        if let Some(predicate) = &select.predicate {
            let matcher = self.matcher(predicate)?;
            rows.retain(|row| matcher.matches(row));
        }
        for order in select.order_by.iter().rev() {
            rows.sort_by(|left, right| {
                let ordering = compare(&left[&order.column], &right[&order.column]);
                if order.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        let columns = select.items.iter().map(label).collect();
        let aggregated = !select.group_by.is_empty()
            || select
                .items
                .iter()
                .any(|item| matches!(item, SelectItem::Max(_)));
        let mut output: Vec<Vec<ColumnValue>> = if aggregated {
            let mut groups: Vec<(Vec<ColumnValue>, Vec<Row>)> = Vec::new();
            for row in rows {
                let group_key: Vec<_> = select
                    .group_by
                    .iter()
                    .map(|column| row[column].clone())
                    .collect();
                match groups.iter_mut().find(|(existing, _)| keys_equal(existing, &group_key)) {
                    Some((_, members)) => members.push(row),
                    None => groups.push((group_key, vec![row])),
                }
            }
            if groups.is_empty() && select.group_by.is_empty() {
                groups.push((Vec::new(), Vec::new()));
            }
            groups
                .iter()
                .map(|(_, members)| {
                    select
                        .items
                        .iter()
                        .map(|item| aggregate(item, members, self.clock))
                        .collect()
                })
                .collect()
        } else {
            rows.iter()
                .map(|row| {
                    select
                        .items
                        .iter()
                        .map(|item| match item {
                            SelectItem::Expr(expr) => eval_expr(expr, row, self.clock),
                            SelectItem::Max(column) => row[column].clone(),
                        })
                        .collect()
                })
                .collect()
        };
        if let Some(limit) = select.limit {
            output.truncate(limit as usize);
        }
        Ok(ResultSet {
            columns,
            rows: output,
        })
    }

    fn matcher(&self, predicate: &Predicate) -> Result<Matcher, String> {
        match predicate {
            Predicate::Eq { column, value } => Ok(Matcher::Eq {
                column: column.clone(),
                value: value.clone(),
                now: self.clock,
            }),
            Predicate::InSubquery { columns, query } => {
                let result = self.select(query)?;
                Ok(Matcher::In {
                    columns: columns.clone(),
                    tuples: result.rows,
                })
            }
            Predicate::Raw(condition) => Err(format!("raw predicate not supported: {condition}")),
        }
    }
}

enum Matcher {
    Eq {
        column: String,
        value: Expr,
        now: DateTime<Utc>,
    },
    In {
        columns: Vec<String>,
        tuples: Vec<Vec<ColumnValue>>,
    },
}

impl Matcher {
    fn matches(&self, row: &Row) -> bool {
        match self {
            Self::Eq { column, value, now } => {
                compare(&row[column], &eval_expr(value, row, *now)) == Ordering::Equal
            }
            Self::In { columns, tuples } => {
                let candidate: Vec<_> = columns.iter().map(|column| row[column].clone()).collect();
                tuples.iter().any(|tuple| keys_equal(tuple, &candidate))
            }
        }
    }
}

fn key(table: &TableRef) -> String {
    table.to_string()
}

fn key_columns(engine: &TableEngine) -> Vec<String> {
    match engine {
        TableEngine::ReplacingMergeTree { order_by } => order_by.clone(),
        TableEngine::CollapsingMergeTree { order_by, .. } => order_by.clone(),
        TableEngine::KeeperMap { primary_key, .. } => primary_key.clone(),
    }
}

fn same_key(left: &Row, right: &Row, key_columns: &[String]) -> bool {
    key_columns
        .iter()
        .all(|column| compare(&left[column], &right[column]) == Ordering::Equal)
}

fn keys_equal(left: &[ColumnValue], right: &[ColumnValue]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .all(|(left, right)| compare(left, right) == Ordering::Equal)
}

/// What a `FINAL` read (or a completed merge) sees.
fn final_rows(table: &Table) -> Vec<Row> {
    match &table.engine {
        TableEngine::KeeperMap { .. } => table.rows.clone(),
        TableEngine::ReplacingMergeTree { order_by } => {
            let mut latest: Vec<Row> = Vec::new();
            for row in &table.rows {
                match latest.iter_mut().find(|kept| same_key(kept, row, order_by)) {
                    Some(kept) => *kept = row.clone(),
                    None => latest.push(row.clone()),
                }
            }
            latest
        }
        TableEngine::CollapsingMergeTree { sign, order_by } => {
            let mut groups: Vec<Vec<&Row>> = Vec::new();
            for row in &table.rows {
                match groups
                    .iter_mut()
                    .find(|group| same_key(group[0], row, order_by))
                {
                    Some(group) => group.push(row),
                    None => groups.push(vec![row]),
                }
            }
            let sign_of = |row: &Row| match row[sign] {
                ColumnValue::Integer(value) => value,
                _ => 0,
            };
            // Per key: balanced groups ending on -1 vanish; otherwise the first
            // -1 and/or the last +1 survive, whichever side is not outnumbered.
            groups
                .into_iter()
                .flat_map(|group| {
                    let positive = group.iter().filter(|row| sign_of(**row) > 0).count();
                    let negative = group.iter().filter(|row| sign_of(**row) < 0).count();
                    let last_is_positive = group.last().is_some_and(|row| sign_of(*row) > 0);
                    let first_negative = group.iter().find(|row| sign_of(**row) < 0);
                    let last_positive = group.iter().rev().find(|row| sign_of(**row) > 0);
                    let survivors: Vec<&&Row> = match positive.cmp(&negative) {
                        Ordering::Equal if !last_is_positive => Vec::new(),
                        Ordering::Equal => first_negative.into_iter().chain(last_positive).collect(),
                        Ordering::Greater => last_positive.into_iter().collect(),
                        Ordering::Less => first_negative.into_iter().collect(),
                    };
                    let owned: Vec<Row> = survivors.into_iter().map(|row| (*row).clone()).collect();
                    owned
                })
                .collect()
        }
    }
}

fn label(item: &SelectItem) -> String {
    match item {
        SelectItem::Expr(Expr::Column(name)) => name.clone(),
        SelectItem::Expr(Expr::Value(_)) => "?literal?".to_string(),
        SelectItem::Max(column) => format!("max({column})"),
    }
}

fn aggregate(item: &SelectItem, members: &[Row], now: DateTime<Utc>) -> ColumnValue {
    match item {
        SelectItem::Max(column) => members
            .iter()
            .map(|row| row[column].clone())
            .max_by(compare)
            .unwrap_or(ColumnValue::Integer(0)),
        SelectItem::Expr(Expr::Column(column)) => members
            .first()
            .map(|row| row[column].clone())
            .unwrap_or(ColumnValue::Null),
        SelectItem::Expr(Expr::Value(value)) => eval_value(value, now),
    }
}

fn eval_expr(expr: &Expr, row: &Row, now: DateTime<Utc>) -> ColumnValue {
    match expr {
        Expr::Value(value) => eval_value(value, now),
        Expr::Column(column) => row[column].clone(),
    }
}

fn eval_value(value: &ColumnValue, now: DateTime<Utc>) -> ColumnValue {
    match value {
        ColumnValue::Function(call) if call == "now64()" => ColumnValue::Timestamp(now),
        other => other.clone(),
    }
}

pub fn compare(left: &ColumnValue, right: &ColumnValue) -> Ordering {
    use ColumnValue::*;
    match (left, right) {
        (Null, Null) => Ordering::Equal,
        (Null, _) => Ordering::Less,
        (_, Null) => Ordering::Greater,
        (Integer(left), Integer(right)) => left.cmp(right),
        (Unsigned(left), Unsigned(right)) => left.cmp(right),
        (Integer(left), Unsigned(right)) => i128::from(*left).cmp(&i128::from(*right)),
        (Unsigned(left), Integer(right)) => i128::from(*left).cmp(&i128::from(*right)),
        (Text(left), Text(right)) => left.cmp(right),
        (Timestamp(left), Timestamp(right)) => left.cmp(right),
        (left, right) => format!("{left:?}").cmp(&format!("{right:?}")),
    }
}
