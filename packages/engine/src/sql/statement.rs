use crate::literal::{quote_string, LiteralRenderer};
use crate::sql::TableRef;
use crate::ColumnValue;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Value(ColumnValue),
    Column(String),
}

impl Expr {
    pub fn value(value: impl Into<ColumnValue>) -> Self {
        Self::Value(value.into())
    }

    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(name.into())
    }

    fn render(&self, literals: &dyn LiteralRenderer) -> String {
        match self {
            Self::Value(value) => literals.render(value),
            Self::Column(name) => name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    Expr(Expr),
    Max(String),
}

impl SelectItem {
    pub fn column(name: impl Into<String>) -> Self {
        Self::Expr(Expr::column(name))
    }

    fn render(&self, literals: &dyn LiteralRenderer) -> String {
        match self {
            Self::Expr(expr) => expr.render(literals),
            Self::Max(name) => format!("max({name})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq { column: String, value: Expr },
    InSubquery { columns: Vec<String>, query: Box<Select> },
    /// Host-supplied condition whose placeholders are already bound.
    Raw(String),
}

impl Predicate {
    pub fn eq(column: impl Into<String>, value: Expr) -> Self {
        Self::Eq {
            column: column.into(),
            value,
        }
    }

    fn render(&self, literals: &dyn LiteralRenderer) -> String {
        match self {
            Self::Eq { column, value } => format!("{column} = {}", value.render(literals)),
            Self::InSubquery { columns, query } => {
                let target = match columns.as_slice() {
                    [single] => single.clone(),
                    many => format!("({})", many.join(", ")),
                };
                format!("{target} IN ({})", query.render(literals))
            }
            Self::Raw(condition) => condition.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub items: Vec<SelectItem>,
    pub from: TableRef,
    /// `FINAL`: merge pending parts before reading.
    pub final_read: bool,
    pub predicate: Option<Predicate>,
    pub group_by: Vec<String>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<u64>,
}

impl Select {
    pub fn new(from: TableRef, items: Vec<SelectItem>) -> Self {
        Self {
            items,
            from,
            final_read: false,
            predicate: None,
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    pub fn with_final(mut self, final_read: bool) -> Self {
        self.final_read = final_read;
        self
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn group_by(mut self, columns: Vec<String>) -> Self {
        self.group_by = columns;
        self
    }

    pub fn order_by_desc(mut self, column: impl Into<String>) -> Self {
        self.order_by.push(OrderBy {
            column: column.into(),
            descending: true,
        });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn render(&self, literals: &dyn LiteralRenderer) -> String {
        let items = self
            .items
            .iter()
            .map(|item| item.render(literals))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("SELECT {items} FROM {}", self.from);
        if self.final_read {
            sql.push_str(" FINAL");
        }
        if let Some(predicate) = &self.predicate {
            sql.push_str(" WHERE ");
            sql.push_str(&predicate.render(literals));
        }
        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }
        if !self.order_by.is_empty() {
            let order = self
                .order_by
                .iter()
                .map(|order| {
                    if order.descending {
                        format!("{} DESC", order.column)
                    } else {
                        order.column.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str(" ORDER BY ");
            sql.push_str(&order);
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        sql
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub sql_type: String,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEngine {
    ReplacingMergeTree {
        order_by: Vec<String>,
    },
    CollapsingMergeTree {
        sign: String,
        order_by: Vec<String>,
    },
    KeeperMap {
        path: String,
        keys_limit: Option<u64>,
        primary_key: Vec<String>,
    },
}

impl TableEngine {
    fn render(&self) -> String {
        match self {
            Self::ReplacingMergeTree { order_by } => {
                format!("ReplacingMergeTree() ORDER BY ({})", order_by.join(", "))
            }
            Self::CollapsingMergeTree { sign, order_by } => {
                format!(
                    "CollapsingMergeTree({sign}) ORDER BY ({})",
                    order_by.join(", ")
                )
            }
            Self::KeeperMap {
                path,
                keys_limit,
                primary_key,
            } => {
                let arguments = match keys_limit {
                    Some(limit) => format!("{}, {limit}", quote_string(path)),
                    None => quote_string(path),
                };
                format!(
                    "KeeperMap({arguments}) PRIMARY KEY ({})",
                    primary_key.join(", ")
                )
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub table: TableRef,
    pub on_cluster: Option<String>,
    pub columns: Vec<ColumnDef>,
    pub engine: TableEngine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: TableRef,
    pub columns: Vec<String>,
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertSelect {
    pub table: TableRef,
    pub columns: Vec<String>,
    pub source: Select,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlterUpdate {
    pub table: TableRef,
    pub on_cluster: Option<String>,
    pub assignments: Vec<(String, Expr)>,
    pub predicate: Option<Predicate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Truncate {
    pub table: TableRef,
    pub on_cluster: Option<String>,
}

/// One bookkeeping statement, kept structured until it is rendered so the
/// escaping of values happens in exactly one place.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable(CreateTable),
    Insert(Insert),
    InsertSelect(InsertSelect),
    AlterUpdate(AlterUpdate),
    Select(Select),
    Truncate(Truncate),
}

impl Statement {
    pub fn table(&self) -> &TableRef {
        match self {
            Self::CreateTable(create) => &create.table,
            Self::Insert(insert) => &insert.table,
            Self::InsertSelect(insert) => &insert.table,
            Self::AlterUpdate(update) => &update.table,
            Self::Select(select) => &select.from,
            Self::Truncate(truncate) => &truncate.table,
        }
    }

    pub fn render(&self, literals: &dyn LiteralRenderer) -> String {
        match self {
            Self::CreateTable(create) => {
                let columns = create
                    .columns
                    .iter()
                    .map(|column| format!("{} {}", column.name, column.sql_type))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "CREATE TABLE IF NOT EXISTS {}{} ({columns}) ENGINE = {}",
                    create.table,
                    on_cluster_clause(create.on_cluster.as_deref()),
                    create.engine.render()
                )
            }
            Self::Insert(insert) => {
                let values = insert
                    .values
                    .iter()
                    .map(|value| value.render(literals))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "INSERT INTO {} ({}) VALUES ({values})",
                    insert.table,
                    insert.columns.join(", ")
                )
            }
            Self::InsertSelect(insert) => format!(
                "INSERT INTO {} ({}) {}",
                insert.table,
                insert.columns.join(", "),
                insert.source.render(literals)
            ),
            Self::AlterUpdate(update) => {
                let assignments = update
                    .assignments
                    .iter()
                    .map(|(column, value)| format!("{column} = {}", value.render(literals)))
                    .collect::<Vec<_>>()
                    .join(", ");
                let mut sql = format!(
                    "ALTER TABLE {}{} UPDATE {assignments}",
                    update.table,
                    on_cluster_clause(update.on_cluster.as_deref())
                );
                if let Some(predicate) = &update.predicate {
                    sql.push_str(" WHERE ");
                    sql.push_str(&predicate.render(literals));
                }
                sql
            }
            Self::Select(select) => select.render(literals),
            Self::Truncate(truncate) => format!(
                "TRUNCATE TABLE {}{}",
                truncate.table,
                on_cluster_clause(truncate.on_cluster.as_deref())
            ),
        }
    }
}

fn on_cluster_clause(cluster_name: Option<&str>) -> String {
    match cluster_name {
        Some(name) => format!(" ON CLUSTER {}", quote_string(name)),
        None => String::new(),
    }
}
