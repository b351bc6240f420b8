mod statement;
mod table;

pub use statement::{
    AlterUpdate, ColumnDef, CreateTable, Expr, Insert, InsertSelect, OrderBy, Predicate, Select,
    SelectItem, Statement, TableEngine, Truncate,
};
pub use table::TableRef;

pub(crate) use table::escape_column_name;
