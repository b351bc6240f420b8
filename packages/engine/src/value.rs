use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::schema::ChangelogColumn;

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Timestamp(DateTime<Utc>),
    /// Engine function call such as `now64()`, rendered verbatim.
    Function(String),
}

impl ColumnValue {
    pub fn function(call: impl Into<String>) -> Self {
        Self::Function(call.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u64> for ColumnValue {
    fn from(value: u64) -> Self {
        Self::Unsigned(value)
    }
}

impl From<DateTime<Utc>> for ColumnValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl<T> From<Option<T>> for ColumnValue
where
    T: Into<ColumnValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Columns to write in one changelog operation.
///
/// An entry holding `None` is left unspecified: the operation keeps whatever
/// the row already has. Use [`ColumnValue::Null`] to write an actual NULL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnValueMap {
    entries: BTreeMap<ChangelogColumn, Option<ColumnValue>>,
}

impl ColumnValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: ChangelogColumn, value: impl Into<ColumnValue>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: ChangelogColumn, value: impl Into<ColumnValue>) -> &mut Self {
        self.entries.insert(column, Some(value.into()));
        self
    }

    pub fn leave_unspecified(&mut self, column: ChangelogColumn) -> &mut Self {
        self.entries.insert(column, None);
        self
    }

    pub fn get(&self, column: ChangelogColumn) -> Option<&ColumnValue> {
        self.entries.get(&column).and_then(Option::as_ref)
    }

    /// Supplied entries in table column order.
    pub fn supplied(&self) -> impl Iterator<Item = (ChangelogColumn, &ColumnValue)> + '_ {
        self.entries
            .iter()
            .filter_map(|(column, value)| value.as_ref().map(|value| (*column, value)))
    }

    pub fn has_supplied(&self) -> bool {
        self.entries.values().any(Option::is_some)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(ChangelogColumn, Option<ColumnValue>)> for ColumnValueMap {
    fn from_iter<I: IntoIterator<Item = (ChangelogColumn, Option<ColumnValue>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
