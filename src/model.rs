//! The table model: an ordered collection of named, typed columns of
//! equal length.
//!
//! Columns are addressed by a stable [`ColumnId`]; views and layouts only
//! ever hold ids and look columns up through [`Table::get_column`].

use std::fmt;

use lasso::{Rodeo, Spur};
use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// Stable identity of a column. Assigned once, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnId(u64);

impl ColumnId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Element type of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueType {
    Int,
    Float,
    Bool,
    Str,
}

impl ValueType {
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Int => "int64",
            ValueType::Float => "float64",
            ValueType::Bool => "bool",
            ValueType::Str => "str",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single cell value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Bool(_) => ValueType::Bool,
            Value::Str(_) => ValueType::Str,
        }
    }
}

/// The type's own string form. Floats use their round-trip representation
/// so that saved files load back to the same values.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Bool(v) => f.write_str(if *v { "True" } else { "False" }),
            Value::Str(v) => f.write_str(v),
        }
    }
}

/// Interned string cells.
pub struct StrValues {
    symbols: Vec<Spur>,
    interner: Rodeo,
}

impl StrValues {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut interner = Rodeo::default();
        let symbols = values
            .into_iter()
            .map(|s| interner.get_or_intern(s.as_ref()))
            .collect();
        Self { symbols, interner }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.symbols.get(idx).map(|s| self.interner.resolve(s))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(|s| self.interner.resolve(s))
    }

    fn remove(&mut self, idx: usize) -> String {
        let spur = self.symbols.remove(idx);
        self.interner.resolve(&spur).to_string()
    }

    fn insert(&mut self, idx: usize, value: &str) {
        let spur = self.interner.get_or_intern(value);
        self.symbols.insert(idx, spur);
    }
}

impl Clone for StrValues {
    fn clone(&self) -> Self {
        StrValues::new(self.iter())
    }
}

impl fmt::Debug for StrValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrValues")
            .field("len", &self.symbols.len())
            .field("distinct", &self.interner.len())
            .finish()
    }
}

/// Homogeneous cell storage for one column.
#[derive(Clone, Debug)]
pub enum Values {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Bool(Vec<bool>),
    Str(StrValues),
}

impl Values {
    pub fn strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Values::Str(StrValues::new(values))
    }

    pub fn len(&self) -> usize {
        match self {
            Values::Int(v) => v.len(),
            Values::Float(v) => v.len(),
            Values::Bool(v) => v.len(),
            Values::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Values::Int(_) => ValueType::Int,
            Values::Float(_) => ValueType::Float,
            Values::Bool(_) => ValueType::Bool,
            Values::Str(_) => ValueType::Str,
        }
    }

    pub fn get(&self, idx: usize) -> Option<Value> {
        match self {
            Values::Int(v) => v.get(idx).map(|x| Value::Int(*x)),
            Values::Float(v) => v.get(idx).map(|x| Value::Float(*x)),
            Values::Bool(v) => v.get(idx).map(|x| Value::Bool(*x)),
            Values::Str(v) => v.get(idx).map(|x| Value::Str(x.to_string())),
        }
    }

    /// Removes and returns the value at `idx`. Caller checks the bound.
    fn remove(&mut self, idx: usize) -> Value {
        match self {
            Values::Int(v) => Value::Int(v.remove(idx)),
            Values::Float(v) => Value::Float(v.remove(idx)),
            Values::Bool(v) => Value::Bool(v.remove(idx)),
            Values::Str(v) => Value::Str(v.remove(idx)),
        }
    }

    /// Inserts `value` at `idx`. Caller checks the bound and type.
    fn insert(&mut self, idx: usize, value: Value) {
        match (self, value) {
            (Values::Int(v), Value::Int(x)) => v.insert(idx, x),
            (Values::Float(v), Value::Float(x)) => v.insert(idx, x),
            (Values::Bool(v), Value::Bool(x)) => v.insert(idx, x),
            (Values::Str(v), Value::Str(x)) => v.insert(idx, &x),
            (values, value) => unreachable!(
                "insert of {} into {} column",
                value.value_type(),
                values.value_type()
            ),
        }
    }
}

/// A named column of values.
#[derive(Clone, Debug)]
pub struct Column {
    id: ColumnId,
    name: String,
    values: Values,
}

impl Column {
    pub fn id(&self) -> ColumnId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn value_type(&self) -> ValueType {
        self.values.value_type()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value_at(&self, row: usize) -> Option<Value> {
        self.values.get(row)
    }

    /// Replaces the name, returning the previous one.
    pub fn set_name(&mut self, name: impl Into<String>) -> String {
        std::mem::replace(&mut self.name, name.into())
    }
}

/// Whether deleting the only remaining row is allowed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LastRowPolicy {
    /// `delete_row` fails with [`TableError::LastRow`].
    #[default]
    Refuse,
    /// The table may become empty.
    Allow,
}

/// A row's values in natural column order, as removed by
/// [`Table::delete_row`] and accepted by [`Table::insert_row`].
pub type Row = Vec<Value>;

/// Ordered collection of equal-length columns.
#[derive(Clone, Debug, Default)]
pub struct Table {
    columns: Vec<Column>,
    /// `None` until the first column is added.
    num_rows: Option<usize>,
    next_id: u64,
    last_row_policy: LastRowPolicy,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_last_row_policy(mut self, policy: LastRowPolicy) -> Self {
        self.last_row_policy = policy;
        self
    }

    pub fn last_row_policy(&self) -> LastRowPolicy {
        self.last_row_policy
    }

    pub fn set_last_row_policy(&mut self, policy: LastRowPolicy) {
        self.last_row_policy = policy;
    }

    /// Adds a column at `position` (end if `None`) and returns its new id.
    pub fn add_column(
        &mut self,
        values: Values,
        name: impl Into<String>,
        position: Option<usize>,
    ) -> Result<ColumnId, TableError> {
        let position = position.unwrap_or(self.columns.len());
        if position > self.columns.len() {
            return Err(TableError::IndexOutOfRange {
                index: position,
                len: self.columns.len() + 1,
            });
        }
        if let Some(expected) = self.num_rows {
            if values.len() != expected {
                return Err(TableError::LengthMismatch {
                    expected,
                    actual: values.len(),
                });
            }
        }

        self.num_rows = Some(values.len());
        let id = ColumnId(self.next_id);
        self.next_id += 1;
        self.columns.insert(
            position,
            Column {
                id,
                name: name.into(),
                values,
            },
        );
        Ok(id)
    }

    pub fn get_column(&self, id: ColumnId) -> Result<&Column, TableError> {
        self.columns
            .iter()
            .find(|c| c.id == id)
            .ok_or(TableError::NotFound(id))
    }

    /// Mutable access is limited to what keeps lengths equal.
    pub fn get_column_mut(&mut self, id: ColumnId) -> Result<&mut Column, TableError> {
        self.columns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(TableError::NotFound(id))
    }

    /// Renames a column, returning its previous name.
    pub fn rename_column(
        &mut self,
        id: ColumnId,
        name: impl Into<String>,
    ) -> Result<String, TableError> {
        Ok(self.get_column_mut(id)?.set_name(name))
    }

    /// Columns in natural order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn column_ids(&self) -> Vec<ColumnId> {
        self.columns.iter().map(|c| c.id).collect()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows; 0 before any column is added.
    pub fn row_count(&self) -> usize {
        self.num_rows.unwrap_or(0)
    }

    pub fn value_at(&self, id: ColumnId, row: usize) -> Result<Value, TableError> {
        let column = self.get_column(id)?;
        column.value_at(row).ok_or(TableError::IndexOutOfRange {
            index: row,
            len: column.len(),
        })
    }

    /// Removes row `row` from every column and returns the removed values
    /// in natural column order.
    pub fn delete_row(&mut self, row: usize) -> Result<Row, TableError> {
        let len = self.row_count();
        if row >= len {
            return Err(TableError::IndexOutOfRange { index: row, len });
        }
        if len == 1 && self.last_row_policy == LastRowPolicy::Refuse {
            return Err(TableError::LastRow);
        }

        let removed = self
            .columns
            .iter_mut()
            .map(|c| c.values.remove(row))
            .collect();
        self.num_rows = Some(len - 1);
        self.check_lengths();
        Ok(removed)
    }

    /// Inserts one value per column at `row`. The inverse of
    /// [`Table::delete_row`].
    pub fn insert_row(&mut self, row: usize, values: Row) -> Result<(), TableError> {
        if values.len() != self.columns.len() {
            return Err(TableError::LengthMismatch {
                expected: self.columns.len(),
                actual: values.len(),
            });
        }
        let len = self.row_count();
        if row > len {
            return Err(TableError::IndexOutOfRange {
                index: row,
                len: len + 1,
            });
        }
        for (column, value) in self.columns.iter().zip(&values) {
            if column.value_type() != value.value_type() {
                return Err(TableError::TypeMismatch {
                    column: column.id,
                    expected: column.value_type().name(),
                    actual: value.value_type().name(),
                });
            }
        }

        for (column, value) in self.columns.iter_mut().zip(values) {
            column.values.insert(row, value);
        }
        self.num_rows = Some(len + 1);
        self.check_lengths();
        Ok(())
    }

    fn check_lengths(&self) {
        let rows = self.row_count();
        for column in &self.columns {
            assert_eq!(
                column.len(),
                rows,
                "column {} has {} values but table has {} rows",
                column.id,
                column.len(),
                rows
            );
        }
    }
}
