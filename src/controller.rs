//! Edits with undo.
//!
//! Each edit records the operation that reverses it. Undo pops and applies
//! the most recent one; there is no redo.

use tracing::debug;

use crate::error::TableError;
use crate::model::{ColumnId, Row, Table};

/// The inverse of an edit, applied on undo.
#[derive(Clone, Debug, PartialEq)]
pub enum UndoAction {
    InsertRow { row: usize, values: Row },
    DeleteRow { row: usize },
    RenameColumn { id: ColumnId, name: String },
}

impl UndoAction {
    fn apply(&self, table: &mut Table) -> Result<(), TableError> {
        match self {
            UndoAction::InsertRow { row, values } => table.insert_row(*row, values.clone()),
            UndoAction::DeleteRow { row } => table.delete_row(*row).map(drop),
            UndoAction::RenameColumn { id, name } => table.rename_column(*id, name.as_str()).map(drop),
        }
    }

    /// Short description for the status line.
    pub fn describe(&self) -> String {
        match self {
            UndoAction::InsertRow { row, .. } => format!("restored row {}", row),
            UndoAction::DeleteRow { row } => format!("removed row {}", row),
            UndoAction::RenameColumn { name, .. } => format!("restored column name {}", name),
        }
    }
}

#[derive(Debug, Default)]
pub struct Controller {
    undo: Vec<UndoAction>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn delete_row(&mut self, table: &mut Table, row: usize) -> Result<(), TableError> {
        let values = table.delete_row(row)?;
        debug!(row, "deleted row");
        self.undo.push(UndoAction::InsertRow { row, values });
        Ok(())
    }

    pub fn insert_row(&mut self, table: &mut Table, row: usize, values: Row) -> Result<(), TableError> {
        table.insert_row(row, values)?;
        debug!(row, "inserted row");
        self.undo.push(UndoAction::DeleteRow { row });
        Ok(())
    }

    /// Returns the previous name.
    pub fn rename_column(
        &mut self,
        table: &mut Table,
        id: ColumnId,
        name: impl Into<String>,
    ) -> Result<String, TableError> {
        let old = table.rename_column(id, name)?;
        debug!(column = %id, old = %old, "renamed column");
        self.undo.push(UndoAction::RenameColumn {
            id,
            name: old.clone(),
        });
        Ok(old)
    }

    /// Reverses the most recent edit and returns what was applied, or
    /// `None` if there is nothing to undo. A failed undo stays on the
    /// stack.
    pub fn undo(&mut self, table: &mut Table) -> Result<Option<UndoAction>, TableError> {
        let Some(action) = self.undo.pop() else {
            return Ok(None);
        };
        if let Err(err) = action.apply(table) {
            self.undo.push(action);
            return Err(err);
        }
        debug!(?action, "undo");
        Ok(Some(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LastRowPolicy, Value, Values};

    fn table() -> Table {
        let mut table = Table::new();
        table
            .add_column(Values::Int(vec![1, 2, 3]), "n", None)
            .unwrap();
        table
            .add_column(Values::Float(vec![0.5, 1.5, 2.5]), "x", None)
            .unwrap();
        table
    }

    #[test]
    fn test_undo_delete_restores_row() {
        let mut table = table();
        let id = table.column_ids()[1];
        let mut ctl = Controller::new();
        ctl.delete_row(&mut table, 0).unwrap();
        ctl.delete_row(&mut table, 1).unwrap();
        assert_eq!(table.row_count(), 1);

        ctl.undo(&mut table).unwrap();
        ctl.undo(&mut table).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.value_at(id, 0).unwrap(), Value::Float(0.5));
        assert_eq!(table.value_at(id, 2).unwrap(), Value::Float(2.5));
        assert_eq!(ctl.undo(&mut table), Ok(None));
    }

    #[test]
    fn test_undo_insert_and_rename() {
        let mut table = table();
        let id = table.column_ids()[0];
        let mut ctl = Controller::new();
        ctl.insert_row(&mut table, 3, vec![Value::Int(4), Value::Float(3.5)])
            .unwrap();
        ctl.rename_column(&mut table, id, "count").unwrap();

        let action = ctl.undo(&mut table).unwrap().unwrap();
        assert_eq!(action.describe(), "restored column name n");
        assert_eq!(table.get_column(id).unwrap().name(), "n");
        ctl.undo(&mut table).unwrap();
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_failed_edit_is_not_recorded() {
        let mut table = table();
        let mut ctl = Controller::new();
        assert!(ctl.delete_row(&mut table, 9).is_err());
        assert!(!ctl.can_undo());
    }

    #[test]
    fn test_last_row_policy() {
        let mut table = Table::new();
        table.add_column(Values::Int(vec![1]), "n", None).unwrap();
        let mut ctl = Controller::new();
        assert_eq!(ctl.delete_row(&mut table, 0), Err(TableError::LastRow));

        table.set_last_row_policy(LastRowPolicy::Allow);
        ctl.delete_row(&mut table, 0).unwrap();
        assert_eq!(table.row_count(), 0);
        ctl.undo(&mut table).unwrap();
        assert_eq!(table.row_count(), 1);
    }
}
