//! Per-column display configuration.
//!
//! Keeps the display order of columns (independent of the table's natural
//! order), their visibility, and the formatter bound to each.

use crate::error::ViewError;
use crate::fixfmt::{choose_formatter, Adjustment, Formatter};
use crate::model::{ColumnId, Table};

/// Display configuration for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnState {
    pub id: ColumnId,
    /// Hidden columns keep their place in the display order.
    pub visible: bool,
    pub format: Formatter,
}

/// Display order, visibility and formatters of a table's columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnConfig {
    columns: Vec<ColumnState>,
}

impl ColumnConfig {
    /// Create config for every column of `table`, in natural order, all
    /// visible, with formatters chosen from the values.
    pub fn from_table(table: &Table) -> Self {
        let columns = table
            .columns()
            .map(|col| ColumnState {
                id: col.id(),
                visible: true,
                format: choose_formatter(col.values()),
            })
            .collect();
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// All columns in display order, hidden ones included.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnState> {
        self.columns.iter()
    }

    /// Visible columns in display order.
    pub fn visible(&self) -> impl Iterator<Item = &ColumnState> {
        self.columns.iter().filter(|c| c.visible)
    }

    pub fn visible_ids(&self) -> Vec<ColumnId> {
        self.visible().map(|c| c.id).collect()
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    pub fn hidden_count(&self) -> usize {
        self.columns.len() - self.visible_count()
    }

    /// Id of the visible column at `index`, counting visible columns only.
    pub fn visible_id(&self, index: usize) -> Option<ColumnId> {
        self.visible().nth(index).map(|c| c.id)
    }

    /// Index of `id` among the visible columns.
    pub fn visible_index_of(&self, id: ColumnId) -> Option<usize> {
        self.visible().position(|c| c.id == id)
    }

    /// Number of visible columns before display position `position`.
    fn visible_before(&self, position: usize) -> usize {
        self.columns[..position].iter().filter(|c| c.visible).count()
    }

    fn position_of(&self, id: ColumnId) -> Result<usize, ViewError> {
        self.columns
            .iter()
            .position(|c| c.id == id)
            .ok_or(ViewError::NotFound(id))
    }

    pub fn is_visible(&self, id: ColumnId) -> bool {
        self.columns.iter().any(|c| c.id == id && c.visible)
    }

    /// Hide a column. Returns the visible index it had.
    pub fn hide(&mut self, id: ColumnId) -> Result<usize, ViewError> {
        let pos = self.position_of(id)?;
        if !self.columns[pos].visible {
            return Err(ViewError::AlreadyHidden(id));
        }
        let index = self.visible_before(pos);
        self.columns[pos].visible = false;
        Ok(index)
    }

    /// Show a hidden column. Returns the visible index it now has.
    pub fn show(&mut self, id: ColumnId) -> Result<usize, ViewError> {
        let pos = self.position_of(id)?;
        if self.columns[pos].visible {
            return Err(ViewError::AlreadyVisible(id));
        }
        self.columns[pos].visible = true;
        Ok(self.visible_before(pos))
    }

    /// Make every column visible. Returns how many were hidden.
    pub fn show_all(&mut self) -> usize {
        let mut shown = 0;
        for col in self.columns.iter_mut().filter(|c| !c.visible) {
            col.visible = true;
            shown += 1;
        }
        shown
    }

    /// Swap the visible column at `index` with its visible neighbour in
    /// direction `delta` (-1 or +1). Hidden columns in between keep their
    /// places. Returns the column's new visible index, or `None` at the
    /// edge.
    pub fn move_visible(&mut self, index: usize, delta: isize) -> Option<usize> {
        let target = index.checked_add_signed(delta)?;
        let positions: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.visible)
            .map(|(i, _)| i)
            .collect();
        let (&from, &to) = (positions.get(index)?, positions.get(target)?);
        self.columns.swap(from, to);
        Some(target)
    }

    pub fn formatter(&self, id: ColumnId) -> Option<&Formatter> {
        self.columns.iter().find(|c| c.id == id).map(|c| &c.format)
    }

    pub fn set_formatter(&mut self, id: ColumnId, format: Formatter) -> Result<(), ViewError> {
        let pos = self.position_of(id)?;
        self.columns[pos].format = format;
        Ok(())
    }

    /// Apply one formatter adjustment step to a column.
    pub fn adjust(&mut self, id: ColumnId, adjustment: Adjustment) -> Result<(), ViewError> {
        let pos = self.position_of(id)?;
        let col = &mut self.columns[pos];
        col.format = col.format.adjusted(adjustment);
        Ok(())
    }
}
