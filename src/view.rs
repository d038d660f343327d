//! View state: what part of the table is shown, and how.
//!
//! Every operation here leaves the cursor on a visible column and cell, and
//! the scroll position such that the cursor cell is at least partially
//! inside the viewport.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::column::ColumnConfig;
use crate::error::{TableError, ViewError};
use crate::fixfmt::{Adjustment, Formatter};
use crate::layout::{self, Layout};
use crate::model::{ColumnId, Table};

/// Default viewport width, used until the terminal reports its size.
pub const DEFAULT_WIDTH: usize = 80;
/// Default viewport height.
pub const DEFAULT_HEIGHT: usize = 25;

/// A cell in (visible column index, row index) space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub column: usize,
    pub row: usize,
}

/// A location in character space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Coordinates {
    pub x: usize,
    pub y: usize,
}

/// Literal strings drawn around and between columns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Decorations {
    pub left_border: String,
    pub separator: String,
    pub right_border: String,
    /// Between the row number gutter and the columns; does not scroll.
    pub row_number_separator: String,
}

impl Default for Decorations {
    fn default() -> Self {
        Self {
            left_border: "\u{2551}".to_string(),
            separator: "\u{2502}".to_string(),
            right_border: "\u{2551}".to_string(),
            row_number_separator: String::new(),
        }
    }
}

/// Status bar text, left and right justified.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Status {
    pub left: String,
    pub right: String,
}

/// Display state for one open table.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    columns: ColumnConfig,
    cursor: Position,
    /// Upper-left visible coordinate; `x` in characters, `y` in rows.
    scroll: Coordinates,
    size: Coordinates,
    decorations: Decorations,
    pad: usize,
    show_row_number: bool,
    show_header: bool,
    row_count: usize,
}

impl ViewState {
    /// A view of every column of `table` with automatically chosen
    /// formatters.
    ///
    /// # Panics
    ///
    /// If the table has no columns.
    pub fn new(table: &Table) -> Self {
        Self::with_columns(ColumnConfig::from_table(table), table.row_count())
    }

    /// # Panics
    ///
    /// If `columns` has no visible column.
    pub fn with_columns(columns: ColumnConfig, row_count: usize) -> Self {
        assert!(
            columns.visible_count() > 0,
            "view needs at least one visible column"
        );
        Self {
            columns,
            cursor: Position::default(),
            scroll: Coordinates::default(),
            size: Coordinates {
                x: DEFAULT_WIDTH,
                y: DEFAULT_HEIGHT,
            },
            decorations: Decorations::default(),
            pad: 1,
            show_row_number: true,
            show_header: true,
            row_count,
        }
    }

    pub fn with_decorations(mut self, decorations: Decorations) -> Self {
        self.decorations = decorations;
        self.ensure_cursor_visible();
        self
    }

    pub fn with_pad(mut self, pad: usize) -> Self {
        self.pad = pad;
        self.ensure_cursor_visible();
        self
    }

    pub fn with_show_row_number(mut self, show: bool) -> Self {
        self.show_row_number = show;
        self.ensure_cursor_visible();
        self
    }

    pub fn with_show_header(mut self, show: bool) -> Self {
        self.show_header = show;
        self.ensure_cursor_visible();
        self
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.resize_viewport(width, height);
        self
    }

    pub fn columns(&self) -> &ColumnConfig {
        &self.columns
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn scroll(&self) -> Coordinates {
        self.scroll
    }

    pub fn size(&self) -> Coordinates {
        self.size
    }

    pub fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    pub fn pad(&self) -> usize {
        self.pad
    }

    pub fn show_row_number(&self) -> bool {
        self.show_row_number
    }

    pub fn show_header(&self) -> bool {
        self.show_header
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Screen rows taken by the header.
    pub fn header_rows(&self) -> usize {
        usize::from(self.show_header)
    }

    /// Table rows that fit in the viewport below the header.
    pub fn visible_rows(&self) -> usize {
        self.size.y.saturating_sub(self.header_rows()).max(1)
    }

    pub fn layout(&self) -> Layout {
        layout::compute_layout(self, self.row_count)
    }

    /// Id of the column under the cursor.
    pub fn cursor_column_id(&self) -> ColumnId {
        match self.columns.visible_id(self.cursor.column) {
            Some(id) => id,
            None => panic!("cursor column {} is not visible", self.cursor.column),
        }
    }

    pub fn cursor_formatter(&self) -> Option<&Formatter> {
        self.columns.formatter(self.cursor_column_id())
    }

    fn max_column(&self) -> usize {
        self.columns.visible_count().saturating_sub(1)
    }

    fn max_row(&self) -> usize {
        self.row_count.saturating_sub(1)
    }

    fn max_scroll(&self, layout: &Layout) -> Coordinates {
        let available = self.size.x.saturating_sub(layout.fixed_width());
        Coordinates {
            x: layout.scrollable_width().saturating_sub(available),
            y: self.row_count.saturating_sub(self.visible_rows()),
        }
    }

    fn clamp_scroll(&mut self, layout: &Layout) {
        let max = self.max_scroll(layout);
        self.scroll.x = self.scroll.x.min(max.x);
        self.scroll.y = self.scroll.y.min(max.y);
    }

    /// Scrolls the minimum amount that shows the cursor cell, preferring
    /// its left edge when the column is wider than the viewport.
    fn ensure_cursor_visible(&mut self) {
        let layout = self.layout();
        let fixed = layout.fixed_width();
        if let Ok((x, width)) = layout::column_extent(&layout, self.cursor.column) {
            self.scroll.x = self.scroll.x.max((x + width).saturating_sub(self.size.x));
            self.scroll.x = self.scroll.x.min(x.saturating_sub(fixed));
        }

        let rows = self.visible_rows();
        self.scroll.y = self.scroll.y.min(self.cursor.row);
        self.scroll.y = self.scroll.y.max((self.cursor.row + 1).saturating_sub(rows));

        self.clamp_scroll(&layout);
    }

    /// After the window moved, brings the cursor to the nearest cell inside
    /// it without scrolling again.
    fn pull_cursor_into_window(&mut self) {
        let top = self.scroll.y;
        let bottom = (top + self.visible_rows()).min(self.row_count).saturating_sub(1);
        self.cursor.row = self.cursor.row.clamp(top, bottom.max(top)).min(self.max_row());

        let layout = self.layout();
        let left = self.scroll.x + layout.fixed_width();
        let right = self.scroll.x + self.size.x;
        let overlaps = |index: usize| {
            layout::column_extent(&layout, index)
                .map(|(x, width)| x < right && x + width > left)
                .unwrap_or(false)
        };
        if overlaps(self.cursor.column) {
            return;
        }
        let in_window: Vec<usize> = (0..self.columns.visible_count())
            .filter(|&i| overlaps(i))
            .collect();
        let nearest = if in_window.first().is_some_and(|&i| i > self.cursor.column) {
            in_window.first()
        } else {
            in_window.last()
        };
        match nearest {
            Some(&index) => self.cursor.column = index,
            // Only decorations are in the window.
            None => self.ensure_cursor_visible(),
        }
    }

    /// Moves the cursor by `delta` visible columns, stopping at the edges.
    pub fn move_cursor_column(&mut self, delta: isize) {
        let column = self.cursor.column.saturating_add_signed(delta);
        self.move_cursor_to(Some(column), None);
    }

    /// Moves the cursor by `delta` rows, stopping at the edges.
    pub fn move_cursor_row(&mut self, delta: isize) {
        let row = self.cursor.row.saturating_add_signed(delta);
        self.move_cursor_to(None, Some(row));
    }

    /// Moves the cursor by `pages` screenfuls of rows.
    pub fn move_cursor_page(&mut self, pages: isize) {
        let rows = self.visible_rows() as isize;
        self.move_cursor_row(pages.saturating_mul(rows));
    }

    /// Absolute cursor move; missing components keep their value, and both
    /// are clipped to the valid range.
    pub fn move_cursor_to(&mut self, column: Option<usize>, row: Option<usize>) {
        self.cursor.column = column.unwrap_or(self.cursor.column).min(self.max_column());
        self.cursor.row = row.unwrap_or(self.cursor.row).min(self.max_row());
        self.ensure_cursor_visible();
    }

    /// Moves the cursor to the cell drawn at screen position `(x, y)`.
    /// Returns false, leaving everything unchanged, if no column is there.
    pub fn move_cursor_to_screen_coordinate(&mut self, x: usize, y: usize) -> bool {
        let layout = self.layout();
        if x < layout.fixed_width() || x >= self.size.x {
            return false;
        }
        let Some((index, _)) = layout::locate_column_at(&layout, x + self.scroll.x) else {
            return false;
        };
        if y < self.header_rows() {
            self.move_cursor_to(Some(index), None);
        } else {
            let row = self.scroll.y + y - self.header_rows();
            self.move_cursor_to(Some(index), Some(row));
        }
        true
    }

    /// Scrolls to `(x, y)`, clamped so the viewport stays on the content.
    /// Missing components keep their value.
    pub fn scroll_to(&mut self, x: Option<usize>, y: Option<usize>) {
        let layout = self.layout();
        self.scroll.x = x.unwrap_or(self.scroll.x);
        self.scroll.y = y.unwrap_or(self.scroll.y);
        self.clamp_scroll(&layout);
        self.pull_cursor_into_window();
    }

    pub fn scroll_by(&mut self, dx: isize, dy: isize) {
        let x = self.scroll.x.saturating_add_signed(dx);
        let y = self.scroll.y.saturating_add_signed(dy);
        self.scroll_to(Some(x), Some(y));
    }

    /// Hides a column. If it was under the cursor, the cursor moves to the
    /// next visible column to the right, or else to the left.
    ///
    /// # Panics
    ///
    /// If `id` is the only visible column.
    pub fn hide_column(&mut self, id: ColumnId) -> Result<(), ViewError> {
        if self.columns.is_visible(id) {
            assert!(
                self.columns.visible_count() > 1,
                "cannot hide the last visible column"
            );
        }
        let index = self.columns.hide(id)?;
        debug!(column = %id, index, "hide column");
        if index < self.cursor.column {
            self.cursor.column -= 1;
        }
        self.cursor.column = self.cursor.column.min(self.max_column());
        self.ensure_cursor_visible();
        Ok(())
    }

    /// Shows a hidden column; the cursor stays on the same cell.
    pub fn show_column(&mut self, id: ColumnId) -> Result<(), ViewError> {
        let index = self.columns.show(id)?;
        debug!(column = %id, index, "show column");
        if index <= self.cursor.column {
            self.cursor.column += 1;
        }
        self.ensure_cursor_visible();
        Ok(())
    }

    /// Returns whether the column is visible afterwards.
    pub fn toggle_column_visibility(&mut self, id: ColumnId) -> Result<bool, ViewError> {
        if self.columns.is_visible(id) {
            self.hide_column(id)?;
            Ok(false)
        } else {
            self.show_column(id)?;
            Ok(true)
        }
    }

    /// Shows every hidden column, keeping the cursor on the same column.
    /// Returns how many were shown.
    pub fn show_all_columns(&mut self) -> usize {
        let id = self.cursor_column_id();
        let shown = self.columns.show_all();
        if let Some(index) = self.columns.visible_index_of(id) {
            self.cursor.column = index;
        }
        self.ensure_cursor_visible();
        shown
    }

    /// Swaps the cursor column with its visible neighbour; the cursor moves
    /// with it. Returns false at the edge.
    pub fn move_column(&mut self, delta: isize) -> bool {
        match self.columns.move_visible(self.cursor.column, delta) {
            Some(index) => {
                self.cursor.column = index;
                self.ensure_cursor_visible();
                true
            }
            None => false,
        }
    }

    pub fn toggle_show_row_number(&mut self) {
        self.show_row_number = !self.show_row_number;
        self.ensure_cursor_visible();
    }

    pub fn toggle_show_header(&mut self) {
        self.show_header = !self.show_header;
        self.ensure_cursor_visible();
    }

    pub fn resize_viewport(&mut self, width: usize, height: usize) {
        self.size = Coordinates {
            x: width,
            y: height,
        };
        self.ensure_cursor_visible();
    }

    /// Follows a change of the table's row count.
    pub fn set_row_count(&mut self, row_count: usize) {
        self.row_count = row_count;
        self.cursor.row = self.cursor.row.min(self.max_row());
        self.ensure_cursor_visible();
    }

    /// Adjusts the formatter of the cursor column.
    pub fn adjust_format(&mut self, adjustment: Adjustment) -> Result<(), ViewError> {
        let id = self.cursor_column_id();
        self.columns.adjust(id, adjustment)?;
        self.ensure_cursor_visible();
        Ok(())
    }

    pub fn set_formatter(&mut self, id: ColumnId, format: Formatter) -> Result<(), ViewError> {
        self.columns.set_formatter(id, format)?;
        self.ensure_cursor_visible();
        Ok(())
    }

    /// Status bar text for the cursor cell.
    pub fn status(&self, table: &Table) -> Result<Status, TableError> {
        let column = table.get_column(self.cursor_column_id())?;
        let value = match column.value_at(self.cursor.row) {
            Some(value) => format!("{} [{}]", value, column.value_type()),
            None => format!("(no rows) [{}]", column.value_type()),
        };
        let hidden = match self.columns.hidden_count() {
            0 => String::new(),
            n => format!(" [{} cols hidden]", n),
        };
        Ok(Status {
            left: format!("{}{}", value, hidden),
            right: format!("{} {:6}", column.name(), self.cursor.row),
        })
    }
}
