//! Horizontal layout of the table grid.
//!
//! A [`Layout`] is computed eagerly from the view and row count. Items are
//! contiguous from x = 0: first the fixed row-number gutter, then the
//! scrollable borders, separators and columns.

use crate::error::LayoutError;
use crate::model::ColumnId;
use crate::text::char_len;
use crate::view::ViewState;

/// What a layout item draws.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemKind {
    /// Literal decoration text.
    Text(String),
    /// A data column; `index` counts visible columns.
    Column { index: usize, id: ColumnId },
    /// The row number gutter.
    RowNumber { digits: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutItem {
    /// Absolute start position, in characters.
    pub x: usize,
    pub width: usize,
    pub kind: ItemKind,
}

impl LayoutItem {
    pub fn end(&self) -> usize {
        self.x + self.width
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    /// Pinned to the left edge; not affected by horizontal scroll.
    pub fixed: Vec<LayoutItem>,
    pub scrollable: Vec<LayoutItem>,
}

impl Layout {
    pub fn fixed_width(&self) -> usize {
        self.fixed.iter().map(|i| i.width).sum()
    }

    pub fn scrollable_width(&self) -> usize {
        self.scrollable.iter().map(|i| i.width).sum()
    }

    pub fn total_width(&self) -> usize {
        self.fixed_width() + self.scrollable_width()
    }

    /// Fixed items, then scrollable items, left to right.
    pub fn items(&self) -> impl Iterator<Item = &LayoutItem> {
        self.fixed.iter().chain(self.scrollable.iter())
    }
}

/// A layout item shifted into screen space and clipped to the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibleItem<'a> {
    pub item: &'a LayoutItem,
    /// Screen column of the first visible character.
    pub x: usize,
    /// Characters cut off on the left.
    pub trim_start: usize,
    /// Characters cut off on the right.
    pub trim_end: usize,
}

impl VisibleItem<'_> {
    pub fn visible_width(&self) -> usize {
        self.item.width - self.trim_start - self.trim_end
    }
}

/// Decimal digits needed for row numbers below `row_count`, at least 1.
pub fn row_number_digits(row_count: usize) -> usize {
    let mut digits = 1;
    let mut n = row_count / 10;
    while n > 0 {
        digits += 1;
        n /= 10;
    }
    digits
}

/// Lays out the visible columns of `view` for a table of `row_count` rows.
pub fn compute_layout(view: &ViewState, row_count: usize) -> Layout {
    let mut layout = Layout::default();
    let mut x = 0;
    let pad = view.pad();
    let decorations = view.decorations();

    let mut push = |items: &mut Vec<LayoutItem>, width: usize, kind: ItemKind| {
        items.push(LayoutItem { x, width, kind });
        x += width;
    };

    if view.show_row_number() {
        let digits = row_number_digits(row_count);
        push(
            &mut layout.fixed,
            digits + 2 * pad,
            ItemKind::RowNumber { digits },
        );
        if !decorations.row_number_separator.is_empty() {
            let text = decorations.row_number_separator.clone();
            push(&mut layout.fixed, char_len(&text), ItemKind::Text(text));
        }
    }

    if !decorations.left_border.is_empty() {
        let text = decorations.left_border.clone();
        push(&mut layout.scrollable, char_len(&text), ItemKind::Text(text));
    }
    for (index, column) in view.columns().visible().enumerate() {
        if index > 0 && !decorations.separator.is_empty() {
            let text = decorations.separator.clone();
            push(&mut layout.scrollable, char_len(&text), ItemKind::Text(text));
        }
        push(
            &mut layout.scrollable,
            column.format.width() + 2 * pad,
            ItemKind::Column {
                index,
                id: column.id,
            },
        );
    }
    if !decorations.right_border.is_empty() {
        let text = decorations.right_border.clone();
        push(&mut layout.scrollable, char_len(&text), ItemKind::Text(text));
    }

    layout
}

/// Shifts scrollable items left by `scroll_x` and clips everything to
/// `viewport_width`. Scrollable items only show in the space right of the
/// fixed items. Partially visible items keep their full width and record
/// how much is trimmed.
pub fn clip_and_shift(layout: &Layout, scroll_x: usize, viewport_width: usize) -> Vec<VisibleItem<'_>> {
    let mut visible = Vec::new();

    for item in &layout.fixed {
        if item.x >= viewport_width {
            break;
        }
        visible.push(VisibleItem {
            item,
            x: item.x,
            trim_start: 0,
            trim_end: item.end().saturating_sub(viewport_width),
        });
    }

    let left = layout.fixed_width() as isize;
    let right = viewport_width as isize;
    if left >= right {
        return visible;
    }
    for item in &layout.scrollable {
        let x = item.x as isize - scroll_x as isize;
        let end = x + item.width as isize;
        if end <= left {
            continue;
        }
        if x >= right {
            break;
        }
        visible.push(VisibleItem {
            item,
            x: x.max(left) as usize,
            trim_start: (left - x).max(0) as usize,
            trim_end: (end - right).max(0) as usize,
        });
    }

    visible
}

/// The column item containing content position `x`, as `(visible index,
/// id)`. Decorations and the gutter yield `None`.
pub fn locate_column_at(layout: &Layout, x: usize) -> Option<(usize, ColumnId)> {
    let item = layout.items().find(|i| i.x <= x && x < i.end())?;
    match item.kind {
        ItemKind::Column { index, id } => Some((index, id)),
        _ => None,
    }
}

/// `(x, width)` of the visible column at `index`.
pub fn column_extent(layout: &Layout, index: usize) -> Result<(usize, usize), LayoutError> {
    layout
        .scrollable
        .iter()
        .find(|i| matches!(i.kind, ItemKind::Column { index: idx, .. } if idx == index))
        .map(|i| (i.x, i.width))
        .ok_or(LayoutError::NotFound(index))
}
