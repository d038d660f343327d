//! Rendering the table view.
//!
//! [`project`] turns the clipped layout into positioned text runs with a
//! highlight class each; [`paint`] and friends draw them with ratatui.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Paragraph, Widget},
    Frame,
};

use crate::layout::{self, ItemKind, VisibleItem};
use crate::model::Table;
use crate::state::StatusLine;
use crate::text::{self, char_len, slice_chars};
use crate::view::{Status, ViewState};

/// Header names elide at this fraction of their width.
const HEADER_ELIDE_POS: f64 = 0.7;

/// Visual class of a run of text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Highlight {
    Normal,
    CursorCell,
    CursorColumn,
    CursorRow,
    HeaderUnderline,
    ErrorText,
}

/// A run of text at a screen position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderCell {
    pub x: usize,
    pub y: usize,
    pub text: String,
    pub highlight: Highlight,
}

fn trimmed(visible: &VisibleItem<'_>, full: &str) -> String {
    slice_chars(full, visible.trim_start, visible.item.width - visible.trim_end)
}

/// Projects the visible part of `table` under `view` into text runs.
pub fn project(view: &ViewState, table: &Table) -> Vec<RenderCell> {
    let layout = view.layout();
    let visible = layout::clip_and_shift(&layout, view.scroll().x, view.size().x);
    let cursor = view.cursor();
    let pad = " ".repeat(view.pad());

    let first_row = view.scroll().y;
    let last_row = (first_row + view.visible_rows()).min(table.row_count());
    let mut cells = Vec::new();

    if view.show_header() {
        for item in &visible {
            let (full, highlight) = match &item.item.kind {
                ItemKind::Column { id, .. } => {
                    let name = table.get_column(*id).map(|c| c.name()).unwrap_or_default();
                    let full = text::palide(
                        name,
                        item.item.width,
                        &text::ELLIPSIS.to_string(),
                        ' ',
                        1.0,
                        HEADER_ELIDE_POS,
                    )
                    .unwrap_or_else(|_| " ".repeat(item.item.width));
                    (full, Highlight::HeaderUnderline)
                }
                ItemKind::Text(text) => (text.clone(), Highlight::Normal),
                ItemKind::RowNumber { .. } => (" ".repeat(item.item.width), Highlight::Normal),
            };
            cells.push(RenderCell {
                x: item.x,
                y: 0,
                text: trimmed(item, &full),
                highlight,
            });
        }
    }

    for (line, row) in (first_row..last_row).enumerate() {
        let y = line + view.header_rows();
        let on_cursor_row = row == cursor.row;
        for item in &visible {
            let (full, highlight) = match &item.item.kind {
                ItemKind::Column { index, id } => {
                    let formatted = match (view.columns().formatter(*id), table.value_at(*id, row)) {
                        (Some(fmt), Ok(value)) => fmt.format(&value),
                        _ => " ".repeat(item.item.width.saturating_sub(2 * pad.len())),
                    };
                    let highlight = match (*index == cursor.column, on_cursor_row) {
                        (true, true) => Highlight::CursorCell,
                        (true, false) => Highlight::CursorColumn,
                        (false, true) => Highlight::CursorRow,
                        (false, false) => Highlight::Normal,
                    };
                    (format!("{}{}{}", pad, formatted, pad), highlight)
                }
                ItemKind::Text(text) => (
                    text.clone(),
                    if on_cursor_row {
                        Highlight::CursorRow
                    } else {
                        Highlight::Normal
                    },
                ),
                ItemKind::RowNumber { digits } => {
                    let number = format!("{:>width$}", row, width = digits);
                    (format!("{}{}{}", pad, number, pad), Highlight::Normal)
                }
            };
            cells.push(RenderCell {
                x: item.x,
                y,
                text: trimmed(item, &full),
                highlight,
            });
        }
    }

    cells
}

/// Terminal style for a highlight class.
pub fn style_for(highlight: Highlight) -> Style {
    match highlight {
        Highlight::Normal => Style::default(),
        Highlight::CursorCell => Style::default().fg(Color::White).bg(Color::Blue),
        Highlight::CursorColumn | Highlight::CursorRow => {
            Style::default().fg(Color::Black).bg(Color::White)
        }
        Highlight::HeaderUnderline => Style::default().add_modifier(Modifier::UNDERLINED),
        Highlight::ErrorText => Style::default().fg(Color::Red),
    }
}

/// Draws projected cells into `area` of `buf`.
pub fn paint_cells(buf: &mut Buffer, area: Rect, cells: &[RenderCell]) {
    for cell in cells {
        let (x, y) = (cell.x as u16, cell.y as u16);
        if x >= area.width || y >= area.height {
            continue;
        }
        let width = (area.width - x) as usize;
        buf.set_stringn(
            area.x + x,
            area.y + y,
            &cell.text,
            width,
            style_for(cell.highlight),
        );
    }
}

/// The status bar: left text, then right text flush right. The left side
/// is cut when both do not fit.
pub fn status_bar_text(status: &Status, width: usize) -> String {
    let left_len = char_len(&status.left);
    let right_len = char_len(&status.right);
    if left_len + right_len <= width {
        format!(
            "{}{}{}",
            status.left,
            " ".repeat(width - left_len - right_len),
            status.right
        )
    } else {
        let keep = width.saturating_sub(right_len);
        let line = format!("{}{}", text::take_chars(&status.left, keep), status.right);
        text::take_chars(&line, width).to_string()
    }
}

/// Screen areas: the table, the status bar, and the message line.
pub fn split_screen(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(area);
    (chunks[0], chunks[1], chunks[2])
}

/// Draws the whole screen. `prompt`, when set, replaces the message line.
pub fn paint(
    frame: &mut Frame,
    cells: &[RenderCell],
    status: &Status,
    line: &StatusLine,
    prompt: Option<&str>,
) {
    let (table_area, status_area, message_area) = split_screen(frame.area());
    paint_cells(frame.buffer_mut(), table_area, cells);

    let bar = status_bar_text(status, status_area.width as usize);
    Paragraph::new(bar)
        .style(Style::default().add_modifier(Modifier::REVERSED))
        .render(status_area, frame.buffer_mut());

    let (message, highlight) = match (prompt, line.error(), line.output()) {
        (Some(prompt), _, _) => (prompt, Highlight::Normal),
        (None, Some(error), _) => (error, Highlight::ErrorText),
        (None, None, Some(output)) => (output, Highlight::Normal),
        (None, None, None) => ("", Highlight::Normal),
    };
    Paragraph::new(message)
        .style(style_for(highlight))
        .render(message_area, frame.buffer_mut());
    if let Some(prompt) = prompt {
        let x = message_area.x + (char_len(prompt) as u16).min(message_area.width.saturating_sub(1));
        frame.set_cursor_position((x, message_area.y));
    }
}
