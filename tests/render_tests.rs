//! Integration tests for the render projection and the painted screen.

use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::style::{Color, Modifier};
use ratatui::Terminal;
use tblview::model::{Table, Values};
use tblview::render::{self, Highlight, RenderCell};
use tblview::state::StatusLine;
use tblview::view::{Decorations, ViewState};

fn create_test_table(num_rows: usize) -> Table {
    let mut table = Table::new();
    table
        .add_column(Values::Int((0..num_rows as i64).collect()), "index", None)
        .unwrap();
    table
        .add_column(
            Values::strings((0..num_rows).map(|r| format!("name number {}", r))),
            "a_rather_long_column_name",
            None,
        )
        .unwrap();
    table
}

fn ascii() -> Decorations {
    Decorations {
        left_border: "|".to_string(),
        separator: "|".to_string(),
        right_border: "|".to_string(),
        row_number_separator: String::new(),
    }
}

fn line(cells: &[RenderCell], y: usize) -> String {
    let mut row: Vec<&RenderCell> = cells.iter().filter(|c| c.y == y).collect();
    row.sort_by_key(|c| c.x);
    row.iter().map(|c| c.text.as_str()).collect()
}

fn screen_row(buffer: &Buffer, y: u16) -> String {
    (0..buffer.area.width)
        .map(|x| buffer.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "))
        .collect()
}

#[test]
fn test_header_name_is_elided() {
    let table = create_test_table(3);
    let view = ViewState::new(&table)
        .with_decorations(ascii())
        .with_show_row_number(false);
    let cells = render::project(&view, &table);
    // Names are cut to the column width, elided at 70%.
    assert_eq!(line(&cells, 0), "|i\u{2026}x|a_rather_l\u{2026}name|");
    assert_eq!(line(&cells, 1), "| 0 | name number 0 |");
}

#[test]
fn test_rows_stop_at_table_end() {
    let table = create_test_table(3);
    let view = ViewState::new(&table).with_size(80, 20);
    let cells = render::project(&view, &table);
    assert!(cells.iter().all(|c| c.y <= 3));
}

#[test]
fn test_cells_stay_inside_viewport() {
    let table = create_test_table(30);
    let mut view = ViewState::new(&table).with_size(20, 10);
    view.move_cursor_to(Some(1), Some(25));
    let cells = render::project(&view, &table);
    for cell in &cells {
        assert!(cell.x + cell.text.chars().count() <= 20, "{:?}", cell);
        assert!(cell.y < 10);
    }
    assert!(cells.iter().any(|c| c.highlight == Highlight::CursorCell));
}

#[test]
fn test_paint_screen() {
    let table = create_test_table(4);
    let mut view = ViewState::new(&table)
        .with_decorations(ascii())
        .with_show_row_number(false);
    view.resize_viewport(30, 4);
    view.move_cursor_to(Some(0), Some(1));
    let cells = render::project(&view, &table);
    let status = view.status(&table).unwrap();
    let mut message = StatusLine::default();
    message.set_error("error: nothing to undo");

    let mut terminal = Terminal::new(TestBackend::new(30, 6)).unwrap();
    terminal
        .draw(|frame| render::paint(frame, &cells, &status, &message, None))
        .unwrap();
    let buffer = terminal.backend().buffer();

    assert_eq!(screen_row(buffer, 2), "| 1 | name number 1 |         ");
    let cursor = buffer.cell((1, 2)).unwrap();
    assert_eq!((cursor.fg, cursor.bg), (Color::White, Color::Blue));
    assert!(buffer.cell((1, 0)).unwrap().modifier.contains(Modifier::UNDERLINED));

    assert_eq!(screen_row(buffer, 4), "1 [int64]         index      1");
    assert!(buffer.cell((0, 4)).unwrap().modifier.contains(Modifier::REVERSED));
    assert_eq!(screen_row(buffer, 5), "error: nothing to undo        ");
    assert_eq!(buffer.cell((0, 5)).unwrap().fg, Color::Red);
}
