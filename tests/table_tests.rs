//! Integration tests for the table model and undoable edits.

use tblview::controller::{Controller, UndoAction};
use tblview::error::TableError;
use tblview::model::{LastRowPolicy, Row, Table, Value, ValueType, Values};

fn create_test_table() -> Table {
    let mut table = Table::new();
    table
        .add_column(Values::Int(vec![10, 20, 30, 40]), "id", None)
        .unwrap();
    table
        .add_column(Values::Float(vec![0.5, f64::NAN, 2.5, -1.0]), "rate", None)
        .unwrap();
    table
        .add_column(Values::Bool(vec![true, false, false, true]), "flag", None)
        .unwrap();
    table
        .add_column(Values::strings(["a", "b", "a", "c"]), "tag", None)
        .unwrap();
    table
}

fn rows(table: &Table) -> Vec<String> {
    (0..table.row_count())
        .map(|row| {
            table
                .column_ids()
                .into_iter()
                .map(|id| table.value_at(id, row).unwrap().to_string())
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect()
}

#[test]
fn test_add_column_checks_length() {
    let mut table = create_test_table();
    let err = table
        .add_column(Values::Int(vec![1, 2]), "short", None)
        .unwrap_err();
    assert_eq!(err, TableError::LengthMismatch { expected: 4, actual: 2 });
    assert_eq!(table.num_columns(), 4);
}

#[test]
fn test_add_column_at_position() {
    let mut table = create_test_table();
    let id = table
        .add_column(Values::Int(vec![0; 4]), "first", Some(0))
        .unwrap();
    assert_eq!(table.column_ids()[0], id);
    assert_eq!(table.get_column(id).unwrap().value_type(), ValueType::Int);
}

#[test]
fn test_column_ids_are_unique() {
    let mut table = create_test_table();
    let mut ids = table.column_ids();
    ids.push(table.add_column(Values::Int(vec![0; 4]), "id", None).unwrap());
    let mut sorted = ids.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), ids.len());
}

#[test]
fn test_delete_every_row_then_undo_all() {
    let mut table = create_test_table().with_last_row_policy(LastRowPolicy::Allow);
    let before = rows(&table);
    let mut ctl = Controller::new();

    for row in [2, 0, 1, 0] {
        ctl.delete_row(&mut table, row).unwrap();
    }
    assert_eq!(table.row_count(), 0);

    let mut undone = 0;
    while ctl.undo(&mut table).unwrap().is_some() {
        undone += 1;
    }
    assert_eq!(undone, 4);
    assert_eq!(rows(&table), before);
    assert!(!ctl.can_undo());
}

#[test]
fn test_refuse_last_row() {
    let mut table = Table::new();
    table.add_column(Values::Int(vec![1]), "x", None).unwrap();
    let mut ctl = Controller::new();
    assert_eq!(ctl.delete_row(&mut table, 0), Err(TableError::LastRow));
    assert_eq!(table.row_count(), 1);
    assert!(!ctl.can_undo());

    table.set_last_row_policy(LastRowPolicy::Allow);
    ctl.delete_row(&mut table, 0).unwrap();
    assert_eq!(table.row_count(), 0);
}

#[test]
fn test_insert_row_type_checked() {
    let mut table = create_test_table();
    let bad: Row = vec![
        Value::Str("x".into()),
        Value::Float(1.0),
        Value::Bool(true),
        Value::Str("t".into()),
    ];
    assert!(matches!(
        table.insert_row(0, bad),
        Err(TableError::TypeMismatch { .. })
    ));
    assert_eq!(table.row_count(), 4);
}

#[test]
fn test_rename_undo_reports_action() {
    let mut table = create_test_table();
    let id = table.column_ids()[3];
    let mut ctl = Controller::new();
    assert_eq!(ctl.rename_column(&mut table, id, "label").unwrap(), "tag");
    assert_eq!(table.get_column(id).unwrap().name(), "label");

    let action = ctl.undo(&mut table).unwrap();
    assert_eq!(
        action,
        Some(UndoAction::RenameColumn {
            id,
            name: "tag".to_string()
        })
    );
    assert_eq!(table.get_column(id).unwrap().name(), "tag");
}

#[test]
fn test_out_of_range() {
    let mut table = create_test_table();
    assert_eq!(
        table.delete_row(4),
        Err(TableError::IndexOutOfRange { index: 4, len: 4 })
    );
    let id = table.column_ids()[0];
    assert!(table.value_at(id, 4).is_err());
}
