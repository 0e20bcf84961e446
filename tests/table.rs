use csv_folder::{
    Column, ColumnMapping, ColumnType, LoadError, Table, Value, rename_columns, select_columns,
    table::render_table,
};

fn sample() -> Table {
    Table::from_columns(vec![
        Column::new(
            "ID",
            ColumnType::Integer,
            vec![Value::Integer(1), Value::Integer(2)],
        ),
        Column::new("Name", ColumnType::String, vec!["a".into(), "b".into()]),
        Column::new(
            "Val",
            ColumnType::Float,
            vec![Value::Float(1.5), Value::Null],
        ),
    ])
    .unwrap()
}

fn mapping(pairs: &[(&str, &str)]) -> ColumnMapping {
    ColumnMapping::from_pairs(pairs.iter().copied()).unwrap()
}

#[test]
fn from_columns_rejects_ragged_and_duplicate_columns() {
    let ragged = Table::from_columns(vec![
        Column::new("a", ColumnType::Integer, vec![Value::Integer(1)]),
        Column::new("b", ColumnType::Integer, vec![]),
    ]);
    assert!(matches!(
        ragged,
        Err(LoadError::RaggedColumn { ref column, expected: 1, found: 0 }) if column == "b"
    ));

    let duplicate = Table::from_columns(vec![
        Column::new("a", ColumnType::String, vec![]),
        Column::new("a", ColumnType::String, vec![]),
    ]);
    assert!(matches!(duplicate, Err(LoadError::DuplicateColumn { .. })));
}

#[test]
fn from_columns_rejects_values_that_disagree_with_dtype() {
    let err = Table::from_columns(vec![Column::new(
        "n",
        ColumnType::Integer,
        vec![Value::Integer(1), Value::from("two")],
    )])
    .unwrap_err();
    match err {
        LoadError::ColumnTypeMismatch {
            column,
            expected,
            value,
        } => {
            assert_eq!(column, "n");
            assert_eq!(expected, ColumnType::Integer);
            assert_eq!(value, Value::from("two"));
        }
        other => panic!("expected ColumnTypeMismatch, got {other:?}"),
    }

    let nulls_fit = Table::from_columns(vec![Column::new(
        "n",
        ColumnType::Float,
        vec![Value::Null, Value::Float(0.5)],
    )]);
    assert!(nulls_fit.is_ok());
}

#[test]
fn select_columns_follows_mapping_key_order() {
    let table = sample();
    let selected = select_columns(&table, &mapping(&[("Val", "value"), ("ID", "id")])).unwrap();
    assert_eq!(selected.headers(), vec!["Val", "ID"]);
    assert_eq!(selected.row_count(), 2);
    assert_eq!(table.headers(), vec!["ID", "Name", "Val"]);
}

#[test]
fn select_columns_reports_every_missing_key() {
    let err = sample()
        .select_columns(&mapping(&[("ID", "id"), ("Nope", "x"), ("Gone", "y")]))
        .unwrap_err();
    match err {
        LoadError::MissingColumn { columns } => assert_eq!(columns, vec!["Nope", "Gone"]),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn rename_columns_returns_new_table_and_leaves_input_alone() {
    let table = sample();
    let renamed = rename_columns(&table, &mapping(&[("ID", "id")])).unwrap();
    assert_eq!(renamed.headers(), vec!["id", "Name", "Val"]);
    assert_eq!(table.headers(), vec!["ID", "Name", "Val"]);
    assert_eq!(renamed.column("id").unwrap().values(), table.column("ID").unwrap().values());
}

#[test]
fn rename_columns_rejects_colliding_targets() {
    let err = sample()
        .rename_columns(&mapping(&[("ID", "Name")]))
        .unwrap_err();
    assert!(matches!(err, LoadError::DuplicateColumn { ref column } if column == "Name"));
}

#[test]
fn concat_keeps_source_index_until_reset() {
    let combined = Table::concat([sample(), sample()]).unwrap();
    assert_eq!(combined.index(), &[0, 1, 0, 1]);
    let reset = combined.reset_index();
    assert_eq!(reset.index(), &[0, 1, 2, 3]);
    assert_eq!(reset.row_count(), 4);
}

#[test]
fn concat_ignores_all_null_columns_when_choosing_type() {
    let blanks = Table::from_columns(vec![Column::new(
        "score",
        ColumnType::String,
        vec![Value::Null, Value::Null],
    )])
    .unwrap();
    let numbers = Table::from_columns(vec![Column::new(
        "score",
        ColumnType::Float,
        vec![Value::Float(2.5)],
    )])
    .unwrap();

    let combined = Table::concat([blanks, numbers]).unwrap();
    let score = combined.column("score").unwrap();
    assert_eq!(score.dtype(), ColumnType::Float);
    assert_eq!(score.values(), &[Value::Null, Value::Null, Value::Float(2.5)]);
}

#[test]
fn concat_of_nothing_is_none() {
    assert!(Table::concat(Vec::new()).is_none());
}

#[test]
fn concat_unions_columns_and_widens_types() {
    let first = Table::from_columns(vec![
        Column::new("id", ColumnType::Integer, vec![Value::Integer(1)]),
        Column::new("score", ColumnType::Integer, vec![Value::Integer(7)]),
    ])
    .unwrap();
    let second = Table::from_columns(vec![
        Column::new("score", ColumnType::Float, vec![Value::Float(2.5)]),
        Column::new("note", ColumnType::String, vec!["hi".into()]),
    ])
    .unwrap();

    let combined = Table::concat([first, second]).unwrap();
    assert_eq!(combined.headers(), vec!["id", "score", "note"]);

    let id = combined.column("id").unwrap();
    assert_eq!(id.dtype(), ColumnType::Integer);
    assert_eq!(id.values(), &[Value::Integer(1), Value::Null]);

    let score = combined.column("score").unwrap();
    assert_eq!(score.dtype(), ColumnType::Float);
    assert_eq!(score.values(), &[Value::Float(7.0), Value::Float(2.5)]);

    let note = combined.column("note").unwrap();
    assert_eq!(note.values(), &[Value::Null, Value::from("hi")]);
}

#[test]
fn render_includes_index_and_aligns_columns() {
    let table = sample().select_columns(&mapping(&[("ID", "id"), ("Name", "name")])).unwrap();
    let rendered = table.to_string();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines, vec!["   ID  Name", "-  --  ----", "0  1   a", "1  2   b"]);
}

#[test]
fn render_table_normalizes_control_characters() {
    let headers = vec!["note".to_string()];
    let rows = vec![vec!["line1\nline2\tvalue".to_string()]];

    let rendered = render_table(&headers, &rows);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "line1 line2 value");
}
