//! Tests for the flat table and its builder.

use ambit_model::{Cell, Table, TableBuilder};

fn sample_table() -> Table {
    let mut builder = TableBuilder::new();
    builder.push_row(
        0,
        vec![
            ("endpoint".to_string(), Cell::from("LC50")),
            ("loValue".to_string(), Cell::from(10.0)),
        ],
    );
    builder.push_row(
        1,
        vec![
            ("endpoint".to_string(), Cell::from("LC50")),
            ("loValue".to_string(), Cell::from(1.0)),
            ("unit".to_string(), Cell::from("mg/L")),
        ],
    );
    builder.push_row(
        2,
        vec![
            ("endpoint".to_string(), Cell::from("LC50")),
            ("loValue".to_string(), Cell::from(5.0)),
        ],
    );
    builder.finish()
}

#[test]
fn builder_backfills_late_columns() {
    let table = sample_table();
    assert_eq!(table.height(), 3);
    assert_eq!(table.column_names(), vec!["endpoint", "loValue", "unit"]);
    // the unit column appeared at row 1; rows 0 and 2 hold missing markers
    assert!(table.cell("unit", 0).unwrap().is_missing());
    assert_eq!(table.cell("unit", 1).unwrap().as_text(), Some("mg/L"));
    assert!(table.cell("unit", 2).unwrap().is_missing());
}

#[test]
fn ensure_column_fixes_order() {
    let mut builder = TableBuilder::new();
    builder.ensure_column("endpoint");
    builder.ensure_column("loValue");
    builder.push_row(0, vec![("loValue".to_string(), Cell::from(2.0))]);
    let table = builder.finish();
    assert_eq!(table.column_names(), vec!["endpoint", "loValue"]);
    assert!(table.cell("endpoint", 0).unwrap().is_missing());
}

#[test]
fn take_rows_reindexes_and_keeps_provenance() {
    let table = sample_table();
    let subset = table.take_rows(&[2, 0]);
    assert_eq!(subset.height(), 2);
    assert_eq!(subset.provenance(), &[2, 0]);
    assert_eq!(subset.cell("loValue", 0).unwrap().as_f64(), Some(5.0));
    assert_eq!(subset.cell("loValue", 1).unwrap().as_f64(), Some(10.0));
}

#[test]
fn drop_empty_columns_removes_all_missing() {
    let mut builder = TableBuilder::new();
    builder.ensure_column("empty");
    builder.push_row(0, vec![("endpoint".to_string(), Cell::from("X"))]);
    let mut table = builder.finish();
    assert!(table.has_column("empty"));
    table.drop_empty_columns();
    assert!(!table.has_column("empty"));
    assert!(table.has_column("endpoint"));
}

#[test]
fn sort_permutation_puts_missing_last() {
    let mut builder = TableBuilder::new();
    builder.push_row(0, vec![("conc".to_string(), Cell::from(10.0))]);
    builder.push_row(1, vec![("conc".to_string(), Cell::Missing)]);
    builder.push_row(2, vec![("conc".to_string(), Cell::from(1.0))]);
    builder.push_row(3, vec![("conc".to_string(), Cell::from(5.0))]);
    let table = builder.finish();
    assert_eq!(table.sort_permutation("conc"), vec![2, 3, 0, 1]);
    // absent column sorts nothing
    assert_eq!(table.sort_permutation("nope"), vec![0, 1, 2, 3]);
}
