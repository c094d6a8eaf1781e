//! Tests for record tabulation and condition expansion.

use std::collections::BTreeSet;

use ambit_core::tabulate_records;
use ambit_model::{Cell, ConditionValue, EffectRecord, EffectResult, Value};
use proptest::prelude::*;

fn lc50(lo_value: f64) -> EffectRecord {
    EffectRecord::new("LC50").with_result(EffectResult::measured(lo_value, "mg/L"))
}

#[test]
fn columns_follow_base_result_condition_order() {
    let records = vec![
        lc50(10.0)
            .with_endpointtype("TOX")
            .with_condition("CONCENTRATION", Value::new(5.0, "mg/L")),
        lc50(20.0).with_condition("E.EXPOSURE_TIME", Value::new(24.0, "h")),
    ];
    let effects = tabulate_records(&records);
    assert_eq!(
        effects.table.column_names(),
        vec![
            "endpoint",
            "endpointtype",
            "loValue",
            "unit",
            "CONCENTRATION_loValue",
            "CONCENTRATION_unit",
            "E.EXPOSURE_TIME_loValue",
            "E.EXPOSURE_TIME_unit",
        ]
    );
    assert_eq!(effects.base_columns, vec!["endpoint", "endpointtype"]);
    assert_eq!(effects.result_columns, vec!["loValue", "unit"]);
    assert_eq!(
        effects.condition_columns,
        vec!["CONCENTRATION", "E.EXPOSURE_TIME"]
    );
}

#[test]
fn expanded_measure_round_trips_value_and_unit() {
    let records = vec![lc50(1.0).with_condition("CONCENTRATION", Value::new(5.0, "mg/L"))];
    let effects = tabulate_records(&records);
    assert_eq!(
        effects.table.cell("CONCENTRATION_loValue", 0).unwrap().as_f64(),
        Some(5.0)
    );
    assert_eq!(
        effects.table.cell("CONCENTRATION_unit", 0).unwrap().as_text(),
        Some("mg/L")
    );
}

#[test]
fn absent_conditions_hold_missing_markers_not_zero() {
    let records = vec![
        lc50(1.0).with_condition("CONCENTRATION", Value::new(5.0, "mg/L")),
        lc50(2.0),
    ];
    let effects = tabulate_records(&records);
    let cell = effects.table.cell("CONCENTRATION_loValue", 1).unwrap();
    assert!(cell.is_missing());
    assert_ne!(*cell, Cell::Number(0.0));
}

#[test]
fn label_conditions_keep_the_raw_column() {
    let records = vec![lc50(1.0).with_condition("CONCENTRATION", "negative control")];
    let effects = tabulate_records(&records);
    assert!(effects.table.has_column("CONCENTRATION"));
    assert!(!effects.table.has_column("CONCENTRATION_loValue"));
}

#[test]
fn provenance_tracks_record_positions() {
    let records = vec![lc50(1.0), lc50(2.0), lc50(3.0)];
    let effects = tabulate_records(&records);
    assert_eq!(effects.table.provenance(), &[0, 1, 2]);
}

fn arb_condition() -> impl Strategy<Value = (String, Option<ConditionValue>)> {
    let name = prop_oneof![
        Just("CONCENTRATION".to_string()),
        Just("E.EXPOSURE_TIME".to_string()),
        Just("REPLICATE".to_string()),
    ];
    let value = prop_oneof![
        Just(None),
        Just(Some(ConditionValue::Label("negative control".to_string()))),
        (0.5f64..500.0).prop_map(|number| Some(ConditionValue::Measure(Value::new(number, "mg/L")))),
    ];
    (name, value)
}

fn arb_record() -> impl Strategy<Value = EffectRecord> {
    (
        prop_oneof![Just("LC50"), Just("EC10"), Just("TOTAL_PROTEIN")],
        proptest::option::of(0.5f64..1000.0),
        proptest::collection::vec(arb_condition(), 0..3),
    )
        .prop_map(|(endpoint, lo_value, conditions)| {
            let mut record = EffectRecord::new(endpoint);
            if let Some(lo_value) = lo_value {
                record.result.lo_value = Some(lo_value);
                record.result.unit = Some("mg/L".to_string());
            }
            for (name, value) in conditions {
                record = match value {
                    Some(value) => record.with_condition(name, value),
                    None => record.with_absent_condition(name),
                };
            }
            record
        })
}

proptest! {
    // Reordering the input must not change the column set, and every record
    // must keep exactly its own row content.
    #[test]
    fn tabulation_is_column_stable(
        records in proptest::collection::vec(arb_record(), 1..8),
        shift in 0usize..8,
    ) {
        let original = tabulate_records(&records);

        let mut rotated_records = records.clone();
        rotated_records.rotate_left(shift % records.len());
        let rotated = tabulate_records(&rotated_records);

        let original_columns: BTreeSet<&str> =
            original.table.column_names().into_iter().collect();
        let rotated_columns: BTreeSet<&str> =
            rotated.table.column_names().into_iter().collect();
        prop_assert_eq!(&original_columns, &rotated_columns);

        let len = records.len();
        let offset = shift % len;
        for row in 0..len {
            // record at original row `row` sits at rotated row `row - offset`
            let rotated_row = (row + len - offset) % len;
            for column in &original_columns {
                prop_assert_eq!(
                    original.table.cell(column, row).unwrap(),
                    rotated.table.cell(column, rotated_row).unwrap(),
                    "column {} for record {}",
                    column,
                    row
                );
            }
        }
    }
}
