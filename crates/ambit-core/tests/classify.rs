//! Tests for sample/control population classification.

use ambit_core::{classify_populations, tabulate_records};
use ambit_model::{EffectRecord, EffectResult, Value};

fn dose_response(lo_value: f64, concentration: f64) -> EffectRecord {
    EffectRecord::new("CELL_VIABILITY")
        .with_result(EffectResult::measured(lo_value, "%"))
        .with_condition("CONCENTRATION", Value::new(concentration, "ug/mL"))
}

fn control(lo_value: f64, tag: &str) -> EffectRecord {
    EffectRecord::new("CELL_VIABILITY")
        .with_result(EffectResult::measured(lo_value, "%"))
        .with_condition("CONCENTRATION", tag)
}

#[test]
fn classification_is_total() {
    let records = vec![
        dose_response(95.0, 1.0),
        control(99.0, "negative control"),
        dose_response(60.0, 10.0),
        control(40.0, "positive control"),
    ];
    let effects = tabulate_records(&records);
    let populations = classify_populations(&effects.table, "CONCENTRATION");
    let controls = populations.controls.expect("two control rows");
    assert_eq!(populations.samples.height() + controls.height(), 4);
    assert_eq!(populations.samples.height(), 2);
    // provenance partitions the original rows
    assert_eq!(populations.samples.provenance(), &[0, 2]);
    assert_eq!(controls.provenance(), &[1, 3]);
}

#[test]
fn control_tables_keep_their_label_column() {
    let records = vec![dose_response(95.0, 1.0), control(99.0, "negative control")];
    let effects = tabulate_records(&records);
    let populations = classify_populations(&effects.table, "CONCENTRATION");
    let controls = populations.controls.expect("one control row");
    assert_eq!(
        controls.cell("CONCENTRATION", 0).unwrap().as_text(),
        Some("negative control")
    );
    // each population sheds the columns the other population filled
    assert!(!controls.has_column("CONCENTRATION_loValue"));
    assert!(!populations.samples.has_column("CONCENTRATION"));
    assert!(populations.samples.has_column("CONCENTRATION_loValue"));
}

#[test]
fn absent_distinguished_column_yields_samples_only() {
    let records = vec![
        EffectRecord::new("LC50").with_result(EffectResult::measured(3.0, "mg/L")),
        EffectRecord::new("LC50").with_result(EffectResult::measured(4.0, "mg/L")),
    ];
    let effects = tabulate_records(&records);
    let populations = classify_populations(&effects.table, "CONCENTRATION");
    assert_eq!(populations.samples.height(), 2);
    assert!(populations.controls.is_none());
}

#[test]
fn all_control_rows_leave_an_empty_sample_table() {
    let records = vec![control(99.0, "negative control"), control(98.0, "blank")];
    let effects = tabulate_records(&records);
    let populations = classify_populations(&effects.table, "CONCENTRATION");
    assert_eq!(populations.samples.height(), 0);
    assert_eq!(populations.controls.expect("controls").height(), 2);
}
