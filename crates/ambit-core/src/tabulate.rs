//! Flattens effect records into one rectangular table.
//!
//! Column order is deterministic: base columns first (field declaration
//! order), then result columns, then condition-derived columns in first-seen
//! order. The column set is the union over all records; rows missing a
//! column hold missing markers, never zeros.

use ambit_model::{Cell, EffectRecord, Table, TableBuilder};

use crate::expand::expand_condition;

const BASE_FIELDS: [&str; 6] = [
    "endpoint",
    "endpointtype",
    "idresult",
    "endpointGroup",
    "endpointSynonyms",
    "sampleID",
];

const RESULT_FIELDS: [&str; 8] = [
    "loQualifier",
    "loValue",
    "upQualifier",
    "upValue",
    "textValue",
    "errQualifier",
    "errValue",
    "unit",
];

/// The tabulated effects of one protocol application, with the three column
/// groups the downstream components consume.
#[derive(Debug, Clone)]
pub struct EffectsTable {
    pub table: Table,
    pub base_columns: Vec<String>,
    pub result_columns: Vec<String>,
    /// Raw condition names in first-seen order; the relevant-condition list
    /// the dataset builder walks.
    pub condition_columns: Vec<String>,
}

/// Tabulates records carrying their provenance (position in the effects
/// list of the owning protocol application).
pub fn tabulate_effects(records: &[(usize, &EffectRecord)]) -> EffectsTable {
    // first pass: which columns exist, and in what order
    let mut base_present = [false; BASE_FIELDS.len()];
    let mut result_present = [false; RESULT_FIELDS.len()];
    let mut condition_columns: Vec<String> = Vec::new();
    let mut expanded_columns: Vec<String> = Vec::new();

    for (_, record) in records {
        flag_base_fields(record, &mut base_present);
        flag_result_fields(record, &mut result_present);
        for (name, value) in &record.conditions {
            let cells = expand_condition(name, value.as_ref());
            if cells.is_empty() {
                continue;
            }
            if !condition_columns.iter().any(|known| known == name) {
                condition_columns.push(name.clone());
            }
            for (column, _) in cells {
                if !expanded_columns.contains(&column) {
                    expanded_columns.push(column);
                }
            }
        }
    }

    let base_columns: Vec<String> = BASE_FIELDS
        .iter()
        .zip(base_present)
        .filter(|(_, present)| *present)
        .map(|(name, _)| name.to_string())
        .collect();
    let result_columns: Vec<String> = RESULT_FIELDS
        .iter()
        .zip(result_present)
        .filter(|(_, present)| *present)
        .map(|(name, _)| name.to_string())
        .collect();

    // second pass: fill rows under the fixed column order
    let mut builder = TableBuilder::new();
    for name in base_columns
        .iter()
        .chain(result_columns.iter())
        .chain(expanded_columns.iter())
    {
        builder.ensure_column(name.clone());
    }
    for (provenance, record) in records {
        builder.push_row(*provenance, record_cells(record));
    }

    EffectsTable {
        table: builder.finish(),
        base_columns,
        result_columns,
        condition_columns,
    }
}

/// Tabulates a plain record list, using list position as provenance.
pub fn tabulate_records(records: &[EffectRecord]) -> EffectsTable {
    let indexed: Vec<(usize, &EffectRecord)> = records.iter().enumerate().collect();
    tabulate_effects(&indexed)
}

fn flag_base_fields(record: &EffectRecord, present: &mut [bool; BASE_FIELDS.len()]) {
    present[0] = true;
    present[1] |= record.endpointtype.is_some();
    present[2] |= record.idresult.is_some();
    present[3] |= record.endpoint_group.is_some();
    present[4] |= !record.endpoint_synonyms.is_empty();
    present[5] |= record.sample_id.is_some();
}

fn flag_result_fields(record: &EffectRecord, present: &mut [bool; RESULT_FIELDS.len()]) {
    let result = &record.result;
    present[0] |= result.lo_qualifier.is_some();
    present[1] |= result.lo_value.is_some();
    present[2] |= result.up_qualifier.is_some();
    present[3] |= result.up_value.is_some();
    present[4] |= result.text_value.is_some();
    present[5] |= result.err_qualifier.is_some();
    present[6] |= result.err_value.is_some();
    present[7] |= result.unit.is_some();
}

fn record_cells(record: &EffectRecord) -> Vec<(String, Cell)> {
    let mut cells: Vec<(String, Cell)> = Vec::new();
    cells.push(("endpoint".to_string(), Cell::from(record.endpoint.as_str())));
    if let Some(endpointtype) = &record.endpointtype {
        cells.push(("endpointtype".to_string(), Cell::from(endpointtype.as_str())));
    }
    if let Some(idresult) = record.idresult {
        cells.push(("idresult".to_string(), Cell::Int(idresult)));
    }
    if let Some(group) = record.endpoint_group {
        cells.push(("endpointGroup".to_string(), Cell::Int(group)));
    }
    if let Some(synonyms) = record.synonyms_text() {
        cells.push(("endpointSynonyms".to_string(), Cell::Text(synonyms)));
    }
    if let Some(sample_id) = &record.sample_id {
        cells.push(("sampleID".to_string(), Cell::from(sample_id.as_str())));
    }

    let result = &record.result;
    push_opt_text(&mut cells, "loQualifier", result.lo_qualifier.as_deref());
    push_opt_number(&mut cells, "loValue", result.lo_value);
    push_opt_text(&mut cells, "upQualifier", result.up_qualifier.as_deref());
    push_opt_number(&mut cells, "upValue", result.up_value);
    push_opt_text(&mut cells, "textValue", result.text_value.as_deref());
    push_opt_text(&mut cells, "errQualifier", result.err_qualifier.as_deref());
    push_opt_number(&mut cells, "errValue", result.err_value);
    push_opt_text(&mut cells, "unit", result.unit.as_deref());

    for (name, value) in &record.conditions {
        cells.extend(expand_condition(name, value.as_ref()));
    }
    cells
}

fn push_opt_text(cells: &mut Vec<(String, Cell)>, column: &str, value: Option<&str>) {
    if let Some(value) = value {
        cells.push((column.to_string(), Cell::from(value)));
    }
}

fn push_opt_number(cells: &mut Vec<(String, Cell)>, column: &str, value: Option<f64>) {
    if let Some(value) = value {
        cells.push((column.to_string(), Cell::Number(value)));
    }
}
