//! Flat CSV reader re-forming effect records.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::{Reader, ReaderBuilder, StringRecord};

use ambit_core::convention::{LO_VALUE_SUFFIX, UNIT_SUFFIX, lo_value_column, unit_column};
use ambit_model::{ConditionValue, EffectRecord, Value};

/// Read effect records from a flat CSV file.
///
/// The fixed result columns are consumed by name; every other column is a
/// condition. A `<name>_loValue`/`<name>_unit` pair re-forms a structured
/// value condition, a bare column a string label.
pub fn read_effects(path: &Path) -> Result<Vec<EffectRecord>> {
    let reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read csv: {}", path.display()))?;
    read_records(reader).with_context(|| format!("read csv: {}", path.display()))
}

/// Read effect records from any CSV reader.
pub fn read_effects_from<R: Read>(reader: R) -> Result<Vec<EffectRecord>> {
    read_records(ReaderBuilder::new().flexible(true).from_reader(reader))
}

/// How one CSV column feeds the records it is read into.
#[derive(Debug, Clone, PartialEq)]
enum ColumnPlan {
    /// Unit column consumed by its value partner.
    Consumed,
    Endpoint,
    EndpointType,
    IdResult,
    EndpointGroup,
    EndpointSynonyms,
    SampleId,
    LoQualifier,
    LoValue,
    UpQualifier,
    UpValue,
    TextValue,
    ErrQualifier,
    ErrValue,
    Unit,
    Measure {
        name: String,
        unit_index: Option<usize>,
    },
    Label {
        name: String,
    },
}

fn read_records<R: Read>(mut reader: Reader<R>) -> Result<Vec<EffectRecord>> {
    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    if !headers.iter().any(|header| header == "endpoint") {
        bail!("endpoint column is required");
    }
    let plans = column_plans(&headers);
    let mut records = Vec::new();
    for row in reader.records() {
        records.push(read_record(&plans, &row?));
    }
    Ok(records)
}

fn column_plans(headers: &[String]) -> Vec<ColumnPlan> {
    headers
        .iter()
        .map(|header| match header.as_str() {
            "endpoint" => ColumnPlan::Endpoint,
            "endpointtype" => ColumnPlan::EndpointType,
            "idresult" => ColumnPlan::IdResult,
            "endpointGroup" => ColumnPlan::EndpointGroup,
            "endpointSynonyms" => ColumnPlan::EndpointSynonyms,
            "sampleID" => ColumnPlan::SampleId,
            "loQualifier" => ColumnPlan::LoQualifier,
            "loValue" => ColumnPlan::LoValue,
            "upQualifier" => ColumnPlan::UpQualifier,
            "upValue" => ColumnPlan::UpValue,
            "textValue" => ColumnPlan::TextValue,
            "errQualifier" => ColumnPlan::ErrQualifier,
            "errValue" => ColumnPlan::ErrValue,
            "unit" => ColumnPlan::Unit,
            other => plan_condition(headers, other),
        })
        .collect()
}

fn plan_condition(headers: &[String], header: &str) -> ColumnPlan {
    if let Some(name) = header.strip_suffix(LO_VALUE_SUFFIX)
        && !name.is_empty()
    {
        let unit = unit_column(name);
        return ColumnPlan::Measure {
            name: name.to_string(),
            unit_index: headers.iter().position(|candidate| *candidate == unit),
        };
    }
    if let Some(name) = header.strip_suffix(UNIT_SUFFIX)
        && !name.is_empty()
        && headers.contains(&lo_value_column(name))
    {
        return ColumnPlan::Consumed;
    }
    ColumnPlan::Label {
        name: header.to_string(),
    }
}

fn read_record(plans: &[ColumnPlan], row: &StringRecord) -> EffectRecord {
    let endpoint = plans
        .iter()
        .position(|plan| *plan == ColumnPlan::Endpoint)
        .and_then(|index| row.get(index))
        .map(clean_cell)
        .unwrap_or_default();
    let mut record = EffectRecord::new(endpoint);
    for (index, plan) in plans.iter().enumerate() {
        let cell = row.get(index).map(clean_cell).unwrap_or_default();
        match plan {
            ColumnPlan::Consumed | ColumnPlan::Endpoint => {}
            ColumnPlan::EndpointType => {
                if !cell.is_empty() {
                    record = record.with_endpointtype(cell);
                }
            }
            ColumnPlan::IdResult => record.idresult = cell.parse().ok(),
            ColumnPlan::EndpointGroup => record.endpoint_group = cell.parse().ok(),
            ColumnPlan::EndpointSynonyms => record.endpoint_synonyms = split_synonyms(&cell),
            ColumnPlan::SampleId => record.sample_id = non_empty(cell),
            ColumnPlan::LoQualifier => record.result.lo_qualifier = non_empty(cell),
            ColumnPlan::LoValue => record.result.lo_value = parse_number(&cell),
            ColumnPlan::UpQualifier => record.result.up_qualifier = non_empty(cell),
            ColumnPlan::UpValue => record.result.up_value = parse_number(&cell),
            ColumnPlan::TextValue => record.result.text_value = non_empty(cell),
            ColumnPlan::ErrQualifier => record.result.err_qualifier = non_empty(cell),
            ColumnPlan::ErrValue => record.result.err_value = parse_number(&cell),
            ColumnPlan::Unit => record.result.unit = non_empty(cell),
            ColumnPlan::Measure { name, unit_index } => {
                let unit = unit_index
                    .and_then(|at| row.get(at))
                    .map(clean_cell)
                    .and_then(non_empty);
                record
                    .conditions
                    .insert(name.clone(), measure_condition(parse_number(&cell), unit));
            }
            ColumnPlan::Label { name } => {
                record
                    .conditions
                    .insert(name.clone(), non_empty(cell).map(ConditionValue::Label));
            }
        }
    }
    record
}

fn measure_condition(lo_value: Option<f64>, unit: Option<String>) -> Option<ConditionValue> {
    if lo_value.is_none() && unit.is_none() {
        return None;
    }
    Some(ConditionValue::Measure(Value {
        lo_value,
        unit,
        ..Value::default()
    }))
}

fn normalize_header(raw: &str) -> String {
    let cleaned = raw.trim().trim_matches('\u{feff}');
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn clean_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn non_empty(cell: String) -> Option<String> {
    if cell.is_empty() { None } else { Some(cell) }
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.parse().ok()
}

fn split_synonyms(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_bom_and_whitespace_normalized() {
        assert_eq!(normalize_header("\u{feff}endpoint"), "endpoint");
        assert_eq!(normalize_header("  EXPOSURE   TIME "), "EXPOSURE TIME");
    }

    #[test]
    fn unit_columns_pair_with_their_value_columns() {
        let headers: Vec<String> = ["DOSE_loValue", "DOSE_unit", "PH_unit", "_loValue"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            plan_condition(&headers, "DOSE_loValue"),
            ColumnPlan::Measure {
                name: "DOSE".to_string(),
                unit_index: Some(1),
            }
        );
        assert_eq!(plan_condition(&headers, "DOSE_unit"), ColumnPlan::Consumed);
        // An orphan unit column and an empty base stay plain labels.
        assert_eq!(
            plan_condition(&headers, "PH_unit"),
            ColumnPlan::Label {
                name: "PH_unit".to_string(),
            }
        );
        assert_eq!(
            plan_condition(&headers, "_loValue"),
            ColumnPlan::Label {
                name: "_loValue".to_string(),
            }
        );
    }

    #[test]
    fn numbers_parse_tolerantly() {
        assert_eq!(parse_number("5.0"), Some(5.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);
    }
}
