//! Builds one dataset node from one group of rows.
//!
//! The group arrives as row indices into the population table plus the
//! key/column metadata that identified it. Everything here works over the
//! projected sub-table: prune, sort once by the best concentration-like
//! column, then peel off the response, bounds, qualifiers, axes and
//! auxiliary signals in a fixed order.

use ambit_model::{AttrKey, Cell, DataArray, DatasetNode, EffectArray, Table};
use indexmap::IndexMap;

use crate::convention::{DEFAULT_LABEL, NO_OP_QUALIFIER, UNKNOWN_REPLICATE, lo_value_column, unit_column};
use crate::error::{ExportError, Result};
use crate::groups::{GroupKey, KeyCell, render_key};
use crate::options::ExportOptions;

/// Builds the dataset for one group. Errors are wrapped with the selected
/// columns and the offending key so the caller can log and skip the group
/// without losing the context.
pub fn build_dataset(
    table: &Table,
    selected: &[String],
    key: &GroupKey,
    rows: &[usize],
    condition_columns: &[String],
    options: &ExportOptions,
) -> Result<DatasetNode> {
    build_group_dataset(table, selected, key, rows, condition_columns, options).map_err(
        |source| ExportError::Dataset {
            columns: selected.to_vec(),
            group: render_key(key),
            source: Box::new(source),
        },
    )
}

fn build_group_dataset(
    table: &Table,
    selected: &[String],
    key: &GroupKey,
    rows: &[usize],
    condition_columns: &[String],
    options: &ExportOptions,
) -> Result<DatasetNode> {
    let meta: IndexMap<&str, Cell> = selected
        .iter()
        .map(String::as_str)
        .zip(key.iter().map(KeyCell::to_cell))
        .collect();

    let mut group = table.take_rows(rows);
    group.drop_empty_columns();
    if let Some(sort_column) = options
        .sort_priority()
        .into_iter()
        .find(|name| group.has_column(name))
    {
        let order = group.sort_permutation(&sort_column);
        group = group.take_rows(&order);
    }

    let endpoint = meta_text(&meta, "endpoint")
        .or_else(|| first_text(&group, "endpoint"))
        .ok_or(ExportError::MissingEndpoint)?;
    let endpointtype = meta_text(&meta, "endpointtype")
        .or_else(|| first_text(&group, "endpointtype"));
    let unit = meta_text(&meta, "unit").or_else(|| first_text(&group, "unit"));

    let mut dataset = DatasetNode::new(&endpoint);

    if group.has_column("loValue") {
        let values = numeric_column(&group, "loValue")?;
        dataset.response = Some(DataArray::floats(&endpoint, unit.clone(), values));
    }
    if group.has_column("upValue") {
        let values = numeric_column(&group, "upValue")?;
        dataset
            .auxiliary
            .push(DataArray::floats(&format!("{endpoint}_upValue"), unit.clone(), values));
    }
    if group.has_column("errValue") {
        let values = numeric_column(&group, "errValue")?;
        dataset
            .auxiliary
            .push(DataArray::floats(&format!("{endpoint}_errors"), unit.clone(), values));
    }
    for qualifier in ["loQualifier", "upQualifier", "errQualifier"] {
        if let Some(column) = group.column(qualifier) {
            let values: Vec<String> = column
                .cells
                .iter()
                .map(|cell| match cell {
                    Cell::Missing => NO_OP_QUALIFIER.to_string(),
                    other => other.render(),
                })
                .collect();
            if values.iter().any(|value| value != NO_OP_QUALIFIER) {
                dataset.auxiliary.push(DataArray::text(qualifier, values));
            }
        }
    }

    let mut concentration_axes: Vec<(usize, DataArray)> = Vec::new();
    let mut other_axes: Vec<DataArray> = Vec::new();
    for name in condition_columns {
        if options.is_replicate(name) {
            let source = group
                .column(name)
                .or_else(|| group.column(&lo_value_column(name)));
            if let Some(column) = source {
                dataset
                    .auxiliary
                    .push(DataArray::ints(name, replicate_ints(&column.cells)));
            }
            continue;
        }
        if let Some(column) = group.column(name) {
            // a label condition survives as plain text (control tags and
            // free-form annotations land here)
            let values: Vec<String> = column.cells.iter().map(Cell::render).collect();
            dataset.auxiliary.push(DataArray::text(name, values));
            continue;
        }
        let value_column = lo_value_column(name);
        if group.has_column(&value_column) {
            let values = numeric_column(&group, &value_column)?;
            let axis_unit = meta_text(&meta, &unit_column(name))
                .or_else(|| first_text(&group, &unit_column(name)));
            let axis = DataArray::floats(name, axis_unit, values);
            match options.concentration_rank(name) {
                Some(rank) => concentration_axes.push((rank, axis)),
                None => other_axes.push(axis),
            }
        }
    }
    concentration_axes.sort_by_key(|(rank, _)| *rank);
    let primary_axis = concentration_axes.first().map(|(_, axis)| axis.name.clone());
    dataset.axes = concentration_axes
        .into_iter()
        .map(|(_, axis)| axis)
        .collect();
    dataset.axes.append(&mut other_axes);

    dataset.attrs.set(AttrKey::Endpoint, endpoint.as_str());
    if let Some(endpointtype) = endpointtype.filter(|value| !value.is_empty()) {
        dataset.attrs.set(AttrKey::EndpointType, endpointtype);
    }
    if let Some(unit) = unit.filter(|value| !value.is_empty()) {
        dataset.attrs.set(AttrKey::Unit, unit);
    }
    if let Some(primary_axis) = primary_axis {
        dataset.attrs.set(AttrKey::AxisIndices(primary_axis), 0i64);
    }
    if !dataset.auxiliary.is_empty() {
        dataset
            .attrs
            .set(AttrKey::AuxiliarySignals, dataset.auxiliary_names());
    }
    Ok(dataset)
}

/// Converts an already-arrayed effect into a dataset node; the first axis is
/// the primary one.
pub fn array_dataset(array: &EffectArray) -> DatasetNode {
    let mut dataset = DatasetNode::new(&array.endpoint);
    dataset.response = Some(DataArray::floats(
        &array.endpoint,
        array.signal.unit.clone(),
        array.signal.values.clone(),
    ));
    for (name, axis) in &array.axes {
        dataset
            .axes
            .push(DataArray::floats(name, axis.unit.clone(), axis.values.clone()));
    }

    dataset.attrs.set(AttrKey::Endpoint, array.endpoint.as_str());
    if let Some(endpointtype) = array
        .endpointtype
        .as_ref()
        .filter(|value| !value.is_empty())
    {
        dataset.attrs.set(AttrKey::EndpointType, endpointtype.as_str());
    }
    if let Some(unit) = array.signal.unit.as_ref().filter(|value| !value.is_empty()) {
        dataset.attrs.set(AttrKey::Unit, unit.as_str());
    }
    if let Some(primary_axis) = dataset.axes.first().map(|axis| axis.name.clone()) {
        dataset.attrs.set(AttrKey::AxisIndices(primary_axis), 0i64);
    }
    dataset
}

/// Endpoint type label of a built dataset, defaulting when it was unknown.
pub fn dataset_endpointtype(dataset: &DatasetNode) -> String {
    dataset
        .attrs
        .get(&AttrKey::EndpointType)
        .and_then(|value| value.as_text())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_LABEL.to_string())
}

fn meta_text(meta: &IndexMap<&str, Cell>, key: &str) -> Option<String> {
    meta.get(key)
        .and_then(Cell::as_text)
        .map(str::to_string)
}

fn first_text(table: &Table, name: &str) -> Option<String> {
    table
        .column(name)?
        .cells
        .iter()
        .filter_map(Cell::as_text)
        .next()
        .map(str::to_string)
}

/// Strict numeric extraction: missing becomes NaN, text is a shape error.
fn numeric_column(table: &Table, name: &str) -> Result<Vec<f64>> {
    let Some(column) = table.column(name) else {
        return Ok(Vec::new());
    };
    column
        .cells
        .iter()
        .enumerate()
        .map(|(row, cell)| match cell {
            Cell::Missing => Ok(f64::NAN),
            Cell::Text(_) => Err(ExportError::non_numeric(name, row)),
            other => other.as_f64().ok_or_else(|| ExportError::non_numeric(name, row)),
        })
        .collect()
}

/// Tolerant replicate coercion: anything unparseable is the unknown
/// sentinel, never an error.
fn replicate_ints(cells: &[Cell]) -> Vec<i64> {
    cells
        .iter()
        .map(|cell| match cell {
            Cell::Int(value) => *value,
            Cell::Number(value) if value.is_finite() => *value as i64,
            Cell::Text(value) => parse_replicate(value),
            _ => UNKNOWN_REPLICATE,
        })
        .collect()
}

fn parse_replicate(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return value;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value as i64)
        .unwrap_or(UNKNOWN_REPLICATE)
}
