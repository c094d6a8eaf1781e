//! Deterministic row grouping over tabulated effects.
//!
//! Keys are tuples of hashable cell values; a missing cell is a key value
//! of its own, so rows that lack a grouping column stay visible instead of
//! silently vanishing. Group order follows first appearance in the table.

use ambit_model::{Cell, Column, Table};
use indexmap::IndexMap;

use crate::convention::is_unit_column;
use crate::error::{ExportError, Result};
use crate::options::ExportOptions;

/// A cell value usable as part of a grouping key. Floats are keyed by their
/// bit pattern after normalizing the zero sign; NaN groups with missing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCell {
    Missing,
    Text(String),
    Int(i64),
    Number(u64),
}

impl KeyCell {
    pub fn from_cell(cell: &Cell) -> KeyCell {
        match cell {
            Cell::Missing => KeyCell::Missing,
            Cell::Text(value) => KeyCell::Text(value.clone()),
            Cell::Int(value) => KeyCell::Int(*value),
            Cell::Number(value) if value.is_nan() => KeyCell::Missing,
            Cell::Number(value) => {
                let normalized = if *value == 0.0 { 0.0 } else { *value };
                KeyCell::Number(normalized.to_bits())
            }
        }
    }

    pub fn to_cell(&self) -> Cell {
        match self {
            KeyCell::Missing => Cell::Missing,
            KeyCell::Text(value) => Cell::Text(value.clone()),
            KeyCell::Int(value) => Cell::Int(*value),
            KeyCell::Number(bits) => Cell::Number(f64::from_bits(*bits)),
        }
    }

    pub fn render(&self) -> String {
        match self {
            KeyCell::Missing => "<missing>".to_string(),
            other => other.to_cell().render(),
        }
    }
}

pub type GroupKey = Vec<KeyCell>;

/// Key rendering used in log lines and error context.
pub fn render_key(key: &GroupKey) -> String {
    key.iter()
        .map(KeyCell::render)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The groups of one table: the key columns actually used and, per key, the
/// member row indices in table order.
#[derive(Debug, Clone)]
pub struct RowGroups {
    pub selected: Vec<String>,
    pub groups: Vec<(GroupKey, Vec<usize>)>,
}

/// Picks the grouping key columns. An explicit list is honored minus absent
/// columns; otherwise the key is endpoint, endpoint type and unit (those
/// present) plus every per-condition unit column, in table order.
pub fn select_grouping_columns(table: &Table, options: &ExportOptions) -> Vec<String> {
    if let Some(explicit) = options.grouping_columns() {
        return explicit
            .iter()
            .filter(|name| table.has_column(name))
            .cloned()
            .collect();
    }
    let mut selected: Vec<String> = Vec::new();
    for name in ["endpoint", "endpointtype", "unit"] {
        if table.has_column(name) {
            selected.push(name.to_string());
        }
    }
    for column in table.columns() {
        if is_unit_column(&column.name) {
            selected.push(column.name.clone());
        }
    }
    selected
}

/// Partitions the table's rows by their key tuple.
///
/// Fails when no grouping column is present at all, or when the explicit
/// list names a column twice; either would make every downstream dataset
/// ill-defined, so the whole table is abandoned.
pub fn group_rows(table: &Table, options: &ExportOptions) -> Result<RowGroups> {
    let selected = select_grouping_columns(table, options);
    if selected.is_empty() {
        return Err(ExportError::grouping(
            &selected,
            table.height(),
            "no grouping columns present",
        ));
    }
    for (position, name) in selected.iter().enumerate() {
        if selected[..position].contains(name) {
            return Err(ExportError::grouping(
                &selected,
                table.height(),
                format!("duplicate grouping column: {name}"),
            ));
        }
    }

    let columns: Vec<&Column> = selected
        .iter()
        .filter_map(|name| table.column(name))
        .collect();
    let mut groups: IndexMap<GroupKey, Vec<usize>> = IndexMap::new();
    for row in 0..table.height() {
        let key: GroupKey = columns
            .iter()
            .map(|column| KeyCell::from_cell(&column.cells[row]))
            .collect();
        groups.entry(key).or_default().push(row);
    }

    Ok(RowGroups {
        selected,
        groups: groups.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_keys_group_with_missing() {
        assert_eq!(KeyCell::from_cell(&Cell::Number(f64::NAN)), KeyCell::Missing);
        assert_eq!(
            KeyCell::from_cell(&Cell::Number(-0.0)),
            KeyCell::from_cell(&Cell::Number(0.0))
        );
    }

    #[test]
    fn key_rendering_marks_missing() {
        let key = vec![
            KeyCell::Text("LC50".to_string()),
            KeyCell::Missing,
            KeyCell::Number(5.0f64.to_bits()),
        ];
        assert_eq!(render_key(&key), "LC50, <missing>, 5");
    }
}
