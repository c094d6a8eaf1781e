use ambit_model::{Cell, ConditionValue};

use crate::convention::{lo_value_column, unit_column};

/// Expands one condition into tabular cells.
///
/// A string label stays one scalar column under the condition's own name; a
/// structured value becomes a `<name>_loValue` / `<name>_unit` pair. An
/// absent value emits nothing. A structured value carrying neither number
/// nor unit still emits both columns with missing markers.
pub fn expand_condition(name: &str, value: Option<&ConditionValue>) -> Vec<(String, Cell)> {
    match value {
        None => Vec::new(),
        Some(ConditionValue::Label(label)) => {
            vec![(name.to_string(), Cell::Text(label.clone()))]
        }
        Some(ConditionValue::Measure(measure)) => vec![
            (
                lo_value_column(name),
                Cell::from_opt_number(measure.lo_value),
            ),
            (
                unit_column(name),
                Cell::from_opt_text(measure.unit.as_deref()),
            ),
        ],
    }
}
