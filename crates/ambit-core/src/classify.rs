use ambit_model::Table;

/// The two populations of one effects table. Controls are only present when
/// at least one row carries a control label.
#[derive(Debug, Clone)]
pub struct Populations {
    pub samples: Table,
    pub controls: Option<Table>,
}

/// Splits rows into samples and controls by the shape of the distinguished
/// condition, conventionally `CONCENTRATION`.
///
/// A textual cell there is a control-group label (`"negative control"`); a
/// missing cell means the row's concentration, if any, lives in the expanded
/// `_loValue` column, so the row is a sample. When the whole column is
/// absent every row is a sample. Each returned table drops the columns it
/// has no values for, so a control table keeps the label column and sheds
/// the sample-only axes.
pub fn classify_populations(table: &Table, distinguished: &str) -> Populations {
    let Some(column) = table.column(distinguished) else {
        let mut samples = table.clone();
        samples.drop_empty_columns();
        return Populations {
            samples,
            controls: None,
        };
    };

    let mut sample_rows: Vec<usize> = Vec::new();
    let mut control_rows: Vec<usize> = Vec::new();
    for (row, cell) in column.cells.iter().enumerate() {
        if cell.as_text().is_some() {
            control_rows.push(row);
        } else {
            sample_rows.push(row);
        }
    }

    let mut samples = table.take_rows(&sample_rows);
    samples.drop_empty_columns();
    let controls = if control_rows.is_empty() {
        None
    } else {
        let mut controls = table.take_rows(&control_rows);
        controls.drop_empty_columns();
        Some(controls)
    };
    Populations { samples, controls }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambit_model::{Cell, TableBuilder};

    fn mixed_table() -> Table {
        let mut builder = TableBuilder::new();
        builder.push_row(
            0,
            [
                ("endpoint".to_string(), Cell::from("LC50")),
                ("CONCENTRATION_loValue".to_string(), Cell::Number(5.0)),
            ],
        );
        builder.push_row(
            1,
            [
                ("endpoint".to_string(), Cell::from("LC50")),
                ("CONCENTRATION".to_string(), Cell::from("negative control")),
            ],
        );
        builder.finish()
    }

    #[test]
    fn label_rows_become_controls() {
        let populations = classify_populations(&mixed_table(), "CONCENTRATION");
        assert_eq!(populations.samples.height(), 1);
        let controls = populations.controls.expect("one control row");
        assert_eq!(controls.height(), 1);
        assert!(controls.has_column("CONCENTRATION"));
        // the sample-only axis is gone from the control table
        assert!(!controls.has_column("CONCENTRATION_loValue"));
        assert!(!populations.samples.has_column("CONCENTRATION"));
    }

    #[test]
    fn absent_column_keeps_everything_as_samples() {
        let populations = classify_populations(&mixed_table(), "DOSE");
        assert_eq!(populations.samples.height(), 2);
        assert!(populations.controls.is_none());
    }
}
