//! Flat CSV writer for engine tables.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use ambit_model::Table;

/// Write a table to a CSV file, missing cells as empty strings.
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    let writer = Writer::from_path(path)
        .with_context(|| format!("create csv: {}", path.display()))?;
    write_records(writer, table).with_context(|| format!("write csv: {}", path.display()))
}

/// Write a table as CSV to any writer.
pub fn write_table_to<W: Write>(writer: W, table: &Table) -> Result<()> {
    write_records(Writer::from_writer(writer), table)
}

fn write_records<W: Write>(mut writer: Writer<W>, table: &Table) -> Result<()> {
    writer.write_record(table.column_names())?;
    for row in 0..table.height() {
        writer.write_record(
            table
                .columns()
                .iter()
                .map(|column| column.cells[row].render()),
        )?;
    }
    writer.flush()?;
    Ok(())
}
