use std::collections::HashMap;

use serde::Serialize;

/// One tabulated cell. `Missing` is a first-class marker, distinct from zero
/// or the empty string, and survives grouping as its own key value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum Cell {
    Missing,
    Text(String),
    Int(i64),
    Number(f64),
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            Cell::Int(value) => Some(*value as f64),
            Cell::Text(_) | Cell::Missing => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Plain-text rendering; missing renders empty.
    pub fn render(&self) -> String {
        match self {
            Cell::Missing => String::new(),
            Cell::Text(value) => value.clone(),
            Cell::Int(value) => value.to_string(),
            Cell::Number(value) => value.to_string(),
        }
    }

    pub fn from_opt_text(value: Option<&str>) -> Cell {
        match value {
            Some(text) => Cell::Text(text.to_string()),
            None => Cell::Missing,
        }
    }

    pub fn from_opt_number(value: Option<f64>) -> Cell {
        match value {
            Some(number) => Cell::Number(number),
            None => Cell::Missing,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn is_all_missing(&self) -> bool {
        self.cells.iter().all(Cell::is_missing)
    }
}

/// A rectangular, column-major table with a missing marker per absent cell
/// and per-row provenance (the index of the originating record).
///
/// Row order is insertion order; it is only changed deliberately, via
/// [`Table::take_rows`] with a sort permutation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    provenance: Vec<usize>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn height(&self) -> usize {
        self.provenance.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn cell(&self, name: &str, row: usize) -> Option<&Cell> {
        self.column(name).and_then(|column| column.cells.get(row))
    }

    pub fn provenance(&self) -> &[usize] {
        &self.provenance
    }

    /// Projects the given rows into a fresh table, re-indexed from zero.
    /// Provenance follows the rows.
    pub fn take_rows(&self, rows: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|column| Column {
                name: column.name.clone(),
                cells: rows.iter().map(|&row| column.cells[row].clone()).collect(),
            })
            .collect();
        let provenance = rows.iter().map(|&row| self.provenance[row]).collect();
        Table {
            columns,
            provenance,
        }
    }

    /// Removes columns with no values at all. Absent data never becomes an
    /// empty output array. A zero-row table keeps its schema.
    pub fn drop_empty_columns(&mut self) {
        if self.height() == 0 {
            return;
        }
        self.columns.retain(|column| !column.is_all_missing());
    }

    /// Stable sort permutation over one column: numbers ascending, then
    /// text lexically, missing cells last. Returns row indices in sorted
    /// order; the column being absent yields the identity permutation.
    pub fn sort_permutation(&self, name: &str) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.height()).collect();
        let Some(column) = self.column(name) else {
            return order;
        };
        order.sort_by(|&a, &b| cell_sort_rank(&column.cells[a], &column.cells[b]));
        order
    }
}

fn cell_sort_rank(a: &Cell, b: &Cell) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    fn class(cell: &Cell) -> u8 {
        match cell {
            Cell::Number(_) | Cell::Int(_) => 0,
            Cell::Text(_) => 1,
            Cell::Missing => 2,
        }
    }
    match class(a).cmp(&class(b)) {
        Ordering::Equal => match (a, b) {
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            _ => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            },
        },
        other => other,
    }
}

/// Accumulates rows of named cells, discovering the column set dynamically.
/// A column first seen mid-build is backfilled with missing markers; a row
/// missing a known column gets a missing marker. The result is rectangular
/// by construction.
#[derive(Debug, Default)]
pub struct TableBuilder {
    names: Vec<String>,
    index: HashMap<String, usize>,
    columns: Vec<Vec<Cell>>,
    provenance: Vec<usize>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a column ahead of any row, fixing its position in the
    /// final column order.
    pub fn ensure_column(&mut self, name: impl Into<String>) {
        let _ = self.column_index(name.into());
    }

    pub fn push_row<I>(&mut self, provenance: usize, cells: I)
    where
        I: IntoIterator<Item = (String, Cell)>,
    {
        let row = self.provenance.len();
        self.provenance.push(provenance);
        for column in &mut self.columns {
            column.push(Cell::Missing);
        }
        for (name, cell) in cells {
            let idx = self.column_index(name);
            self.columns[idx][row] = cell;
        }
    }

    fn column_index(&mut self, name: String) -> usize {
        if let Some(&idx) = self.index.get(&name) {
            return idx;
        }
        let idx = self.names.len();
        self.index.insert(name.clone(), idx);
        self.names.push(name);
        self.columns.push(vec![Cell::Missing; self.provenance.len()]);
        idx
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn finish(self) -> Table {
        let columns = self
            .names
            .into_iter()
            .zip(self.columns)
            .map(|(name, cells)| Column { name, cells })
            .collect();
        Table {
            columns,
            provenance: self.provenance,
        }
    }
}
