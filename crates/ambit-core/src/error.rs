//! Error taxonomy of the export engine.
//!
//! Schema absence (a column that simply is not there) is never an error;
//! those features are omitted. Everything that is an error carries the local
//! context it was detected with: the selected grouping columns, the group
//! key, or the metadata phase.

use ambit_model::AmbitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// The group-by key could not be formed. Fatal for the enclosing table.
    #[error("cannot group by {columns:?} over {rows} rows: {reason}")]
    Grouping {
        columns: Vec<String>,
        rows: usize,
        reason: String,
    },

    /// Building one group's dataset failed; callers skip the group and keep
    /// the rest of the entry.
    #[error("dataset for group [{group}] (columns {columns:?}): {source}")]
    Dataset {
        columns: Vec<String>,
        group: String,
        #[source]
        source: Box<ExportError>,
    },

    /// A numeric column held a non-numeric value.
    #[error("column {column} holds a non-numeric value at row {row}")]
    NonNumeric { column: String, row: usize },

    /// Neither grouping metadata nor the group rows name an endpoint.
    #[error("group has no endpoint value")]
    MissingEndpoint,

    /// Attaching one metadata phase to an entry failed.
    #[error("{phase} metadata: {source}")]
    Metadata {
        phase: &'static str,
        #[source]
        source: AmbitError,
    },

    /// A substance record carries no usable identifier.
    #[error("substance record has no uuid")]
    MissingSubstanceId,

    #[error(transparent)]
    Tree(#[from] AmbitError),
}

impl ExportError {
    pub fn grouping(columns: &[String], rows: usize, reason: impl Into<String>) -> Self {
        ExportError::Grouping {
            columns: columns.to_vec(),
            rows,
            reason: reason.into(),
        }
    }

    pub fn non_numeric(column: &str, row: usize) -> Self {
        ExportError::NonNumeric {
            column: column.to_string(),
            row,
        }
    }

    pub fn metadata(phase: &'static str, source: AmbitError) -> Self {
        ExportError::Metadata { phase, source }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
