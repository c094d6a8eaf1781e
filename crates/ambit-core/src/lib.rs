pub mod classify;
pub mod convention;
pub mod dataset;
pub mod error;
pub mod expand;
pub mod groups;
pub mod hierarchy;
pub mod options;
pub mod params;
pub mod spectra;
pub mod tabulate;

pub use classify::{Populations, classify_populations};
pub use convention::{
    CONCENTRATION_PRIORITY, CONDITION_CONCENTRATION, CONDITION_EXPERIMENT,
    CONDITION_EXPOSURE_TIME, CONDITION_REPLICATE, CONTROL_PREFIX, DEFAULT_LABEL, NO_OP_QUALIFIER,
    REPLICATE_CONDITIONS, UNKNOWN_REPLICATE, is_unit_column, lo_value_column, unit_column,
};
pub use dataset::{array_dataset, build_dataset, dataset_endpointtype};
pub use error::{ExportError, Result};
pub use expand::expand_condition;
pub use groups::{
    GroupKey, KeyCell, RowGroups, group_rows, render_key, select_grouping_columns,
};
pub use hierarchy::{
    ExportReport, ExportTree, FailedSubstance, HierarchyBuilder, SkippedDataset, entry_key,
    export_application, export_substance, export_substances, extract_doi,
};
pub use options::ExportOptions;
pub use params::{
    END_DATE_PARAMETER, ParamBucket, START_DATE_PARAMETER, classify_parameter,
};
pub use spectra::{SpectrumMeta, raman_spectrum, spectrum_application, spectrum_effect};
pub use tabulate::{EffectsTable, tabulate_effects, tabulate_records};
