//! Condition naming convention shared with upstream data producers.
//!
//! These names are an external contract and must be preserved verbatim;
//! further synonyms belong in [`crate::ExportOptions`], not here.

/// The distinguished condition probed by the population classifier.
pub const CONDITION_CONCENTRATION: &str = "CONCENTRATION";

/// Concentration-like axis columns, in preference order. The first one
/// present in a group sorts the group's rows.
pub const CONCENTRATION_PRIORITY: [&str; 4] = [
    "CONCENTRATION",
    "CONCENTRATION_loValue",
    "CONCENTRATION_SURFACE_loValue",
    "CONCENTRATION_MASS_loValue",
];

/// Replicate-like conditions, coerced to integer auxiliary arrays.
pub const REPLICATE_CONDITIONS: [&str; 4] = [
    "REPLICATE",
    "BIOLOGICAL_REPLICATE",
    "TECHNICAL_REPLICATE",
    "EXPERIMENT",
];

/// Exposure-time axis; reaches datasets through the usual suffix pair.
pub const CONDITION_EXPOSURE_TIME: &str = "E.EXPOSURE_TIME";

/// The two replicate-like conditions that derive a group's replicate label.
pub const CONDITION_EXPERIMENT: &str = "EXPERIMENT";
pub const CONDITION_REPLICATE: &str = "REPLICATE";

pub const LO_VALUE_SUFFIX: &str = "_loValue";
pub const UNIT_SUFFIX: &str = "_unit";

/// Bucket label for absent endpoint types and replicate identities.
pub const DEFAULT_LABEL: &str = "DEFAULT";

/// Name prefix distinguishing control-population datasets.
pub const CONTROL_PREFIX: &str = "control";

/// Replicate id recorded when a replicate label cannot be parsed.
pub const UNKNOWN_REPLICATE: i64 = -1;

/// Qualifier treated as no information; uniform columns of it are omitted.
pub const NO_OP_QUALIFIER: &str = "=";

pub fn lo_value_column(condition: &str) -> String {
    format!("{condition}{LO_VALUE_SUFFIX}")
}

pub fn unit_column(condition: &str) -> String {
    format!("{condition}{UNIT_SUFFIX}")
}

/// True for the unit counterpart of an expanded condition.
pub fn is_unit_column(column: &str) -> bool {
    column.ends_with(UNIT_SUFFIX)
}
