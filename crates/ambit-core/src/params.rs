//! Heuristic bucketing of free-form protocol parameters into the entry's
//! instrument/sample/environment/other groups.
//!
//! The substring rules are inherently fuzzy; they are kept as an explicit
//! ordered rule list, first match wins. Do not reorder.

/// Start/end timestamps are intercepted before bucketing and become entry
/// fields instead of parameters.
pub const START_DATE_PARAMETER: &str = "EXPERIMENT_START_DATE";
pub const END_DATE_PARAMETER: &str = "EXPERIMENT_END_DATE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamBucket {
    Instrument,
    Sample,
    Environment,
    Other,
}

#[derive(Debug, Clone, Copy)]
enum Predicate {
    Contains(&'static str),
    EqualsIgnoreCase(&'static str),
    Equals(&'static str),
    Prefix(&'static str),
}

impl Predicate {
    fn matches(self, name: &str) -> bool {
        match self {
            Predicate::Contains(needle) => name.to_ascii_lowercase().contains(needle),
            Predicate::EqualsIgnoreCase(target) => name.eq_ignore_ascii_case(target),
            Predicate::Equals(target) => name == target,
            Predicate::Prefix(prefix) => name.starts_with(prefix),
        }
    }
}

const RULES: [(Predicate, ParamBucket); 9] = [
    (Predicate::Contains("instrument"), ParamBucket::Instrument),
    (Predicate::Contains("sample"), ParamBucket::Sample),
    (Predicate::Contains("material"), ParamBucket::Sample),
    (Predicate::EqualsIgnoreCase("ASSAY"), ParamBucket::Instrument),
    (Predicate::EqualsIgnoreCase("E.METHOD"), ParamBucket::Instrument),
    (Predicate::Equals("E.SOP_REFERENCE"), ParamBucket::Instrument),
    (Predicate::Equals("OPERATOR"), ParamBucket::Instrument),
    (Predicate::Prefix("T."), ParamBucket::Instrument),
    (Predicate::Prefix("E."), ParamBucket::Environment),
];

pub fn classify_parameter(name: &str) -> ParamBucket {
    RULES
        .iter()
        .find(|(predicate, _)| predicate.matches(name))
        .map(|(_, bucket)| *bucket)
        .unwrap_or(ParamBucket::Other)
}
