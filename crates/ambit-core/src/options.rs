use crate::convention::{
    CONCENTRATION_PRIORITY, CONDITION_CONCENTRATION, REPLICATE_CONDITIONS, lo_value_column,
};

/// Export configuration. The defaults reproduce the naming contract
/// verbatim; additional synonyms extend the lists without replacing them.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    distinguished_condition: String,
    grouping_columns: Option<Vec<String>>,
    extra_replicate_names: Vec<String>,
    extra_concentration_names: Vec<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            distinguished_condition: CONDITION_CONCENTRATION.to_string(),
            grouping_columns: None,
            extra_replicate_names: Vec::new(),
            extra_concentration_names: Vec::new(),
        }
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the condition whose shape separates samples from controls.
    pub fn with_distinguished_condition(mut self, name: impl Into<String>) -> Self {
        self.distinguished_condition = name.into();
        self
    }

    /// Fixes the grouping key columns instead of the automatic selection.
    pub fn with_grouping_columns(mut self, columns: Vec<String>) -> Self {
        self.grouping_columns = Some(columns);
        self
    }

    pub fn with_replicate_synonym(mut self, name: impl Into<String>) -> Self {
        self.extra_replicate_names.push(name.into());
        self
    }

    pub fn with_concentration_synonym(mut self, name: impl Into<String>) -> Self {
        self.extra_concentration_names.push(name.into());
        self
    }

    pub fn distinguished_condition(&self) -> &str {
        &self.distinguished_condition
    }

    pub fn grouping_columns(&self) -> Option<&[String]> {
        self.grouping_columns.as_deref()
    }

    pub fn is_replicate(&self, condition: &str) -> bool {
        REPLICATE_CONDITIONS.contains(&condition)
            || self.extra_replicate_names.iter().any(|name| name == condition)
    }

    /// Preference rank of a concentration-like condition, lower is more
    /// preferred. Accepts both the raw condition name and its value column.
    pub fn concentration_rank(&self, condition: &str) -> Option<usize> {
        let value_column = lo_value_column(condition);
        let base = CONCENTRATION_PRIORITY
            .iter()
            .position(|&name| name == condition || name == value_column);
        if base.is_some() {
            return base;
        }
        self.extra_concentration_names
            .iter()
            .position(|name| name == condition || lo_value_column(name) == value_column)
            .map(|rank| CONCENTRATION_PRIORITY.len() + rank)
    }

    /// Column names that may sort a group's rows, in preference order.
    pub fn sort_priority(&self) -> Vec<String> {
        let mut priority: Vec<String> = CONCENTRATION_PRIORITY
            .iter()
            .map(|&name| name.to_string())
            .collect();
        for name in &self.extra_concentration_names {
            priority.push(lo_value_column(name));
        }
        priority
    }
}
