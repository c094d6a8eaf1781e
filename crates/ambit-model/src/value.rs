use serde::{Deserialize, Serialize};

/// A scalar measurement: optional low/high bounds with qualifiers (`<`, `>`,
/// `=`, ...), an optional unit, an optional error term and a free-text
/// annotation. Immutable once constructed; builders return a new value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Value {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(rename = "loQualifier", skip_serializing_if = "Option::is_none")]
    pub lo_qualifier: Option<String>,
    #[serde(rename = "loValue", skip_serializing_if = "Option::is_none")]
    pub lo_value: Option<f64>,
    #[serde(rename = "upQualifier", skip_serializing_if = "Option::is_none")]
    pub up_qualifier: Option<String>,
    #[serde(rename = "upValue", skip_serializing_if = "Option::is_none")]
    pub up_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(rename = "errQualifier", skip_serializing_if = "Option::is_none")]
    pub err_qualifier: Option<String>,
    #[serde(rename = "errValue", skip_serializing_if = "Option::is_none")]
    pub err_value: Option<f64>,
}

impl Value {
    pub fn new(lo_value: f64, unit: impl Into<String>) -> Self {
        Self {
            unit: Some(unit.into()),
            lo_value: Some(lo_value),
            ..Self::default()
        }
    }

    pub fn with_lo_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.lo_qualifier = Some(qualifier.into());
        self
    }

    pub fn with_up_value(mut self, up_value: f64) -> Self {
        self.up_value = Some(up_value);
        self
    }

    pub fn with_up_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.up_qualifier = Some(qualifier.into());
        self
    }

    pub fn with_error(mut self, err_value: f64) -> Self {
        self.err_value = Some(err_value);
        self
    }

    /// A value carrying neither bounds nor unit still expands to its value
    /// and unit columns; absence of data is representable.
    pub fn is_empty(&self) -> bool {
        self.unit.is_none()
            && self.lo_qualifier.is_none()
            && self.lo_value.is_none()
            && self.up_qualifier.is_none()
            && self.up_value.is_none()
            && self.annotation.is_none()
            && self.err_qualifier.is_none()
            && self.err_value.is_none()
    }
}

/// A one-dimensional array of measured values sharing one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueArray {
    pub values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl ValueArray {
    pub fn new(values: Vec<f64>, unit: Option<String>) -> Self {
        Self { values, unit }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_builders_compose() {
        let value = Value::new(5.0, "mg/L")
            .with_lo_qualifier(">=")
            .with_up_value(10.0)
            .with_error(0.5);
        assert_eq!(value.lo_value, Some(5.0));
        assert_eq!(value.unit.as_deref(), Some("mg/L"));
        assert_eq!(value.up_value, Some(10.0));
        assert_eq!(value.err_value, Some(0.5));
        assert!(!value.is_empty());
        assert!(Value::default().is_empty());
    }
}
