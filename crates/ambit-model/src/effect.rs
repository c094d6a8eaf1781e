use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::value::{Value, ValueArray};

/// Separator used by hierarchical container paths. Endpoint and node names
/// must never contain it raw.
pub const PATH_SEPARATOR: char = '/';

pub(crate) fn normalize_endpoint(raw: &str) -> String {
    raw.replace(PATH_SEPARATOR, "_")
}

fn de_endpoint<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(normalize_endpoint(&raw))
}

fn de_opt_endpoint<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|value| normalize_endpoint(&value)))
}

/// One experimental condition value: either a plain textual label (e.g. a
/// control-group tag) or a structured measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Label(String),
    Measure(Value),
}

impl ConditionValue {
    pub fn as_label(&self) -> Option<&str> {
        match self {
            ConditionValue::Label(label) => Some(label),
            ConditionValue::Measure(_) => None,
        }
    }

    pub fn as_measure(&self) -> Option<&Value> {
        match self {
            ConditionValue::Label(_) => None,
            ConditionValue::Measure(value) => Some(value),
        }
    }
}

impl From<&str> for ConditionValue {
    fn from(label: &str) -> Self {
        ConditionValue::Label(label.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(label: String) -> Self {
        ConditionValue::Label(label)
    }
}

impl From<Value> for ConditionValue {
    fn from(value: Value) -> Self {
        ConditionValue::Measure(value)
    }
}

/// The measured outcome of one effect record: bounds, qualifiers, free text
/// and unit, all optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectResult {
    #[serde(rename = "loQualifier", skip_serializing_if = "Option::is_none")]
    pub lo_qualifier: Option<String>,
    #[serde(rename = "loValue", skip_serializing_if = "Option::is_none")]
    pub lo_value: Option<f64>,
    #[serde(rename = "upQualifier", skip_serializing_if = "Option::is_none")]
    pub up_qualifier: Option<String>,
    #[serde(rename = "upValue", skip_serializing_if = "Option::is_none")]
    pub up_value: Option<f64>,
    #[serde(rename = "textValue", skip_serializing_if = "Option::is_none")]
    pub text_value: Option<String>,
    #[serde(rename = "errQualifier", skip_serializing_if = "Option::is_none")]
    pub err_qualifier: Option<String>,
    #[serde(rename = "errValue", skip_serializing_if = "Option::is_none")]
    pub err_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl EffectResult {
    pub fn measured(lo_value: f64, unit: impl Into<String>) -> Self {
        Self {
            lo_value: Some(lo_value),
            unit: Some(unit.into()),
            ..Self::default()
        }
    }

    pub fn textual(text: impl Into<String>) -> Self {
        Self {
            text_value: Some(text.into()),
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

    pub fn with_error(mut self, err_value: f64) -> Self {
        self.err_value = Some(err_value);
        self
    }
}

/// One measured endpoint observation plus its experimental conditions.
///
/// The endpoint is normalized on construction and on deserialization so it
/// can safely name a node in the exported hierarchy. Condition keys are
/// case-sensitive free-form identifiers agreed by convention
/// (`CONCENTRATION`, `E.EXPOSURE_TIME`, `REPLICATE`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectRecord {
    #[serde(deserialize_with = "de_endpoint")]
    pub endpoint: String,
    #[serde(
        default,
        deserialize_with = "de_opt_endpoint",
        skip_serializing_if = "Option::is_none"
    )]
    pub endpointtype: Option<String>,
    #[serde(default)]
    pub result: EffectResult,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub conditions: IndexMap<String, Option<ConditionValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idresult: Option<i64>,
    #[serde(rename = "endpointGroup", default, skip_serializing_if = "Option::is_none")]
    pub endpoint_group: Option<i64>,
    #[serde(rename = "endpointSynonyms", default, skip_serializing_if = "Vec::is_empty")]
    pub endpoint_synonyms: Vec<String>,
    #[serde(rename = "sampleID", default, skip_serializing_if = "Option::is_none")]
    pub sample_id: Option<String>,
}

impl EffectRecord {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: normalize_endpoint(&endpoint.into()),
            endpointtype: None,
            result: EffectResult::default(),
            conditions: IndexMap::new(),
            idresult: None,
            endpoint_group: None,
            endpoint_synonyms: Vec::new(),
            sample_id: None,
        }
    }

    pub fn with_endpointtype(mut self, endpointtype: impl Into<String>) -> Self {
        self.endpointtype = Some(normalize_endpoint(&endpointtype.into()));
        self
    }

    pub fn with_result(mut self, result: EffectResult) -> Self {
        self.result = result;
        self
    }

    pub fn with_condition(
        mut self,
        name: impl Into<String>,
        value: impl Into<ConditionValue>,
    ) -> Self {
        self.conditions.insert(name.into(), Some(value.into()));
        self
    }

    /// Records an explicitly absent condition (a key with no value).
    pub fn with_absent_condition(mut self, name: impl Into<String>) -> Self {
        self.conditions.insert(name.into(), None);
        self
    }

    pub fn synonyms_text(&self) -> Option<String> {
        if self.endpoint_synonyms.is_empty() {
            None
        } else {
            Some(self.endpoint_synonyms.join(", "))
        }
    }
}

/// An effect whose payload is already arrayed: one signal plus named axes,
/// e.g. an instrumental spectrum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectArray {
    #[serde(deserialize_with = "de_endpoint")]
    pub endpoint: String,
    #[serde(
        default,
        deserialize_with = "de_opt_endpoint",
        skip_serializing_if = "Option::is_none"
    )]
    pub endpointtype: Option<String>,
    pub signal: ValueArray,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub axes: IndexMap<String, ValueArray>,
}

impl EffectArray {
    pub fn new(endpoint: impl Into<String>, signal: ValueArray) -> Self {
        Self {
            endpoint: normalize_endpoint(&endpoint.into()),
            endpointtype: None,
            signal,
            axes: IndexMap::new(),
        }
    }

    pub fn with_endpointtype(mut self, endpointtype: impl Into<String>) -> Self {
        self.endpointtype = Some(normalize_endpoint(&endpointtype.into()));
        self
    }

    pub fn with_axis(mut self, name: impl Into<String>, axis: ValueArray) -> Self {
        self.axes.insert(name.into(), axis);
        self
    }
}

/// Closed union of the two effect payload shapes. `Array` is tried first on
/// deserialization: its required `signal` field is what tells them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Effect {
    Array(EffectArray),
    Record(EffectRecord),
}

impl Effect {
    pub fn endpoint(&self) -> &str {
        match self {
            Effect::Array(array) => &array.endpoint,
            Effect::Record(record) => &record.endpoint,
        }
    }

    pub fn as_record(&self) -> Option<&EffectRecord> {
        match self {
            Effect::Record(record) => Some(record),
            Effect::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&EffectArray> {
        match self {
            Effect::Array(array) => Some(array),
            Effect::Record(_) => None,
        }
    }
}

impl From<EffectRecord> for Effect {
    fn from(record: EffectRecord) -> Self {
        Effect::Record(record)
    }
}

impl From<EffectArray> for Effect {
    fn from(array: EffectArray) -> Self {
        Effect::Array(array)
    }
}
