use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::effect::{ConditionValue, Effect};
use crate::protocol::{Citation, Protocol, SampleLink};

/// One experimental run: the effects it produced plus protocol, citation,
/// owner and identifier metadata. Effects are appended while parsing source
/// data; the application is never mutated after export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolApplication {
    pub uuid: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Option<ConditionValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation: Option<Citation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<SampleLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investigation_uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assay_uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

impl ProtocolApplication {
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            ..Self::default()
        }
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    pub fn with_citation(mut self, citation: Citation) -> Self {
        self.citation = Some(citation);
        self
    }

    pub fn with_owner(mut self, owner: SampleLink) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<ConditionValue>,
    ) -> Self {
        self.parameters.insert(name.into(), Some(value.into()));
        self
    }

    pub fn add_effect(&mut self, effect: impl Into<Effect>) {
        self.effects.push(effect.into());
    }

    /// Effect records in insertion order, paired with their position in the
    /// full effects list (row provenance for tabulation).
    pub fn effect_records(&self) -> impl Iterator<Item = (usize, &crate::effect::EffectRecord)> {
        self.effects
            .iter()
            .enumerate()
            .filter_map(|(index, effect)| effect.as_record().map(|record| (index, record)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceSubstance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub i5uuid: Option<String>,
    #[serde(rename = "URI", skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// One substance with its identity and the studies performed on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubstanceRecord {
    #[serde(rename = "URI", skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(rename = "ownerUUID", skip_serializing_if = "Option::is_none")]
    pub owner_uuid: Option<String>,
    #[serde(rename = "ownerName", skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub i5uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publicname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "substanceType", skip_serializing_if = "Option::is_none")]
    pub substance_type: Option<String>,
    #[serde(rename = "referenceSubstance", skip_serializing_if = "Option::is_none")]
    pub reference_substance: Option<ReferenceSubstance>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub study: Vec<ProtocolApplication>,
}

impl SubstanceRecord {
    pub fn new(i5uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            i5uuid: Some(i5uuid.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_publicname(mut self, publicname: impl Into<String>) -> Self {
        self.publicname = Some(publicname.into());
        self
    }

    pub fn with_owner_name(mut self, owner_name: impl Into<String>) -> Self {
        self.owner_name = Some(owner_name.into());
        self
    }

    pub fn with_substance_type(mut self, substance_type: impl Into<String>) -> Self {
        self.substance_type = Some(substance_type.into());
        self
    }

    pub fn add_study(&mut self, application: ProtocolApplication) {
        self.study.push(application);
    }
}

/// Ordered collection of substance records, the unit of a full export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Substances {
    pub substance: Vec<SubstanceRecord>,
}

impl Substances {
    pub fn len(&self) -> usize {
        self.substance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substance.is_empty()
    }
}

impl From<Vec<SubstanceRecord>> for Substances {
    fn from(substance: Vec<SubstanceRecord>) -> Self {
        Self { substance }
    }
}
