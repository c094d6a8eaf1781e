use serde::{Deserialize, Serialize};

/// Category of the measured endpoint within a protocol's top category
/// (e.g. `PC_GRANULOMETRY_SECTION` under `P-CHEM`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointCategory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl EndpointCategory {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            term: None,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Experimental protocol metadata: top category, category, endpoint and the
/// guidelines the run followed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Protocol {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<EndpointCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub guideline: Vec<String>,
}

impl Protocol {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..Self::default()
        }
    }

    pub fn with_topcategory(mut self, topcategory: impl Into<String>) -> Self {
        self.topcategory = Some(topcategory.into());
        self
    }

    pub fn with_category(mut self, category: EndpointCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_guideline(mut self, guideline: impl Into<String>) -> Self {
        self.guideline.push(guideline.into());
        self
    }
}

/// Literature or data-owner citation for one protocol application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Citation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl Citation {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Company {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sample {
    pub uuid: String,
}

/// Links a protocol application to the substance it measured and the company
/// that provided it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleLink {
    pub substance: Sample,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
}

impl SampleLink {
    pub fn new(substance_uuid: impl Into<String>) -> Self {
        Self {
            substance: Sample {
                uuid: substance_uuid.into(),
            },
            company: None,
        }
    }

    pub fn with_company(mut self, name: impl Into<String>) -> Self {
        self.company = Some(Company {
            uuid: None,
            name: Some(name.into()),
        });
        self
    }
}
