//! Identity read-back from a written store.
//!
//! Reconstructs the substances collection's identity and study metadata:
//! substance attributes, entry identifiers, protocol, citation, owner and
//! the flattened parameters. Effect payloads are not reconstructed.

use ambit_model::{
    AttrValue, Citation, ConditionValue, EndpointCategory, FieldNode, Protocol,
    ProtocolApplication, SampleLink, SubstanceRecord, Substances, Value,
};
use tracing::warn;

use crate::error::Result;
use crate::store::{AttributeStore, StoredKind, child_path};

const SUBSTANCES_PATH: &str = "/substance";
const BUCKET_GROUPS: [&str; 4] = ["instrument", "sample", "environment", "parameters"];
const OWNER_FIELDS: [&str; 2] = ["uuid", "provider"];

/// Read the substances collection back out of a store.
///
/// A store without a substances collection reads as empty. Non-group
/// children at the collection and substance levels are skipped.
pub fn read_substances<S: AttributeStore>(store: &S) -> Result<Substances> {
    if !store.exists(SUBSTANCES_PATH) {
        return Ok(Substances::default());
    }
    let mut records = Vec::new();
    for name in store.children(SUBSTANCES_PATH)? {
        let path = child_path(SUBSTANCES_PATH, &name);
        if store.kind(&path) != Some(StoredKind::Group) {
            warn!(path, "skipping non-group substance node");
            continue;
        }
        records.push(read_substance(store, &path, &name)?);
    }
    Ok(Substances::from(records))
}

fn read_substance<S: AttributeStore>(
    store: &S,
    path: &str,
    i5uuid: &str,
) -> Result<SubstanceRecord> {
    let mut record = SubstanceRecord {
        i5uuid: Some(i5uuid.to_string()),
        name: store.attr(path, "name")?,
        publicname: store.attr(path, "publicname")?,
        owner_name: store.attr(path, "ownerName")?,
        substance_type: store.attr(path, "substanceType")?,
        ..SubstanceRecord::default()
    };
    for name in store.children(path)? {
        let entry_path = child_path(path, &name);
        if store.kind(&entry_path) != Some(StoredKind::Group) {
            warn!(path = entry_path, "skipping non-group entry node");
            continue;
        }
        record.study.push(read_entry(store, &entry_path)?);
    }
    Ok(record)
}

fn read_entry<S: AttributeStore>(store: &S, path: &str) -> Result<ProtocolApplication> {
    let uuid = scalar_text(store, path, "entry_identifier_uuid")?.unwrap_or_default();
    let mut application = ProtocolApplication::new(uuid);
    application.investigation_uuid = scalar_text(store, path, "collection_identifier")?;
    application.assay_uuid = scalar_text(store, path, "experiment_identifier")?;
    application.updated = scalar_text(store, path, "updated")?;
    application.protocol = read_protocol(store, path)?;
    application.citation = read_citation(store, path)?;
    application.owner = read_owner(store, path)?;
    read_parameters(store, path, &mut application)?;
    Ok(application)
}

fn read_protocol<S: AttributeStore>(store: &S, entry: &str) -> Result<Option<Protocol>> {
    let note = child_path(entry, "experiment_documentation");
    if !store.exists(&note) {
        return Ok(None);
    }
    let mut topcategory = None;
    let mut endpoint = None;
    let mut category = None;
    let category_path = child_path(&note, "category");
    if store.exists(&category_path) {
        topcategory = store.attr(&category_path, "topcategory")?;
        endpoint = store.attr(&category_path, "endpoint")?;
        let code = store.attr(&category_path, "code")?;
        let term = store.attr(&category_path, "term")?;
        let title = store.attr(&category_path, "title")?;
        if code.is_some() || term.is_some() || title.is_some() {
            category = Some(EndpointCategory { code, term, title });
        }
    }
    let mut guideline = Vec::new();
    if let Some(field) = store.scalar(&child_path(&note, "guideline"))?
        && let AttrValue::TextList(values) = field.value
    {
        guideline = values;
    }
    Ok(Some(Protocol {
        topcategory,
        category,
        endpoint,
        guideline,
    }))
}

fn read_citation<S: AttributeStore>(store: &S, entry: &str) -> Result<Option<Citation>> {
    let cite = child_path(entry, "reference");
    if !store.exists(&cite) {
        return Ok(None);
    }
    Ok(Some(Citation {
        title: scalar_text(store, &cite, "title")?,
        year: scalar_text(store, &cite, "year")?,
        owner: scalar_text(store, &cite, "owner")?,
    }))
}

fn read_owner<S: AttributeStore>(store: &S, entry: &str) -> Result<Option<SampleLink>> {
    let sample = child_path(entry, "sample");
    if !store.exists(&sample) {
        return Ok(None);
    }
    let uuid = scalar_text(store, &sample, "uuid")?;
    let provider = scalar_text(store, &sample, "provider")?;
    if uuid.is_none() && provider.is_none() {
        return Ok(None);
    }
    let mut link = SampleLink::new(uuid.unwrap_or_default());
    if let Some(provider) = provider {
        link = link.with_company(provider);
    }
    Ok(Some(link))
}

/// Merge the parameter fields of the four bucket groups back into one map,
/// leaving the owner fields of the sample group out.
fn read_parameters<S: AttributeStore>(
    store: &S,
    entry: &str,
    application: &mut ProtocolApplication,
) -> Result<()> {
    for bucket in BUCKET_GROUPS {
        let group = child_path(entry, bucket);
        if !store.exists(&group) {
            continue;
        }
        for name in store.children(&group)? {
            if bucket == "sample" && OWNER_FIELDS.contains(&name.as_str()) {
                continue;
            }
            let Some(field) = store.scalar(&child_path(&group, &name))? else {
                continue;
            };
            if let Some(value) = parameter_value(&field) {
                application.parameters.insert(name, Some(value));
            }
        }
    }
    Ok(())
}

fn parameter_value(field: &FieldNode) -> Option<ConditionValue> {
    match &field.value {
        AttrValue::Text(text) => Some(ConditionValue::Label(text.clone())),
        AttrValue::Float(number) => {
            let lo_value = (!number.is_nan()).then_some(*number);
            Some(ConditionValue::Measure(Value {
                lo_value,
                unit: field.unit.clone(),
                ..Value::default()
            }))
        }
        AttrValue::Int(number) => Some(ConditionValue::Measure(Value {
            lo_value: Some(*number as f64),
            unit: field.unit.clone(),
            ..Value::default()
        })),
        AttrValue::TextList(_) => None,
    }
}

fn scalar_text<S: AttributeStore>(store: &S, base: &str, name: &str) -> Result<Option<String>> {
    Ok(store
        .scalar(&child_path(base, name))?
        .and_then(|field| field.value.as_text().map(str::to_string)))
}
