//! Assembles built datasets into the export tree.
//!
//! One entry per protocol application, one sample node per substance, one
//! root per export call. Placement is
//! `entry[endpointtype][replicate_label][<index>_<endpoint>]` with a single
//! index counter per entry, so sample and control datasets cannot collide.
//! A failed dataset is logged and skipped; a failed substance is logged and
//! its siblings continue; both are recorded in the export report.

use ambit_model::{
    AttrKey, Cell, ConditionValue, DatasetNode, EffectRecord, FieldNode, GroupNode, NodeClass,
    ProtocolApplication, SubstanceRecord, Substances, Table,
};
use regex::Regex;
use tracing::warn;

use crate::classify::classify_populations;
use crate::convention::{
    CONDITION_EXPERIMENT, CONDITION_REPLICATE, CONTROL_PREFIX, DEFAULT_LABEL, lo_value_column,
};
use crate::dataset::{array_dataset, build_dataset, dataset_endpointtype};
use crate::error::{ExportError, Result};
use crate::groups::{group_rows, render_key};
use crate::options::ExportOptions;
use crate::params::{
    END_DATE_PARAMETER, ParamBucket, START_DATE_PARAMETER, classify_parameter,
};
use crate::tabulate::tabulate_effects;

/// One dataset dropped under the partial-result policy.
#[derive(Debug)]
pub struct SkippedDataset {
    pub entry: String,
    pub group: String,
    pub error: ExportError,
}

/// One substance whose export was abandoned.
#[derive(Debug)]
pub struct FailedSubstance {
    pub substance: String,
    pub error: ExportError,
}

/// What the export had to leave out. Inspect before publishing the tree.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub skipped_datasets: Vec<SkippedDataset>,
    pub failed_substances: Vec<FailedSubstance>,
}

impl ExportReport {
    pub fn is_clean(&self) -> bool {
        self.skipped_datasets.is_empty() && self.failed_substances.is_empty()
    }
}

/// The assembled tree plus the report of everything skipped on the way.
#[derive(Debug)]
pub struct ExportTree {
    pub root: GroupNode,
    pub report: ExportReport,
}

/// Walks applications/substances and places their datasets and metadata.
/// State is one report per export call; the builder owns nothing else.
pub struct HierarchyBuilder<'a> {
    options: &'a ExportOptions,
    report: ExportReport,
}

impl<'a> HierarchyBuilder<'a> {
    pub fn new(options: &'a ExportOptions) -> Self {
        Self {
            options,
            report: ExportReport::default(),
        }
    }

    pub fn report(&self) -> &ExportReport {
        &self.report
    }

    pub fn into_report(self) -> ExportReport {
        self.report
    }

    /// Builds the entry node for one protocol application: identity fields,
    /// then every dataset both populations yield, then the metadata phases.
    /// Grouping and metadata failures abort the entry; single-dataset
    /// failures are recorded and skipped.
    pub fn build_entry(&mut self, application: &ProtocolApplication) -> Result<GroupNode> {
        let name = entry_key(application);
        let mut entry = GroupNode::new(&name, NodeClass::Entry)?;
        entry.insert_field(FieldNode::new(
            "entry_identifier_uuid",
            application.uuid.as_str(),
        ))?;
        entry.insert_field(FieldNode::new("definition", "ProtocolApplication"))?;
        if let Some(investigation) = &application.investigation_uuid {
            entry.insert_field(FieldNode::new("collection_identifier", investigation.as_str()))?;
        }
        if let Some(assay) = &application.assay_uuid {
            entry.insert_field(FieldNode::new("experiment_identifier", assay.as_str()))?;
        }
        if let Some(updated) = &application.updated {
            entry.insert_field(FieldNode::new("updated", updated.as_str()))?;
        }

        let mut dataset_index = 0usize;
        self.place_record_datasets(&mut entry, &name, application, &mut dataset_index)?;
        place_array_datasets(&mut entry, application, &mut dataset_index)?;

        attach_protocol(&mut entry, application)
            .map_err(|source| ExportError::metadata("protocol", source))?;
        attach_citation(&mut entry, application)
            .map_err(|source| ExportError::metadata("citation", source))?;
        attach_parameters(&mut entry, application)
            .map_err(|source| ExportError::metadata("parameters", source))?;
        attach_owner(&mut entry, application)
            .map_err(|source| ExportError::metadata("owner", source))?;
        Ok(entry)
    }

    fn place_record_datasets(
        &mut self,
        entry: &mut GroupNode,
        entry_name: &str,
        application: &ProtocolApplication,
        index: &mut usize,
    ) -> Result<()> {
        let records: Vec<(usize, &EffectRecord)> = application.effect_records().collect();
        if records.is_empty() {
            return Ok(());
        }
        let effects = tabulate_effects(&records);
        let populations =
            classify_populations(&effects.table, self.options.distinguished_condition());

        self.place_population(
            entry,
            entry_name,
            &populations.samples,
            &effects.condition_columns,
            false,
            index,
        )?;
        if let Some(controls) = &populations.controls {
            self.place_population(
                entry,
                entry_name,
                controls,
                &effects.condition_columns,
                true,
                index,
            )?;
        }
        Ok(())
    }

    fn place_population(
        &mut self,
        entry: &mut GroupNode,
        entry_name: &str,
        table: &Table,
        condition_columns: &[String],
        control: bool,
        index: &mut usize,
    ) -> Result<()> {
        if table.is_empty() {
            return Ok(());
        }
        let groups = group_rows(table, self.options)?;
        for (key, rows) in &groups.groups {
            match build_dataset(
                table,
                &groups.selected,
                key,
                rows,
                condition_columns,
                self.options,
            ) {
                Ok(dataset) => {
                    let label = replicate_label(table, rows);
                    place_dataset(entry, dataset, &label, *index, control)?;
                }
                Err(error) => {
                    warn!(
                        entry = entry_name,
                        group = %render_key(key),
                        error = %error,
                        "skipping dataset"
                    );
                    self.report.skipped_datasets.push(SkippedDataset {
                        entry: entry_name.to_string(),
                        group: render_key(key),
                        error,
                    });
                }
            }
            *index += 1;
        }
        Ok(())
    }

    /// Builds the sample node for one substance and the entries of its
    /// study. Requires a usable substance uuid; any entry failure abandons
    /// the substance.
    pub fn build_substance(&mut self, substance: &SubstanceRecord) -> Result<GroupNode> {
        let uuid = substance
            .i5uuid
            .as_deref()
            .filter(|value| !value.is_empty())
            .ok_or(ExportError::MissingSubstanceId)?;
        let mut node = GroupNode::new(uuid, NodeClass::Sample)?;
        set_custom_attr(&mut node, "name", substance.name.as_deref());
        set_custom_attr(&mut node, "publicname", substance.publicname.as_deref());
        set_custom_attr(&mut node, "ownerName", substance.owner_name.as_deref());
        set_custom_attr(&mut node, "substanceType", substance.substance_type.as_deref());
        for application in &substance.study {
            let entry = self.build_entry(application)?;
            node.insert_group(entry)?;
        }
        Ok(node)
    }

    /// Exports all substances under one root. A substance that fails is
    /// recorded and skipped, its siblings continue.
    pub fn build_substances(&mut self, substances: &Substances) -> Result<GroupNode> {
        let mut root = GroupNode::root();
        let collection = root.ensure_group("substance", NodeClass::Collection)?;
        for (position, substance) in substances.substance.iter().enumerate() {
            match self.build_substance(substance) {
                Ok(node) => {
                    if let Err(error) = collection.insert_group(node) {
                        self.record_failed_substance(substance, position, error.into());
                    }
                }
                Err(error) => self.record_failed_substance(substance, position, error),
            }
        }
        Ok(root)
    }

    fn record_failed_substance(
        &mut self,
        substance: &SubstanceRecord,
        position: usize,
        error: ExportError,
    ) {
        let label = substance
            .i5uuid
            .clone()
            .or_else(|| substance.name.clone())
            .unwrap_or_else(|| format!("substance_{position}"));
        warn!(substance = %label, error = %error, "skipping substance export");
        self.report
            .failed_substances
            .push(FailedSubstance {
                substance: label,
                error,
            });
    }
}

/// Exports one protocol application as a root with a single entry.
pub fn export_application(
    application: &ProtocolApplication,
    options: &ExportOptions,
) -> Result<ExportTree> {
    let mut builder = HierarchyBuilder::new(options);
    let entry = builder.build_entry(application)?;
    let mut root = GroupNode::root();
    root.insert_group(entry)?;
    Ok(ExportTree {
        root,
        report: builder.into_report(),
    })
}

/// Exports one substance under the usual `substance` collection group.
pub fn export_substance(
    substance: &SubstanceRecord,
    options: &ExportOptions,
) -> Result<ExportTree> {
    let mut builder = HierarchyBuilder::new(options);
    let node = builder.build_substance(substance)?;
    let mut root = GroupNode::root();
    let collection = root.ensure_group("substance", NodeClass::Collection)?;
    collection.insert_group(node)?;
    Ok(ExportTree {
        root,
        report: builder.into_report(),
    })
}

/// Exports a whole collection; per-substance failures land in the report.
pub fn export_substances(
    substances: &Substances,
    options: &ExportOptions,
) -> Result<ExportTree> {
    let mut builder = HierarchyBuilder::new(options);
    let root = builder.build_substances(substances)?;
    Ok(ExportTree {
        root,
        report: builder.into_report(),
    })
}

/// Entry node name: `entry_<topcategory>.<code>_<owner>_<uuid>` when the
/// protocol and citation carry all three parts, `entry_<uuid>` otherwise.
/// Never fails over a naming preference.
pub fn entry_key(application: &ProtocolApplication) -> String {
    compound_entry_key(application)
        .unwrap_or_else(|| format!("entry_{}", application.uuid))
}

fn compound_entry_key(application: &ProtocolApplication) -> Option<String> {
    let protocol = application.protocol.as_ref()?;
    let topcategory = protocol
        .topcategory
        .as_deref()
        .filter(|value| !value.is_empty())?;
    let code = protocol
        .category
        .as_ref()?
        .code
        .as_deref()
        .filter(|value| !value.is_empty())?;
    let owner = application
        .citation
        .as_ref()?
        .owner
        .as_deref()
        .filter(|value| !value.is_empty())?;
    Some(format!(
        "entry_{topcategory}.{code}_{owner}_{}",
        application.uuid
    ))
}

fn place_dataset(
    entry: &mut GroupNode,
    mut dataset: DatasetNode,
    replicate: &str,
    index: usize,
    control: bool,
) -> Result<()> {
    let endpointtype = dataset_endpointtype(&dataset);
    let name = if control {
        format!("{CONTROL_PREFIX}_{index}_{}", dataset.name)
    } else {
        format!("{index}_{}", dataset.name)
    };
    dataset.set_name(&name);
    let type_group = entry.ensure_group(&endpointtype, NodeClass::Group)?;
    let replicate_group = type_group.ensure_group(replicate, NodeClass::Group)?;
    replicate_group.insert_dataset(dataset)?;
    Ok(())
}

fn place_array_datasets(
    entry: &mut GroupNode,
    application: &ProtocolApplication,
    index: &mut usize,
) -> Result<()> {
    for effect in &application.effects {
        if let Some(array) = effect.as_array() {
            place_dataset(entry, array_dataset(array), DEFAULT_LABEL, *index, false)?;
            *index += 1;
        }
    }
    Ok(())
}

/// Replicate bucket of one group: `E<e>_R<r>` / `E<e>` / `R<r>` when the
/// experiment/replicate columns hold exactly one distinct value over the
/// group's rows, the default sentinel otherwise.
fn replicate_label(table: &Table, rows: &[usize]) -> String {
    let experiment = distinct_value(table, CONDITION_EXPERIMENT, rows);
    let replicate = distinct_value(table, CONDITION_REPLICATE, rows);
    match (experiment, replicate) {
        (Some(e), Some(r)) => format!("E{e}_R{r}"),
        (Some(e), None) => format!("E{e}"),
        (None, Some(r)) => format!("R{r}"),
        (None, None) => DEFAULT_LABEL.to_string(),
    }
}

fn distinct_value(table: &Table, condition: &str, rows: &[usize]) -> Option<String> {
    let column = table
        .column(condition)
        .or_else(|| table.column(&lo_value_column(condition)))?;
    let mut distinct: Option<String> = None;
    for &row in rows {
        let cell = &column.cells[row];
        if cell.is_missing() {
            continue;
        }
        let rendered = render_integral(cell);
        match &distinct {
            None => distinct = Some(rendered),
            Some(existing) if *existing == rendered => {}
            Some(_) => return None,
        }
    }
    distinct
}

fn render_integral(cell: &Cell) -> String {
    match cell {
        Cell::Number(value) if value.is_finite() && value.fract() == 0.0 => {
            format!("{}", *value as i64)
        }
        other => other.render(),
    }
}

fn attach_protocol(
    entry: &mut GroupNode,
    application: &ProtocolApplication,
) -> ambit_model::Result<()> {
    let Some(protocol) = &application.protocol else {
        return Ok(());
    };
    let note = entry.ensure_group("experiment_documentation", NodeClass::Note)?;
    let category = note.ensure_group("category", NodeClass::Group)?;
    if let Some(topcategory) = &protocol.topcategory {
        category
            .attrs
            .set(AttrKey::Custom("topcategory".to_string()), topcategory.as_str());
    }
    if let Some(endpoint_category) = &protocol.category {
        if let Some(code) = &endpoint_category.code {
            category.attrs.set(AttrKey::Custom("code".to_string()), code.as_str());
        }
        if let Some(term) = &endpoint_category.term {
            category.attrs.set(AttrKey::Custom("term".to_string()), term.as_str());
        }
        if let Some(title) = &endpoint_category.title {
            category.attrs.set(AttrKey::Custom("title".to_string()), title.as_str());
        }
    }
    if let Some(endpoint) = &protocol.endpoint {
        category.attrs.set(AttrKey::Endpoint, endpoint.as_str());
    }
    if !protocol.guideline.is_empty() {
        note.insert_field(FieldNode::new("guideline", protocol.guideline.clone()))?;
    }
    Ok(())
}

fn attach_citation(
    entry: &mut GroupNode,
    application: &ProtocolApplication,
) -> ambit_model::Result<()> {
    let Some(citation) = &application.citation else {
        return Ok(());
    };
    let cite = entry.ensure_group("reference", NodeClass::Cite)?;
    if let Some(title) = &citation.title {
        cite.insert_field(FieldNode::new("title", title.as_str()))?;
        if let Some(doi) = extract_doi(title) {
            cite.insert_field(FieldNode::new("doi", doi))?;
        }
    }
    if let Some(year) = &citation.year {
        cite.insert_field(FieldNode::new("year", year.as_str()))?;
    }
    if let Some(owner) = &citation.owner {
        cite.insert_field(FieldNode::new("owner", owner.as_str()))?;
    }
    Ok(())
}

/// Pulls a DOI out of free text (citation titles routinely embed one).
pub fn extract_doi(text: &str) -> Option<String> {
    let found = Regex::new(r"10\.\d{4,9}/\S+")
        .ok()
        .and_then(|pattern| pattern.find(text).map(|m| m.as_str().to_string()))?;
    Some(found.trim_end_matches(['.', ',']).to_string())
}

fn attach_parameters(
    entry: &mut GroupNode,
    application: &ProtocolApplication,
) -> ambit_model::Result<()> {
    entry.ensure_group("instrument", NodeClass::Instrument)?;
    entry.ensure_group("sample", NodeClass::Sample)?;
    entry.ensure_group("environment", NodeClass::Environment)?;
    entry.ensure_group("parameters", NodeClass::Collection)?;

    for (name, value) in &application.parameters {
        let Some(value) = value else {
            continue;
        };
        if name == START_DATE_PARAMETER || name == END_DATE_PARAMETER {
            if let Some(label) = value.as_label() {
                let field = if name == START_DATE_PARAMETER {
                    "start_time"
                } else {
                    "end_time"
                };
                entry.insert_field(FieldNode::new(field, label))?;
            }
            continue;
        }
        let (group_name, class) = match classify_parameter(name) {
            ParamBucket::Instrument => ("instrument", NodeClass::Instrument),
            ParamBucket::Sample => ("sample", NodeClass::Sample),
            ParamBucket::Environment => ("environment", NodeClass::Environment),
            ParamBucket::Other => ("parameters", NodeClass::Collection),
        };
        let group = entry.ensure_group(group_name, class)?;
        match value {
            ConditionValue::Label(label) => {
                group.insert_field(FieldNode::new(name, label.as_str()))?;
            }
            ConditionValue::Measure(measure) => {
                let mut field = FieldNode::new(name, measure.lo_value.unwrap_or(f64::NAN));
                if let Some(unit) = &measure.unit {
                    field = field.with_unit(unit);
                }
                group.insert_field(field)?;
            }
        }
    }
    Ok(())
}

fn attach_owner(
    entry: &mut GroupNode,
    application: &ProtocolApplication,
) -> ambit_model::Result<()> {
    let Some(owner) = &application.owner else {
        return Ok(());
    };
    let sample = entry.ensure_group("sample", NodeClass::Sample)?;
    if !owner.substance.uuid.is_empty() {
        sample.insert_field(FieldNode::new("uuid", owner.substance.uuid.as_str()))?;
    }
    if let Some(company) = &owner.company
        && let Some(name) = &company.name
    {
        sample.insert_field(FieldNode::new("provider", name.as_str()))?;
    }
    Ok(())
}

fn set_custom_attr(node: &mut GroupNode, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|value| !value.is_empty()) {
        node.attrs.set(AttrKey::Custom(key.to_string()), value);
    }
}
