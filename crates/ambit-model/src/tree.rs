use std::fmt;
use std::fmt::Write as _;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::effect::PATH_SEPARATOR;
use crate::error::{AmbitError, Result};

/// Replaces path separators so a raw label can name a node.
pub fn sanitize_name(raw: &str) -> String {
    raw.trim().replace(PATH_SEPARATOR, "_")
}

fn valid_name(raw: &str) -> Result<String> {
    let name = sanitize_name(raw);
    if name.is_empty() {
        return Err(AmbitError::InvalidName {
            name: raw.to_string(),
        });
    }
    Ok(name)
}

/// Container class tag carried by every group node so the written container
/// is self-describing (NeXus base-class vocabulary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeClass {
    Root,
    Entry,
    Data,
    Cite,
    Instrument,
    Sample,
    Environment,
    Collection,
    Note,
    Group,
}

impl NodeClass {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeClass::Root => "NXroot",
            NodeClass::Entry => "NXentry",
            NodeClass::Data => "NXdata",
            NodeClass::Cite => "NXcite",
            NodeClass::Instrument => "NXinstrument",
            NodeClass::Sample => "NXsample",
            NodeClass::Environment => "NXenvironment",
            NodeClass::Collection => "NXcollection",
            NodeClass::Note => "NXnote",
            NodeClass::Group => "NXgroup",
        }
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node attribute keys: the enumerated contract keys consumers rely on,
/// plus an open extension for protocol-specific metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrKey {
    Endpoint,
    EndpointType,
    Unit,
    /// `<axis>_indices`, marking which axis indexes the response.
    AxisIndices(String),
    AuxiliarySignals,
    Custom(String),
}

impl AttrKey {
    pub fn render(&self) -> String {
        match self {
            AttrKey::Endpoint => "endpoint".to_string(),
            AttrKey::EndpointType => "endpointtype".to_string(),
            AttrKey::Unit => "unit".to_string(),
            AttrKey::AxisIndices(axis) => format!("{axis}_indices"),
            AttrKey::AuxiliarySignals => "auxiliary_signals".to_string(),
            AttrKey::Custom(key) => key.clone(),
        }
    }
}

impl Serialize for AttrKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Int(i64),
    Float(f64),
    TextList(Vec<String>),
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn render(&self) -> String {
        match self {
            AttrValue::Text(value) => value.clone(),
            AttrValue::Int(value) => value.to_string(),
            AttrValue::Float(value) => value.to_string(),
            AttrValue::TextList(values) => values.join(","),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(values: Vec<String>) -> Self {
        AttrValue::TextList(values)
    }
}

/// Insertion-ordered attribute map attached to tree nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AttrMap(IndexMap<AttrKey, AttrValue>);

impl AttrMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: AttrKey, value: impl Into<AttrValue>) {
        self.0.insert(key, value.into());
    }

    pub fn get(&self, key: &AttrKey) -> Option<&AttrValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttrKey, &AttrValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArrayValues {
    Floats(Vec<f64>),
    Ints(Vec<i64>),
    Text(Vec<String>),
}

impl ArrayValues {
    pub fn len(&self) -> usize {
        match self {
            ArrayValues::Floats(values) => values.len(),
            ArrayValues::Ints(values) => values.len(),
            ArrayValues::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named per-point array: a response, an axis or an auxiliary signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataArray {
    pub name: String,
    pub unit: Option<String>,
    pub values: ArrayValues,
}

impl DataArray {
    pub fn floats(name: &str, unit: Option<String>, values: Vec<f64>) -> Self {
        Self {
            name: sanitize_name(name),
            unit,
            values: ArrayValues::Floats(values),
        }
    }

    pub fn ints(name: &str, values: Vec<i64>) -> Self {
        Self {
            name: sanitize_name(name),
            unit: None,
            values: ArrayValues::Ints(values),
        }
    }

    pub fn text(name: &str, values: Vec<String>) -> Self {
        Self {
            name: sanitize_name(name),
            unit: None,
            values: ArrayValues::Text(values),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One plotted dataset: a response, its axes, auxiliary signals and the
/// attribute map consumers use to interpret them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DatasetNode {
    pub name: String,
    pub response: Option<DataArray>,
    pub axes: Vec<DataArray>,
    pub auxiliary: Vec<DataArray>,
    pub attrs: AttrMap,
}

impl DatasetNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: sanitize_name(name),
            ..Self::default()
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = sanitize_name(name);
    }

    pub fn axis_names(&self) -> Vec<String> {
        self.axes.iter().map(|axis| axis.name.clone()).collect()
    }

    pub fn auxiliary_names(&self) -> Vec<String> {
        self.auxiliary.iter().map(|aux| aux.name.clone()).collect()
    }
}

/// A scalar leaf (identifier, citation field, bucketed parameter).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldNode {
    pub name: String,
    pub value: AttrValue,
    pub unit: Option<String>,
}

impl FieldNode {
    pub fn new(name: &str, value: impl Into<AttrValue>) -> Self {
        Self {
            name: sanitize_name(name),
            value: value.into(),
            unit: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TreeNode {
    Group(GroupNode),
    Dataset(DatasetNode),
    Field(FieldNode),
}

impl TreeNode {
    pub fn as_group(&self) -> Option<&GroupNode> {
        match self {
            TreeNode::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_dataset(&self) -> Option<&DatasetNode> {
        match self {
            TreeNode::Dataset(dataset) => Some(dataset),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<&FieldNode> {
        match self {
            TreeNode::Field(field) => Some(field),
            _ => None,
        }
    }
}

/// An interior node of the export hierarchy. Children are name-keyed in
/// insertion order; duplicate or empty names are rejected at insert time.
#[derive(Debug, Clone, Serialize)]
pub struct GroupNode {
    pub name: String,
    pub class: NodeClass,
    pub attrs: AttrMap,
    children: IndexMap<String, TreeNode>,
}

impl GroupNode {
    pub fn new(name: &str, class: NodeClass) -> Result<Self> {
        Ok(Self {
            name: valid_name(name)?,
            class,
            attrs: AttrMap::new(),
            children: IndexMap::new(),
        })
    }

    pub fn root() -> Self {
        Self {
            name: String::new(),
            class: NodeClass::Root,
            attrs: AttrMap::new(),
            children: IndexMap::new(),
        }
    }

    fn insert(&mut self, name: String, node: TreeNode) -> Result<()> {
        if self.children.contains_key(&name) {
            return Err(AmbitError::DuplicateNode { name });
        }
        self.children.insert(name, node);
        Ok(())
    }

    pub fn insert_group(&mut self, group: GroupNode) -> Result<()> {
        self.insert(group.name.clone(), TreeNode::Group(group))
    }

    pub fn insert_dataset(&mut self, dataset: DatasetNode) -> Result<()> {
        let name = valid_name(&dataset.name)?;
        self.insert(name, TreeNode::Dataset(dataset))
    }

    pub fn insert_field(&mut self, field: FieldNode) -> Result<()> {
        let name = valid_name(&field.name)?;
        self.insert(name, TreeNode::Field(field))
    }

    /// Returns the named child group, creating it when absent. Fails if the
    /// name is taken by a non-group child.
    pub fn ensure_group(&mut self, name: &str, class: NodeClass) -> Result<&mut GroupNode> {
        let key = valid_name(name)?;
        if !self.children.contains_key(&key) {
            let group = GroupNode {
                name: key.clone(),
                class,
                attrs: AttrMap::new(),
                children: IndexMap::new(),
            };
            self.children.insert(key.clone(), TreeNode::Group(group));
        }
        match self.children.get_mut(&key) {
            Some(TreeNode::Group(group)) => Ok(group),
            _ => Err(AmbitError::DuplicateNode { name: key }),
        }
    }

    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children.get(name)
    }

    pub fn child_group(&self, name: &str) -> Option<&GroupNode> {
        self.children.get(name).and_then(TreeNode::as_group)
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &TreeNode)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Indented text outline of the subtree, for diagnostics and snapshots.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(0, &mut out);
        out
    }

    fn render_into(&self, depth: usize, out: &mut String) {
        let label = if self.name.is_empty() { "/" } else { &self.name };
        let _ = writeln!(out, "{}{label} [{}]", indent(depth), self.class);
        render_attrs(&self.attrs, depth + 1, out);
        for (_, node) in self.children.iter() {
            match node {
                TreeNode::Group(group) => group.render_into(depth + 1, out),
                TreeNode::Dataset(dataset) => render_dataset(dataset, depth + 1, out),
                TreeNode::Field(field) => render_field(field, depth + 1, out),
            }
        }
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn render_attrs(attrs: &AttrMap, depth: usize, out: &mut String) {
    for (key, value) in attrs.iter() {
        let _ = writeln!(out, "{}@{} = {}", indent(depth), key.render(), value.render());
    }
}

fn render_array(kind: &str, array: &DataArray, depth: usize, out: &mut String) {
    let unit = array.unit.as_deref().unwrap_or("-");
    let _ = writeln!(
        out,
        "{}{kind} {} [{unit}] x{}",
        indent(depth),
        array.name,
        array.len()
    );
}

fn render_dataset(dataset: &DatasetNode, depth: usize, out: &mut String) {
    let _ = writeln!(out, "{}{} [{}]", indent(depth), dataset.name, NodeClass::Data);
    render_attrs(&dataset.attrs, depth + 1, out);
    if let Some(response) = &dataset.response {
        render_array("signal", response, depth + 1, out);
    }
    for axis in &dataset.axes {
        render_array("axis", axis, depth + 1, out);
    }
    for aux in &dataset.auxiliary {
        render_array("aux", aux, depth + 1, out);
    }
}

fn render_field(field: &FieldNode, depth: usize, out: &mut String) {
    match &field.unit {
        Some(unit) => {
            let _ = writeln!(
                out,
                "{}{} = {} [{unit}]",
                indent(depth),
                field.name,
                field.value.render()
            );
        }
        None => {
            let _ = writeln!(
                out,
                "{}{} = {}",
                indent(depth),
                field.name,
                field.value.render()
            );
        }
    }
}
