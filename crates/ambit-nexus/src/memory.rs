//! Deterministic in-memory attribute store.

use std::collections::BTreeMap;

use ambit_model::{DataArray, FieldNode};

use crate::error::{Result, StoreError};
use crate::store::{AttributeStore, StoredKind, child_path, split_path};

#[derive(Debug, Clone)]
enum Node {
    Group { attrs: BTreeMap<String, String> },
    Array(DataArray),
    Scalar(FieldNode),
}

impl Node {
    fn group() -> Self {
        Node::Group {
            attrs: BTreeMap::new(),
        }
    }

    fn kind(&self) -> StoredKind {
        match self {
            Node::Group { .. } => StoredKind::Group,
            Node::Array(_) => StoredKind::Array,
            Node::Scalar(_) => StoredKind::Scalar,
        }
    }
}

/// In-memory attribute store keyed by full path.
///
/// Paths iterate in lexicographic order regardless of write order, so the
/// same tree always dumps the same way. Used by the tests and by dry-run
/// exports that want the container layout without a container library.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    nodes: BTreeMap<String, Node>,
}

impl MemoryStore {
    /// Create a store holding only the root group.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Node::group());
        Self { nodes }
    }

    /// All stored paths in sorted order, the root included.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// The array stored at `path`, if any.
    pub fn array(&self, path: &str) -> Option<&DataArray> {
        match self.nodes.get(path) {
            Some(Node::Array(array)) => Some(array),
            _ => None,
        }
    }

    fn require_group(&self, path: &str) -> Result<()> {
        match self.nodes.get(path) {
            Some(Node::Group { .. }) => Ok(()),
            Some(_) => Err(StoreError::not_a_group(path)),
            None => Err(StoreError::missing(path)),
        }
    }

    fn insert_leaf(&mut self, path: &str, node: Node) -> Result<()> {
        split_path(path)?;
        if let Some(existing) = self.nodes.get(path) {
            return Err(StoreError::occupied(path, existing.kind().as_str()));
        }
        self.require_group(parent_of(path))?;
        self.nodes.insert(path.to_string(), node);
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeStore for MemoryStore {
    fn ensure_group(&mut self, path: &str) -> Result<()> {
        let segments = split_path(path)?;
        let mut current = String::from("/");
        for segment in segments {
            current = child_path(&current, segment);
            match self.nodes.get(&current) {
                Some(Node::Group { .. }) => {}
                Some(node) => {
                    return Err(StoreError::occupied(current, node.kind().as_str()));
                }
                None => {
                    self.nodes.insert(current.clone(), Node::group());
                }
            }
        }
        Ok(())
    }

    fn set_attr(&mut self, path: &str, key: &str, value: &str) -> Result<()> {
        split_path(path)?;
        match self.nodes.get_mut(path) {
            Some(Node::Group { attrs }) => {
                attrs.insert(key.to_string(), value.to_string());
                Ok(())
            }
            Some(_) => Err(StoreError::not_a_group(path)),
            None => Err(StoreError::missing(path)),
        }
    }

    fn attr(&self, path: &str, key: &str) -> Result<Option<String>> {
        split_path(path)?;
        match self.nodes.get(path) {
            Some(Node::Group { attrs }) => Ok(attrs.get(key).cloned()),
            Some(_) => Err(StoreError::not_a_group(path)),
            None => Err(StoreError::missing(path)),
        }
    }

    fn write_array(&mut self, path: &str, array: &DataArray) -> Result<()> {
        self.insert_leaf(path, Node::Array(array.clone()))
    }

    fn write_scalar(&mut self, path: &str, field: &FieldNode) -> Result<()> {
        self.insert_leaf(path, Node::Scalar(field.clone()))
    }

    fn scalar(&self, path: &str) -> Result<Option<FieldNode>> {
        split_path(path)?;
        match self.nodes.get(path) {
            Some(Node::Scalar(field)) => Ok(Some(field.clone())),
            _ => Ok(None),
        }
    }

    fn children(&self, path: &str) -> Result<Vec<String>> {
        split_path(path)?;
        self.require_group(path)?;
        let prefix = if path == "/" {
            "/".to_string()
        } else {
            format!("{path}/")
        };
        let mut names = Vec::new();
        for key in self.nodes.range(prefix.clone()..).map(|(key, _)| key) {
            if !key.starts_with(prefix.as_str()) {
                break;
            }
            // the root key is its own prefix and is not a child of itself
            let rest = &key[prefix.len()..];
            if !rest.is_empty() && !rest.contains('/') {
                names.push(rest.to_string());
            }
        }
        Ok(names)
    }

    fn kind(&self, path: &str) -> Option<StoredKind> {
        self.nodes.get(path).map(Node::kind)
    }
}

fn parent_of(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some(("", _)) | None => "/",
        Some((parent, _)) => parent,
    }
}
