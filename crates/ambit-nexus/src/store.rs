//! Store interface shared by hierarchical-container backends.

use ambit_model::{DataArray, FieldNode};

use crate::error::{Result, StoreError};

/// What occupies a store path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredKind {
    Group,
    Array,
    Scalar,
}

impl StoredKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StoredKind::Group => "group",
            StoredKind::Array => "array",
            StoredKind::Scalar => "scalar",
        }
    }
}

/// Boundary to a hierarchical attribute container.
///
/// Paths are absolute, slash separated and rooted at `/`. Groups nest;
/// arrays and scalars are leaves inside a group. Attributes are
/// string-keyed strings attached to a group.
pub trait AttributeStore {
    /// Create the group at `path`, along with any missing parents.
    /// Existing groups are left untouched.
    fn ensure_group(&mut self, path: &str) -> Result<()>;

    /// Set an attribute on the group at `path`, replacing any prior value.
    fn set_attr(&mut self, path: &str, key: &str, value: &str) -> Result<()>;

    /// Read an attribute from the group at `path`.
    fn attr(&self, path: &str, key: &str) -> Result<Option<String>>;

    /// Write a named per-point array at `path`.
    fn write_array(&mut self, path: &str, array: &DataArray) -> Result<()>;

    /// Write a scalar field at `path`.
    fn write_scalar(&mut self, path: &str, field: &FieldNode) -> Result<()>;

    /// Read back the scalar field at `path`, if one is stored there.
    fn scalar(&self, path: &str) -> Result<Option<FieldNode>>;

    /// Names of the direct children of the group at `path`.
    fn children(&self, path: &str) -> Result<Vec<String>>;

    /// What occupies `path`, if anything.
    fn kind(&self, path: &str) -> Option<StoredKind>;

    /// Whether any node occupies `path`.
    fn exists(&self, path: &str) -> bool {
        self.kind(path).is_some()
    }
}

/// Join a child name onto a base path.
pub fn child_path(base: &str, name: &str) -> String {
    if base.is_empty() || base == "/" {
        format!("/{name}")
    } else {
        format!("{base}/{name}")
    }
}

/// Split an absolute path into its segments; the root path has none.
pub(crate) fn split_path(path: &str) -> Result<Vec<&str>> {
    if path == "/" {
        return Ok(Vec::new());
    }
    let rest = path
        .strip_prefix('/')
        .ok_or_else(|| StoreError::invalid_path(path))?;
    if rest.is_empty() {
        return Err(StoreError::invalid_path(path));
    }
    let segments: Vec<&str> = rest.split('/').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(StoreError::invalid_path(path));
    }
    Ok(segments)
}
