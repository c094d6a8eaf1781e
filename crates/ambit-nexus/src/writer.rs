//! Tree-to-store writer.
//!
//! Serializes an export hierarchy into any [`AttributeStore`], depth first.
//! Group nodes become store groups tagged with their class; dataset nodes
//! become data groups whose arrays are written as named children, with the
//! `signal` and `axes` attributes derived from the dataset at write time.

use ambit_model::{DatasetNode, GroupNode, NodeClass, TreeNode};

use crate::error::Result;
use crate::store::{AttributeStore, child_path};

/// Attribute carrying a group's class tag.
pub const NX_CLASS_ATTR: &str = "NX_class";

/// Attribute naming a data group's response array.
pub const SIGNAL_ATTR: &str = "signal";

/// Attribute listing a data group's axis arrays.
pub const AXES_ATTR: &str = "axes";

/// Write a hierarchy subtree into the store under `base_path`.
///
/// The root node (empty name) lands on `base_path` itself; named nodes
/// land one level below it.
pub fn write_tree<S: AttributeStore>(
    store: &mut S,
    group: &GroupNode,
    base_path: &str,
) -> Result<()> {
    let path = if group.name.is_empty() {
        if base_path.is_empty() {
            "/".to_string()
        } else {
            base_path.to_string()
        }
    } else {
        child_path(base_path, &group.name)
    };
    write_group(store, group, &path)
}

/// Write a substances export at the store root.
pub fn write_substances<S: AttributeStore>(store: &mut S, root: &GroupNode) -> Result<()> {
    write_tree(store, root, "/")
}

fn write_group<S: AttributeStore>(store: &mut S, group: &GroupNode, path: &str) -> Result<()> {
    store.ensure_group(path)?;
    store.set_attr(path, NX_CLASS_ATTR, group.class.as_str())?;
    for (key, value) in group.attrs.iter() {
        store.set_attr(path, &key.render(), &value.render())?;
    }
    for (name, child) in group.children() {
        let child_at = child_path(path, name);
        match child {
            TreeNode::Group(inner) => write_group(store, inner, &child_at)?,
            TreeNode::Dataset(dataset) => write_dataset(store, dataset, &child_at)?,
            TreeNode::Field(field) => store.write_scalar(&child_at, field)?,
        }
    }
    Ok(())
}

fn write_dataset<S: AttributeStore>(
    store: &mut S,
    dataset: &DatasetNode,
    path: &str,
) -> Result<()> {
    store.ensure_group(path)?;
    store.set_attr(path, NX_CLASS_ATTR, NodeClass::Data.as_str())?;
    for (key, value) in dataset.attrs.iter() {
        store.set_attr(path, &key.render(), &value.render())?;
    }
    if let Some(response) = &dataset.response {
        store.set_attr(path, SIGNAL_ATTR, &response.name)?;
        store.write_array(&child_path(path, &response.name), response)?;
    }
    if !dataset.axes.is_empty() {
        store.set_attr(path, AXES_ATTR, &dataset.axis_names().join(","))?;
    }
    for axis in &dataset.axes {
        store.write_array(&child_path(path, &axis.name), axis)?;
    }
    for aux in &dataset.auxiliary {
        store.write_array(&child_path(path, &aux.name), aux)?;
    }
    Ok(())
}
