//! Tests for hierarchy tree nodes.

use ambit_model::{
    AttrKey, DataArray, DatasetNode, FieldNode, GroupNode, NodeClass, sanitize_name,
};

#[test]
fn names_are_sanitized() {
    assert_eq!(sanitize_name("ENDPOINT/RAW"), "ENDPOINT_RAW");
    assert_eq!(sanitize_name("  spaced  "), "spaced");
    let dataset = DatasetNode::new("1_LOG2FC/TOTAL");
    assert_eq!(dataset.name, "1_LOG2FC_TOTAL");
}

#[test]
fn empty_name_is_rejected() {
    assert!(GroupNode::new("", NodeClass::Entry).is_err());
    assert!(GroupNode::new("  ", NodeClass::Entry).is_err());
}

#[test]
fn ensure_group_is_get_or_create() {
    let mut root = GroupNode::root();
    {
        let entry = root.ensure_group("entry_1", NodeClass::Entry).unwrap();
        entry
            .insert_field(FieldNode::new("definition", "ProtocolApplication"))
            .unwrap();
    }
    let again = root.ensure_group("entry_1", NodeClass::Entry).unwrap();
    assert_eq!(again.len(), 1);
    assert_eq!(root.len(), 1);
}

#[test]
fn ensure_group_refuses_non_group_child() {
    let mut root = GroupNode::root();
    root.insert_field(FieldNode::new("definition", "x")).unwrap();
    assert!(root.ensure_group("definition", NodeClass::Group).is_err());
}

#[test]
fn render_outlines_datasets() {
    let mut root = GroupNode::root();
    let entry = root.ensure_group("entry_1", NodeClass::Entry).unwrap();
    let bucket = entry.ensure_group("DEFAULT", NodeClass::Group).unwrap();
    let mut dataset = DatasetNode::new("1_LC50");
    dataset.response = Some(DataArray::floats("LC50", Some("mg/L".to_string()), vec![1.0, 2.0]));
    dataset
        .axes
        .push(DataArray::floats("CONCENTRATION", Some("mg/L".to_string()), vec![0.1, 0.2]));
    dataset.attrs.set(AttrKey::Endpoint, "LC50");
    dataset
        .attrs
        .set(AttrKey::AxisIndices("CONCENTRATION".to_string()), 0i64);
    bucket.insert_dataset(dataset).unwrap();

    let outline = root.render();
    assert!(outline.contains("entry_1 [NXentry]"));
    assert!(outline.contains("1_LC50 [NXdata]"));
    assert!(outline.contains("@CONCENTRATION_indices = 0"));
    assert!(outline.contains("signal LC50 [mg/L] x2"));
    assert!(outline.contains("axis CONCENTRATION [mg/L] x2"));
}
