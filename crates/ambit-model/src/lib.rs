pub mod effect;
pub mod error;
pub mod protocol;
pub mod study;
pub mod table;
pub mod tree;
pub mod value;

pub use effect::{
    ConditionValue, Effect, EffectArray, EffectRecord, EffectResult, PATH_SEPARATOR,
};
pub use error::{AmbitError, Result};
pub use protocol::{Citation, Company, EndpointCategory, Protocol, Sample, SampleLink};
pub use study::{ProtocolApplication, ReferenceSubstance, SubstanceRecord, Substances};
pub use table::{Cell, Column, Table, TableBuilder};
pub use tree::{
    ArrayValues, AttrKey, AttrMap, AttrValue, DataArray, DatasetNode, FieldNode, GroupNode,
    NodeClass, TreeNode, sanitize_name,
};
pub use value::{Value, ValueArray};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_record_builder_normalizes_endpoint() {
        let record = EffectRecord::new("LOG2FC/TOTAL").with_endpointtype("RAW/DATA");
        assert_eq!(record.endpoint, "LOG2FC_TOTAL");
        assert_eq!(record.endpointtype.as_deref(), Some("RAW_DATA"));
    }

    #[test]
    fn group_node_rejects_duplicates() {
        let mut root = GroupNode::root();
        root.insert_group(GroupNode::new("entry_1", NodeClass::Entry).unwrap())
            .unwrap();
        let err = root
            .insert_group(GroupNode::new("entry_1", NodeClass::Entry).unwrap())
            .unwrap_err();
        assert!(matches!(err, AmbitError::DuplicateNode { .. }));
    }
}
