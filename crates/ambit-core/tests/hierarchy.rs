//! End-to-end tests for hierarchy assembly: placement, naming, metadata
//! attachment and the partial-result policy.

use ambit_core::{
    ExportOptions, SpectrumMeta, entry_key, export_application, export_substances,
    raman_spectrum, spectrum_application,
};
use ambit_model::{
    Citation, EffectRecord, EffectResult, EndpointCategory, GroupNode, NodeClass, Protocol,
    ProtocolApplication, SampleLink, SubstanceRecord, Substances, TreeNode, Value,
};

fn lc50(lo_value: f64, unit: &str, concentration: f64) -> EffectRecord {
    EffectRecord::new("LC50")
        .with_result(EffectResult::measured(lo_value, unit))
        .with_condition("CONCENTRATION", Value::new(concentration, "mg/L"))
}

fn entry_of(root: &GroupNode, application: &ProtocolApplication) -> GroupNode {
    root.child_group(&entry_key(application))
        .expect("entry present")
        .clone()
}

fn field_text(group: &GroupNode, name: &str) -> String {
    match group.child(name) {
        Some(TreeNode::Field(field)) => field.value.render(),
        other => panic!("expected field {name}, got {other:?}"),
    }
}

#[test]
fn entry_key_combines_category_and_owner_with_uuid_fallback() {
    let full = ProtocolApplication::new("PA-1")
        .with_protocol(
            Protocol::new("EC_ALGAETOX")
                .with_topcategory("TOX")
                .with_category(EndpointCategory::new("EC_ALGAETOX_SECTION")),
        )
        .with_citation(Citation::new("IDEA"));
    assert_eq!(entry_key(&full), "entry_TOX.EC_ALGAETOX_SECTION_IDEA_PA-1");

    let bare = ProtocolApplication::new("PA-2");
    assert_eq!(entry_key(&bare), "entry_PA-2");

    let partial = ProtocolApplication::new("PA-3")
        .with_protocol(Protocol::new("EC_ALGAETOX").with_topcategory("TOX"));
    assert_eq!(entry_key(&partial), "entry_PA-3");
}

#[test]
fn sample_and_control_datasets_share_one_index_counter() {
    let mut application = ProtocolApplication::new("PA-1");
    application.add_effect(lc50(30.0, "mg/L", 10.0));
    application.add_effect(lc50(10.0, "mg/L", 1.0));
    application.add_effect(lc50(500.0, "ug/L", 5.0));
    application.add_effect(
        EffectRecord::new("LC50")
            .with_result(EffectResult::measured(99.0, "mg/L"))
            .with_condition("CONCENTRATION", "negative control"),
    );

    let tree = export_application(&application, &ExportOptions::default()).unwrap();
    assert!(tree.report.is_clean());
    let entry = entry_of(&tree.root, &application);
    let bucket = entry
        .child_group("DEFAULT")
        .and_then(|types| types.child_group("DEFAULT"))
        .expect("default buckets")
        .clone();
    let names: Vec<&str> = bucket.children().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["0_LC50", "1_LC50", "control_2_LC50"]);
}

#[test]
fn datasets_bucket_by_endpointtype_and_replicate_label() {
    let mut application = ProtocolApplication::new("PA-1");
    application.add_effect(
        lc50(10.0, "mg/L", 1.0)
            .with_endpointtype("RAW_DATA")
            .with_condition("EXPERIMENT", Value::new(1.0, ""))
            .with_condition("REPLICATE", Value::new(2.0, "")),
    );

    let tree = export_application(&application, &ExportOptions::default()).unwrap();
    let entry = entry_of(&tree.root, &application);
    let bucket = entry
        .child_group("RAW_DATA")
        .and_then(|types| types.child_group("E1_R2"))
        .expect("replicate bucket");
    assert!(bucket.child("0_LC50").is_some());
}

#[test]
fn failing_dataset_is_skipped_and_recorded() {
    let mut application = ProtocolApplication::new("PA-1");
    application.add_effect(lc50(10.0, "mg/L", 1.0));
    application.add_effect(
        EffectRecord::new("EC50")
            .with_result(EffectResult::measured(5.0, "mg/L"))
            .with_condition("DOSE", Value::new(5.0, "mg/L"))
            .with_condition("DOSE_loValue", "oops"),
    );

    let tree = export_application(&application, &ExportOptions::default()).unwrap();
    let entry = entry_of(&tree.root, &application);
    let bucket = entry
        .child_group("DEFAULT")
        .and_then(|types| types.child_group("DEFAULT"))
        .expect("default buckets");
    assert!(bucket.child("0_LC50").is_some());
    assert!(bucket.child("1_EC50").is_none());

    assert_eq!(tree.report.skipped_datasets.len(), 1);
    let skipped = &tree.report.skipped_datasets[0];
    assert_eq!(skipped.entry, "entry_PA-1");
    assert!(skipped.group.contains("EC50"));
}

#[test]
fn metadata_phases_attach_to_the_entry() {
    let mut application = ProtocolApplication::new("PA-1")
        .with_protocol(
            Protocol::new("PC_GRANULOMETRY")
                .with_topcategory("P-CHEM")
                .with_category(
                    EndpointCategory::new("PC_GRANULOMETRY_SECTION")
                        .with_title("Particle size distribution"),
                )
                .with_guideline("OECD TG 110"),
        )
        .with_citation(
            Citation::new("IDEA")
                .with_title("Round robin, https://doi.org/10.1038/s41565-021-00911-6.")
                .with_year("2021"),
        )
        .with_owner(SampleLink::new("SUB-1").with_company("CHARISMA"))
        .with_parameter("T.instrument_model", "Zetasizer Nano ZS")
        .with_parameter("E.SOP_REFERENCE", "SOP-17")
        .with_parameter("sample vial", "glass")
        .with_parameter("MEDIUM", "ultrapure water")
        .with_parameter("E.EXPOSURE_TIME", Value::new(24.0, "h"))
        .with_parameter("EXPERIMENT_START_DATE", "2021-03-01");
    application.investigation_uuid = Some("INV-1".to_string());
    application.assay_uuid = Some("ASSAY-1".to_string());
    application.add_effect(lc50(10.0, "mg/L", 1.0));

    let tree = export_application(&application, &ExportOptions::default()).unwrap();
    let entry = entry_of(&tree.root, &application);

    assert_eq!(field_text(&entry, "entry_identifier_uuid"), "PA-1");
    assert_eq!(field_text(&entry, "definition"), "ProtocolApplication");
    assert_eq!(field_text(&entry, "collection_identifier"), "INV-1");
    assert_eq!(field_text(&entry, "experiment_identifier"), "ASSAY-1");
    assert_eq!(field_text(&entry, "start_time"), "2021-03-01");

    let documentation = entry
        .child_group("experiment_documentation")
        .expect("protocol note");
    assert_eq!(documentation.class, NodeClass::Note);
    assert_eq!(field_text(documentation, "guideline"), "OECD TG 110");
    let category = documentation.child_group("category").expect("category");
    let attrs: Vec<(String, String)> = category
        .attrs
        .iter()
        .map(|(key, value)| (key.render(), value.render()))
        .collect();
    assert!(attrs.contains(&("topcategory".to_string(), "P-CHEM".to_string())));
    assert!(attrs.contains(&("code".to_string(), "PC_GRANULOMETRY_SECTION".to_string())));
    assert!(attrs.contains(&("endpoint".to_string(), "PC_GRANULOMETRY".to_string())));

    let reference = entry.child_group("reference").expect("citation");
    assert_eq!(reference.class, NodeClass::Cite);
    assert_eq!(field_text(reference, "year"), "2021");
    assert_eq!(field_text(reference, "owner"), "IDEA");
    assert_eq!(field_text(reference, "doi"), "10.1038/s41565-021-00911-6");

    let sample = entry.child_group("sample").expect("sample group");
    assert_eq!(field_text(sample, "uuid"), "SUB-1");
    assert_eq!(field_text(sample, "provider"), "CHARISMA");
    assert_eq!(field_text(sample, "sample vial"), "glass");

    let instrument = entry.child_group("instrument").expect("instrument group");
    assert_eq!(field_text(instrument, "T.instrument_model"), "Zetasizer Nano ZS");
    assert_eq!(field_text(instrument, "E.SOP_REFERENCE"), "SOP-17");

    let environment = entry.child_group("environment").expect("environment group");
    match environment.child("E.EXPOSURE_TIME") {
        Some(TreeNode::Field(field)) => {
            assert_eq!(field.value.render(), "24");
            assert_eq!(field.unit.as_deref(), Some("h"));
        }
        other => panic!("expected exposure field, got {other:?}"),
    }

    let free_form = entry.child_group("parameters").expect("parameters group");
    assert_eq!(field_text(free_form, "MEDIUM"), "ultrapure water");
}

#[test]
fn arrayed_effects_become_datasets_directly() {
    let meta = SpectrumMeta {
        method: "Raman spectrometry".to_string(),
        instrument: "BWTek".to_string(),
        wavelength: "785".to_string(),
        provider: "IDEA".to_string(),
        investigation: "round robin".to_string(),
        sample: "PST".to_string(),
        sample_provider: "CHARISMA".to_string(),
        prefix: "CRMA".to_string(),
    };
    let application =
        spectrum_application(&meta, raman_spectrum(vec![100.0, 200.0], vec![5.0, 7.0]));

    let tree = export_application(&application, &ExportOptions::default()).unwrap();
    let entry = entry_of(&tree.root, &application);
    let dataset = entry
        .child_group("RAW_DATA")
        .and_then(|types| types.child_group("DEFAULT"))
        .and_then(|bucket| bucket.child("0_Raman spectrum"))
        .and_then(TreeNode::as_dataset)
        .expect("spectrum dataset");
    assert_eq!(dataset.axes.len(), 1);
    assert_eq!(dataset.axes[0].name, "Raman shift");
    assert_eq!(dataset.response.as_ref().map(|signal| signal.len()), Some(2));
}

#[test]
fn failed_substances_do_not_stop_their_siblings() {
    let mut good = SubstanceRecord::new("SUB-GOOD", "nanoGOOD");
    let mut application = ProtocolApplication::new("PA-1");
    application.add_effect(lc50(10.0, "mg/L", 1.0));
    good.add_study(application);

    let missing_id = SubstanceRecord {
        name: Some("nanoNONE".to_string()),
        ..SubstanceRecord::default()
    };

    // an unnamed parameter is a metadata error and abandons the substance
    let mut broken = SubstanceRecord::new("SUB-BROKEN", "nanoBROKEN");
    broken.add_study(ProtocolApplication::new("PA-2").with_parameter("", "blank"));

    let substances = Substances::from(vec![good, missing_id, broken]);
    let tree = export_substances(&substances, &ExportOptions::default()).unwrap();

    let collection = tree.root.child_group("substance").expect("collection");
    let names: Vec<&str> = collection.children().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["SUB-GOOD"]);

    assert_eq!(tree.report.failed_substances.len(), 2);
    assert_eq!(tree.report.failed_substances[0].substance, "nanoNONE");
    assert_eq!(tree.report.failed_substances[1].substance, "SUB-BROKEN");
    assert!(
        tree.report.failed_substances[1]
            .error
            .to_string()
            .contains("parameters")
    );
}

#[test]
fn substance_nodes_carry_identity_attributes() {
    let mut substance = SubstanceRecord::new("SUB-1", "nanoAg")
        .with_publicname("NM-300K")
        .with_owner_name("JRC")
        .with_substance_type("CHEBI_33416");
    let mut application = ProtocolApplication::new("PA-1");
    application.add_effect(lc50(10.0, "mg/L", 1.0));
    substance.add_study(application);

    let substances = Substances::from(vec![substance]);
    let tree = export_substances(&substances, &ExportOptions::default()).unwrap();
    let node = tree
        .root
        .child_group("substance")
        .and_then(|collection| collection.child_group("SUB-1"))
        .expect("substance node");
    assert_eq!(node.class, NodeClass::Sample);
    let attrs: Vec<(String, String)> = node
        .attrs
        .iter()
        .map(|(key, value)| (key.render(), value.render()))
        .collect();
    assert!(attrs.contains(&("name".to_string(), "nanoAg".to_string())));
    assert!(attrs.contains(&("publicname".to_string(), "NM-300K".to_string())));
    assert!(attrs.contains(&("ownerName".to_string(), "JRC".to_string())));
    assert!(attrs.contains(&("substanceType".to_string(), "CHEBI_33416".to_string())));
    assert_eq!(node.len(), 1);
}

#[test]
fn minimal_entry_renders_stably() {
    let mut application = ProtocolApplication::new("pa-1");
    application.add_effect(
        EffectRecord::new("LC50")
            .with_result(EffectResult::measured(10.0, "mg/L"))
            .with_condition("CONCENTRATION", Value::new(2.0, "mg/L")),
    );
    let tree = export_application(&application, &ExportOptions::default()).unwrap();
    insta::assert_snapshot!(tree.root.render(), @r"
    / [NXroot]
      entry_pa-1 [NXentry]
        entry_identifier_uuid = pa-1
        definition = ProtocolApplication
        DEFAULT [NXgroup]
          DEFAULT [NXgroup]
            0_LC50 [NXdata]
              @endpoint = LC50
              @unit = mg/L
              @CONCENTRATION_indices = 0
              signal LC50 [mg/L] x1
              axis CONCENTRATION [mg/L] x1
        instrument [NXinstrument]
        sample [NXsample]
        environment [NXenvironment]
        parameters [NXcollection]
    ");
}
