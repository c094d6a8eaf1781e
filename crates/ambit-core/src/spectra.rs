//! Instrumental spectra as ready-made protocol applications.
//!
//! A spectrum arrives as two parallel arrays; it becomes an arrayed effect
//! and a protocol application whose identifiers are minted deterministically
//! (v5 uuids over the acquisition provenance), so re-importing the same
//! spectrum yields the same identity.

use ambit_model::{
    Citation, EffectArray, EndpointCategory, Protocol, ProtocolApplication, SampleLink,
    ValueArray,
};
use uuid::Uuid;

/// Wraps one signal/axis pair as a raw-data arrayed effect.
pub fn spectrum_effect(
    endpoint: &str,
    axis_name: &str,
    axis: ValueArray,
    signal: ValueArray,
) -> EffectArray {
    EffectArray::new(endpoint, signal)
        .with_endpointtype("RAW_DATA")
        .with_axis(axis_name, axis)
}

/// Raman shift/count arrays as an arrayed effect.
pub fn raman_spectrum(shift: Vec<f64>, counts: Vec<f64>) -> EffectArray {
    spectrum_effect(
        "Raman spectrum",
        "Raman shift",
        ValueArray::new(shift, Some("cm-1".to_string())),
        ValueArray::new(counts, Some("count".to_string())),
    )
}

/// Acquisition provenance of one spectrum: what was measured, on which
/// instrument, by whom. Everything identifiers are derived from.
#[derive(Debug, Clone, Default)]
pub struct SpectrumMeta {
    pub method: String,
    pub instrument: String,
    pub wavelength: String,
    pub provider: String,
    pub investigation: String,
    pub sample: String,
    pub sample_provider: String,
    pub prefix: String,
}

/// Builds the protocol application owning one spectrum effect.
pub fn spectrum_application(meta: &SpectrumMeta, effect: EffectArray) -> ProtocolApplication {
    let investigation_uuid = Uuid::new_v5(&Uuid::NAMESPACE_OID, meta.investigation.as_bytes());
    let assay_seed = format!("{} {}", meta.investigation, meta.provider);
    let assay_uuid = Uuid::new_v5(&Uuid::NAMESPACE_OID, assay_seed.as_bytes());
    let application_seed = format!(
        "{} {} {} {} {} {}",
        effect.endpoint, meta.instrument, meta.wavelength, meta.provider, meta.investigation,
        meta.sample
    );
    let application_uuid = Uuid::new_v5(&Uuid::NAMESPACE_OID, application_seed.as_bytes());
    let sample_uuid = Uuid::new_v5(&Uuid::NAMESPACE_OID, meta.sample.as_bytes());

    let mut application = ProtocolApplication::new(format!("{}-{application_uuid}", meta.prefix))
        .with_protocol(
            Protocol::new("ANALYTICAL_METHODS")
                .with_topcategory("P-CHEM")
                .with_category(EndpointCategory::new("ANALYTICAL_METHODS_SECTION")),
        )
        .with_citation(
            Citation::new(meta.provider.as_str()).with_title(meta.investigation.as_str()),
        )
        .with_owner(
            SampleLink::new(format!("{}-{sample_uuid}", meta.prefix))
                .with_company(meta.sample_provider.as_str()),
        )
        .with_parameter("E.method", meta.method.as_str())
        .with_parameter("wavelength", meta.wavelength.as_str())
        .with_parameter("T.instrument_model", meta.instrument.as_str());
    application.investigation_uuid = Some(investigation_uuid.to_string());
    application.assay_uuid = Some(assay_uuid.to_string());
    application.add_effect(effect);
    application
}
