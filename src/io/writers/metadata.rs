use std::collections::HashMap;

use gdal::Dataset;
use gdal::Metadata;

use crate::core::geometry::AreaOfInterest;
use crate::types::{BackendKind, SourceKind};

/// Run provenance stamped into every product the pipeline writes.
#[derive(Debug, Clone, PartialEq)]
pub struct Provenance {
    pub run_id: String,
    pub backend: BackendKind,
    pub source: SourceKind,
    pub scene: String,
    pub aoi: AreaOfInterest,
}

/// Extract all metadata fields for one product into a HashMap
pub fn extract_metadata_fields(prov: &Provenance, band: &str) -> HashMap<String, String> {
    let mut metadata = HashMap::new();
    metadata.insert("RUN_ID".to_string(), prov.run_id.clone());
    metadata.insert("BACKEND".to_string(), prov.backend.to_string());
    metadata.insert("SOURCE".to_string(), prov.source.to_string());
    metadata.insert("SCENE".to_string(), prov.scene.clone());
    metadata.insert("AOI".to_string(), prov.aoi.to_string());
    metadata.insert("BAND".to_string(), band.to_string());
    metadata.insert(
        "SOFTWARE".to_string(),
        format!("sarprep {}", env!("CARGO_PKG_VERSION")),
    );
    metadata
}

/// Embed provenance metadata into a GeoTIFF dataset
pub fn embed_tiff_metadata(ds: &mut Dataset, prov: &Provenance, band: &str) -> gdal::errors::Result<()> {
    for (key, value) in extract_metadata_fields(prov, band) {
        ds.set_metadata_item(&key, &value, "")?;
    }
    Ok(())
}
