//! GeoTIFF writers for clipped bands and the RGB composite, plus the
//! provenance metadata embedded in both.
pub mod metadata;
pub mod tiff;

pub use metadata::{Provenance, embed_tiff_metadata, extract_metadata_fields};
pub use tiff::{write_band, write_composite, write_scratch_band};
