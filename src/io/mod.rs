//! I/O layer: GDAL-backed raster reading, SAFE archive extraction, the
//! external SNAP engine and `gdalwarp`, staged scene sources and GeoTIFF
//! `writers`.
pub mod archive;

pub mod gdal;
pub use gdal::{GdalError, RasterMetadata, RasterReader, load_band};

pub mod gdalwarp;
pub use gdalwarp::{GdalWarpCommand, GdalWarpRequest};

pub mod snap;
pub use snap::SnapCommandEngine;

pub mod staged;
pub use staged::{StagedArchives, StagedObjects};

pub mod writers;
