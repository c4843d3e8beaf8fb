use std::collections::HashMap;
use std::path::Path;

use gdal::{Dataset, Metadata, errors::GdalError as GdalCrateError};
use ndarray::Array2;
use thiserror::Error;
use tracing::debug;

use crate::core::geometry::Crs;
use crate::core::raster::{GcpSet, GeoTransform, GroundControlPoint, RasterBand};

/// Errors encountered when using the GDAL reader
#[derive(Debug, Error)]
pub enum GdalError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] GdalCrateError),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Dimension mismatch: expected {0}x{1}, got {2} samples")]
    DimensionMismatch(usize, usize, usize),
}

/// Metadata extracted from a GDAL-supported dataset
#[derive(Debug, Clone)]
pub struct RasterMetadata {
    /// Width (pixels) of the raster
    pub size_x: usize,
    /// Height (lines) of the raster
    pub size_y: usize,
    /// Number of raster bands
    pub bands: usize,
    /// `None` when the dataset only carries the GDAL default transform
    pub geotransform: Option<GeoTransform>,
    /// CRS of the geotransform, when it has an EPSG code
    pub crs: Option<Crs>,
    /// Nodata marker of band 1
    pub nodata: Option<f64>,
    /// Default-domain metadata items
    pub metadata: HashMap<String, String>,
}

/// Reader for single-band rasters (GeoTIFF measurement files, correction output)
pub struct RasterReader {
    dataset: Dataset,
    pub metadata: RasterMetadata,
}

/// EPSG code of the outermost authority in a WKT1 or WKT2 string.
pub(crate) fn parse_epsg(wkt: &str) -> Option<u32> {
    const WKT1: &str = "AUTHORITY[\"EPSG\",\"";
    const WKT2: &str = "ID[\"EPSG\",";
    let from_key = |key: &str| -> Option<u32> {
        let idx = wkt.rfind(key)?;
        let rest = &wkt[idx + key.len()..];
        let end = rest.find(|c: char| !c.is_ascii_digit())?;
        rest[..end].parse().ok()
    };
    match (wkt.rfind(WKT1), wkt.rfind(WKT2)) {
        (Some(a), Some(b)) if b > a => from_key(WKT2),
        (Some(_), _) => from_key(WKT1),
        (None, Some(_)) => from_key(WKT2),
        (None, None) => None,
    }
}

fn crs_from_wkt(wkt: &str) -> Option<Crs> {
    let trimmed = wkt.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(crs) = trimmed.parse::<Crs>() {
        return Some(crs);
    }
    parse_epsg(trimmed).and_then(|code| Crs::from_epsg(code).ok())
}

impl RasterReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GdalError> {
        let dataset = Dataset::open(path.as_ref())?;
        let (size_x, size_y) = dataset.raster_size();
        let bands = dataset.raster_count() as usize;
        if bands == 0 {
            return Err(GdalError::UnsupportedFormat(format!(
                "no raster bands in {}",
                path.as_ref().display()
            )));
        }
        let geotransform = dataset.geo_transform().ok();
        let crs = crs_from_wkt(&dataset.projection());
        let nodata = dataset.rasterband(1)?.no_data_value();
        // Collect metadata entries (domain "")
        let mut metadata_map = HashMap::new();
        if let Some(entries) = dataset.metadata_domain("") {
            for entry in entries {
                if let Some((key, val)) = entry.split_once('=') {
                    metadata_map.insert(key.to_string(), val.to_string());
                }
            }
        }
        debug!(
            "opened {} ({}x{}, {} bands, crs {:?})",
            path.as_ref().display(),
            size_x,
            size_y,
            bands,
            crs
        );
        Ok(RasterReader {
            dataset,
            metadata: RasterMetadata {
                size_x,
                size_y,
                bands,
                geotransform,
                crs,
                nodata,
                metadata: metadata_map,
            },
        })
    }

    /// Read a single band (1-based index) as an f32 array of shape (height, width)
    pub fn read_band(&self, index: usize) -> Result<Array2<f32>, GdalError> {
        if index == 0 || index > self.metadata.bands {
            return Err(GdalError::UnsupportedFormat(format!(
                "Band index {} out of range",
                index
            )));
        }
        let band = self.dataset.rasterband(index)?;
        let window = (self.metadata.size_x, self.metadata.size_y);
        let buf = band.read_as::<f32>((0, 0), window, window, None)?;
        let data_vec = buf.data().to_vec();
        let len = data_vec.len();
        Array2::from_shape_vec((self.metadata.size_y, self.metadata.size_x), data_vec)
            .map_err(|_| GdalError::DimensionMismatch(self.metadata.size_x, self.metadata.size_y, len))
    }

    /// Description of band `index` (1-based), empty when unset.
    pub fn band_description(&self, index: usize) -> Result<String, GdalError> {
        Ok(self.dataset.rasterband(index)?.description()?)
    }

    /// Embedded ground control points with the CRS of their ground
    /// coordinates. A GCP set without a recognisable projection is taken as
    /// WGS84, as Sentinel-1 products declare.
    pub fn ground_control_points(&self) -> Option<GcpSet> {
        let raw = self.dataset.gcps();
        if raw.is_empty() {
            return None;
        }
        let points: Vec<GroundControlPoint> = raw
            .iter()
            .map(|g| GroundControlPoint {
                pixel_x: g.pixel(),
                pixel_y: g.line(),
                geo_x: g.x(),
                geo_y: g.y(),
                geo_z: g.z(),
            })
            .collect();
        let crs = self
            .dataset
            .gcp_projection()
            .and_then(|wkt| crs_from_wkt(&wkt))
            .unwrap_or(Crs::WGS84);
        debug!("read {} GCPs in {}", points.len(), crs);
        Some(GcpSet { points, crs })
    }

    /// Band `index` with its georeferencing as a `RasterBand`.
    pub fn raster_band(&self, index: usize) -> Result<RasterBand, GdalError> {
        let data = self.read_band(index)?;
        let nodata = self.dataset.rasterband(index)?.no_data_value();
        let (geotransform, crs) = match (self.metadata.geotransform, self.metadata.crs) {
            (Some(gt), Some(crs)) => (Some(gt), Some(crs)),
            _ => (None, None),
        };
        Ok(RasterBand {
            data,
            geotransform,
            crs,
            nodata,
            gcps: self.ground_control_points(),
        })
    }
}

/// Open `path` and load band 1.
pub fn load_band(path: &Path) -> crate::error::Result<RasterBand> {
    Ok(RasterReader::open(path)?.raster_band(1)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epsg_from_wkt1_and_wkt2() {
        let wkt1 = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433],AUTHORITY["EPSG","4326"]]"#;
        assert_eq!(parse_epsg(wkt1), Some(4326));
        let wkt2 = r#"PROJCRS["WGS 84 / UTM zone 34N",BASEGEOGCRS["WGS 84",ID["EPSG",4326]],CONVERSION["UTM zone 34N",ID["EPSG",16034]],ID["EPSG",32634]]"#;
        assert_eq!(parse_epsg(wkt2), Some(32634));
        assert_eq!(parse_epsg("LOCAL_CS[\"unnamed\"]"), None);
    }

    #[test]
    fn crs_from_projection_strings() {
        assert_eq!(crs_from_wkt("EPSG:4326"), Some(Crs::WGS84));
        assert_eq!(crs_from_wkt("   "), None);
    }
}
