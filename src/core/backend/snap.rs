use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::backend::{
    Acquired, Backend, BandPair, CorrectionContext, CorrectionEngine, Download, Downloader,
    SnapRequest,
};
use crate::core::raster::RasterBand;
use crate::core::scene::SceneReference;
use crate::core::workdir::WorkdirLayout;
use crate::error::{Error, Result};
use crate::io::gdal::load_band;
use crate::types::{BackendKind, Polarization};

/// Downloads the zipped product and hands it, with the AOI as subsetting
/// geometry, to the external correction engine.
pub struct SnapGeocodeBackend {
    downloader: Box<dyn Downloader>,
    engine: Box<dyn CorrectionEngine>,
    spacing: f64,
}

impl SnapGeocodeBackend {
    pub fn new(downloader: Box<dyn Downloader>, engine: Box<dyn CorrectionEngine>, spacing: f64) -> Self {
        Self {
            downloader,
            engine,
            spacing,
        }
    }
}

impl Backend for SnapGeocodeBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Snap
    }

    fn acquire(&self, scene: &SceneReference, layout: &WorkdirLayout) -> Result<Acquired> {
        match self.downloader.download(scene, &layout.download_dir())? {
            Download::Archive(path) => Ok(Acquired::Archive(path)),
            Download::Rasters { .. } => Err(Error::backend(format!(
                "{} downloaded per-polarization rasters; the SNAP backend needs the zipped product",
                scene.id
            ))),
        }
    }

    fn correct(&self, acquired: Acquired, ctx: &CorrectionContext<'_>) -> Result<BandPair> {
        let archive = match acquired {
            Acquired::Archive(path) => path,
            Acquired::Bands(_) => {
                return Err(Error::backend("SNAP correction needs an archive input"));
            }
        };
        let output_dir = ctx.layout.rtc_dir();
        let request = SnapRequest {
            input_archive: archive,
            aoi_geojson: ctx.layout.aoi_geojson(),
            aoi: *ctx.aoi,
            target_crs: ctx.target_crs,
            output_dir: output_dir.clone(),
            spacing: self.spacing,
        };
        info!(
            "Running SNAP correction on {} into {}",
            request.input_archive.display(),
            output_dir.display()
        );
        self.engine.run(&request)?;

        let vv = load_correction_output(&output_dir, Polarization::Vv)?;
        let vh = load_correction_output(&output_dir, Polarization::Vh)?;
        Ok(BandPair { vv, vh })
    }
}

/// GeoTIFFs under `dir` (recursively) whose name contains `token`, sorted.
pub fn find_outputs(dir: &Path, token: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    if !dir.is_dir() {
        return Ok(found);
    }
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        for entry in fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
                continue;
            };
            let lower = name.to_lowercase();
            if name.contains(token) && (lower.ends_with(".tif") || lower.ends_with(".tiff")) {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}

/// Locate and validate the engine's output for `pol`: it must exist, be
/// non-empty, open as a raster and carry a CRS.
fn load_correction_output(output_dir: &Path, pol: Polarization) -> Result<RasterBand> {
    let expected = format!("*{}*.tif", pol.label());
    let missing = |detail: String| Error::CorrectionOutputMissing {
        output_dir: output_dir.to_path_buf(),
        expected: expected.clone(),
        detail,
    };
    let candidates = find_outputs(output_dir, pol.label())?;
    let path = match candidates.as_slice() {
        [] => return Err(missing("no matching file".to_string())),
        [only] => only.clone(),
        [first, ..] => {
            warn!("{} {} outputs found, using {}", candidates.len(), pol, first.display());
            first.clone()
        }
    };
    let size = fs::metadata(&path)?.len();
    if size == 0 {
        return Err(missing(format!("{} is empty", path.display())));
    }
    let band = load_band(&path).map_err(|e| missing(format!("{} unreadable: {}", path.display(), e)))?;
    if band.rows() == 0 || band.cols() == 0 {
        return Err(missing(format!("{} has no pixels", path.display())));
    }
    if band.crs.is_none() {
        return Err(missing(format!("{} has no CRS", path.display())));
    }
    info!("RTC {}: {}", pol, path.display());
    Ok(band)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outputs_are_found_recursively_by_token() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("S1A_scene").join("tifs");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("S1A__VV_gamma0-rtc.tif"), b"x").unwrap();
        fs::write(nested.join("S1A__VH_gamma0-rtc.tif"), b"x").unwrap();
        fs::write(nested.join("S1A__VV_gamma0-rtc.xml"), b"x").unwrap();

        let vv = find_outputs(tmp.path(), "VV").unwrap();
        assert_eq!(vv.len(), 1);
        assert!(vv[0].ends_with("S1A__VV_gamma0-rtc.tif"));
        assert!(find_outputs(&tmp.path().join("missing"), "VV").unwrap().is_empty());
    }

    #[test]
    fn missing_or_empty_output_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_correction_output(tmp.path(), Polarization::Vh).unwrap_err();
        assert!(matches!(err, Error::CorrectionOutputMissing { ref expected, .. } if expected == "*VH*.tif"));

        fs::write(tmp.path().join("out_VH.tif"), b"").unwrap();
        let err = load_correction_output(tmp.path(), Polarization::Vh).unwrap_err();
        assert!(matches!(err, Error::CorrectionOutputMissing { ref detail, .. } if detail.contains("empty")));

        fs::write(tmp.path().join("junk_VV.tif"), b"not a tiff").unwrap();
        let err = load_correction_output(tmp.path(), Polarization::Vv).unwrap_err();
        assert!(matches!(err, Error::CorrectionOutputMissing { .. }));
    }
}
