//! Zipped SAFE products: extraction and measurement-raster lookup.
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::types::Polarization;

/// Extract `zip_path` into `dest` and return the `.SAFE` directory. Skips
/// extraction when that directory is already present.
pub fn extract_safe(zip_path: &Path, dest: &Path) -> Result<PathBuf> {
    let mut archive = ZipArchive::new(File::open(zip_path)?)?;
    let safe_name = (0..archive.len())
        .find_map(|i| {
            let entry = archive.by_index(i).ok()?;
            let path = entry.enclosed_name()?.to_path_buf();
            let first = path.components().next()?;
            let name = first.as_os_str().to_string_lossy().to_string();
            name.to_ascii_uppercase().ends_with(".SAFE").then_some(name)
        })
        .ok_or_else(|| {
            Error::backend(format!("{} contains no .SAFE directory", zip_path.display()))
        })?;

    let safe_dir = dest.join(&safe_name);
    if safe_dir.is_dir() {
        debug!("{} already extracted", safe_dir.display());
        return Ok(safe_dir);
    }
    fs::create_dir_all(dest)?;
    info!("Extracting {} into {}", zip_path.display(), dest.display());
    archive.extract(dest)?;
    Ok(safe_dir)
}

/// Measurement raster for `pol` under `<safe>/measurement/`, matched by the
/// `-vv-` style infix of Sentinel-1 file names.
pub fn find_measurement(safe_dir: &Path, pol: Polarization) -> Result<PathBuf> {
    let measurement = safe_dir.join("measurement");
    let infix = format!("-{}-", pol.label().to_ascii_lowercase());
    let missing = || {
        Error::backend(format!(
            "no {} measurement raster in {}",
            pol,
            measurement.display()
        ))
    };
    if !measurement.is_dir() {
        return Err(missing());
    }
    let mut candidates: Vec<PathBuf> = fs::read_dir(&measurement)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            (name.ends_with(".tiff") || name.ends_with(".tif")) && name.contains(&infix)
        })
        .collect();
    candidates.sort();
    let found = candidates.into_iter().next().ok_or_else(missing)?;
    info!("Found {} measurement: {}", pol, found.display());
    Ok(found)
}

/// VV and VH measurement rasters of an extracted product.
pub fn find_measurements(safe_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    Ok((
        find_measurement(safe_dir, Polarization::Vv)?,
        find_measurement(safe_dir, Polarization::Vh)?,
    ))
}
