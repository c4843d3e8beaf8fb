//! Post-clip checks: every clipped band must be non-empty and inside the AOI
//! window, and the VV/VH pair must share one pixel grid exactly.
use tracing::debug;

use crate::core::geometry::{AreaOfInterest, Crs, Extent};
use crate::core::raster::{GeoTransform, RasterBand};
use crate::error::{Error, Result};

/// Verify `band` is non-empty, carries `crs`, and lies within the AOI
/// window (up to floating-point tolerance).
pub fn check_clip_safety(
    band: &RasterBand,
    aoi: &AreaOfInterest,
    crs: Crs,
    label: &str,
) -> Result<Extent> {
    let window = aoi.extent_in(crs)?;
    let violation = |actual: String, detail: String| Error::ClipSafetyViolation {
        band: label.to_string(),
        actual,
        aoi: window,
        detail,
    };

    if band.rows() == 0 || band.cols() == 0 {
        return Err(violation(
            format!("{}x{} pixels", band.cols(), band.rows()),
            "raster is empty".to_string(),
        ));
    }
    if band.crs != Some(crs) {
        return Err(violation(
            band.crs.map_or("no CRS".to_string(), |c| c.to_string()),
            format!("expected {}", crs),
        ));
    }
    let extent = band
        .extent()
        .ok_or_else(|| violation("no geotransform".to_string(), "raster is not georeferenced".to_string()))?;
    if extent.is_empty() {
        return Err(violation(extent.to_string(), "extent has zero area".to_string()));
    }
    if !extent.within(&window, window.tolerance()) {
        return Err(violation(extent.to_string(), "extent exceeds the AOI".to_string()));
    }
    if band.data.iter().all(|&v| band.is_nodata(v)) {
        return Err(violation(extent.to_string(), "every pixel is nodata".to_string()));
    }
    debug!("{} clip extent {} within {}", label, extent, window);
    Ok(extent)
}

/// Require identical dimensions, CRS and geotransform.
pub fn check_alignment(vv: &RasterBand, vh: &RasterBand) -> Result<()> {
    let mismatch = |detail: String| Err(Error::BandMisalignment { detail });
    if vv.data.dim() != vh.data.dim() {
        return mismatch(format!(
            "VV is {}x{} but VH is {}x{}",
            vv.cols(),
            vv.rows(),
            vh.cols(),
            vh.rows()
        ));
    }
    if vv.crs != vh.crs {
        return mismatch(format!("VV CRS {:?} but VH CRS {:?}", vv.crs, vh.crs));
    }
    match (vv.geotransform, vh.geotransform) {
        (Some(a), Some(b)) if same_geotransform(&a, &b) => Ok(()),
        (Some(a), Some(b)) => mismatch(format!("VV geotransform {:?} but VH {:?}", a, b)),
        _ => mismatch("both bands need a geotransform".to_string()),
    }
}

fn same_geotransform(a: &GeoTransform, b: &GeoTransform) -> bool {
    a.iter().zip(b).all(|(x, y)| {
        let scale = x.abs().max(y.abs()).max(1.0);
        (x - y).abs() <= scale * 1e-12
    })
}
