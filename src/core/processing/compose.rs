//! Decibel conversion and the VV/VH RGB composite.
use ndarray::{Array2, Zip};
use tracing::debug;

use crate::core::processing::safety::check_alignment;
use crate::core::raster::{CompositeRaster, RasterBand};
use crate::error::{Error, Result};

/// Linear floor applied before the logarithm; the dB floor is `10·log10(ε)` = -60 dB.
pub const DB_FLOOR_EPSILON: f64 = 1e-6;

/// Nodata marker of all three composite bands, below any reachable dB value.
pub const COMPOSITE_NODATA: f32 = -9999.0;

/// `10·log10(max(linear, ε))`. Never returns `-inf` or NaN for finite input.
#[inline]
pub fn to_db(linear: f64) -> f64 {
    10.0 * linear.max(DB_FLOOR_EPSILON).log10()
}

/// Build the composite R = VV dB, G = VH dB, B = R − G.
///
/// Both bands must share one grid exactly; nothing is resampled here. A pixel
/// that is nodata in either input is nodata in all three outputs.
pub fn compose_rgb(vv: &RasterBand, vh: &RasterBand) -> Result<CompositeRaster> {
    check_alignment(vv, vh)?;
    let (geotransform, crs) = match (vv.geotransform, vv.crs) {
        (Some(gt), Some(crs)) => (gt, crs),
        _ => {
            return Err(Error::BandMisalignment {
                detail: "bands carry no CRS".to_string(),
            });
        }
    };

    let dim = vv.data.dim();
    let mut red = Array2::from_elem(dim, COMPOSITE_NODATA);
    let mut green = Array2::from_elem(dim, COMPOSITE_NODATA);
    let mut blue = Array2::from_elem(dim, COMPOSITE_NODATA);
    let mut masked = 0usize;
    Zip::from(&vv.data)
        .and(&vh.data)
        .and(&mut red)
        .and(&mut green)
        .and(&mut blue)
        .for_each(|&v, &h, r, g, b| {
            if vv.is_nodata(v) || vh.is_nodata(h) {
                masked += 1;
                return;
            }
            let r_db = to_db(f64::from(v));
            let g_db = to_db(f64::from(h));
            *r = r_db as f32;
            *g = g_db as f32;
            *b = (r_db - g_db) as f32;
        });
    debug!("composite {}x{}, {} nodata pixels", dim.1, dim.0, masked);

    Ok(CompositeRaster {
        red,
        green,
        blue,
        geotransform,
        crs,
        nodata: COMPOSITE_NODATA,
    })
}
