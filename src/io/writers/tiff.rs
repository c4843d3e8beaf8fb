use std::path::Path;

use gdal::raster::{Buffer, ColorInterpretation};
use gdal::{Dataset, DriverManager, Gcp, Metadata};
use tracing::{debug, info};

use crate::core::raster::{CompositeRaster, GcpSet, RasterBand};
use crate::error::Result;
use crate::io::writers::metadata::{Provenance, embed_tiff_metadata};

fn create_f32(output: &Path, cols: usize, rows: usize, bands: usize) -> Result<Dataset> {
    let driver = DriverManager::get_driver_by_name("GTiff")?;
    Ok(driver.create_with_band_type::<f32, _>(output, cols, rows, bands)?)
}

/// Attach ground control points with their projection to `ds`.
fn set_gcps(ds: &Dataset, set: &GcpSet) -> Result<()> {
    let gcps = set
        .points
        .iter()
        .enumerate()
        .map(|(i, g)| Gcp {
            id: (i + 1).to_string(),
            info: String::new(),
            pixel: g.pixel_x,
            line: g.pixel_y,
            x: g.geo_x,
            y: g.geo_y,
            z: g.geo_z,
        })
        .collect();
    ds.set_gcps(gcps, &set.crs.spatial_ref()?)?;
    Ok(())
}

/// Single-band float dataset carrying the pixels, georeferencing
/// (geotransform, else GCPs), description and nodata marker of `band`.
fn create_band(output: &Path, band: &RasterBand, label: &str) -> Result<Dataset> {
    let (rows, cols) = band.data.dim();
    let mut ds = create_f32(output, cols, rows, 1)?;
    if let (Some(gt), Some(crs)) = (band.geotransform, band.crs) {
        ds.set_geo_transform(&gt)?;
        ds.set_projection(&crs.to_wkt()?)?;
    } else if let Some(set) = &band.gcps {
        set_gcps(&ds, set)?;
    }

    let mut handle = ds.rasterband(1)?;
    handle.set_color_interpretation(ColorInterpretation::GrayIndex)?;
    handle.set_description(label)?;
    if let Some(nd) = band.nodata {
        handle.set_no_data_value(Some(nd))?;
    }
    let mut buf = Buffer::new((cols, rows), band.data.iter().copied().collect());
    handle.write((0, 0), (cols, rows), &mut buf)?;
    Ok(ds)
}

/// Write a single-band float GeoTIFF with georeferencing (geotransform or
/// GCPs), nodata marker and provenance metadata.
pub fn write_band(output: &Path, band: &RasterBand, label: &str, prov: &Provenance) -> Result<()> {
    let mut ds = create_band(output, band, label)?;
    embed_tiff_metadata(&mut ds, prov, label)?;
    info!("Wrote {} ({}x{}) to {}", label, band.cols(), band.rows(), output.display());
    Ok(())
}

/// Scratch GeoTIFF without provenance, as input to an external warp.
pub fn write_scratch_band(output: &Path, band: &RasterBand) -> Result<()> {
    create_band(output, band, "warp source")?;
    debug!("Wrote scratch band {}", output.display());
    Ok(())
}

/// Write the three-band float composite with per-band descriptions.
pub fn write_composite(output: &Path, rgb: &CompositeRaster, prov: &Provenance) -> Result<()> {
    let (rows, cols) = rgb.dim();
    let mut ds = create_f32(output, cols, rows, 3)?;
    ds.set_geo_transform(&rgb.geotransform)?;
    ds.set_projection(&rgb.crs.to_wkt()?)?;
    embed_tiff_metadata(&mut ds, prov, "RGB")?;

    let interpretations = [
        ColorInterpretation::RedBand,
        ColorInterpretation::GreenBand,
        ColorInterpretation::BlueBand,
    ];
    for ((i, data), interpretation) in rgb.bands().into_iter().enumerate().zip(interpretations) {
        let mut handle = ds.rasterband(i + 1)?;
        handle.set_color_interpretation(interpretation)?;
        handle.set_description(CompositeRaster::BAND_NAMES[i])?;
        handle.set_no_data_value(Some(f64::from(rgb.nodata)))?;
        let mut buf = Buffer::new((cols, rows), data.iter().copied().collect());
        handle.write((0, 0), (cols, rows), &mut buf)?;
    }
    info!("Wrote RGB composite ({}x{}) to {}", cols, rows, output.display());
    Ok(())
}
