//! GCP warp-clip engine: hands ground control points to `gdalwarp -tps`,
//! writing onto a grid fitted to the footprint ∩ AOI window, and crops
//! already-georeferenced bands to the AOI.
use ndarray::s;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::geometry::{AreaOfInterest, Crs, Extent, transform_points};
use crate::core::raster::{GcpSet, GeoTransform, GroundControlPoint, RasterBand, is_north_up};
use crate::error::{Error, Result};
use crate::io::gdal::load_band;
use crate::io::gdalwarp::{GdalWarpCommand, GdalWarpRequest};
use crate::io::writers::write_scratch_band;
use crate::types::ResampleMethod;

pub const MIN_CONTROL_POINTS: usize = 3;

/// Minor/major principal variance below which points count as collinear.
const COLLINEAR_SPREAD: f64 = 1e-10;
/// Nodata of raw GRD digital numbers, used when the band declares none.
const DEFAULT_NODATA: f64 = 0.0;
/// Fraction of a pixel forgiven when snapping a crop window to the grid.
const WINDOW_SNAP: f64 = 1e-6;

/// Requested output pixel size, tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Degrees(f64),
    Meters(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WarpOptions {
    pub resample: ResampleMethod,
    /// `None` derives the pixel size from the source's native spacing.
    pub resolution: Option<Resolution>,
    /// Transformer approximation error in output pixels; 0 is exact.
    pub error_threshold: f64,
}

impl Default for WarpOptions {
    fn default() -> Self {
        Self {
            resample: ResampleMethod::Bilinear,
            resolution: None,
            error_threshold: 0.125,
        }
    }
}

/// How a band reached the AOI window.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ClipMethod {
    AlreadyClipped,
    Cropped,
    Warped,
}

/// North-up output grid; origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputGrid {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
    pub cols: usize,
    pub rows: usize,
}

impl OutputGrid {
    fn plan(
        footprint: &Extent,
        window: &Extent,
        src_cols: usize,
        src_rows: usize,
        resolution: Option<Resolution>,
        crs: Crs,
    ) -> Result<Self> {
        match resolution {
            None => {
                // diagonal ground distance over diagonal pixel count
                let diag_ground = footprint.width().hypot(footprint.height());
                let diag_pixels = (src_cols as f64).hypot(src_rows as f64);
                let pixel = diag_ground / diag_pixels;
                let cols = ((window.width() / pixel).round() as usize).max(1);
                let rows = ((window.height() / pixel).round() as usize).max(1);
                Ok(Self {
                    origin_x: window.min_x,
                    origin_y: window.max_y,
                    pixel_width: window.width() / cols as f64,
                    pixel_height: window.height() / rows as f64,
                    cols,
                    rows,
                })
            }
            Some(res) => {
                let geographic = crs.is_geographic()?;
                let size = match res {
                    Resolution::Degrees(d) if geographic => d,
                    Resolution::Meters(m) if !geographic => m,
                    other => {
                        return Err(Error::invalid(
                            "resolution",
                            format!("{:?} does not match the units of {}", other, crs),
                        ));
                    }
                };
                if !(size.is_finite() && size > 0.0) {
                    return Err(Error::invalid("resolution", size));
                }
                let cols = (window.width() / size + 1e-9).floor() as usize;
                let rows = (window.height() / size + 1e-9).floor() as usize;
                if cols == 0 || rows == 0 {
                    return Err(Error::invalid(
                        "resolution",
                        format!("{} is coarser than the clip window {}", size, window),
                    ));
                }
                Ok(Self {
                    origin_x: window.min_x,
                    origin_y: window.max_y,
                    pixel_width: size,
                    pixel_height: size,
                    cols,
                    rows,
                })
            }
        }
    }

    pub fn geotransform(&self) -> GeoTransform {
        [
            self.origin_x,
            self.pixel_width,
            0.0,
            self.origin_y,
            0.0,
            -self.pixel_height,
        ]
    }

    pub fn extent(&self) -> Extent {
        Extent::new(
            self.origin_x,
            self.origin_y - self.rows as f64 * self.pixel_height,
            self.origin_x + self.cols as f64 * self.pixel_width,
            self.origin_y,
        )
    }
}

/// Minor over major principal variance of a point cloud: 0 for collinear
/// points, 1 for an isotropic spread.
fn spread_ratio(points: &[(f64, f64)]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.0).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for &(x, y) in points {
        let (dx, dy) = (x - cx, y - cy);
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    let trace = sxx + syy;
    if trace <= 0.0 {
        return 0.0;
    }
    let det = sxx * syy - sxy * sxy;
    let disc = ((trace * trace) / 4.0 - det).max(0.0).sqrt();
    let major = trace / 2.0 + disc;
    let minor = (trace / 2.0 - disc).max(0.0);
    minor / major
}

/// Canonically ordered control points with repeated pixel/line positions
/// dropped; the first point at a position wins.
pub fn dedup_control_points(points: &[GroundControlPoint]) -> Vec<GroundControlPoint> {
    let mut unique = points.to_vec();
    unique.sort_by(GroundControlPoint::canonical_cmp);
    unique.dedup_by(|b, a| a.pixel_x == b.pixel_x && a.pixel_y == b.pixel_y);
    if unique.len() < points.len() {
        debug!("dropped {} duplicate GCP(s)", points.len() - unique.len());
    }
    unique
}

/// Require at least three control points that span an area both in pixel
/// space and on the ground.
pub fn validate_control_points(points: &[GroundControlPoint]) -> Result<()> {
    if points.len() < MIN_CONTROL_POINTS {
        return Err(Error::InsufficientControlPoints {
            found: points.len(),
            detail: format!("at least {} are required", MIN_CONTROL_POINTS),
        });
    }
    let pixel: Vec<(f64, f64)> = points.iter().map(|g| (g.pixel_x, g.pixel_y)).collect();
    let ground: Vec<(f64, f64)> = points.iter().map(|g| (g.geo_x, g.geo_y)).collect();
    if pixel.iter().chain(&ground).any(|p| !(p.0.is_finite() && p.1.is_finite())) {
        return Err(Error::InsufficientControlPoints {
            found: points.len(),
            detail: "non-finite control point coordinates".to_string(),
        });
    }
    for (space, pts) in [("pixel", &pixel), ("ground", &ground)] {
        if spread_ratio(pts) < COLLINEAR_SPREAD {
            return Err(Error::InsufficientControlPoints {
                found: points.len(),
                detail: format!("control points are collinear in {} space", space),
            });
        }
    }
    Ok(())
}

/// Warp `band` by its ground control points into `target_crs` and clip the
/// result to `target_bbox`, with default options.
pub fn warp_and_clip(
    band: &RasterBand,
    target_bbox: &AreaOfInterest,
    target_crs: Crs,
) -> Result<RasterBand> {
    warp_and_clip_with(band, target_bbox, target_crs, &WarpOptions::default())
}

pub fn warp_and_clip_with(
    band: &RasterBand,
    target_bbox: &AreaOfInterest,
    target_crs: Crs,
    options: &WarpOptions,
) -> Result<RasterBand> {
    let gcps = band
        .gcps
        .as_ref()
        .ok_or_else(|| Error::InsufficientControlPoints {
            found: 0,
            detail: "band carries no ground control points".to_string(),
        })?;
    let points = dedup_control_points(&gcps.points);
    validate_control_points(&points)?;
    if band.rows() == 0 || band.cols() == 0 {
        return Err(Error::invalid("band", "empty pixel grid"));
    }
    if !(options.error_threshold.is_finite() && options.error_threshold >= 0.0) {
        return Err(Error::invalid("error_threshold", options.error_threshold));
    }

    let mut xs: Vec<f64> = points.iter().map(|g| g.geo_x).collect();
    let mut ys: Vec<f64> = points.iter().map(|g| g.geo_y).collect();
    transform_points(gcps.crs, target_crs, &mut xs, &mut ys)?;
    let footprint = Extent::envelope(xs.into_iter().zip(ys)).ok_or_else(|| {
        Error::InsufficientControlPoints {
            found: points.len(),
            detail: "control points do not project into the target CRS".to_string(),
        }
    })?;
    let bbox = target_bbox.extent_in(target_crs)?;
    let window = footprint.intersection(&bbox).ok_or(Error::NoOverlap {
        footprint,
        aoi: bbox,
    })?;
    let grid = OutputGrid::plan(
        &footprint,
        &window,
        band.cols(),
        band.rows(),
        options.resolution,
        target_crs,
    )?;
    debug!(
        "warp: {} GCPs, footprint {}, window {}, grid {}x{}",
        points.len(),
        footprint,
        window,
        grid.cols,
        grid.rows
    );

    let nodata = band.nodata.unwrap_or(DEFAULT_NODATA);
    let scratch = tempfile::Builder::new().prefix("sarprep_warp_").tempdir()?;
    let source = RasterBand {
        data: band.data.clone(),
        geotransform: None,
        crs: None,
        nodata: Some(nodata),
        gcps: Some(GcpSet {
            points,
            crs: gcps.crs,
        }),
    };
    let request = GdalWarpRequest {
        input: scratch.path().join("gcp_source.tif"),
        output: scratch.path().join("warped.tif"),
        source_crs: gcps.crs,
        target_crs,
        window: grid.extent(),
        cols: grid.cols,
        rows: grid.rows,
        resample: options.resample,
        nodata,
        error_threshold: options.error_threshold,
    };
    write_scratch_band(&request.input, &source)?;
    GdalWarpCommand::default().run(&request)?;
    let warped = load_band(&request.output)?;
    if warped.data.dim() != (grid.rows, grid.cols) {
        return Err(Error::backend(format!(
            "gdalwarp wrote {}x{}, expected {}x{}",
            warped.cols(),
            warped.rows(),
            grid.cols,
            grid.rows
        )));
    }
    info!(
        "Warped {}x{} band to {}x{} in {}",
        band.cols(),
        band.rows(),
        grid.cols,
        grid.rows,
        target_crs
    );

    Ok(RasterBand {
        data: warped.data,
        geotransform: Some(warped.geotransform.unwrap_or_else(|| grid.geotransform())),
        crs: Some(target_crs),
        nodata: Some(nodata),
        gcps: None,
    })
}

/// Crop a north-up band to the pixels lying fully inside `window`.
pub fn crop_to_extent(band: &RasterBand, window: &Extent) -> Result<RasterBand> {
    let gt = band
        .geotransform
        .ok_or_else(|| Error::invalid("band", "crop requires a geotransform"))?;
    if !is_north_up(&gt) {
        return Err(Error::invalid("band", format!("rotated geotransform {:?}", gt)));
    }
    let (rows, cols) = band.data.dim();
    let to_index = |v: f64, max: usize| -> usize { v.clamp(0.0, max as f64) as usize };
    let c0 = to_index(((window.min_x - gt[0]) / gt[1] - WINDOW_SNAP).ceil(), cols);
    let c1 = to_index(((window.max_x - gt[0]) / gt[1] + WINDOW_SNAP).floor(), cols);
    let r0 = to_index(((gt[3] - window.max_y) / -gt[5] - WINDOW_SNAP).ceil(), rows);
    let r1 = to_index(((gt[3] - window.min_y) / -gt[5] + WINDOW_SNAP).floor(), rows);
    if c1 <= c0 || r1 <= r0 {
        return Err(Error::NoOverlap {
            footprint: band.extent().unwrap_or(Extent::new(gt[0], gt[3], gt[0], gt[3])),
            aoi: *window,
        });
    }
    debug!("crop window cols {}..{} rows {}..{}", c0, c1, r0, r1);
    Ok(RasterBand {
        data: band.data.slice(s![r0..r1, c0..c1]).to_owned(),
        geotransform: Some([
            gt[0] + c0 as f64 * gt[1],
            gt[1],
            0.0,
            gt[3] + r0 as f64 * gt[5],
            0.0,
            gt[5],
        ]),
        crs: band.crs,
        nodata: band.nodata,
        gcps: None,
    })
}

/// Bring one band onto the AOI window in `target_crs`: pass it through when
/// it already lies inside, crop when it shares the target CRS, otherwise warp
/// by its embedded (or geotransform-inferred) control points.
pub fn clip_to_aoi(
    mut band: RasterBand,
    aoi: &AreaOfInterest,
    target_crs: Crs,
    options: &WarpOptions,
) -> Result<(RasterBand, ClipMethod)> {
    if let (Some(crs), Some(gt), Some(extent)) = (band.crs, band.geotransform, band.extent()) {
        if crs == target_crs && is_north_up(&gt) {
            let window = aoi.extent_in(target_crs)?;
            if extent.within(&window, window.tolerance()) {
                return Ok((band, ClipMethod::AlreadyClipped));
            }
            return Ok((crop_to_extent(&band, &window)?, ClipMethod::Cropped));
        }
    }
    if band.gcps.is_none() {
        band.gcps = band.inferred_control_points();
    }
    let warped = warp_and_clip_with(&band, aoi, target_crs, options)?;
    Ok((warped, ClipMethod::Warped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::raster::GroundControlPoint as Gcp;
    use ndarray::Array2;

    /// 100x100 band whose GCPs place it on [10.0, 10.4] x [45.0, 45.4].
    fn gcp_band() -> RasterBand {
        let data = Array2::from_shape_fn((100, 100), |(r, c)| (1 + r + c) as f32);
        let mut gcps = Vec::new();
        for i in 0..=4 {
            for j in 0..=4 {
                let (px, ly) = (j as f64 * 25.0, i as f64 * 25.0);
                gcps.push(Gcp::new(px, ly, 10.0 + px * 0.004, 45.4 - ly * 0.004));
            }
        }
        RasterBand::new(data).with_nodata(0.0).with_gcps(gcps, Crs::WGS84)
    }

    #[test]
    fn output_lies_within_aoi_and_is_non_empty() {
        let aoi = AreaOfInterest::new(10.1, 45.05, 10.26, 45.21).unwrap();
        let out = warp_and_clip(&gcp_band(), &aoi, Crs::WGS84).unwrap();
        let e = out.extent().unwrap();
        assert!(!e.is_empty());
        assert!(e.within(&aoi.extent(), 1e-9));
        assert_eq!(out.crs, Some(Crs::WGS84));
        assert!(out.gcps.is_none());
        // native spacing of 0.004 degrees
        assert_eq!(out.cols(), 40);
        assert_eq!(out.rows(), 40);
    }

    #[test]
    fn aoi_larger_than_footprint_is_clipped_to_footprint() {
        let aoi = AreaOfInterest::new(9.0, 44.0, 11.0, 46.0).unwrap();
        let out = warp_and_clip(&gcp_band(), &aoi, Crs::WGS84).unwrap();
        let e = out.extent().unwrap();
        assert!((e.min_x - 10.0).abs() < 1e-6 && (e.max_x - 10.4).abs() < 1e-6);
        assert!((e.min_y - 45.0).abs() < 1e-6 && (e.max_y - 45.4).abs() < 1e-6);
        assert_eq!(out.data.dim(), (100, 100));
        // identity-like mapping: pixel centres land on their own samples
        assert!((out.data[[10, 20]] - 31.0).abs() < 1e-2);
    }

    #[test]
    fn fewer_than_three_points_fail() {
        let mut band = gcp_band();
        band.gcps.as_mut().unwrap().points.truncate(2);
        let aoi = AreaOfInterest::new(10.1, 45.05, 10.26, 45.21).unwrap();
        let err = warp_and_clip(&band, &aoi, Crs::WGS84).unwrap_err();
        assert!(matches!(err, Error::InsufficientControlPoints { found: 2, .. }));

        band.gcps = None;
        let err = warp_and_clip(&band, &aoi, Crs::WGS84).unwrap_err();
        assert!(matches!(err, Error::InsufficientControlPoints { found: 0, .. }));
    }

    #[test]
    fn three_collinear_points_fail() {
        let mut band = gcp_band();
        band.gcps.as_mut().unwrap().points = vec![
            Gcp::new(0.0, 0.0, 10.0, 45.4),
            Gcp::new(50.0, 50.0, 10.2, 45.2),
            Gcp::new(100.0, 100.0, 10.4, 45.0),
        ];
        let aoi = AreaOfInterest::new(10.1, 45.05, 10.26, 45.21).unwrap();
        let err = warp_and_clip(&band, &aoi, Crs::WGS84).unwrap_err();
        assert!(matches!(err, Error::InsufficientControlPoints { found: 3, .. }));
    }

    #[test]
    fn disjoint_aoi_is_no_overlap() {
        let aoi = AreaOfInterest::new(20.0, 45.0, 20.5, 45.3).unwrap();
        let err = warp_and_clip(&gcp_band(), &aoi, Crs::WGS84).unwrap_err();
        assert!(matches!(err, Error::NoOverlap { .. }));
    }

    #[test]
    fn gcp_order_does_not_change_output() {
        let aoi = AreaOfInterest::new(10.05, 45.05, 10.3, 45.3).unwrap();
        let a = warp_and_clip(&gcp_band(), &aoi, Crs::WGS84).unwrap();
        let mut shuffled = gcp_band();
        shuffled.gcps.as_mut().unwrap().points.reverse();
        let b = warp_and_clip(&shuffled, &aoi, Crs::WGS84).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn nodata_source_pixels_are_not_interpolated() {
        let mut band = gcp_band();
        band.data.fill(0.0);
        let aoi = AreaOfInterest::new(10.1, 45.05, 10.26, 45.21).unwrap();
        let out = warp_and_clip(&band, &aoi, Crs::WGS84).unwrap();
        assert!(out.data.iter().all(|&v| v == 0.0));
        assert_eq!(out.nodata, Some(0.0));
    }

    #[test]
    fn metric_resolution_in_geographic_crs_is_rejected() {
        let aoi = AreaOfInterest::new(10.1, 45.05, 10.26, 45.21).unwrap();
        let options = WarpOptions {
            resolution: Some(Resolution::Meters(10.0)),
            ..WarpOptions::default()
        };
        let err = warp_and_clip_with(&gcp_band(), &aoi, Crs::WGS84, &options).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "resolution", .. }));

        let options = WarpOptions {
            resolution: Some(Resolution::Degrees(0.01)),
            ..WarpOptions::default()
        };
        let out = warp_and_clip_with(&gcp_band(), &aoi, Crs::WGS84, &options).unwrap();
        assert_eq!(out.cols(), 16);
        assert!(out.extent().unwrap().within(&aoi.extent(), 1e-9));
    }

    #[test]
    fn exact_and_approximate_transformers_agree_for_affine_gcps() {
        let aoi = AreaOfInterest::new(10.1, 45.05, 10.26, 45.21).unwrap();
        let exact = WarpOptions {
            error_threshold: 0.0,
            ..WarpOptions::default()
        };
        let a = warp_and_clip_with(&gcp_band(), &aoi, Crs::WGS84, &exact).unwrap();
        let b = warp_and_clip(&gcp_band(), &aoi, Crs::WGS84).unwrap();
        assert_eq!(a.data.dim(), b.data.dim());
        for (x, y) in a.data.iter().zip(b.data.iter()) {
            assert!((x - y).abs() < 1e-2);
        }

        let negative = WarpOptions {
            error_threshold: -1.0,
            ..WarpOptions::default()
        };
        let err = warp_and_clip_with(&gcp_band(), &aoi, Crs::WGS84, &negative).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "error_threshold", .. }));
    }

    #[test]
    fn undeclared_nodata_defaults_to_zero_and_is_not_blended() {
        // raw GRD: zero border on the left half, no nodata marker
        let data = Array2::from_shape_fn((100, 100), |(_, c)| if c < 50 { 0.0 } else { 100.0 });
        let band = RasterBand {
            nodata: None,
            data,
            ..gcp_band()
        };
        let aoi = AreaOfInterest::new(10.102, 45.05, 10.302, 45.3).unwrap();
        let out = warp_and_clip(&band, &aoi, Crs::WGS84).unwrap();
        assert_eq!(out.nodata, Some(0.0));
        assert!(out.data.iter().any(|&v| v == 0.0));
        assert!(out.data.iter().any(|&v| v != 0.0));
        for &v in out.data.iter() {
            assert!(v == 0.0 || (v - 100.0).abs() < 1e-3, "blended value {v}");
        }
    }

    #[test]
    fn duplicate_control_points_are_dropped() {
        let mut band = gcp_band();
        let points = &mut band.gcps.as_mut().unwrap().points;
        let repeated: Vec<Gcp> = points.iter().take(5).copied().collect();
        points.extend(repeated);
        // same tie point with a slightly different ground position
        let mut conflicting = points[12];
        conflicting.geo_x += 1e-7;
        points.push(conflicting);
        assert_eq!(dedup_control_points(points).len(), 25);

        let aoi = AreaOfInterest::new(10.1, 45.05, 10.26, 45.21).unwrap();
        let out = warp_and_clip(&band, &aoi, Crs::WGS84).unwrap();
        let clean = warp_and_clip(&gcp_band(), &aoi, Crs::WGS84).unwrap();
        assert_eq!(out.data.dim(), clean.data.dim());
        assert_eq!(out.geotransform, clean.geotransform);
    }

    #[test]
    fn coincident_control_points_are_insufficient() {
        let mut band = gcp_band();
        band.gcps.as_mut().unwrap().points = vec![
            Gcp::new(10.0, 10.0, 10.04, 45.36),
            Gcp::new(10.0, 10.0, 10.04, 45.36),
            Gcp::new(10.0, 10.0, 10.05, 45.35),
            Gcp::new(60.0, 20.0, 10.24, 45.32),
        ];
        let aoi = AreaOfInterest::new(10.1, 45.05, 10.26, 45.21).unwrap();
        let err = warp_and_clip(&band, &aoi, Crs::WGS84).unwrap_err();
        assert!(matches!(err, Error::InsufficientControlPoints { found: 2, .. }));
    }

    #[test]
    fn spread_ratio_separates_lines_from_areas() {
        let square = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)];
        assert!((spread_ratio(&square) - 1.0).abs() < 1e-12);
        let line = [(0.0, 0.0), (1.0, 2.0), (2.0, 4.0)];
        assert!(spread_ratio(&line) < COLLINEAR_SPREAD);
    }

    #[test]
    fn crop_keeps_only_pixels_inside_window() {
        let band = RasterBand::new(Array2::from_shape_fn((10, 10), |(r, c)| (r * 10 + c) as f32))
            .with_geotransform([10.0, 0.1, 0.0, 46.0, 0.0, -0.1], Crs::WGS84);
        let window = Extent::new(10.25, 45.2, 10.7, 45.75);
        let out = crop_to_extent(&band, &window).unwrap();
        // cols 3..7, rows 3..8
        assert_eq!(out.data.dim(), (5, 4));
        assert_eq!(out.data[[0, 0]], 33.0);
        assert!(out.extent().unwrap().within(&window, 1e-9));

        let far = Extent::new(20.0, 45.0, 21.0, 46.0);
        assert!(matches!(crop_to_extent(&band, &far), Err(Error::NoOverlap { .. })));
    }

    #[test]
    fn clip_to_aoi_passes_bounded_bands_through() {
        let band = RasterBand::new(Array2::zeros((3, 5)))
            .with_geotransform([10.1, 0.01, 0.0, 45.2, 0.0, -0.01], Crs::WGS84);
        let aoi = AreaOfInterest::new(10.0, 45.0, 10.5, 45.3).unwrap();
        let (out, method) = clip_to_aoi(band.clone(), &aoi, Crs::WGS84, &WarpOptions::default()).unwrap();
        assert_eq!(method, ClipMethod::AlreadyClipped);
        assert_eq!(out, band);
    }

    #[test]
    fn clip_to_aoi_without_georeferencing_is_insufficient_control_points() {
        let aoi = AreaOfInterest::new(10.0, 45.0, 10.5, 45.3).unwrap();
        let err = clip_to_aoi(RasterBand::new(Array2::zeros((3, 3))), &aoi, Crs::WGS84, &WarpOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientControlPoints { found: 0, .. }));
    }
}
