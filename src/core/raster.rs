//! In-memory raster model: single bands with georeferencing, their ground
//! control points, and the three-band dB composite.
use std::cmp::Ordering;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::core::geometry::{Crs, Extent};

/// GDAL affine coefficients `[origin_x, pixel_width, rot_x, origin_y, rot_y, pixel_height]`.
pub type GeoTransform = [f64; 6];

/// Grid density of control points synthesized from a geotransform.
const INFERRED_GCP_GRID: usize = 5;

/// Pixel/line (pixel-edge convention) to ground coordinate correspondence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundControlPoint {
    pub pixel_x: f64,
    pub pixel_y: f64,
    pub geo_x: f64,
    pub geo_y: f64,
    pub geo_z: f64,
}

impl GroundControlPoint {
    pub fn new(pixel_x: f64, pixel_y: f64, geo_x: f64, geo_y: f64) -> Self {
        Self {
            pixel_x,
            pixel_y,
            geo_x,
            geo_y,
            geo_z: 0.0,
        }
    }

    /// Total order (line, pixel, then ground) so fits never depend on input order.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.pixel_y
            .total_cmp(&other.pixel_y)
            .then(self.pixel_x.total_cmp(&other.pixel_x))
            .then(self.geo_y.total_cmp(&other.geo_y))
            .then(self.geo_x.total_cmp(&other.geo_x))
            .then(self.geo_z.total_cmp(&other.geo_z))
    }
}

/// Control points together with the CRS their ground coordinates are in.
#[derive(Debug, Clone, PartialEq)]
pub struct GcpSet {
    pub points: Vec<GroundControlPoint>,
    pub crs: Crs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RasterBand {
    /// Pixel grid, shape (rows, cols).
    pub data: Array2<f32>,
    pub geotransform: Option<GeoTransform>,
    pub crs: Option<Crs>,
    pub nodata: Option<f64>,
    pub gcps: Option<GcpSet>,
}

impl RasterBand {
    pub fn new(data: Array2<f32>) -> Self {
        Self {
            data,
            geotransform: None,
            crs: None,
            nodata: None,
            gcps: None,
        }
    }

    pub fn with_geotransform(mut self, gt: GeoTransform, crs: Crs) -> Self {
        self.geotransform = Some(gt);
        self.crs = Some(crs);
        self
    }

    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = Some(nodata);
        self
    }

    pub fn with_gcps(mut self, points: Vec<GroundControlPoint>, crs: Crs) -> Self {
        self.gcps = Some(GcpSet { points, crs });
        self
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// True when `v` is the nodata marker. NaN pixels always count as nodata.
    pub fn is_nodata(&self, v: f32) -> bool {
        match self.nodata {
            Some(nd) if nd.is_nan() => v.is_nan(),
            Some(nd) => v.is_nan() || f64::from(v) == nd,
            None => v.is_nan(),
        }
    }

    /// Ground extent covered by the grid, from the geotransform.
    pub fn extent(&self) -> Option<Extent> {
        let gt = self.geotransform?;
        let (rows, cols) = (self.rows() as f64, self.cols() as f64);
        let corners = [(0.0, 0.0), (cols, 0.0), (0.0, rows), (cols, rows)];
        Extent::envelope(corners.iter().map(|&(px, ly)| apply_geotransform(&gt, px, ly)))
    }

    /// Control points sampled on a regular grid through the geotransform, for
    /// bands that are georeferenced but carry no embedded GCPs.
    pub fn inferred_control_points(&self) -> Option<GcpSet> {
        let gt = self.geotransform?;
        let crs = self.crs?;
        let (rows, cols) = (self.rows() as f64, self.cols() as f64);
        let n = INFERRED_GCP_GRID;
        let mut points = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                let px = cols * j as f64 / (n - 1) as f64;
                let ly = rows * i as f64 / (n - 1) as f64;
                let (x, y) = apply_geotransform(&gt, px, ly);
                points.push(GroundControlPoint::new(px, ly, x, y));
            }
        }
        Some(GcpSet { points, crs })
    }
}

/// Pixel-edge coordinates to ground coordinates.
pub fn apply_geotransform(gt: &GeoTransform, px: f64, ly: f64) -> (f64, f64) {
    (
        gt[0] + px * gt[1] + ly * gt[2],
        gt[3] + px * gt[4] + ly * gt[5],
    )
}

/// North-up: no rotation terms, positive width and negative height.
pub fn is_north_up(gt: &GeoTransform) -> bool {
    gt[2] == 0.0 && gt[4] == 0.0 && gt[1] > 0.0 && gt[5] < 0.0
}

/// Three-band composite: R = VV dB, G = VH dB, B = VV dB − VH dB.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeRaster {
    pub red: Array2<f32>,
    pub green: Array2<f32>,
    pub blue: Array2<f32>,
    pub geotransform: GeoTransform,
    pub crs: Crs,
    pub nodata: f32,
}

impl CompositeRaster {
    pub const BAND_NAMES: [&'static str; 3] = ["VV_dB", "VH_dB", "VV_minus_VH_dB"];

    pub fn bands(&self) -> [&Array2<f32>; 3] {
        [&self.red, &self.green, &self.blue]
    }

    /// (rows, cols)
    pub fn dim(&self) -> (usize, usize) {
        self.red.dim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_follows_geotransform() {
        let band = RasterBand::new(Array2::zeros((10, 20)))
            .with_geotransform([10.0, 0.01, 0.0, 45.3, 0.0, -0.02], Crs::WGS84);
        let e = band.extent().unwrap();
        assert!((e.min_x - 10.0).abs() < 1e-12);
        assert!((e.max_x - 10.2).abs() < 1e-12);
        assert!((e.min_y - 45.1).abs() < 1e-12);
        assert!((e.max_y - 45.3).abs() < 1e-12);
    }

    #[test]
    fn nodata_matching_includes_nan() {
        let band = RasterBand::new(Array2::zeros((1, 1))).with_nodata(-9999.0);
        assert!(band.is_nodata(-9999.0));
        assert!(band.is_nodata(f32::NAN));
        assert!(!band.is_nodata(0.0));
        let unmarked = RasterBand::new(Array2::zeros((1, 1)));
        assert!(!unmarked.is_nodata(0.0));
    }

    #[test]
    fn inferred_points_reproduce_geotransform_corners() {
        let gt = [500000.0, 10.0, 0.0, 4500000.0, 0.0, -10.0];
        let band = RasterBand::new(Array2::zeros((100, 200)))
            .with_geotransform(gt, Crs::from_epsg(32634).unwrap());
        let set = band.inferred_control_points().unwrap();
        assert_eq!(set.points.len(), 25);
        let last = set.points.last().unwrap();
        assert_eq!((last.pixel_x, last.pixel_y), (200.0, 100.0));
        assert_eq!((last.geo_x, last.geo_y), (502000.0, 4499000.0));
    }

    #[test]
    fn canonical_order_is_line_major() {
        let mut pts = vec![
            GroundControlPoint::new(5.0, 1.0, 0.0, 0.0),
            GroundControlPoint::new(0.0, 1.0, 0.0, 0.0),
            GroundControlPoint::new(9.0, 0.0, 0.0, 0.0),
        ];
        pts.sort_by(GroundControlPoint::canonical_cmp);
        assert_eq!(pts[0].pixel_x, 9.0);
        assert_eq!(pts[1].pixel_x, 0.0);
    }
}
