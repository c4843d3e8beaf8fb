//! Geometry primitives: the WGS84 area of interest, EPSG-coded CRS, date range
//! and axis-aligned extents, plus point reprojection through GDAL/OGR.
use chrono::NaiveDate;
use gdal::spatial_ref::{AxisMappingStrategy, CoordTransform, SpatialRef};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Samples per AOI edge when reprojecting the box into another CRS.
const EDGE_DENSIFY: usize = 21;

/// Bounding box in WGS84 degrees. Immutable once a run starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct AreaOfInterest {
    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,
}

impl AreaOfInterest {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self> {
        let values = [min_lon, min_lat, max_lon, max_lat];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::invalid("aoi", format!("{:?}", values)));
        }
        if !(-180.0..=180.0).contains(&min_lon) || !(-180.0..=180.0).contains(&max_lon) {
            return Err(Error::invalid(
                "aoi",
                format!("longitude outside [-180, 180]: {:?}", values),
            ));
        }
        if !(-90.0..=90.0).contains(&min_lat) || !(-90.0..=90.0).contains(&max_lat) {
            return Err(Error::invalid(
                "aoi",
                format!("latitude outside [-90, 90]: {:?}", values),
            ));
        }
        if min_lon >= max_lon || min_lat >= max_lat {
            return Err(Error::invalid(
                "aoi",
                format!("expected min < max on both axes: {:?}", values),
            ));
        }
        Ok(Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        })
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }
    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }
    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }
    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    /// The box as an extent in WGS84.
    pub fn extent(&self) -> Extent {
        Extent::new(self.min_lon, self.min_lat, self.max_lon, self.max_lat)
    }

    /// Envelope of the box expressed in `crs`. The border is densified before
    /// reprojection so curved edges in projected systems are covered.
    pub fn extent_in(&self, crs: Crs) -> Result<Extent> {
        if crs == Crs::WGS84 {
            return Ok(self.extent());
        }
        let mut xs = Vec::with_capacity(EDGE_DENSIFY * 4);
        let mut ys = Vec::with_capacity(EDGE_DENSIFY * 4);
        for i in 0..EDGE_DENSIFY {
            let t = i as f64 / (EDGE_DENSIFY - 1) as f64;
            let lon = self.min_lon + t * (self.max_lon - self.min_lon);
            let lat = self.min_lat + t * (self.max_lat - self.min_lat);
            xs.extend_from_slice(&[lon, lon, self.min_lon, self.max_lon]);
            ys.extend_from_slice(&[self.min_lat, self.max_lat, lat, lat]);
        }
        transform_points(Crs::WGS84, crs, &mut xs, &mut ys)?;
        Extent::envelope(xs.iter().copied().zip(ys.iter().copied()))
            .ok_or_else(|| Error::backend(format!("AOI could not be projected into {}", crs)))
    }

    /// GeoJSON FeatureCollection with the closed AOI polygon.
    pub fn to_geojson(&self) -> serde_json::Value {
        let ring = [
            [self.min_lon, self.min_lat],
            [self.max_lon, self.min_lat],
            [self.max_lon, self.max_lat],
            [self.min_lon, self.max_lat],
            [self.min_lon, self.min_lat],
        ];
        serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "Polygon", "coordinates": [ring] }
            }]
        })
    }
}

impl TryFrom<[f64; 4]> for AreaOfInterest {
    type Error = Error;

    fn try_from(v: [f64; 4]) -> Result<Self> {
        AreaOfInterest::new(v[0], v[1], v[2], v[3])
    }
}

impl From<AreaOfInterest> for [f64; 4] {
    fn from(a: AreaOfInterest) -> Self {
        [a.min_lon, a.min_lat, a.max_lon, a.max_lat]
    }
}

impl std::fmt::Display for AreaOfInterest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

/// Coordinate reference system identified by its EPSG code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Crs {
    epsg: u32,
}

impl Crs {
    pub const WGS84: Crs = Crs { epsg: 4326 };

    /// EPSG codes occupy 1024..=32767.
    pub fn from_epsg(code: u32) -> Result<Self> {
        if !(1024..=32767).contains(&code) {
            return Err(Error::invalid("target_crs", code));
        }
        Ok(Crs { epsg: code })
    }

    pub fn epsg(&self) -> u32 {
        self.epsg
    }

    pub fn spatial_ref(&self) -> Result<SpatialRef> {
        let mut srs = SpatialRef::from_epsg(self.epsg)?;
        // lon/lat (x/y) order regardless of the authority's axis definition
        srs.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
        Ok(srs)
    }

    pub fn to_wkt(&self) -> Result<String> {
        Ok(self.spatial_ref()?.to_wkt()?)
    }

    /// True when coordinates are angular (degrees).
    pub fn is_geographic(&self) -> Result<bool> {
        match self.epsg {
            4326 | 4258 | 4269 | 4267 | 4230 => Ok(true),
            _ => Ok(self.spatial_ref()?.is_geographic()),
        }
    }
}

impl TryFrom<u32> for Crs {
    type Error = Error;

    fn try_from(code: u32) -> Result<Self> {
        Crs::from_epsg(code)
    }
}

impl From<Crs> for u32 {
    fn from(c: Crs) -> Self {
        c.epsg
    }
}

impl std::str::FromStr for Crs {
    type Err = Error;

    /// Accepts `4326`, `EPSG:4326` (any case).
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let code = match trimmed.split_once(':') {
            Some((auth, code)) if auth.eq_ignore_ascii_case("epsg") => code,
            Some(_) => return Err(Error::invalid("target_crs", s)),
            None => trimmed,
        };
        let code: u32 = code
            .trim()
            .parse()
            .map_err(|_| Error::invalid("target_crs", s))?;
        Crs::from_epsg(code)
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.epsg)
    }
}

/// Inclusive calendar date range used to select the acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::invalid("date_range", format!("{} > {}", start, end)));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.start, self.end)
    }
}

/// Axis-aligned box in some CRS's units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Bounding box of a point cloud; `None` when empty or non-finite.
    pub fn envelope(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut acc: Option<Extent> = None;
        for (x, y) in points {
            if !x.is_finite() || !y.is_finite() {
                return None;
            }
            acc = Some(match acc {
                None => Extent::new(x, y, x, y),
                Some(e) => Extent::new(e.min_x.min(x), e.min_y.min(y), e.max_x.max(x), e.max_y.max(y)),
            });
        }
        acc
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn is_empty(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    /// Overlap with positive area, if any.
    pub fn intersection(&self, other: &Extent) -> Option<Extent> {
        let e = Extent::new(
            self.min_x.max(other.min_x),
            self.min_y.max(other.min_y),
            self.max_x.min(other.max_x),
            self.max_y.min(other.max_y),
        );
        if e.is_empty() { None } else { Some(e) }
    }

    /// Containment with an absolute tolerance on every edge.
    pub fn within(&self, outer: &Extent, tolerance: f64) -> bool {
        self.min_x >= outer.min_x - tolerance
            && self.min_y >= outer.min_y - tolerance
            && self.max_x <= outer.max_x + tolerance
            && self.max_y <= outer.max_y + tolerance
    }

    /// Tolerance for comparing extents derived by floating-point grid math:
    /// a relative 1e-9 of the largest coordinate magnitude.
    pub fn tolerance(&self) -> f64 {
        let scale = [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .fold(1.0_f64, |m, v| m.max(v.abs()));
        scale * 1e-9
    }
}

impl std::fmt::Display for Extent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:.6}, {:.6}, {:.6}, {:.6}]",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// Reproject coordinates in place. A no-op when both systems are equal.
pub fn transform_points(from: Crs, to: Crs, xs: &mut [f64], ys: &mut [f64]) -> Result<()> {
    if from == to {
        return Ok(());
    }
    let src = from.spatial_ref()?;
    let dst = to.spatial_ref()?;
    let transform = CoordTransform::new(&src, &dst)?;
    let mut zs = vec![0.0; xs.len()];
    transform.transform_coords(xs, ys, &mut zs)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aoi_rejects_inverted_and_out_of_range_boxes() {
        assert!(AreaOfInterest::new(10.0, 45.0, 10.5, 45.3).is_ok());
        assert!(AreaOfInterest::new(10.5, 45.0, 10.0, 45.3).is_err());
        assert!(AreaOfInterest::new(10.0, 45.3, 10.5, 45.3).is_err());
        assert!(AreaOfInterest::new(-181.0, 45.0, 10.5, 45.3).is_err());
        assert!(AreaOfInterest::new(10.0, 45.0, 10.5, 91.0).is_err());
        assert!(AreaOfInterest::new(f64::NAN, 45.0, 10.5, 45.3).is_err());
    }

    #[test]
    fn aoi_deserializes_from_bbox_array_with_validation() {
        let aoi: AreaOfInterest = serde_json::from_str("[10.0, 45.0, 10.5, 45.3]").unwrap();
        assert_eq!(aoi.max_lat(), 45.3);
        assert!(serde_json::from_str::<AreaOfInterest>("[10.5, 45.0, 10.0, 45.3]").is_err());
    }

    #[test]
    fn aoi_geojson_ring_is_closed() {
        let aoi = AreaOfInterest::new(1.0, 2.0, 3.0, 4.0).unwrap();
        let gj = aoi.to_geojson();
        let ring = &gj["features"][0]["geometry"]["coordinates"][0];
        assert_eq!(ring.as_array().unwrap().len(), 5);
        assert_eq!(ring[0], ring[4]);
        assert_eq!(ring[2][0].as_f64(), Some(3.0));
    }

    #[test]
    fn wgs84_extent_needs_no_reprojection() {
        let aoi = AreaOfInterest::new(10.0, 45.0, 10.5, 45.3).unwrap();
        assert_eq!(aoi.extent_in(Crs::WGS84).unwrap(), aoi.extent());
    }

    #[test]
    fn crs_parsing() {
        assert_eq!("4326".parse::<Crs>().unwrap(), Crs::WGS84);
        assert_eq!("epsg:32634".parse::<Crs>().unwrap().epsg(), 32634);
        assert!("ESRI:102100".parse::<Crs>().is_err());
        assert!("EPSG:12".parse::<Crs>().is_err());
        assert!("abc".parse::<Crs>().is_err());
        assert_eq!(Crs::WGS84.to_string(), "EPSG:4326");
        assert!(Crs::WGS84.is_geographic().unwrap());
    }

    #[test]
    fn reprojection_uses_lon_lat_order() {
        // zone 32N central meridian is 9°E
        let utm = Crs::from_epsg(32632).unwrap();
        let (mut xs, mut ys) = (vec![9.0], vec![45.0]);
        transform_points(Crs::WGS84, utm, &mut xs, &mut ys).unwrap();
        assert!((xs[0] - 500_000.0).abs() < 1e-3);
        assert!((ys[0] - 4_982_950.4).abs() < 1.0);

        transform_points(utm, Crs::WGS84, &mut xs, &mut ys).unwrap();
        assert!((xs[0] - 9.0).abs() < 1e-9 && (ys[0] - 45.0).abs() < 1e-9);
    }

    #[test]
    fn date_range_ordering() {
        let a = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
        let r = DateRange::new(a, b).unwrap();
        assert!(r.contains(a) && r.contains(b));
        assert!(!r.contains(NaiveDate::from_ymd_opt(2025, 12, 16).unwrap()));
        assert!(DateRange::new(b, a).is_err());
        assert!(DateRange::new(a, a).is_ok());
    }

    #[test]
    fn extent_intersection_requires_positive_area() {
        let a = Extent::new(0.0, 0.0, 2.0, 2.0);
        let b = Extent::new(1.0, 1.0, 3.0, 3.0);
        assert_eq!(a.intersection(&b), Some(Extent::new(1.0, 1.0, 2.0, 2.0)));
        let touching = Extent::new(2.0, 0.0, 3.0, 2.0);
        assert_eq!(a.intersection(&touching), None);
        assert!(Extent::new(1.0, 1.0, 2.0, 2.0).within(&a, 0.0));
        assert!(!b.within(&a, 1e-9));
    }
}
