use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::geometry::{AreaOfInterest, Crs, DateRange};
use crate::core::processing::{Resolution, WarpOptions};
use crate::error::{Error, Result};
use crate::types::{BackendKind, ResampleMethod, SourceKind};

/// External SNAP correction engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapSettings {
    /// Command invoked as `<exe> <archive> <aoi.geojson> EPSG:<code> <out_dir> <spacing>`
    #[serde(default = "default_snap_executable")]
    pub executable: PathBuf,
    /// Output pixel spacing in metres.
    #[serde(default = "default_snap_spacing")]
    pub spacing: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            executable: default_snap_executable(),
            spacing: default_snap_spacing(),
        }
    }
}

fn default_snap_executable() -> PathBuf {
    PathBuf::from("snap-rtc")
}

fn default_snap_spacing() -> f64 {
    10.0
}

fn default_target_crs() -> Crs {
    Crs::WGS84
}

fn default_backend() -> BackendKind {
    BackendKind::GcpWarp
}

fn default_source() -> SourceKind {
    SourceKind::ArchiveApi
}

fn default_workdir_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_warp_error_threshold() -> f64 {
    0.125
}

/// Everything one run needs, passed by value into the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// `[min_lon, min_lat, max_lon, max_lat]` in WGS84 degrees
    pub aoi: AreaOfInterest,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    /// EPSG code of the output grid
    #[serde(default = "default_target_crs")]
    pub target_crs: Crs,
    #[serde(default = "default_backend")]
    pub backend: BackendKind,
    #[serde(default = "default_source")]
    pub source: SourceKind,
    /// Parent directory of the per-run working directories
    #[serde(default = "default_workdir_root")]
    pub workdir_root: PathBuf,
    /// Local directory the staged catalog serves scenes from
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,
    #[serde(default)]
    pub resample: ResampleMethod,
    /// Explicit output pixel size; native spacing when absent
    #[serde(default)]
    pub resolution: Option<Resolution>,
    /// gdalwarp transformer error threshold in pixels; 0 is exact
    #[serde(default = "default_warp_error_threshold")]
    pub warp_error_threshold: f64,
    #[serde(default)]
    pub snap: SnapSettings,
}

impl RunConfig {
    pub fn new(aoi: AreaOfInterest, date_start: NaiveDate, date_end: NaiveDate) -> Self {
        Self {
            aoi,
            date_start,
            date_end,
            target_crs: default_target_crs(),
            backend: default_backend(),
            source: default_source(),
            workdir_root: default_workdir_root(),
            staging_dir: None,
            resample: ResampleMethod::default(),
            resolution: None,
            warp_error_threshold: default_warp_error_threshold(),
            snap: SnapSettings::default(),
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: RunConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Cross-field checks; AOI and CRS are validated on construction.
    pub fn validate(&self) -> Result<()> {
        self.date_range()?;
        if self.backend == BackendKind::Snap && self.source == SourceKind::CloudObject {
            return Err(Error::invalid(
                "source",
                "the snap backend needs an archive_api source",
            ));
        }
        if !(self.snap.spacing.is_finite() && self.snap.spacing > 0.0) {
            return Err(Error::invalid("snap.spacing", self.snap.spacing));
        }
        if !(self.warp_error_threshold.is_finite() && self.warp_error_threshold >= 0.0) {
            return Err(Error::invalid("warp_error_threshold", self.warp_error_threshold));
        }
        Ok(())
    }

    pub fn date_range(&self) -> Result<DateRange> {
        DateRange::new(self.date_start, self.date_end)
    }

    pub fn warp_options(&self) -> WarpOptions {
        WarpOptions {
            resample: self.resample,
            resolution: self.resolution,
            error_threshold: self.warp_error_threshold,
        }
    }
}
