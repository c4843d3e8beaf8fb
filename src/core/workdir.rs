//! Per-run working directory: `<run_id>_S1_<SOURCE>_<BACKEND>/` with the AOI
//! GeoJSON, backend intermediates, the `dist/` products and the `run.json`
//! stage report.
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::debug;

use crate::core::geometry::AreaOfInterest;
use crate::error::{Error, Result};
use crate::types::{BackendKind, SourceKind};

pub const AOI_GEOJSON: &str = "aoi.geojson";
pub const RUN_REPORT: &str = "run.json";
pub const RTC_DIR: &str = "rtc_out";
pub const EXTRACT_DIR: &str = "extract";
pub const DIST_DIR: &str = "dist";
pub const VV_CLIP: &str = "VV_clip.tif";
pub const VH_CLIP: &str = "VH_clip.tif";
pub const RGB_COMPOSITE: &str = "S1_RGB.tif";

/// Run id derived from the run start time, `YYYYmmdd_HHMMSS`.
pub fn run_id_from(started: NaiveDateTime) -> String {
    started.format("%Y%m%d_%H%M%S").to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkdirLayout {
    root: PathBuf,
    backend: BackendKind,
}

impl WorkdirLayout {
    pub fn dir_name(run_id: &str, source: SourceKind, backend: BackendKind) -> String {
        format!("{}_S1_{}_{}", run_id, source.dir_tag(), backend.dir_tag())
    }

    /// Layout for a run without touching the filesystem.
    pub fn new(parent: &Path, run_id: &str, source: SourceKind, backend: BackendKind) -> Self {
        Self {
            root: parent.join(Self::dir_name(run_id, source, backend)),
            backend,
        }
    }

    /// Create the run directory and its subdirectories. Fails if the run
    /// directory already exists: one directory belongs to exactly one run.
    pub fn create(parent: &Path, run_id: &str, source: SourceKind, backend: BackendKind) -> Result<Self> {
        let layout = Self::new(parent, run_id, source, backend);
        fs::create_dir_all(parent)?;
        fs::create_dir(&layout.root).map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                Error::invalid("workdir", format!("{} already exists", layout.root.display()))
            } else {
                Error::Io(e)
            }
        })?;
        fs::create_dir(layout.intermediates_dir())?;
        fs::create_dir(layout.dist_dir())?;
        debug!("created workdir {}", layout.root.display());
        Ok(layout)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn aoi_geojson(&self) -> PathBuf {
        self.root.join(AOI_GEOJSON)
    }

    pub fn report_path(&self) -> PathBuf {
        self.root.join(RUN_REPORT)
    }

    /// Backend-specific intermediates: `rtc_out/` for SNAP, `extract/` otherwise.
    pub fn intermediates_dir(&self) -> PathBuf {
        match self.backend {
            BackendKind::Snap => self.rtc_dir(),
            BackendKind::GcpWarp => self.extract_dir(),
        }
    }

    pub fn rtc_dir(&self) -> PathBuf {
        self.root.join(RTC_DIR)
    }

    pub fn extract_dir(&self) -> PathBuf {
        self.root.join(EXTRACT_DIR)
    }

    /// Where the acquisition stage stores downloads: the run root holds the
    /// archive only for SNAP runs.
    pub fn download_dir(&self) -> PathBuf {
        match self.backend {
            BackendKind::Snap => self.root.clone(),
            BackendKind::GcpWarp => self.extract_dir(),
        }
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.root.join(DIST_DIR)
    }

    pub fn vv_clip(&self) -> PathBuf {
        self.dist_dir().join(VV_CLIP)
    }

    pub fn vh_clip(&self) -> PathBuf {
        self.dist_dir().join(VH_CLIP)
    }

    pub fn rgb(&self) -> PathBuf {
        self.dist_dir().join(RGB_COMPOSITE)
    }

    pub fn write_aoi_geojson(&self, aoi: &AreaOfInterest) -> Result<PathBuf> {
        let path = self.aoi_geojson();
        fs::write(&path, serde_json::to_string(&aoi.to_geojson())?)?;
        Ok(path)
    }
}
