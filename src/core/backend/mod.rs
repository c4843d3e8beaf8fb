//! Backend strategies and the external collaborators they drive.
//!
//! A [`Backend`] turns a selected scene into a VV/VH band pair in two steps:
//! `acquire` fetches the input into the run's workdir and `correct` applies
//! whatever geometric correction the strategy owns. The orchestrator only sees
//! this trait; the concrete variant is chosen once per run from configuration.
//!
//! Collaborators ([`SceneCatalog`], [`Downloader`], [`CorrectionEngine`]) are
//! blocking calls; their concurrency and retry policies are their own.
use std::path::{Path, PathBuf};

use crate::core::geometry::{AreaOfInterest, Crs};
use crate::core::raster::RasterBand;
use crate::core::scene::{SceneReference, SearchRequest};
use crate::core::workdir::WorkdirLayout;
use crate::error::Result;
use crate::types::BackendKind;

pub mod gcp_warp;
pub mod snap;

pub use gcp_warp::GcpWarpBackend;
pub use snap::SnapGeocodeBackend;

/// Scene search, returning matches most-recent-first.
pub trait SceneCatalog {
    fn search(&self, request: &SearchRequest) -> Result<Vec<SceneReference>>;
}

/// What a download produced on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Download {
    /// Zipped SAFE product
    Archive(PathBuf),
    /// One raster per polarization
    Rasters { vv: PathBuf, vh: PathBuf },
}

pub trait Downloader {
    /// Fetch `scene` into `dest_dir`. Failures surface as `DownloadFailed`.
    fn download(&self, scene: &SceneReference, dest_dir: &Path) -> Result<Download>;
}

/// Arguments of one external correction call.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapRequest {
    pub input_archive: PathBuf,
    pub aoi_geojson: PathBuf,
    pub aoi: AreaOfInterest,
    pub target_crs: Crs,
    pub output_dir: PathBuf,
    /// Output pixel spacing in metres
    pub spacing: f64,
}

/// Opaque radiometric/geometric correction engine. On success it has written
/// `*VV*.tif` and `*VH*.tif` somewhere under `output_dir`.
pub trait CorrectionEngine {
    fn run(&self, request: &SnapRequest) -> Result<()>;
}

/// Co-acquired polarization bands.
#[derive(Debug, Clone, PartialEq)]
pub struct BandPair {
    pub vv: RasterBand,
    pub vh: RasterBand,
}

/// Output of the acquisition stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Acquired {
    Archive(PathBuf),
    Bands(BandPair),
}

impl Acquired {
    pub fn describe(&self) -> String {
        match self {
            Acquired::Archive(path) => format!("archive {}", path.display()),
            Acquired::Bands(pair) => format!(
                "VV {}x{}, VH {}x{}",
                pair.vv.cols(),
                pair.vv.rows(),
                pair.vh.cols(),
                pair.vh.rows()
            ),
        }
    }
}

/// Run-level inputs of the correction step.
#[derive(Debug, Clone, Copy)]
pub struct CorrectionContext<'a> {
    pub aoi: &'a AreaOfInterest,
    pub target_crs: Crs,
    pub layout: &'a WorkdirLayout,
}

/// A processing strategy: acquisition followed by correction.
pub trait Backend {
    fn kind(&self) -> BackendKind;

    fn acquire(&self, scene: &SceneReference, layout: &WorkdirLayout) -> Result<Acquired>;

    fn correct(&self, acquired: Acquired, ctx: &CorrectionContext<'_>) -> Result<BandPair>;
}
