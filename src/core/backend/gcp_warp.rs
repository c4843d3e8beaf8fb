use tracing::info;

use crate::core::backend::{
    Acquired, Backend, BandPair, CorrectionContext, Download, Downloader,
};
use crate::core::scene::SceneReference;
use crate::core::workdir::WorkdirLayout;
use crate::error::{Error, Result};
use crate::io::archive::{extract_safe, find_measurements};
use crate::io::gdal::load_band;
use crate::types::BackendKind;

/// Loads raw measurement rasters with their embedded GCPs. Geometric
/// correction is left to the warp-clip engine in the clipping stage.
pub struct GcpWarpBackend {
    downloader: Box<dyn Downloader>,
}

impl GcpWarpBackend {
    pub fn new(downloader: Box<dyn Downloader>) -> Self {
        Self { downloader }
    }
}

impl Backend for GcpWarpBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::GcpWarp
    }

    fn acquire(&self, scene: &SceneReference, layout: &WorkdirLayout) -> Result<Acquired> {
        let (vv_path, vh_path) = match self.downloader.download(scene, &layout.download_dir())? {
            Download::Archive(zip) => {
                let safe_dir = extract_safe(&zip, &layout.extract_dir())?;
                find_measurements(&safe_dir)?
            }
            Download::Rasters { vv, vh } => (vv, vh),
        };
        info!("RAW VV: {}", vv_path.display());
        info!("RAW VH: {}", vh_path.display());
        Ok(Acquired::Bands(BandPair {
            vv: load_band(&vv_path)?,
            vh: load_band(&vh_path)?,
        }))
    }

    /// Pass-through: the bands keep their GCPs for the warp-clip engine.
    fn correct(&self, acquired: Acquired, _ctx: &CorrectionContext<'_>) -> Result<BandPair> {
        match acquired {
            Acquired::Bands(pair) => Ok(pair),
            Acquired::Archive(path) => Err(Error::backend(format!(
                "GCP warp expects loaded bands, got archive {}",
                path.display()
            ))),
        }
    }
}
