//! External SNAP correction engine invoked as a child process.
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info};

use crate::core::backend::{CorrectionEngine, SnapRequest};
use crate::error::{Error, Result};

/// Runs `<executable> <archive> <aoi.geojson> EPSG:<code> <output_dir> <spacing>`
/// and waits for it. The engine is expected to write linear-scale
/// terrain-corrected `*VV*.tif` / `*VH*.tif` under `output_dir`.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapCommandEngine {
    executable: PathBuf,
}

impl SnapCommandEngine {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn args(request: &SnapRequest) -> Vec<String> {
        vec![
            request.input_archive.display().to_string(),
            request.aoi_geojson.display().to_string(),
            request.target_crs.to_string(),
            request.output_dir.display().to_string(),
            request.spacing.to_string(),
        ]
    }
}

impl CorrectionEngine for SnapCommandEngine {
    fn run(&self, request: &SnapRequest) -> Result<()> {
        fs::create_dir_all(&request.output_dir)?;
        let args = Self::args(request);
        debug!("{} {}", self.executable.display(), args.join(" "));
        let status = Command::new(&self.executable)
            .args(&args)
            .status()
            .map_err(|e| Error::backend(format!("{} exec error: {}", self.executable.display(), e)))?;
        if !status.success() {
            return Err(Error::backend(format!(
                "{} exited with {}",
                self.executable.display(),
                status
            )));
        }
        info!("SNAP engine finished: {}", request.output_dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{AreaOfInterest, Crs};

    fn request(out: PathBuf) -> SnapRequest {
        SnapRequest {
            input_archive: PathBuf::from("/w/scene.zip"),
            aoi_geojson: PathBuf::from("/w/aoi.geojson"),
            aoi: AreaOfInterest::new(10.0, 45.0, 10.5, 45.3).unwrap(),
            target_crs: Crs::from_epsg(32632).unwrap(),
            output_dir: out,
            spacing: 10.0,
        }
    }

    #[test]
    fn argument_order() {
        let args = SnapCommandEngine::args(&request(PathBuf::from("/w/rtc_out")));
        assert_eq!(
            args,
            vec!["/w/scene.zip", "/w/aoi.geojson", "EPSG:32632", "/w/rtc_out", "10"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_backend_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = SnapCommandEngine::new("false");
        let err = engine.run(&request(tmp.path().join("rtc_out"))).unwrap_err();
        assert!(matches!(err, Error::BackendFailure(_)));

        let missing = SnapCommandEngine::new(tmp.path().join("no-such-engine"));
        assert!(matches!(
            missing.run(&request(tmp.path().join("rtc_out"))),
            Err(Error::BackendFailure(_))
        ));
    }
}
