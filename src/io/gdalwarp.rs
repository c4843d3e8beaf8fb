//! `gdalwarp` invoked as a child process for GCP thin-plate-spline warps.
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, warn};

use crate::core::geometry::{Crs, Extent};
use crate::error::{Error, Result};
use crate::types::ResampleMethod;

/// One GCP-georeferenced GeoTIFF warped onto a fixed north-up grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GdalWarpRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    /// CRS of the ground coordinates of the input's GCPs
    pub source_crs: Crs,
    pub target_crs: Crs,
    /// Output extent in `target_crs`
    pub window: Extent,
    pub cols: usize,
    pub rows: usize,
    pub resample: ResampleMethod,
    /// Source pixels equal to this are skipped; unfilled output takes it too
    pub nodata: f64,
    /// Approximation error allowed in the transformer, in pixels; 0 is exact
    pub error_threshold: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GdalWarpCommand {
    executable: PathBuf,
}

impl Default for GdalWarpCommand {
    fn default() -> Self {
        Self::new("gdalwarp")
    }
}

impl GdalWarpCommand {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn args(request: &GdalWarpRequest) -> Vec<String> {
        let resample = match request.resample {
            ResampleMethod::Nearest => "near",
            ResampleMethod::Bilinear => "bilinear",
        };
        let w = &request.window;
        let mut args: Vec<String> = ["-of", "GTiff", "-overwrite", "-ot", "Float32", "-tps"]
            .into_iter()
            .map(String::from)
            .collect();
        args.extend([
            "-s_srs".to_string(),
            request.source_crs.to_string(),
            "-t_srs".to_string(),
            request.target_crs.to_string(),
            "-te".to_string(),
            w.min_x.to_string(),
            w.min_y.to_string(),
            w.max_x.to_string(),
            w.max_y.to_string(),
            "-ts".to_string(),
            request.cols.to_string(),
            request.rows.to_string(),
            "-r".to_string(),
            resample.to_string(),
            "-srcnodata".to_string(),
            request.nodata.to_string(),
            "-dstnodata".to_string(),
            request.nodata.to_string(),
            "-et".to_string(),
            request.error_threshold.to_string(),
            request.input.display().to_string(),
            request.output.display().to_string(),
        ]);
        args
    }

    pub fn run(&self, request: &GdalWarpRequest) -> Result<()> {
        let args = Self::args(request);
        debug!("{} {}", self.executable.display(), args.join(" "));
        let status = Command::new(&self.executable)
            .args(&args)
            .status()
            .map_err(|e| Error::backend(format!("{} exec error: {}", self.executable.display(), e)))?;
        if !status.success() {
            if request.output.exists() {
                if let Err(e) = fs::remove_file(&request.output) {
                    warn!("could not remove {}: {}", request.output.display(), e);
                }
            }
            return Err(Error::backend(format!(
                "{} exited with {}",
                self.executable.display(),
                status
            )));
        }
        Ok(())
    }
}
