use clap::Parser;
use std::path::PathBuf;

use chrono::NaiveDate;
use sarprep::{BackendKind, ResampleMethod, SourceKind};

#[derive(Parser)]
#[command(name = "sarprep", version, about = "Sentinel-1 VV/VH clip and dB RGB composite")]
pub struct CliArgs {
    /// JSON run configuration; flags given on the command line override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// AOI bounding box: min_lon,min_lat,max_lon,max_lat (WGS84 degrees)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub bbox: Option<Vec<f64>>,

    /// First acquisition date to search (YYYY-MM-DD)
    #[arg(long)]
    pub date_start: Option<NaiveDate>,

    /// Last acquisition date to search (YYYY-MM-DD)
    #[arg(long)]
    pub date_end: Option<NaiveDate>,

    /// Output CRS (e.g., EPSG:4326, EPSG:32633)
    #[arg(long)]
    pub target_crs: Option<String>,

    /// Correction backend (snap or gcp-warp)
    #[arg(long, value_enum)]
    pub backend: Option<BackendKind>,

    /// Acquisition source (archive-api or cloud-object)
    #[arg(long, value_enum)]
    pub source: Option<SourceKind>,

    /// Local directory scenes are served from
    #[arg(long)]
    pub staging_dir: Option<PathBuf>,

    /// Parent directory for per-run working directories
    #[arg(long)]
    pub workdir_root: Option<PathBuf>,

    /// SNAP correction executable
    #[arg(long)]
    pub snap_exe: Option<PathBuf>,

    /// SNAP output pixel spacing in metres
    #[arg(long)]
    pub spacing: Option<f64>,

    /// Resampling used by the GCP warp (nearest or bilinear)
    #[arg(long, value_enum)]
    pub resample: Option<ResampleMethod>,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
