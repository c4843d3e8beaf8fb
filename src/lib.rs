#![doc = r#"
sarprep — Sentinel-1 VV/VH preparation for a fixed area of interest.

One run searches for the most recent dual-polarization scene over an AOI,
acquires it, geometrically corrects it through the selected backend, clips
both bands to the AOI and writes a three-band dB false-colour composite:

```text
SEARCHING → ACQUIRING → CORRECTING → CLIPPING → COMPOSING → DONE
                         (any stage) ───────────────────────→ FAILED
```

Two backends are available:
- `snap`: the zipped product is handed to an external SNAP correction engine
  which writes terrain-corrected VV/VH GeoTIFFs.
- `gcp_warp`: raw measurement rasters are warped by their ground control
  points with a thin-plate spline and clipped to the AOI window.

Stability
---------
The public library API is experimental and may evolve. Breaking changes can occur.

Requirements
------------
- GDAL development headers and runtime available on your system.
- Rust 2024 edition toolchain.

Quick start: run from a configuration
-------------------------------------
```rust,no_run
use chrono::NaiveDate;
use sarprep::{AreaOfInterest, BackendKind, Crs, RunConfig};

fn main() -> sarprep::Result<()> {
    let mut config = RunConfig::new(
        AreaOfInterest::new(21.65, 40.66, 21.75, 40.76)?,
        NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
    );
    config.target_crs = Crs::from_epsg(32634)?;
    config.backend = BackendKind::GcpWarp;
    config.staging_dir = Some("/data/staging".into());

    let summary = sarprep::run_from_config(config)?;
    println!("RGB composite: {}", summary.rgb.display());
    Ok(())
}
```

Composing in memory
-------------------
```rust
use ndarray::Array2;
use sarprep::{Crs, RasterBand, compose_rgb};

let gt = [10.0, 0.01, 0.0, 45.3, 0.0, -0.01];
let vv = RasterBand::new(Array2::from_elem((2, 2), 0.1_f32)).with_geotransform(gt, Crs::WGS84);
let vh = RasterBand::new(Array2::from_elem((2, 2), 0.01_f32)).with_geotransform(gt, Crs::WGS84);
let rgb = compose_rgb(&vv, &vh).unwrap();
assert!((rgb.red[[0, 0]] + 10.0).abs() < 1e-4);
assert!((rgb.green[[0, 0]] + 20.0).abs() < 1e-4);
```

Error handling
--------------
All public functions return `sarprep::Result<T>`. A failed run comes back as
`Error::RunFailed`, whose `RunFailure` names the stage and `ErrorKind`; the
same pair is recorded in the workdir's `run.json`.

```rust,no_run
use sarprep::{Error, RunConfig, run_from_config};

fn report(config: RunConfig) {
    match run_from_config(config) {
        Ok(summary) => println!("done in {:?}", summary.elapsed),
        Err(Error::RunFailed(f)) => eprintln!("{} failed: {:?} ({})", f.stage, f.kind, f.detail),
        Err(other) => eprintln!("could not start: {other}"),
    }
}
```

Useful modules
--------------
- [`api`] — high-level entry points.
- [`core`] — geometry, rasters, the warp-clip engine, compositor, backends and orchestrator.
- [`io`] — GDAL readers, archive extraction, staged sources, GeoTIFF writers.
- [`types`] — shared enums (`BackendKind`, `SourceKind`, `Stage`, ...).
- [`error`] — crate-level `Error`, `ErrorKind` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use core::geometry::{AreaOfInterest, Crs, DateRange, Extent};
pub use core::params::{RunConfig, SnapSettings};
pub use core::raster::{CompositeRaster, GcpSet, GeoTransform, GroundControlPoint, RasterBand};
pub use error::{Error, ErrorKind, Result};
pub use types::{BackendKind, Polarization, ResampleMethod, SourceKind, Stage};

// Processing
pub use core::processing::{
    ClipMethod, Resolution, WarpOptions, check_alignment, check_clip_safety, clip_to_aoi,
    compose_rgb, crop_to_extent, to_db, warp_and_clip, warp_and_clip_with,
};

// Orchestration
pub use core::backend::{Backend, BandPair, CorrectionEngine, Downloader, SceneCatalog};
pub use core::pipeline::{Orchestrator, PipelineState, ProcessingRun, RunFailure, RunSummary};

// Readers and writers
pub use io::gdal::{GdalError, RasterReader, load_band};
pub use io::writers::{write_band, write_composite};

// High-level API re-exports
pub use api::run_from_config;
