use tracing::info;
use tracing_subscriber::EnvFilter;

use sarprep::core::geometry::AreaOfInterest;
use sarprep::{RunConfig, api};

use super::args::CliArgs;
use super::errors::AppError;

fn init_logging(verbose: bool) {
    if verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    }
}

fn bbox_to_aoi(values: &[f64]) -> Result<AreaOfInterest, AppError> {
    let [min_lon, min_lat, max_lon, max_lat] = values else {
        return Err(AppError::InvalidBbox {
            count: values.len(),
        });
    };
    Ok(AreaOfInterest::new(*min_lon, *min_lat, *max_lon, *max_lat)?)
}

/// Start from `--config` when given, otherwise from the three required
/// flags, then apply every other flag on top.
fn build_config(args: &CliArgs) -> Result<RunConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_json_file(path)?,
        None => {
            let bbox = args.bbox.as_deref().ok_or(AppError::MissingArgument {
                arg: "--bbox".to_string(),
            })?;
            let start = args.date_start.ok_or(AppError::MissingArgument {
                arg: "--date-start".to_string(),
            })?;
            let end = args.date_end.ok_or(AppError::MissingArgument {
                arg: "--date-end".to_string(),
            })?;
            RunConfig::new(bbox_to_aoi(bbox)?, start, end)
        }
    };

    if let Some(bbox) = args.bbox.as_deref() {
        config.aoi = bbox_to_aoi(bbox)?;
    }
    if let Some(start) = args.date_start {
        config.date_start = start;
    }
    if let Some(end) = args.date_end {
        config.date_end = end;
    }
    if let Some(crs) = &args.target_crs {
        config.target_crs = crs.parse()?;
    }
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    if let Some(source) = args.source {
        config.source = source;
    }
    if let Some(dir) = &args.staging_dir {
        config.staging_dir = Some(dir.clone());
    }
    if let Some(dir) = &args.workdir_root {
        config.workdir_root = dir.clone();
    }
    if let Some(exe) = &args.snap_exe {
        config.snap.executable = exe.clone();
    }
    if let Some(spacing) = args.spacing {
        config.snap.spacing = spacing;
    }
    if let Some(resample) = args.resample {
        config.resample = resample;
    }
    config.validate()?;
    Ok(config)
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(args.log);

    let config = build_config(&args)?;
    info!("AOI: {}", config.aoi);
    info!("Dates: {} .. {}", config.date_start, config.date_end);
    info!("Target CRS: {}", config.target_crs);

    let summary = api::run_from_config(config).map_err(AppError::from)?;
    println!("VV clip: {}", summary.vv_clip.display());
    println!("VH clip: {}", summary.vh_clip.display());
    println!("RGB: {}", summary.rgb.display());
    println!("Workdir: {}", summary.run.workdir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use sarprep::{BackendKind, Crs};

    #[test]
    fn flags_build_a_config() {
        let args = CliArgs::parse_from([
            "sarprep",
            "--bbox",
            "-0.2,51.4,0.1,51.6",
            "--date-start",
            "2025-12-01",
            "--date-end",
            "2025-12-15",
            "--target-crs",
            "EPSG:32630",
            "--backend",
            "snap",
        ]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.aoi.min_lon(), -0.2);
        assert_eq!(config.target_crs, Crs::from_epsg(32630).unwrap());
        assert_eq!(config.backend, BackendKind::Snap);
    }

    #[test]
    fn missing_dates_are_reported() {
        let args = CliArgs::parse_from(["sarprep", "--bbox", "10,45,11,46"]);
        assert!(matches!(
            build_config(&args),
            Err(AppError::MissingArgument { ref arg }) if arg == "--date-start"
        ));
    }

    #[test]
    fn bbox_needs_four_values() {
        assert!(matches!(
            bbox_to_aoi(&[1.0, 2.0, 3.0]),
            Err(AppError::InvalidBbox { count: 3 })
        ));
    }
}
