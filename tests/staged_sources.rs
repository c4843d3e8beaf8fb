//! Full runs through `run_from_config` with scenes served from a staging
//! directory.
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use ndarray::Array2;

use sarprep::io::writers::Provenance;
use sarprep::{
    AreaOfInterest, BackendKind, Crs, Error, ErrorKind, GroundControlPoint, PipelineState,
    RasterBand, RunConfig, SourceKind, Stage, load_band, run_from_config, write_band,
};

const SCENE: &str = "S1A_IW_GRDH_1SDV_20251209T162323_20251209T162348_062190_07C3B1_7F0A";

fn raw_band(scale: f32) -> RasterBand {
    let data = Array2::from_shape_fn((100, 100), |(r, c)| scale * (1 + r + c) as f32);
    let mut gcps = Vec::new();
    for i in 0..=4 {
        for j in 0..=4 {
            let (px, ly) = (j as f64 * 25.0, i as f64 * 25.0);
            gcps.push(GroundControlPoint::new(px, ly, 10.0 + px * 0.004, 45.4 - ly * 0.004));
        }
    }
    // raw GRD measurements declare no nodata marker
    RasterBand::new(data).with_gcps(gcps, Crs::WGS84)
}

fn write_raw(path: &Path, scale: f32, label: &str) {
    let prov = Provenance {
        run_id: "fixture".to_string(),
        backend: BackendKind::GcpWarp,
        source: SourceKind::ArchiveApi,
        scene: SCENE.to_string(),
        aoi: AreaOfInterest::new(10.0, 45.0, 10.4, 45.4).unwrap(),
    };
    write_band(path, &raw_band(scale), label, &prov).unwrap();
}

/// `<staging>/<SCENE>.zip` holding a SAFE tree with GCP-referenced measurements.
fn stage_archive(staging: &Path, scratch: &Path) {
    let vv = scratch.join("vv.tiff");
    let vh = scratch.join("vh.tiff");
    write_raw(&vv, 1.0, "VV");
    write_raw(&vh, 0.1, "VH");

    let mut zip = zip::ZipWriter::new(File::create(staging.join(format!("{SCENE}.zip"))).unwrap());
    let options = zip::write::FileOptions::default();
    let entries = [
        (format!("{SCENE}.SAFE/manifest.safe"), b"<xml/>".to_vec()),
        (
            format!("{SCENE}.SAFE/measurement/s1a-iw-grd-vv-20251209t162323-001.tiff"),
            fs::read(&vv).unwrap(),
        ),
        (
            format!("{SCENE}.SAFE/measurement/s1a-iw-grd-vh-20251209t162323-002.tiff"),
            fs::read(&vh).unwrap(),
        ),
    ];
    for (name, bytes) in entries {
        zip.start_file(name, options).unwrap();
        zip.write_all(&bytes).unwrap();
    }
    zip.finish().unwrap();
}

fn config(root: &Path, staging: &Path) -> RunConfig {
    let mut config = RunConfig::new(
        AreaOfInterest::new(10.1, 45.05, 10.26, 45.21).unwrap(),
        NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
    );
    config.workdir_root = root.to_path_buf();
    config.staging_dir = Some(staging.to_path_buf());
    config
}

#[test]
fn archive_source_runs_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    let staging = tmp.path().join("staging");
    let scratch = tmp.path().join("scratch");
    fs::create_dir_all(&staging).unwrap();
    fs::create_dir_all(&scratch).unwrap();
    stage_archive(&staging, &scratch);

    let summary = run_from_config(config(&tmp.path().join("runs"), &staging)).unwrap();
    assert_eq!(summary.run.state, PipelineState::Done);
    assert_eq!(summary.run.scene.as_deref(), Some(SCENE));

    let workdir = &summary.run.workdir;
    assert!(workdir.join("extract").join(format!("{SCENE}.zip")).is_file());
    assert!(workdir.join("extract").join(format!("{SCENE}.SAFE")).is_dir());

    let vv = load_band(&summary.vv_clip).unwrap();
    assert_eq!(vv.crs, Some(Crs::WGS84));
    assert_eq!(vv.data.dim(), (40, 40));
    assert_eq!(vv.nodata, Some(0.0));
}

#[test]
fn cloud_object_source_runs_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    let staging = tmp.path().join("staging");
    let scene_dir = staging.join(SCENE);
    fs::create_dir_all(&scene_dir).unwrap();
    write_raw(&scene_dir.join("vv.tif"), 1.0, "VV");
    write_raw(&scene_dir.join("vh.tif"), 0.1, "VH");

    let mut cfg = config(&tmp.path().join("runs"), &staging);
    cfg.source = SourceKind::CloudObject;
    let summary = run_from_config(cfg).unwrap();
    assert_eq!(summary.run.state, PipelineState::Done);
    assert!(summary.run.workdir.ends_with(format!(
        "{}_S1_COG_GDAL",
        summary.run.run_id
    )));
    assert!(summary.rgb.is_file());
}

#[test]
fn snap_with_cloud_objects_is_rejected_before_running() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cfg = config(&tmp.path().join("runs"), tmp.path());
    cfg.backend = BackendKind::Snap;
    cfg.source = SourceKind::CloudObject;
    let err = run_from_config(cfg).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(!tmp.path().join("runs").exists());
}

#[test]
fn out_of_range_dates_find_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let staging = tmp.path().join("staging");
    let scratch = tmp.path().join("scratch");
    fs::create_dir_all(&staging).unwrap();
    fs::create_dir_all(&scratch).unwrap();
    stage_archive(&staging, &scratch);

    let mut cfg = config(&tmp.path().join("runs"), &staging);
    cfg.date_start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    cfg.date_end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    match run_from_config(cfg).unwrap_err() {
        Error::RunFailed(f) => {
            assert_eq!(f.stage, Stage::Searching);
            assert_eq!(f.kind, ErrorKind::NoSceneFound);
        }
        other => panic!("unexpected {other}"),
    }
}
