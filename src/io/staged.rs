//! Filesystem-backed search and download collaborators.
//!
//! `StagedArchives` serves a directory of zipped SAFE products
//! (`<product>.zip`); `StagedObjects` serves a directory of per-scene folders
//! (`<product>/vv.tif`, `<product>/vh.tif`) the way an object store exposes
//! per-polarization rasters.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::backend::{Download, Downloader, SceneCatalog};
use crate::core::scene::{SceneReference, SearchRequest, sort_most_recent_first};
use crate::error::{Error, Result};
use crate::types::Polarization;

/// Polarizations implied by the product class field, e.g. `1SDV` → VV+VH.
pub fn polarizations_from_name(name: &str) -> Vec<Polarization> {
    let class = name.split('_').find(|f| {
        let b = f.as_bytes();
        b.len() == 4 && b[0].is_ascii_digit() && b[1] == b'S'
    });
    match class.map(|c| &c[2..]) {
        Some("DV") => vec![Polarization::Vv, Polarization::Vh],
        Some("SV") => vec![Polarization::Vv],
        Some("DH") => vec![Polarization::Hh, Polarization::Hv],
        Some("SH") => vec![Polarization::Hh],
        _ => Vec::new(),
    }
}

fn scan(dir: &Path, keep: impl Fn(&Path) -> Option<(String, Vec<Polarization>)>) -> Result<Vec<SceneReference>> {
    let mut scenes = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some((name, pols)) = keep(&path) else {
            continue;
        };
        match SceneReference::from_product_name(&name, pols) {
            Some(scene) => scenes.push(scene),
            None => debug!("skipping {}: no sensing times in name", path.display()),
        }
    }
    Ok(scenes)
}

fn select(mut scenes: Vec<SceneReference>, request: &SearchRequest) -> Vec<SceneReference> {
    scenes.retain(|s| request.accepts(s));
    sort_most_recent_first(&mut scenes);
    scenes
}

fn prepare_dest(scene: &SceneReference, dest_dir: &Path) -> Result<()> {
    fs::create_dir_all(dest_dir).map_err(|e| Error::DownloadFailed {
        scene: scene.id.clone(),
        detail: format!("cannot create {}: {}", dest_dir.display(), e),
    })
}

fn copy_into(scene: &SceneReference, from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to).map_err(|e| Error::DownloadFailed {
        scene: scene.id.clone(),
        detail: format!("{} -> {}: {}", from.display(), to.display(), e),
    })?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedArchives {
    dir: PathBuf,
}

impl StagedArchives {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SceneCatalog for StagedArchives {
    fn search(&self, request: &SearchRequest) -> Result<Vec<SceneReference>> {
        let scenes = scan(&self.dir, |path| {
            let is_zip = path
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("zip"));
            if !is_zip {
                return None;
            }
            let stem = path.file_stem()?.to_string_lossy().to_string();
            let pols = polarizations_from_name(&stem);
            Some((stem, pols))
        })?;
        let found = select(scenes, request);
        info!("{} staged archive(s) match in {}", found.len(), self.dir.display());
        Ok(found)
    }
}

impl Downloader for StagedArchives {
    fn download(&self, scene: &SceneReference, dest_dir: &Path) -> Result<Download> {
        let src = self.dir.join(format!("{}.zip", scene.id));
        if !src.is_file() {
            return Err(Error::DownloadFailed {
                scene: scene.id.clone(),
                detail: format!("{} not found", src.display()),
            });
        }
        prepare_dest(scene, dest_dir)?;
        let dst = dest_dir.join(format!("{}.zip", scene.id));
        copy_into(scene, &src, &dst)?;
        info!("Saved SAFE zip: {}", dst.display());
        Ok(Download::Archive(dst))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedObjects {
    dir: PathBuf,
}

impl StagedObjects {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Raster object for `pol` inside a scene folder, matched case-insensitively.
    fn object(folder: &Path, pol: Polarization) -> Option<PathBuf> {
        let want = pol.label().to_lowercase();
        let entries = fs::read_dir(folder).ok()?;
        let mut matches: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                p.file_stem().is_some_and(|s| s.to_string_lossy().to_lowercase() == want)
                    && p.extension().is_some_and(|e| {
                        let e = e.to_string_lossy().to_lowercase();
                        e == "tif" || e == "tiff"
                    })
            })
            .collect();
        matches.sort();
        matches.into_iter().next()
    }
}

impl SceneCatalog for StagedObjects {
    fn search(&self, request: &SearchRequest) -> Result<Vec<SceneReference>> {
        let scenes = scan(&self.dir, |path| {
            if !path.is_dir() {
                return None;
            }
            let name = path.file_name()?.to_string_lossy().to_string();
            let pols = [Polarization::Vv, Polarization::Vh, Polarization::Hh, Polarization::Hv]
                .into_iter()
                .filter(|&p| Self::object(path, p).is_some())
                .collect();
            Some((name, pols))
        })?;
        let found = select(scenes, request);
        info!("{} staged object set(s) match in {}", found.len(), self.dir.display());
        Ok(found)
    }
}

impl Downloader for StagedObjects {
    fn download(&self, scene: &SceneReference, dest_dir: &Path) -> Result<Download> {
        let folder = self.dir.join(&scene.id);
        prepare_dest(scene, dest_dir)?;
        let fetch = |pol: Polarization| -> Result<PathBuf> {
            let src = Self::object(&folder, pol).ok_or_else(|| Error::DownloadFailed {
                scene: scene.id.clone(),
                detail: format!("no {} object in {}", pol, folder.display()),
            })?;
            let dst = dest_dir.join(format!("{}.tif", pol.label()));
            copy_into(scene, &src, &dst)?;
            info!("RAW {} COG: {}", pol, dst.display());
            Ok(dst)
        };
        let vv = fetch(Polarization::Vv)?;
        let vh = fetch(Polarization::Vh)?;
        Ok(Download::Rasters { vv, vh })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{AreaOfInterest, DateRange};
    use chrono::NaiveDate;

    const OLD: &str = "S1A_IW_GRDH_1SDV_20251203T050000_20251203T050025_062160_07C2A0_AAAA";
    const NEW: &str = "S1C_IW_GRDH_1SDV_20251209T162323_20251209T162348_005190_00A3B1_BBBB";
    const SINGLE: &str = "S1A_IW_GRDH_1SSV_20251210T050000_20251210T050025_062262_07C5A0_CCCC";

    fn request() -> SearchRequest {
        SearchRequest::dual_pol(
            AreaOfInterest::new(21.65, 40.66, 21.75, 40.76).unwrap(),
            DateRange::new(
                NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
            )
            .unwrap(),
        )
    }

    #[test]
    fn product_class_gives_polarizations() {
        assert_eq!(polarizations_from_name(OLD), vec![Polarization::Vv, Polarization::Vh]);
        assert_eq!(polarizations_from_name(SINGLE), vec![Polarization::Vv]);
        assert!(polarizations_from_name("scene").is_empty());
    }

    #[test]
    fn archives_are_filtered_and_ordered() {
        let tmp = tempfile::tempdir().unwrap();
        for name in [OLD, NEW, SINGLE] {
            fs::write(tmp.path().join(format!("{name}.zip")), b"zip").unwrap();
        }
        fs::write(tmp.path().join("notes.txt"), b"x").unwrap();
        let staged = StagedArchives::new(tmp.path());
        let found = staged.search(&request()).unwrap();
        let ids: Vec<&str> = found.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![NEW, OLD]);

        let dest = tmp.path().join("work");
        match staged.download(&found[0], &dest).unwrap() {
            Download::Archive(p) => assert_eq!(p, dest.join(format!("{NEW}.zip"))),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_archive_is_download_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let staged = StagedArchives::new(tmp.path());
        let scene = SceneReference::from_product_name(NEW, vec![Polarization::Vv, Polarization::Vh]).unwrap();
        let err = staged.download(&scene, &tmp.path().join("work")).unwrap_err();
        assert!(matches!(err, Error::DownloadFailed { .. }));
    }

    #[test]
    fn unwritable_destination_is_download_failure() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(format!("{NEW}.zip")), b"zip").unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, b"file").unwrap();
        let scene = SceneReference::from_product_name(NEW, vec![Polarization::Vv, Polarization::Vh]).unwrap();

        let err = StagedArchives::new(tmp.path())
            .download(&scene, &blocker.join("work"))
            .unwrap_err();
        assert!(matches!(err, Error::DownloadFailed { ref scene, .. } if scene == NEW));

        let err = StagedObjects::new(tmp.path())
            .download(&scene, &blocker.join("extract"))
            .unwrap_err();
        assert!(matches!(err, Error::DownloadFailed { .. }));
    }

    #[test]
    fn objects_need_both_polarizations() {
        let tmp = tempfile::tempdir().unwrap();
        let full = tmp.path().join(NEW);
        fs::create_dir_all(&full).unwrap();
        fs::write(full.join("vv.tif"), b"vv").unwrap();
        fs::write(full.join("VH.TIF"), b"vh").unwrap();
        let partial = tmp.path().join(OLD);
        fs::create_dir_all(&partial).unwrap();
        fs::write(partial.join("vv.tif"), b"vv").unwrap();

        let staged = StagedObjects::new(tmp.path());
        let found = staged.search(&request()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, NEW);

        let dest = tmp.path().join("extract");
        let Download::Rasters { vv, vh } = staged.download(&found[0], &dest).unwrap() else {
            panic!("expected rasters");
        };
        assert_eq!(vv, dest.join("VV.tif"));
        assert_eq!(fs::read(vh).unwrap(), b"vh");
    }
}
