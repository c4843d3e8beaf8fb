//! High-level library API: build the collaborators a `RunConfig` asks for and
//! drive one run to completion. Prefer this entrypoint over wiring the
//! orchestrator by hand unless you bring your own catalog or backend.
use tracing::info;

use crate::core::backend::{Backend, Downloader, SceneCatalog};
use crate::core::backend::gcp_warp::GcpWarpBackend;
use crate::core::backend::snap::SnapGeocodeBackend;
use crate::core::params::RunConfig;
use crate::core::pipeline::{Orchestrator, RunSummary};
use crate::error::{Error, Result};
use crate::io::snap::SnapCommandEngine;
use crate::io::staged::{StagedArchives, StagedObjects};
use crate::types::{BackendKind, SourceKind};

/// Catalog and downloader for the configured source, served from
/// `config.staging_dir`.
pub fn build_source(config: &RunConfig) -> Result<(Box<dyn SceneCatalog>, Box<dyn Downloader>)> {
    let dir = config
        .staging_dir
        .clone()
        .ok_or_else(|| Error::invalid("staging_dir", "required to serve scenes"))?;
    if !dir.is_dir() {
        return Err(Error::invalid("staging_dir", dir.display()));
    }
    let pair: (Box<dyn SceneCatalog>, Box<dyn Downloader>) = match config.source {
        SourceKind::ArchiveApi => (
            Box::new(StagedArchives::new(&dir)),
            Box::new(StagedArchives::new(&dir)),
        ),
        SourceKind::CloudObject => (
            Box::new(StagedObjects::new(&dir)),
            Box::new(StagedObjects::new(&dir)),
        ),
    };
    Ok(pair)
}

/// The backend selected by `config.backend`, downloading through `downloader`.
pub fn build_backend(config: &RunConfig, downloader: Box<dyn Downloader>) -> Box<dyn Backend> {
    match config.backend {
        BackendKind::Snap => Box::new(SnapGeocodeBackend::new(
            downloader,
            Box::new(SnapCommandEngine::new(&config.snap.executable)),
            config.snap.spacing,
        )),
        BackendKind::GcpWarp => Box::new(GcpWarpBackend::new(downloader)),
    }
}

/// Run the full pipeline for `config`. A stage failure comes back as
/// `Error::RunFailed`, carrying the stage, the error kind and the workdir.
pub fn run_from_config(config: RunConfig) -> Result<RunSummary> {
    config.validate()?;
    let (catalog, downloader) = build_source(&config)?;
    let backend = build_backend(&config, downloader);
    info!("Backend: {}, source: {}", config.backend, config.source);
    let orchestrator = Orchestrator::new(config, catalog, backend)?;
    orchestrator.run().map_err(Error::from)
}
