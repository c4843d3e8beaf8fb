//! Run orchestration as an explicit state machine:
//! `SEARCHING → ACQUIRING → CORRECTING → CLIPPING → COMPOSING → DONE`, with
//! `FAILED` reachable from every running stage.
//!
//! Each stage starts only on the validated output of the previous one. A
//! failure records `(stage, kind, detail)` in the run's stage log, writes the
//! log to `run.json`, and leaves every artifact produced so far on disk.
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::core::backend::{Backend, BandPair, CorrectionContext, SceneCatalog};
use crate::core::geometry::{AreaOfInterest, Crs, DateRange};
use crate::core::params::RunConfig;
use crate::core::processing::{ClipMethod, check_alignment, check_clip_safety, clip_to_aoi, compose_rgb};
use crate::core::scene::{SceneReference, SearchRequest};
use crate::core::workdir::{WorkdirLayout, run_id_from};
use crate::error::{Error, ErrorKind, Result};
use crate::io::writers::{Provenance, write_band, write_composite};
use crate::types::{BackendKind, SourceKind, Stage};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineState {
    /// Created, no stage entered yet
    Pending,
    Running(Stage),
    Done,
    Failed { stage: Stage, kind: ErrorKind },
}

impl PipelineState {
    /// State after entering `stage`, if that is the next stage in order.
    pub fn enter(self, stage: Stage) -> Option<Self> {
        let allowed = match self {
            PipelineState::Pending => stage == Stage::Searching,
            PipelineState::Running(current) => current.next() == Some(stage),
            PipelineState::Done | PipelineState::Failed { .. } => false,
        };
        allowed.then_some(PipelineState::Running(stage))
    }

    /// `DONE` is only reachable from the last stage.
    pub fn complete(self) -> Option<Self> {
        (self == PipelineState::Running(Stage::Composing)).then_some(PipelineState::Done)
    }

    pub fn fail(self, kind: ErrorKind) -> Option<Self> {
        match self {
            PipelineState::Running(stage) => Some(PipelineState::Failed { stage, kind }),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed { .. })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageOutcome {
    Completed,
    /// The stage had nothing to do (clipping of already AOI-bounded output)
    Skipped,
    Failed,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: Stage,
    pub outcome: StageOutcome,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_kind: Option<ErrorKind>,
}

/// The durable record of one run, serialized to `run.json`.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ProcessingRun {
    pub run_id: String,
    pub aoi: AreaOfInterest,
    pub date_range: DateRange,
    pub target_crs: Crs,
    pub backend: BackendKind,
    pub source: SourceKind,
    pub workdir: PathBuf,
    pub scene: Option<String>,
    pub state: PipelineState,
    pub stages: Vec<StageRecord>,
}

impl ProcessingRun {
    pub fn outcome_of(&self, stage: Stage) -> Option<StageOutcome> {
        self.stages.iter().find(|r| r.stage == stage).map(|r| r.outcome)
    }
}

/// A failed run: where it stopped, what kind of failure, and why.
#[derive(Debug, Error)]
#[error("{stage} failed ({kind}): {detail}")]
pub struct RunFailure {
    pub stage: Stage,
    pub kind: ErrorKind,
    pub detail: String,
    pub workdir: PathBuf,
    #[source]
    pub cause: Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub run: ProcessingRun,
    pub vv_clip: PathBuf,
    pub vh_clip: PathBuf,
    pub rgb: PathBuf,
    pub elapsed: Duration,
}

/// Drives one `ProcessingRun` through its stages. One instance, one run.
pub struct Orchestrator {
    config: RunConfig,
    catalog: Box<dyn SceneCatalog>,
    backend: Box<dyn Backend>,
    layout: WorkdirLayout,
    run: ProcessingRun,
}

impl Orchestrator {
    /// Validate `config`, create the run's workdir (named from the current
    /// time) and write its `aoi.geojson`.
    pub fn new(config: RunConfig, catalog: Box<dyn SceneCatalog>, backend: Box<dyn Backend>) -> Result<Self> {
        let run_id = run_id_from(chrono::Local::now().naive_local());
        Self::with_run_id(config, &run_id, catalog, backend)
    }

    pub fn with_run_id(
        config: RunConfig,
        run_id: &str,
        catalog: Box<dyn SceneCatalog>,
        backend: Box<dyn Backend>,
    ) -> Result<Self> {
        config.validate()?;
        if backend.kind() != config.backend {
            return Err(Error::invalid(
                "backend",
                format!("configured {} but given {}", config.backend, backend.kind()),
            ));
        }
        let layout = WorkdirLayout::create(&config.workdir_root, run_id, config.source, config.backend)?;
        let aoi_path = layout.write_aoi_geojson(&config.aoi)?;
        info!("AOI saved: {}", aoi_path.display());
        let run = ProcessingRun {
            run_id: run_id.to_string(),
            aoi: config.aoi,
            date_range: config.date_range()?,
            target_crs: config.target_crs,
            backend: config.backend,
            source: config.source,
            workdir: layout.root().to_path_buf(),
            scene: None,
            state: PipelineState::Pending,
            stages: Vec::new(),
        };
        Ok(Self {
            config,
            catalog,
            backend,
            layout,
            run,
        })
    }

    pub fn layout(&self) -> &WorkdirLayout {
        &self.layout
    }

    pub fn run_record(&self) -> &ProcessingRun {
        &self.run
    }

    pub fn run(mut self) -> std::result::Result<RunSummary, RunFailure> {
        let started = Instant::now();
        info!(
            "Starting run {} ({} via {}) in {}",
            self.run.run_id,
            self.run.source,
            self.run.backend,
            self.layout.root().display()
        );

        let scene = self.stage(Stage::Searching, |o| o.search())?;
        self.run.scene = Some(scene.id.clone());
        let acquired = self.stage(Stage::Acquiring, |o| {
            let acquired = o.backend.acquire(&scene, &o.layout)?;
            let detail = acquired.describe();
            Ok((acquired, StageOutcome::Completed, detail))
        })?;
        let bands = self.stage(Stage::Correcting, |o| {
            let ctx = CorrectionContext {
                aoi: &o.run.aoi,
                target_crs: o.run.target_crs,
                layout: &o.layout,
            };
            let pair = o.backend.correct(acquired, &ctx)?;
            let detail = format!(
                "VV {}x{}, VH {}x{}",
                pair.vv.cols(),
                pair.vv.rows(),
                pair.vh.cols(),
                pair.vh.rows()
            );
            Ok((pair, StageOutcome::Completed, detail))
        })?;
        let provenance = Provenance {
            run_id: self.run.run_id.clone(),
            backend: self.run.backend,
            source: self.run.source,
            scene: scene.id.clone(),
            aoi: self.run.aoi,
        };
        let clipped = self.stage(Stage::Clipping, |o| o.clip(bands, &provenance))?;
        self.stage(Stage::Composing, |o| {
            let rgb = compose_rgb(&clipped.vv, &clipped.vh)?;
            write_composite(&o.layout.rgb(), &rgb, &provenance)?;
            let (rows, cols) = rgb.dim();
            Ok(((), StageOutcome::Completed, format!("{}x{} composite", cols, rows)))
        })?;

        // Running(Composing) always completes
        self.run.state = self.run.state.complete().unwrap_or(self.run.state);
        self.write_report();
        let elapsed = started.elapsed();
        info!("DONE. Outputs in: {}", self.layout.dist_dir().display());
        info!("Total Sentinel-1 pipeline time: {:.2} minutes", elapsed.as_secs_f64() / 60.0);
        Ok(RunSummary {
            vv_clip: self.layout.vv_clip(),
            vh_clip: self.layout.vh_clip(),
            rgb: self.layout.rgb(),
            run: self.run,
            elapsed,
        })
    }

    /// Enter `stage`, run `work`, and record its outcome. On error the run
    /// moves to `FAILED` and the report is written before returning.
    fn stage<T>(
        &mut self,
        stage: Stage,
        work: impl FnOnce(&Self) -> Result<(T, StageOutcome, String)>,
    ) -> std::result::Result<T, RunFailure> {
        let entered = self.run.state.enter(stage);
        let Some(next) = entered else {
            let cause = Error::backend(format!("illegal transition {:?} -> {}", self.run.state, stage));
            return Err(self.fail(stage, Utc::now(), Instant::now(), cause));
        };
        self.run.state = next;
        info!("{} ...", stage);
        let started_at = Utc::now();
        let clock = Instant::now();
        match work(self) {
            Ok((value, outcome, detail)) => {
                info!("{} {:?}: {}", stage, outcome, detail);
                self.run.stages.push(StageRecord {
                    stage,
                    outcome,
                    started_at,
                    elapsed_ms: clock.elapsed().as_millis() as u64,
                    detail,
                    error_kind: None,
                });
                Ok(value)
            }
            Err(cause) => Err(self.fail(stage, started_at, clock, cause)),
        }
    }

    fn fail(&mut self, stage: Stage, started_at: DateTime<Utc>, clock: Instant, cause: Error) -> RunFailure {
        let kind = cause.kind();
        let detail = cause.to_string();
        warn!("{} failed ({}): {}", stage, kind, detail);
        self.run.stages.push(StageRecord {
            stage,
            outcome: StageOutcome::Failed,
            started_at,
            elapsed_ms: clock.elapsed().as_millis() as u64,
            detail: detail.clone(),
            error_kind: Some(kind),
        });
        self.run.state = self
            .run
            .state
            .fail(kind)
            .unwrap_or(PipelineState::Failed { stage, kind });
        self.write_report();
        RunFailure {
            stage,
            kind,
            detail,
            workdir: self.layout.root().to_path_buf(),
            cause,
        }
    }

    /// Persist the run report. Best effort: a write error is logged and never
    /// replaces the outcome of the run.
    fn write_report(&self) {
        let path = self.layout.report_path();
        let written = serde_json::to_string_pretty(&self.run)
            .map_err(Error::from)
            .and_then(|text| fs::write(&path, text).map_err(Error::from));
        if let Err(e) = written {
            warn!("could not write {}: {}", path.display(), e);
        }
    }

    fn search(&self) -> Result<(SceneReference, StageOutcome, String)> {
        let request = SearchRequest::dual_pol(self.run.aoi, self.run.date_range);
        let scenes = self.catalog.search(&request)?;
        let total = scenes.len();
        let scene = scenes.into_iter().next().ok_or_else(|| {
            Error::NoSceneFound(format!(
                "no dual-pol scene over {} in {}",
                self.run.aoi, self.run.date_range
            ))
        })?;
        info!("Selected scene: {} (sensed {})", scene.id, scene.sensing_start);
        let detail = format!("{} of {} candidates", scene.id, total);
        Ok((scene, StageOutcome::Completed, detail))
    }

    /// Bring both bands onto the AOI window, verify them, and persist the clips.
    fn clip(&self, bands: BandPair, provenance: &Provenance) -> Result<(BandPair, StageOutcome, String)> {
        let crs = self.run.target_crs;
        let options = self.config.warp_options();
        let (vv, vv_method) = clip_to_aoi(bands.vv, &self.run.aoi, crs, &options)?;
        let (vh, vh_method) = clip_to_aoi(bands.vh, &self.run.aoi, crs, &options)?;

        let extent = check_clip_safety(&vv, &self.run.aoi, crs, "VV")?;
        check_clip_safety(&vh, &self.run.aoi, crs, "VH")?;
        check_alignment(&vv, &vh)?;

        write_band(&self.layout.vv_clip(), &vv, "VV", provenance)?;
        write_band(&self.layout.vh_clip(), &vh, "VH", provenance)?;

        let outcome = if vv_method == ClipMethod::AlreadyClipped && vh_method == ClipMethod::AlreadyClipped {
            StageOutcome::Skipped
        } else {
            StageOutcome::Completed
        };
        let detail = format!(
            "VV {:?}, VH {:?}; {}x{} grid over {}",
            vv_method,
            vh_method,
            vv.cols(),
            vv.rows(),
            extent
        );
        Ok((BandPair { vv, vh }, outcome, detail))
    }
}
