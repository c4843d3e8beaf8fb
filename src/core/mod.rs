//! Core of the pipeline: geometry and raster model, run configuration, the
//! warp-clip and compositing engines, backend strategies, the workdir layout,
//! and the stage orchestrator that ties them together.
pub mod backend;
pub mod geometry;
pub mod params;
pub mod pipeline;
pub mod processing;
pub mod raster;
pub mod scene;
pub mod workdir;
