//! Crate-level error type and `Result` alias.
//! Carries the run-fatal taxonomy (control points, overlap, alignment, backend
//! output, clip safety, download, backend failure) plus wrapped I/O, GDAL, zip
//! and JSON errors. `ErrorKind` is the flat discriminant recorded in stage logs.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::geometry::Extent;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Insufficient ground control points (found {found}): {detail}")]
    InsufficientControlPoints { found: usize, detail: String },

    #[error("Raster footprint {footprint} does not intersect AOI {aoi}")]
    NoOverlap { footprint: Extent, aoi: Extent },

    #[error("VV/VH bands are not co-registered: {detail}")]
    BandMisalignment { detail: String },

    #[error("Correction output missing in {output_dir:?}: expected {expected}, {detail}")]
    CorrectionOutputMissing {
        output_dir: PathBuf,
        expected: String,
        detail: String,
    },

    #[error("Clip safety violation for {band}: extent {actual} vs AOI {aoi}: {detail}")]
    ClipSafetyViolation {
        band: String,
        actual: String,
        aoi: Extent,
        detail: String,
    },

    #[error("Download of {scene} failed: {detail}")]
    DownloadFailed { scene: String, detail: String },

    #[error("Backend failure: {0}")]
    BackendFailure(String),

    #[error("No scene found: {0}")]
    NoSceneFound(String),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GDAL error: {0}")]
    Gdal(#[from] crate::io::GdalError),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    RunFailed(Box<crate::core::pipeline::RunFailure>),
}

impl From<gdal::errors::GdalError> for Error {
    fn from(e: gdal::errors::GdalError) -> Self {
        Error::Gdal(crate::io::GdalError::Gdal(e))
    }
}

impl From<crate::core::pipeline::RunFailure> for Error {
    fn from(f: crate::core::pipeline::RunFailure) -> Self {
        Error::RunFailed(Box::new(f))
    }
}

impl Error {
    pub fn backend<E: std::fmt::Display>(e: E) -> Self {
        Error::BackendFailure(e.to_string())
    }

    pub fn invalid(arg: &'static str, value: impl ToString) -> Self {
        Error::InvalidArgument {
            arg,
            value: value.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InsufficientControlPoints { .. } => ErrorKind::InsufficientControlPoints,
            Error::NoOverlap { .. } => ErrorKind::NoOverlap,
            Error::BandMisalignment { .. } => ErrorKind::BandMisalignment,
            Error::CorrectionOutputMissing { .. } => ErrorKind::CorrectionOutputMissing,
            Error::ClipSafetyViolation { .. } => ErrorKind::ClipSafetyViolation,
            Error::DownloadFailed { .. } => ErrorKind::DownloadFailed,
            Error::BackendFailure(_) => ErrorKind::BackendFailure,
            Error::NoSceneFound(_) => ErrorKind::NoSceneFound,
            Error::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Error::Io(_) => ErrorKind::Io,
            Error::Gdal(_) => ErrorKind::Raster,
            Error::Zip(_) => ErrorKind::Archive,
            Error::Json(_) => ErrorKind::Serialization,
            Error::RunFailed(f) => f.kind,
        }
    }
}

/// Flat error discriminant, stable across runs and serialized into `run.json`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InsufficientControlPoints,
    NoOverlap,
    BandMisalignment,
    CorrectionOutputMissing,
    ClipSafetyViolation,
    DownloadFailed,
    BackendFailure,
    NoSceneFound,
    InvalidArgument,
    Io,
    Raster,
    Archive,
    Serialization,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::InsufficientControlPoints => "InsufficientControlPoints",
            ErrorKind::NoOverlap => "NoOverlap",
            ErrorKind::BandMisalignment => "BandMisalignment",
            ErrorKind::CorrectionOutputMissing => "CorrectionOutputMissing",
            ErrorKind::ClipSafetyViolation => "ClipSafetyViolation",
            ErrorKind::DownloadFailed => "DownloadFailed",
            ErrorKind::BackendFailure => "BackendFailure",
            ErrorKind::NoSceneFound => "NoSceneFound",
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::Io => "Io",
            ErrorKind::Raster => "Raster",
            ErrorKind::Archive => "Archive",
            ErrorKind::Serialization => "Serialization",
        };
        write!(f, "{}", s)
    }
}
