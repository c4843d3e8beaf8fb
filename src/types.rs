//! Shared enums used across sarprep.
//! Includes `BackendKind`, `SourceKind`, `Polarization`, `Stage` and
//! `ResampleMethod`.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Processing strategy selected once per run.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Radiometric terrain correction by the external SNAP engine.
    Snap,
    /// Raw measurement rasters warped by their ground control points.
    GcpWarp,
}

impl BackendKind {
    /// Tag used in the run working-directory name.
    pub fn dir_tag(&self) -> &'static str {
        match self {
            BackendKind::Snap => "SNAP",
            BackendKind::GcpWarp => "GDAL",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Snap => write!(f, "snap"),
            BackendKind::GcpWarp => write!(f, "gcp_warp"),
        }
    }
}

/// Where the acquisition input comes from.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Zipped SAFE product from an archive API.
    ArchiveApi,
    /// Per-polarization tiled rasters fetched from an object store.
    CloudObject,
}

impl SourceKind {
    pub fn dir_tag(&self) -> &'static str {
        match self {
            SourceKind::ArchiveApi => "ARCHIVE",
            SourceKind::CloudObject => "COG",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::ArchiveApi => write!(f, "archive_api"),
            SourceKind::CloudObject => write!(f, "cloud_object"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Debug, Serialize, Deserialize)]
pub enum Polarization {
    Vv,
    Vh,
    Hh,
    Hv,
}

impl Polarization {
    /// Upper-case label as used in product and file names.
    pub fn label(&self) -> &'static str {
        match self {
            Polarization::Vv => "VV",
            Polarization::Vh => "VH",
            Polarization::Hh => "HH",
            Polarization::Hv => "HV",
        }
    }
}

impl std::fmt::Display for Polarization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Pipeline stages, in the only order they may run.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Searching,
    Acquiring,
    Correcting,
    Clipping,
    Composing,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Searching,
        Stage::Acquiring,
        Stage::Correcting,
        Stage::Clipping,
        Stage::Composing,
    ];

    /// The stage that must follow this one; `None` after `Composing`.
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Searching => Some(Stage::Acquiring),
            Stage::Acquiring => Some(Stage::Correcting),
            Stage::Correcting => Some(Stage::Clipping),
            Stage::Clipping => Some(Stage::Composing),
            Stage::Composing => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Searching => "SEARCHING",
            Stage::Acquiring => "ACQUIRING",
            Stage::Correcting => "CORRECTING",
            Stage::Clipping => "CLIPPING",
            Stage::Composing => "COMPOSING",
        };
        write!(f, "{}", s)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleMethod {
    Nearest,
    #[default]
    Bilinear,
}

impl std::fmt::Display for ResampleMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResampleMethod::Nearest => write!(f, "nearest"),
            ResampleMethod::Bilinear => write!(f, "bilinear"),
        }
    }
}
