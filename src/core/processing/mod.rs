//! Raster-geometry and band-math primitives: the GCP warp-clip engine,
//! post-clip safety checks and the dB compositor.
pub mod compose;
pub mod safety;
pub mod warp;

pub use compose::{COMPOSITE_NODATA, DB_FLOOR_EPSILON, compose_rgb, to_db};
pub use safety::{check_alignment, check_clip_safety};
pub use warp::{
    ClipMethod, Resolution, WarpOptions, clip_to_aoi, crop_to_extent, dedup_control_points, warp_and_clip,
    warp_and_clip_with,
};
