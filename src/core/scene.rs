//! Scene references produced by the search collaborator, and the Sentinel-1
//! product-name conventions used to order them.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::core::geometry::{AreaOfInterest, DateRange, Extent};
use crate::types::Polarization;

/// Opaque scene identifier plus acquisition metadata. Read-only to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneReference {
    pub id: String,
    pub sensing_start: NaiveDateTime,
    pub sensing_stop: NaiveDateTime,
    /// WGS84 footprint when the catalog reports one
    pub footprint: Option<Extent>,
    pub polarizations: Vec<Polarization>,
}

impl SceneReference {
    /// Reference whose times come from the product name; `None` if the name
    /// does not follow the Sentinel-1 pattern.
    pub fn from_product_name(name: &str, polarizations: Vec<Polarization>) -> Option<Self> {
        let (sensing_start, sensing_stop) = parse_sensing_times(name)?;
        Some(Self {
            id: name.to_string(),
            sensing_start,
            sensing_stop,
            footprint: None,
            polarizations,
        })
    }

    pub fn has_dual_pol(&self) -> bool {
        self.polarizations.contains(&Polarization::Vv) && self.polarizations.contains(&Polarization::Vh)
    }
}

/// Search arguments handed to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub aoi: AreaOfInterest,
    pub date_range: DateRange,
    /// Polarizations every returned scene must carry
    pub polarizations: Vec<Polarization>,
}

impl SearchRequest {
    pub fn dual_pol(aoi: AreaOfInterest, date_range: DateRange) -> Self {
        Self {
            aoi,
            date_range,
            polarizations: vec![Polarization::Vv, Polarization::Vh],
        }
    }

    /// True when `scene` was sensed inside the date range, carries every
    /// requested polarization, and (if it reports a footprint) touches the AOI.
    pub fn accepts(&self, scene: &SceneReference) -> bool {
        let in_time = self.date_range.contains(scene.sensing_start.date());
        let pols = self.polarizations.iter().all(|p| scene.polarizations.contains(p));
        let overlaps = scene
            .footprint
            .is_none_or(|f| f.intersection(&self.aoi.extent()).is_some());
        in_time && pols && overlaps
    }
}

/// Sensing start/stop from a name like
/// `S1A_IW_GRDH_1SDV_20251205T162323_20251205T162348_062190_07C3B1_7F0A`.
pub fn parse_sensing_times(name: &str) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let fields: Vec<&str> = name.split('_').collect();
    fields.windows(2).find_map(|w| {
        let start = parse_stamp(w[0])?;
        let stop = parse_stamp(w[1])?;
        Some((start, stop))
    })
}

fn parse_stamp(field: &str) -> Option<NaiveDateTime> {
    let bytes = field.as_bytes();
    if bytes.len() != 15 || bytes[8] != b'T' {
        return None;
    }
    NaiveDateTime::parse_from_str(field, "%Y%m%dT%H%M%S").ok()
}

/// Most recent sensing start first; ties broken by id for a stable order.
pub fn sort_most_recent_first(scenes: &mut [SceneReference]) {
    scenes.sort_by(|a, b| {
        b.sensing_start
            .cmp(&a.sensing_start)
            .then_with(|| a.id.cmp(&b.id))
    });
}
