use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a development as carried in navigation state and click events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DevelopmentId(pub String);

impl DevelopmentId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DevelopmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DevelopmentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DevelopmentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Unit counts by apartment category. `total` is mandatory at ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitMix {
    pub studio: Option<u32>,
    pub one_room: Option<u32>,
    pub two_room: Option<u32>,
    pub three_room: Option<u32>,
    pub four_plus_room: Option<u32>,
    pub total: u32,
}

impl UnitMix {
    /// Sum of the reported categories; upstream exports do not guarantee it matches `total`.
    pub fn categorized(&self) -> u64 {
        [
            self.studio,
            self.one_room,
            self.two_room,
            self.three_room,
            self.four_plus_room,
        ]
        .into_iter()
        .flatten()
        .map(u64::from)
        .sum()
    }

    pub fn exceeds_total(&self) -> bool {
        self.categorized() > u64::from(self.total)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingShape {
    pub floors_min: Option<u32>,
    pub floors_max: Option<u32>,
    pub ceiling_min: Option<f64>,
    pub ceiling_max: Option<f64>,
    pub avg_unit_area: Option<f64>,
    pub avg_units_per_floor: Option<f64>,
    pub elevators_per_entrance: Option<f64>,
}

impl BuildingShape {
    pub fn floor_range_label(&self) -> Option<String> {
        match (self.floors_min, self.floors_max) {
            (Some(min), Some(max)) if min != max => Some(format!("{min}\u{2013}{max}")),
            (Some(floors), _) | (None, Some(floors)) => Some(floors.to_string()),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Amenities {
    pub playgrounds: Option<u32>,
    pub sports_areas: Option<u32>,
    pub bike_paths: Option<bool>,
    pub sidewalks: Option<bool>,
    pub parking_spots: Option<u32>,
    pub parking_coverage: Option<f64>,
    pub ramp: Option<bool>,
    pub lowered_curbs: Option<bool>,
    pub wheelchair_lifts: Option<u32>,
    /// Raw elevator count, kept for the detail panel.
    pub elevators: Option<u32>,
}

/// One residential development as produced by ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentRecord {
    pub id: DevelopmentId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub location: GeoPoint,
    pub unit_mix: UnitMix,
    pub building_shape: BuildingShape,
    pub amenities: Amenities,
}

impl DevelopmentRecord {
    /// Minimal record carrying only the mandatory fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: GeoPoint, total: u32) -> Self {
        Self {
            id: DevelopmentId(id.into()),
            name: name.into(),
            address: None,
            location,
            unit_mix: UnitMix {
                total,
                ..UnitMix::default()
            },
            building_shape: BuildingShape::default(),
            amenities: Amenities::default(),
        }
    }
}
