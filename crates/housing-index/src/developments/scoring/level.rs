use serde::{Deserialize, Serialize};

pub(crate) const HIGH_THRESHOLD: f64 = 0.6;
pub(crate) const MEDIUM_THRESHOLD: f64 = 0.4;

/// Display classification of a composite index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImbalanceLevel {
    Low,
    Medium,
    High,
}

impl ImbalanceLevel {
    pub const fn ordered() -> [Self; 3] {
        [Self::High, Self::Medium, Self::Low]
    }

    pub fn classify(index: f64) -> Self {
        if index >= HIGH_THRESHOLD {
            Self::High
        } else if index >= MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Marker color used by the map surface.
    pub const fn marker_color(self) -> &'static str {
        match self {
            Self::Low => "green",
            Self::Medium => "orange",
            Self::High => "red",
        }
    }
}
