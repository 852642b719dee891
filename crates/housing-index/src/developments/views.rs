use super::catalog::{ScoredCatalog, ScoredDevelopment};
use super::domain::{Amenities, BuildingShape, DevelopmentId, GeoPoint, UnitMix};
use super::scoring::{DevelopmentScore, ImbalanceLevel};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MarkerView {
    pub id: DevelopmentId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub location: GeoPoint,
    pub index: f64,
    pub level: ImbalanceLevel,
    pub level_label: &'static str,
    pub color: &'static str,
}

impl From<&ScoredDevelopment> for MarkerView {
    fn from(entry: &ScoredDevelopment) -> Self {
        let level = entry.score.level;
        Self {
            id: entry.record.id.clone(),
            name: entry.record.name.clone(),
            address: entry.record.address.clone(),
            location: entry.record.location,
            index: entry.score.index,
            level,
            level_label: level.label(),
            color: level.marker_color(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LevelCount {
    pub level: ImbalanceLevel,
    pub level_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapOverview {
    pub loaded_at: DateTime<Utc>,
    pub total: usize,
    pub levels: Vec<LevelCount>,
    pub markers: Vec<MarkerView>,
}

impl MapOverview {
    pub fn from_catalog(catalog: &ScoredCatalog) -> Self {
        let markers: Vec<MarkerView> = catalog.entries().iter().map(MarkerView::from).collect();
        let levels = ImbalanceLevel::ordered()
            .into_iter()
            .map(|level| LevelCount {
                level,
                level_label: level.label(),
                count: markers.iter().filter(|marker| marker.level == level).count(),
            })
            .collect();

        Self {
            loaded_at: catalog.loaded_at(),
            total: markers.len(),
            levels,
            markers,
        }
    }
}

/// Labelled value for the detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailFact {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DevelopmentDetailView {
    pub id: DevelopmentId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub location: GeoPoint,
    pub unit_mix: UnitMix,
    pub building_shape: BuildingShape,
    pub amenities: Amenities,
    pub score: DevelopmentScore,
    pub level_label: &'static str,
    pub color: &'static str,
    pub facts: Vec<DetailFact>,
}

impl From<&ScoredDevelopment> for DevelopmentDetailView {
    fn from(entry: &ScoredDevelopment) -> Self {
        let record = &entry.record;
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            address: record.address.clone(),
            location: record.location,
            unit_mix: record.unit_mix.clone(),
            building_shape: record.building_shape.clone(),
            amenities: record.amenities.clone(),
            score: entry.score.clone(),
            level_label: entry.score.level.label(),
            color: entry.score.level.marker_color(),
            facts: detail_facts(entry),
        }
    }
}

fn detail_facts(entry: &ScoredDevelopment) -> Vec<DetailFact> {
    let record = &entry.record;
    let mix = &record.unit_mix;
    let shape = &record.building_shape;
    let amenities = &record.amenities;

    let facts = [
        fact("Total apartments", Some(mix.total.to_string())),
        fact("Studios", mix.studio.map(|count| count.to_string())),
        fact("1-room", mix.one_room.map(|count| count.to_string())),
        fact("2-room", mix.two_room.map(|count| count.to_string())),
        fact(
            three_room_label(mix),
            mix.three_room.map(|count| count.to_string()),
        ),
        fact("4+ rooms", mix.four_plus_room.map(|count| count.to_string())),
        fact("Floors", shape.floor_range_label()),
        fact("Elevators", amenities.elevators.map(|count| count.to_string())),
        fact(
            "Parking spots",
            amenities.parking_spots.map(|count| count.to_string()),
        ),
        fact(
            "Playgrounds",
            amenities.playgrounds.map(|count| count.to_string()),
        ),
        fact(
            "Minimum ceiling height",
            shape.ceiling_min.map(|height| format!("{height} m")),
        ),
        fact(
            "Average unit area",
            shape.avg_unit_area.map(|area| format!("{area} m\u{b2}")),
        ),
        fact(
            "Sports areas",
            amenities.sports_areas.map(|count| count.to_string()),
        ),
        fact("Bike paths", amenities.bike_paths.map(yes_no)),
        fact("Sidewalks", amenities.sidewalks.map(yes_no)),
    ];

    facts.into_iter().flatten().collect()
}

/// Exports without a 4+ column report larger apartments under the 3-room count.
fn three_room_label(mix: &UnitMix) -> &'static str {
    if mix.four_plus_room.is_some() {
        "3-room"
    } else {
        "3+ rooms"
    }
}

fn fact(label: &'static str, value: Option<String>) -> Option<DetailFact> {
    value.map(|value| DetailFact { label, value })
}

fn yes_no(flag: bool) -> String {
    let label = if flag { "Yes" } else { "No" };
    label.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::developments::domain::DevelopmentRecord;
    use crate::developments::scoring::IndicatorScorer;

    fn catalog() -> ScoredCatalog {
        let location = GeoPoint {
            lat: 55.6893,
            lon: 37.5412,
        };
        let mut sky = DevelopmentRecord::new("1", "Sky", location, 600);
        sky.unit_mix.studio = Some(180);
        sky.building_shape.floors_min = Some(10);
        sky.building_shape.floors_max = Some(25);
        sky.amenities.bike_paths = Some(true);

        let mut river = DevelopmentRecord::new("2", "River", location, 100);
        river.unit_mix.studio = Some(100);
        river.building_shape.avg_unit_area = Some(10.0);

        ScoredCatalog::build(vec![sky, river], &IndicatorScorer::new())
    }

    #[test]
    fn overview_counts_levels_in_display_order() {
        let overview = MapOverview::from_catalog(&catalog());

        assert_eq!(overview.total, 2);
        let labels: Vec<_> = overview.levels.iter().map(|entry| entry.level_label).collect();
        assert_eq!(labels, vec!["high", "medium", "low"]);
        assert_eq!(overview.levels[0].count, 1);
        assert_eq!(overview.levels[2].count, 1);
        assert_eq!(overview.markers[1].color, "red");
    }

    #[test]
    fn detail_facts_skip_unreported_fields() {
        let catalog = catalog();
        let sky = catalog.get(&DevelopmentId::from("1")).expect("present");
        let view = DevelopmentDetailView::from(sky);

        let labels: Vec<_> = view.facts.iter().map(|fact| fact.label).collect();
        assert_eq!(
            labels,
            vec!["Total apartments", "Studios", "Floors", "Bike paths"]
        );
        assert_eq!(view.facts[2].value, "10\u{2013}25");
        assert_eq!(view.facts[3].value, "Yes");
        assert_eq!(view.level_label, "low");
    }

    #[test]
    fn three_room_count_covers_larger_units_without_a_four_plus_column() {
        let mut mix = UnitMix {
            three_room: Some(90),
            total: 300,
            ..UnitMix::default()
        };
        assert_eq!(three_room_label(&mix), "3+ rooms");

        mix.four_plus_room = Some(12);
        assert_eq!(three_room_label(&mix), "3-room");
    }
}
