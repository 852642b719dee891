use super::catalog::{ScoredCatalog, ScoredDevelopment};
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeometryValue};
use serde_json::json;

/// Point features for every scored development, in ingestion order.
///
/// Coordinates follow GeoJSON axis order (longitude, latitude).
pub fn feature_collection(catalog: &ScoredCatalog) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: catalog.entries().iter().map(development_feature).collect(),
        foreign_members: None,
    }
}

fn development_feature(entry: &ScoredDevelopment) -> Feature {
    let record = &entry.record;
    let score = &entry.score;

    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), json!(record.name));
    if let Some(address) = &record.address {
        properties.insert("address".to_string(), json!(address));
    }
    properties.insert("index".to_string(), json!(score.index));
    properties.insert("level".to_string(), json!(score.level.label()));
    properties.insert("color".to_string(), json!(score.level.marker_color()));
    properties.insert("total_units".to_string(), json!(record.unit_mix.total));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(GeometryValue::Point(vec![
            record.location.lon,
            record.location.lat,
        ]))),
        id: Some(Id::String(record.id.0.clone())),
        properties: Some(properties),
        foreign_members: None,
    }
}
