use super::normalizer::normalize_header;
use std::collections::HashMap;
use std::sync::OnceLock;

static COLUMN_MAP: OnceLock<HashMap<String, &'static str>> = OnceLock::new();

pub(crate) fn canonical_column(normalized_header: &str) -> Option<&'static str> {
    column_map().get(normalized_header).copied()
}

fn column_map() -> &'static HashMap<String, &'static str> {
    COLUMN_MAP.get_or_init(|| {
        const HEADER_TO_FIELD: &[(&str, &str)] = &[
            // Identity
            ("id", "id"),
            ("jk_id", "id"),
            ("development_id", "id"),
            ("name", "name"),
            ("title", "name"),
            ("development", "name"),
            ("название", "name"),
            ("жк", "name"),
            ("address", "address"),
            ("адрес", "address"),
            // Location
            ("lat", "lat"),
            ("latitude", "lat"),
            ("широта", "lat"),
            ("lon", "lon"),
            ("lng", "lon"),
            ("longitude", "lon"),
            ("долгота", "lon"),
            // Unit mix
            ("studio", "studio"),
            ("studios", "studio"),
            ("studio_count", "studio"),
            ("студии", "studio"),
            ("one_room", "one_room"),
            ("1_room", "one_room"),
            ("two_room", "two_room"),
            ("2_room", "two_room"),
            ("three_room", "three_room"),
            ("3_room", "three_room"),
            ("three_plus_room", "three_room"),
            ("four_plus_room", "four_plus_room"),
            ("4_plus_room", "four_plus_room"),
            ("4+_room", "four_plus_room"),
            ("total", "total"),
            ("total_units", "total"),
            ("total_apartments", "total"),
            ("всего_квартир", "total"),
            // Building shape
            ("floors_min", "floors_min"),
            ("min_floors", "floors_min"),
            ("floors_max", "floors_max"),
            ("max_floors", "floors_max"),
            ("ceiling_min", "ceiling_min"),
            ("min_ceiling_height", "ceiling_min"),
            ("ceiling_max", "ceiling_max"),
            ("max_ceiling_height", "ceiling_max"),
            ("avg_unit_area", "avg_unit_area"),
            ("average_unit_area", "avg_unit_area"),
            ("avg_area", "avg_unit_area"),
            ("средняя_площадь", "avg_unit_area"),
            ("avg_units_per_floor", "avg_units_per_floor"),
            ("units_per_floor", "avg_units_per_floor"),
            ("elevators_per_entrance", "elevators_per_entrance"),
            ("elevators", "elevators"),
            ("лифтов", "elevators"),
            ("entrances", "entrances"),
            ("подъездов", "entrances"),
            // Amenities
            ("playgrounds", "playgrounds"),
            ("playground_count", "playgrounds"),
            ("детские_площадки", "playgrounds"),
            ("sports_areas", "sports_areas"),
            ("sports_area_count", "sports_areas"),
            ("bike_paths", "bike_paths"),
            ("has_bike_paths", "bike_paths"),
            ("sidewalks", "sidewalks"),
            ("has_sidewalks", "sidewalks"),
            ("parking_spots", "parking_spots"),
            ("машиномест", "parking_spots"),
            ("парковочные_места", "parking_spots"),
            ("parking_coverage", "parking_coverage"),
            ("parking_coverage_ratio", "parking_coverage"),
            ("ramp", "ramp"),
            ("has_ramp", "ramp"),
            ("ramp_present", "ramp"),
            ("пандус", "ramp"),
            ("lowered_curbs", "lowered_curbs"),
            ("has_lowered_curbs", "lowered_curbs"),
            ("lowered_curbs_present", "lowered_curbs"),
            ("wheelchair_lifts", "wheelchair_lifts"),
            ("wheelchair_lift_count", "wheelchair_lifts"),
        ];

        let mut map = HashMap::with_capacity(HEADER_TO_FIELD.len());
        for (header, field) in HEADER_TO_FIELD {
            map.insert(normalize_header(header), *field);
        }
        map
    })
}

#[cfg(test)]
pub(crate) fn lookup_for_tests(header: &str) -> Option<&'static str> {
    canonical_column(&normalize_header(header))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_canonical_fields() {
        assert_eq!(lookup_for_tests("Total Apartments"), Some("total"));
        assert_eq!(lookup_for_tests("Широта"), Some("lat"));
        assert_eq!(lookup_for_tests("three_plus_room"), Some("three_room"));
        assert_eq!(lookup_for_tests("Has-Lowered-Curbs"), Some("lowered_curbs"));
        assert_eq!(lookup_for_tests("developer"), None);
    }
}
