use super::mapping::canonical_column;
use super::normalizer::normalize_header;
use super::{MissingField, SkippedRow};
use crate::developments::domain::{
    Amenities, BuildingShape, DevelopmentId, DevelopmentRecord, GeoPoint, UnitMix,
};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::io::Read;
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub(crate) struct ParsedRows {
    pub(crate) records: Vec<DevelopmentRecord>,
    pub(crate) skipped: Vec<SkippedRow>,
    pub(crate) rows: usize,
}

pub(crate) fn parse_rows<R: Read>(reader: R, source: &str) -> Result<ParsedRows, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = canonical_headers(csv_reader.headers()?);
    let mut parsed = ParsedRows::default();

    for result in csv_reader.records() {
        let raw = result?;
        if raw.iter().all(|field| field.is_empty()) {
            continue;
        }

        parsed.rows += 1;
        let line = raw.position().map(|position| position.line()).unwrap_or(0);
        let row: DevelopmentRow = raw.deserialize(Some(&headers))?;

        match row.into_record() {
            Ok(record) => parsed.records.push(record),
            Err(missing) => {
                warn!(
                    source,
                    line,
                    field = missing.label(),
                    "skipping development row without mandatory field"
                );
                parsed.skipped.push(SkippedRow {
                    source: source.to_string(),
                    line,
                    missing,
                });
            }
        }
    }

    Ok(parsed)
}

fn canonical_headers(raw: &csv::StringRecord) -> csv::StringRecord {
    let mut taken = HashSet::new();
    raw.iter()
        .enumerate()
        .map(|(position, header)| {
            let normalized = normalize_header(header);
            match canonical_column(&normalized) {
                Some(field) if taken.insert(field) => field.to_string(),
                Some(field) => {
                    debug!(header, field, "ignoring repeated column");
                    format!("_repeated_{position}")
                }
                None => normalized,
            }
        })
        .collect()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DevelopmentRow {
    #[serde(deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    address: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    lat: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    lon: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    studio: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    one_room: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    two_room: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    three_room: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    four_plus_room: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    total: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    floors_min: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    floors_max: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    ceiling_min: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    ceiling_max: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    avg_unit_area: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    avg_units_per_floor: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    elevators_per_entrance: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    elevators: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    entrances: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    playgrounds: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    sports_areas: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    bike_paths: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    sidewalks: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    parking_spots: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    parking_coverage: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    ramp: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    lowered_curbs: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    wheelchair_lifts: Option<String>,
}

impl DevelopmentRow {
    fn into_record(self) -> Result<DevelopmentRecord, MissingField> {
        let id = self
            .id
            .clone()
            .or_else(|| self.name.clone())
            .ok_or(MissingField::Identity)?;
        let name = self.name.clone().unwrap_or_else(|| id.clone());

        let location = match (decimal(&self.lat), decimal(&self.lon)) {
            (Some(lat), Some(lon)) if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) => {
                GeoPoint { lat, lon }
            }
            _ => return Err(MissingField::Location),
        };

        let total = count(&self.total).ok_or(MissingField::TotalUnits)?;

        let elevators = count(&self.elevators);
        let elevators_per_entrance = decimal(&self.elevators_per_entrance).or_else(|| {
            match (elevators, count(&self.entrances)) {
                (Some(elevators), Some(entrances)) if entrances > 0 => {
                    Some(f64::from(elevators) / f64::from(entrances))
                }
                _ => None,
            }
        });

        let parking_spots = count(&self.parking_spots);
        let parking_coverage = decimal(&self.parking_coverage).or_else(|| {
            parking_spots
                .filter(|_| total > 0)
                .map(|spots| f64::from(spots) / f64::from(total))
        });

        let unit_mix = UnitMix {
            studio: count(&self.studio),
            one_room: count(&self.one_room),
            two_room: count(&self.two_room),
            three_room: count(&self.three_room),
            four_plus_room: count(&self.four_plus_room),
            total,
        };
        if unit_mix.exceeds_total() {
            debug!(
                development = %id,
                total,
                categorized = unit_mix.categorized(),
                "apartment categories exceed reported total"
            );
        }

        Ok(DevelopmentRecord {
            id: DevelopmentId(id),
            name,
            address: self.address,
            location,
            unit_mix,
            building_shape: BuildingShape {
                floors_min: count(&self.floors_min),
                floors_max: count(&self.floors_max),
                ceiling_min: decimal(&self.ceiling_min),
                ceiling_max: decimal(&self.ceiling_max),
                avg_unit_area: decimal(&self.avg_unit_area),
                avg_units_per_floor: decimal(&self.avg_units_per_floor),
                elevators_per_entrance,
            },
            amenities: Amenities {
                playgrounds: count(&self.playgrounds),
                sports_areas: count(&self.sports_areas),
                bike_paths: flag(&self.bike_paths),
                sidewalks: flag(&self.sidewalks),
                parking_spots,
                parking_coverage,
                ramp: flag(&self.ramp),
                lowered_curbs: flag(&self.lowered_curbs),
                wheelchair_lifts: count(&self.wheelchair_lifts),
                elevators,
            },
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn decimal(raw: &Option<String>) -> Option<f64> {
    raw.as_deref().and_then(parse_decimal)
}

fn count(raw: &Option<String>) -> Option<u32> {
    raw.as_deref().and_then(parse_count)
}

fn flag(raw: &Option<String>) -> Option<bool> {
    raw.as_deref().and_then(parse_flag)
}

/// Accepts `2.7`, `2,7`, `1 200` and percentages (`85%` -> `0.85`).
fn parse_decimal(value: &str) -> Option<f64> {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}' && *c != '\u{202f}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let (digits, scale) = match compact.strip_suffix('%') {
        Some(digits) => (digits, 100.0),
        None => (compact.as_str(), 1.0),
    };

    digits
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
        .map(|parsed| parsed / scale)
}

fn parse_count(value: &str) -> Option<u32> {
    let parsed = parse_decimal(value)?;
    if parsed < 0.0 || parsed.fract() != 0.0 || parsed > f64::from(u32::MAX) {
        return None;
    }
    Some(parsed as u32)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "да" | "есть" | "+" => Some(true),
        "false" | "no" | "n" | "нет" | "-" => Some(false),
        other => parse_decimal(other).map(|number| number > 0.0),
    }
}

#[cfg(test)]
pub(crate) fn parse_decimal_for_tests(value: &str) -> Option<f64> {
    parse_decimal(value)
}

#[cfg(test)]
pub(crate) fn parse_flag_for_tests(value: &str) -> Option<bool> {
    parse_flag(value)
}
