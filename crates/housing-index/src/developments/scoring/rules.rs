use super::super::domain::DevelopmentRecord;
use super::{ScoreFactor, ScoreTerm};

/// Minimum comfortable single-occupant area, m².
pub(crate) const REFERENCE_UNIT_AREA: f64 = 35.0;
pub(crate) const MAX_AREA_ADEQUACY: f64 = 2.0;
pub(crate) const REFERENCE_UNITS_PER_FLOOR: f64 = 8.0;
pub(crate) const REFERENCE_CEILING_HEIGHT: f64 = 2.7;
pub(crate) const CEILING_SHORTFALL_SPAN: f64 = 0.5;
pub(crate) const TOWER_FLOOR_THRESHOLD: f64 = 25.0;
pub(crate) const TOWER_FLOOR_SPAN: f64 = 10.0;
pub(crate) const REFERENCE_ELEVATORS_PER_ENTRANCE: f64 = 2.0;
pub(crate) const UNITS_PER_PLAYGROUND: f64 = 300.0;

pub(crate) const HOUSING_WEIGHT: f64 = 0.5;
pub(crate) const COMFORT_WEIGHT: f64 = 0.3;
pub(crate) const INFRASTRUCTURE_WEIGHT: f64 = 0.2;

pub(crate) struct SubScores {
    pub housing: f64,
    pub comfort: f64,
    pub infrastructure: f64,
    pub terms: Vec<ScoreTerm>,
}

pub(crate) fn score_record(record: &DevelopmentRecord) -> SubScores {
    let mut terms = Vec::with_capacity(13);
    let housing = housing_score(record, &mut terms);
    let comfort = comfort_score(record, &mut terms);
    let infrastructure = infrastructure_score(record, &mut terms);

    SubScores {
        housing,
        comfort,
        infrastructure,
        terms,
    }
}

pub(crate) fn composite_index(housing: f64, comfort: f64, infrastructure: f64) -> f64 {
    round3(
        HOUSING_WEIGHT * housing
            + COMFORT_WEIGHT * comfort
            + INFRASTRUCTURE_WEIGHT * infrastructure,
    )
}

// Not clamped: area adequacy reaches 2.0, so housing tops out at 1.3.
fn housing_score(record: &DevelopmentRecord, terms: &mut Vec<ScoreTerm>) -> f64 {
    let mix = &record.unit_mix;
    let studio_fraction = mix
        .studio
        .map(|studio| divide(f64::from(studio), f64::from(mix.total)))
        .unwrap_or(0.0);

    let area_adequacy = record
        .building_shape
        .avg_unit_area
        .map(|area| bounded(divide(REFERENCE_UNIT_AREA, area), 0.0, MAX_AREA_ADEQUACY))
        .unwrap_or(0.0);

    push(terms, ScoreFactor::StudioFraction, studio_fraction);
    push(terms, ScoreFactor::AreaAdequacy, area_adequacy);

    0.7 * studio_fraction + 0.3 * area_adequacy
}

fn comfort_score(record: &DevelopmentRecord, terms: &mut Vec<ScoreTerm>) -> f64 {
    let shape = &record.building_shape;

    let density = shape
        .avg_units_per_floor
        .map(|units| bounded(units / REFERENCE_UNITS_PER_FLOOR, 0.0, 1.0))
        .unwrap_or(0.0);

    let parking = record
        .amenities
        .parking_coverage
        .map(|coverage| bounded(1.0 - coverage, 0.0, 1.0))
        .unwrap_or(0.0);

    let ceiling = shape
        .ceiling_min
        .map(|height| {
            let shortfall = bounded(REFERENCE_CEILING_HEIGHT - height, 0.0, 1.0);
            (shortfall / CEILING_SHORTFALL_SPAN).min(1.0)
        })
        .unwrap_or(0.0);

    let height = shape
        .floors_max
        .map(|floors| {
            bounded(f64::from(floors) - TOWER_FLOOR_THRESHOLD, 0.0, TOWER_FLOOR_SPAN)
                / TOWER_FLOOR_SPAN
        })
        .unwrap_or(0.0);

    let elevator = shape
        .elevators_per_entrance
        .map(|elevators| bounded(REFERENCE_ELEVATORS_PER_ENTRANCE - elevators, 0.0, 1.0))
        .unwrap_or(0.0);

    push(terms, ScoreFactor::Density, density);
    push(terms, ScoreFactor::Parking, parking);
    push(terms, ScoreFactor::Ceiling, ceiling);
    push(terms, ScoreFactor::Height, height);
    push(terms, ScoreFactor::Elevators, elevator);

    bounded(
        0.3 * density + 0.25 * parking + 0.2 * ceiling + 0.15 * height + 0.1 * elevator,
        0.0,
        1.0,
    )
}

fn infrastructure_score(record: &DevelopmentRecord, terms: &mut Vec<ScoreTerm>) -> f64 {
    let amenities = &record.amenities;

    let children = amenities
        .playgrounds
        .map(|playgrounds| {
            let expected = f64::from(record.unit_mix.total) / UNITS_PER_PLAYGROUND;
            1.0 - bounded(divide(f64::from(playgrounds), expected), 0.0, 1.0)
        })
        .unwrap_or(0.0);

    let sports = absence_penalty(amenities.sports_areas.map(|count| count > 0));
    let bike = absence_penalty(amenities.bike_paths);
    let sidewalk = absence_penalty(amenities.sidewalks);
    let accessibility = accessibility_score(record);

    push(terms, ScoreFactor::Children, children);
    push(terms, ScoreFactor::Sports, sports);
    push(terms, ScoreFactor::BikePaths, bike);
    push(terms, ScoreFactor::Sidewalks, sidewalk);
    push(terms, ScoreFactor::Accessibility, accessibility);

    bounded(
        0.3 * children + 0.2 * sports + 0.15 * bike + 0.15 * sidewalk + 0.2 * accessibility,
        0.0,
        1.0,
    )
}

fn accessibility_score(record: &DevelopmentRecord) -> f64 {
    let amenities = &record.amenities;
    let lift = amenities.wheelchair_lifts.map(|count| count > 0);

    if amenities.ramp.is_none() && amenities.lowered_curbs.is_none() && lift.is_none() {
        return 0.0;
    }

    let present = [amenities.ramp, amenities.lowered_curbs, lift]
        .iter()
        .filter(|feature| **feature == Some(true))
        .count() as f64;

    (3.0 - present) / 3.0
}

fn absence_penalty(present: Option<bool>) -> f64 {
    match present {
        Some(false) => 1.0,
        Some(true) | None => 0.0,
    }
}

fn push(terms: &mut Vec<ScoreTerm>, factor: ScoreFactor, value: f64) {
    terms.push(ScoreTerm { factor, value });
}

fn divide(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    finite_or_zero(numerator / denominator)
}

fn bounded(value: f64, min: f64, max: f64) -> f64 {
    finite_or_zero(value).clamp(min, max)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn round3(value: f64) -> f64 {
    (finite_or_zero(value) * 1000.0).round() / 1000.0
}
