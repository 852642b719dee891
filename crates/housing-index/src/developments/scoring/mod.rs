//! Indicator scoring for a single development.
//!
//! The scorer only looks at the record it is given: no cross-record
//! normalization and no global statistics. Missing optional inputs and
//! undefined arithmetic contribute zero instead of failing.

mod level;
mod rules;

pub use level::ImbalanceLevel;

use super::domain::DevelopmentRecord;
use serde::{Deserialize, Serialize};

/// Stateless scorer applying the weighted sub-score formulas.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorScorer;

impl IndicatorScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, record: &DevelopmentRecord) -> DevelopmentScore {
        let sub_scores = rules::score_record(record);
        let index = rules::composite_index(
            sub_scores.housing,
            sub_scores.comfort,
            sub_scores.infrastructure,
        );

        DevelopmentScore {
            index,
            level: ImbalanceLevel::classify(index),
            housing: sub_scores.housing,
            comfort: sub_scores.comfort,
            infrastructure: sub_scores.infrastructure,
            terms: sub_scores.terms,
        }
    }
}

/// Individual term feeding a sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    StudioFraction,
    AreaAdequacy,
    Density,
    Parking,
    Ceiling,
    Height,
    Elevators,
    Children,
    Sports,
    BikePaths,
    Sidewalks,
    Accessibility,
}

impl ScoreFactor {
    pub const fn label(self) -> &'static str {
        match self {
            Self::StudioFraction => "Studio share",
            Self::AreaAdequacy => "Unit area adequacy",
            Self::Density => "Units per floor",
            Self::Parking => "Parking shortfall",
            Self::Ceiling => "Low ceilings",
            Self::Height => "Tower height",
            Self::Elevators => "Elevator shortfall",
            Self::Children => "Playground shortfall",
            Self::Sports => "No sports areas",
            Self::BikePaths => "No bike paths",
            Self::Sidewalks => "No sidewalks",
            Self::Accessibility => "Accessibility gaps",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreTerm {
    pub factor: ScoreFactor,
    pub value: f64,
}

/// Composite index with its weighted sub-scores.
///
/// `index` is rounded to three decimals and is not clamped: the housing
/// sub-score can reach 1.3, so `index` ranges over `[0, 1.3]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentScore {
    pub index: f64,
    pub level: ImbalanceLevel,
    pub housing: f64,
    pub comfort: f64,
    pub infrastructure: f64,
    pub terms: Vec<ScoreTerm>,
}

impl DevelopmentScore {
    pub fn term(&self, factor: ScoreFactor) -> Option<f64> {
        self.terms
            .iter()
            .find(|term| term.factor == factor)
            .map(|term| term.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::developments::domain::{Amenities, BuildingShape, GeoPoint};

    fn bare_record(studio: u32, total: u32, area: Option<f64>) -> DevelopmentRecord {
        let mut record = DevelopmentRecord::new(
            "1",
            "Test",
            GeoPoint {
                lat: 55.75,
                lon: 37.61,
            },
            total,
        );
        record.unit_mix.studio = Some(studio);
        record.building_shape.avg_unit_area = area;
        record
    }

    fn worst_case_record() -> DevelopmentRecord {
        let mut record = bare_record(300, 300, Some(10.0));
        record.building_shape = BuildingShape {
            floors_min: Some(30),
            floors_max: Some(40),
            ceiling_min: Some(2.0),
            ceiling_max: Some(2.5),
            avg_unit_area: Some(10.0),
            avg_units_per_floor: Some(16.0),
            elevators_per_entrance: Some(0.0),
        };
        record.amenities = Amenities {
            playgrounds: Some(0),
            sports_areas: Some(0),
            bike_paths: Some(false),
            sidewalks: Some(false),
            parking_spots: Some(0),
            parking_coverage: Some(0.0),
            ramp: Some(false),
            lowered_curbs: Some(false),
            wheelchair_lifts: Some(0),
            elevators: Some(0),
        };
        record
    }

    #[test]
    fn half_studio_block_scores_low() {
        let score = IndicatorScorer::new().score(&bare_record(100, 200, Some(35.0)));

        assert_eq!(score.term(ScoreFactor::StudioFraction), Some(0.5));
        assert_eq!(score.term(ScoreFactor::AreaAdequacy), Some(1.0));
        assert!((score.housing - 0.65).abs() < 1e-12);
        assert_eq!(score.comfort, 0.0);
        assert_eq!(score.infrastructure, 0.0);
        assert_eq!(score.index, 0.325);
        assert_eq!(score.level, ImbalanceLevel::Low);
    }

    #[test]
    fn zero_total_units_does_not_panic() {
        let score = IndicatorScorer::new().score(&bare_record(50, 0, Some(35.0)));

        assert_eq!(score.term(ScoreFactor::StudioFraction), Some(0.0));
        assert!(score.index.is_finite());
    }

    #[test]
    fn playgrounds_without_apartments_count_as_full_shortfall() {
        let mut record = bare_record(0, 0, None);
        record.amenities.playgrounds = Some(2);

        let score = IndicatorScorer::new().score(&record);

        assert_eq!(score.term(ScoreFactor::Children), Some(1.0));
        assert!((score.infrastructure - 0.3).abs() < 1e-12);
        assert_eq!(score.index, 0.06);
    }

    #[test]
    fn zero_area_contributes_nothing() {
        let score = IndicatorScorer::new().score(&bare_record(0, 100, Some(0.0)));
        assert_eq!(score.term(ScoreFactor::AreaAdequacy), Some(0.0));
        assert_eq!(score.index, 0.0);
    }

    #[test]
    fn area_adequacy_is_capped_at_two() {
        let score = IndicatorScorer::new().score(&bare_record(0, 100, Some(5.0)));
        assert_eq!(score.term(ScoreFactor::AreaAdequacy), Some(2.0));
    }

    // Guards the unclamped composite: clamping it must be a deliberate change.
    #[test]
    fn index_may_exceed_one_for_degenerate_inputs() {
        let score = IndicatorScorer::new().score(&worst_case_record());

        assert!((score.housing - 1.3).abs() < 1e-12);
        assert!((score.comfort - 1.0).abs() < 1e-9);
        assert!((score.infrastructure - 1.0).abs() < 1e-9);
        assert_eq!(score.index, 1.15);
        assert!(score.index > 1.0);
        assert_eq!(score.level, ImbalanceLevel::High);
    }

    #[test]
    fn comfort_terms_follow_reference_norms() {
        let mut record = bare_record(0, 400, None);
        record.building_shape.avg_units_per_floor = Some(4.0);
        record.building_shape.ceiling_min = Some(2.6);
        record.building_shape.floors_max = Some(30);
        record.building_shape.elevators_per_entrance = Some(1.5);
        record.amenities.parking_coverage = Some(0.75);

        let score = IndicatorScorer::new().score(&record);

        assert_eq!(score.term(ScoreFactor::Density), Some(0.5));
        assert_eq!(score.term(ScoreFactor::Parking), Some(0.25));
        let ceiling = score.term(ScoreFactor::Ceiling).expect("ceiling term");
        assert!((ceiling - 0.2).abs() < 1e-9);
        assert_eq!(score.term(ScoreFactor::Height), Some(0.5));
        assert_eq!(score.term(ScoreFactor::Elevators), Some(0.5));

        let expected = 0.3 * 0.5 + 0.25 * 0.25 + 0.2 * 0.2 + 0.15 * 0.5 + 0.1 * 0.5;
        assert!((score.comfort - expected).abs() < 1e-9);
    }

    #[test]
    fn infrastructure_rewards_playgrounds_and_accessibility() {
        let mut record = bare_record(0, 600, None);
        record.amenities.playgrounds = Some(1);
        record.amenities.sports_areas = Some(2);
        record.amenities.bike_paths = Some(true);
        record.amenities.sidewalks = Some(false);
        record.amenities.ramp = Some(true);
        record.amenities.lowered_curbs = Some(false);
        record.amenities.wheelchair_lifts = Some(1);

        let score = IndicatorScorer::new().score(&record);

        assert_eq!(score.term(ScoreFactor::Children), Some(0.5));
        assert_eq!(score.term(ScoreFactor::Sports), Some(0.0));
        assert_eq!(score.term(ScoreFactor::BikePaths), Some(0.0));
        assert_eq!(score.term(ScoreFactor::Sidewalks), Some(1.0));
        let accessibility = score.term(ScoreFactor::Accessibility).expect("term");
        assert!((accessibility - 1.0 / 3.0).abs() < 1e-12);

        let expected = 0.3 * 0.5 + 0.15 + 0.2 / 3.0;
        assert!((score.infrastructure - expected).abs() < 1e-9);
    }

    #[test]
    fn scoring_is_deterministic() {
        let scorer = IndicatorScorer::new();
        let record = worst_case_record();
        let first = scorer.score(&record);
        for _ in 0..5 {
            assert_eq!(scorer.score(&record), first);
        }
    }

    #[test]
    fn sub_scores_stay_within_bounds() {
        let scorer = IndicatorScorer::new();
        for area in [0.0, 1.0, 17.5, 35.0, 70.0, f64::NAN] {
            for studio in [0, 50, 100] {
                let mut record = worst_case_record();
                record.unit_mix.studio = Some(studio);
                record.unit_mix.total = 100;
                record.building_shape.avg_unit_area = Some(area);

                let score = scorer.score(&record);
                let adequacy = score.term(ScoreFactor::AreaAdequacy).expect("term");
                assert!((0.0..=2.0).contains(&adequacy));
                assert!((0.0..=1.0).contains(&score.comfort));
                assert!((0.0..=1.0).contains(&score.infrastructure));
                assert!((0.0..=1.3).contains(&score.index));
            }
        }
    }
}
