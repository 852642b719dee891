use housing_index::developments::{
    DevelopmentId, ImbalanceLevel, IndicatorScorer, ScoreFactor, ScoredCatalog,
};
use housing_index::ingest::DevelopmentImporter;

fn sample_catalog() -> ScoredCatalog {
    let imported = DevelopmentImporter::sample().expect("bundled sample parses");
    ScoredCatalog::build(imported.records, &IndicatorScorer::new())
}

#[test]
fn sample_developments_receive_expected_indices() {
    let catalog = sample_catalog();

    let indices: Vec<_> = catalog
        .entries()
        .iter()
        .map(|entry| (entry.record.id.as_str().to_string(), entry.score.index))
        .collect();
    assert_eq!(
        indices,
        vec![
            ("1".to_string(), 0.37),
            ("2".to_string(), 0.452),
            ("3".to_string(), 0.28),
        ]
    );

    let levels: Vec<_> = catalog
        .entries()
        .iter()
        .map(|entry| entry.score.level)
        .collect();
    assert_eq!(
        levels,
        vec![ImbalanceLevel::Low, ImbalanceLevel::Medium, ImbalanceLevel::Low]
    );
}

#[test]
fn sample_sub_scores_follow_the_weighted_formula() {
    let catalog = sample_catalog();
    let sky = catalog.get(&DevelopmentId::from("1")).expect("sample row 1");
    let score = &sky.score;

    assert!((score.housing - 0.4827).abs() < 1e-4);
    assert!((score.comfort - 0.3833).abs() < 1e-4);
    assert!((score.infrastructure - 0.0667).abs() < 1e-4);
    assert_eq!(score.term(ScoreFactor::StudioFraction), Some(0.3));
    assert_eq!(score.term(ScoreFactor::Height), Some(0.0));

    let recomputed = 0.5 * score.housing + 0.3 * score.comfort + 0.2 * score.infrastructure;
    assert!((recomputed - score.index).abs() < 5e-4);
}

#[test]
fn sample_rows_keep_address_and_derived_ratios() {
    let catalog = sample_catalog();
    let river = catalog.get(&DevelopmentId::from("2")).expect("sample row 2");

    assert_eq!(river.record.name, "ЖК «Река»");
    assert!(river
        .record
        .address
        .as_deref()
        .is_some_and(|address| address.contains("Профсоюзная")));
    assert_eq!(river.record.building_shape.elevators_per_entrance, Some(1.0));
    assert_eq!(river.record.unit_mix.three_room, Some(60));
    let coverage = river
        .record
        .amenities
        .parking_coverage
        .expect("coverage derived");
    assert!((coverage - 250.0 / 420.0).abs() < 1e-9);
}
