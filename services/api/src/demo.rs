use chrono::Local;
use clap::Args;
use housing_index::developments::{
    DevelopmentDetailView, DevelopmentId, DevelopmentScore, ImbalanceLevel, IndicatorScorer, NavigationState,
    ScoredCatalog, SelectionCoordinator, SelectionSignals, NAVIGATION_PARAM,
};
use housing_index::error::AppError;
use housing_index::ingest::{DataSource, DevelopmentImporter, ImportSummary};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// CSV file or directory of CSV files (defaults to the bundled sample)
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
    /// Emit JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ShowArgs {
    /// CSV file or directory of CSV files (defaults to the bundled sample)
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
    /// Identity carried in navigation state (the `development` query parameter)
    #[arg(long)]
    pub(crate) development: Option<String>,
    /// Identity of a marker clicked during this pass
    #[arg(long)]
    pub(crate) click: Option<String>,
    /// Identity the session held before this pass
    #[arg(long)]
    pub(crate) prior: Option<String>,
}

#[derive(Debug, Serialize)]
struct ScoreRow<'a> {
    id: &'a DevelopmentId,
    name: &'a str,
    index: f64,
    level: &'static str,
    housing: f64,
    comfort: f64,
    infrastructure: f64,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let (catalog, summary) = load_catalog(args.data)?;

    if args.json {
        let rows: Vec<ScoreRow<'_>> = catalog
            .entries()
            .iter()
            .map(|entry| ScoreRow {
                id: &entry.record.id,
                name: &entry.record.name,
                index: entry.score.index,
                level: entry.score.level.label(),
                housing: entry.score.housing,
                comfort: entry.score.comfort,
                infrastructure: entry.score.infrastructure,
            })
            .collect();
        match serde_json::to_string_pretty(&rows) {
            Ok(json) => println!("{}", json),
            Err(err) => println!("Score payload unavailable: {}", err),
        }
        return Ok(());
    }

    render_import_summary(&summary);
    render_score_table(&catalog);
    Ok(())
}

pub(crate) fn run_show(args: ShowArgs) -> Result<(), AppError> {
    let ShowArgs {
        data,
        development,
        click,
        prior,
    } = args;

    let (catalog, _) = load_catalog(data)?;
    let mut coordinator = SelectionCoordinator::with_prior(prior.map(DevelopmentId::from));
    let mut navigation = NavigationState::from_query_value(development.as_deref());

    let signals = navigation.signals(click.map(DevelopmentId::from));
    let outcome = coordinator.reconcile_and_notify(&signals, catalog.known_ids(), &mut navigation);

    println!(
        "Selection rule: {:?} | changed: {}",
        outcome.source,
        if outcome.changed { "yes" } else { "no" }
    );
    match navigation.query_value() {
        Some(value) => println!("Navigation: ?{}={}", NAVIGATION_PARAM, value),
        None => println!("Navigation: (empty)"),
    }

    match outcome.selection.as_ref().and_then(|id| catalog.get(id)) {
        Some(entry) => render_detail(&DevelopmentDetailView::from(entry)),
        None => println!("No development data loaded; nothing to show."),
    }

    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    println!("Housing imbalance demo");
    let (catalog, summary) = load_catalog(None)?;
    render_import_summary(&summary);
    render_score_table(&catalog);

    let mut coordinator = SelectionCoordinator::new();
    let mut navigation = NavigationState::default();

    println!("\nSelection walkthrough");
    let opened = coordinator.reconcile_and_notify(
        &navigation.signals(None),
        catalog.known_ids(),
        &mut navigation,
    );
    println!(
        "- page opened without a link -> {:?} picks {}",
        opened.source,
        describe(&catalog, opened.selection.as_ref())
    );

    let target = catalog
        .entries()
        .iter()
        .max_by(|left, right| left.score.index.total_cmp(&right.score.index))
        .map(|entry| entry.record.id.clone());
    if let Some(target) = target {
        let clicked = coordinator.reconcile_and_notify(
            &navigation.signals(Some(target)),
            catalog.known_ids(),
            &mut navigation,
        );
        println!(
            "- marker clicked -> {:?} picks {} (link now ?{}={})",
            clicked.source,
            describe(&catalog, clicked.selection.as_ref()),
            NAVIGATION_PARAM,
            navigation.query_value().unwrap_or_default()
        );

        let settled = coordinator.reconcile_and_notify(
            &navigation.signals(None),
            catalog.known_ids(),
            &mut navigation,
        );
        println!(
            "- next pass reads the link -> {:?}, changed: {}",
            settled.source, settled.changed
        );
    }

    let stale = coordinator.reconcile_and_notify(
        &SelectionSignals::navigation("no-such-development"),
        catalog.known_ids(),
        &mut navigation,
    );
    println!(
        "- stale link ignored -> {:?} keeps {}",
        stale.source,
        describe(&catalog, stale.selection.as_ref())
    );

    if let Some(entry) = coordinator.current().and_then(|id| catalog.get(id)) {
        println!();
        render_detail(&DevelopmentDetailView::from(entry));
    }

    Ok(())
}

fn load_catalog(data: Option<PathBuf>) -> Result<(ScoredCatalog, ImportSummary), AppError> {
    let source = DataSource::from_optional_path(data);
    let imported = DevelopmentImporter::load(&source)?;
    let catalog = ScoredCatalog::build(imported.records, &IndicatorScorer::new());
    Ok((catalog, imported.summary))
}

fn describe(catalog: &ScoredCatalog, id: Option<&DevelopmentId>) -> String {
    match id.and_then(|id| catalog.get(id)) {
        Some(entry) => format!("{} ({})", entry.record.name, entry.record.id),
        None => "nothing".to_string(),
    }
}

fn render_import_summary(summary: &ImportSummary) {
    println!(
        "Imported {} of {} rows from {} file(s)",
        summary.imported,
        summary.rows,
        summary.files.len()
    );
    for skipped in &summary.skipped {
        println!(
            "  skipped {} line {}: missing {}",
            skipped.source,
            skipped.line,
            skipped.missing.label()
        );
    }
}

fn render_score_table(catalog: &ScoredCatalog) {
    println!(
        "Scored at {}",
        catalog
            .loaded_at()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "{:<8} {:<28} {:>6} {:<7} {:>7} {:>7} {:>7}",
        "id", "name", "index", "level", "housing", "comfort", "infra"
    );
    for entry in catalog.entries() {
        println!(
            "{:<8} {:<28} {:>6.3} {:<7} {:>7.3} {:>7.3} {:>7.3}",
            entry.record.id.as_str(),
            entry.record.name,
            entry.score.index,
            entry.score.level.label(),
            entry.score.housing,
            entry.score.comfort,
            entry.score.infrastructure
        );
    }

    for level in ImbalanceLevel::ordered() {
        let count = catalog
            .entries()
            .iter()
            .filter(|entry| entry.score.level == level)
            .count();
        println!("- {} ({}): {}", level.label(), level.marker_color(), count);
    }
}

fn render_detail(view: &DevelopmentDetailView) {
    println!("{} [{}]", view.name, view.id);
    if let Some(address) = &view.address {
        println!("{}", address);
    }
    println!(
        "Imbalance index {:.3} ({}) | housing {:.3} | comfort {:.3} | infrastructure {:.3}",
        view.score.index,
        view.level_label,
        view.score.housing,
        view.score.comfort,
        view.score.infrastructure
    );
    for fact in &view.facts {
        println!("  {}: {}", fact.label, fact.value);
    }
    let drivers = score_drivers(&view.score);
    if !drivers.is_empty() {
        println!("Drivers:");
        for driver in drivers {
            println!("  {}", driver);
        }
    }
}

/// Terms that pushed the index up, largest first.
fn score_drivers(score: &DevelopmentScore) -> Vec<String> {
    let mut terms: Vec<_> = score.terms.iter().filter(|term| term.value > 0.0).collect();
    terms.sort_by(|left, right| right.value.total_cmp(&left.value));
    terms
        .into_iter()
        .map(|term| format!("{}: {:.3}", term.factor.label(), term.value))
        .collect()
}
