use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::info;

use super::catalog::ScoredCatalog;
use super::domain::{DevelopmentId, DevelopmentRecord};
use super::geo::feature_collection;
use super::scoring::IndicatorScorer;
use super::selection::{
    NavigationState, SelectionCoordinator, SelectionSignals, SelectionSource, SelectionStore,
    SelectionStoreError, SessionId,
};
use super::views::{DevelopmentDetailView, MapOverview};
use crate::ingest::{DataSource, DevelopmentImporter, ImportError, ImportSummary};

/// Service composing the scored catalog with per-session selection coordinators.
///
/// The catalog is swapped as a whole on reload; a pass works against the
/// snapshot it started with.
pub struct DevelopmentMapService<S> {
    catalog: RwLock<Arc<ScoredCatalog>>,
    store: Arc<S>,
    scorer: IndicatorScorer,
    source: DataSource,
}

impl<S> DevelopmentMapService<S>
where
    S: SelectionStore + 'static,
{
    /// Ingest `source` and score every record.
    pub fn load(source: DataSource, store: Arc<S>) -> Result<Self, DevelopmentServiceError> {
        let imported = DevelopmentImporter::load(&source)?;
        Ok(Self::from_records(imported.records, source, store))
    }

    pub fn from_records(records: Vec<DevelopmentRecord>, source: DataSource, store: Arc<S>) -> Self {
        let scorer = IndicatorScorer::new();
        let catalog = ScoredCatalog::build(records, &scorer);
        Self {
            catalog: RwLock::new(Arc::new(catalog)),
            store,
            scorer,
            source,
        }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Current catalog snapshot.
    pub fn catalog(&self) -> Arc<ScoredCatalog> {
        match self.catalog.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn overview(&self) -> MapOverview {
        MapOverview::from_catalog(&self.catalog())
    }

    pub fn geojson(&self) -> geojson::FeatureCollection {
        feature_collection(&self.catalog())
    }

    pub fn detail(&self, id: &DevelopmentId) -> Result<DevelopmentDetailView, DevelopmentServiceError> {
        let catalog = self.catalog();
        catalog
            .get(id)
            .map(DevelopmentDetailView::from)
            .ok_or_else(|| DevelopmentServiceError::UnknownDevelopment(id.clone()))
    }

    /// Run one reconciliation pass for `session`.
    ///
    /// The navigation value in `signals` is read at the start of the pass and
    /// the returned view carries the value to write back.
    pub fn select(
        &self,
        session: &SessionId,
        signals: SelectionSignals,
    ) -> Result<SelectionView, DevelopmentServiceError> {
        let catalog = self.catalog();
        let mut navigation = NavigationState::new(signals.navigation.clone());
        let mut outcome = None;

        self.store.with_session(session, &mut |coordinator: &mut SelectionCoordinator| {
            outcome = Some(coordinator.reconcile_and_notify(
                &signals,
                catalog.known_ids(),
                &mut navigation,
            ));
        })?;

        let outcome = outcome.ok_or_else(|| {
            SelectionStoreError::Unavailable(format!("session {session} was not visited"))
        })?;

        let selection = outcome
            .selection
            .as_ref()
            .and_then(|id| catalog.get(id))
            .map(DevelopmentDetailView::from);
        let status = if selection.is_some() {
            SelectionStatus::Selected
        } else {
            SelectionStatus::NoData
        };

        Ok(SelectionView {
            session_id: session.clone(),
            status,
            selection,
            changed: outcome.changed,
            source: outcome.source,
            navigation,
        })
    }

    pub fn end_session(&self, session: &SessionId) -> Result<(), DevelopmentServiceError> {
        self.store.remove(session)?;
        Ok(())
    }

    /// Score `records` and swap them in as the current catalog.
    pub fn replace_records(&self, records: Vec<DevelopmentRecord>) -> usize {
        let catalog = Arc::new(ScoredCatalog::build(records, &self.scorer));
        let count = catalog.len();
        match self.catalog.write() {
            Ok(mut guard) => *guard = catalog,
            Err(poisoned) => *poisoned.into_inner() = catalog,
        }
        count
    }

    /// Re-ingest from the configured source.
    ///
    /// Sessions are kept; a selection that disappeared falls back on its next pass.
    pub fn reload(&self) -> Result<ImportSummary, DevelopmentServiceError> {
        let imported = DevelopmentImporter::load(&self.source)?;
        let count = self.replace_records(imported.records);
        info!(
            source = %self.source.describe(),
            developments = count,
            skipped = imported.summary.skipped.len(),
            "development catalog reloaded"
        );
        Ok(imported.summary)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStatus {
    Selected,
    NoData,
}

/// Outcome of one pass as handed to the rendering side.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionView {
    pub session_id: SessionId,
    pub status: SelectionStatus,
    pub selection: Option<DevelopmentDetailView>,
    pub changed: bool,
    pub source: SelectionSource,
    pub navigation: NavigationState,
}

#[derive(Debug, thiserror::Error)]
pub enum DevelopmentServiceError {
    #[error("development {0} not found")]
    UnknownDevelopment(DevelopmentId),
    #[error(transparent)]
    Store(#[from] SelectionStoreError),
    #[error(transparent)]
    Import(#[from] ImportError),
}
