//! Scored housing developments and the per-session active selection.

pub mod catalog;
pub mod domain;
pub mod geo;
pub mod router;
pub mod scoring;
pub mod selection;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use catalog::{ScoredCatalog, ScoredDevelopment};
pub use domain::{
    Amenities, BuildingShape, DevelopmentId, DevelopmentRecord, GeoPoint, UnitMix,
};
pub use router::development_router;
pub use scoring::{DevelopmentScore, ImbalanceLevel, IndicatorScorer, ScoreFactor, ScoreTerm};
pub use selection::{
    reconcile, KnownIds, NavigationState, Reconciliation, SelectionCoordinator, SelectionListener,
    SelectionSignals, SelectionSource, SelectionStore, SelectionStoreError, SessionId,
    NAVIGATION_PARAM,
};
pub use service::{
    DevelopmentMapService, DevelopmentServiceError, SelectionStatus, SelectionView,
};
pub use views::{DetailFact, DevelopmentDetailView, LevelCount, MapOverview, MarkerView};
