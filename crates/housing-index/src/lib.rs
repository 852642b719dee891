//! Social-imbalance scoring for residential housing developments.
//!
//! Records are ingested from CSV tables ([`ingest`]), scored once by the
//! [`developments::scoring::IndicatorScorer`], and served per viewer session
//! through the [`developments::DevelopmentMapService`], which keeps one
//! selection coordinator per session.

pub mod config;
pub mod developments;
pub mod error;
pub mod ingest;
pub mod telemetry;
