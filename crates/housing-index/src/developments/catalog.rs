use super::domain::{DevelopmentId, DevelopmentRecord};
use super::scoring::{DevelopmentScore, IndicatorScorer};
use super::selection::KnownIds;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

/// A record paired with the score attached once at load time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDevelopment {
    pub record: DevelopmentRecord,
    pub score: DevelopmentScore,
}

/// Scored snapshot of one ingestion pass, in ingestion order.
///
/// Replaced wholesale on reload. Lookups resolve duplicate identities to the
/// first record in ingestion order.
#[derive(Debug, Clone)]
pub struct ScoredCatalog {
    entries: Vec<ScoredDevelopment>,
    positions: HashMap<DevelopmentId, usize>,
    known: KnownIds,
    loaded_at: DateTime<Utc>,
}

impl ScoredCatalog {
    pub fn build(records: Vec<DevelopmentRecord>, scorer: &IndicatorScorer) -> Self {
        let mut positions = HashMap::with_capacity(records.len());
        let mut entries = Vec::with_capacity(records.len());

        for (position, record) in records.into_iter().enumerate() {
            if positions.contains_key(&record.id) {
                warn!(
                    id = %record.id,
                    name = %record.name,
                    "duplicate development identity; keeping the first record"
                );
            } else {
                positions.insert(record.id.clone(), position);
            }

            let score = scorer.score(&record);
            entries.push(ScoredDevelopment { record, score });
        }

        let known = entries
            .iter()
            .map(|entry| entry.record.id.clone())
            .collect();

        Self {
            entries,
            positions,
            known,
            loaded_at: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self::build(Vec::new(), &IndicatorScorer::new())
    }

    pub fn get(&self, id: &DevelopmentId) -> Option<&ScoredDevelopment> {
        self.positions
            .get(id)
            .and_then(|position| self.entries.get(*position))
    }

    pub fn entries(&self) -> &[ScoredDevelopment] {
        &self.entries
    }

    pub fn known_ids(&self) -> &KnownIds {
        &self.known
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}
