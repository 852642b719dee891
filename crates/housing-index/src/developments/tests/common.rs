use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::response::Response;
use serde_json::Value;

use crate::developments::domain::{DevelopmentRecord, GeoPoint};
use crate::developments::selection::{
    SelectionCoordinator, SelectionStore, SelectionStoreError, SessionId,
};
use crate::developments::service::DevelopmentMapService;
use crate::ingest::DataSource;

#[derive(Default)]
pub(super) struct MemoryStore {
    sessions: Mutex<HashMap<SessionId, SelectionCoordinator>>,
}

impl MemoryStore {
    pub(super) fn current(&self, session: &str) -> Option<String> {
        let guard = self.sessions.lock().expect("store mutex poisoned");
        guard
            .get(&SessionId(session.to_string()))
            .and_then(|coordinator| coordinator.current())
            .map(|id| id.as_str().to_string())
    }

    pub(super) fn len(&self) -> usize {
        self.sessions.lock().expect("store mutex poisoned").len()
    }
}

impl SelectionStore for MemoryStore {
    fn with_session(
        &self,
        session: &SessionId,
        pass: &mut dyn FnMut(&mut SelectionCoordinator),
    ) -> Result<(), SelectionStoreError> {
        let mut guard = self.sessions.lock().expect("store mutex poisoned");
        pass(guard.entry(session.clone()).or_default());
        Ok(())
    }

    fn remove(&self, session: &SessionId) -> Result<(), SelectionStoreError> {
        self.sessions
            .lock()
            .expect("store mutex poisoned")
            .remove(session);
        Ok(())
    }
}

pub(super) struct UnavailableStore;

impl SelectionStore for UnavailableStore {
    fn with_session(
        &self,
        _session: &SessionId,
        _pass: &mut dyn FnMut(&mut SelectionCoordinator),
    ) -> Result<(), SelectionStoreError> {
        Err(SelectionStoreError::Unavailable("offline".to_string()))
    }

    fn remove(&self, _session: &SessionId) -> Result<(), SelectionStoreError> {
        Err(SelectionStoreError::Unavailable("offline".to_string()))
    }
}

pub(super) fn location() -> GeoPoint {
    GeoPoint {
        lat: 55.7512,
        lon: 37.6184,
    }
}

/// Studio-heavy tower block with no amenities reported as present.
pub(super) fn crowded_tower(id: &str) -> DevelopmentRecord {
    let mut record = DevelopmentRecord::new(id, "Tower", location(), 400);
    record.unit_mix.studio = Some(320);
    record.building_shape.avg_unit_area = Some(20.0);
    record.building_shape.avg_units_per_floor = Some(14.0);
    record.building_shape.floors_max = Some(40);
    record.amenities.parking_coverage = Some(0.1);
    record.amenities.playgrounds = Some(0);
    record.amenities.sports_areas = Some(0);
    record.amenities.bike_paths = Some(false);
    record.amenities.sidewalks = Some(false);
    record.amenities.ramp = Some(false);
    record
}

pub(super) fn quiet_block(id: &str) -> DevelopmentRecord {
    let mut record = DevelopmentRecord::new(id, "Quiet", location(), 120);
    record.unit_mix.studio = Some(6);
    record.building_shape.avg_unit_area = Some(70.0);
    record.amenities.playgrounds = Some(2);
    record
}

pub(super) fn records() -> Vec<DevelopmentRecord> {
    vec![quiet_block("a"), crowded_tower("b"), quiet_block("c")]
}

pub(super) fn service_with(
    records: Vec<DevelopmentRecord>,
) -> (Arc<DevelopmentMapService<MemoryStore>>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = DevelopmentMapService::from_records(records, DataSource::Sample, store.clone());
    (Arc::new(service), store)
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}
