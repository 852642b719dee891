use housing_index::developments::{
    SelectionCoordinator, SelectionStore, SelectionStoreError, SessionId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session slots. Each pass holds the map lock for its duration.
#[derive(Default, Clone)]
pub(crate) struct InMemorySelectionStore {
    sessions: Arc<Mutex<HashMap<SessionId, SelectionCoordinator>>>,
}

#[cfg(test)]
impl InMemorySelectionStore {
    pub(crate) fn session_count(&self) -> usize {
        self.sessions
            .lock()
            .map(|guard| guard.len())
            .unwrap_or_default()
    }
}

impl SelectionStore for InMemorySelectionStore {
    fn with_session(
        &self,
        session: &SessionId,
        pass: &mut dyn FnMut(&mut SelectionCoordinator),
    ) -> Result<(), SelectionStoreError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|_| SelectionStoreError::Unavailable("session mutex poisoned".to_string()))?;
        pass(guard.entry(session.clone()).or_default());
        Ok(())
    }

    fn remove(&self, session: &SessionId) -> Result<(), SelectionStoreError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|_| SelectionStoreError::Unavailable("session mutex poisoned".to_string()))?;
        guard.remove(session);
        Ok(())
    }
}
