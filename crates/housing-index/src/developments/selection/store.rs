use super::SelectionCoordinator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one viewer session; each session owns exactly one coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage for per-session coordinators.
///
/// `with_session` must run `pass` while holding exclusive access to the
/// session's coordinator, creating an empty one on first use. Passes for the
/// same session are therefore serialized; different sessions never share a slot.
pub trait SelectionStore: Send + Sync {
    fn with_session(
        &self,
        session: &SessionId,
        pass: &mut dyn FnMut(&mut SelectionCoordinator),
    ) -> Result<(), SelectionStoreError>;

    fn remove(&self, session: &SessionId) -> Result<(), SelectionStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SelectionStoreError {
    #[error("selection store unavailable: {0}")]
    Unavailable(String),
}
