//! Reconciliation of the single "active development" slot.
//!
//! Three signals compete for the slot on every pass: a click from the map,
//! the identity carried in shareable navigation state, and whatever the
//! session held before. [`reconcile`] resolves them in a fixed order and
//! [`SelectionCoordinator`] owns the slot between passes.

mod navigation;
mod store;

pub use navigation::{NavigationState, NAVIGATION_PARAM};
pub use store::{SelectionStore, SelectionStoreError, SessionId};

use super::domain::DevelopmentId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Valid identities for a pass, in ingestion order with duplicates dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownIds {
    ordered: Vec<DevelopmentId>,
    members: HashSet<DevelopmentId>,
}

impl KnownIds {
    pub fn contains(&self, id: &DevelopmentId) -> bool {
        self.members.contains(id)
    }

    pub fn first(&self) -> Option<&DevelopmentId> {
        self.ordered.first()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DevelopmentId> {
        self.ordered.iter()
    }
}

impl FromIterator<DevelopmentId> for KnownIds {
    fn from_iter<I: IntoIterator<Item = DevelopmentId>>(iter: I) -> Self {
        let mut known = KnownIds::default();
        for id in iter {
            if known.members.insert(id.clone()) {
                known.ordered.push(id);
            }
        }
        known
    }
}

/// External inputs of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSignals {
    #[serde(default)]
    pub navigation: Option<DevelopmentId>,
    #[serde(default)]
    pub click: Option<DevelopmentId>,
}

impl SelectionSignals {
    pub fn click(id: impl Into<DevelopmentId>) -> Self {
        Self {
            navigation: None,
            click: Some(id.into()),
        }
    }

    pub fn navigation(id: impl Into<DevelopmentId>) -> Self {
        Self {
            navigation: Some(id.into()),
            click: None,
        }
    }
}

/// Which precedence rule produced the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionSource {
    Click,
    Navigation,
    Prior,
    Fallback,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub selection: Option<DevelopmentId>,
    pub changed: bool,
    pub source: SelectionSource,
}

/// Resolve the active identity for one pass.
///
/// Rules, first match wins:
/// 1. a known click that differs from `prior`;
/// 2. a known navigation identity;
/// 3. a known `prior`;
/// 4. the first known identity, or nothing when `known` is empty.
///
/// `changed` compares the result against `prior`.
pub fn reconcile(
    click: Option<&DevelopmentId>,
    navigation: Option<&DevelopmentId>,
    prior: Option<&DevelopmentId>,
    known: &KnownIds,
) -> Reconciliation {
    let (selection, source) = match click {
        Some(id) if known.contains(id) && Some(id) != prior => (Some(id), SelectionSource::Click),
        _ => match navigation {
            Some(id) if known.contains(id) => (Some(id), SelectionSource::Navigation),
            _ => match prior {
                Some(id) if known.contains(id) => (Some(id), SelectionSource::Prior),
                _ => match known.first() {
                    Some(id) => (Some(id), SelectionSource::Fallback),
                    None => (None, SelectionSource::Empty),
                },
            },
        },
    };

    Reconciliation {
        changed: selection != prior,
        selection: selection.cloned(),
        source,
    }
}

/// Receives the new identity whenever a pass changes the selection.
pub trait SelectionListener {
    fn selection_changed(&mut self, selection: Option<&DevelopmentId>);
}

/// The single selection slot of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    current: Option<DevelopmentId>,
}

impl SelectionState {
    pub fn current(&self) -> Option<&DevelopmentId> {
        self.current.as_ref()
    }
}

/// Owns one session's [`SelectionState`] and mutates it only through [`reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionCoordinator {
    state: SelectionState,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prior(prior: Option<DevelopmentId>) -> Self {
        Self {
            state: SelectionState { current: prior },
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn current(&self) -> Option<&DevelopmentId> {
        self.state.current()
    }

    pub fn reconcile(&mut self, signals: &SelectionSignals, known: &KnownIds) -> Reconciliation {
        let outcome = reconcile(
            signals.click.as_ref(),
            signals.navigation.as_ref(),
            self.state.current.as_ref(),
            known,
        );

        debug!(
            source = ?outcome.source,
            changed = outcome.changed,
            selection = outcome.selection.as_ref().map(DevelopmentId::as_str),
            "selection reconciled"
        );

        self.state.current = outcome.selection.clone();
        outcome
    }

    /// Reconcile and tell `listener` about the new identity when it changed.
    pub fn reconcile_and_notify<L>(
        &mut self,
        signals: &SelectionSignals,
        known: &KnownIds,
        listener: &mut L,
    ) -> Reconciliation
    where
        L: SelectionListener + ?Sized,
    {
        let outcome = self.reconcile(signals, known);
        if outcome.changed {
            listener.selection_changed(outcome.selection.as_ref());
        }
        outcome
    }
}
