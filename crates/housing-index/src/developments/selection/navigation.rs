use super::{SelectionListener, SelectionSignals};
use crate::developments::domain::DevelopmentId;
use serde::{Deserialize, Serialize};

/// Query parameter carrying the selected development in shareable links.
pub const NAVIGATION_PARAM: &str = "development";

/// Shareable navigation state owned by the rendering side.
///
/// It is read at the start of a pass and rewritten when the coordinator
/// reports a change, so the next pass sees the new identity as its
/// navigation signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    development: Option<DevelopmentId>,
}

impl NavigationState {
    pub fn new(development: Option<DevelopmentId>) -> Self {
        Self { development }
    }

    /// Parse the raw query value; blank values carry no selection.
    pub fn from_query_value(raw: Option<&str>) -> Self {
        let development = raw
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(DevelopmentId::from);
        Self { development }
    }

    pub fn development(&self) -> Option<&DevelopmentId> {
        self.development.as_ref()
    }

    pub fn query_value(&self) -> Option<&str> {
        self.development.as_ref().map(DevelopmentId::as_str)
    }

    /// Signals for the next pass: this navigation value plus an optional click.
    pub fn signals(&self, click: Option<DevelopmentId>) -> SelectionSignals {
        SelectionSignals {
            navigation: self.development.clone(),
            click,
        }
    }
}

impl SelectionListener for NavigationState {
    fn selection_changed(&mut self, selection: Option<&DevelopmentId>) {
        self.development = selection.cloned();
    }
}
