// --- File: crates/courtbook_booking/src/selection.rs ---
use courtbook_common::Court;
use serde::Serialize;

/// Courts currently shown, in toggle order.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CourtSelection {
    ids: Vec<String>,
    #[serde(skip)]
    bootstrapped: bool,
}

impl CourtSelection {
    pub fn new(ids: impl IntoIterator<Item = String>) -> Self {
        let mut selection = Self {
            ids: Vec::new(),
            bootstrapped: true,
        };
        for id in ids {
            if !selection.contains(&id) {
                selection.ids.push(id);
            }
        }
        selection
    }

    /// Selects the first `count` courts the first time a non-empty list arrives.
    /// Returns whether anything changed.
    pub fn bootstrap(&mut self, courts: &[Court], count: usize) -> bool {
        if self.bootstrapped || courts.is_empty() {
            return false;
        }
        self.bootstrapped = true;
        self.ids = courts.iter().take(count).map(|c| c.id.clone()).collect();
        true
    }

    /// Flips one court; returns whether it is selected afterwards.
    pub fn toggle(&mut self, court_id: &str) -> bool {
        self.bootstrapped = true;
        if let Some(index) = self.ids.iter().position(|id| id == court_id) {
            self.ids.remove(index);
            false
        } else {
            self.ids.push(court_id.to_string());
            true
        }
    }

    pub fn contains(&self, court_id: &str) -> bool {
        self.ids.iter().any(|id| id == court_id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}
