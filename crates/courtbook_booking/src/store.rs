// --- File: crates/courtbook_booking/src/store.rs ---
//! Optimistic local state layered over server data.
//!
//! `confirmed_local` holds bookings the backend accepted but a fetch has not
//! returned yet; `cancelled_ids` hides cancelled bookings until the server
//! stops reporting them. Every mutation is written through the [`SnapshotStore`].

use chrono::{DateTime, Utc};
use courtbook_common::Booking;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::persistence::{InMemorySnapshots, SnapshotStore, StoreSnapshot};
use crate::selection::CourtSelection;

pub struct ReconciliationStore {
    confirmed_local: Vec<Booking>,
    cancelled_ids: HashSet<String>,
    persistence: Box<dyn SnapshotStore>,
}

impl Default for ReconciliationStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl ReconciliationStore {
    pub fn in_memory() -> Self {
        Self::with_persistence(Box::new(InMemorySnapshots::default()))
    }

    /// Restores the last snapshot; an unreadable snapshot starts empty.
    pub fn with_persistence(persistence: Box<dyn SnapshotStore>) -> Self {
        let snapshot = match persistence.load() {
            Ok(snapshot) => snapshot.unwrap_or_default(),
            Err(err) => {
                warn!("Ignoring unreadable store snapshot: {}", err);
                StoreSnapshot::default()
            }
        };
        let mut store = Self {
            confirmed_local: Vec::new(),
            cancelled_ids: snapshot.cancelled_ids.into_iter().collect(),
            persistence,
        };
        for booking in snapshot.confirmed_local {
            store.insert_local(booking);
        }
        store
    }

    pub fn confirmed_local(&self) -> &[Booking] {
        &self.confirmed_local
    }

    pub fn is_cancelled(&self, booking_id: &str) -> bool {
        self.cancelled_ids.contains(booking_id)
    }

    /// Records a booking the backend just accepted. A re-push of the same id replaces it.
    pub fn push_confirmed(&mut self, booking: Booking) {
        if self.insert_local(booking) {
            self.persist();
        }
    }

    fn insert_local(&mut self, booking: Booking) -> bool {
        if self.cancelled_ids.contains(&booking.id) {
            return false;
        }
        match self.confirmed_local.iter_mut().find(|b| b.id == booking.id) {
            Some(existing) => *existing = booking,
            None => self.confirmed_local.push(booking),
        }
        true
    }

    /// Drops local copies the server now reports. Returns how many were dropped.
    pub fn reconcile(&mut self, server: &[Booking]) -> usize {
        let server_ids: HashSet<&str> = server.iter().map(|b| b.id.as_str()).collect();
        let before = self.confirmed_local.len();
        self.confirmed_local
            .retain(|booking| !server_ids.contains(booking.id.as_str()));
        let dropped = before - self.confirmed_local.len();
        if dropped > 0 {
            debug!("Reconciled {} local bookings with the server", dropped);
            self.persist();
        }
        dropped
    }

    /// Hides a booking for good and forgets any local copy of it.
    pub fn mark_cancelled(&mut self, booking_id: &str) {
        let inserted = self.cancelled_ids.insert(booking_id.to_string());
        let before = self.confirmed_local.len();
        self.confirmed_local.retain(|booking| booking.id != booking_id);
        if inserted || before != self.confirmed_local.len() {
            self.persist();
        }
    }

    /// Server bookings plus local ones, minus cancellations, each id once.
    /// Server entries win over local copies with the same id.
    pub fn merged_events(&self, server: &[Booking]) -> Vec<Booking> {
        let mut seen = HashSet::new();
        server
            .iter()
            .chain(self.confirmed_local.iter())
            .filter(|booking| !self.cancelled_ids.contains(&booking.id))
            .filter(|booking| seen.insert(booking.id.clone()))
            .cloned()
            .collect()
    }

    /// [`Self::merged_events`] overlapping `[start, end]`. Local bookings of
    /// other days stay out of the result.
    pub fn merged_day(
        &self,
        server: &[Booking],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Booking> {
        self.merged_events(server)
            .into_iter()
            .filter(|booking| booking.overlaps(start, end))
            .collect()
    }

    /// [`Self::merged_day`] restricted to the selected courts.
    pub fn merged_view(
        &self,
        server: &[Booking],
        selection: &CourtSelection,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Booking> {
        self.merged_day(server, start, end)
            .into_iter()
            .filter(|booking| selection.contains(&booking.court_id))
            .collect()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            confirmed_local: self.confirmed_local.clone(),
            cancelled_ids: self.cancelled_ids.iter().cloned().collect(),
        }
    }

    // Runs under the caller's store lock. Snapshots are a few bookings long.
    fn persist(&self) {
        if let Err(err) = self.persistence.save(&self.snapshot()) {
            warn!("Failed to save store snapshot: {}", err);
        }
    }
}
