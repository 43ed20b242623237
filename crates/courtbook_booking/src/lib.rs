// --- File: crates/courtbook_booking/src/lib.rs ---
// Declare modules within this crate
pub mod aggregator;
#[cfg(test)]
mod aggregator_test;
pub mod availability;
#[cfg(test)]
mod availability_proptest;
pub mod calendar;
#[cfg(test)]
mod calendar_test;
pub mod client;
pub mod doc;
pub mod error;
pub mod factory;
pub mod handlers;
pub mod lifecycle;
#[cfg(test)]
mod lifecycle_test;
pub mod mock;
pub mod persistence;
pub mod pool;
pub mod range;
pub mod routes;
pub mod selection;
pub mod store;
#[cfg(test)]
mod test_support;
pub mod wire;

pub use availability::{DaySlot, Slot, SlotPolicy, SlotRejection};
pub use calendar::{CalendarSnapshot, CourtCalendar};
pub use client::HttpCourtApi;
pub use error::{ActionError, BookingError, ErrorKind};
pub use lifecycle::{BookingLifecycleController, CreateRequest, Submission};
pub use mock::MockCourtApi;
pub use store::ReconciliationStore;
