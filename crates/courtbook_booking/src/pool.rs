// --- File: crates/courtbook_booking/src/pool.rs ---
use futures::future::join_all;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Default bound on simultaneous per-court requests.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 6;

/// Runs `task` over every item with at most `limit` futures in flight.
///
/// Workers pull the next index from a shared counter. Each output lands at its
/// item's index, so the result order matches `items` regardless of completion order.
pub async fn run_bounded<I, T, F, Fut>(items: &[I], limit: usize, task: F) -> Vec<T>
where
    F: Fn(&I) -> Fut,
    Fut: Future<Output = T>,
{
    if items.is_empty() {
        return Vec::new();
    }
    let workers = limit.clamp(1, items.len());
    let next = AtomicUsize::new(0);
    let outputs: Mutex<Vec<Option<T>>> = Mutex::new(items.iter().map(|_| None).collect());

    let next = &next;
    let outputs_ref = &outputs;
    let task = &task;
    join_all((0..workers).map(move |_| async move {
        loop {
            let index = next.fetch_add(1, Ordering::Relaxed);
            let Some(item) = items.get(index) else {
                break;
            };
            let output = task(item).await;
            outputs_ref.lock().unwrap_or_else(PoisonError::into_inner)[index] = Some(output);
        }
    }))
    .await;

    outputs
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
        .into_iter()
        .flatten()
        .collect()
}
