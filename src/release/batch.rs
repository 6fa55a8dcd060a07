//! Fan-out/fan-in of independent host lookups.

use crate::error::{ReleaseError, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Run `task` for every item concurrently, at most `limit` at a time, and
/// return the outcomes in input order regardless of completion order.
///
/// Individual task errors are returned in their slot for the caller to
/// judge; only a panicked or cancelled task fails the whole batch.
pub async fn fan_out<I, T, F, Fut>(items: Vec<I>, limit: usize, task: F) -> Result<Vec<Result<T>>>
where
    I: Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let len = items.len();
    let mut join_set = JoinSet::new();

    for (idx, item) in items.into_iter().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let lookup = task(item);
        join_set.spawn(async move {
            let outcome = match semaphore.acquire_owned().await {
                Ok(_permit) => lookup.await,
                Err(e) => Err(ReleaseError::Task(e.to_string())),
            };
            (idx, outcome)
        });
    }

    let mut slots: Vec<Option<Result<T>>> = (0..len).map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
        let (idx, outcome) =
            joined.map_err(|e| ReleaseError::Task(format!("lookup task join error: {}", e)))?;
        slots[idx] = Some(outcome);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(idx, slot)| {
            slot.ok_or_else(|| ReleaseError::Task(format!("missing result for lookup {}", idx)))
        })
        .collect()
}
