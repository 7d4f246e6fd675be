use std::sync::Arc;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::sync::Semaphore;
use tokio::task::JoinError;

use crate::config::MAX_WORKERS_CAP;
use crate::error::DispatchError;

/// Number of CPUs the pool may use.
pub fn available_parallelism() -> usize {
    num_cpus::get().max(1)
}

/// min(tasks, parallelism, cap, 64). Zero tasks means zero workers.
pub fn worker_count(task_count: usize, available: usize, cap: usize) -> usize {
    task_count
        .min(available.max(1))
        .min(cap.clamp(1, MAX_WORKERS_CAP))
}

/// Run `executor_fn` over `items` with at most `max_concurrency` in flight.
///
/// Each item runs on its own tokio task, so a panic stays confined to that
/// item and comes back as a `JoinError`. Results carry the item's index in
/// `items`; their order is completion order.
///
/// # Arguments
///
/// * `items` - Work items, consumed exactly once
/// * `max_concurrency` - Pool width
/// * `executor_fn` - Async function processing a single item
pub async fn execute_bounded<T, R, F, Fut>(
    items: Vec<T>,
    max_concurrency: usize,
    executor_fn: F,
) -> Result<Vec<(usize, Result<R, JoinError>)>, DispatchError>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Clone + Send + 'static,
    Fut: std::future::Future<Output = R> + Send + 'static,
{
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let sem = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let mut futs: FuturesUnordered<_> = FuturesUnordered::new();

    for (idx, item) in items.into_iter().enumerate() {
        let permit = sem
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| DispatchError::PoolClosed)?;
        let executor = executor_fn.clone();

        let handle = tokio::spawn(async move {
            let _permit = permit;
            executor(item).await
        });
        futs.push(async move { (idx, handle.await) });
    }

    let mut results = Vec::with_capacity(futs.len());
    while let Some(res) = futs.next().await {
        results.push(res);
    }

    Ok(results)
}
