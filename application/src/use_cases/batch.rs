//! Concurrency batcher.
//!
//! Runs one task per item in consecutive chunks of at most `max_concurrency`
//! items. Before each chunk the control signal is consulted (after the
//! inter-chunk delay, which is skipped for the first chunk); the chunk's
//! tasks then run concurrently. Results keep the original item order.
//!
//! Tasks are expected to absorb their own failures and return a
//! placeholder, so one failing item never cancels its siblings.

use crate::control::{ControlSignal, Stopped};
use futures::future::join_all;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

pub async fn run_batched<T, R, F, Fut>(
    items: Vec<T>,
    max_concurrency: usize,
    delay: Duration,
    control: &ControlSignal,
    task: F,
) -> Result<Vec<R>, Stopped>
where
    F: Fn(usize, T) -> Fut,
    Fut: Future<Output = R>,
{
    let chunk_size = max_concurrency.max(1);
    let total = items.len();
    let mut results = Vec::with_capacity(total);
    let mut pending = items.into_iter().enumerate().peekable();
    let mut chunk_index = 0;

    while pending.peek().is_some() {
        if chunk_index > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        control.checkpoint().await?;

        let chunk: Vec<(usize, T)> = pending.by_ref().take(chunk_size).collect();
        debug!(chunk = chunk_index, size = chunk.len(), total, "Running batch chunk");
        let outputs = join_all(chunk.into_iter().map(|(i, item)| task(i, item))).await;
        results.extend(outputs);
        chunk_index += 1;
    }

    Ok(results)
}
