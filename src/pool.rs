//! Worker pool for distributing independent work units.
//!
//! Input is split into contiguous chunks, one per worker. Every worker
//! reports its outcome tagged with its index over a channel, and outcomes are
//! merged in ascending worker index regardless of completion order. A worker
//! that panics or never reports turns into an error for the whole run.

use crossbeam_channel::unbounded;
use rayon::ThreadPoolBuilder;
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use tracing::debug;

use crate::error::{Error, Result};

/// Outcome of one worker: a caught panic, or the worker's own result.
type WorkerOutcome<R> = std::thread::Result<Result<Vec<R>>>;

/// Split `items` into at most `workers` contiguous chunks.
///
/// Chunk sizes differ by at most one; the first `len % k` chunks get the
/// extra item. The worker count is clamped to the number of items so no
/// chunk is empty.
pub fn split_into_chunks<T>(items: &[T], workers: usize) -> Vec<&[T]> {
    if items.is_empty() {
        return Vec::new();
    }

    let k = workers.clamp(1, items.len());
    let base = items.len() / k;
    let remainder = items.len() % k;

    let mut chunks = Vec::with_capacity(k);
    let mut offset = 0;
    for i in 0..k {
        let size = base + usize::from(i < remainder);
        chunks.push(&items[offset..offset + size]);
        offset += size;
    }

    chunks
}

/// Run `work` on every chunk and concatenate the outputs in chunk order.
///
/// With one thread (or one chunk) the chunks are processed on the calling
/// thread. Otherwise a rayon pool runs one task per chunk. Shared inputs are
/// only ever borrowed immutably by the workers.
pub fn run_chunks<T, R, F>(chunks: &[&[T]], num_threads: usize, work: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&[T]) -> Result<Vec<R>> + Sync,
{
    if chunks.is_empty() {
        return Ok(Vec::new());
    }

    if num_threads <= 1 || chunks.len() == 1 {
        let mut merged = Vec::new();
        for (idx, &chunk) in chunks.iter().enumerate() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| work(chunk)));
            merged.extend(unwrap_outcome(idx, Some(outcome))?);
        }
        return Ok(merged);
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(num_threads.min(chunks.len()))
        .build()?;
    debug!(workers = chunks.len(), threads = pool.current_num_threads(), "dispatching chunks");

    let (result_tx, result_rx) = unbounded::<(usize, WorkerOutcome<R>)>();
    let work = &work;

    pool.scope(|s| {
        for (idx, &chunk) in chunks.iter().enumerate() {
            let result_tx = result_tx.clone();
            s.spawn(move |_| {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| work(chunk)));
                // The receiver is alive until every worker has finished.
                let _ = result_tx.send((idx, outcome));
            });
        }
    });
    drop(result_tx);

    let mut pending: BTreeMap<usize, WorkerOutcome<R>> = result_rx.into_iter().collect();

    let mut merged = Vec::new();
    for idx in 0..chunks.len() {
        merged.extend(unwrap_outcome(idx, pending.remove(&idx))?);
    }

    Ok(merged)
}

fn unwrap_outcome<R>(worker: usize, outcome: Option<WorkerOutcome<R>>) -> Result<Vec<R>> {
    match outcome {
        Some(Ok(result)) => result,
        Some(Err(payload)) => Err(Error::WorkerPanicked {
            worker,
            message: panic_message(payload.as_ref()),
        }),
        None => Err(Error::MissingWorkerOutput(worker)),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
