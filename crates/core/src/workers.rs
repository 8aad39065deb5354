//! Scoped worker helpers shared by the parallel sorters and strategies.
//!
//! Every call builds its own rayon pool with one thread per input and joins it
//! before returning. If the pool cannot be built, the inputs are mapped on the
//! calling thread instead, so a call degrades to one thread and never fails.

use std::ops::Range;
use std::thread;

use rayon::prelude::*;

use crate::config::MAX_THREADS;

/// Resolves a requested thread count: 0 means hardware concurrency, and the
/// result is clamped to `[1, MAX_THREADS]`.
pub fn resolve_thread_count(requested: usize) -> usize {
    let count = if requested == 0 {
        thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    } else {
        requested
    };
    count.clamp(1, MAX_THREADS)
}

/// Splits `0..len` into at most `parts` contiguous, non-empty ranges of
/// near-equal size. The last range absorbs the remainder.
pub fn chunk_ranges(len: usize, parts: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let parts = parts.clamp(1, len);
    let chunk = len / parts;

    (0..parts)
        .map(|i| {
            let start = i * chunk;
            let end = if i == parts - 1 { len } else { start + chunk };
            start..end
        })
        .collect()
}

/// Runs `f(index, input)` for every input on a pool built for this call and
/// returns the results in input order.
pub fn scoped_map<I, R, F>(inputs: &[I], f: F) -> Vec<R>
where
    I: Sync,
    R: Send,
    F: Fn(usize, &I) -> R + Sync,
{
    let f = &f;
    let sequential = || -> Vec<R> {
        inputs
            .iter()
            .enumerate()
            .map(|(i, input)| f(i, input))
            .collect()
    };
    if inputs.len() <= 1 {
        return sequential();
    }

    rayon::ThreadPoolBuilder::new()
        .num_threads(inputs.len())
        .thread_name(|i| format!("packplan-worker-{i}"))
        .build_scoped(rayon::ThreadBuilder::run, |pool| {
            pool.install(|| {
                inputs
                    .par_iter()
                    .enumerate()
                    .map(|(i, input)| f(i, input))
                    .collect()
            })
        })
        .unwrap_or_else(|err| {
            log::warn!("worker pool unavailable ({err}); mapping {} inputs inline", inputs.len());
            sequential()
        })
}
