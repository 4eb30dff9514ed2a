use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU32, Ordering};

use rayon::prelude::*;
use rayon::ThreadPool;

use crate::consts::{BINS, COLOR_CHANNEL_COUNT};
use crate::error::{ContrastError, Result};
use crate::histogram::{self, Histogram};
use crate::remap::StretchPlan;

/// Build a fixed-size worker pool for one correction call.
pub fn build_pool(threads: NonZeroUsize) -> Result<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.get())
        .build()
        .map_err(|e| ContrastError::ThreadPool(e.to_string()))
}

/// Shared histogram mutated only through per-bin atomic adds. The adds
/// commute, so the merged counts are identical for any worker interleaving.
struct SharedHistogram {
    bins: [AtomicU32; BINS],
}

impl SharedHistogram {
    fn new() -> Self {
        Self {
            bins: std::array::from_fn(|_| AtomicU32::new(0)),
        }
    }

    /// One relaxed add per bin: 256 synchronized operations per worker,
    /// independent of slice size.
    fn merge(&self, local: &Histogram) {
        for (shared, &count) in self.bins.iter().zip(local) {
            shared.fetch_add(count, Ordering::Relaxed);
        }
    }

    fn snapshot(&self) -> Histogram {
        std::array::from_fn(|i| self.bins[i].load(Ordering::Relaxed))
    }
}

/// Contiguous near-equal chunk length for a static partition into at most
/// `workers` slices.
fn slice_len(total: usize, workers: usize) -> usize {
    total.div_ceil(workers.max(1)).max(1)
}

/// Histogram over the whole buffer: each worker scans its contiguous slice
/// into a private histogram, then merges it into the shared one.
pub fn gray_histogram(pool: &ThreadPool, buffer: &[u8]) -> Histogram {
    let shared = SharedHistogram::new();
    let chunk = slice_len(buffer.len(), pool.current_num_threads());
    pool.install(|| {
        buffer.par_chunks(chunk).for_each(|slice| {
            shared.merge(&histogram::build(slice, 1, 0));
        });
    });
    shared.snapshot()
}

/// One histogram per interleaved channel, built in a single pass over the
/// buffer. Chunks are aligned to pixel boundaries so channel offsets stay
/// consistent across slices.
pub fn rgb_histograms(pool: &ThreadPool, buffer: &[u8]) -> [Histogram; COLOR_CHANNEL_COUNT] {
    let shared: [SharedHistogram; COLOR_CHANNEL_COUNT] =
        std::array::from_fn(|_| SharedHistogram::new());
    let pixels = buffer.len() / COLOR_CHANNEL_COUNT;
    let chunk = slice_len(pixels, pool.current_num_threads()) * COLOR_CHANNEL_COUNT;
    pool.install(|| {
        buffer.par_chunks(chunk).for_each(|slice| {
            for channel in 0..COLOR_CHANNEL_COUNT {
                shared[channel].merge(&histogram::build(slice, COLOR_CHANNEL_COUNT, channel));
            }
        });
    });
    std::array::from_fn(|i| shared[i].snapshot())
}

/// Remap the buffer on the pool. Disjoint static slices, no shared mutable
/// state: each byte depends only on its own value and the plan's thresholds.
pub fn remap(pool: &ThreadPool, buffer: &mut [u8], plan: &StretchPlan) {
    let chunk = slice_len(buffer.len(), pool.current_num_threads());
    pool.install(|| {
        buffer
            .par_chunks_mut(chunk)
            .for_each(|slice| plan.apply(slice));
    });
}
