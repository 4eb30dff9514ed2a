use std::num::NonZeroUsize;
use std::thread;
use std::time::{Duration, Instant};

use rayon::ThreadPool;
use tracing::{debug, info};

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{ContrastError, Result};
use crate::histogram::{self, Histogram};
use crate::parallel;
use crate::pnm::{Picture, PnmFormat};
use crate::remap::StretchPlan;
use crate::threshold::{self, ThresholdPair};

/// Execution mode for one correction call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Workers {
    /// Plain single-threaded loops, no pool at all.
    Sequential,
    /// One worker per hardware thread.
    Auto,
    /// Exactly this many workers.
    Fixed(NonZeroUsize),
}

impl Workers {
    /// Resolve to a concrete worker count; `None` selects the sequential path.
    fn resolve(self) -> Option<NonZeroUsize> {
        match self {
            Workers::Sequential => None,
            Workers::Auto => Some(
                thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
            ),
            Workers::Fixed(n) => Some(n),
        }
    }
}

/// Outcome of one correction call.
#[derive(Clone, Copy, Debug)]
pub struct Report {
    /// Worker count the call actually ran with (1 on the sequential path).
    pub threads: usize,
    /// The global threshold pair the remap used.
    pub thresholds: ThresholdPair,
    /// Wall-clock duration of the correction stage only (no I/O).
    pub elapsed: Duration,
}

/// Stretch the picture's contrast in place.
///
/// Discards `ignore_rate` of the samples at each extreme of the intensity
/// distribution (per channel for color input), then linearly remaps the
/// retained `[min, max]` range onto `[0, 255]`. For color input the three
/// per-channel threshold pairs are merged into one global pair that is
/// applied uniformly to every interleaved byte.
pub fn correct(pic: &mut Picture, ignore_rate: f32, workers: Workers) -> Result<Report> {
    if !(0.0..0.5).contains(&ignore_rate) {
        return Err(ContrastError::InvalidIgnoreRate(ignore_rate));
    }

    // Pool construction happens outside the timed stage.
    let pool = match workers.resolve() {
        None => None,
        Some(n) => Some(parallel::build_pool(n)?),
    };

    let started = Instant::now();
    let thresholds = match &pool {
        None => run(pic, ignore_rate, &SequentialExec)?,
        Some(pool) => run(pic, ignore_rate, &PooledExec { pool })?,
    };
    let elapsed = started.elapsed();

    let threads = pool.as_ref().map_or(1, ThreadPool::current_num_threads);
    info!(
        threads,
        min = thresholds.min,
        max = thresholds.max,
        elapsed_ms = elapsed.as_secs_f64() * 1e3,
        "contrast correction done"
    );

    Ok(Report {
        threads,
        thresholds,
        elapsed,
    })
}

/// The two fork-join phases of one correction call. Both implementations
/// must produce byte-identical results; the executor only decides how the
/// index range is partitioned.
trait Executor {
    fn gray_histogram(&self, buffer: &[u8]) -> Histogram;
    fn rgb_histograms(&self, buffer: &[u8]) -> [Histogram; COLOR_CHANNEL_COUNT];
    fn remap(&self, buffer: &mut [u8], plan: &StretchPlan);
}

struct SequentialExec;

impl Executor for SequentialExec {
    fn gray_histogram(&self, buffer: &[u8]) -> Histogram {
        histogram::build(buffer, 1, 0)
    }

    fn rgb_histograms(&self, buffer: &[u8]) -> [Histogram; COLOR_CHANNEL_COUNT] {
        std::array::from_fn(|channel| histogram::build(buffer, COLOR_CHANNEL_COUNT, channel))
    }

    fn remap(&self, buffer: &mut [u8], plan: &StretchPlan) {
        plan.apply(buffer);
    }
}

struct PooledExec<'a> {
    pool: &'a ThreadPool,
}

impl Executor for PooledExec<'_> {
    fn gray_histogram(&self, buffer: &[u8]) -> Histogram {
        parallel::gray_histogram(self.pool, buffer)
    }

    fn rgb_histograms(&self, buffer: &[u8]) -> [Histogram; COLOR_CHANNEL_COUNT] {
        parallel::rgb_histograms(self.pool, buffer)
    }

    fn remap(&self, buffer: &mut [u8], plan: &StretchPlan) {
        parallel::remap(self.pool, buffer, plan);
    }
}

fn run(pic: &mut Picture, ignore_rate: f32, exec: &dyn Executor) -> Result<ThresholdPair> {
    let pair = match pic.format {
        PnmFormat::Gray => {
            let quota = threshold::ignored_quota(pic.data.len(), ignore_rate);
            let hist = exec.gray_histogram(&pic.data);
            ThresholdPair::from_histogram(&hist, quota)
        }
        PnmFormat::Rgb => {
            // The quota is per channel: width * height samples each.
            let quota = threshold::ignored_quota(pic.sample_count(), ignore_rate);
            let hists = exec.rgb_histograms(&pic.data);
            let pairs: Vec<ThresholdPair> = hists
                .iter()
                .map(|h| ThresholdPair::from_histogram(h, quota))
                .collect();
            ThresholdPair::merge(&pairs)
        }
    };
    debug!(min = pair.min, max = pair.max, "thresholds selected");

    let plan = StretchPlan::for_thresholds(pair)?;
    exec.remap(&mut pic.data, &plan);
    Ok(pair)
}
