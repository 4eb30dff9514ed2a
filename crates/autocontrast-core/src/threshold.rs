use crate::histogram::Histogram;

/// Retained intensity bounds after discarding the ignored quota at each
/// extreme of the distribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThresholdPair {
    pub min: u8,
    pub max: u8,
}

impl ThresholdPair {
    pub fn from_histogram(hist: &Histogram, quota: u64) -> Self {
        Self {
            min: find_min(hist, quota),
            max: find_max(hist, quota),
        }
    }

    /// Collapse per-channel pairs into one global pair: the lowest of the
    /// minima and the highest of the maxima. The global pair is then applied
    /// uniformly to every interleaved byte, not per channel.
    pub fn merge(pairs: &[ThresholdPair]) -> Self {
        Self {
            min: pairs.iter().map(|p| p.min).min().unwrap_or(0),
            max: pairs.iter().map(|p| p.max).max().unwrap_or(255),
        }
    }
}

/// Number of samples discarded from each end of the distribution:
/// `floor(samples * ignore_rate)`.
pub fn ignored_quota(samples: usize, ignore_rate: f32) -> u64 {
    (samples as f64 * f64::from(ignore_rate)).floor() as u64
}

/// Walk bins upward, spending the quota against each count; the first bin
/// whose count overshoots the remaining quota is the lowest retained value.
/// 255 if the quota swallows the whole histogram.
pub fn find_min(hist: &Histogram, quota: u64) -> u8 {
    let mut remaining = quota;
    for (value, &count) in hist.iter().enumerate() {
        if u64::from(count) > remaining {
            return value as u8;
        }
        remaining -= u64::from(count);
    }
    255
}

/// Descending mirror of [`find_min`]; 0 if the quota swallows the whole
/// histogram.
pub fn find_max(hist: &Histogram, quota: u64) -> u8 {
    let mut remaining = quota;
    for (value, &count) in hist.iter().enumerate().rev() {
        if u64::from(count) > remaining {
            return value as u8;
        }
        remaining -= u64::from(count);
    }
    0
}
