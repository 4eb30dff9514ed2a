use crate::error::{ContrastError, Result};
use crate::threshold::ThresholdPair;

/// What the remap phase does for a given threshold pair, decided once
/// before any per-pixel work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StretchPlan {
    /// Degenerate single-valued or already full-range histogram: leave the
    /// buffer untouched.
    Identity,
    /// Clip to `[min, max]` and stretch linearly onto `[0, 255]`.
    Linear { min: u8, max: u8 },
}

impl StretchPlan {
    /// Evaluate the remap policy for a threshold pair.
    ///
    /// A min that reached 255 or a max that reached 0 means the quota pushed
    /// past one extreme of the distribution; correction is impossible.
    pub fn for_thresholds(pair: ThresholdPair) -> Result<Self> {
        if pair.min == pair.max {
            return Ok(StretchPlan::Identity);
        }
        if pair.min == 255 || pair.max == 0 {
            return Err(ContrastError::CorrectionImpossible {
                min: pair.min,
                max: pair.max,
            });
        }
        if pair.min == 0 && pair.max == 255 {
            return Ok(StretchPlan::Identity);
        }
        Ok(StretchPlan::Linear {
            min: pair.min,
            max: pair.max,
        })
    }

    /// Remap a slice of samples in place. Each output byte depends only on
    /// its own input byte, so this is safe on any sub-slice and the parallel
    /// executor can hand out disjoint chunks.
    pub fn apply(&self, samples: &mut [u8]) {
        let StretchPlan::Linear { min, max } = *self else {
            return;
        };
        let delta = u32::from(max) - u32::from(min);
        for sample in samples {
            *sample = stretch_sample(*sample, min, max, delta);
        }
    }
}

/// Clip-and-stretch one sample with truncating integer division, exactly
/// `(v - min) * 255 / delta` for values strictly inside the retained range.
#[inline]
fn stretch_sample(v: u8, min: u8, max: u8, delta: u32) -> u8 {
    if v <= min {
        0
    } else if v >= max {
        255
    } else {
        ((u32::from(v) - u32::from(min)) * 255 / delta) as u8
    }
}
