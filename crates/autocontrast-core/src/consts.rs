/// Number of distinct 8-bit sample values, and therefore histogram bins.
pub const BINS: usize = 256;

/// Interleaved channels per pixel in a P6 (color) container.
pub const COLOR_CHANNEL_COUNT: usize = 3;
