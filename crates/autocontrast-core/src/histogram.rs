use crate::consts::BINS;

/// Occurrence counts for each possible 8-bit sample value.
pub type Histogram = [u32; BINS];

/// Count every sample at `offset, offset + stride, offset + 2*stride, ...`.
///
/// Grayscale scans use `(stride, offset) = (1, 0)`; interleaved color
/// isolates one channel with stride 3 and offset 0, 1 or 2. Pure and
/// deterministic regardless of execution mode.
pub fn build(buffer: &[u8], stride: usize, offset: usize) -> Histogram {
    let mut counts = [0u32; BINS];
    for &sample in buffer.iter().skip(offset).step_by(stride) {
        counts[sample as usize] += 1;
    }
    counts
}
