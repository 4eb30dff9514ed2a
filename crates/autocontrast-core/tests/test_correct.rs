use std::num::NonZeroUsize;

use autocontrast_core::correct::{correct, Workers};
use autocontrast_core::error::ContrastError;
use autocontrast_core::pnm::{Picture, PnmFormat};
use autocontrast_core::threshold::ThresholdPair;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn gray(width: u32, height: u32, data: Vec<u8>) -> Picture {
    assert_eq!(data.len(), (width * height) as usize);
    Picture {
        format: PnmFormat::Gray,
        width,
        height,
        max_value: 255,
        data,
    }
}

fn rgb(width: u32, height: u32, data: Vec<u8>) -> Picture {
    assert_eq!(data.len(), (width * height * 3) as usize);
    Picture {
        format: PnmFormat::Rgb,
        width,
        height,
        max_value: 255,
        data,
    }
}

fn fixed(n: usize) -> Workers {
    Workers::Fixed(NonZeroUsize::new(n).unwrap())
}

fn noise_bytes(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            // Compressed range so a stretch actually happens.
            64 + ((state >> 24) as u8) / 2
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_full_range_zero_rate_is_noop() {
    // 2x2 grayscale already spanning [0, 255]; rate 0 keeps everything.
    let mut pic = gray(2, 2, vec![0, 64, 191, 255]);
    let report = correct(&mut pic, 0.0, Workers::Sequential).unwrap();
    assert_eq!(report.thresholds, ThresholdPair { min: 0, max: 255 });
    assert_eq!(pic.data, vec![0, 64, 191, 255]);
}

#[test]
fn test_clipping_stretch_exact_values() {
    // 1x10, rate 0.1 -> quota 1. The two zeros overshoot the quota at
    // value 0 (min stays 0); the single 255 is consumed and 250 becomes
    // the max. Stretch: v * 255 / 250, truncated.
    let samples = vec![0, 0, 10, 20, 30, 40, 50, 60, 250, 255];
    let mut pic = gray(10, 1, samples);
    let report = correct(&mut pic, 0.1, Workers::Sequential).unwrap();
    assert_eq!(report.thresholds, ThresholdPair { min: 0, max: 250 });
    assert_eq!(pic.data, vec![0, 0, 10, 20, 30, 40, 51, 61, 255, 255]);
}

#[test]
fn test_degenerate_single_value_succeeds_unchanged() {
    let mut pic = gray(4, 4, vec![128; 16]);
    let report = correct(&mut pic, 0.2, Workers::Sequential).unwrap();
    assert_eq!(report.thresholds, ThresholdPair { min: 128, max: 128 });
    assert_eq!(pic.data, vec![128; 16]);
}

#[test]
fn test_color_uses_one_global_pair_for_all_channels() {
    // Two RGB pixels. Per-channel pairs: R (10, 200), G (50, 100),
    // B (80, 90); merged global pair (10, 200) applied to every byte.
    let mut pic = rgb(2, 1, vec![10, 50, 80, 200, 100, 90]);
    let report = correct(&mut pic, 0.0, Workers::Sequential).unwrap();
    assert_eq!(report.thresholds, ThresholdPair { min: 10, max: 200 });
    // (v - 10) * 255 / 190 truncated, with clipping at the extremes.
    assert_eq!(pic.data, vec![0, 53, 93, 255, 120, 107]);
}

#[test]
fn test_color_quota_is_per_channel() {
    // 4 pixels, rate 0.25 -> quota 1 per channel. Red has a lone outlier
    // at 0 that the quota discards; the next red value 100 becomes a
    // candidate min, but green reaches down to 40.
    let mut pic = rgb(
        4,
        1,
        vec![0, 40, 120, 100, 50, 130, 110, 60, 140, 120, 70, 150],
    );
    let report = correct(&mut pic, 0.25, Workers::Sequential).unwrap();
    assert_eq!(report.thresholds.min, 50);
    assert_eq!(report.thresholds.max, 140);
}

// ---------------------------------------------------------------------------
// Determinism and no-op laws
// ---------------------------------------------------------------------------

#[test]
fn test_parallel_matches_sequential_gray() {
    let source = gray(101, 37, noise_bytes(101 * 37, 42));

    let mut reference = source.clone();
    correct(&mut reference, 0.05, Workers::Sequential).unwrap();

    for n in [1, 2, 3, 4, 8] {
        let mut pic = source.clone();
        let report = correct(&mut pic, 0.05, fixed(n)).unwrap();
        assert_eq!(report.threads, n);
        assert_eq!(pic.data, reference.data, "{n} workers");
    }
}

#[test]
fn test_parallel_matches_sequential_color() {
    let source = rgb(97, 23, noise_bytes(97 * 23 * 3, 9));

    let mut reference = source.clone();
    correct(&mut reference, 0.02, Workers::Sequential).unwrap();

    for n in [1, 2, 5, 8] {
        let mut pic = source.clone();
        correct(&mut pic, 0.02, fixed(n)).unwrap();
        assert_eq!(pic.data, reference.data, "{n} workers");
    }
}

#[test]
fn test_auto_matches_sequential() {
    let source = gray(64, 64, noise_bytes(64 * 64, 1));

    let mut reference = source.clone();
    correct(&mut reference, 0.1, Workers::Sequential).unwrap();

    let mut pic = source;
    let report = correct(&mut pic, 0.1, Workers::Auto).unwrap();
    assert!(report.threads >= 1);
    assert_eq!(pic.data, reference.data);
}

#[test]
fn test_idempotent_on_full_range_output() {
    let mut pic = gray(50, 2, noise_bytes(100, 3));
    correct(&mut pic, 0.1, Workers::Sequential).unwrap();
    let once = pic.data.clone();

    // The corrected image spans the full range; rate 0 must be a no-op.
    correct(&mut pic, 0.0, Workers::Sequential).unwrap();
    assert_eq!(pic.data, once);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_rejects_out_of_range_ignore_rate() {
    let mut pic = gray(2, 2, vec![1, 2, 3, 4]);
    for rate in [-0.01, 0.5, 0.75, 1.0] {
        let err = correct(&mut pic, rate, Workers::Sequential).unwrap_err();
        assert!(matches!(err, ContrastError::InvalidIgnoreRate(_)), "{rate}");
    }
}
