//! Tests for calibration and height estimation.

use super::*;
use crate::model::RowId;
use crate::test_harness::FixedMeasurer;
use proptest::prelude::*;

fn row_of_len(len: usize) -> Row {
    Row::new(RowId::new("r").unwrap(), "a".repeat(len), None)
}

/// Cache whose bucket heights equal their lengths, making bucket choice observable.
fn identity_cache(chars_per_line: usize, buckets: usize) -> HeightCache {
    let samples = (1..=buckets)
        .map(|k| CalibrationSample {
            char_length: k * chars_per_line,
            height: k * chars_per_line,
        })
        .collect();
    HeightCache::from_samples(samples, 7.0, chars_per_line).unwrap()
}

mod cache_construction {
    use super::*;

    #[test]
    fn empty_samples_rejected() {
        assert_eq!(
            HeightCache::from_samples(vec![], 7.0, 10),
            Err(CalibrationError::NoSamples)
        );
    }

    #[test]
    fn samples_are_ordered_numerically_not_lexically() {
        // "1000" < "228" lexically; numeric order must win
        let samples = vec![
            CalibrationSample { char_length: 1000, height: 90 },
            CalibrationSample { char_length: 228, height: 30 },
            CalibrationSample { char_length: 114, height: 15 },
        ];
        let cache = HeightCache::from_samples(samples, 7.0, 114).unwrap();
        let lengths: Vec<_> = cache.samples().iter().map(|s| s.char_length).collect();
        assert_eq!(lengths, vec![114, 228, 1000]);
        assert_eq!(cache.estimate_len(500), 90);
    }

    #[test]
    fn tied_lengths_keep_first_reached() {
        let samples = vec![
            CalibrationSample { char_length: 10, height: 15 },
            CalibrationSample { char_length: 10, height: 99 },
            CalibrationSample { char_length: 20, height: 30 },
        ];
        let cache = HeightCache::from_samples(samples, 7.0, 10).unwrap();
        assert_eq!(cache.samples().len(), 2);
        assert_eq!(cache.samples()[0].height, 15);
    }

    #[test]
    fn heights_raised_to_running_maximum() {
        let samples = vec![
            CalibrationSample { char_length: 10, height: 30 },
            CalibrationSample { char_length: 20, height: 15 },
        ];
        let cache = HeightCache::from_samples(samples, 7.0, 10).unwrap();
        assert_eq!(cache.samples()[1].height, 30);
    }
}

mod estimation {
    use super::*;

    #[test]
    fn placeholder_uses_smallest_bucket() {
        let cache = identity_cache(114, 20);
        assert_eq!(cache.estimate(&Row::placeholder()), 114);
        assert_eq!(cache.line_height(), 114);
    }

    #[test]
    fn length_500_maps_to_bucket_570() {
        let cache = identity_cache(114, 20);
        assert_eq!(cache.estimate(&row_of_len(500)), 570);
    }

    #[test]
    fn exact_bucket_length_goes_to_next_bucket() {
        let cache = identity_cache(114, 20);
        assert_eq!(cache.estimate(&row_of_len(114)), 228);
        assert_eq!(cache.estimate(&row_of_len(113)), 114);
    }

    #[test]
    fn longer_than_largest_bucket_clamps_high() {
        let cache = identity_cache(114, 20);
        assert_eq!(cache.estimate(&row_of_len(2280)), 2280);
        assert_eq!(cache.estimate(&row_of_len(50_000)), 2280);
    }

    #[test]
    fn empty_message_uses_first_bucket() {
        let cache = identity_cache(114, 20);
        assert_eq!(cache.estimate(&row_of_len(0)), 114);
    }
}

mod calibration {
    use super::*;

    #[test]
    fn chars_per_line_floors_and_clamps() {
        assert_eq!(chars_per_line(800, 7.0), 114);
        assert_eq!(chars_per_line(3, 7.0), 1);
    }

    #[tokio::test]
    async fn builds_twenty_buckets_from_container_width() {
        let measurer = FixedMeasurer::new(7.0, 15);
        let estimator = HeightEstimator::new("13px monospace", 20);

        let cache = estimator.calibrate(800, &measurer).await.unwrap();

        assert_eq!(cache.chars_per_line(), 114);
        let lengths: Vec<_> = cache.samples().iter().map(|s| s.char_length).collect();
        let expected: Vec<_> = (1..=20).map(|k| k * 114).collect();
        assert_eq!(lengths, expected);
        // 114 chars * 7px = 798px fits on one 15px line
        assert_eq!(cache.line_height(), 15);
        // Length 500 lands in the 570 bucket: ceil(570 * 7 / 800) = 5 lines
        assert_eq!(cache.estimate(&row_of_len(500)), 75);
    }

    #[tokio::test]
    async fn zero_char_width_is_calibration_failure() {
        let measurer = FixedMeasurer::new(0.0, 15);
        let err = HeightEstimator::default()
            .calibrate(800, &measurer)
            .await
            .unwrap_err();
        assert!(matches!(err, CalibrationError::InvalidCharWidth { .. }));
    }

    #[tokio::test]
    async fn measurement_failure_is_surfaced() {
        let measurer = FixedMeasurer::failing(7.0);
        let err = HeightEstimator::default()
            .calibrate(800, &measurer)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CalibrationError::Measurement { char_length: 114, .. }
        ));
    }

    #[tokio::test]
    async fn zero_samples_rejected() {
        let measurer = FixedMeasurer::new(7.0, 15);
        let err = HeightEstimator::new("13px monospace", 0)
            .calibrate(800, &measurer)
            .await
            .unwrap_err();
        assert_eq!(err, CalibrationError::NoSamples);
    }
}

proptest! {
    /// Estimated height never decreases as the message grows.
    #[test]
    fn prop_estimate_is_monotonic(
        a in 0usize..5000,
        b in 0usize..5000,
        per_line in 1usize..200,
        heights in prop::collection::vec(1usize..100, 1..30),
    ) {
        let samples = heights
            .iter()
            .enumerate()
            .map(|(i, &h)| CalibrationSample { char_length: (i + 1) * per_line, height: h })
            .collect();
        let cache = HeightCache::from_samples(samples, 7.0, per_line).unwrap();
        let (short, long) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(cache.estimate(&row_of_len(short)) <= cache.estimate(&row_of_len(long)));
    }

    /// Estimates never exceed the clamp-high ceiling.
    #[test]
    fn prop_estimate_bounded_by_largest_bucket(len in 0usize..100_000) {
        let cache = identity_cache(50, 20);
        prop_assert!(cache.estimate(&row_of_len(len)) <= 1000);
    }
}
