//! Percentage → color band and visual fill.
//!
//! The fill is a fraction of the full visual scale split in three equal
//! segments:
//!
//! ```text
//! pct   0 ──── 50 ──── 100 ──── 150+
//! fill  0 ──── ⅓ ────── ⅔ ────── 1
//! band    low     mid      high
//! ```
//!
//! Over-achievement past 100% stays `high` and never fills past the scale.

use psync_core::enums::ProgressBand;
use serde::{Deserialize, Serialize};

const ONE_THIRD: f64 = 1.0 / 3.0;
const TWO_THIRDS: f64 = 2.0 / 3.0;
const FULL_SCALE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub band: ProgressBand,
    pub visual_fill: f64,
}

/// Classify a goal percentage. Non-finite and negative inputs count as 0.
#[must_use]
pub fn classify(percentage: f64) -> Classification {
    let pct = if percentage.is_finite() && percentage > 0.0 {
        percentage
    } else {
        0.0
    };

    if pct <= 50.0 {
        Classification {
            band: ProgressBand::Low,
            visual_fill: (pct / 50.0) * ONE_THIRD,
        }
    } else if pct < 100.0 {
        Classification {
            band: ProgressBand::Mid,
            visual_fill: ONE_THIRD + ((pct - 50.0) / 50.0) * ONE_THIRD,
        }
    } else {
        let over = (pct.min(150.0) - 100.0) / 50.0;
        Classification {
            band: ProgressBand::High,
            visual_fill: (TWO_THIRDS + over * ONE_THIRD).min(FULL_SCALE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, ProgressBand::Low)]
    #[case(12.5, ProgressBand::Low)]
    #[case(50.0, ProgressBand::Low)]
    #[case(50.01, ProgressBand::Mid)]
    #[case(99.99, ProgressBand::Mid)]
    #[case(100.0, ProgressBand::High)]
    #[case(150.0, ProgressBand::High)]
    #[case(420.0, ProgressBand::High)]
    fn bands(#[case] pct: f64, #[case] band: ProgressBand) {
        assert_eq!(classify(pct).band, band);
    }

    #[test]
    fn segment_boundaries_are_exact() {
        assert_eq!(classify(50.0).visual_fill, ONE_THIRD);
        assert_eq!(classify(100.0).visual_fill, TWO_THIRDS);
        assert!((classify(150.0).visual_fill - FULL_SCALE).abs() < 1e-12);
        assert_eq!(classify(200.0).visual_fill, classify(150.0).visual_fill);
        assert!(classify(1_000.0).visual_fill <= FULL_SCALE);
    }

    #[test]
    fn low_segment_is_linear() {
        let step = classify(10.0).visual_fill;
        for pct in [20.0, 30.0, 40.0, 50.0] {
            let expected = step * pct / 10.0;
            assert!((classify(pct).visual_fill - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn mid_segment_midpoint() {
        assert!((classify(75.0).visual_fill - 0.5).abs() < 1e-12);
    }

    #[rstest]
    #[case(-5.0)]
    #[case(f64::NAN)]
    #[case(f64::NEG_INFINITY)]
    #[case(f64::INFINITY)]
    fn garbage_counts_as_zero(#[case] pct: f64) {
        let classification = classify(pct);
        assert_eq!(classification.band, ProgressBand::Low);
        assert_eq!(classification.visual_fill, 0.0);
    }

    #[test]
    fn fill_is_monotonic() {
        let mut previous = 0.0;
        for step in 0..=400 {
            let fill = classify(f64::from(step) * 0.5).visual_fill;
            assert!(fill >= previous, "fill decreased at {}", f64::from(step) * 0.5);
            previous = fill;
        }
    }
}
