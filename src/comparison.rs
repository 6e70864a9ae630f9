//! Segment comparison builder.
//!
//! Derives the three reference income figures purely from the client's own
//! income by fixed ratios. These are placeholders standing in for real
//! population aggregates and must not be presented as independently verified;
//! changing them to computed statistics needs product sign-off.

use crate::models::{Segment, SegmentComparison};

/// Ratio standing in for the segment average.
pub const SEGMENT_AVERAGE_RATIO: f64 = 0.8;
/// Ratio standing in for the segment top.
pub const SEGMENT_TOP_RATIO: f64 = 1.5;
/// Fixed percentile-rank label.
pub const PERCENTILE_LABEL: &str = "Топ 15%";

/// Positions a client within their segment.
///
/// The segment label is display-only; it does not alter the multipliers.
pub fn compare_to_segment(income: f64, _segment: Segment) -> SegmentComparison {
    SegmentComparison {
        client_income: income,
        segment_average: income * SEGMENT_AVERAGE_RATIO,
        segment_top: income * SEGMENT_TOP_RATIO,
        percentile_label: PERCENTILE_LABEL.to_string(),
    }
}
