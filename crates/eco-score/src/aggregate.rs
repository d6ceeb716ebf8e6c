//! Eco-score blending and batch-relative percentile ranking.

/// Weight of each domain in the eco score. Fixed, not configurable.
pub const WATER_WEIGHT: f64 = 0.5;
pub const GREENSPACE_WEIGHT: f64 = 0.5;

/// Blend water quality and greenspace into the eco score, clamped to `[0, 100]`.
pub fn eco_score(water_quality: f64, greenspace: f64) -> f64 {
    (water_quality * WATER_WEIGHT + greenspace * GREENSPACE_WEIGHT).clamp(0.0, 100.0)
}

/// Percentile of every score relative to the batch it belongs to.
///
/// `percentile(s) = round(100 * count(x <= s) / N)`. The result is only
/// meaningful for this exact batch; scoring a different set of tracts
/// changes every value. Output order matches input order.
pub fn batch_percentiles(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<f64> = scores.to_vec();
    sorted.sort_by(f64::total_cmp);

    scores
        .iter()
        .map(|s| percentile_in_sorted(&sorted, *s))
        .collect()
}

/// Percentile of `score` within an ascending-sorted batch.
pub fn percentile_in_sorted(sorted: &[f64], score: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let at_or_below = sorted.partition_point(|x| *x <= score);
    (100.0 * at_or_below as f64 / sorted.len() as f64).round()
}
