//! Empirical quantile estimators.
//!
//! Two conventions are used and they are deliberately kept apart:
//!
//! | Routine | Used for | Rule |
//! |---------|----------|------|
//! | [`interpolated_percentile`] | 5th/95th percentile path bands | linear interpolation between order statistics |
//! | [`nearest_rank_quantile`] | 95% Value-at-Risk price | element at index `floor(q × n)` |
//!
//! On the same sample they generally return different values; swapping one
//! for the other changes published numbers.
//!
//! Both routines take an ascending-sorted slice; [`sort_ascending`] sorts
//! with a total order so NaN cannot poison the comparison.

/// Sorts values ascending under `f64::total_cmp`.
#[inline]
pub fn sort_ascending(values: &mut [f64]) {
    values.sort_unstable_by(f64::total_cmp);
}

/// Percentile of a sorted sample with linear interpolation.
///
/// For `n` sorted values and `percentile` in `[0, 100]`, the fractional rank
/// is `h = percentile / 100 × (n - 1)`; the result is
/// `x[⌊h⌋] + (h - ⌊h⌋) × (x[⌊h⌋ + 1] - x[⌊h⌋])`.
///
/// Returns `NaN` for an empty sample. `percentile` is clamped to `[0, 100]`.
///
/// # Examples
///
/// ```rust
/// use risk_engine::quantile::interpolated_percentile;
///
/// let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(interpolated_percentile(&sorted, 50.0), 3.0);
/// assert!((interpolated_percentile(&sorted, 5.0) - 1.2).abs() < 1e-12);
/// ```
pub fn interpolated_percentile(sorted: &[f64], percentile: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }

    let rank = percentile.clamp(0.0, 100.0) / 100.0 * (n - 1) as f64;
    let lo = rank.floor() as usize;
    if lo + 1 >= n {
        return sorted[n - 1];
    }

    let weight = rank - lo as f64;
    sorted[lo] + weight * (sorted[lo + 1] - sorted[lo])
}

/// Nearest-rank quantile of a sorted sample: the element at `⌊q × n⌋`.
///
/// Not interpolated. `q` is a fraction (0.05 for the 5% tail) and is clamped
/// to `[0, 1]`; the index is capped at `n - 1`. Returns `NaN` for an empty
/// sample.
///
/// # Examples
///
/// ```rust
/// use risk_engine::quantile::nearest_rank_quantile;
///
/// let sorted: Vec<f64> = (1..=100).map(f64::from).collect();
/// // floor(0.05 × 100) = 5 → sixth smallest
/// assert_eq!(nearest_rank_quantile(&sorted, 0.05), 6.0);
/// ```
pub fn nearest_rank_quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }

    let idx = (q.clamp(0.0, 1.0) * n as f64).floor() as usize;
    sorted[idx.min(n - 1)]
}
