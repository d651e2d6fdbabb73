//! Linear resampling of descriptor dimensions

/// Piecewise-linear interpolation of `(xs, ys)` sampled at `x_new`
///
/// `xs` must be ascending. Queries outside the sampled range clamp to the
/// first/last value (flat extrapolation).
pub fn interp_linear(xs: &[f32], ys: &[f32], x_new: &[f32]) -> Vec<f32> {
    debug_assert_eq!(xs.len(), ys.len());
    if xs.is_empty() {
        return vec![0.0; x_new.len()];
    }
    x_new
        .iter()
        .map(|&x| {
            if x <= xs[0] {
                return ys[0];
            }
            if x >= xs[xs.len() - 1] {
                return ys[ys.len() - 1];
            }
            let hi = xs.partition_point(|&v| v < x);
            let lo = hi - 1;
            let span = xs[hi] - xs[lo];
            if span == 0.0 {
                return ys[lo];
            }
            let t = (x - xs[lo]) / span;
            ys[lo] + t * (ys[hi] - ys[lo])
        })
        .collect()
}
