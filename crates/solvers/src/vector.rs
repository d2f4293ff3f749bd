//! Small dense-vector helpers for stage arithmetic.

/// Returns `base + h * Σ weight * slope` over the given terms.
pub(crate) fn combine<S: AsRef<[f64]>>(base: &[f64], h: f64, terms: &[(f64, S)]) -> Vec<f64> {
    let mut out = base.to_vec();
    for (weight, slope) in terms {
        let (weight, slope) = (*weight, slope.as_ref());
        debug_assert_eq!(slope.len(), out.len(), "dimension mismatch");
        for (x, d) in out.iter_mut().zip(slope) {
            *x += h * weight * d;
        }
    }
    out
}

/// Euclidean norm of `a - b`.
pub(crate) fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
