//! Weighted root-mean-square norm and error weights.

use crate::{Float, tolerance::Tolerance};

/// WRMS norm: `sqrt( (1/n) * sum (v[i] * w[i])^2 )`.
///
/// The weights make convergence tests scale-independent; they are usually the
/// reciprocal error weights from [`error_weights`].
pub fn wrms_norm(v: &[Float], w: &[Float]) -> Float {
    debug_assert_eq!(v.len(), w.len());
    let mut sum = 0.0;
    for i in 0..v.len() {
        let s = v[i] * w[i];
        sum += s * s;
    }
    (sum / v.len() as Float).sqrt()
}

/// Fill `ewt` with the reciprocal error weights `1 / (atol_i + rtol_i * |y_i|)`.
pub fn error_weights(y: &[Float], rtol: &Tolerance, atol: &Tolerance, ewt: &mut [Float]) {
    debug_assert_eq!(y.len(), ewt.len());
    for i in 0..y.len() {
        ewt[i] = 1.0 / (atol[i] + rtol[i] * y[i].abs());
    }
}
