//! User-supplied implicit right-hand side and mass operator.

use crate::{Float, error::EvalError};

/// Implicit right-hand side of the governing equations `M(t)·y' = f_I(t, y) + …`.
///
/// The engine repeatedly calls [`eval`](ImplicitRhs::eval) with the current
/// stage time `t` and stage state `y` and expects `f` to be filled with the
/// implicit right-hand side values.
///
/// # Example
///
/// ```ignore
/// struct Decay { lambda: f64 }
/// impl ImplicitRhs for Decay {
///     fn eval(&mut self, _t: f64, y: &[f64], f: &mut [f64]) -> Result<(), EvalError> {
///         f[0] = -self.lambda * y[0];
///         Ok(())
///     }
///     fn is_autonomous(&self) -> bool { true }
/// }
/// ```
pub trait ImplicitRhs {
    fn eval(&mut self, t: Float, y: &[Float], f: &mut [Float]) -> Result<(), EvalError>;

    /// Whether `f_I` depends on `t`. Autonomous systems are eligible for the
    /// trivial-predictor fast path that reuses the start-of-step evaluation.
    fn is_autonomous(&self) -> bool {
        false
    }
}

/// Mass-matrix operator for non-identity mass configurations.
///
/// `mult` computes `out = M(t)·v`; `solve` overwrites `b` with `M(t)⁻¹·b`
/// to the given tolerance. The solve is only required for the fixed-point
/// solver category.
pub trait MassOperator {
    fn mult(&mut self, t: Float, v: &[Float], out: &mut [Float]) -> Result<(), EvalError>;

    fn solve(&mut self, t: Float, b: &mut [Float], tol: Float) -> Result<(), EvalError>;
}
