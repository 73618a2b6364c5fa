//! Seam between the engine and the external nonlinear-solver object.

use crate::{
    Float,
    context::SolverCategory,
    convergence::ConvTest,
    error::{EvalError, SolveError},
};

/// Stage system as presented to a nonlinear iteration driver.
///
/// The engine installs the system function and the convergence test behind
/// this trait; a driver alternates [`eval`](StageProblem::eval) and
/// [`check`](StageProblem::check) calls (with [`setup`](StageProblem::setup)
/// and [`solve`](StageProblem::solve) in between for the root-finding
/// category) until the check verdict or its own iteration budget stops it.
pub trait StageProblem {
    /// Problem dimension.
    fn dim(&self) -> usize;

    /// Category the system was formulated for.
    fn category(&self) -> SolverCategory;

    /// Evaluate the residual (root-finding) or the fixed-point map
    /// (fixed-point) at the trial correction `zcor` into `out`.
    ///
    /// Failures arrive already classified: the subtype names the collaborator
    /// (RHS or mass operator) that failed, so drivers propagate with `?`.
    fn eval(&mut self, zcor: &[Float], out: &mut [Float], iter: usize) -> Result<(), SolveError>;

    /// Refresh the Jacobian/preconditioner data at the last evaluated state.
    /// `bad_jacobian` hints that the previous data caused a failure.
    fn setup(&mut self, bad_jacobian: bool) -> Result<(), EvalError>;

    /// Solve the linearized correction equation in place.
    fn solve(&mut self, b: &mut [Float], iter: usize) -> Result<(), EvalError>;

    /// Convergence check on the latest correction update `del`.
    fn check(&mut self, iter: usize, del: &[Float]) -> ConvTest;

    /// Whether the Jacobian data matches the current stage state.
    fn jac_current(&self) -> bool;
}

/// Generic nonlinear iteration driver.
///
/// The engine hands the driver a freshly formulated [`StageProblem`] and the
/// zero-initialized correction vector; the driver iterates until convergence,
/// divergence, or budget exhaustion. `call_setup` is the engine's
/// recommendation to refresh the Jacobian before iterating; the driver
/// decides whether and when to act on it.
pub trait NonlinearSolver {
    fn category(&self) -> SolverCategory;

    fn solve<S: StageProblem>(
        &mut self,
        sys: &mut S,
        zcor: &mut [Float],
        call_setup: bool,
    ) -> Result<(), SolveError>;

    /// Iterations taken by the most recent solve.
    fn iters(&self) -> usize;
}
