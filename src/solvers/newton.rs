//! Simplified-Newton iteration driver.

use crate::{
    Float,
    context::SolverCategory,
    convergence::ConvTest,
    error::{EvalError, FatalReason, RecoverableReason, SolveError},
    nonlinear::{NonlinearSolver, StageProblem},
};

/// Modified Newton iteration for the root-finding category.
///
/// Each iteration evaluates the residual, solves the linearized correction
/// equation `A delta = -r`, applies the update, and asks the system's
/// convergence test for a verdict. If the iteration fails with a Jacobian
/// that was not current, one retry is made from the zero correction with a
/// forced, hinted-bad setup.
pub struct NewtonSolver {
    max_iters: usize,
    niters: usize,
}

impl NewtonSolver {
    pub const DEFAULT_MAX_ITERS: usize = 3;

    pub fn new(max_iters: usize) -> Self {
        Self {
            max_iters,
            niters: 0,
        }
    }
}

impl Default for NewtonSolver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ITERS)
    }
}

impl NonlinearSolver for NewtonSolver {
    fn category(&self) -> SolverCategory {
        SolverCategory::RootFinding
    }

    fn solve<S: StageProblem>(
        &mut self,
        sys: &mut S,
        zcor: &mut [Float],
        call_setup: bool,
    ) -> Result<(), SolveError> {
        let n = sys.dim();
        let mut delta = vec![0.0; n];
        let mut call_setup = call_setup;
        let mut bad_jacobian = false;
        self.niters = 0;

        loop {
            let mut diverged = false;
            for m in 0..self.max_iters {
                sys.eval(zcor, &mut delta, m)?;

                if m == 0 && call_setup {
                    sys.setup(bad_jacobian).map_err(|e| match e {
                        EvalError::Recoverable => {
                            SolveError::Recoverable(RecoverableReason::SetupRetry)
                        }
                        EvalError::Fatal => SolveError::Fatal(FatalReason::SetupFailed),
                    })?;
                }

                // A * delta = -r
                for d in delta.iter_mut() {
                    *d = -*d;
                }
                sys.solve(&mut delta, m).map_err(|e| match e {
                    EvalError::Recoverable => {
                        SolveError::Recoverable(RecoverableReason::SolveRetry)
                    }
                    EvalError::Fatal => SolveError::Fatal(FatalReason::SolveFailed),
                })?;
                for i in 0..n {
                    zcor[i] += delta[i];
                }
                self.niters += 1;

                match sys.check(m, &delta) {
                    ConvTest::Converged => return Ok(()),
                    ConvTest::Diverged => {
                        diverged = true;
                        break;
                    }
                    ConvTest::Continue => {}
                }
            }

            // No convergence. With a stale Jacobian, restart once from the
            // predictor with a forced fresh setup.
            if !sys.jac_current() && !bad_jacobian {
                bad_jacobian = true;
                call_setup = true;
                for z in zcor.iter_mut() {
                    *z = 0.0;
                }
                continue;
            }
            return Err(SolveError::Recoverable(if diverged {
                RecoverableReason::Diverged
            } else {
                RecoverableReason::BudgetExhausted
            }));
        }
    }

    fn iters(&self) -> usize {
        self.niters
    }
}
