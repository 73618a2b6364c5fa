//! Plain fixed-point iteration driver.

use crate::{
    Float,
    context::SolverCategory,
    convergence::ConvTest,
    error::{RecoverableReason, SolveError},
    nonlinear::{NonlinearSolver, StageProblem},
};

/// Fixed-point iteration `zcor <- g(zcor)` for the fixed-point category.
///
/// No linear solver is involved; the correction update tested for
/// convergence is `g(zcor) - zcor`.
#[derive(Debug)]
pub struct FixedPointSolver {
    max_iters: usize,
    niters: usize,
}

impl FixedPointSolver {
    pub const DEFAULT_MAX_ITERS: usize = 10;

    pub fn new(max_iters: usize) -> Self {
        Self {
            max_iters,
            niters: 0,
        }
    }
}

impl Default for FixedPointSolver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ITERS)
    }
}

impl NonlinearSolver for FixedPointSolver {
    fn category(&self) -> SolverCategory {
        SolverCategory::FixedPoint
    }

    fn solve<S: StageProblem>(
        &mut self,
        sys: &mut S,
        zcor: &mut [Float],
        _call_setup: bool,
    ) -> Result<(), SolveError> {
        let n = sys.dim();
        let mut gval = vec![0.0; n];
        let mut delta = vec![0.0; n];
        self.niters = 0;

        for m in 0..self.max_iters {
            sys.eval(zcor, &mut gval, m)?;

            for i in 0..n {
                delta[i] = gval[i] - zcor[i];
            }
            zcor.copy_from_slice(&gval);
            self.niters = m + 1;

            match sys.check(m, &delta) {
                ConvTest::Converged => return Ok(()),
                ConvTest::Diverged => {
                    return Err(SolveError::Recoverable(RecoverableReason::Diverged));
                }
                ConvTest::Continue => {}
            }
        }
        Err(SolveError::Recoverable(RecoverableReason::BudgetExhausted))
    }

    fn iters(&self) -> usize {
        self.niters
    }
}
