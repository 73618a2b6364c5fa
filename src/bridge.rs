//! Linear-solver bridge: setup/solve adapter plus the Jacobian-refresh
//! decision heuristic.

use crate::{
    Float,
    context::{MassKind, SolverCategory, SolverState, StageContext},
    controller::FailureReason,
    error::EvalError,
    settings::Settings,
};

/// External linear solver consumed by the engine.
///
/// `setup` refreshes the Jacobian/preconditioner data for the Newton matrix
/// `A = M - gamma*J` at the given state; `bad_jacobian` hints that the
/// previous data caused a convergence failure. `solve` overwrites `b` with
/// the solution of `A x = b`.
pub trait LinearSolver {
    fn setup(
        &mut self,
        t: Float,
        y: &[Float],
        fy: &[Float],
        bad_jacobian: bool,
        gamma: Float,
    ) -> Result<(), EvalError>;

    fn solve(&mut self, b: &mut [Float], iter: usize) -> Result<(), EvalError>;
}

/// Adapter owning the external linear solver and the setup bookkeeping.
#[derive(Debug)]
pub struct LsBridge<L> {
    ls: L,
}

impl<L: LinearSolver> LsBridge<L> {
    pub fn new(ls: L) -> Self {
        Self { ls }
    }

    /// Refresh heuristic, evaluated once per attempt before the first setup
    /// call is even considered. Returns true when a setup should be
    /// recommended to the nonlinear solver.
    pub(crate) fn setup_due(
        &self,
        settings: &Settings,
        ctx: &StageContext,
        state: &SolverState,
        reason: FailureReason,
    ) -> bool {
        // The bridge only exists for root-finding configurations.
        debug_assert_eq!(settings.category, SolverCategory::RootFinding);

        // First stage ever solved, or "always" frequency, or gamma drifted.
        if state.nsetups == 0 || settings.msbp <= 0 {
            return true;
        }
        if (state.gamrat - 1.0).abs() > settings.dgmax {
            return true;
        }
        // A time-dependent mass with a linear problem forces every step.
        if settings.mass_kind == MassKind::TimeDependent && settings.linearly_implicit {
            return true;
        }
        // Nonlinearly-implicit problems also refresh after failures and on
        // the configured step interval.
        if !settings.linearly_implicit {
            if matches!(reason, FailureReason::PrevConvFail | FailureReason::PrevErrFail) {
                return true;
            }
            if ctx.nst >= state.nstlp + settings.msbp.unsigned_abs() as usize {
                return true;
            }
        }
        false
    }

    /// Perform a setup call at the current iterate and record it.
    pub(crate) fn setup(
        &mut self,
        ctx: &StageContext,
        state: &mut SolverState,
        bad_jacobian: bool,
    ) -> Result<(), EvalError> {
        self.ls
            .setup(ctx.t, &state.ycur, &state.fcur, bad_jacobian, ctx.gamma)?;
        state.gammap = ctx.gamma;
        state.gamrat = 1.0;
        state.nstlp = ctx.nst;
        state.nsetups += 1;
        state.jcur = true;
        Ok(())
    }

    pub(crate) fn solve(&mut self, b: &mut [Float], iter: usize) -> Result<(), EvalError> {
        self.ls.solve(b, iter)
    }

    pub fn inner(&self) -> &L {
        &self.ls
    }
}
