//! Stage system formulation: residual and fixed-point variants for the six
//! (mass kind × solver category) combinations.

use crate::{
    Float,
    bridge::{LinearSolver, LsBridge},
    context::{MassKind, SolverCategory, SolverState, StageContext},
    convergence::{ConvTest, ConvergenceMonitor},
    error::{EvalError, FatalReason, RecoverableReason, SolveError},
    nonlinear::StageProblem,
    norm::wrms_norm,
    rhs::{ImplicitRhs, MassOperator},
};

/// The formula variant active for an attempt, resolved once at configuration
/// time so the per-iteration path carries no re-selection logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemForm {
    /// `r = zcor - gamma*Fi - sdata`
    ResidualIdentity,
    /// `r = M*zcor - gamma*Fi - sdata`
    ResidualFixedMass,
    /// `r = M(t)*(zcor - sdata) - gamma*Fi`
    ResidualTvMass,
    /// `g = gamma*Fi + sdata`
    FixedPointIdentity,
    /// `g = M^-1 * (gamma*Fi + sdata)`
    FixedPointFixedMass,
    /// `g = M(t)^-1 * (gamma*Fi) + sdata`
    FixedPointTvMass,
}

impl SystemForm {
    /// Select the variant for a configuration. Called once at initialization;
    /// never switched mid-attempt.
    pub fn install(mass: MassKind, category: SolverCategory) -> Self {
        match (category, mass) {
            (SolverCategory::RootFinding, MassKind::Identity) => SystemForm::ResidualIdentity,
            (SolverCategory::RootFinding, MassKind::Fixed) => SystemForm::ResidualFixedMass,
            (SolverCategory::RootFinding, MassKind::TimeDependent) => SystemForm::ResidualTvMass,
            (SolverCategory::FixedPoint, MassKind::Identity) => SystemForm::FixedPointIdentity,
            (SolverCategory::FixedPoint, MassKind::Fixed) => SystemForm::FixedPointFixedMass,
            (SolverCategory::FixedPoint, MassKind::TimeDependent) => SystemForm::FixedPointTvMass,
        }
    }

    pub fn category(self) -> SolverCategory {
        match self {
            SystemForm::ResidualIdentity
            | SystemForm::ResidualFixedMass
            | SystemForm::ResidualTvMass => SolverCategory::RootFinding,
            SystemForm::FixedPointIdentity
            | SystemForm::FixedPointFixedMass
            | SystemForm::FixedPointTvMass => SolverCategory::FixedPoint,
        }
    }
}

/// One fully-wired stage system, borrowing the engine's collaborators for the
/// duration of a solve attempt. Implements [`StageProblem`] for the
/// nonlinear-solver object.
pub struct StageSystem<'a, R, M, L> {
    form: SystemForm,
    ctx: &'a StageContext,
    state: &'a mut SolverState,
    rhs: &'a mut R,
    mass: Option<&'a mut M>,
    bridge: &'a mut LsBridge<L>,
    monitor: &'a mut ConvergenceMonitor,
    ewt: &'a [Float],
    tol: Float,
    first_attempt: bool,
}

impl<'a, R, M, L> StageSystem<'a, R, M, L>
where
    R: ImplicitRhs,
    M: MassOperator,
    L: LinearSolver,
{
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        form: SystemForm,
        ctx: &'a StageContext,
        state: &'a mut SolverState,
        rhs: &'a mut R,
        mass: Option<&'a mut M>,
        bridge: &'a mut LsBridge<L>,
        monitor: &'a mut ConvergenceMonitor,
        ewt: &'a [Float],
        tol: Float,
        first_attempt: bool,
    ) -> Self {
        Self {
            form,
            ctx,
            state,
            rhs,
            mass,
            bridge,
            monitor,
            ewt,
            tol,
            first_attempt,
        }
    }

    /// Refresh `ycur = zpred + zcor` and the cached RHS entry.
    ///
    /// On the first iteration of the first attempt of an autonomous
    /// trivial-predictor configuration the cached start-of-step value is
    /// reused verbatim; the result is bit-identical to re-evaluation because
    /// the state and (for an autonomous system) the time match.
    fn refresh_rhs(&mut self, zcor: &[Float], iter: usize) -> Result<(), SolveError> {
        let n = zcor.len();
        for i in 0..n {
            self.state.ycur[i] = self.ctx.zpred[i] + zcor[i];
        }

        let reuse_cached = iter == 0
            && self.first_attempt
            && self.ctx.trivial_predictor
            && self.rhs.is_autonomous()
            && self.ctx.f0.is_some();
        if let (true, Some(f0)) = (reuse_cached, &self.ctx.f0) {
            self.state.fcur.copy_from_slice(f0);
        } else {
            self.rhs
                .eval(self.ctx.t, &self.state.ycur, &mut self.state.fcur)
                .map_err(rhs_err)?;
        }
        Ok(())
    }

    fn mass_op(&mut self) -> Result<&mut M, SolveError> {
        match &mut self.mass {
            Some(m) => Ok(m),
            // Construction validates that non-identity forms carry a mass
            // operator, so this is unreachable in a validated solver.
            None => Err(SolveError::Fatal(FatalReason::MassFailed)),
        }
    }
}

fn rhs_err(e: EvalError) -> SolveError {
    match e {
        EvalError::Recoverable => SolveError::Recoverable(RecoverableReason::EvalRetry),
        EvalError::Fatal => SolveError::Fatal(FatalReason::RhsFailed),
    }
}

fn mass_err(e: EvalError) -> SolveError {
    match e {
        EvalError::Recoverable => SolveError::Recoverable(RecoverableReason::EvalRetry),
        EvalError::Fatal => SolveError::Fatal(FatalReason::MassFailed),
    }
}

impl<R, M, L> StageProblem for StageSystem<'_, R, M, L>
where
    R: ImplicitRhs,
    M: MassOperator,
    L: LinearSolver,
{
    fn dim(&self) -> usize {
        self.ctx.zpred.len()
    }

    fn category(&self) -> SolverCategory {
        self.form.category()
    }

    fn eval(&mut self, zcor: &[Float], out: &mut [Float], iter: usize) -> Result<(), SolveError> {
        self.refresh_rhs(zcor, iter)?;

        let n = zcor.len();
        let gamma = self.ctx.gamma;
        let t = self.ctx.t;
        let tol = self.tol;
        match self.form {
            SystemForm::ResidualIdentity => {
                let (ctx, state) = (self.ctx, &*self.state);
                for i in 0..n {
                    out[i] = zcor[i] - gamma * state.fcur[i] - ctx.sdata[i];
                }
            }
            SystemForm::ResidualFixedMass => {
                self.mass_op()?.mult(t, zcor, out).map_err(mass_err)?;
                let (ctx, state) = (self.ctx, &*self.state);
                for i in 0..n {
                    out[i] -= gamma * state.fcur[i] + ctx.sdata[i];
                }
            }
            SystemForm::ResidualTvMass => {
                for i in 0..n {
                    self.state.scratch[i] = zcor[i] - self.ctx.sdata[i];
                }
                let StageSystem { state, mass, .. } = self;
                let m = match mass {
                    Some(m) => m,
                    None => return Err(SolveError::Fatal(FatalReason::MassFailed)),
                };
                m.mult(t, &state.scratch, out).map_err(mass_err)?;
                for i in 0..n {
                    out[i] -= gamma * state.fcur[i];
                }
            }
            SystemForm::FixedPointIdentity => {
                let (ctx, state) = (self.ctx, &*self.state);
                for i in 0..n {
                    out[i] = gamma * state.fcur[i] + ctx.sdata[i];
                }
            }
            SystemForm::FixedPointFixedMass => {
                for i in 0..n {
                    out[i] = gamma * self.state.fcur[i] + self.ctx.sdata[i];
                }
                self.mass_op()?.solve(t, out, tol).map_err(mass_err)?;
            }
            SystemForm::FixedPointTvMass => {
                for i in 0..n {
                    out[i] = gamma * self.state.fcur[i];
                }
                self.mass_op()?.solve(t, out, tol).map_err(mass_err)?;
                for i in 0..n {
                    out[i] += self.ctx.sdata[i];
                }
            }
        }
        Ok(())
    }

    fn setup(&mut self, bad_jacobian: bool) -> Result<(), EvalError> {
        self.bridge.setup(self.ctx, self.state, bad_jacobian)
    }

    fn solve(&mut self, b: &mut [Float], iter: usize) -> Result<(), EvalError> {
        self.bridge.solve(b, iter)
    }

    fn check(&mut self, iter: usize, del: &[Float]) -> ConvTest {
        let delnrm = wrms_norm(del, self.ewt);
        self.monitor.check(iter, delnrm, self.tol)
    }

    fn jac_current(&self) -> bool {
        self.state.jcur
    }
}
