//! Top-level stage solve controller.

use crate::{
    Float,
    bridge::{LinearSolver, LsBridge},
    context::{MassKind, SolverCategory, SolverState, StageContext},
    convergence::ConvergenceMonitor,
    error::{Error, SolveError},
    formulate::{StageSystem, SystemForm},
    nonlinear::NonlinearSolver,
    rhs::{ImplicitRhs, MassOperator},
    settings::Settings,
};

/// How the previous solve attempt for this step ended, as classified by the
/// outer step-attempt logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// First attempt of this step.
    FirstCall,
    /// The previous attempt failed the nonlinear convergence test.
    PrevConvFail,
    /// The previous attempt failed the step-level error test.
    PrevErrFail,
    /// Any other retry cause.
    Other,
}

/// Outcome counters of one successful stage solve, in addition to the
/// cumulative diagnostics kept on [`SolverState`].
#[derive(Debug, Clone, Copy)]
pub struct StageReport {
    /// Nonlinear iterations taken by this attempt.
    pub iters: usize,
    /// Whether a linear-solver setup was performed during this attempt.
    pub setup_performed: bool,
    /// Final estimate of the linear convergence rate.
    pub conv_rate: Float,
}

/// Entry point for one implicit stage solve.
///
/// Owns the collaborators (RHS, optional mass operator, linear-solver bridge,
/// nonlinear-solver object) and the persistent [`SolverState`]; the outer
/// stepper supplies a fresh [`StageContext`] per stage per step.
#[derive(Debug)]
pub struct StageSolver<R, M, L, N> {
    settings: Settings,
    form: SystemForm,
    rhs: R,
    mass: Option<M>,
    bridge: LsBridge<L>,
    nls: N,
    state: SolverState,
}

impl<R, M, L, N> StageSolver<R, M, L, N>
where
    R: ImplicitRhs,
    M: MassOperator,
    L: LinearSolver,
    N: NonlinearSolver,
{
    /// Build a solver for an `n`-dimensional problem, validating the
    /// configuration. All violations are collected, in the same spirit as
    /// integrator input validation.
    pub fn new(
        n: usize,
        settings: Settings,
        rhs: R,
        mass: Option<M>,
        linear: L,
        nls: N,
    ) -> Result<Self, Vec<Error>> {
        let mut errors = settings.validate();
        if n == 0 {
            errors.push(Error::DimensionMustBePositive);
        }
        if settings.mass_kind != MassKind::Identity && mass.is_none() {
            errors.push(Error::MassOperatorMissing);
        }
        if nls.category() != settings.category {
            errors.push(Error::CategoryMismatch);
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let form = SystemForm::install(settings.mass_kind, settings.category);
        Ok(Self {
            settings,
            form,
            rhs,
            mass,
            bridge: LsBridge::new(linear),
            nls,
            state: SolverState::new(n),
        })
    }

    /// Solve the stage system described by `ctx` for the correction `zcor`.
    ///
    /// `ewt` are the reciprocal error weights and `tol` the nonlinear
    /// convergence tolerance, both supplied by the outer controller. `reason`
    /// classifies how the previous attempt (if any) ended.
    ///
    /// On success the stage vector is available via [`ycur`](Self::ycur) and
    /// the cached RHS entry via [`fcur`](Self::fcur). A recoverable error
    /// asks the caller to shrink the step and retry; a fatal error must abort
    /// the integration.
    pub fn solve_stage(
        &mut self,
        ctx: &StageContext,
        ewt: &[Float],
        tol: Float,
        reason: FailureReason,
    ) -> Result<StageReport, SolveError> {
        let n = self.state.zcor.len();
        debug_assert_eq!(ctx.zpred.len(), n);
        debug_assert_eq!(ctx.sdata.len(), n);
        debug_assert_eq!(ewt.len(), n);

        // Refresh the drift ratio, then decide once whether to recommend a
        // setup to the nonlinear solver. Fixed-point configurations carry no
        // linear solver and never set up.
        self.state.gamrat = if self.state.nsetups > 0 {
            ctx.gamma / self.state.gammap
        } else {
            1.0
        };
        let call_setup = self.settings.category == SolverCategory::RootFinding
            && self.bridge.setup_due(&self.settings, ctx, &self.state, reason);

        // Fresh attempt: zero correction, reset the rate model.
        let mut zcor = std::mem::take(&mut self.state.zcor);
        for z in zcor.iter_mut() {
            *z = 0.0;
        }
        let mut monitor = ConvergenceMonitor::new(
            self.settings.crdown,
            self.settings.rdiv,
            self.settings.linearly_implicit,
        );
        let nsetups_before = self.state.nsetups;
        let first_attempt = reason == FailureReason::FirstCall;

        let result = {
            let mut sys = StageSystem::new(
                self.form,
                ctx,
                &mut self.state,
                &mut self.rhs,
                self.mass.as_mut(),
                &mut self.bridge,
                &mut monitor,
                ewt,
                tol,
                first_attempt,
            );
            self.nls.solve(&mut sys, &mut zcor, call_setup)
        };
        self.state.zcor = zcor;
        self.state.niters += self.nls.iters();

        match result {
            Ok(()) => {
                for i in 0..n {
                    self.state.ycur[i] = ctx.zpred[i] + self.state.zcor[i];
                }
                // The Jacobian is no longer guaranteed current for the next
                // stage state.
                self.state.jcur = false;
                Ok(StageReport {
                    iters: self.nls.iters(),
                    setup_performed: self.state.nsetups > nsetups_before,
                    conv_rate: monitor.rate(),
                })
            }
            Err(SolveError::Recoverable(reason)) => {
                self.state.nconvfails += 1;
                Err(SolveError::Recoverable(reason))
            }
            Err(fatal) => Err(fatal),
        }
    }

    /// Current stage vector `zpred + zcor`.
    pub fn ycur(&self) -> &[Float] {
        &self.state.ycur
    }

    /// Cached implicit RHS evaluation for the active stage.
    pub fn fcur(&self) -> &[Float] {
        &self.state.fcur
    }

    /// Persistent solver state and cumulative diagnostics.
    pub fn state(&self) -> &SolverState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn rhs(&self) -> &R {
        &self.rhs
    }

    pub fn linear_solver(&self) -> &L {
        self.bridge.inner()
    }
}
