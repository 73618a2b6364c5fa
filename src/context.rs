//! Per-stage context and mutable solver state.

use crate::Float;

/// Kind of mass matrix multiplying the time-derivative term.
///
/// Fixed for the life of the integrator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MassKind {
    /// No mass matrix (ODE form `y' = f(t, y)`).
    Identity,
    /// A constant, time-independent operator.
    Fixed,
    /// An operator that must be re-evaluated at the stage time.
    TimeDependent,
}

/// Category of the nonlinear solver driving the stage system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverCategory {
    /// Drive a residual to zero (Newton-like).
    RootFinding,
    /// Iterate a self-map to its fixed point.
    FixedPoint,
}

/// Read-only description of one implicit stage, owned by the outer step.
///
/// `zpred` is immutable for the duration of a solve attempt; `sdata` folds
/// together the previous step's state and all already-computed stage
/// contributions and is supplied by the caller before invocation.
#[derive(Debug, Clone)]
pub struct StageContext {
    /// Stage time `t_n + c_i * h`.
    pub t: Float,
    /// Current step size.
    pub h: Float,
    /// Step size times the diagonal Butcher coefficient of the active stage.
    pub gamma: Float,
    /// Step counter of the outer integration (used by the setup heuristic).
    pub nst: usize,
    /// Predicted stage vector.
    pub zpred: Vec<Float>,
    /// Pre-accumulated explicit/implicit stage data.
    pub sdata: Vec<Float>,
    /// Start-of-step implicit RHS evaluation, if the caller has one cached.
    /// Enables the trivial-predictor fast path together with
    /// [`trivial_predictor`](Self::trivial_predictor).
    pub f0: Option<Vec<Float>>,
    /// True when `zpred` is the trivial predictor (the start-of-step state),
    /// so the cached `f0` is exactly the RHS at the predicted stage.
    pub trivial_predictor: bool,
}

/// Mutable working state of the stage solve engine.
///
/// One instance lives inside each [`StageSolver`](crate::StageSolver);
/// correction and convergence fields are reset at the start of every attempt
/// while the setup bookkeeping (`gammap`, `gamrat`, `nsetups`, `nstlp`) and
/// the cumulative diagnostics persist across steps.
#[derive(Debug, Clone)]
pub struct SolverState {
    /// Current correction vector, zeroed at the start of each attempt.
    pub zcor: Vec<Float>,
    /// Current stage vector; always recomputed as `zpred + zcor`.
    pub ycur: Vec<Float>,
    /// Cached implicit RHS evaluation for the active stage.
    pub fcur: Vec<Float>,
    /// Scratch vector for mass-operator products.
    pub(crate) scratch: Vec<Float>,
    /// Gamma at the last linear-solver setup.
    pub gammap: Float,
    /// Drift ratio `gamma / gammap` used by the refresh heuristic.
    pub gamrat: Float,
    /// True while the Jacobian data matches the current stage state.
    pub jcur: bool,
    /// Cumulative linear-solver setup count.
    pub nsetups: usize,
    /// Step index at the last setup.
    pub nstlp: usize,
    /// Cumulative nonlinear iterations (advisory only).
    pub niters: usize,
    /// Cumulative nonlinear convergence failures (advisory only).
    pub nconvfails: usize,
}

impl SolverState {
    pub fn new(n: usize) -> Self {
        Self {
            zcor: vec![0.0; n],
            ycur: vec![0.0; n],
            fcur: vec![0.0; n],
            scratch: vec![0.0; n],
            gammap: 1.0,
            gamrat: 1.0,
            jcur: false,
            nsetups: 0,
            nstlp: 0,
            niters: 0,
            nconvfails: 0,
        }
    }
}
