//! Convenient prelude: import the most commonly used traits and types.
//!
//! Bring this into scope with:
//!
//! ```rust
//! use arkstage::prelude::*;
//! ```

pub use crate::{
    Float,
    bridge::LinearSolver,
    context::{MassKind, SolverCategory, StageContext},
    controller::{FailureReason, StageReport, StageSolver},
    error::{EvalError, FatalReason, RecoverableReason, SolveError},
    nonlinear::NonlinearSolver,
    rhs::{ImplicitRhs, MassOperator},
    settings::Settings,
    solvers::{DenseJacobian, DenseMass, DenseNewtonLs, FixedPointSolver, NewtonSolver},
};
