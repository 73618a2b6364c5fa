//! Implicit-stage nonlinear solve engine for additive (IMEX) Runge–Kutta methods.
//!
//! For each implicit stage of a step the engine formulates the stage algebraic
//! system (identity / fixed / time-dependent mass matrix, root-finding or
//! fixed-point solver category), drives a nonlinear-solver object to
//! convergence, decides adaptively when the Jacobian must be refreshed, and
//! reports a success / recoverable / fatal outcome to the outer step-size
//! controller.

mod bridge;
mod context;
mod controller;
mod convergence;
mod error;
mod formulate;
mod nonlinear;
mod norm;
mod rhs;
mod settings;
mod tolerance;

pub mod matrix;
pub mod prelude;
pub mod solvers;

pub use bridge::{LinearSolver, LsBridge};
pub use context::{MassKind, SolverCategory, SolverState, StageContext};
pub use controller::{FailureReason, StageReport, StageSolver};
pub use convergence::{ConvTest, ConvergenceMonitor};
pub use error::{Error, EvalError, FatalReason, RecoverableReason, SolveError};
pub use formulate::{StageSystem, SystemForm};
pub use nonlinear::{NonlinearSolver, StageProblem};
pub use norm::{error_weights, wrms_norm};
pub use rhs::{ImplicitRhs, MassOperator};
pub use settings::Settings;
pub use tolerance::Tolerance;

// Prevent selecting two incompatible float precision features at once.
#[cfg(all(feature = "f32", feature = "f64"))]
compile_error!(
    "features 'f32' and 'f64' cannot both be enabled; pick exactly one Float precision feature"
);

/// Change this to f64 or f32 as desired.
#[cfg(feature = "f32")]
pub type Float = f32;
#[cfg(feature = "f64")]
pub type Float = f64;
