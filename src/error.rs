//! Error and outcome types for the stage solve engine.
//!
//! The public outcome of a stage solve is a strict three-way split: success,
//! recoverable failure (the caller may shrink the step and retry), or fatal
//! failure (propagated unchanged, no retry at any level inside the engine).

use thiserror::Error;

use crate::Float;

/// Configuration validation errors, collected at solver construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("crdown must be in (0, 1) (got {0})")]
    CrdownOutOfRange(Float),
    #[error("rdiv must be greater than 1 (got {0})")]
    RdivOutOfRange(Float),
    #[error("dgmax must be positive (got {0})")]
    DgmaxOutOfRange(Float),
    #[error("problem dimension must be positive")]
    DimensionMustBePositive,
    #[error("a mass operator is required for a non-identity mass matrix")]
    MassOperatorMissing,
    #[error("nonlinear solver category does not match the configured category")]
    CategoryMismatch,
}

/// Status of a single external evaluation (RHS, mass operator, linear solver).
///
/// Mirrors the success / recoverable / fatal convention of the surrounding
/// collaborators: a recoverable failure means "try again with a different
/// trial correction", a fatal one aborts the whole solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("evaluation failed recoverably")]
    Recoverable,
    #[error("evaluation failed unrecoverably")]
    Fatal,
}

/// Why a solve attempt failed recoverably. The outer controller is expected
/// to shrink the step size and re-invoke the stage solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecoverableReason {
    #[error("correction iteration diverged")]
    Diverged,
    #[error("iteration budget exhausted without convergence")]
    BudgetExhausted,
    #[error("system evaluation requested a retry")]
    EvalRetry,
    #[error("linear solver setup requested a retry")]
    SetupRetry,
    #[error("linear solve requested a retry")]
    SolveRetry,
}

/// Unrecoverable failure sources. These abort the integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FatalReason {
    #[error("right-hand side evaluation failed")]
    RhsFailed,
    #[error("mass-matrix operation failed")]
    MassFailed,
    #[error("linear solver setup failed")]
    SetupFailed,
    #[error("linear solve failed")]
    SolveFailed,
}

/// Failure outcome of one stage solve attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("recoverable failure: {0}")]
    Recoverable(RecoverableReason),
    #[error("fatal failure: {0}")]
    Fatal(FatalReason),
}

impl SolveError {
    /// True if the caller may shrink the step and retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SolveError::Recoverable(_))
    }
}
