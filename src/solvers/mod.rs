//! Reference nonlinear-iteration drivers and dense collaborators.
//!
//! Any external driver implementing [`NonlinearSolver`](crate::NonlinearSolver)
//! can replace these; they are shipped so the engine is usable end-to-end.

mod dense;
mod fixed_point;
mod newton;

pub use dense::{DenseJacobian, DenseMass, DenseNewtonLs};
pub use fixed_point::FixedPointSolver;
pub use newton::NewtonSolver;
