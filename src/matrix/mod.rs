//! Dense matrix type and linear solves for the shipped collaborators.

mod base;
mod linear;

pub use base::{Matrix, MatrixStorage};
pub use linear::SingularMatrix;
