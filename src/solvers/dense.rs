//! Dense linear-solver and mass-operator collaborators built on [`Matrix`].

use crate::{
    Float,
    bridge::LinearSolver,
    error::EvalError,
    matrix::Matrix,
    rhs::MassOperator,
};

/// User-supplied dense Jacobian `J = df_I/dy` evaluated at `(t, y)`.
pub trait DenseJacobian {
    fn jac(&mut self, t: Float, y: &[Float], fy: &[Float], out: &mut Matrix)
    -> Result<(), EvalError>;
}

/// Dense Newton linear solver: factors and solves `A = M - gamma*J`.
///
/// `M` defaults to the identity; supply a mass matrix with
/// [`with_mass`](Self::with_mass) for fixed-mass problems.
pub struct DenseNewtonLs<J> {
    jac_fn: J,
    jac: Matrix,
    a: Matrix,
    mass: Matrix,
    njevals: usize,
}

impl<J: DenseJacobian> DenseNewtonLs<J> {
    pub fn new(n: usize, jac_fn: J) -> Self {
        Self {
            jac_fn,
            jac: Matrix::zeros(n, n),
            a: Matrix::zeros(n, n),
            mass: Matrix::identity(n),
            njevals: 0,
        }
    }

    pub fn with_mass(n: usize, jac_fn: J, mass: Matrix) -> Self {
        Self {
            jac_fn,
            jac: Matrix::zeros(n, n),
            a: Matrix::zeros(n, n),
            mass,
            njevals: 0,
        }
    }

    /// Jacobian evaluations performed so far.
    pub fn njevals(&self) -> usize {
        self.njevals
    }
}

impl<J: DenseJacobian> LinearSolver for DenseNewtonLs<J> {
    fn setup(
        &mut self,
        t: Float,
        y: &[Float],
        fy: &[Float],
        _bad_jacobian: bool,
        gamma: Float,
    ) -> Result<(), EvalError> {
        self.jac_fn.jac(t, y, fy, &mut self.jac)?;
        self.njevals += 1;
        let n = self.a.nrows();
        for r in 0..n {
            for c in 0..n {
                self.a[(r, c)] = self.mass[(r, c)] - gamma * self.jac[(r, c)];
            }
        }
        Ok(())
    }

    fn solve(&mut self, b: &mut [Float], _iter: usize) -> Result<(), EvalError> {
        self.a.lin_solve_mut(b).map_err(|_| EvalError::Recoverable)
    }
}

/// Dense mass operator backed by a [`Matrix`].
#[derive(Debug)]
pub struct DenseMass {
    m: Matrix,
}

impl DenseMass {
    pub fn new(m: Matrix) -> Self {
        Self { m }
    }
}

impl MassOperator for DenseMass {
    fn mult(&mut self, _t: Float, v: &[Float], out: &mut [Float]) -> Result<(), EvalError> {
        self.m.mat_vec(v, out);
        Ok(())
    }

    fn solve(&mut self, _t: Float, b: &mut [Float], _tol: Float) -> Result<(), EvalError> {
        self.m.lin_solve_mut(b).map_err(|_| EvalError::Recoverable)
    }
}
