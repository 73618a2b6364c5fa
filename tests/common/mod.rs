//! Shared fixtures for the integration tests.

use arkstage::matrix::Matrix;
use arkstage::prelude::*;

/// `f(t, y) = a * y`, autonomous.
#[derive(Debug)]
pub struct LinearRhs {
    pub a: Float,
    pub nevals: usize,
}

impl LinearRhs {
    pub fn new(a: Float) -> Self {
        Self { a, nevals: 0 }
    }
}

impl ImplicitRhs for LinearRhs {
    fn eval(&mut self, _t: Float, y: &[Float], f: &mut [Float]) -> Result<(), EvalError> {
        self.nevals += 1;
        for i in 0..y.len() {
            f[i] = self.a * y[i];
        }
        Ok(())
    }

    fn is_autonomous(&self) -> bool {
        true
    }
}

/// RHS that always fails unrecoverably.
pub struct FatalRhs;

impl ImplicitRhs for FatalRhs {
    fn eval(&mut self, _t: Float, _y: &[Float], _f: &mut [Float]) -> Result<(), EvalError> {
        Err(EvalError::Fatal)
    }
}

/// `f(t, y) = a * y` that fails recoverably for the first few evaluations.
pub struct FlakyRhs {
    pub a: Float,
    pub failures_left: usize,
}

impl ImplicitRhs for FlakyRhs {
    fn eval(&mut self, _t: Float, y: &[Float], f: &mut [Float]) -> Result<(), EvalError> {
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(EvalError::Recoverable);
        }
        for i in 0..y.len() {
            f[i] = self.a * y[i];
        }
        Ok(())
    }
}

/// Mass operator whose every call fails unrecoverably.
pub struct FatalMass;

impl MassOperator for FatalMass {
    fn mult(&mut self, _t: Float, _v: &[Float], _out: &mut [Float]) -> Result<(), EvalError> {
        Err(EvalError::Fatal)
    }

    fn solve(&mut self, _t: Float, _b: &mut [Float], _tol: Float) -> Result<(), EvalError> {
        Err(EvalError::Fatal)
    }
}

/// Wrapper that injects a budget of recoverable setup/solve failures before
/// delegating to the inner linear solver.
pub struct FlakyLs<L> {
    pub inner: L,
    pub setup_failures: usize,
    pub solve_failures: usize,
}

impl<L: LinearSolver> LinearSolver for FlakyLs<L> {
    fn setup(
        &mut self,
        t: Float,
        y: &[Float],
        fy: &[Float],
        bad: bool,
        gamma: Float,
    ) -> Result<(), EvalError> {
        if self.setup_failures > 0 {
            self.setup_failures -= 1;
            return Err(EvalError::Recoverable);
        }
        self.inner.setup(t, y, fy, bad, gamma)
    }

    fn solve(&mut self, b: &mut [Float], iter: usize) -> Result<(), EvalError> {
        if self.solve_failures > 0 {
            self.solve_failures -= 1;
            return Err(EvalError::Recoverable);
        }
        self.inner.solve(b, iter)
    }
}

/// Constant dense Jacobian `J = a * I`.
pub struct ConstJac(pub Float);

impl DenseJacobian for ConstJac {
    fn jac(
        &mut self,
        _t: Float,
        _y: &[Float],
        _fy: &[Float],
        out: &mut Matrix,
    ) -> Result<(), EvalError> {
        let n = out.nrows();
        for r in 0..n {
            for c in 0..n {
                out[(r, c)] = if r == c { self.0 } else { 0.0 };
            }
        }
        Ok(())
    }
}

/// Linear solver that does nothing; for fixed-point configurations.
#[derive(Debug)]
pub struct NullLs;

impl LinearSolver for NullLs {
    fn setup(
        &mut self,
        _t: Float,
        _y: &[Float],
        _fy: &[Float],
        _bad: bool,
        _gamma: Float,
    ) -> Result<(), EvalError> {
        Ok(())
    }

    fn solve(&mut self, _b: &mut [Float], _iter: usize) -> Result<(), EvalError> {
        Ok(())
    }
}

/// Deliberately wrong linear solver: scales the right-hand side so the
/// Newton updates overshoot and grow.
pub struct ScaledLs {
    pub scale: Float,
}

impl LinearSolver for ScaledLs {
    fn setup(
        &mut self,
        _t: Float,
        _y: &[Float],
        _fy: &[Float],
        _bad: bool,
        _gamma: Float,
    ) -> Result<(), EvalError> {
        Ok(())
    }

    fn solve(&mut self, b: &mut [Float], _iter: usize) -> Result<(), EvalError> {
        for v in b.iter_mut() {
            *v *= self.scale;
        }
        Ok(())
    }
}

/// A one-dimensional stage context: `zpred = 0`, `sdata = 0.3`.
pub fn scalar_ctx(gamma: Float, nst: usize) -> StageContext {
    StageContext {
        t: 0.0,
        h: 2.0 * gamma,
        gamma,
        nst,
        zpred: vec![0.0],
        sdata: vec![0.3],
        f0: None,
        trivial_predictor: false,
    }
}
