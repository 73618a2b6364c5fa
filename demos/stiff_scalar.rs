//! # Example: backward-Euler steps on a stiff scalar decay problem
//!
//! Solve y' = lambda * (cos(t) - y) one implicit stage at a time.
//!
//! Backward Euler is the one-stage implicit Runge-Kutta method with
//! gamma = h and trivial predictor zpred = y_n, so each step reduces to one
//! stage solve of this engine.

use arkstage::matrix::Matrix;
use arkstage::prelude::*;

struct StiffDecay {
    lambda: f64,
}

impl ImplicitRhs for StiffDecay {
    fn eval(&mut self, t: f64, y: &[f64], f: &mut [f64]) -> Result<(), EvalError> {
        f[0] = self.lambda * (t.cos() - y[0]);
        Ok(())
    }
}

struct StiffDecayJac {
    lambda: f64,
}

impl DenseJacobian for StiffDecayJac {
    fn jac(
        &mut self,
        _t: f64,
        _y: &[f64],
        _fy: &[f64],
        out: &mut Matrix,
    ) -> Result<(), EvalError> {
        out[(0, 0)] = -self.lambda;
        Ok(())
    }
}

fn main() {
    let lambda = 50.0;
    let h = 0.05;
    let mut t = 0.0;
    let mut y = 0.0;

    let mut solver = StageSolver::new(
        1,
        Settings::default(),
        StiffDecay { lambda },
        None::<DenseMass>,
        DenseNewtonLs::new(1, StiffDecayJac { lambda }),
        NewtonSolver::default(),
    )
    .expect("valid configuration");

    for nst in 0..40 {
        // Backward Euler stage: z = y_n + h * f(t_{n+1}, z), i.e. with the
        // trivial predictor zpred = y_n the correction satisfies
        // zcor = h * f and sdata = 0.
        let ctx = StageContext {
            t: t + h,
            h,
            gamma: h,
            nst,
            zpred: vec![y],
            sdata: vec![0.0],
            f0: None,
            trivial_predictor: false,
        };

        let mut reason = FailureReason::FirstCall;
        loop {
            match solver.solve_stage(&ctx, &[1.0], 1e-10, reason) {
                Ok(report) => {
                    y = solver.ycur()[0];
                    t += h;
                    println!(
                        "t = {:>6.3}  y = {:>9.6}  iters = {}  setup = {}",
                        t, y, report.iters, report.setup_performed
                    );
                    break;
                }
                Err(SolveError::Recoverable(why)) => {
                    // A real stepper would shrink h here; this demo just
                    // forces a Jacobian refresh and retries once.
                    eprintln!("recoverable failure at t = {:.3}: {}", t, why);
                    reason = FailureReason::PrevConvFail;
                }
                Err(fatal) => {
                    eprintln!("aborting: {}", fatal);
                    return;
                }
            }
        }
    }

    let state = solver.state();
    println!("Total nonlinear iterations: {}", state.niters);
    println!("Total convergence failures: {}", state.nconvfails);
    println!("Total linear-solver setups: {}", state.nsetups);
}
