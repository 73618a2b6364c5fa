//! Linear solves: A x = b via LU with partial pivoting.

use thiserror::Error;

use crate::Float;

use super::base::{Matrix, MatrixStorage};

/// The matrix was found singular during factorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("singular matrix in solve")]
pub struct SingularMatrix;

impl Matrix {
    /// Solve A x = b, returning x.
    pub fn lin_solve(&self, b: &[Float]) -> Result<Vec<Float>, SingularMatrix> {
        let mut b_copy = b.to_vec();
        self.lin_solve_mut(&mut b_copy)?;
        Ok(b_copy)
    }

    /// In-place solve: overwrites `b` with `x`.
    pub fn lin_solve_mut(&self, b: &mut [Float]) -> Result<(), SingularMatrix> {
        let n = self.n;
        assert_eq!(
            b.len(),
            n,
            "dimension mismatch in solve: A is {}x{}, b has length {}",
            n,
            n,
            b.len()
        );

        if self.storage == MatrixStorage::Identity {
            return Ok(());
        }

        // Work on a copy so the factorization does not clobber A.
        let mut a = self.data[0..n * n].to_vec();

        // LU with partial pivoting, applying permutations to b
        for k in 0..n {
            // pivot
            let mut pivot_row = k;
            let mut pivot_val = a[k * n + k].abs();
            for i in (k + 1)..n {
                let val = a[i * n + k].abs();
                if val > pivot_val {
                    pivot_val = val;
                    pivot_row = i;
                }
            }
            if pivot_val == 0.0 {
                return Err(SingularMatrix);
            }
            if pivot_row != k {
                for j in 0..n {
                    a.swap(k * n + j, pivot_row * n + j);
                }
                b.swap(k, pivot_row);
            }
            // Eliminate below the pivot
            let akk = a[k * n + k];
            for i in (k + 1)..n {
                let factor = a[i * n + k] / akk;
                a[i * n + k] = factor;
                for j in (k + 1)..n {
                    a[i * n + j] = a[i * n + j] - factor * a[k * n + j];
                }
            }
        }

        // Forward solve Ly = Pb (b is permuted)
        for i in 0..n {
            let mut sum = b[i];
            for k in 0..i {
                sum -= a[i * n + k] * b[k];
            }
            b[i] = sum;
        }
        // Backward solve Ux = y
        for i in (0..n).rev() {
            let mut sum = b[i];
            for k in (i + 1)..n {
                sum -= a[i * n + k] * b[k];
            }
            b[i] = sum / a[i * n + i];
        }
        Ok(())
    }
}
