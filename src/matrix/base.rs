//! Dense matrix storage.

use crate::Float;

/// Storage layout of a [`Matrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixStorage {
    /// Implicit identity; no data is stored.
    Identity,
    /// Dense row-major storage.
    Full,
}

/// A small dense matrix (row-major) with an implicit-identity fast path.
#[derive(Debug, Clone)]
pub struct Matrix {
    pub(crate) n: usize,
    pub(crate) m: usize,
    pub(crate) data: Vec<Float>,
    pub(crate) storage: MatrixStorage,
}

impl Matrix {
    /// Dense n x m matrix of zeros.
    pub fn zeros(n: usize, m: usize) -> Self {
        Self {
            n,
            m,
            data: vec![0.0; n * m],
            storage: MatrixStorage::Full,
        }
    }

    /// Dense n x m matrix of zeros (alias used when filling in all entries).
    pub fn full(n: usize, m: usize) -> Self {
        Self::zeros(n, m)
    }

    /// Implicit identity of size n.
    pub fn identity(n: usize) -> Self {
        Self {
            n,
            m: n,
            data: Vec::new(),
            storage: MatrixStorage::Identity,
        }
    }

    pub fn nrows(&self) -> usize {
        self.n
    }

    pub fn ncols(&self) -> usize {
        self.m
    }

    pub fn storage(&self) -> MatrixStorage {
        self.storage
    }

    /// out = A * v
    pub fn mat_vec(&self, v: &[Float], out: &mut [Float]) {
        assert_eq!(v.len(), self.m, "dimension mismatch in mat_vec");
        assert_eq!(out.len(), self.n, "dimension mismatch in mat_vec");
        match self.storage {
            MatrixStorage::Identity => out.copy_from_slice(v),
            MatrixStorage::Full => {
                for i in 0..self.n {
                    let mut sum = 0.0;
                    for j in 0..self.m {
                        sum += self.data[i * self.m + j] * v[j];
                    }
                    out[i] = sum;
                }
            }
        }
    }
}

impl std::ops::Index<(usize, usize)> for Matrix {
    type Output = Float;

    fn index(&self, (r, c): (usize, usize)) -> &Self::Output {
        match self.storage {
            MatrixStorage::Identity => {
                if r == c {
                    &1.0
                } else {
                    &0.0
                }
            }
            MatrixStorage::Full => &self.data[r * self.m + c],
        }
    }
}

impl std::ops::IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut Self::Output {
        assert_eq!(
            self.storage,
            MatrixStorage::Full,
            "cannot mutate an implicit identity matrix"
        );
        &mut self.data[r * self.m + c]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mat_vec_full() {
        let mut a = Matrix::full(2, 2);
        a[(0, 0)] = 1.0;
        a[(0, 1)] = 2.0;
        a[(1, 0)] = 3.0;
        a[(1, 1)] = 4.0;
        let mut out = [0.0; 2];
        a.mat_vec(&[1.0, -1.0], &mut out);
        assert_eq!(out, [-1.0, -1.0]);
    }

    #[test]
    fn mat_vec_identity() {
        let a = Matrix::identity(3);
        let mut out = [0.0; 3];
        a.mat_vec(&[1.0, 2.0, 3.0], &mut out);
        assert_eq!(out, [1.0, 2.0, 3.0]);
    }
}
