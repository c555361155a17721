use crate::error::SentiError;
use crate::tensor::traits::Value;
use crate::tensor::vector::Vector;
use crate::tensor::INIT_RANGE;
use approx::{AbsDiffEq, RelativeEq};
use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// A dense, row-major `rows × cols` matrix of `f64` components.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates a matrix from row-major `data`.
    ///
    /// # Errors
    /// Returns `SentiError::ShapeMismatch` if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, SentiError> {
        if data.len() != rows * cols {
            return Err(SentiError::shape(
                "matrix from_vec",
                vec![rows * cols],
                vec![data.len()],
            ));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Internal constructor for data whose length is already known to match.
    pub(crate) fn from_raw(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Matrix { rows, cols, data }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Creates a matrix with components drawn uniformly from `[-INIT_RANGE, INIT_RANGE]`.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let dist = Uniform::new_inclusive(-INIT_RANGE, INIT_RANGE);
        Matrix {
            rows,
            cols,
            data: (0..rows * cols).map(|_| dist.sample(rng)).collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.data[row * self.cols + col])
    }

    fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Matrix-vector product `W·x`.
    ///
    /// # Errors
    /// Returns `SentiError::ShapeMismatch` if `x.len() != self.cols()`.
    pub fn mul_vec(&self, x: &Vector) -> Result<Vector, SentiError> {
        if x.len() != self.cols {
            return Err(SentiError::shape(
                "matrix mul_vec",
                vec![self.cols],
                vec![x.len()],
            ));
        }
        let xs = x.as_slice();
        let out = (0..self.rows)
            .map(|r| self.row(r).iter().zip(xs).map(|(w, v)| w * v).sum())
            .collect();
        Ok(Vector::new(out))
    }

    /// Transposed matrix-vector product `Wᵗ·g`.
    ///
    /// # Errors
    /// Returns `SentiError::ShapeMismatch` if `g.len() != self.rows()`.
    pub fn transpose_mul_vec(&self, g: &Vector) -> Result<Vector, SentiError> {
        if g.len() != self.rows {
            return Err(SentiError::shape(
                "matrix transpose_mul_vec",
                vec![self.rows],
                vec![g.len()],
            ));
        }
        let mut out = vec![0.0; self.cols];
        for (r, &gr) in g.iter().enumerate() {
            for (o, w) in out.iter_mut().zip(self.row(r)) {
                *o += w * gr;
            }
        }
        Ok(Vector::new(out))
    }

    fn check_same_shape(&self, other: &Matrix, operation: &str) -> Result<(), SentiError> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(SentiError::shape(
                operation,
                vec![self.rows, self.cols],
                vec![other.rows, other.cols],
            ));
        }
        Ok(())
    }

    /// Elementwise sum.
    pub fn add(&self, other: &Matrix) -> Result<Matrix, SentiError> {
        let mut out = self.clone();
        out.add_assign_checked(other, "matrix add")?;
        Ok(out)
    }
}

impl Value for Matrix {
    fn shape(&self) -> Vec<usize> {
        vec![self.rows, self.cols]
    }

    fn zeros_like(&self) -> Self {
        Matrix::zeros(self.rows, self.cols)
    }

    fn add_assign_checked(&mut self, other: &Self, operation: &str) -> Result<(), SentiError> {
        self.check_same_shape(other, operation)?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += b;
        }
        Ok(())
    }

    fn scale(&self, factor: f64) -> Self {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|x| x * factor).collect(),
        }
    }

    fn squared_norm(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum()
    }

    fn as_slice(&self) -> &[f64] {
        &self.data
    }

    fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

impl AbsDiffEq for Matrix {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Matrix {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

#[cfg(test)]
#[path = "matrix_test.rs"]
mod tests;
