use crate::error::SentiError;
use crate::tensor::matrix::Matrix;
use crate::tensor::traits::Value;
use crate::tensor::INIT_RANGE;
use approx::{AbsDiffEq, RelativeEq};
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use std::ops::Index;

/// A dense vector of `f64` components.
///
/// `Vector` is a plain value type: cloning copies the data. Sharing between
/// graph nodes happens one level up, through [`BlockRef`](crate::autograd::BlockRef)
/// and [`Param`](crate::nn::Param) handles.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    /// Creates a vector that takes ownership of `data`.
    pub fn new(data: Vec<f64>) -> Self {
        Vector { data }
    }

    /// Creates a vector of `len` zeros.
    pub fn zeros(len: usize) -> Self {
        Self::filled(len, 0.0)
    }

    /// Creates a vector of `len` copies of `value`.
    pub fn filled(len: usize, value: f64) -> Self {
        Vector {
            data: vec![value; len],
        }
    }

    /// Creates a vector with components drawn uniformly from `[-INIT_RANGE, INIT_RANGE]`.
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let dist = Uniform::new_inclusive(-INIT_RANGE, INIT_RANGE);
        Vector {
            data: (0..len).map(|_| dist.sample(rng)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.data.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.data.iter()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    fn check_same_len(&self, other: &Vector, operation: &str) -> Result<(), SentiError> {
        if self.len() != other.len() {
            return Err(SentiError::shape(
                operation,
                vec![self.len()],
                vec![other.len()],
            ));
        }
        Ok(())
    }

    /// Elementwise sum.
    pub fn add(&self, other: &Vector) -> Result<Vector, SentiError> {
        self.check_same_len(other, "vector add")?;
        Ok(self.zip_with(other, |a, b| a + b))
    }

    /// Elementwise (Hadamard) product.
    pub fn hadamard(&self, other: &Vector) -> Result<Vector, SentiError> {
        self.check_same_len(other, "vector hadamard")?;
        Ok(self.zip_with(other, |a, b| a * b))
    }

    /// Inner product.
    pub fn dot(&self, other: &Vector) -> Result<f64, SentiError> {
        self.check_same_len(other, "vector dot")?;
        Ok(self.data.iter().zip(&other.data).map(|(a, b)| a * b).sum())
    }

    /// Outer product `self ⊗ otherᵗ`, a `self.len() × other.len()` matrix.
    pub fn outer(&self, other: &Vector) -> Matrix {
        let mut data = Vec::with_capacity(self.len() * other.len());
        for &a in &self.data {
            data.extend(other.data.iter().map(|&b| a * b));
        }
        Matrix::from_raw(self.len(), other.len(), data)
    }

    /// Applies `f` to every component.
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Vector {
        Vector {
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }

    fn zip_with<F: Fn(f64, f64) -> f64>(&self, other: &Vector, f: F) -> Vector {
        Vector {
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Vector::new(data)
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.data[index]
    }
}

impl Value for Vector {
    fn shape(&self) -> Vec<usize> {
        vec![self.len()]
    }

    fn zeros_like(&self) -> Self {
        Vector::zeros(self.len())
    }

    fn add_assign_checked(&mut self, other: &Self, operation: &str) -> Result<(), SentiError> {
        self.check_same_len(other, operation)?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += b;
        }
        Ok(())
    }

    fn scale(&self, factor: f64) -> Self {
        self.map(|x| x * factor)
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

impl AbsDiffEq for Vector {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.len() == other.len()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Vector {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.len() == other.len()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

#[cfg(test)]
#[path = "vector_test.rs"]
mod tests;
