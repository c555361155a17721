use crate::autograd::Block;
use crate::error::SentiError;
use crate::nn::Param;
use crate::tensor::Value;
use approx::relative_eq;
use log::debug;
use thiserror::Error;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for parameter '{param}', element {element_index}: analytical grad {analytical_grad:?} != numerical grad {numerical_grad:?}. Difference: {difference:?}")]
    GradientMismatch {
        param: String,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },
    #[error("Forward pass failed during gradient check: {0}")]
    ForwardPassError(SentiError),
    #[error("Backward pass failed during gradient check: {0}")]
    BackwardPassError(SentiError),
    #[error("Numerical gradient is NaN or infinite for parameter '{param}', element {element_index}. Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NumericalGradNaNOrInfinite {
        param: String,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },
    #[error("Analytical gradient is NaN or infinite for parameter '{param}', element {element_index}. Value: {value:?}")]
    AnalyticalGradNaNOrInfinite {
        param: String,
        element_index: usize,
        value: f64,
    },
    #[error("Error while perturbing parameters: {0}")]
    TensorError(SentiError),
}

impl From<SentiError> for GradCheckError {
    fn from(err: SentiError) -> Self {
        GradCheckError::TensorError(err)
    }
}

/// A parameter whose elements the gradient checker can perturb one at a time.
///
/// Implemented for every [`Param`], so vector and matrix parameters can be
/// checked in the same call.
pub trait GradCheckable {
    fn label(&self) -> &str;
    fn numel(&self) -> usize;
    fn element(&self, index: usize) -> Option<f64>;
    fn set_element(&self, index: usize, x: f64) -> Result<(), SentiError>;
    fn grad_values(&self) -> Vec<f64>;
    fn reset_grad(&self);
}

impl<T: Value> GradCheckable for Param<T> {
    fn label(&self) -> &str {
        self.name()
    }

    fn numel(&self) -> usize {
        self.value().numel()
    }

    fn element(&self, index: usize) -> Option<f64> {
        Param::element(self, index)
    }

    fn set_element(&self, index: usize, x: f64) -> Result<(), SentiError> {
        Param::set_element(self, index, x)
    }

    fn grad_values(&self) -> Vec<f64> {
        self.grad().as_slice().to_vec()
    }

    fn reset_grad(&self) {
        self.zero_grad();
    }
}

/// Checks analytical gradients against centered finite differences.
///
/// Runs `root.forward()` and `root.backward(&1.0)` once to collect the
/// analytical gradient of every parameter in `params`, then, for every element
/// of every parameter, evaluates the root at `x + epsilon` and `x - epsilon`
/// (each in a fresh pass) and compares `(f(x+ε) - f(x-ε)) / 2ε` with the
/// analytical value. Elements match if they agree within `tolerance` either
/// absolutely or relatively.
///
/// The gradients of `params` are zeroed before the check; parameter values are
/// restored after each perturbation.
pub fn check_grad(
    root: &dyn Block<f64>,
    params: &[&dyn GradCheckable],
    epsilon: f64,
    tolerance: f64,
) -> Result<(), GradCheckError> {
    for param in params {
        param.reset_grad();
    }

    root.forward().map_err(GradCheckError::ForwardPassError)?;
    root.backward(&1.0).map_err(GradCheckError::BackwardPassError)?;

    for param in params {
        let analytical = param.grad_values();
        for elem_idx in 0..param.numel() {
            let original = param.element(elem_idx).ok_or(SentiError::IndexOutOfBounds {
                index: elem_idx,
                len: param.numel(),
            })?;

            let loss_plus = evaluate_at(root, *param, elem_idx, original + epsilon, original)?;
            let loss_minus = evaluate_at(root, *param, elem_idx, original - epsilon, original)?;
            let numerical_grad = (loss_plus - loss_minus) / (2.0 * epsilon);
            let analytical_grad = analytical[elem_idx];

            if !numerical_grad.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    param: param.label().to_string(),
                    element_index: elem_idx,
                    loss_plus,
                    loss_minus,
                });
            }
            if !analytical_grad.is_finite() {
                return Err(GradCheckError::AnalyticalGradNaNOrInfinite {
                    param: param.label().to_string(),
                    element_index: elem_idx,
                    value: analytical_grad,
                });
            }
            if !relative_eq!(
                analytical_grad,
                numerical_grad,
                epsilon = tolerance,
                max_relative = tolerance
            ) {
                return Err(GradCheckError::GradientMismatch {
                    param: param.label().to_string(),
                    element_index: elem_idx,
                    analytical_grad,
                    numerical_grad,
                    difference: (analytical_grad - numerical_grad).abs(),
                });
            }
        }
        debug!("Gradient check passed for '{}'", param.label());
    }

    Ok(())
}

/// Evaluates `root` with one element of `param` temporarily set to `x`.
fn evaluate_at(
    root: &dyn Block<f64>,
    param: &dyn GradCheckable,
    index: usize,
    x: f64,
    original: f64,
) -> Result<f64, GradCheckError> {
    param.set_element(index, x)?;
    let loss = root.forward();
    param.set_element(index, original)?;
    loss.map_err(GradCheckError::ForwardPassError)
}
