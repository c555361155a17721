use super::*;
use crate::autograd::grad_check::check_grad;
use crate::nn::Param;
use crate::ops::activation::sigmoid_op;
use crate::ops::linalg::dot_op;
use crate::tensor::Vector;
use approx::assert_relative_eq;

#[test]
fn test_nll_forward_matches_log_loss() -> Result<(), SentiError> {
    let p = Param::new("p", 0.8f64);
    assert_relative_eq!(nll_loss_op(p.block(), true).forward()?, -(0.8f64.ln()));
    assert_relative_eq!(nll_loss_op(p.block(), false).forward()?, -(0.2f64.ln()), epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_nll_backward_seeds_score_gradient() -> Result<(), SentiError> {
    let p = Param::new("p", 0.25f64);
    let loss = nll_loss_op(p.block(), true);
    loss.forward()?;
    loss.backward(&1.0)?;
    assert_relative_eq!(p.grad(), -4.0);

    let q = Param::new("q", 0.25f64);
    let loss = nll_loss_op(q.block(), false);
    loss.forward()?;
    loss.backward(&1.0)?;
    assert_relative_eq!(q.grad(), 1.0 / 0.75);
    Ok(())
}

#[test]
fn test_nll_clamps_saturated_probabilities() -> Result<(), SentiError> {
    for (p, target) in [(0.0, true), (1.0, false), (0.0, false), (1.0, true)] {
        let score = Param::new("p", p);
        let loss = nll_loss_op(score.block(), target);
        let value = loss.forward()?;
        assert!(value.is_finite() && value >= 0.0, "loss {} for p={}", value, p);
        loss.backward(&1.0)?;
        assert!(score.grad().is_finite());
    }
    let worst = nll_loss_op(Param::new("p", 0.0f64).block(), true).forward()?;
    assert_relative_eq!(worst, -(PROBABILITY_EPSILON.ln()));
    Ok(())
}

#[test]
fn test_nll_backward_before_forward() {
    let p = Param::new("p", 0.5f64);
    let loss = nll_loss_op(p.block(), true);
    assert!(matches!(loss.backward(&1.0), Err(SentiError::Uninitialized { .. })));
}

#[test]
fn test_nll_of_sigmoid_grad_check() {
    for target in [true, false] {
        let w = Param::new("w", Vector::new(vec![0.4, -0.3, 0.05]));
        let x = Param::new("x", Vector::new(vec![1.0, 0.2, -2.0]));
        let loss = nll_loss_op(sigmoid_op(dot_op(w.block(), x.block())), target);
        check_grad(loss.as_ref(), &[&w, &x], 1e-6, 1e-6).expect("gradients should match");
    }
}

#[test]
fn test_nll_grad_check_near_boundaries() {
    for start in [1e-4, 0.5, 1.0 - 1e-4] {
        let p = Param::new("p", start);
        let loss = nll_loss_op(p.block(), true);
        check_grad(loss.as_ref(), &[&p], 1e-8, 1e-4)
            .unwrap_or_else(|e| panic!("grad check failed at p = {}: {}", start, e));
    }
}
