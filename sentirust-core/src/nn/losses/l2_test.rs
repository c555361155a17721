use super::*;
use crate::autograd::grad_check::check_grad;
use crate::nn::{MatrixParam, Param, VectorParam};
use crate::tensor::{Matrix, Vector};
use crate::utils::testing::seeded_rng;
use approx::assert_relative_eq;

#[test]
fn test_l2_forward() -> Result<(), SentiError> {
    let a = Param::new("a", Vector::new(vec![1.0, 2.0]));
    let b = Param::new("b", Vector::new(vec![-3.0]));
    let reg = l2_regularization_op(0.5, vec![a.block(), b.block()])?;
    assert_relative_eq!(reg.forward()?, 0.5 * 14.0);
    Ok(())
}

#[test]
fn test_l2_backward() -> Result<(), SentiError> {
    let a = Param::new("a", Vector::new(vec![1.0, -2.0]));
    let reg = l2_regularization_op(0.1, vec![a.block()])?;
    reg.forward()?;
    reg.backward(&1.0)?;
    assert_relative_eq!(a.grad(), Vector::new(vec![0.2, -0.4]), epsilon = 1e-15);
    Ok(())
}

#[test]
fn test_l2_zero_strength_is_exact_no_op() -> Result<(), SentiError> {
    let a = Param::new("a", Vector::new(vec![3.0, -7.5, 0.25]));
    let w = Param::new("w", Matrix::filled(2, 2, -4.0));
    let reg_v = l2_regularization_op(0.0, vec![a.block()])?;
    let reg_m = l2_regularization_op(0.0, vec![w.block()])?;
    assert_eq!(reg_v.forward()?, 0.0);
    assert_eq!(reg_m.forward()?, 0.0);
    reg_v.backward(&1.0)?;
    reg_m.backward(&1.0)?;
    assert!(a.grad().iter().all(|&g| g == 0.0));
    assert_eq!(w.grad(), Matrix::zeros(2, 2));
    Ok(())
}

#[test]
fn test_l2_rejects_negative_strength() {
    let a = Param::new("a", Vector::zeros(1));
    for strength in [-0.1, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            l2_regularization_op(strength, vec![a.block()]),
            Err(SentiError::InvalidArgument(_))
        ));
    }
}

#[test]
fn test_l2_with_no_params_is_zero() -> Result<(), SentiError> {
    let reg = l2_regularization_op::<Vector>(1.0, Vec::new())?;
    assert_eq!(reg.forward()?, 0.0);
    reg.backward(&1.0)?;
    Ok(())
}

#[test]
fn test_l2_shared_param_accumulates() -> Result<(), SentiError> {
    let a = Param::new("a", Vector::new(vec![1.0, 1.0]));
    let reg = l2_regularization_op(1.0, vec![a.block(), a.block()])?;
    assert_relative_eq!(reg.forward()?, 4.0);
    reg.backward(&1.0)?;
    assert_relative_eq!(a.grad(), Vector::new(vec![4.0, 4.0]));
    Ok(())
}

#[test]
fn test_l2_grad_check_vectors_and_matrices() {
    let mut rng = seeded_rng(11);
    let v: VectorParam = VectorParam::random("v", 4, &mut rng);
    let m: MatrixParam = MatrixParam::random("m", 3, 2, &mut rng);
    let reg_v = l2_regularization_op(0.3, vec![v.block()]).expect("valid strength");
    let reg_m = l2_regularization_op(0.7, vec![m.block()]).expect("valid strength");
    check_grad(reg_v.as_ref(), &[&v], 1e-6, 1e-6).expect("vector gradients should match");
    check_grad(reg_m.as_ref(), &[&m], 1e-6, 1e-6).expect("matrix gradients should match");
}
