use super::*;
use approx::assert_relative_eq;

fn sample_matrix() -> Matrix {
    // [[1, 2, 3],
    //  [4, 5, 6]]
    Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("valid matrix")
}

#[test]
fn test_matrix_from_vec_length_mismatch() {
    let result = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0]);
    assert!(matches!(result, Err(SentiError::ShapeMismatch { .. })));
}

#[test]
fn test_matrix_mul_vec() -> Result<(), SentiError> {
    let w = sample_matrix();
    let x = Vector::new(vec![1.0, 0.0, -1.0]);
    assert_eq!(w.mul_vec(&x)?, Vector::new(vec![-2.0, -2.0]));
    Ok(())
}

#[test]
fn test_matrix_transpose_mul_vec() -> Result<(), SentiError> {
    let w = sample_matrix();
    let g = Vector::new(vec![1.0, 2.0]);
    assert_eq!(w.transpose_mul_vec(&g)?, Vector::new(vec![9.0, 12.0, 15.0]));
    Ok(())
}

#[test]
fn test_matrix_mul_vec_shape_errors() {
    let w = sample_matrix();
    assert!(matches!(
        w.mul_vec(&Vector::zeros(2)),
        Err(SentiError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        w.transpose_mul_vec(&Vector::zeros(3)),
        Err(SentiError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_matrix_get_bounds() {
    let w = sample_matrix();
    assert_eq!(w.get(1, 2), Some(6.0));
    assert_eq!(w.get(2, 0), None);
    assert_eq!(w.get(0, 3), None);
}

#[test]
fn test_matrix_value_trait() -> Result<(), SentiError> {
    let mut acc = Matrix::zeros(2, 3);
    acc.add_assign_checked(&sample_matrix(), "test")?;
    assert_eq!(acc, sample_matrix());
    assert_relative_eq!(acc.squared_norm(), 91.0);
    assert_eq!(acc.shape(), vec![2, 3]);
    assert!(acc.add_assign_checked(&Matrix::zeros(3, 2), "test").is_err());
    assert_relative_eq!(acc.scale(2.0), sample_matrix().add(&sample_matrix())?);
    Ok(())
}
