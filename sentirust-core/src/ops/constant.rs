use crate::autograd::{Block, BlockRef, Pass};
use crate::error::SentiError;
use crate::tensor::Value;
use std::sync::Arc;

/// A leaf holding a fixed value that never receives gradient.
///
/// Used for inputs that are not parameters, such as the zero initial state of
/// a recurrence.
#[derive(Debug, Clone)]
pub struct Constant<T: Value> {
    name: String,
    value: T,
}

impl<T: Value> Constant<T> {
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Constant {
            name: name.into(),
            value,
        }
    }
}

impl<T: Value> Block<T> for Constant<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn eval(&self, _pass: Pass) -> Result<T, SentiError> {
        Ok(self.value.clone())
    }

    fn backward(&self, _grad: &T) -> Result<(), SentiError> {
        Ok(())
    }

    fn value(&self) -> Option<T> {
        Some(self.value.clone())
    }
}

/// Wraps `value` in a constant block.
pub fn constant_op<T: Value>(name: &str, value: T) -> BlockRef<T> {
    Arc::new(Constant::new(name, value))
}
