use crate::autograd::pass::Pass;
use crate::error::SentiError;
use crate::tensor::Value;
use log::debug;
use std::fmt::Debug;
use std::sync::Arc;

/// Shared handle to a node of the computation graph.
///
/// Consumers hold inputs through this handle; inputs are never copied, and a
/// node referenced by several consumers is evaluated once per pass.
pub type BlockRef<T> = Arc<dyn Block<T>>;

/// Defines the forward/backward contract of a computation-graph node.
///
/// Every node produces a value of type `T` (a scalar, [`Vector`](crate::tensor::Vector)
/// or [`Matrix`](crate::tensor::Matrix)) and, given the gradient of the loss with
/// respect to that value, pushes the appropriately transformed gradient into
/// each of its inputs. Leaves ([`Param`](crate::nn::Param)) accumulate the
/// gradient instead of propagating it.
///
/// The `Debug + Send + Sync` bounds mirror the shared `Arc` handles: graphs
/// may be built on one thread and evaluated on another, and parameter nodes
/// are shared across every graph that references them.
pub trait Block<T: Value>: Debug + Send + Sync {
    /// Short name of the node, used in error messages and logs.
    fn name(&self) -> &str;

    /// Computes the value of this node for `pass`.
    ///
    /// Implementations memoize: a second call with the same `pass` returns the
    /// cached value without re-evaluating inputs. A different `pass` recomputes.
    ///
    /// # Errors
    /// Propagates `SentiError::ShapeMismatch` (and any other error) raised by
    /// this node or any transitive input.
    fn eval(&self, pass: Pass) -> Result<T, SentiError>;

    /// Propagates `grad` (dLoss/dOutput) to the inputs of this node.
    ///
    /// Must only be called after a forward pass has populated the cached value
    /// of this node and of every node below it.
    ///
    /// # Errors
    /// * `SentiError::Uninitialized` if this node (or an input) has no cached value.
    /// * `SentiError::ShapeMismatch` if `grad` does not match the output shape.
    fn backward(&self, grad: &T) -> Result<(), SentiError>;

    /// The value computed by the most recent evaluation, if any.
    fn value(&self) -> Option<T>;

    /// The pass that produced [`value`](Self::value).
    ///
    /// Leaves whose value does not depend on a pass (parameters, constants)
    /// return `None` and are accepted by any consumer.
    fn cached_pass(&self) -> Option<Pass> {
        None
    }

    /// Runs a complete forward pass rooted at this node.
    ///
    /// Allocates a fresh [`Pass`], so every operation node reachable from here
    /// recomputes exactly once, however many consumers share it.
    fn forward(&self) -> Result<T, SentiError> {
        self.eval(Pass::next())
    }
}

/// Fails unless `input` was last evaluated in `pass`, the consumer's own pass.
///
/// A node shared by several roots is re-evaluated by each root's forward
/// pass, so its cache may belong to another graph by the time a consumer
/// runs backward.
pub(crate) fn check_input_pass<T: Value>(input: &BlockRef<T>, pass: Pass) -> Result<(), SentiError> {
    match input.cached_pass() {
        Some(cached) if cached != pass => {
            debug!(
                "{} holds the value of pass {}, consumer expects pass {}",
                input.name(),
                cached.id(),
                pass.id()
            );
            Err(SentiError::Uninitialized {
                block: input.name().to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Fetches the value an input computed in `pass`, failing if it was never
/// evaluated or was re-evaluated by a later pass.
pub(crate) fn cached_input<T: Value>(input: &BlockRef<T>, pass: Pass) -> Result<T, SentiError> {
    check_input_pass(input, pass)?;
    input.value().ok_or_else(|| SentiError::Uninitialized {
        block: input.name().to_string(),
    })
}

/// Sends `grad` to an input after checking that it belongs to `pass`.
pub(crate) fn backward_input<T: Value>(
    input: &BlockRef<T>,
    grad: &T,
    pass: Pass,
) -> Result<(), SentiError> {
    check_input_pass(input, pass)?;
    input.backward(grad)
}

/// Validates that an upstream gradient has the shape of the output it belongs to.
pub(crate) fn check_grad_shape<T: Value>(
    output: &T,
    grad: &T,
    block: &str,
) -> Result<(), SentiError> {
    let (expected, actual) = (output.shape(), grad.shape());
    if expected != actual {
        return Err(SentiError::ShapeMismatch {
            expected,
            actual,
            operation: format!("{} backward", block),
        });
    }
    Ok(())
}
