// sentirust-models/src/models/recurrent.rs

use crate::config::ModelConfig;
use crate::model::{ModelBase, SentimentModel};
use log::debug;
use sentirust_core::nn::losses::{l2_regularization_op, LossSum};
use sentirust_core::ops::activation::tanh_op;
use sentirust_core::ops::arithmetic::sum_op;
use sentirust_core::ops::constant_op;
use sentirust_core::ops::linalg::mul_op;
use sentirust_core::{BlockRef, LookupTable, MatrixParam, SentiError, Vector, VectorParam};
use std::sync::Arc;

pub const INPUT_WEIGHTS: &str = "param_Wx";
pub const HIDDEN_WEIGHTS: &str = "param_Wh";
pub const HIDDEN_BIAS: &str = "param_b";

/// Elman recurrence over the words of a sentence:
/// `h_t = tanh(Wh·h_{t-1} + Wx·x_t + b)`, with `h_0 = 0` for every sentence.
/// The final state is the sentence vector.
///
/// Word vectors and the bias are regularized with
/// [`vector_regularization`](ModelConfig::vector_regularization), the two
/// matrices with [`matrix_regularization`](ModelConfig::matrix_regularization).
#[derive(Debug)]
pub struct RecurrentModel {
    base: ModelBase,
    w_x: MatrixParam,
    w_h: MatrixParam,
    bias: VectorParam,
}

impl RecurrentModel {
    pub fn new(config: ModelConfig, table: Arc<LookupTable>) -> Result<Self, SentiError> {
        let hidden = config.hidden_size;
        Self::from_base(ModelBase::new(config, table, hidden)?)
    }

    pub fn with_seed(config: ModelConfig, table: Arc<LookupTable>, seed: u64) -> Result<Self, SentiError> {
        let hidden = config.hidden_size;
        Self::from_base(ModelBase::with_seed(config, table, hidden, seed)?)
    }

    fn from_base(base: ModelBase) -> Result<Self, SentiError> {
        let (embedding, hidden) = (base.config().embedding_size, base.config().hidden_size);
        let table = base.table();
        let w_x = table.add_trainable_matrix(INPUT_WEIGHTS, hidden, embedding)?;
        let w_h = table.add_trainable_matrix(HIDDEN_WEIGHTS, hidden, hidden)?;
        let bias = table.add_trainable_vector_with(HIDDEN_BIAS, Vector::filled(hidden, 1.0))?;
        debug!(
            "Built RecurrentModel with embedding size {} and hidden size {}",
            embedding, hidden
        );
        Ok(RecurrentModel { base, w_x, w_h, bias })
    }

    pub fn input_weights(&self) -> &MatrixParam {
        &self.w_x
    }

    pub fn hidden_weights(&self) -> &MatrixParam {
        &self.w_h
    }

    pub fn bias(&self) -> &VectorParam {
        &self.bias
    }
}

impl SentimentModel for RecurrentModel {
    fn base(&self) -> &ModelBase {
        &self.base
    }

    fn word_vectors_to_sentence_vector(
        &self,
        words: &[VectorParam],
    ) -> Result<BlockRef<Vector>, SentiError> {
        let hidden = self.base.config().hidden_size;
        let mut state = constant_op("h0", Vector::zeros(hidden));
        for word in words {
            let pre_activation = sum_op(vec![
                mul_op(self.w_h.block(), state),
                mul_op(self.w_x.block(), word.block()),
                self.bias.block(),
            ])?;
            state = tanh_op(pre_activation);
        }
        Ok(state)
    }

    fn vector_params(&self) -> Vec<VectorParam> {
        vec![self.base.param_w().clone(), self.bias.clone()]
    }

    fn regularizer(&self, words: &[VectorParam]) -> Result<BlockRef<f64>, SentiError> {
        let config = self.base.config();
        let vectors: Vec<BlockRef<Vector>> = words
            .iter()
            .cloned()
            .chain(self.vector_params())
            .map(|p| p.block())
            .collect();
        let vector_term = l2_regularization_op(config.vector_regularization, vectors)?;
        let matrix_term = l2_regularization_op(
            config.matrix_regularization,
            vec![self.w_x.block(), self.w_h.block()],
        )?;
        Ok(Arc::new(LossSum::pair(vector_term, matrix_term)))
    }
}
