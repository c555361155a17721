// sentirust-models/src/model.rs

use crate::config::ModelConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sentirust_core::nn::losses::{l2_regularization_op, nll_loss_op, LossSum};
use sentirust_core::ops::activation::sigmoid_op;
use sentirust_core::ops::linalg::dot_op;
use sentirust_core::ops::Dropout;
use sentirust_core::utils::sync::lock_or_recover;
use sentirust_core::{Block, BlockRef, LookupTable, SentiError, Vector, VectorParam};
use std::sync::{Arc, Mutex};

/// Default decision threshold of [`SentimentModel::predict`].
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Name of the scoring vector in the lookup table.
pub const SCORING_PARAM: &str = "param_w";

/// State every model shares: its configuration, the lookup table, the
/// scoring vector and the RNG seeding dropout blocks.
#[derive(Debug)]
pub struct ModelBase {
    config: ModelConfig,
    table: Arc<LookupTable>,
    param_w: VectorParam,
    rng: Mutex<StdRng>,
}

impl ModelBase {
    /// Validates `config` and registers a scoring vector of size `sentence_dim`.
    pub fn new(
        config: ModelConfig,
        table: Arc<LookupTable>,
        sentence_dim: usize,
    ) -> Result<Self, SentiError> {
        Self::with_rng(config, table, sentence_dim, StdRng::from_entropy())
    }

    /// Like [`new`](Self::new) with reproducible dropout masks.
    pub fn with_seed(
        config: ModelConfig,
        table: Arc<LookupTable>,
        sentence_dim: usize,
        seed: u64,
    ) -> Result<Self, SentiError> {
        Self::with_rng(config, table, sentence_dim, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        config: ModelConfig,
        table: Arc<LookupTable>,
        sentence_dim: usize,
        rng: StdRng,
    ) -> Result<Self, SentiError> {
        config.validate()?;
        let param_w = table.add_trainable_vector(SCORING_PARAM, sentence_dim)?;
        Ok(ModelBase {
            config,
            table,
            param_w,
            rng: Mutex::new(rng),
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn table(&self) -> &Arc<LookupTable> {
        &self.table
    }

    pub fn param_w(&self) -> &VectorParam {
        &self.param_w
    }

    /// Wraps `x` in a dropout block when the configuration asks for one.
    pub(crate) fn dropout(
        &self,
        x: BlockRef<Vector>,
        test_time: bool,
    ) -> Result<BlockRef<Vector>, SentiError> {
        let Some(p) = self.config.dropout else {
            return Ok(x);
        };
        let seed: u64 = lock_or_recover(&self.rng, "model rng").gen();
        Ok(Arc::new(Dropout::with_seed(p, x, test_time, seed)?))
    }
}

/// A sentence classifier assembled from computation-graph blocks.
///
/// Implementors choose how word vectors are composed into a sentence vector
/// and which parameters are regularized. Everything else, the scoring layer,
/// the likelihood loss and prediction, is shared.
///
/// Each call to [`predict`](Self::predict) or [`loss`](Self::loss) builds a
/// fresh graph. Only parameter nodes are shared between graphs, so graphs for
/// different sentences may be evaluated on different threads.
pub trait SentimentModel: Send + Sync {
    fn base(&self) -> &ModelBase;

    /// Composes the word vectors of one sentence (never empty) into a sentence vector.
    fn word_vectors_to_sentence_vector(
        &self,
        words: &[VectorParam],
    ) -> Result<BlockRef<Vector>, SentiError>;

    /// Every trainable vector of the model that is not a word vector.
    fn vector_params(&self) -> Vec<VectorParam> {
        vec![self.base().param_w().clone()]
    }

    /// Resolves `word` through the lookup table, preferring pretrained vectors.
    fn word_to_vector(&self, word: &str) -> Result<VectorParam, SentiError> {
        let base = self.base();
        base.table().get_fixed_or_trained(word, base.config().embedding_size)
    }

    /// `sigmoid(param_w · sentence)`.
    fn score_sentence(&self, sentence: BlockRef<Vector>) -> BlockRef<f64> {
        sigmoid_op(dot_op(sentence, self.base().param_w().block()))
    }

    /// L2 penalty over the sentence's word vectors and the model's vector parameters.
    fn regularizer(&self, words: &[VectorParam]) -> Result<BlockRef<f64>, SentiError> {
        let params: Vec<BlockRef<Vector>> = words
            .iter()
            .cloned()
            .chain(self.vector_params())
            .map(|p| p.block())
            .collect();
        l2_regularization_op(self.base().config().vector_regularization, params)
    }

    /// Resolves every token of `sentence`.
    ///
    /// # Errors
    /// Returns `SentiError::EmptyInput` for an empty sentence.
    fn words_of<S: AsRef<str>>(&self, sentence: &[S]) -> Result<Vec<VectorParam>, SentiError> {
        if sentence.is_empty() {
            return Err(SentiError::EmptyInput {
                operation: "sentence".to_string(),
            });
        }
        sentence.iter().map(|w| self.word_to_vector(w.as_ref())).collect()
    }

    /// Probability that `sentence` is positive, from one test-time forward pass.
    fn probability<S: AsRef<str>>(&self, sentence: &[S]) -> Result<f64, SentiError> {
        let words = self.words_of(sentence)?;
        let sentence_vector = self.word_vectors_to_sentence_vector(&words)?;
        let sentence_vector = self.base().dropout(sentence_vector, true)?;
        self.score_sentence(sentence_vector).forward()
    }

    /// `true` if the positive probability is at least `threshold`
    /// (conventionally [`DEFAULT_THRESHOLD`]).
    fn predict<S: AsRef<str>>(&self, sentence: &[S], threshold: f64) -> Result<bool, SentiError> {
        Ok(self.probability(sentence)? >= threshold)
    }

    /// Builds the training loss for one labelled sentence: likelihood plus regularizer.
    ///
    /// The graph is returned unevaluated; callers run `forward()` then
    /// `backward(&1.0)` to accumulate gradients into every parameter involved.
    fn loss<S: AsRef<str>>(&self, sentence: &[S], target: bool) -> Result<BlockRef<f64>, SentiError> {
        let words = self.words_of(sentence)?;
        let sentence_vector = self.word_vectors_to_sentence_vector(&words)?;
        let sentence_vector = self.base().dropout(sentence_vector, false)?;
        let likelihood = nll_loss_op(self.score_sentence(sentence_vector), target);
        let regularizer = self.regularizer(&words)?;
        Ok(Arc::new(LossSum::pair(likelihood, regularizer)))
    }
}
