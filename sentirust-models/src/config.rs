// sentirust-models/src/config.rs

use sentirust_core::SentiError;

/// Hyper-parameters shared by every composition model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Dimension of word vectors.
    pub embedding_size: usize,
    /// Dimension of the recurrent state. Ignored by the additive models.
    pub hidden_size: usize,
    /// L2 strength applied to word vectors and other vector parameters.
    pub vector_regularization: f64,
    /// L2 strength applied to matrix parameters (recurrent model only).
    pub matrix_regularization: f64,
    /// Dropout probability on the sentence vector in training graphs.
    pub dropout: Option<f64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            embedding_size: 10,
            hidden_size: 10,
            vector_regularization: 0.01,
            matrix_regularization: 0.001,
            dropout: None,
        }
    }
}

impl ModelConfig {
    pub fn with_embedding_size(mut self, embedding_size: usize) -> Self {
        self.embedding_size = embedding_size;
        self
    }

    pub fn with_hidden_size(mut self, hidden_size: usize) -> Self {
        self.hidden_size = hidden_size;
        self
    }

    pub fn with_regularization(mut self, vector: f64, matrix: f64) -> Self {
        self.vector_regularization = vector;
        self.matrix_regularization = matrix;
        self
    }

    pub fn with_dropout(mut self, dropout: Option<f64>) -> Self {
        self.dropout = dropout;
        self
    }

    /// Checks every field before any parameter is created.
    ///
    /// # Errors
    /// Returns `SentiError::InvalidArgument` for a zero dimension, a negative or
    /// non-finite regularization strength, or a dropout probability outside `[0, 1)`.
    pub fn validate(&self) -> Result<(), SentiError> {
        if self.embedding_size == 0 || self.hidden_size == 0 {
            return Err(SentiError::InvalidArgument(format!(
                "dimensions must be positive (embedding_size = {}, hidden_size = {})",
                self.embedding_size, self.hidden_size
            )));
        }
        for (name, strength) in [
            ("vector_regularization", self.vector_regularization),
            ("matrix_regularization", self.matrix_regularization),
        ] {
            if !strength.is_finite() || strength < 0.0 {
                return Err(SentiError::InvalidArgument(format!(
                    "{} must be finite and non-negative, got {}",
                    name, strength
                )));
            }
        }
        if let Some(p) = self.dropout {
            if !(0.0..1.0).contains(&p) {
                return Err(SentiError::InvalidArgument(format!(
                    "dropout probability must be in [0, 1), got {}",
                    p
                )));
            }
        }
        Ok(())
    }
}
