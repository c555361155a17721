use crate::error::SentiError;
use crate::nn::parameter::{MatrixParam, VectorParam};
use crate::tensor::{Matrix, Vector};
use crate::utils::sync::{lock_or_recover, read_or_recover, write_or_recover};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::{Mutex, RwLock};

/// Registry resolving word strings (and named model weights) to parameter nodes.
///
/// A table is created once per training run by the caller and shared by
/// reference (typically `Arc<LookupTable>`) with every model built on it. A
/// given word always resolves to the same node instance, which is what makes
/// gradients from repeated occurrences of a word accumulate on one accumulator.
///
/// Two word mappings coexist:
/// * **trainable** vectors, created on demand with random initialization;
/// * **fixed** vectors, loaded once from a pretrained resource and never
///   updated by `backward`.
///
/// Named model weights (scoring vector, biases, matrices) live in maps of
/// their own, so no token of the vocabulary can resolve to one of them.
#[derive(Debug)]
pub struct LookupTable {
    trainable: RwLock<HashMap<String, VectorParam>>,
    fixed: RwLock<HashMap<String, VectorParam>>,
    vectors: RwLock<HashMap<String, VectorParam>>,
    matrices: RwLock<HashMap<String, MatrixParam>>,
    pretrained_loaded: RwLock<bool>,
    rng: Mutex<StdRng>,
}

impl LookupTable {
    /// Creates an empty table whose random initializations come from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates an empty table with reproducible random initialization.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        LookupTable {
            trainable: RwLock::new(HashMap::new()),
            fixed: RwLock::new(HashMap::new()),
            vectors: RwLock::new(HashMap::new()),
            matrices: RwLock::new(HashMap::new()),
            pretrained_loaded: RwLock::new(false),
            rng: Mutex::new(rng),
        }
    }

    /// Returns the trainable vector for `word`, creating a random one of size `dim` if absent.
    ///
    /// # Errors
    /// Returns `SentiError::ShapeMismatch` if `word` already exists with a different dimension.
    pub fn add_trainable_word_vector(&self, word: &str, dim: usize) -> Result<VectorParam, SentiError> {
        self.get_or_create_vector(&self.trainable, "trainable vectors", word, dim, |rng| {
            Vector::random(dim, rng)
        })
    }

    /// Like [`add_trainable_word_vector`](Self::add_trainable_word_vector) but
    /// initializes a newly created vector with `initial` (e.g. a bias of ones).
    /// An existing entry is returned untouched.
    pub fn add_trainable_word_vector_with(
        &self,
        word: &str,
        initial: Vector,
    ) -> Result<VectorParam, SentiError> {
        let dim = initial.len();
        self.get_or_create_vector(&self.trainable, "trainable vectors", word, dim, move |_| initial)
    }

    /// Returns the model vector registered under `name`, creating a random one
    /// of size `dim` if absent. Model vectors are never returned by word lookups.
    ///
    /// # Errors
    /// Returns `SentiError::ShapeMismatch` if `name` exists with a different dimension.
    pub fn add_trainable_vector(&self, name: &str, dim: usize) -> Result<VectorParam, SentiError> {
        self.get_or_create_vector(&self.vectors, "model vectors", name, dim, |rng| {
            Vector::random(dim, rng)
        })
    }

    /// Like [`add_trainable_vector`](Self::add_trainable_vector), initializing
    /// a newly created vector with `initial`.
    pub fn add_trainable_vector_with(&self, name: &str, initial: Vector) -> Result<VectorParam, SentiError> {
        let dim = initial.len();
        self.get_or_create_vector(&self.vectors, "model vectors", name, dim, move |_| initial)
    }

    fn get_or_create_vector<F>(
        &self,
        map: &RwLock<HashMap<String, VectorParam>>,
        what: &str,
        word: &str,
        dim: usize,
        init: F,
    ) -> Result<VectorParam, SentiError>
    where
        F: FnOnce(&mut StdRng) -> Vector,
    {
        if let Some(existing) = read_or_recover(map, what).get(word) {
            return check_vector_dim(existing, dim, word).map(|_| existing.clone());
        }
        let mut table = write_or_recover(map, what);
        // Another thread may have inserted between the two locks.
        if let Some(existing) = table.get(word) {
            return check_vector_dim(existing, dim, word).map(|_| existing.clone());
        }
        let value = init(&mut lock_or_recover(&self.rng, "lookup rng"));
        let param = VectorParam::new(word, value);
        debug!("Created {} entry '{}' of dimension {}", what, word, dim);
        table.insert(word.to_string(), param.clone());
        Ok(param)
    }

    /// Returns the trainable matrix registered under `name`, creating a random
    /// `rows × cols` one if absent.
    ///
    /// # Errors
    /// Returns `SentiError::ShapeMismatch` if `name` exists with a different shape.
    pub fn add_trainable_matrix(&self, name: &str, rows: usize, cols: usize) -> Result<MatrixParam, SentiError> {
        let mut table = write_or_recover(&self.matrices, "trainable matrices");
        if let Some(existing) = table.get(name) {
            let shape = existing.shape();
            if shape != [rows, cols] {
                return Err(SentiError::ShapeMismatch {
                    expected: shape,
                    actual: vec![rows, cols],
                    operation: format!("lookup of matrix '{}'", name),
                });
            }
            return Ok(existing.clone());
        }
        let value = Matrix::random(rows, cols, &mut *lock_or_recover(&self.rng, "lookup rng"));
        let param = MatrixParam::new(name, value);
        debug!("Created trainable matrix '{}' of shape {}x{}", name, rows, cols);
        table.insert(name.to_string(), param.clone());
        Ok(param)
    }

    /// Prefers the fixed (pretrained) vector for `word`; falls back to the
    /// trainable table, creating an entry on demand.
    ///
    /// # Errors
    /// Returns `SentiError::ShapeMismatch` if the resolved vector is not of size `dim`.
    pub fn get_fixed_or_trained(&self, word: &str, dim: usize) -> Result<VectorParam, SentiError> {
        if let Some(fixed) = read_or_recover(&self.fixed, "fixed vectors").get(word) {
            return check_vector_dim(fixed, dim, word).map(|_| fixed.clone());
        }
        self.add_trainable_word_vector(word, dim)
    }

    /// Returns the fixed vector for `word`, if one was loaded.
    pub fn get_fixed(&self, word: &str) -> Option<VectorParam> {
        read_or_recover(&self.fixed, "fixed vectors").get(word).cloned()
    }

    /// Returns the trainable vector for `word` without creating it.
    pub fn get_trainable(&self, word: &str) -> Option<VectorParam> {
        read_or_recover(&self.trainable, "trainable vectors").get(word).cloned()
    }

    /// Populates the fixed mapping from a file of `word x1 .. x_dim` lines.
    ///
    /// Returns the number of vectors loaded. See
    /// [`load_pretrained_from_reader`](Self::load_pretrained_from_reader) for
    /// the format and failure modes.
    pub fn load_pretrained_word_vectors<P: AsRef<Path>>(&self, path: P, dim: usize) -> Result<usize, SentiError> {
        let path = path.as_ref();
        debug!("Loading pretrained word vectors from {}", path.display());
        let file = File::open(path)?;
        self.load_pretrained_from_reader(BufReader::new(file), dim)
    }

    /// Populates the fixed mapping from any buffered reader.
    ///
    /// Every line is parsed before the table is touched, so a malformed
    /// resource leaves the table unchanged. Blank lines are skipped. If a word
    /// occurs more than once, its first vector is kept.
    ///
    /// # Errors
    /// * `SentiError::Format` for a row with the wrong number of components or
    ///   an unparsable number (`line` is 1-based).
    /// * `SentiError::Io` if reading fails.
    /// * `SentiError::InvalidArgument` if pretrained vectors were already loaded.
    pub fn load_pretrained_from_reader<R: BufRead>(&self, reader: R, dim: usize) -> Result<usize, SentiError> {
        if *read_or_recover(&self.pretrained_loaded, "pretrained flag") {
            return Err(SentiError::InvalidArgument(
                "pretrained word vectors were already loaded into this table".to_string(),
            ));
        }

        let mut parsed: Vec<(String, Vector)> = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            parsed.push(parse_vector_line(&line, index + 1, dim)?);
        }

        let mut loaded = write_or_recover(&self.pretrained_loaded, "pretrained flag");
        if *loaded {
            return Err(SentiError::InvalidArgument(
                "pretrained word vectors were already loaded into this table".to_string(),
            ));
        }
        let mut fixed = write_or_recover(&self.fixed, "fixed vectors");
        for (word, vector) in parsed {
            if fixed.contains_key(&word) {
                warn!("Duplicate pretrained vector for '{}', keeping the first one", word);
                continue;
            }
            fixed.insert(word.clone(), VectorParam::fixed(word, vector));
        }
        *loaded = true;
        debug!("Loaded {} pretrained word vectors of dimension {}", fixed.len(), dim);
        Ok(fixed.len())
    }

    /// All trainable word vectors, sorted by word.
    pub fn trainable_params(&self) -> Vec<VectorParam> {
        let table = read_or_recover(&self.trainable, "trainable vectors");
        let mut params: Vec<VectorParam> = table.values().cloned().collect();
        params.sort_by(|a, b| a.name().cmp(b.name()));
        params
    }

    /// All named model vectors, sorted by name.
    pub fn vector_params(&self) -> Vec<VectorParam> {
        let table = read_or_recover(&self.vectors, "model vectors");
        let mut params: Vec<VectorParam> = table.values().cloned().collect();
        params.sort_by(|a, b| a.name().cmp(b.name()));
        params
    }

    /// All trainable matrices, sorted by name.
    pub fn matrix_params(&self) -> Vec<MatrixParam> {
        let table = read_or_recover(&self.matrices, "trainable matrices");
        let mut params: Vec<MatrixParam> = table.values().cloned().collect();
        params.sort_by(|a, b| a.name().cmp(b.name()));
        params
    }

    pub fn trainable_len(&self) -> usize {
        read_or_recover(&self.trainable, "trainable vectors").len()
    }

    pub fn fixed_len(&self) -> usize {
        read_or_recover(&self.fixed, "fixed vectors").len()
    }

    /// Resets every trainable gradient accumulator. Must only run once all
    /// backward passes contributing to the current step have finished.
    pub fn zero_grads(&self) {
        for param in read_or_recover(&self.trainable, "trainable vectors").values() {
            param.zero_grad();
        }
        for param in read_or_recover(&self.vectors, "model vectors").values() {
            param.zero_grad();
        }
        for param in read_or_recover(&self.matrices, "trainable matrices").values() {
            param.zero_grad();
        }
    }
}

impl Default for LookupTable {
    fn default() -> Self {
        Self::new()
    }
}

fn check_vector_dim(param: &VectorParam, dim: usize, word: &str) -> Result<(), SentiError> {
    let shape = param.shape();
    if shape != [dim] {
        return Err(SentiError::ShapeMismatch {
            expected: shape,
            actual: vec![dim],
            operation: format!("lookup of word '{}'", word),
        });
    }
    Ok(())
}

fn parse_vector_line(line: &str, line_number: usize, dim: usize) -> Result<(String, Vector), SentiError> {
    let mut fields = line.split_whitespace();
    let word = fields.next().ok_or_else(|| SentiError::Format {
        line: line_number,
        message: "missing word".to_string(),
    })?;
    let components = fields
        .map(|field| {
            field.parse::<f64>().map_err(|e| SentiError::Format {
                line: line_number,
                message: format!("cannot parse '{}' as a number: {}", field, e),
            })
        })
        .collect::<Result<Vec<f64>, SentiError>>()?;
    if components.len() != dim {
        return Err(SentiError::Format {
            line: line_number,
            message: format!(
                "expected {} components for '{}', found {}",
                dim,
                word,
                components.len()
            ),
        });
    }
    Ok((word.to_string(), Vector::new(components)))
}

#[cfg(test)]
#[path = "lookup_table_test.rs"]
mod tests;
