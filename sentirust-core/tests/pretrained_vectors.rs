use sentirust_core::nn::losses::nll_loss_op;
use sentirust_core::ops::activation::sigmoid_op;
use sentirust_core::ops::arithmetic::sum_op;
use sentirust_core::ops::linalg::dot_op;
use sentirust_core::{Block, LookupTable, SentiError, Vector};
use std::fs;
use std::path::PathBuf;

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("sentirust-{}-{}.txt", name, std::process::id()));
    fs::write(&path, contents).expect("failed to write temp file");
    path
}

#[test]
fn test_load_from_file_and_mix_with_trainable() -> Result<(), SentiError> {
    let path = write_temp("vectors", "good 0.5 0.25\nbad -0.5 -0.25\n\nfilm 0.0 1.0\n");
    let table = LookupTable::with_seed(1);
    let loaded = table.load_pretrained_word_vectors(&path, 2)?;
    fs::remove_file(&path).ok();
    assert_eq!(loaded, 3);
    assert_eq!(table.fixed_len(), 3);

    let w = table.add_trainable_word_vector("param_w", 2)?;
    let good = table.get_fixed_or_trained("good", 2)?;
    let unseen = table.get_fixed_or_trained("plot", 2)?;
    assert!(!good.is_trainable());
    assert!(unseen.is_trainable());
    assert_eq!(good.value(), Vector::new(vec![0.5, 0.25]));

    let sentence = sum_op(vec![good.block(), unseen.block()])?;
    let loss = nll_loss_op(sigmoid_op(dot_op(sentence, w.block())), true);
    assert!(loss.forward()? > 0.0);
    loss.backward(&1.0)?;

    // Pretrained vectors are not updated by backward.
    assert_eq!(good.grad(), Vector::zeros(2));
    assert!(unseen.grad().iter().any(|&g| g != 0.0));
    assert!(w.grad().iter().any(|&g| g != 0.0));
    Ok(())
}

#[test]
fn test_malformed_file_fails_without_partial_load() {
    let path = write_temp("malformed", "good 0.5 0.25\nbad -0.5\nfilm 0.0 1.0\n");
    let table = LookupTable::new();
    let result = table.load_pretrained_word_vectors(&path, 2);
    fs::remove_file(&path).ok();
    assert!(matches!(result, Err(SentiError::Format { line: 2, .. })));
    assert_eq!(table.fixed_len(), 0);
    assert!(table.get_fixed("good").is_none());
}
